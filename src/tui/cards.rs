//! Card rendering, one layout per stage.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use tracing::instrument;

use super::input::PlayScreen;
use crate::game::{Celebration, ProposalAnswer, ProposalSession, Stage, Toast, letter_count};

const ROSE: Color = Color::Rgb(0xff, 0x69, 0xb4);

/// What the card renderer needs besides the session.
#[derive(Debug, Clone, Copy)]
pub struct CardContext<'a> {
    /// Toast to show at the bottom, if any.
    pub toast: Option<&'a Toast>,
    /// Whether a camera stream is bound.
    pub streaming: bool,
    /// Profile description of the bound stream.
    pub stream_label: Option<&'a str>,
}

/// Draws the whole frame: decorations, the active card, the toast bar and help.
#[instrument(skip_all, fields(stage = %session.stage()))]
pub fn draw(frame: &mut Frame, session: &ProposalSession, screen: &PlayScreen, ctx: CardContext<'_>) {
    let area = frame.area();
    render_particles(frame, area, session.celebration());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(12),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(area);

    let card = centered(chunks[0], 60);
    frame.render_widget(Clear, card);
    match session.stage() {
        Stage::Welcome => render_welcome(frame, card, session),
        Stage::Riddle => render_riddle(frame, card, session),
        Stage::Compliment => render_compliment(frame, card),
        Stage::Camera => render_camera(frame, card, ctx),
        Stage::PhotoOverlay => render_overlay(frame, card, session),
        Stage::Buildup => render_buildup(frame, card, session),
        Stage::Proposal => render_proposal(frame, card, session, screen),
        Stage::Celebration => render_celebration(frame, card, session),
    }

    render_toast(frame, chunks[1], ctx.toast);

    let help_text = match screen.upload_prompt() {
        Some(path) => format!("Fotoğraf yolu: {path}▏  Enter: Yükle | Esc: Vazgeç"),
        None => help_line(session.stage()).to_string(),
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[2]);
}

fn help_line(stage: Stage) -> &'static str {
    match stage {
        Stage::Welcome => "Enter: Oyuna Başla | Esc: Çıkış",
        Stage::Riddle => "Tab: Harf Al | Yaz + Enter: Tahmin Et | Esc: Çıkış",
        Stage::Compliment => "Enter: Devam Et | u: Yedek: Fotoğraf Yükle | Esc: Çıkış",
        Stage::Camera => {
            "Enter: Fotoğraf Çek | u: Yedek: Fotoğraf Yükle | r: Kamerayı Yeniden Başlat"
        }
        Stage::PhotoOverlay => "...",
        Stage::Buildup => "Enter: Devam Et | Esc: Çıkış",
        Stage::Proposal => "↑↓: Seç | Enter: Cevapla | 1-5: Evet | n: Hayır",
        Stage::Celebration => "Enter: Tekrar Oyna | Esc: Çıkış",
    }
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: area.height,
    }
}

fn card_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ROSE))
        .title(title)
        .title_alignment(Alignment::Center)
}

fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default().fg(ROSE).add_modifier(Modifier::BOLD),
    ))
}

fn muted(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::Gray)))
}

fn paragraph(lines: Vec<Line<'static>>, title: &'static str) -> Paragraph<'static> {
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(card_block(title))
}

fn render_welcome(frame: &mut Frame, area: Rect, session: &ProposalSession) {
    let lines = vec![
        Line::from("✨"),
        Line::from(""),
        heading(format!("Merhaba {}", session.recipient())),
        Line::from(""),
        muted("[ Oyuna Başla ]"),
    ];
    frame.render_widget(paragraph(lines, "💕"), area);
}

fn render_riddle(frame: &mut Frame, area: Rect, session: &ProposalSession) {
    let spaced: String = session
        .display_phrase()
        .chars()
        .map(|c| format!("{c} "))
        .collect();
    let revealed = session.reveal().len();
    let reveal_button = if session.can_reveal() {
        "[ Harf Al ]"
    } else {
        "( Harf Al )"
    };
    let guess_button = if session.can_guess() {
        "[ Tahmin Et ]"
    } else {
        "( Tahmin Et )"
    };
    let draft = if session.guess_draft().is_empty() {
        Span::styled("Tahminini yaz...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(session.guess_draft().to_string())
    };

    let lines = vec![
        Line::from("❤️"),
        heading("Kalbimde iki küçük kelime yazsın 💕"),
        Line::from(""),
        Line::from(Span::styled(
            spaced.trim_end().to_string(),
            Style::default().fg(ROSE).add_modifier(Modifier::BOLD),
        )),
        muted(format!("Harfleri açarak kelimeyi tamamla! ({revealed}/{})", letter_count())),
        Line::from(""),
        Line::from(reveal_button),
        Line::from(""),
        muted("Ya da kelimeyi tahmin et:"),
        Line::from(vec![Span::raw("> "), draft]),
        Line::from(guess_button),
    ];
    frame.render_widget(paragraph(lines, "Bilmece"), area);
}

fn render_compliment(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from("✨"),
        heading("Aferin sana! 🌟"),
        Line::from(""),
        Line::from("Sen gerçekten çok zekisin! 🧠✨"),
        muted("Şimdi seni daha yakından görmek istiyorum..."),
        Line::from(""),
        Line::from("[ 📷 Devam Et ]"),
    ];
    frame.render_widget(paragraph(lines, "💕"), area);
}

fn render_camera(frame: &mut Frame, area: Rect, ctx: CardContext<'_>) {
    let preview = match (ctx.streaming, ctx.stream_label) {
        (true, Some(label)) => format!("📱 Kendinizi görebilirsiniz ({label})"),
        (true, None) => "📱 Kendinizi görebilirsiniz".to_string(),
        (false, _) => "⬛ Görüntü yok".to_string(),
    };
    let lines = vec![
        heading("Güzel bir fotoğraf çekelim! 📸"),
        Line::from(""),
        Line::from(preview),
        Line::from(""),
        muted("Kameranızı görebiliyor musunuz? Eğer görünmüyorsa kamera izinlerini kontrol edin."),
        Line::from(""),
        Line::from("[ ❤️ Fotoğraf Çek ]"),
        Line::from("[ Yedek: Fotoğraf Yükle ]"),
        muted("[ Kamerayı Yeniden Başlat ]"),
    ];
    frame.render_widget(paragraph(lines, "Kamera"), area);
}

fn render_overlay(frame: &mut Frame, area: Rect, session: &ProposalSession) {
    let detail = session
        .photo()
        .map(|photo| format!("🖼  {} ({} bytes)", photo.mime(), photo.as_str().len()))
        .unwrap_or_default();
    let lines = vec![
        heading("Çokk güzelsin! 😍"),
        Line::from(""),
        muted(detail),
        Line::from(""),
        Line::from(Span::styled(
            "Çokk güzelsin ✨",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(paragraph(lines, "📸"), area);
}

fn render_buildup(frame: &mut Frame, area: Rect, session: &ProposalSession) {
    let mut lines = vec![
        Line::from("❤️"),
        heading(format!("{}... 💕", session.recipient())),
        Line::from(""),
        Line::from("Seni ne kadar çok sevdiğimi biliyor musun?"),
    ];
    if session.show_buildup() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Ve şimdi sana özel bir sorum var... ❤️",
            Style::default().fg(ROSE),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("[ ❤️ Devam Et ]"));
    frame.render_widget(paragraph(lines, "💕"), area);
}

fn render_proposal(frame: &mut Frame, area: Rect, session: &ProposalSession, screen: &PlayScreen) {
    let block = card_block("💍");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(6)])
        .split(inner);

    let question = Paragraph::new(vec![
        Line::from("❤️"),
        heading(format!("{},", session.recipient())),
        Line::from("Seni çok seviyorum, benimle çıkar mısın? ❤️"),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(question, chunks[0]);

    let items: Vec<ListItem> = ProposalAnswer::all()
        .into_iter()
        .map(|answer| {
            let style = match answer {
                ProposalAnswer::Yes(_) => Style::default().fg(ROSE),
                ProposalAnswer::No => Style::default().fg(Color::DarkGray),
            };
            ListItem::new(Span::styled(answer.label(), style))
        })
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = *screen.answer_list();
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn render_celebration(frame: &mut Frame, area: Rect, session: &ProposalSession) {
    let mut lines = Vec::new();
    if session.show_main_heart() {
        lines.push(Line::from("💖"));
    }
    lines.extend([
        heading("🎉 Yaşasın! 🎉"),
        Line::from(""),
        Line::from(format!("Seni çok seviyorum {}! ❤️", session.recipient())),
        muted("En mutlu günümüz! 💕"),
        muted("Artık resmi olarak çiftiz! 🥰"),
        Line::from(""),
        Line::from("[ ✨ Tekrar Oyna ]"),
    ]);
    frame.render_widget(paragraph(lines, "🎉"), area);
}

/// Hearts along the top row, confetti along the bottom row.
fn render_particles(frame: &mut Frame, area: Rect, celebration: &Celebration) {
    if celebration.is_empty() || area.width == 0 || area.height < 2 {
        return;
    }
    let column = |left: f64| area.x + ((left / 100.0) * f64::from(area.width - 1)) as u16;
    let buf = frame.buffer_mut();

    for heart in celebration.hearts() {
        buf.set_string(column(heart.left), area.y, "❤", Style::default().fg(Color::Red));
    }
    let bottom = area.y + area.height - 1;
    for piece in celebration.confetti() {
        let (r, g, b) = piece.color.rgb();
        buf.set_string(column(piece.left), bottom, "■", Style::default().fg(Color::Rgb(r, g, b)));
    }
}

fn render_toast(frame: &mut Frame, area: Rect, toast: Option<&Toast>) {
    let Some(toast) = toast else {
        return;
    };
    let color = if toast.is_destructive() {
        Color::Red
    } else {
        Color::Green
    };
    let widget = Paragraph::new(vec![
        Line::from(Span::styled(
            toast.title.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(toast.description.clone()),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
    frame.render_widget(widget, area);
}
