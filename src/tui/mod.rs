//! Terminal front-end: one card per stage, keyboard driven.

mod cards;
mod input;
mod toast_bar;

pub use cards::{CardContext, draw};
pub use input::{PlayScreen, UiAction};
pub use toast_bar::{TOAST_TTL, ToastBar};

use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use tokio::time::{Duration, Instant};
use tracing::{debug, error, info, instrument};
use tracing_subscriber::EnvFilter;

use crate::config::GameConfig;
use crate::controller::ProposalController;
use crate::game::Notifier;
use crate::media::{MediaDevices, StillImageDevices};

/// Log file written while the terminal is owned by the UI.
pub const LOG_FILE: &str = "proposal_game.log";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,proposal_game=debug";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the proposal flow in the terminal until the player quits.
pub async fn run_tui(config: GameConfig) -> Result<()> {
    // Logging goes to a file so it does not draw over the cards.
    let log_file = std::fs::File::create(LOG_FILE)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(recipient = %config.recipient(), "Starting proposal TUI");

    let devices = StillImageDevices::from_config(config.camera());
    let mut controller = ProposalController::new(&config, devices, ToastBar::new());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_loop(&mut terminal, &mut controller).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    res
}

/// Draws, waits for a key or the next timer, and applies the key.
#[instrument(skip_all)]
async fn run_loop<B, D>(
    terminal: &mut Terminal<B>,
    controller: &mut ProposalController<D, ToastBar>,
) -> Result<()>
where
    B: Backend,
    <B as Backend>::Error: Send + Sync + 'static,
    D: MediaDevices,
{
    let mut screen = PlayScreen::new();

    loop {
        controller.fire_due(Instant::now());
        let wall = std::time::Instant::now();
        controller.notifier_mut().prune(wall);

        let stream_label = controller
            .capture()
            .sink()
            .map(|sink| sink.profile().to_string());
        terminal.draw(|f| {
            let ctx = CardContext {
                toast: controller.notifier().current(wall),
                streaming: controller.capture().is_streaming(),
                stream_label: stream_label.as_deref(),
            };
            draw(f, controller.session(), &screen, ctx);
        })?;

        let timeout = controller.next_deadline().map_or(POLL_INTERVAL, |deadline| {
            deadline
                .saturating_duration_since(Instant::now())
                .min(POLL_INTERVAL)
        });

        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
        {
            // Skip key release events (crossterm fires both press and release).
            if key.kind == KeyEventKind::Release {
                continue;
            }

            let action = screen.handle_key(key, controller.session());
            if action == UiAction::Quit {
                info!("Leaving TUI");
                return Ok(());
            }
            apply(controller, action).await;
        }
    }
}

/// Forwards a UI action to the controller; rejected actions are logged and dropped.
async fn apply<D: MediaDevices, N: Notifier>(
    controller: &mut ProposalController<D, N>,
    action: UiAction,
) {
    let result = match action {
        UiAction::Stay | UiAction::Quit => Ok(()),
        UiAction::Start => controller.start(),
        UiAction::RevealLetter => controller.reveal_letter().map(|_| ()),
        UiAction::SetGuess(text) => {
            controller.set_guess_draft(text);
            Ok(())
        }
        UiAction::SubmitGuess => controller.submit_draft().map(|_| ()),
        UiAction::StartCamera => controller.start_camera().await,
        UiAction::CapturePhoto => controller.capture_photo(),
        UiAction::Upload(path) => controller.upload_from_path(&path).await,
        UiAction::ContinueBuildup => controller.continue_buildup(),
        UiAction::Answer(answer) => controller.answer(answer),
        UiAction::Restart => controller.restart(),
    };

    if let Err(error) = result {
        debug!(%error, "Action ignored");
    }
}
