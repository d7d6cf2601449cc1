//! Key handling for the card screen.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_getters::Getters;
use ratatui::widgets::ListState;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

use crate::game::{PositiveAnswer, ProposalAnswer, ProposalSession, Stage};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Nothing to do.
    Stay,
    /// Leave the program.
    Quit,
    /// "Oyuna Başla".
    Start,
    /// "Harf Al".
    RevealLetter,
    /// Replace the guess field.
    SetGuess(String),
    /// "Tahmin Et".
    SubmitGuess,
    /// "Devam Et" on the compliment card, or "Kamerayı Yeniden Başlat".
    StartCamera,
    /// "Fotoğraf Çek".
    CapturePhoto,
    /// Read the image at this path and upload it.
    Upload(PathBuf),
    /// "Devam Et" on the buildup card.
    ContinueBuildup,
    /// A proposal button.
    Answer(ProposalAnswer),
    /// "Tekrar Oyna".
    Restart,
}

/// Per-screen input state: the proposal button cursor and the upload prompt.
#[derive(Debug, Getters)]
pub struct PlayScreen {
    answer_list: ListState,
    upload_prompt: Option<String>,
}

impl PlayScreen {
    /// Creates the screen with the first button selected.
    pub fn new() -> Self {
        let mut answer_list = ListState::default();
        answer_list.select(Some(0));
        Self {
            answer_list,
            upload_prompt: None,
        }
    }

    /// Maps a key press to an action for the current stage.
    #[instrument(skip(self, session), fields(stage = %session.stage()))]
    pub fn handle_key(&mut self, key: KeyEvent, session: &ProposalSession) -> UiAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            info!("Quit requested");
            return UiAction::Quit;
        }
        if self.upload_prompt.is_some() {
            return self.handle_prompt_key(key);
        }
        if key.code == KeyCode::Esc {
            info!("Quit requested");
            return UiAction::Quit;
        }

        match session.stage() {
            Stage::Welcome => match key.code {
                KeyCode::Enter => UiAction::Start,
                _ => UiAction::Stay,
            },
            Stage::Riddle => Self::handle_riddle_key(key, session.guess_draft()),
            Stage::Compliment => match key.code {
                KeyCode::Enter => UiAction::StartCamera,
                KeyCode::Char('u') => self.open_prompt(),
                _ => UiAction::Stay,
            },
            Stage::Camera => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => UiAction::CapturePhoto,
                KeyCode::Char('u') => self.open_prompt(),
                KeyCode::Char('r') => UiAction::StartCamera,
                _ => UiAction::Stay,
            },
            Stage::PhotoOverlay => UiAction::Stay,
            Stage::Buildup => match key.code {
                KeyCode::Enter => UiAction::ContinueBuildup,
                _ => UiAction::Stay,
            },
            Stage::Proposal => self.handle_proposal_key(key),
            Stage::Celebration => match key.code {
                KeyCode::Enter => UiAction::Restart,
                _ => UiAction::Stay,
            },
        }
    }

    fn handle_riddle_key(key: KeyEvent, draft: &str) -> UiAction {
        match key.code {
            KeyCode::Tab => UiAction::RevealLetter,
            KeyCode::Enter => UiAction::SubmitGuess,
            KeyCode::Backspace => {
                let mut draft = draft.to_string();
                draft.pop();
                UiAction::SetGuess(draft)
            }
            KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
                UiAction::SetGuess(format!("{draft}{c}"))
            }
            _ => UiAction::Stay,
        }
    }

    fn handle_proposal_key(&mut self, key: KeyEvent) -> UiAction {
        let answers = ProposalAnswer::all();
        match key.code {
            KeyCode::Up => {
                let i = match self.answer_list.selected() {
                    Some(i) if i > 0 => i - 1,
                    _ => answers.len() - 1,
                };
                self.answer_list.select(Some(i));
                UiAction::Stay
            }
            KeyCode::Down => {
                let i = self
                    .answer_list
                    .selected()
                    .map_or(0, |i| (i + 1) % answers.len());
                self.answer_list.select(Some(i));
                UiAction::Stay
            }
            KeyCode::Enter => {
                let idx = self.answer_list.selected().unwrap_or(0);
                match answers.get(idx) {
                    Some(answer) => self.answered(*answer),
                    None => UiAction::Stay,
                }
            }
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                match PositiveAnswer::iter().nth(idx) {
                    Some(positive) => self.answered(ProposalAnswer::Yes(positive)),
                    None => UiAction::Stay,
                }
            }
            KeyCode::Char('n') | KeyCode::Char('h') => self.answered(ProposalAnswer::No),
            _ => UiAction::Stay,
        }
    }

    fn answered(&mut self, answer: ProposalAnswer) -> UiAction {
        self.answer_list.select(Some(0));
        UiAction::Answer(answer)
    }

    fn open_prompt(&mut self) -> UiAction {
        debug!("Opening upload prompt");
        self.upload_prompt = Some(String::new());
        UiAction::Stay
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> UiAction {
        let Some(path) = self.upload_prompt.as_mut() else {
            return UiAction::Stay;
        };
        match key.code {
            KeyCode::Esc => {
                debug!("Upload prompt dismissed");
                self.upload_prompt = None;
                UiAction::Stay
            }
            KeyCode::Enter => {
                let path = path.trim().to_string();
                self.upload_prompt = None;
                if path.is_empty() {
                    UiAction::Stay
                } else {
                    UiAction::Upload(PathBuf::from(path))
                }
            }
            KeyCode::Backspace => {
                path.pop();
                UiAction::Stay
            }
            KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
                path.push(c);
                UiAction::Stay
            }
            _ => UiAction::Stay,
        }
    }
}

impl Default for PlayScreen {
    fn default() -> Self {
        Self::new()
    }
}
