//! Proposal Game library - a stage-driven proposal flow
//!
//! A riddle over a fixed phrase, a camera snapshot with an upload fallback and
//! a proposal card with a celebration, modelled as an explicit state machine.
//!
//! # Architecture
//!
//! - **Game**: stages, puzzle, decorations, toasts and token-guarded timers
//! - **Media**: camera acquisition with ordered constraint fallback
//! - **Controller**: joins the session, the camera and the timer clock
//! - **TUI**: terminal cards for each stage
//!
//! # Example
//!
//! ```no_run
//! use proposal_game::{GameConfig, ProposalController, StillImageDevices, ToastLog};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GameConfig::default();
//! let devices = StillImageDevices::from_config(config.camera());
//! let mut controller = ProposalController::new(&config, devices, ToastLog::new());
//! controller.start()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod controller;
pub mod game;
pub mod media;
pub mod tui;

// Crate-level exports - Configuration
pub use config::{CameraConfig, ConfigError, GameConfig, TimingConfig};

// Crate-level exports - Controller
pub use controller::ProposalController;

// Crate-level exports - Game types
pub use game::{
    Celebration, GuessOutcome, Notifier, PositiveAnswer, ProposalAnswer, ProposalSession, Stage,
    Toast, ToastLog, TransitionError,
};

// Crate-level exports - Media types
pub use media::{FacingMode, MediaCapture, MediaDevices, MediaError, PhotoFile, StillImageDevices};

// Crate-level exports - Terminal UI
pub use tui::run_tui;
