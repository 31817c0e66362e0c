//! A small interactive command shell.
//!
//! Each line read by a [`Session`] is recorded in a bounded [`HistoryRing`],
//! split on whitespace, and either handled by one of the builtins (`cd`,
//! `pwd`, `exit`, `help`, `history`) or run as an external program found on
//! `PATH`.

pub mod builtins;
pub mod completion;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod launcher;
pub mod parser;
pub mod session;
pub mod util;

pub use builtins::ExitSignal;
pub use config::Config;
pub use error::ShellError;
pub use history::{HistoryEntry, HistoryRing};
pub use session::Session;
