//! Session files and the session runner.

mod file;
mod runner;

pub use file::{PlaylistSpec, SessionFile};
pub use runner::{DjSession, SessionReport, SessionStats};
