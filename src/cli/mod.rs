pub mod args;
pub mod commands;
pub mod interactive;

pub use args::{Cli, Commands};
pub use commands::run;
pub use interactive::{InteractiveDashboard, Outcome, SessionCommand};
