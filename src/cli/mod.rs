//! Command line front-end.
//!
//! Stands in for the menu pages: `add` plays the role of an "add to cart"
//! button, the other subcommands act on the cart drawer. Cart lines are
//! addressed by their 1-based position as printed by `show`.

pub mod args;
pub mod session;
pub mod terminal;

pub use args::{AddArgs, Cli, Command};
pub use session::Session;
pub use terminal::TerminalObserver;
