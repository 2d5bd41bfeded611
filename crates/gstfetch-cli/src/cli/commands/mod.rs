//! CLI command handlers, one file per command.

mod checksum;
mod completions;
mod fetch;
mod setup;
mod verify;

pub use checksum::run_checksum;
pub use completions::run_completions;
pub use fetch::run_fetch;
pub use setup::{acquire, run_setup};
pub use verify::run_verify;
