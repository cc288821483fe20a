//! CLI command handlers. Each command is in its own file.

mod output;
mod random;
mod range;
mod today;

pub use random::run_random;
pub use range::run_range;
pub use today::run_today;
