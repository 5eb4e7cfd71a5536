//! Command implementations for the CLI.

mod check;
mod config;
mod devices;
mod stats;
mod watch;

pub use check::{CheckArgs, cmd_check};
pub use config::cmd_config;
pub use devices::cmd_devices;
pub use stats::{StatsArgs, cmd_stats};
pub use watch::{WatchArgs, cmd_watch};
