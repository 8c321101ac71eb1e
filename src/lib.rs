// Library module for hsh
// Re-exports modules for use in integration tests and the binary

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod hash;
pub mod logging;
pub mod output;
