//! Daemon and cli that count how many seconds of focused attention go into every web domain,
//! classify domains as productive, unproductive or neutral, and keep a rolling weekly summary.
//! Browser integrations report focus changes over a local socket; the cli reads the results.
//!

pub mod cli;
pub mod daemon;
pub mod fs;
pub mod tracking;
pub mod utils;
