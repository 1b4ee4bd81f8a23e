//! # timers-rs
//!
//! `timers-rs` keeps named timers ("trackers") in a plain text file. Each tracker is a list of
//! start/stop intervals; the last one may still be running.
//!
//! The file holds one tracker per line, a label followed by RFC 3339 timestamps taken in pairs:
//!
//! ```text
//! work 2012-11-01T22:08:41+00:00 2012-11-01T22:20:41+00:00 2012-12-02T22:08:41+00:00
//! ```
//!
//! Usage example:
//!
//!     use chrono::Utc;
//!     use timers_rs::command::{execute, Action, Command, Outcome};
//!     use timers_rs::store::Strictness;
//!
//!     let command = Command::new(Action::Create, Some("work".to_string()));
//!     let outcome = execute("", &command, Strictness::Strict, Utc::now()).unwrap();
//!     if let Outcome::Updated { text, message } = outcome {
//!         println!("{message}");
//!         assert!(text.starts_with("work "));
//!     }

/// Trackers, their intervals and the durations computed from them
pub mod data;

/// Reading and writing the store, in memory and on disk
pub mod store;

/// Format data depending on what needs to be displayed
pub mod formatter;

pub mod cli;
pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;

pub use error::TimerError;
