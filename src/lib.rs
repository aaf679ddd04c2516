//! Summarizes a daily time log. Every line of the log says when a task started, the time until
//! the next line is the time spent on it. The summary is appended to the log and the booked hours
//! can be sent to Redmine.
//!

pub mod cli;
pub mod config;
pub mod fs;
pub mod remote;
pub mod timelog;
pub mod utils;
