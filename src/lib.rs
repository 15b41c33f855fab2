//! seodash: operator dashboard for a local SEO tools backend.
//!
//! The [`app::Dashboard`] session ties together the activity log, the
//! backend dispatcher (direct HTTP or proxy relay), the connection monitor,
//! console commands and transient notifications. Front ends are the web
//! server in [`web`] and the terminal console in [`cli`].

pub mod activity;
pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod console;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod scheduler;
pub mod scoreboard;
pub mod web;
