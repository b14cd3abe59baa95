//! LoopLog: a log-entry service over `sled` and a terminal dashboard for it.
pub mod app;
pub mod client;
pub mod config;
pub mod logging;
pub mod storage;
pub mod types;
pub mod ui;
pub mod web;
