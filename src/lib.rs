//! Promptr - Prompt library manager with pinned favorites and clipboard copy
//!
//! This library exports the core modules for testing and potential reuse.

pub mod app;
pub mod clipboard;
pub mod dispatch;
pub mod logging;
pub mod models;
pub mod notices;
pub mod pins;
pub mod storage;
pub mod store;
