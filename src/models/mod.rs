//! Data models and structures for the latency widget

pub mod config;
pub mod display;

// Re-export main model types
pub use config::Config;
pub use display::{DisplaySettings, DisplayState, Rgb};
