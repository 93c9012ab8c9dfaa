//! Process-wide scheduler lifecycle.

pub mod global;

pub use global::{current, finalize, init, init_with, is_initialized};
