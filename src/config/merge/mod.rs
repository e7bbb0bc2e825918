//! Source composition and defaults.

pub mod merge_policy;
pub mod service;
