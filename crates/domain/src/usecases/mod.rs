//! Use cases for the change-detection pipeline

pub mod check_loop;
pub mod diff;
pub mod normalize;
pub mod resolve;
pub mod summarize;

pub use check_loop::{CheckLoop, CheckLoopConfig, CheckLoopError, CheckMode};
pub use resolve::TitleResolver;
