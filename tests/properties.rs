//! Property tests for Housekeeper.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "only direct children are reported".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/direct_child.rs"]
mod direct_child;

#[path = "properties/root_resolution.rs"]
mod root_resolution;
