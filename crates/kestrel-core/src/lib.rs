//! Kestrel Core - Foundational types for the Kestrel ECS runtime
//!
//! This crate provides the types shared by the engine and its consumers:
//! - Entity identifiers (UUID-backed, never recycled)
//! - Frame pacing for frame-synchronized tick scheduling

pub mod time;
pub mod types;

pub use time::{FramePacing, PacingError};
pub use types::EntityId;
