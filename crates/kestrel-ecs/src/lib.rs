//! Kestrel ECS - Entity Component System runtime
//!
//! A single-threaded ECS built around a dual-index component store:
//! entities are opaque UUID tokens, components are plain data records
//! classified by type identity, and systems are ticked in registration
//! order by a cooperative frame loop with a pluggable scheduler.

mod component;
mod entity;
mod error;
mod scheduler;
mod store;
mod system;
mod world;

pub use kestrel_core::{EntityId, FramePacing};

pub use component::{Component, ComponentKind};
pub use entity::{EntityMut, EntityRef};
pub use error::EcsError;
pub use scheduler::{FrameScheduler, ManualScheduler, TickHandle, TickScheduler};
pub use store::ComponentStore;
pub use system::{System, SystemId};
pub use world::World;
