//! # Entity Component System
//!
//! The storage and query substrate shared by every game system.
//!
//! ## Design Philosophy
//!
//! - An entity is a dense integer; its "kind" is which component bits are set
//! - Each component type is bound to one storage strategy at compile time
//! - Masks are the single source of truth for "does E have T"
//! - Structural changes found mid-iteration are deferred to `World::step`

mod bundle;
mod commands;
mod component;
mod entity;
mod mask;
mod storage;
mod world;

pub use bundle::{ComponentBundle, ComponentSet};
pub use commands::{Commands, StepReport};
pub use component::{Component, ComponentId, ComponentInfo, ComponentRegistry};
pub use entity::{Entity, EntityAllocator};
pub use mask::{Mask, MaskTable, MAX_COMPONENTS};
pub use storage::{PackedStorage, SparseStorage, Storage, StorageKind, TagStorage};
pub use world::World;
