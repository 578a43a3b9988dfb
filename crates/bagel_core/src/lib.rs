//! # BAGEL Core
//!
//! Entity/component substrate for small 2D arcade games:
//! - Stable, recycled integer identities with optional capacity growth
//! - Per-type storages: tag (presence only), sparse, packed
//! - One component bitmask per entity, queried by superset test
//! - A deferred command queue flushed once per frame
//!
//! ## Rules
//!
//! 1. **Masks and storages never disagree** - every structural call updates both
//! 2. **No structural change mid-iteration** - record it, apply it at `step()`
//! 3. **Contract errors are loud** - reading an absent component panics
//!
//! ## Example
//!
//! ```rust,ignore
//! use bagel_core::{bagel_components, World};
//!
//! bagel_components! {
//!     Position => Packed,
//!     BallTag => Tag,
//! }
//!
//! let mut world = World::with_capacity(256);
//! let ball = world.spawn((Position { x: 0.0, y: 0.0 }, BallTag))?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod ecs;
pub mod error;

pub use config::WorldConfig;
pub use ecs::{
    Commands, Component, ComponentBundle, ComponentId, ComponentInfo, ComponentSet, Entity,
    Mask, PackedStorage, SparseStorage, StepReport, Storage, StorageKind, TagStorage, World,
    MAX_COMPONENTS,
};
pub use error::{BagelError, BagelResult};
