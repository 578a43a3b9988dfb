//! # Core Error Types
//!
//! All errors that can occur in the entity/component substrate.
//!
//! Configuration errors (`TooManyComponents`, `RegistryFrozen`,
//! `CapacityExhausted`, `InvalidConfig`) mean the build is mis-sized.
//! Contract errors (`InvalidEntity`, `MissingComponent`) mean a caller
//! skipped a check that was always available to it. Neither kind is
//! recoverable; they are returned as values so the caller decides how to die.

use thiserror::Error;

use crate::ecs::Entity;

/// Errors that can occur in the core registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BagelError {
    /// More distinct component types than the configured limit.
    #[error("too many component types: limit is {limit}")]
    TooManyComponents {
        /// The configured limit.
        limit: usize,
    },

    /// A new component type was registered after the registry was frozen.
    #[error("component registry is frozen, cannot register {name}")]
    RegistryFrozen {
        /// Type name of the rejected component.
        name: &'static str,
    },

    /// Entity capacity exhausted with dynamic resizing disabled.
    #[error("entity capacity exhausted: capacity {capacity}, dynamic resize disabled")]
    CapacityExhausted {
        /// The fixed capacity.
        capacity: u32,
    },

    /// The identity is not live.
    #[error("invalid entity {entity}: not live (max id {max_id:?})")]
    InvalidEntity {
        /// The offending identity.
        entity: Entity,
        /// Current high-water mark, if any identity was ever allocated.
        max_id: Option<Entity>,
    },

    /// The entity does not have the requested component.
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        /// The entity that was queried.
        entity: Entity,
        /// Type name of the missing component.
        component: &'static str,
    },

    /// Invalid configuration file or values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for core operations.
pub type BagelResult<T> = Result<T, BagelError>;
