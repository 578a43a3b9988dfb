//! # Arcade Error Types

use bagel_core::BagelError;
use thiserror::Error;

use crate::physics::BodyId;

/// Errors raised by game systems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArcadeError {
    /// A registry call failed.
    #[error(transparent)]
    Core(#[from] BagelError),

    /// The physics backend has no body with this handle.
    #[error("unknown physics body {body}")]
    UnknownBody {
        /// The stale or foreign handle.
        body: BodyId,
    },
}

/// Result type for game systems.
pub type ArcadeResult<T> = Result<T, ArcadeError>;
