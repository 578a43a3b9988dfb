//! # BAGEL Arcade
//!
//! Two small games expressed on the BAGEL entity/component core:
//! - [`breakout`]: paddle, ball, bricks, power-ups and lasers
//! - [`goldminer`]: a swinging rope that hooks and reels in items
//!
//! Each game defines its own component vocabulary and binds every type to a
//! storage strategy with [`bagel_core::bagel_components!`]. Systems are plain
//! functions taking `&mut World`; they walk mask-query snapshots and push
//! identity retirement through the command queue, so one `World::step` per
//! frame applies every destruction.
//!
//! Shape geometry, rendering and audio live outside this crate. Contacts
//! arrive as entity pairs, either scripted or mapped from an external
//! engine through [`physics::PhysicsBackend`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod breakout;
pub mod error;
pub mod goldminer;
pub mod physics;

pub use error::{ArcadeError, ArcadeResult};
