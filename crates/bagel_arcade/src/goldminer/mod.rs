//! # Gold Miner
//!
//! A rope hangs from the miner's winch and swings. On request it shoots out
//! along its current angle, hooks the first collectable it touches, and
//! reels back at a speed divided by the item's weight. Delivering the item
//! adds its value to the owner's score.
//!
//! Items and the rope tip carry physics bodies; contacts come back from the
//! backend as body pairs. Per-frame order:
//!
//! ```rust,ignore
//! physics.step(dt);
//! let contacts = resolve_contacts(&world, &mut physics);
//! hook_system(&mut world, &mut physics, &contacts)?;
//! rope_system(&mut world, &mut physics, dt)?;
//! physics_sync_system(&mut world, &physics);
//! timer_system(&mut world, dt);
//! lifetime_system(&mut world, &mut physics, dt);
//! world.step()?;
//! ```

mod components;
mod spawn;
mod systems;

pub use components::{
    Collectable, Collidable, GameTimer, ItemKind, ItemType, Length, LifeTime, Name, PlayerInfo,
    PlayerInput, Position, Renderable, RopeControl, RopeState, RoperTag, Rotation, Score,
    SpriteId, Value, Velocity, Weight,
};
pub use spawn::{
    create_diamond, create_gold, create_mystery_bag, create_player, create_rock, create_rope,
    create_timer,
};
pub use systems::{
    hook_system, lifetime_system, physics_sync_system, rope_system, rope_tip, timer_system,
};

/// Winch position the rope hangs from, in pixels.
pub const ROPE_ANCHOR: (f32, f32) = (623.0, 100.0);

/// Rope length while swinging.
pub const ROPE_REST_LENGTH: f32 = 120.0;

/// Rope length at which extension turns around.
pub const ROPE_MAX_LENGTH: f32 = 600.0;

/// Largest swing angle either side of vertical, in radians.
pub const SWING_LIMIT: f32 = 1.2;

/// Swing speed in radians per second.
pub const SWING_SPEED: f32 = 1.5;

/// Extension speed in pixels per second.
pub const EXTEND_SPEED: f32 = 300.0;

/// Retraction speed with no load, in pixels per second.
pub const RETRACT_SPEED: f32 = 300.0;

/// Length of a round in seconds.
pub const ROUND_SECONDS: f32 = 60.0;

/// Smallest and largest value a mystery bag can roll.
pub const MYSTERY_BAG_VALUE: (i32, i32) = (50, 500);
