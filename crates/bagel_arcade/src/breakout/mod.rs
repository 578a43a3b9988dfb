//! # Breakout
//!
//! A paddle, one ball, a grid of bricks, and two pickups: the star grants
//! paired lasers, the heart widens the paddle. Per-frame order:
//!
//! ```rust,ignore
//! paddle_control_system(&mut world, |key| keyboard.pressed(key))?;
//! movement_system(&mut world)?;
//! contact_system(&mut world, &contacts)?;
//! break_animation_system(&mut world, dt)?;
//! power_up_system(&mut world, dt)?;
//! destroy_system(&world);
//! world.step()?;
//! ```

mod components;
mod spawn;
mod systems;

pub use components::{
    BallTag, BreakAnimation, BrickHealth, Collider, DestroyedTag, FloorTag, HeartPowerTag,
    LaserTag, LifeCount, PaddleControl, Position, PowerUp, PowerUpKind, Score, Sprite, SpriteId,
    StarPowerTag, TimedEffect, Velocity,
};
pub use spawn::{
    create_ball, create_brick, create_brick_grid, create_floor, create_heart, create_laser,
    create_paddle, create_power_up, create_star, create_ui_manager,
};
pub use systems::{
    break_animation_system, contact_system, destroy_system, movement_system,
    paddle_control_system, power_up_system,
};

/// Playfield width in pixels.
pub const SCREEN_WIDTH: f32 = 800.0;

/// Playfield height in pixels.
pub const SCREEN_HEIGHT: f32 = 600.0;

/// Paddle collider width at rest.
pub const PADDLE_WIDTH: f32 = 161.0 * 0.7;

/// Paddle collider width while the wide power-up runs.
pub const WIDE_PADDLE_WIDTH: f32 = 161.0 * 1.5;

/// Paddle travel per frame while a key is held.
pub const PADDLE_SPEED: f32 = 5.0;

/// Seconds a broken brick animates before removal.
pub const BREAK_ANIMATION_SECS: f32 = 0.555;

/// Seconds between laser volleys.
pub const LASER_COOLDOWN: f32 = 0.05;

/// Upward laser travel per frame.
pub const LASER_SPEED: f32 = 6.0;

/// Duration of the star's laser power.
pub const LASER_POWER_SECS: f32 = 0.8;

/// Duration of the heart's wide paddle.
pub const WIDE_PADDLE_SECS: f32 = 2.0;
