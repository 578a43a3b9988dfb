//! Entity constructors. Each returns the new identity.

use bagel_core::{BagelResult, Entity, World};

use super::components::{
    BallTag, BrickHealth, Collider, FloorTag, HeartPowerTag, LaserTag, LifeCount, PaddleControl,
    Position, PowerUp, PowerUpKind, Score, Sprite, SpriteId, StarPowerTag, TimedEffect, Velocity,
};
use super::{LASER_POWER_SECS, LASER_SPEED, PADDLE_WIDTH, SCREEN_WIDTH, WIDE_PADDLE_SECS};

const BALL_SCALE: f32 = 0.4;
const SPRITE_SCALE: f32 = 0.7;

const BRICK_WIDTH: f32 = 120.0;
const BRICK_HEIGHT: f32 = 40.0;
const BRICK_SPACING: f32 = 5.0;
const GRID_TOP: f32 = 80.0;

/// Vertical speed of a falling power-up.
const POWER_UP_FALL_SPEED: f32 = 2.0;

/// Ball near the center, moving diagonally.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_ball(world: &mut World) -> BagelResult<Entity> {
    world.spawn((
        Position { x: 400.0, y: 450.0 },
        Velocity { dx: 1.2, dy: 1.5 },
        Sprite { id: SpriteId::Ball },
        Collider {
            width: 87.0 * BALL_SCALE,
            height: 77.0 * BALL_SCALE,
        },
        BallTag,
    ))
}

/// Brick with `health` hits at `(x, y)`.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_brick(
    world: &mut World,
    health: i32,
    sprite: SpriteId,
    x: f32,
    y: f32,
) -> BagelResult<Entity> {
    world.spawn((
        Position { x, y },
        Sprite { id: sprite },
        Collider {
            width: 171.0 * SPRITE_SCALE,
            height: 59.0 * SPRITE_SCALE,
        },
        BrickHealth { hits: health },
    ))
}

/// Player paddle near the bottom edge, steered by the given key codes.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_paddle(world: &mut World, left: u32, right: u32) -> BagelResult<Entity> {
    world.spawn((
        Position { x: 320.0, y: 560.0 },
        Sprite {
            id: SpriteId::Paddle,
        },
        Collider {
            width: PADDLE_WIDTH,
            height: 55.0 * SPRITE_SCALE,
        },
        PaddleControl {
            key_left: left,
            key_right: right,
        },
    ))
}

/// Falling pickup granting `kind` when the ball touches it.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_power_up(world: &mut World, kind: PowerUpKind, x: f32, y: f32) -> BagelResult<Entity> {
    let entity = match kind {
        PowerUpKind::ShootingLaser => create_star(world, x, y)?,
        PowerUpKind::WidePaddle => create_heart(world, x, y)?,
        PowerUpKind::None => world.spawn((
            Position { x, y },
            Collider::default(),
        ))?,
    };
    let duration = match kind {
        PowerUpKind::ShootingLaser => LASER_POWER_SECS,
        PowerUpKind::WidePaddle => WIDE_PADDLE_SECS,
        PowerUpKind::None => 0.0,
    };
    world.add_all(
        entity,
        (
            Velocity {
                dx: 0.0,
                dy: POWER_UP_FALL_SPEED,
            },
            PowerUp { kind },
            TimedEffect::lasting(duration),
        ),
    )?;
    Ok(entity)
}

/// Static star pickup.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_star(world: &mut World, x: f32, y: f32) -> BagelResult<Entity> {
    world.spawn((
        Position { x, y },
        Sprite { id: SpriteId::Star },
        Collider {
            width: 84.0 * SPRITE_SCALE,
            height: 73.0 * SPRITE_SCALE,
        },
        StarPowerTag,
    ))
}

/// Static heart pickup.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_heart(world: &mut World, x: f32, y: f32) -> BagelResult<Entity> {
    world.spawn((
        Position { x, y },
        Sprite { id: SpriteId::Heart },
        Collider {
            width: 84.0 * SPRITE_SCALE,
            height: 73.0 * SPRITE_SCALE,
        },
        HeartPowerTag,
    ))
}

/// The components of a laser bolt, for immediate or deferred spawning.
pub(crate) fn laser_bundle(x: f32, y: f32) -> (Position, Velocity, Sprite, Collider, LaserTag) {
    (
        Position { x, y },
        Velocity {
            dx: 0.0,
            dy: -LASER_SPEED,
        },
        Sprite { id: SpriteId::Laser },
        Collider {
            width: 11.0,
            height: 22.0,
        },
        LaserTag,
    )
}

/// Laser bolt travelling upward from `(x, y)`.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_laser(world: &mut World, x: f32, y: f32) -> BagelResult<Entity> {
    world.spawn(laser_bundle(x, y))
}

/// Bottom strip that swallows the ball.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_floor(world: &mut World) -> BagelResult<Entity> {
    world.spawn((
        Position { x: 0.0, y: 590.0 },
        Collider {
            width: SCREEN_WIDTH,
            height: 10.0,
        },
        FloorTag,
    ))
}

/// Holder for the score and lives shown in the HUD.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_ui_manager(world: &mut World) -> BagelResult<Entity> {
    world.spawn((LifeCount::default(), Score::default()))
}

/// Centered `rows` x `cols` grid of bricks. The middle column holds a star
/// on row 2 and a heart on row 3; every other cell is a brick of `health`.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_brick_grid(
    world: &mut World,
    rows: usize,
    cols: usize,
    health: i32,
) -> BagelResult<Vec<Entity>> {
    let total_width = cols as f32 * BRICK_WIDTH + cols.saturating_sub(1) as f32 * BRICK_SPACING;
    let left = (SCREEN_WIDTH - total_width) / 2.0;

    let mut created = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let x = left + col as f32 * (BRICK_WIDTH + BRICK_SPACING);
            let y = GRID_TOP + row as f32 * (BRICK_HEIGHT + BRICK_SPACING);
            let entity = match (row, col == cols / 2) {
                (2, true) => create_star(world, x, y)?,
                (3, true) => create_heart(world, x, y)?,
                _ => create_brick(world, health, SpriteId::brick_for_row(row), x, y)?,
            };
            created.push(entity);
        }
    }
    Ok(created)
}
