//! Breakout component vocabulary and storage bindings.
//!
//! Per-frame numeric data (position, velocity, collider) is packed so the
//! movement pass walks contiguous arrays. Rarely-present data is sparse.
//! Markers are tags.

use bagel_core::bagel_components;
use bytemuck::{Pod, Zeroable};

/// Screen position of the top-left corner, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Position {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position (grows downward).
    pub y: f32,
}

/// Displacement per frame, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    /// Horizontal speed.
    pub dx: f32,
    /// Vertical speed.
    pub dy: f32,
}

/// Axis-aligned extent, in pixels. Overlap testing belongs to the physics
/// layer; systems read the extent for wall bounces and paddle width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Collider {
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub height: f32,
}

/// Atlas entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpriteId {
    /// The ball.
    #[default]
    Ball,
    /// The paddle.
    Paddle,
    /// Intact blue brick.
    BrickBlue,
    /// Cracked blue brick.
    BrickBlueDamaged,
    /// Intact purple brick.
    BrickPurple,
    /// Cracked purple brick.
    BrickPurpleDamaged,
    /// Intact yellow brick.
    BrickYellow,
    /// Cracked yellow brick.
    BrickYellowDamaged,
    /// Intact orange brick.
    BrickOrange,
    /// Cracked orange brick.
    BrickOrangeDamaged,
    /// Laser bolt.
    Laser,
    /// Star pickup (laser power).
    Star,
    /// Heart pickup (wide paddle).
    Heart,
}

impl SpriteId {
    /// Intact brick color for a grid row, cycling through four colors.
    #[must_use]
    pub const fn brick_for_row(row: usize) -> Self {
        match row % 4 {
            0 => Self::BrickBlue,
            1 => Self::BrickPurple,
            2 => Self::BrickYellow,
            _ => Self::BrickOrange,
        }
    }

    /// The cracked variant of an intact brick; other sprites are unchanged.
    #[must_use]
    pub const fn damaged(self) -> Self {
        match self {
            Self::BrickBlue => Self::BrickBlueDamaged,
            Self::BrickPurple => Self::BrickPurpleDamaged,
            Self::BrickYellow => Self::BrickYellowDamaged,
            Self::BrickOrange => Self::BrickOrangeDamaged,
            other => other,
        }
    }
}

/// Which atlas entry to draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sprite {
    /// Atlas entry.
    pub id: SpriteId,
}

/// Hits a brick takes before breaking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrickHealth {
    /// Remaining hits.
    pub hits: i32,
}

impl Default for BrickHealth {
    fn default() -> Self {
        Self { hits: 1 }
    }
}

/// Key codes that steer a paddle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaddleControl {
    /// Key moving left.
    pub key_left: u32,
    /// Key moving right.
    pub key_right: u32,
}

/// Power-up kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowerUpKind {
    /// No effect.
    #[default]
    None,
    /// Paddle collider widens while active.
    WidePaddle,
    /// Paddle fires paired lasers while active.
    ShootingLaser,
}

/// The power-up an entity carries or grants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PowerUp {
    /// Effect kind.
    pub kind: PowerUpKind,
}

/// A running effect timer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimedEffect {
    /// Seconds until the effect expires.
    pub remaining: f32,
    /// Seconds until the effect may act again (laser fire rate).
    pub cooldown: f32,
}

impl TimedEffect {
    /// Effect lasting `seconds`, ready to act immediately.
    #[must_use]
    pub const fn lasting(seconds: f32) -> Self {
        Self {
            remaining: seconds,
            cooldown: 0.0,
        }
    }
}

/// Break animation clock for a brick with no hits left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BreakAnimation {
    /// Seconds since the brick broke.
    pub timer: f32,
}

/// Lives left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifeCount {
    /// Remaining lives.
    pub lives: i32,
}

impl Default for LifeCount {
    fn default() -> Self {
        Self { lives: 3 }
    }
}

/// Accumulated points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    /// Score value.
    pub points: i32,
}

/// Marks the ball.
#[derive(Clone, Copy, Debug, Default)]
pub struct BallTag;

/// Marks an entity for removal at the end of the frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct DestroyedTag;

/// Marks the floor below the paddle.
#[derive(Clone, Copy, Debug, Default)]
pub struct FloorTag;

/// Marks a laser bolt.
#[derive(Clone, Copy, Debug, Default)]
pub struct LaserTag;

/// Marks a star pickup.
#[derive(Clone, Copy, Debug, Default)]
pub struct StarPowerTag;

/// Marks a heart pickup.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeartPowerTag;

bagel_components! {
    Position => Packed,
    Velocity => Packed,
    Sprite => Packed,
    Collider => Packed,

    BrickHealth => Sparse,
    PaddleControl => Sparse,
    PowerUp => Sparse,
    TimedEffect => Sparse,
    BreakAnimation => Sparse,
    LifeCount => Sparse,
    Score => Sparse,

    BallTag => Tag,
    DestroyedTag => Tag,
    FloorTag => Tag,
    LaserTag => Tag,
    StarPowerTag => Tag,
    HeartPowerTag => Tag,
}
