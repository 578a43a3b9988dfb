//! Gold Miner component vocabulary and storage bindings.

use bagel_core::{bagel_components, Entity};
use bytemuck::{Pod, Zeroable};

/// Screen position of the top-left corner, in pixels. For a rope this is
/// the hook tip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Position {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position (grows downward).
    pub y: f32,
}

/// Pixels per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    /// Horizontal speed.
    pub dx: f32,
    /// Vertical speed.
    pub dy: f32,
}

/// Sprite sheet entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpriteId {
    /// Gold nugget.
    #[default]
    Gold,
    /// Rock.
    Rock,
    /// Diamond.
    Diamond,
    /// Mystery bag.
    MysteryBag,
    /// Miner at rest.
    PlayerIdle,
}

/// What to draw and its size in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Renderable {
    /// Sprite sheet entry.
    pub sprite: SpriteId,
    /// Drawn width.
    pub width: f32,
    /// Drawn height.
    pub height: f32,
}

/// Player ownership. Items start unowned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct PlayerInfo {
    /// Owning player, or [`PlayerInfo::UNOWNED`].
    pub player_id: i32,
}

impl PlayerInfo {
    /// Marker for entities no player owns.
    pub const UNOWNED: i32 = -1;
}

impl Default for PlayerInfo {
    fn default() -> Self {
        Self {
            player_id: Self::UNOWNED,
        }
    }
}

/// A player's collected value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Score {
    /// Points so far.
    pub points: i32,
}

/// Points an item is worth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Value {
    /// Points on delivery.
    pub amount: i32,
}

/// Load factor while reeling in; retract speed divides by it.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Weight {
    /// Relative weight, 1.0 for gold.
    pub value: f32,
}

impl Default for Weight {
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

/// Seconds an entity has left before removal.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct LifeTime {
    /// Remaining seconds.
    pub remaining: f32,
}

impl Default for LifeTime {
    fn default() -> Self {
        Self { remaining: 1.5 }
    }
}

/// Rope swing angle. Zero points straight down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    /// Angle in radians, positive swings toward +X.
    pub angle: f32,
    /// Swing speed in radians per second; the sign is the direction.
    pub angular_speed: f32,
}

/// Rope length from anchor to tip, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Length {
    /// Current length.
    pub value: f32,
}

/// Rope phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RopeState {
    /// Swinging, waiting for the player.
    #[default]
    AtRest,
    /// Shooting out along the current angle.
    Extending,
    /// Reeling back, possibly with an item.
    Retracting,
}

/// Rope state machine and what it carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RopeControl {
    /// Current phase.
    pub state: RopeState,
    /// Item being reeled in.
    pub hooked: Option<Entity>,
}

/// Item kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ItemKind {
    /// Mid value, normal weight.
    #[default]
    Gold,
    /// Low value, heavy.
    Rock,
    /// High value, light.
    Diamond,
    /// Value rolled at creation.
    MysteryBag,
}

/// The kind of a collectable item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemType {
    /// Item kind.
    pub kind: ItemKind,
}

/// Seconds left in the round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameTimer {
    /// Remaining seconds, never negative.
    pub time_left: f32,
}

impl Default for GameTimer {
    fn default() -> Self {
        Self { time_left: 60.0 }
    }
}

/// Latched player requests, consumed by the rope system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerInput {
    /// Fire the rope.
    pub send_rope: bool,
    /// Start reeling in early.
    pub retract_rope: bool,
}

/// Display label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Name {
    /// Label text.
    pub label: String,
}

/// Marks an item the rope can hook.
#[derive(Clone, Copy, Debug, Default)]
pub struct Collectable;

/// Marks a rope.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoperTag;

/// Marks an entity that takes part in contacts.
#[derive(Clone, Copy, Debug, Default)]
pub struct Collidable;

bagel_components! {
    Position => Packed,
    Velocity => Packed,
    Renderable => Packed,
    PlayerInfo => Packed,
    Score => Packed,
    Value => Packed,
    Weight => Packed,
    LifeTime => Packed,

    Rotation => Sparse,
    Length => Sparse,
    RopeControl => Sparse,
    ItemType => Sparse,
    GameTimer => Sparse,
    PlayerInput => Sparse,
    Name => Sparse,

    Collectable => Tag,
    RoperTag => Tag,
    Collidable => Tag,
}
