//! Entity constructors. Items and ropes get a physics body on creation.

use bagel_core::{Entity, World};
use rand::Rng;

use super::components::{
    Collectable, Collidable, GameTimer, ItemKind, ItemType, Length, Name, PlayerInfo, PlayerInput,
    Position, Renderable, RopeControl, RoperTag, Rotation, Score, SpriteId, Value, Velocity,
    Weight,
};
use super::systems::rope_tip;
use super::{MYSTERY_BAG_VALUE, ROPE_REST_LENGTH, ROUND_SECONDS, SWING_SPEED};
use crate::error::ArcadeResult;
use crate::physics::{attach_body, BodyDef, BodyKind, PhysicsBackend, PIXELS_PER_METER};

/// Miner for `player_id`, at the winch.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_player(world: &mut World, player_id: i32) -> ArcadeResult<Entity> {
    let entity = world.spawn((
        Position { x: 570.0, y: 10.0 },
        Velocity::default(),
        Renderable {
            sprite: SpriteId::PlayerIdle,
            width: 160.0,
            height: 160.0,
        },
        PlayerInfo { player_id },
        Score::default(),
        PlayerInput::default(),
    ))?;
    Ok(entity)
}

/// Rope owned by `player_id`, hanging at rest with a dynamic body on its tip.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_rope<P: PhysicsBackend + ?Sized>(
    world: &mut World,
    physics: &mut P,
    player_id: i32,
) -> ArcadeResult<Entity> {
    let tip = rope_tip(0.0, ROPE_REST_LENGTH);
    let entity = world.spawn((
        tip,
        Rotation {
            angle: 0.0,
            angular_speed: SWING_SPEED,
        },
        Length {
            value: ROPE_REST_LENGTH,
        },
        RopeControl::default(),
        RoperTag,
        PlayerInfo { player_id },
        Collidable,
    ))?;

    let def = BodyDef {
        kind: BodyKind::Dynamic,
        x: tip.x / PIXELS_PER_METER,
        y: tip.y / PIXELS_PER_METER,
    };
    attach_body(world, physics, entity, def)?;
    Ok(entity)
}

/// Shared item layout: sprite-sized static body, unowned, hookable.
struct ItemSpec {
    kind: ItemKind,
    sprite: SpriteId,
    label: &'static str,
    width: f32,
    height: f32,
    value: i32,
    weight: f32,
}

fn create_item<P: PhysicsBackend + ?Sized>(
    world: &mut World,
    physics: &mut P,
    spec: &ItemSpec,
    x: f32,
    y: f32,
) -> ArcadeResult<Entity> {
    let entity = world.spawn((
        Position { x, y },
        Renderable {
            sprite: spec.sprite,
            width: spec.width,
            height: spec.height,
        },
        Collectable,
        ItemType { kind: spec.kind },
        Value { amount: spec.value },
        Weight { value: spec.weight },
        Collidable,
        PlayerInfo::default(),
    ))?;
    world.add_component(
        entity,
        Name {
            label: spec.label.to_owned(),
        },
    )?;

    let def = BodyDef::around_sprite(BodyKind::Static, x, y, spec.width, spec.height);
    attach_body(world, physics, entity, def)?;
    Ok(entity)
}

/// Gold nugget with its top-left corner at `(x, y)`.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_gold<P: PhysicsBackend + ?Sized>(
    world: &mut World,
    physics: &mut P,
    x: f32,
    y: f32,
) -> ArcadeResult<Entity> {
    let spec = ItemSpec {
        kind: ItemKind::Gold,
        sprite: SpriteId::Gold,
        label: "Gold",
        width: 60.0,
        height: 55.0,
        value: 100,
        weight: 1.0,
    };
    create_item(world, physics, &spec, x, y)
}

/// Rock with its top-left corner at `(x, y)`.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_rock<P: PhysicsBackend + ?Sized>(
    world: &mut World,
    physics: &mut P,
    x: f32,
    y: f32,
) -> ArcadeResult<Entity> {
    let spec = ItemSpec {
        kind: ItemKind::Rock,
        sprite: SpriteId::Rock,
        label: "Rock",
        width: 65.0,
        height: 55.0,
        value: 10,
        weight: 3.0,
    };
    create_item(world, physics, &spec, x, y)
}

/// Diamond with its top-left corner at `(x, y)`.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_diamond<P: PhysicsBackend + ?Sized>(
    world: &mut World,
    physics: &mut P,
    x: f32,
    y: f32,
) -> ArcadeResult<Entity> {
    let spec = ItemSpec {
        kind: ItemKind::Diamond,
        sprite: SpriteId::Diamond,
        label: "Diamond",
        width: 41.0,
        height: 32.0,
        value: 300,
        weight: 0.5,
    };
    create_item(world, physics, &spec, x, y)
}

/// Mystery bag at `(x, y)` whose value is rolled from `rng`.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_mystery_bag<P: PhysicsBackend + ?Sized, R: Rng>(
    world: &mut World,
    physics: &mut P,
    rng: &mut R,
    x: f32,
    y: f32,
) -> ArcadeResult<Entity> {
    let (low, high) = MYSTERY_BAG_VALUE;
    let spec = ItemSpec {
        kind: ItemKind::MysteryBag,
        sprite: SpriteId::MysteryBag,
        label: "Mystery Bag",
        width: 55.0,
        height: 60.0,
        value: rng.gen_range(low..=high),
        weight: 1.0,
    };
    create_item(world, physics, &spec, x, y)
}

/// Round clock.
///
/// # Errors
///
/// Capacity or registration errors.
pub fn create_timer(world: &mut World) -> ArcadeResult<Entity> {
    let entity = world.spawn((GameTimer {
        time_left: ROUND_SECONDS,
    },))?;
    Ok(entity)
}
