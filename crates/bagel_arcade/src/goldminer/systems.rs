//! Per-frame Gold Miner systems.

use bagel_core::{Entity, World};

use super::components::{
    Collectable, Collidable, GameTimer, Length, LifeTime, PlayerInfo, PlayerInput, Position,
    Renderable, RopeControl, RopeState, RoperTag, Rotation, Score, Value, Weight,
};
use super::{
    EXTEND_SPEED, RETRACT_SPEED, ROPE_ANCHOR, ROPE_MAX_LENGTH, ROPE_REST_LENGTH, SWING_LIMIT,
};
use crate::error::ArcadeResult;
use crate::physics::{detach_body, PhysicsBackend, PhysicsBody, PIXELS_PER_METER};

/// Lightest load the retract speed divides by.
const MIN_LOAD: f32 = 0.1;

/// Tip of a rope hanging from the winch at `angle` with `length`.
#[must_use]
pub fn rope_tip(angle: f32, length: f32) -> Position {
    let (anchor_x, anchor_y) = ROPE_ANCHOR;
    Position {
        x: anchor_x + length * angle.sin(),
        y: anchor_y + length * angle.cos(),
    }
}

/// Runs each rope's state machine.
///
/// - `AtRest`: swings between `±SWING_LIMIT`; a send request starts extension.
/// - `Extending`: grows until `ROPE_MAX_LENGTH` or a retract request.
/// - `Retracting`: shrinks at `RETRACT_SPEED / weight` of the hooked item;
///   at rest length the item is delivered to the owner's score.
///
/// The tip position follows angle and length, a hooked item rides on the
/// tip, and the tip body is given the velocity that matches the move.
///
/// # Errors
///
/// `UnknownBody` if a rope's body was destroyed behind its back.
pub fn rope_system<P: PhysicsBackend + ?Sized>(
    world: &mut World,
    physics: &mut P,
    dt: f32,
) -> ArcadeResult<()> {
    for rope in
        world.query_with::<(RoperTag, RopeControl, Rotation, Length, Position, PlayerInfo)>()
    {
        let player_id = world.get_component::<PlayerInfo>(rope).player_id;
        let input = take_input(world, player_id);
        let mut control = *world.get_component::<RopeControl>(rope);
        let mut length = world.get_component::<Length>(rope).value;
        if control.hooked.is_some_and(|item| !is_claimed_by(world, item, player_id)) {
            tracing::warn!("rope {} lost its hooked item", rope);
            control.hooked = None;
        }

        match control.state {
            RopeState::AtRest => {
                swing(world.get_component_mut::<Rotation>(rope), dt);
                if input.send_rope {
                    tracing::info!("player {} sends rope", player_id);
                    control.state = RopeState::Extending;
                }
            }
            RopeState::Extending => {
                length += EXTEND_SPEED * dt;
                if length >= ROPE_MAX_LENGTH || input.retract_rope {
                    length = length.min(ROPE_MAX_LENGTH);
                    control.state = RopeState::Retracting;
                }
            }
            RopeState::Retracting => {
                let load = control
                    .hooked
                    .and_then(|item| world.try_get::<Weight>(item).ok())
                    .map_or(1.0, |weight| weight.value.max(MIN_LOAD));
                length -= RETRACT_SPEED / load * dt;
                if length <= ROPE_REST_LENGTH {
                    length = ROPE_REST_LENGTH;
                    control.state = RopeState::AtRest;
                    if let Some(item) = control.hooked.take() {
                        deliver(world, player_id, item);
                    }
                }
            }
        }

        world.get_component_mut::<Length>(rope).value = length;
        *world.get_component_mut::<RopeControl>(rope) = control;

        let tip = rope_tip(world.get_component::<Rotation>(rope).angle, length);
        let previous = std::mem::replace(world.get_component_mut::<Position>(rope), tip);
        if let Some(item) = control.hooked {
            if let Ok(pos) = world.try_get_mut::<Position>(item) {
                *pos = tip;
            }
        }

        if dt > 0.0 {
            if let Ok(&PhysicsBody { body }) = world.try_get::<PhysicsBody>(rope) {
                let scale = dt * PIXELS_PER_METER;
                physics.set_velocity(body, (tip.x - previous.x) / scale, (tip.y - previous.y) / scale)?;
            }
        }
    }
    Ok(())
}

fn swing(rotation: &mut Rotation, dt: f32) {
    rotation.angle += rotation.angular_speed * dt;
    if rotation.angle.abs() >= SWING_LIMIT {
        rotation.angle = rotation.angle.clamp(-SWING_LIMIT, SWING_LIMIT);
        rotation.angular_speed = -rotation.angular_speed;
    }
}

/// Returns and clears the latched input of `player_id`.
fn take_input(world: &mut World, player_id: i32) -> PlayerInput {
    let player = world
        .query_with::<(PlayerInfo, PlayerInput)>()
        .into_iter()
        .find(|&e| world.get_component::<PlayerInfo>(e).player_id == player_id);
    match player {
        Some(player) => std::mem::take(world.get_component_mut::<PlayerInput>(player)),
        None => PlayerInput::default(),
    }
}

/// Whether `item` is still the hooked load of `player_id`: live, valued,
/// no longer collectable, and claimed by that player.
fn is_claimed_by(world: &World, item: Entity, player_id: i32) -> bool {
    world.is_alive(item)
        && world.has_component::<Value>(item)
        && !world.has_component::<Collectable>(item)
        && world
            .try_get::<PlayerInfo>(item)
            .is_ok_and(|info| info.player_id == player_id)
}

/// Credits the item's value to the player and queues the item's removal.
fn deliver(world: &mut World, player_id: i32, item: Entity) {
    let value = world.try_get::<Value>(item).map_or(0, |v| v.amount);

    let player = world
        .query_with::<(PlayerInfo, Score)>()
        .into_iter()
        .find(|&e| world.get_component::<PlayerInfo>(e).player_id == player_id);
    if let Some(player) = player {
        let score = world.get_component_mut::<Score>(player);
        score.points += value;
        tracing::info!(
            "player {} delivered {} worth {} (score {})",
            player_id,
            item,
            value,
            score.points
        );
    }
    world.commands().destroy(item);
}

/// Hooks items touched by an extending, empty rope.
///
/// The hooked item loses its body and its `Collectable` and `Collidable`
/// tags, is claimed by the rope's player, and the rope starts retracting.
/// An item is hooked by at most one rope. Returns the number of items
/// hooked.
///
/// # Errors
///
/// Registry errors from claiming the item.
pub fn hook_system<P: PhysicsBackend + ?Sized>(
    world: &mut World,
    physics: &mut P,
    contacts: &[(Entity, Entity)],
) -> ArcadeResult<usize> {
    let mut hooked = 0;
    for &(a, b) in contacts {
        for (rope, item) in [(a, b), (b, a)] {
            if !world.has_component::<RoperTag>(rope) || !world.has_component::<Collectable>(item) {
                continue;
            }
            let claimed = world
                .try_get::<PlayerInfo>(item)
                .is_ok_and(|info| info.player_id != PlayerInfo::UNOWNED);
            if claimed {
                continue;
            }
            let Ok(control) = world.try_get_mut::<RopeControl>(rope) else {
                continue;
            };
            if control.state != RopeState::Extending || control.hooked.is_some() {
                continue;
            }
            control.hooked = Some(item);
            control.state = RopeState::Retracting;

            let player_id = world.get_component::<PlayerInfo>(rope).player_id;
            detach_body(world, physics, item);
            world.remove_component::<Collectable>(item);
            world.remove_component::<Collidable>(item);
            world.add_component(item, PlayerInfo { player_id })?;

            tracing::info!("rope {} hooked item {}", rope, item);
            hooked += 1;
            break;
        }
    }
    Ok(hooked)
}

/// Counts round timers down, never below zero. Returns `true` if any timer
/// ran out during this call.
pub fn timer_system(world: &mut World, dt: f32) -> bool {
    let mut expired = false;
    for entity in world.query_with::<(GameTimer,)>() {
        let timer = world.get_component_mut::<GameTimer>(entity);
        let before = timer.time_left;
        timer.time_left = (before - dt).max(0.0);
        if before > 0.0 && timer.time_left == 0.0 {
            tracing::info!("round timer {} ran out", entity);
            expired = true;
        }
    }
    expired
}

/// Counts lifetimes down. Expired entities lose their body at once and are
/// queued for destruction. Returns the number expired.
pub fn lifetime_system<P: PhysicsBackend + ?Sized>(
    world: &mut World,
    physics: &mut P,
    dt: f32,
) -> usize {
    let mut expired = 0;
    for entity in world.query_with::<(LifeTime,)>() {
        let life = world.get_component_mut::<LifeTime>(entity);
        life.remaining -= dt;
        if life.remaining <= 0.0 {
            detach_body(world, physics, entity);
            world.commands().destroy(entity);
            expired += 1;
        }
    }
    expired
}

/// Copies body centers into sprite top-left positions.
///
/// Entities whose body no longer exists keep their last position.
pub fn physics_sync_system<P: PhysicsBackend + ?Sized>(world: &mut World, physics: &P) {
    for entity in world.query_with::<(PhysicsBody, Position, Renderable)>() {
        let body = world.get_component::<PhysicsBody>(entity).body;
        let Some(transform) = physics.transform(body) else {
            continue;
        };
        let sprite = *world.get_component::<Renderable>(entity);

        let pos = world.get_component_mut::<Position>(entity);
        pos.x = transform.x * PIXELS_PER_METER - sprite.width / 2.0;
        pos.y = transform.y * PIXELS_PER_METER - sprite.height / 2.0;
    }
}
