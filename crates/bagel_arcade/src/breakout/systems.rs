//! Per-frame Breakout systems.
//!
//! Every system walks a query snapshot, so it may attach or detach
//! components as it goes. Entities tagged [`DestroyedTag`] are already on
//! their way out and are skipped; [`destroy_system`] queues their removal
//! and the next `World::step` applies it.

use bagel_core::{Entity, World};

use super::components::{
    BallTag, BreakAnimation, BrickHealth, Collider, DestroyedTag, FloorTag, HeartPowerTag,
    LaserTag, PaddleControl, Position, PowerUp, PowerUpKind, Sprite, StarPowerTag, TimedEffect,
    Velocity,
};
use super::spawn::laser_bundle;
use super::{
    BREAK_ANIMATION_SECS, LASER_COOLDOWN, LASER_POWER_SECS, PADDLE_SPEED, PADDLE_WIDTH,
    SCREEN_WIDTH, WIDE_PADDLE_SECS, WIDE_PADDLE_WIDTH,
};
use crate::error::ArcadeResult;

/// Integrates velocity and bounces off the side and top walls.
///
/// Lasers never bounce; one that has fully left the top edge is tagged
/// for destruction.
///
/// # Errors
///
/// Registry errors from tagging.
pub fn movement_system(world: &mut World) -> ArcadeResult<()> {
    for entity in world.query_with::<(Position, Velocity, Collider)>() {
        if world.has_component::<DestroyedTag>(entity) {
            continue;
        }

        let size = *world.get_component::<Collider>(entity);
        let mut vel = *world.get_component::<Velocity>(entity);
        let mut pos = *world.get_component::<Position>(entity);
        pos.x += vel.dx;
        pos.y += vel.dy;

        if world.has_component::<LaserTag>(entity) {
            *world.get_component_mut::<Position>(entity) = pos;
            if pos.y + size.height < 0.0 {
                world.add_component(entity, DestroyedTag)?;
            }
            continue;
        }

        if pos.x < 0.0 || pos.x + size.width > SCREEN_WIDTH {
            tracing::debug!("entity {} hit side wall", entity);
            pos.x = pos.x.clamp(0.0, (SCREEN_WIDTH - size.width).max(0.0));
            vel.dx = -vel.dx;
        }
        if pos.y < 0.0 {
            tracing::debug!("entity {} hit top wall", entity);
            pos.y = 0.0;
            vel.dy = -vel.dy;
        }

        *world.get_component_mut::<Position>(entity) = pos;
        *world.get_component_mut::<Velocity>(entity) = vel;
    }
    Ok(())
}

/// Moves paddles while their keys are held, keeping them on screen.
pub fn paddle_control_system(world: &mut World, pressed: impl Fn(u32) -> bool) {
    for paddle in world.query_with::<(Position, PaddleControl)>() {
        let control = *world.get_component::<PaddleControl>(paddle);
        let width = world
            .try_get::<Collider>(paddle)
            .map_or(PADDLE_WIDTH, |collider| collider.width);

        let pos = world.get_component_mut::<Position>(paddle);
        if pressed(control.key_left) {
            pos.x -= PADDLE_SPEED;
        }
        if pressed(control.key_right) {
            pos.x += PADDLE_SPEED;
        }
        pos.x = pos.x.clamp(0.0, (SCREEN_WIDTH - width).max(0.0));
    }
}

/// Reacts to this frame's contact pairs.
///
/// Pairs may arrive in either order. A ball or laser reacts to at most one
/// contact per frame, the first one that applies.
///
/// | first  | second   | effect                                          |
/// |--------|----------|-------------------------------------------------|
/// | laser  | brick    | brick loses a hit, laser is destroyed           |
/// | ball   | brick    | brick loses a hit, ball bounces                 |
/// | ball   | paddle   | ball bounces                                    |
/// | ball   | floor    | ball is destroyed                               |
/// | ball   | star     | paddle gains lasers, star is destroyed, bounce  |
/// | ball   | heart    | paddle widens, heart is destroyed, bounce       |
///
/// # Errors
///
/// Registry errors from attaching components.
pub fn contact_system(world: &mut World, contacts: &[(Entity, Entity)]) -> ArcadeResult<()> {
    let mut handled: Vec<Entity> = Vec::new();

    for &(a, b) in contacts {
        for (first, second) in [(a, b), (b, a)] {
            if handled.contains(&first) || !in_play(world, first) || !in_play(world, second) {
                continue;
            }
            if react(world, first, second)? {
                handled.push(first);
                break;
            }
        }
    }
    Ok(())
}

fn in_play(world: &World, entity: Entity) -> bool {
    world.is_alive(entity) && !world.has_component::<DestroyedTag>(entity)
}

/// Applies the effect of `first` touching `second`. Returns `false` if the
/// pair has no meaning.
fn react(world: &mut World, first: Entity, second: Entity) -> ArcadeResult<bool> {
    let brick_intact = world
        .try_get::<BrickHealth>(second)
        .is_ok_and(|health| health.hits > 0);

    if world.has_component::<LaserTag>(first) {
        if !brick_intact {
            return Ok(false);
        }
        tracing::info!("laser {} hit brick {}", first, second);
        damage_brick(world, second)?;
        world.add_component(first, DestroyedTag)?;
        return Ok(true);
    }

    if !world.has_component::<BallTag>(first) {
        return Ok(false);
    }

    if world.has_component::<BrickHealth>(second) {
        if !brick_intact {
            return Ok(false);
        }
        tracing::info!("ball hit brick {}", second);
        damage_brick(world, second)?;
        bounce(world, first);
    } else if world.has_component::<PaddleControl>(second) {
        tracing::debug!("ball hit paddle");
        bounce(world, first);
    } else if world.has_component::<FloorTag>(second) {
        tracing::info!("ball {} hit the floor", first);
        world.add_component(first, DestroyedTag)?;
    } else if world.has_component::<StarPowerTag>(second) {
        tracing::info!("ball hit star, paddle gains laser power");
        grant_paddle(world, PowerUpKind::ShootingLaser, LASER_POWER_SECS)?;
        world.add_component(second, DestroyedTag)?;
        bounce(world, first);
    } else if world.has_component::<HeartPowerTag>(second) {
        tracing::info!("ball hit heart, paddle becomes wider");
        grant_paddle(world, PowerUpKind::WidePaddle, WIDE_PADDLE_SECS)?;
        world.add_component(second, DestroyedTag)?;
        bounce(world, first);
    } else {
        return Ok(false);
    }
    Ok(true)
}

fn bounce(world: &mut World, entity: Entity) {
    if let Ok(vel) = world.try_get_mut::<Velocity>(entity) {
        vel.dy = -vel.dy;
    }
}

/// Takes one hit off a brick; a brick with none left cracks and starts its
/// break animation.
fn damage_brick(world: &mut World, brick: Entity) -> ArcadeResult<()> {
    let health = world.get_component_mut::<BrickHealth>(brick);
    health.hits -= 1;
    if health.hits > 0 {
        return Ok(());
    }

    if let Ok(sprite) = world.try_get_mut::<Sprite>(brick) {
        sprite.id = sprite.id.damaged();
    }
    if !world.has_component::<BreakAnimation>(brick) {
        world.add_component(brick, BreakAnimation::default())?;
    }
    Ok(())
}

/// Gives the first paddle a timed power-up, replacing any running one.
fn grant_paddle(world: &mut World, kind: PowerUpKind, seconds: f32) -> ArcadeResult<()> {
    let Some(paddle) = world.query_with::<(PaddleControl,)>().first().copied() else {
        tracing::warn!("no paddle to receive {:?}", kind);
        return Ok(());
    };
    world.add_all(paddle, (PowerUp { kind }, TimedEffect::lasting(seconds)))?;
    Ok(())
}

/// Advances break animations; finished bricks are tagged for destruction.
///
/// # Errors
///
/// Registry errors from tagging.
pub fn break_animation_system(world: &mut World, dt: f32) -> ArcadeResult<()> {
    for brick in world.query_with::<(BreakAnimation,)>() {
        if world.has_component::<DestroyedTag>(brick) {
            continue;
        }
        let anim = world.get_component_mut::<BreakAnimation>(brick);
        anim.timer += dt;
        if anim.timer >= BREAK_ANIMATION_SECS {
            world.add_component(brick, DestroyedTag)?;
        }
    }
    Ok(())
}

/// Runs paddle power-ups.
///
/// The timer counts down by `dt`. On expiry the power-up and its timer are
/// removed and a widened paddle returns to its normal width. While active,
/// a laser power-up queues a pair of lasers every [`LASER_COOLDOWN`]
/// seconds and a wide power-up keeps the collider at its wide width.
///
/// # Errors
///
/// Registry errors.
pub fn power_up_system(world: &mut World, dt: f32) -> ArcadeResult<()> {
    for paddle in world.query_with::<(PowerUp, TimedEffect, Position, PaddleControl)>() {
        if world.has_component::<DestroyedTag>(paddle) {
            continue;
        }
        let kind = world.get_component::<PowerUp>(paddle).kind;

        let effect = world.get_component_mut::<TimedEffect>(paddle);
        effect.remaining -= dt;
        if effect.remaining <= 0.0 {
            tracing::info!("power-up {:?} expired on paddle {}", kind, paddle);
            if kind == PowerUpKind::WidePaddle {
                if let Ok(collider) = world.try_get_mut::<Collider>(paddle) {
                    collider.width = PADDLE_WIDTH;
                }
            }
            world.remove_component::<PowerUp>(paddle);
            world.remove_component::<TimedEffect>(paddle);
            continue;
        }

        match kind {
            PowerUpKind::ShootingLaser => {
                effect.cooldown -= dt;
                if effect.cooldown <= 0.0 {
                    effect.cooldown = LASER_COOLDOWN;
                    let pos = *world.get_component::<Position>(paddle);
                    tracing::debug!("paddle {} fires lasers", paddle);
                    let commands = world.commands();
                    commands.spawn(laser_bundle(pos.x + 10.0, pos.y));
                    commands.spawn(laser_bundle(pos.x + 80.0, pos.y));
                }
            }
            PowerUpKind::WidePaddle => {
                if let Ok(collider) = world.try_get_mut::<Collider>(paddle) {
                    if collider.width < WIDE_PADDLE_WIDTH {
                        collider.width = WIDE_PADDLE_WIDTH;
                        tracing::debug!("paddle {} widened", paddle);
                    }
                }
            }
            PowerUpKind::None => {}
        }
    }
    Ok(())
}

/// Queues destruction of every tagged entity. Returns how many were queued.
pub fn destroy_system(world: &World) -> usize {
    let doomed = world.query_with::<(DestroyedTag,)>();
    let commands = world.commands();
    for &entity in &doomed {
        commands.destroy(entity);
    }
    doomed.len()
}
