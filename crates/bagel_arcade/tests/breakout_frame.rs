//! # Breakout Frame Tests
//!
//! Drives whole frames through the systems with scripted contact pairs
//! and checks what survives each `step()`.
//!
//! Run with: cargo test -p bagel_arcade --test breakout_frame

use bagel_arcade::breakout::{
    break_animation_system, contact_system, create_ball, create_brick, create_brick_grid,
    create_floor, create_paddle, create_ui_manager, destroy_system, movement_system,
    power_up_system, BallTag, BreakAnimation, BrickHealth, DestroyedTag, LaserTag, LifeCount,
    PaddleControl, Position, PowerUp, PowerUpKind, Score, Sprite, SpriteId, StarPowerTag,
    TimedEffect, Velocity, BREAK_ANIMATION_SECS,
};
use bagel_core::{Entity, World};

struct Board {
    world: World,
    paddle: Entity,
    ball: Entity,
    floor: Entity,
    cells: Vec<Entity>,
}

fn board() -> Board {
    let mut world = World::with_capacity(16);
    let paddle = create_paddle(&mut world, 80, 79).unwrap();
    let ball = create_ball(&mut world).unwrap();
    let floor = create_floor(&mut world).unwrap();
    let cells = create_brick_grid(&mut world, 4, 6, 1).unwrap();
    Board {
        world,
        paddle,
        ball,
        floor,
        cells,
    }
}

/// Runs the end-of-frame systems and applies queued commands.
fn end_frame(world: &mut World, dt: f32) {
    break_animation_system(world, dt).unwrap();
    power_up_system(world, dt).unwrap();
    destroy_system(world);
    world.step().unwrap();
}

#[test]
fn ball_breaks_brick_after_animation() {
    let Board {
        mut world,
        ball,
        cells,
        ..
    } = board();
    let brick = cells[0];
    let dy = world.get_component::<Velocity>(ball).dy;

    contact_system(&mut world, &[(ball, brick)]).unwrap();

    assert_eq!(world.get_component::<BrickHealth>(brick).hits, 0);
    assert_eq!(world.get_component::<Sprite>(brick).id, SpriteId::BrickBlueDamaged);
    assert!(world.has_component::<BreakAnimation>(brick));
    assert_eq!(world.get_component::<Velocity>(ball).dy, -dy);

    // A second hit on a cracked brick does nothing
    contact_system(&mut world, &[(ball, brick)]).unwrap();
    assert_eq!(world.get_component::<Velocity>(ball).dy, -dy);

    end_frame(&mut world, BREAK_ANIMATION_SECS / 2.0);
    assert!(world.is_alive(brick));

    end_frame(&mut world, BREAK_ANIMATION_SECS);
    assert!(!world.is_alive(brick));
    assert_eq!(world.query_with::<(BrickHealth,)>().len(), 21);
    assert!(world.is_coherent());
}

#[test]
fn sturdy_brick_survives_first_hit() {
    let mut world = World::with_capacity(4);
    let ball = create_ball(&mut world).unwrap();
    let brick = create_brick(&mut world, 2, SpriteId::BrickOrange, 10.0, 10.0).unwrap();

    contact_system(&mut world, &[(brick, ball)]).unwrap();

    assert_eq!(world.get_component::<BrickHealth>(brick).hits, 1);
    assert_eq!(world.get_component::<Sprite>(brick).id, SpriteId::BrickOrange);
    assert!(!world.has_component::<BreakAnimation>(brick));
}

#[test]
fn ball_reacts_to_one_contact_per_frame() {
    let Board {
        mut world,
        ball,
        cells,
        ..
    } = board();

    contact_system(&mut world, &[(ball, cells[0]), (ball, cells[1])]).unwrap();

    assert_eq!(world.get_component::<BrickHealth>(cells[0]).hits, 0);
    assert_eq!(world.get_component::<BrickHealth>(cells[1]).hits, 1);
}

#[test]
fn star_grants_lasers_that_break_bricks() {
    let Board {
        mut world,
        paddle,
        ball,
        cells,
        ..
    } = board();
    let star = world.query_with::<(StarPowerTag,)>()[0];

    contact_system(&mut world, &[(star, ball)]).unwrap();
    assert!(world.has_component::<DestroyedTag>(star));
    assert_eq!(
        world.get_component::<PowerUp>(paddle).kind,
        PowerUpKind::ShootingLaser
    );
    assert!(world.has_component::<TimedEffect>(paddle));

    end_frame(&mut world, 0.01);
    assert!(!world.is_alive(star));

    let lasers = world.query_with::<(LaserTag,)>();
    assert_eq!(lasers.len(), 2);

    let target = cells[5];
    contact_system(&mut world, &[(lasers[0], target)]).unwrap();
    assert_eq!(world.get_component::<BrickHealth>(target).hits, 0);
    assert!(world.has_component::<DestroyedTag>(lasers[0]));
    assert!(!world.has_component::<DestroyedTag>(lasers[1]));

    // Lasers travel upward each frame
    let before = world.get_component::<Position>(lasers[1]).y;
    movement_system(&mut world).unwrap();
    assert!(world.get_component::<Position>(lasers[1]).y < before);
}

#[test]
fn floor_swallows_ball_and_stale_contacts_are_ignored() {
    let Board {
        mut world,
        paddle,
        ball,
        floor,
        ..
    } = board();

    contact_system(&mut world, &[(floor, ball)]).unwrap();
    assert!(world.has_component::<DestroyedTag>(ball));

    // Already on its way out: no bounce off the paddle
    let dy = world.get_component::<Velocity>(ball).dy;
    contact_system(&mut world, &[(ball, paddle)]).unwrap();
    assert_eq!(world.get_component::<Velocity>(ball).dy, dy);

    end_frame(&mut world, 0.016);
    assert!(!world.is_alive(ball));
    assert!(world.query_with::<(BallTag,)>().is_empty());

    contact_system(&mut world, &[(ball, paddle)]).unwrap();
    assert!(world.is_coherent());
}

#[test]
fn ui_manager_starts_with_three_lives() {
    let mut world = World::with_capacity(4);
    let ui = create_ui_manager(&mut world).unwrap();

    assert_eq!(world.get_component::<LifeCount>(ui).lives, 3);
    assert_eq!(world.get_component::<Score>(ui).points, 0);
    assert!(!world.has_component::<PaddleControl>(ui));
}

#[test]
fn packed_positions_form_one_plain_slice() {
    let Board { world, .. } = board();

    let positions = world.storage::<Position>().unwrap().as_slice();
    let floats: &[f32] = bytemuck::cast_slice(positions);

    assert_eq!(floats.len(), positions.len() * 2);
    assert_eq!(positions.len(), world.query_with::<(Position,)>().len());
}
