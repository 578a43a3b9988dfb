//! # Gold Miner Round Tests
//!
//! Runs the rope through a full send / hook / reel-in cycle against the
//! kinematic physics backend, plus the timer and lifetime bookkeeping.
//!
//! Run with: cargo test -p bagel_arcade --test goldminer_round

use bagel_arcade::goldminer::{
    create_diamond, create_gold, create_mystery_bag, create_player, create_rock, create_rope,
    hook_system, lifetime_system, physics_sync_system, rope_system, Collectable, Collidable,
    ItemKind, ItemType, LifeTime, Name, PlayerInfo, PlayerInput, Position, RopeControl,
    RopeState, Score, Value, Weight, MYSTERY_BAG_VALUE,
};
use bagel_arcade::physics::{
    resolve_contacts, KinematicBackend, PhysicsBackend, PhysicsBody,
};
use bagel_core::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DT: f32 = 0.1;

fn body_of(world: &World, entity: Entity) -> bagel_arcade::physics::BodyId {
    world.get_component::<PhysicsBody>(entity).body
}

/// Sends the rope and runs frames until it is extending.
fn send_rope(world: &mut World, physics: &mut KinematicBackend, player: Entity, rope: Entity) {
    world.get_component_mut::<PlayerInput>(player).send_rope = true;
    rope_system(world, physics, DT).unwrap();
    assert_eq!(world.get_component::<RopeControl>(rope).state, RopeState::Extending);
    rope_system(world, physics, DT).unwrap();
}

/// Runs rope frames until the rope is back at rest. Returns frames taken.
fn reel_in(world: &mut World, physics: &mut KinematicBackend, rope: Entity) -> usize {
    for frame in 1..=200 {
        physics.step(DT);
        rope_system(world, physics, DT).unwrap();
        if world.get_component::<RopeControl>(rope).state == RopeState::AtRest {
            return frame;
        }
    }
    panic!("rope never came back");
}

#[test]
fn hooked_gold_is_delivered_to_score() {
    let mut world = World::with_capacity(8);
    let mut physics = KinematicBackend::new();
    let player = create_player(&mut world, 1).unwrap();
    let rope = create_rope(&mut world, &mut physics, 1).unwrap();
    let gold = create_gold(&mut world, &mut physics, 600.0, 300.0).unwrap();

    send_rope(&mut world, &mut physics, player, rope);

    physics.step(DT);
    assert!(physics.report_contact(body_of(&world, rope), body_of(&world, gold)));
    let contacts = resolve_contacts(&world, &mut physics);
    assert_eq!(contacts, vec![(rope, gold)]);
    assert_eq!(hook_system(&mut world, &mut physics, &contacts).unwrap(), 1);

    let control = *world.get_component::<RopeControl>(rope);
    assert_eq!(control.state, RopeState::Retracting);
    assert_eq!(control.hooked, Some(gold));
    assert!(!world.has_component::<PhysicsBody>(gold));
    assert!(!world.has_component::<Collidable>(gold));
    assert!(!world.has_component::<Collectable>(gold));
    assert_eq!(world.get_component::<PlayerInfo>(gold).player_id, 1);

    reel_in(&mut world, &mut physics, rope);

    assert_eq!(world.get_component::<Score>(player).points, 100);
    assert_eq!(world.get_component::<RopeControl>(rope).hooked, None);
    assert!(world.is_alive(gold));

    world.step().unwrap();
    assert!(!world.is_alive(gold));
    assert!(world.is_coherent());
}

#[test]
fn heavy_items_reel_in_slower() {
    let mut frames = Vec::new();
    for heavy in [false, true] {
        let mut world = World::with_capacity(8);
        let mut physics = KinematicBackend::new();
        let player = create_player(&mut world, 1).unwrap();
        let rope = create_rope(&mut world, &mut physics, 1).unwrap();
        let item = if heavy {
            create_rock(&mut world, &mut physics, 600.0, 300.0).unwrap()
        } else {
            create_diamond(&mut world, &mut physics, 600.0, 300.0).unwrap()
        };

        send_rope(&mut world, &mut physics, player, rope);
        physics.report_contact(body_of(&world, item), body_of(&world, rope));
        let contacts = resolve_contacts(&world, &mut physics);
        hook_system(&mut world, &mut physics, &contacts).unwrap();

        frames.push(reel_in(&mut world, &mut physics, rope));
    }
    assert!(frames[1] > frames[0], "rock {} vs diamond {}", frames[1], frames[0]);
}

#[test]
fn two_ropes_on_one_item_hook_it_once() {
    let mut world = World::with_capacity(8);
    let mut physics = KinematicBackend::new();
    let p1 = create_player(&mut world, 1).unwrap();
    let p2 = create_player(&mut world, 2).unwrap();
    let r1 = create_rope(&mut world, &mut physics, 1).unwrap();
    let r2 = create_rope(&mut world, &mut physics, 2).unwrap();
    let gold = create_gold(&mut world, &mut physics, 600.0, 300.0).unwrap();
    for rope in [r1, r2] {
        world.get_component_mut::<RopeControl>(rope).state = RopeState::Extending;
    }

    let contacts = [(r1, gold), (r2, gold)];
    assert_eq!(hook_system(&mut world, &mut physics, &contacts).unwrap(), 1);
    assert_eq!(world.get_component::<RopeControl>(r1).hooked, Some(gold));
    assert_eq!(world.get_component::<RopeControl>(r2).hooked, None);
    assert_eq!(world.get_component::<RopeControl>(r2).state, RopeState::Extending);

    reel_in(&mut world, &mut physics, r1);

    assert_eq!(world.get_component::<Score>(p1).points, 100);
    assert_eq!(world.get_component::<Score>(p2).points, 0);
}

#[test]
fn recycled_item_is_not_reeled_in() {
    let mut world = World::with_capacity(8);
    let mut physics = KinematicBackend::new();
    let player = create_player(&mut world, 1).unwrap();
    let rope = create_rope(&mut world, &mut physics, 1).unwrap();
    let gold = create_gold(&mut world, &mut physics, 600.0, 300.0).unwrap();

    send_rope(&mut world, &mut physics, player, rope);
    physics.report_contact(body_of(&world, rope), body_of(&world, gold));
    let contacts = resolve_contacts(&world, &mut physics);
    assert_eq!(hook_system(&mut world, &mut physics, &contacts).unwrap(), 1);

    // The hooked item vanishes and its identity goes to a fresh nugget
    world.destroy_entity(gold).unwrap();
    let fresh = create_gold(&mut world, &mut physics, 100.0, 400.0).unwrap();
    assert_eq!(fresh, gold);

    reel_in(&mut world, &mut physics, rope);

    assert_eq!(world.get_component::<RopeControl>(rope).hooked, None);
    assert_eq!(world.get_component::<Score>(player).points, 0);
    assert_eq!(*world.get_component::<Position>(fresh), Position { x: 100.0, y: 400.0 });
    assert!(world.has_component::<Collectable>(fresh));
    world.step().unwrap();
    assert!(world.is_alive(fresh));
}

#[test]
fn at_rest_rope_ignores_contacts() {
    let mut world = World::with_capacity(8);
    let mut physics = KinematicBackend::new();
    let rope = create_rope(&mut world, &mut physics, 1).unwrap();
    let gold = create_gold(&mut world, &mut physics, 600.0, 300.0).unwrap();

    physics.report_contact(body_of(&world, rope), body_of(&world, gold));
    let contacts = resolve_contacts(&world, &mut physics);

    assert_eq!(hook_system(&mut world, &mut physics, &contacts).unwrap(), 0);
    assert!(world.has_component::<PhysicsBody>(gold));
}

#[test]
fn items_carry_their_vocabulary() {
    let mut world = World::with_capacity(8);
    let mut physics = KinematicBackend::new();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let rock = create_rock(&mut world, &mut physics, 0.0, 0.0).unwrap();
    let bag = create_mystery_bag(&mut world, &mut physics, &mut rng, 100.0, 0.0).unwrap();

    assert_eq!(world.get_component::<ItemType>(rock).kind, ItemKind::Rock);
    assert_eq!(world.get_component::<Weight>(rock).value, 3.0);
    assert_eq!(world.get_component::<Name>(rock).label, "Rock");

    let value = world.get_component::<Value>(bag).amount;
    let (low, high) = MYSTERY_BAG_VALUE;
    assert!((low..=high).contains(&value));
    assert_eq!(world.get_component::<ItemType>(bag).kind, ItemKind::MysteryBag);
}

#[test]
fn physics_sync_restores_sprite_corner() {
    let mut world = World::with_capacity(8);
    let mut physics = KinematicBackend::new();
    let gold = create_gold(&mut world, &mut physics, 240.0, 310.0).unwrap();

    *world.get_component_mut::<Position>(gold) = Position::default();
    physics_sync_system(&mut world, &physics);

    let pos = *world.get_component::<Position>(gold);
    assert!((pos.x - 240.0).abs() < 1e-3);
    assert!((pos.y - 310.0).abs() < 1e-3);
}

#[test]
fn expired_lifetime_releases_body_and_entity() {
    let mut world = World::with_capacity(8);
    let mut physics = KinematicBackend::new();
    let gold = create_gold(&mut world, &mut physics, 0.0, 0.0).unwrap();
    let body = body_of(&world, gold);
    world.add_component(gold, LifeTime { remaining: 0.2 }).unwrap();

    assert_eq!(lifetime_system(&mut world, &mut physics, 0.15), 0);
    assert_eq!(lifetime_system(&mut world, &mut physics, 0.15), 1);
    assert_eq!(physics.transform(body), None);
    assert!(world.is_alive(gold));

    world.step().unwrap();
    assert!(!world.is_alive(gold));
}
