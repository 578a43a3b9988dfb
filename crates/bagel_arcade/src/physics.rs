//! # Physics Bridge
//!
//! Rigid-body simulation lives in an external engine. Entities that take
//! part carry a [`PhysicsBody`] holding an opaque [`BodyId`]; the engine
//! keeps the reverse link (body -> owning entity) so contact pairs can be
//! mapped back into the world.
//!
//! ## Frame order
//!
//! 1. Step the backend
//! 2. [`resolve_contacts`] turns body pairs into live entity pairs
//! 3. Game systems react to the pairs
//! 4. A sync system copies body transforms into positions
//!
//! A body's owner can be destroyed (and its identity recycled) while the
//! body is still in flight; [`resolve_contacts`] drops any pair whose owner
//! no longer carries that exact body.

use std::fmt;

use bagel_core::{bagel_components, Entity, World};

use crate::error::{ArcadeError, ArcadeResult};

/// Pixel/meter conversion used by every body definition.
pub const PIXELS_PER_METER: f32 = 50.0;

/// Opaque handle to a body owned by a [`PhysicsBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Links an entity to its body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicsBody {
    /// The body this entity drives or follows.
    pub body: BodyId,
}

bagel_components! {
    PhysicsBody => Sparse,
}

/// How the engine moves a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves.
    Static,
    /// Moves under its velocity.
    Dynamic,
}

/// Creation parameters. Coordinates are body centers in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDef {
    /// Static or dynamic.
    pub kind: BodyKind,
    /// Center X in meters.
    pub x: f32,
    /// Center Y in meters.
    pub y: f32,
}

impl BodyDef {
    /// Body centered on a sprite whose top-left corner is `(left, top)`.
    #[must_use]
    pub fn around_sprite(kind: BodyKind, left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            kind,
            x: (left + width / 2.0) / PIXELS_PER_METER,
            y: (top + height / 2.0) / PIXELS_PER_METER,
        }
    }
}

/// Body pose in meters/radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyTransform {
    /// Center X in meters.
    pub x: f32,
    /// Center Y in meters.
    pub y: f32,
    /// Rotation in radians.
    pub angle: f32,
}

/// The seam to a rigid-body engine.
pub trait PhysicsBackend {
    /// Creates a body and records `owner` as its back-reference.
    fn create_body(&mut self, owner: Entity, def: BodyDef) -> BodyId;

    /// Current pose, or `None` if the body no longer exists.
    fn transform(&self, body: BodyId) -> Option<BodyTransform>;

    /// Sets linear velocity in meters per second.
    ///
    /// # Errors
    ///
    /// `UnknownBody` if the body no longer exists.
    fn set_velocity(&mut self, body: BodyId, vx: f32, vy: f32) -> ArcadeResult<()>;

    /// Destroys a body. Returns `false` if it was already gone.
    fn destroy_body(&mut self, body: BodyId) -> bool;

    /// Contact pairs reported since the last drain.
    fn drain_contacts(&mut self) -> Vec<(BodyId, BodyId)>;

    /// The entity recorded at creation, if the body still exists.
    fn owner(&self, body: BodyId) -> Option<Entity>;
}

/// Creates a body for `entity` and attaches the matching [`PhysicsBody`].
///
/// # Errors
///
/// Registry errors from attaching the component. The body is destroyed
/// again if the attach fails.
pub fn attach_body<P: PhysicsBackend + ?Sized>(
    world: &mut World,
    physics: &mut P,
    entity: Entity,
    def: BodyDef,
) -> ArcadeResult<BodyId> {
    let body = physics.create_body(entity, def);
    if let Err(e) = world.add_component(entity, PhysicsBody { body }) {
        physics.destroy_body(body);
        return Err(e.into());
    }
    Ok(body)
}

/// Removes the entity's [`PhysicsBody`] and destroys the body.
///
/// Returns `false` if the entity had no body.
pub fn detach_body<P: PhysicsBackend + ?Sized>(
    world: &mut World,
    physics: &mut P,
    entity: Entity,
) -> bool {
    match world.remove_component::<PhysicsBody>(entity) {
        Some(PhysicsBody { body }) => physics.destroy_body(body),
        None => false,
    }
}

/// Maps drained body pairs to live entity pairs.
///
/// Pairs naming a destroyed body, a dead owner, or an owner whose identity
/// was recycled onto a different body are dropped.
pub fn resolve_contacts<P: PhysicsBackend + ?Sized>(
    world: &World,
    physics: &mut P,
) -> Vec<(Entity, Entity)> {
    let raw = physics.drain_contacts();
    let owner_of = |body: BodyId| {
        let entity = physics.owner(body)?;
        let linked = world.try_get::<PhysicsBody>(entity).ok()?;
        (world.is_alive(entity) && linked.body == body).then_some(entity)
    };

    raw.into_iter()
        .filter_map(|(a, b)| match (owner_of(a), owner_of(b)) {
            (Some(ea), Some(eb)) => Some((ea, eb)),
            _ => {
                tracing::trace!("dropped contact {} / {}: owner gone", a, b);
                None
            }
        })
        .collect()
}

// ============================================================================
// KINEMATIC BACKEND
// ============================================================================

#[derive(Clone, Copy, Debug)]
struct BodyState {
    owner: Entity,
    kind: BodyKind,
    transform: BodyTransform,
    vx: f32,
    vy: f32,
}

/// Shape-free backend: integrates dynamic bodies and reports whatever
/// contacts the caller feeds it.
///
/// Body handles are never reused.
#[derive(Debug, Default)]
pub struct KinematicBackend {
    bodies: Vec<Option<BodyState>>,
    contacts: Vec<(BodyId, BodyId)>,
}

impl KinematicBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of existing bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.iter().flatten().count()
    }

    /// Advances dynamic bodies by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        for state in self.bodies.iter_mut().flatten() {
            if state.kind == BodyKind::Dynamic {
                state.transform.x += state.vx * dt;
                state.transform.y += state.vy * dt;
            }
        }
    }

    /// Queues a contact between two existing bodies.
    ///
    /// Returns `false` (and queues nothing) if either body is gone.
    pub fn report_contact(&mut self, a: BodyId, b: BodyId) -> bool {
        if self.state(a).is_none() || self.state(b).is_none() {
            return false;
        }
        self.contacts.push((a, b));
        true
    }

    fn state(&self, body: BodyId) -> Option<&BodyState> {
        self.bodies.get(body.0 as usize)?.as_ref()
    }
}

impl PhysicsBackend for KinematicBackend {
    fn create_body(&mut self, owner: Entity, def: BodyDef) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(Some(BodyState {
            owner,
            kind: def.kind,
            transform: BodyTransform {
                x: def.x,
                y: def.y,
                angle: 0.0,
            },
            vx: 0.0,
            vy: 0.0,
        }));
        tracing::trace!("created {} for entity {}", id, owner);
        id
    }

    fn transform(&self, body: BodyId) -> Option<BodyTransform> {
        self.state(body).map(|state| state.transform)
    }

    fn set_velocity(&mut self, body: BodyId, vx: f32, vy: f32) -> ArcadeResult<()> {
        let state = self
            .bodies
            .get_mut(body.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(ArcadeError::UnknownBody { body })?;
        state.vx = vx;
        state.vy = vy;
        Ok(())
    }

    fn destroy_body(&mut self, body: BodyId) -> bool {
        self.bodies
            .get_mut(body.0 as usize)
            .and_then(Option::take)
            .is_some()
    }

    fn drain_contacts(&mut self) -> Vec<(BodyId, BodyId)> {
        std::mem::take(&mut self.contacts)
    }

    fn owner(&self, body: BodyId) -> Option<Entity> {
        self.state(body).map(|state| state.owner)
    }
}
