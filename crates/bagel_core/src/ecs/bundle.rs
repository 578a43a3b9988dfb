//! # Component Tuples
//!
//! Tuples of components serve two roles:
//! - as a [`ComponentBundle`], attached in one `add_all`/`spawn` call;
//! - as a [`ComponentSet`], turned into a required mask for queries.

use super::component::{Component, ComponentRegistry};
use super::entity::Entity;
use super::mask::Mask;
use super::world::World;
use crate::error::BagelResult;

/// A group of component values attached together.
///
/// Equivalent to one `add_component` per element, in order. There is no
/// rollback if a later element fails.
pub trait ComponentBundle: Send + 'static {
    /// Attaches every element to `entity`.
    ///
    /// # Errors
    ///
    /// Whatever the first failing `add_component` returns.
    fn insert_into(self, world: &mut World, entity: Entity) -> BagelResult<()>;
}

/// A group of component types used as a query predicate.
pub trait ComponentSet {
    /// Required mask, or `None` if any type was never registered.
    fn mask(registry: &ComponentRegistry) -> Option<Mask>;
}

macro_rules! tuple_impls {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentBundle for ($($name,)+) {
            #[allow(non_snake_case)]
            fn insert_into(self, world: &mut World, entity: Entity) -> BagelResult<()> {
                let ($($name,)+) = self;
                $( world.add_component(entity, $name)?; )+
                Ok(())
            }
        }

        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn mask(registry: &ComponentRegistry) -> Option<Mask> {
                let mut mask = Mask::EMPTY;
                $( mask.set(registry.id_of::<$name>()?); )+
                Some(mask)
            }
        }
    };
}

tuple_impls!(A);
tuple_impls!(A, B);
tuple_impls!(A, B, C);
tuple_impls!(A, B, C, D);
tuple_impls!(A, B, C, D, E);
tuple_impls!(A, B, C, D, E, F);
tuple_impls!(A, B, C, D, E, F, G);
tuple_impls!(A, B, C, D, E, F, G, H);
