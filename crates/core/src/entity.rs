//! Entities: records tracked by identifier rather than by value.

use std::collections::HashSet;

/// A record whose identity survives changes to its attributes.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> Self::Id;
}

/// Index of the entity with `id`, if present.
pub fn position_of<E: Entity>(entities: &[E], id: E::Id) -> Option<usize> {
    entities.iter().position(|entity| entity.id() == id)
}

/// First identifier that occurs more than once, if any.
pub fn first_duplicate_id<E: Entity>(entities: &[E]) -> Option<E::Id> {
    let mut seen = HashSet::with_capacity(entities.len());
    entities
        .iter()
        .map(Entity::id)
        .find(|id| !seen.insert(*id))
}
