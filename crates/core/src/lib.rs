//! `vyapar-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::Aggregate;
pub use entity::{Entity, first_duplicate_id, position_of};
pub use error::{DomainError, DomainResult};
pub use id::ItemId;
pub use money::{Money, Quantity};
pub use value_object::ValueObject;
