//! Common types and traits for all remote entities

pub mod entity;

pub use entity::{EntityId, Identified};
