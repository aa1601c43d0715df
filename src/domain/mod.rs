//! Shipping domain model
pub mod aggregates;
pub mod events;
pub mod value_objects;
