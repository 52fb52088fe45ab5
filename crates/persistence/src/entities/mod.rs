//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod guest_group;

pub use guest_group::GuestGroupEntity;
