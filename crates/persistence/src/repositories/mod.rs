//! Repository implementations for database operations.

pub mod guest_group;

pub use guest_group::GuestGroupRepository;
