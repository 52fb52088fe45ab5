//! HTTP route handlers.

pub mod auth;
pub mod guest_groups;
pub mod health;
pub mod pages;
pub mod rsvp;
