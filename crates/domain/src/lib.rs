//! Domain layer for the wedding RSVP backend.
//!
//! This crate contains:
//! - Domain models (GuestGroup, Guest, roster view, selection, route guard)
//! - The guest store abstraction and its in-memory implementation
//! - RSVP code issuance and the admin dashboard service

pub mod models;
pub mod services;
