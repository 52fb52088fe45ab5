//! Shared utilities for the wedding RSVP backend.
//!
//! This crate provides common functionality used across all other crates:
//! - RSVP code generation
//! - Admin password hashing with Argon2id
//! - Admin session tokens (JWT)
//! - Common validation logic

pub mod crypto;
pub mod jwt;
pub mod password;
pub mod validation;
