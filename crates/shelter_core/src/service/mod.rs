//! Core use-case services.
//!
//! # Responsibility
//! - Own the store handle and expose the caller-facing CRUD surface.
//! - Keep UI collaborators decoupled from storage details.

pub mod editor;
pub mod gateway;
