//! JSON Record Server Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
/// Application state management
///
/// Handles record types, the shared store handle, and persistence.
pub mod state;
