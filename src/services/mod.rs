//! Services module
//!
//! Business logic shared by the API handlers

pub mod collection;
