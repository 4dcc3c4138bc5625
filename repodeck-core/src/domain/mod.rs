//! Core domain types
//!
//! These types describe what the client believes exists on the remote
//! service. They are built from server responses only and never mutated
//! in place.

pub mod repository;
