//! Data Transfer Objects for talking to the hosting service
//!
//! Request bodies, list query parameters and the raw JSON shape of
//! repository objects as the service returns them.

pub mod repository;
