//! Repodeck Core
//!
//! Core types shared by the Repodeck client, sync engine and CLI.
//!
//! This crate contains:
//! - Domain types: the immutable repository snapshot and its addressing key
//! - DTOs: request bodies, list query parameters and the wire shape of the hosting API

pub mod domain;
pub mod dto;
