//! unitdrill-core — Vocabulary normalization and the drill session engine.
//!
//! This crate defines the canonical data model, the normalizer that builds
//! it from loosely-typed JSON, and the known/unknown drill state machine.

pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalizer;
pub mod session;
pub mod validate;
