//! # shelf-core
//!
//! Core types and utilities for Bookshelf.
//!
//! This crate provides the building blocks shared by every other crate:
//! - The error taxonomy (`ShelfError`) and result alias
//! - Identifier types
//! - Configuration loading

pub mod config;
pub mod error;
pub mod types;

pub use error::*;
pub use types::*;
