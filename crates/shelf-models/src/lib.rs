//! # shelf-models
//!
//! The book record persisted in the collection document, the parameter
//! object used to create and update it, and the starter collection.

pub mod book;
pub mod seed;

pub use book::{Book, BookParams, DEFAULT_CATEGORY};
