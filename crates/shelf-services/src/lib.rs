//! # shelf-services
//!
//! The record service: the only writer of the book collection.
//!
//! It keeps the collection and the cover files consistent. A book's cover is
//! stored before the collection that references it is saved, and an old cover
//! is removed only after the collection that dropped it is saved.

pub mod books;

pub use books::BookService;
