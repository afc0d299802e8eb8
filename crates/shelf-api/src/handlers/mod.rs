//! API handlers

pub mod books;
pub mod health;
