//! Data models for Bookish

pub mod book;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookInput, BookRequest};
pub use user::{TokenClaims, User};
