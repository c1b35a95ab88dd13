// ABOUTME: User management module
// ABOUTME: Provides types and storage for dashboard users and their roles

pub mod storage;
pub mod types;

pub use storage::UserStorage;
pub use types::*;
