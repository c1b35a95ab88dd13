// ABOUTME: Core utilities for Agentdesk
// ABOUTME: Foundational package providing slug derivation, paths, and string helpers

pub mod constants;
pub mod slug;
pub mod utils;

// Re-export constants
pub use constants::{agentdesk_dir, default_database_path};

// Re-export slug derivation
pub use slug::slugify;

// Re-export utilities
pub use utils::{key_hint, redact_secret, truncate};
