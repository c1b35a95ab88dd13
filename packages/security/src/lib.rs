// ABOUTME: Users, credential encryption, and per-user provider keys for Agentdesk
// ABOUTME: Provides API key encryption and the user and api-setting storage layers

pub mod api_settings;
pub mod encryption;
pub mod users;

// Re-export main types for convenience
pub use api_settings::{MaskedApiSetting, UserApiSettingStorage};
pub use encryption::{ApiKeyEncryption, EncryptionError};
pub use users::storage::UserStorage;
pub use users::{NewUser, Role, User};
