// ABOUTME: Per-user provider credential module
// ABOUTME: Types and encrypted storage for bring-your-own API keys

pub mod storage;
pub mod types;

pub use storage::UserApiSettingStorage;
pub use types::{MaskedApiSetting, UserApiSetting};
