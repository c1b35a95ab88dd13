use std::env;
use std::path::PathBuf;

/// Database file name inside the Agentdesk directory
pub const DATABASE_FILE: &str = "agentdesk.db";

/// Get the path to the Agentdesk directory (~/.agentdesk)
pub fn agentdesk_dir() -> PathBuf {
    // HOME first so tests can redirect it
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".agentdesk")
    } else {
        dirs::home_dir()
            .unwrap_or_else(env::temp_dir)
            .join(".agentdesk")
    }
}

/// Get the default database path (~/.agentdesk/agentdesk.db)
pub fn default_database_path() -> PathBuf {
    agentdesk_dir().join(DATABASE_FILE)
}
