// ABOUTME: Configuration constants for Agentdesk
// ABOUTME: Environment variable names and their default values

pub mod constants;

pub use constants::*;
