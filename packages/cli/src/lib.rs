// ABOUTME: Server bootstrap for Agentdesk
// ABOUTME: Configuration loading, tracing setup, middleware, and the HTTP server

pub mod config;
pub mod middleware;
pub mod server;

pub use config::{Config, ConfigError};
pub use server::{build_app, init_tracing, run_server};

#[cfg(test)]
mod tests;
