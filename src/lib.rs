// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod input;
pub mod language;
pub mod metrics;
pub mod normalizer;
pub mod page;
pub mod provider;
pub mod romaji;
pub mod runtime;
pub mod session;
pub mod word;
