//! Configuration schema and loading for spawnlock.
//!
//! Config files are discovered project-local first, then user-global, in
//! TOML or JSON, with `${ENV_VAR}` substitution applied before parsing.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config, save_config},
    schema::SpawnlockConfig,
};
