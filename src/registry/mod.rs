//! Registry client: the engine's only window onto threshold and metadata
//! configuration (spec §4.1).

mod cache;
mod client;
mod error;
pub mod keys;

pub use cache::CachedRegistry;
pub use client::{InMemoryRegistry, RedisRegistry, Registry};
pub use error::RegistryError;
