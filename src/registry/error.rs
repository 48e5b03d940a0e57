//! Registry error types.
//!
//! Per spec §7, absence and transient failure are not distinguished by
//! callers — both collapse to `Ok(None)` at the [`super::Registry`] trait
//! boundary. `RegistryError` exists only for the concrete backend's
//! connection-lifecycle methods (`connect`, health checks) where a caller
//! genuinely needs to know the backend is down.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry backend unavailable: {0}")]
    Unavailable(String),

    #[error("registry backend connection failed: {0}")]
    ConnectionFailed(String),
}
