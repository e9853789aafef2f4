//! This module defines the `BackendAdapter` trait, the seam between the
//! benchmark logic and a concrete graph backend.
use async_trait::async_trait;

use crate::errors::BackendError;
use crate::models::Degrees;

/// Generic graph operations, translated by each implementation into its own
/// wire protocol.
///
/// The runner issues calls one at a time by default, so implementations hold
/// a single long-lived client or session and reuse it for every call.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Short label used in logs and reports.
    fn name(&self) -> &str;

    /// Clears all graph state in the backend.
    ///
    /// Must be idempotent: two consecutive resets leave the backend in the
    /// same empty state as one.
    async fn reset(&self) -> Result<(), BackendError>;

    /// Inserts the relationship `v1 -> v2`, creating either endpoint if the
    /// backend needs explicit nodes. Whether the edge is also stored in the
    /// reverse direction is a per-implementation policy.
    async fn add_edge(&self, v1: &str, v2: &str) -> Result<(), BackendError>;

    /// Returns the length in edges of the shortest path between `v1` and `v2`.
    ///
    /// # Returns
    ///
    /// * `Ok(Degrees::Path(n))` - A path of `n` edges exists
    /// * `Ok(Degrees::NoPath)` - Both vertices exist but are not connected
    /// * `Err(BackendError::NotFound(_))` - Either vertex is unknown
    /// * `Err(_)` - Transport, timeout or backend failure
    async fn shortest_path_length(&self, v1: &str, v2: &str) -> Result<Degrees, BackendError>;
}
