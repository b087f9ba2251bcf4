//! Capability abstractions (§9): fetchers are polymorphic over one
//! operation, reducers over one method. Modeled as `#[async_trait]`
//! trait objects so the fan-out collector (`lrc-engine`) can hold a
//! heterogeneous `Vec<Box<dyn Fetcher>>` of local-process and
//! SSH-wrapped fetchers without knowing which is which.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::region::RegionInfos;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Races the fetch itself (the remote process or local invocation
    /// it wraps) against `cancel`, returning `RecoverError::Cancelled`
    /// if it fires first (§5, §12).
    async fn fetch(&self, cancel: &CancellationToken) -> Result<RegionInfos>;

    /// A short label used in logging and error messages (typically the
    /// host this fetcher talks to).
    fn label(&self) -> &str;
}

/// Reducers are intentionally `&mut self` rather than pure functions:
/// `ResolveConflicts` accumulates a `conflicts` side list across calls
/// (§4.4), so it cannot be a stateless `fn(a, b) -> c`.
pub trait Reducer {
    fn merge(&mut self, a: RegionInfos, b: RegionInfos) -> RegionInfos;
}
