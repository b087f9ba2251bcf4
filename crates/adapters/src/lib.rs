//! lrc-adapters: remote process invocation and HTTP client wrapper for
//! the learner-recover cluster rescue tool. Everything in this crate
//! talks to something outside the process — SSH, SCP, or HTTP.

pub mod fetcher_local;
pub mod fetcher_ssh;
pub mod http;
pub mod remote;

pub use fetcher_local::LocalTiKVCtl;
pub use fetcher_ssh::RemoteTiKVCtl;
pub use http::{poll_until_ready, HttpClient};
