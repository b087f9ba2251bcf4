//! lrc-storage: persistence for the recovery tool's two disk-resident
//! artifacts, `ApplyHistory` and `RecoverInfo`, plus the advisory file
//! lock that serializes `rpo` invocations against a shared history
//! file.

pub mod atomic;
pub mod history_lock;
pub mod history_store;
pub mod recover_info_store;

pub use history_lock::HistoryLock;
