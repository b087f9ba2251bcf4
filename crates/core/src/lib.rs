//! lrc-core: data model, JSON codecs, and capability traits for the
//! learner-recover cluster rescue tool.

pub mod apply_history;
pub mod duration;
pub mod error;
pub mod ids;
pub mod recover_info;
pub mod region;
pub mod topology;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use apply_history::{ApplyHistory, MaxApplyIndex};
pub use duration::HumanDuration;
pub use error::{RecoverError, RemoteStage, Result};
pub use ids::{Host, RegionId};
pub use recover_info::RecoverInfo;
pub use region::{parse_region_dump, RegionInfos, RegionState};
pub use topology::{is_labels_match, GlobalOptions, TiKVServerSpec, TopologyView};
pub use traits::{Fetcher, Reducer};
