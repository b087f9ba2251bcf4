pub mod fetch;
pub mod recover;
pub mod rpo;
pub mod version;
