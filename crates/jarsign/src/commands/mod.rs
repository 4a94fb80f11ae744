//! CLI command implementations

pub mod inspect;
pub mod sign;
pub mod version;
