//! Common test infrastructure for jarsign-archive tests
//!
//! # Modules
//!
//! - `builders`: Fluent builder for in-memory JAR fixtures
//! - `checksums`: SHA-256 helpers for untouched-file assertions

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod checksums;

pub use builders::*;
pub use checksums::*;
