//! Common test infrastructure for jarsign-signer tests
//!
//! # Modules
//!
//! - `fixtures`: JAR fixture construction and fake signing
//! - `fake_signer`: Scripted `SigningPrimitive` recording every call
//! - `checksums`: SHA-256 helpers for untouched-file assertions

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod checksums;
pub mod fake_signer;
pub mod fixtures;

pub use checksums::*;
pub use fake_signer::*;
pub use fixtures::*;
