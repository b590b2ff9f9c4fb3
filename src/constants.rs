//! Crate-wide constants, shared with tooling through the root `constants.rs`.

include!("../constants.rs");
