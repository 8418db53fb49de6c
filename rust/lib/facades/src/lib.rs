//! Typed resource clients generated from the sample endpoint manifest.
//!
//! Built by `build.rs` with `erp-codegen`, so a change to the generator
//! that emits invalid Rust fails this crate's build.

include!(concat!(env!("OUT_DIR"), "/facades.rs"));
