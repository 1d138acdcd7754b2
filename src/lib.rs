//! Purpose: Marshalling shim between Quottery node responses and stable C/Rust callers.
//! Exports: `core` (codecs, wire layouts, errors), `api` (client and views), `abi` (C surface).
//! Role: Library behind `libquottery_shim` and the conformance runner.
//! Invariants: Core modules are pure; node I/O and identity derivation stay behind traits.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod abi;
pub mod api;
pub mod core;
