//! Purpose: C-ABI marshaling bridge exposing a scope-serving entity model to foreign callers.
//! Exports: `core` (transports, handles, errors), `api` (entities), `abi` (`uscp_*` symbols).
//! Role: Library behind `libscopeshim` (cdylib/staticlib) and the `scopeshim` CLI.
//! Invariants: Only `abi` touches caller memory beyond the transports in `core`.
//! Invariants: Entity state lives in `api`; the boundary holds no state of its own.
pub mod abi;
pub mod api;
pub mod config;
pub mod core;
pub mod logging;
