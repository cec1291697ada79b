//! Client-side synchronization layer for hierarchical work items.
//!
//! A [`SyncEngine`] mirrors the authoritative snapshot held by an external
//! [`Backend`], keeps the mirror live by applying push updates in arrival
//! order, stages user edits as a pending-change overlay, and coalesces
//! per-item re-sync requests into batched backend dispatches.

pub mod backend;
pub mod batcher;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod progress;
pub mod storage;

pub use backend::{Backend, ItemUpdate, PushUpdate};
pub use engine::SyncEngine;
pub use error::{Error, Result};
pub use progress::ProgressMeter;
pub use storage::{ExtraDataStore, FileExtraDataStore, MemoryExtraDataStore};
