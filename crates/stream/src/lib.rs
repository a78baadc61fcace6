//! Streaming: uniform-grid spatial index, chunk generation and entity lifecycle.
//!
//! # Invariants
//! - An indexed entity lives in exactly one bucket, the cell of its position.
//! - After a viewport update the loaded set is exactly the cells the box covers.
//! - In-effect entities are never queryable and are destroyed only by `tick`.
//!
//! Everything runs to completion on the caller's thread; there is no locking.

mod config;
mod density;
mod display;
mod entity;
mod error;
mod spatial;
mod stats;
mod streamer;

pub use config::StreamerConfig;
pub use density::{chunk_density, roll_reward};
pub use display::{DisplayContainer, DisplayList, Sprite};
pub use entity::{Entity, Lifecycle};
pub use error::{StreamError, StreamResult};
pub use spatial::SpatialIndex;
pub use stats::{StreamStats, TickTimer};
pub use streamer::WorldStreamer;

pub fn crate_info() -> &'static str {
    "dive-stream v0.1.0"
}
