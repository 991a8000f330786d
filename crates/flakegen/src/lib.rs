//! Compact, time-sortable 64-bit Snowflake IDs.
//!
//! An [`IdGenerator`] packs `timestamp (41) | machine id (10) | sequence (12)`
//! into a `u64` whose top bit is always clear. IDs from one generator are
//! unique and strictly increasing; [`decode`] splits them back apart without
//! touching any generator.
//!
//! ```
//! use flakegen::{decode, IdGenerator};
//!
//! let generator = IdGenerator::builder().machine_id(5).build().unwrap();
//! let id = generator.generate().unwrap();
//!
//! let decoded = decode(id.to_raw(), generator.epoch());
//! assert_eq!(decoded.machine_id, 5);
//! ```
//!
//! ## Features
//!
//! - `network` (default): derive the machine ID from a network interface.
//! - `parking-lot`: use `parking_lot::Mutex` (no lock poisoning).
//! - `tracing`: trace-level spans around generation.
//! - `serde`: serde support and the [`as_decimal_str`] adapter.
//! - `async-tokio`: [`IdGenerator::generate_async`] with Tokio sleep providers.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
#[cfg(feature = "futures")]
mod futures;
mod generator;
mod global;
mod id;
mod machine;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::error::*;
#[cfg(feature = "futures")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::global::*;
pub use crate::id::*;
pub use crate::machine::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
