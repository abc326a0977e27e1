//! # serverstat-types
//!
//! Core types for sampling a database server's status document. This crate
//! defines the data model shared by the flattener, the sampler and the
//! delta/derived engine in `serverstat`.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable `serde` to ship reports as JSON
//! - **Open schema**: Status trees are generic ordered maps, since the set of
//!   counters varies between server versions
//! - **Explicit absence**: Missing values are `Option`s, never NaN sentinels
//! - **Ergonomic builders**: Fluent API for constructing status trees
//!
//! ## Features
//!
//! - `serde`: JSON/MessagePack/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use serverstat_types::{StatusTree, StatusValue};
//!
//! let tree = StatusTree::builder()
//!     .field("uptimeMillis", 125_500)
//!     .document("network", |n| {
//!         n.field("bytesIn", 1000)
//!          .long("numRequests", 9_000_000_000)
//!     })
//!     .document("opcounters", |o| o.field("query", 42))
//!     .build();
//!
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.get_path("network.numRequests"), Some(&StatusValue::Long(9_000_000_000)));
//! ```

mod delta;
mod derived;
mod sample;
mod tree;
mod value;

pub use delta::*;
pub use derived::*;
pub use sample::*;
pub use tree::*;
pub use value::*;

/// Name of the synthetic interval key in a serialized [`DeltaReport`].
pub const TIME_DELTA_KEY: &str = "timeDelta";
