//! Node identifier allocation for scsynth clients.
//!
//! Every synth and group on the server is addressed by a 32-bit node id.
//! Several clients can share one server, so each id carries the allocating
//! client's number in its top bits. [`NodeIdAllocator`] hands out ids for one
//! client from two ranges: permanent ids that can be freed and reused, and
//! temporary ids from a wrapping cursor for short-lived nodes.
//!
//! # Example
//!
//! ```rust
//! use scsynth_alloc::{NodeIdAllocator, client_of};
//!
//! let mut ids = NodeIdAllocator::new(2, 1000)?;
//!
//! let group = ids.allocate_permanent();
//! let voice = ids.allocate_temporary(1);
//! assert_eq!(client_of(group), 2);
//! assert!(ids.is_permanent(group));
//! assert!(!ids.is_permanent(voice));
//!
//! ids.free_permanent(group);
//! assert_eq!(ids.allocate_permanent(), group);
//! # Ok::<(), scsynth_alloc::ConfigError>(())
//! ```
//!
//! # Features
//!
//! - `tracing`: debug events for named allocations and resets, and a warning
//!   when the permanent range is exhausted.

mod error;
pub mod node_id;

pub use error::ConfigError;
pub use node_id::{
    CLIENT_SHIFT, DEFAULT_BOUNDARY, LOCAL_ID_MASK, MAX_CLIENT_ID, NamedId, NodeIdAllocator,
    client_of, local_id,
};
