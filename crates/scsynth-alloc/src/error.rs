//! Error types for allocator construction.

use thiserror::Error;

/// Invalid allocator configuration.
///
/// These are the only allocator errors; allocating and freeing never fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The client id does not fit the 5 high bits of a node id.
    #[error("client id {client_id} out of range (0..={max})")]
    ClientIdOutOfRange {
        /// Requested client id.
        client_id: u32,
        /// Largest valid client id.
        max: u32,
    },

    /// The boundary leaves no room for permanent or temporary ids.
    #[error("id boundary {boundary} out of range (2..={max})")]
    BoundaryOutOfRange {
        /// Requested boundary.
        boundary: i32,
        /// Largest valid boundary.
        max: i32,
    },
}
