//! Node identifier allocation.
//!
//! Node ids are 32-bit integers split into two fields:
//!
//! ```text
//!  31..26      25..0
//! [client ][   local id   ]
//! ```
//!
//! The local id space is divided at `boundary`. Ids below it are permanent:
//! handed out sequentially from 1, returned with [`free_permanent`], and
//! reused smallest first. Ids from `boundary` up to `2^26 - 1` are temporary:
//! handed out by a cursor that wraps back to `boundary` and never frees.
//!
//! [`free_permanent`]: NodeIdAllocator::free_permanent

use std::collections::{BTreeSet, HashMap};

use crate::error::ConfigError;

/// Bits of a node id below the client field.
pub const CLIENT_SHIFT: u32 = 26;

/// Mask selecting the local part of a node id (`2^26 - 1`).
pub const LOCAL_ID_MASK: i32 = (1 << CLIENT_SHIFT) - 1;

/// Largest client id.
pub const MAX_CLIENT_ID: u32 = 31;

/// Default split between permanent and temporary ids.
pub const DEFAULT_BOUNDARY: i32 = 1000;

/// First sequential permanent id. Id 0 is the server's root group.
const FIRST_PERMANENT_ID: i32 = 1;

/// Outcome of [`NodeIdAllocator::allocate_named`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedId {
    /// The name was unbound; a new permanent id was allocated for it.
    Fresh(i32),
    /// The name was already bound to this id.
    Existing(i32),
}

impl NamedId {
    /// The node id, fresh or not.
    #[inline]
    pub fn id(self) -> i32 {
        match self {
            NamedId::Fresh(id) | NamedId::Existing(id) => id,
        }
    }

    /// Whether the id was allocated by this call.
    #[inline]
    pub fn is_fresh(self) -> bool {
        matches!(self, NamedId::Fresh(_))
    }
}

/// Allocates node ids for one client session.
///
/// All operations take `&mut self` and complete without blocking. Share an
/// allocator between tasks by giving it a single owner or wrapping it in a
/// mutex; it has no internal synchronization.
///
/// # Example
///
/// ```rust
/// use scsynth_alloc::NodeIdAllocator;
///
/// let mut ids = NodeIdAllocator::new(0, 1000).unwrap();
/// assert_eq!(ids.allocate_permanent(), 1);
/// assert_eq!(ids.allocate_temporary(1), 1000);
/// ```
#[derive(Debug, Clone)]
pub struct NodeIdAllocator {
    client_id: u32,
    boundary: i32,
    mask: i32,
    temp: i32,
    /// Next sequential permanent id; reaches `boundary` once the range is used up.
    next_permanent: i32,
    freed: BTreeSet<i32>,
    named: HashMap<String, i32>,
}

impl NodeIdAllocator {
    /// Creates an allocator for `client_id` with permanent ids below `boundary`.
    ///
    /// Fails if `client_id > 31` or `boundary` is outside `2..=2^26 - 1`.
    pub fn new(client_id: u32, boundary: i32) -> Result<Self, ConfigError> {
        if client_id > MAX_CLIENT_ID {
            return Err(ConfigError::ClientIdOutOfRange {
                client_id,
                max: MAX_CLIENT_ID,
            });
        }
        if !(FIRST_PERMANENT_ID + 1..=LOCAL_ID_MASK).contains(&boundary) {
            return Err(ConfigError::BoundaryOutOfRange {
                boundary,
                max: LOCAL_ID_MASK,
            });
        }

        Ok(Self::with_checked(client_id, boundary))
    }

    /// Builds an allocator from settings already known to be in range.
    fn with_checked(client_id: u32, boundary: i32) -> Self {
        Self {
            client_id,
            boundary,
            mask: (client_id << CLIENT_SHIFT) as i32,
            temp: boundary,
            next_permanent: FIRST_PERMANENT_ID,
            freed: BTreeSet::new(),
            named: HashMap::new(),
        }
    }

    /// Creates an allocator for `client_id` with the default boundary.
    pub fn for_client(client_id: u32) -> Result<Self, ConfigError> {
        Self::new(client_id, DEFAULT_BOUNDARY)
    }

    /// Client id this allocator tags ids with.
    #[inline]
    pub fn client_id(&self) -> u32 {
        self.client_id
    }

    /// Split between permanent and temporary ids.
    #[inline]
    pub fn boundary(&self) -> i32 {
        self.boundary
    }

    /// Client id shifted into the high bits.
    #[inline]
    pub fn client_mask(&self) -> i32 {
        self.mask
    }

    /// Returns the next temporary id and advances the cursor by `count`.
    ///
    /// With `count > 1` the call reserves a block starting at the returned
    /// id. The cursor wraps back to `boundary` past `2^26 - 1`, so a block
    /// that crosses the ceiling is not contiguous.
    pub fn allocate_temporary(&mut self, count: u32) -> i32 {
        let id = self.temp;
        let next = i64::from(self.temp) + i64::from(count);
        let ceiling = i64::from(LOCAL_ID_MASK);
        self.temp = if next > ceiling {
            let boundary = i64::from(self.boundary);
            let span = ceiling - boundary + 1;
            (boundary + (next - boundary) % span) as i32
        } else {
            next as i32
        };
        id | self.mask
    }

    /// Returns a permanent id, reusing the smallest freed id first.
    ///
    /// Sequential ids stop at `boundary - 1`; once the range is used up that
    /// id is returned again until something is freed.
    pub fn allocate_permanent(&mut self) -> i32 {
        if let Some(id) = self.freed.pop_first() {
            return id | self.mask;
        }

        let id = self.next_permanent.min(self.boundary - 1);
        #[cfg(feature = "tracing")]
        if self.next_permanent >= self.boundary {
            tracing::warn!(
                client = self.client_id,
                boundary = self.boundary,
                "permanent node id range exhausted, reissuing {id}"
            );
        }
        self.next_permanent = (self.next_permanent + 1).min(self.boundary);
        id | self.mask
    }

    /// Returns a permanent id to the free set.
    ///
    /// Client bits are ignored. Ids at or above the boundary were never
    /// permanent, so freeing them does nothing, and local id 0 is the root
    /// group, which is never handed out. Freeing an id twice is the same as
    /// freeing it once. The id is not checked against what this allocator
    /// has handed out.
    pub fn free_permanent(&mut self, id: i32) {
        let local = id & LOCAL_ID_MASK;
        if (FIRST_PERMANENT_ID..self.boundary).contains(&local) {
            self.freed.insert(local);
        }
    }

    /// Returns the permanent id bound to `name`, allocating one if needed.
    pub fn allocate_named(&mut self, name: &str) -> NamedId {
        if let Some(&id) = self.named.get(name) {
            return NamedId::Existing(id);
        }
        let id = self.allocate_permanent();
        self.named.insert(name.to_owned(), id);
        #[cfg(feature = "tracing")]
        tracing::debug!(client = self.client_id, "named node '{name}' -> {id}");
        NamedId::Fresh(id)
    }

    /// Unbinds `name` and frees its id. Does nothing if `name` is unbound.
    pub fn free_named(&mut self, name: &str) {
        if let Some(id) = self.named.remove(name) {
            self.free_permanent(id);
        }
    }

    /// Id bound to `name`, without allocating.
    pub fn named_id(&self, name: &str) -> Option<i32> {
        self.named.get(name).copied()
    }

    /// Whether the local part of `id` falls in the permanent range.
    pub fn is_permanent(&self, id: i32) -> bool {
        (id & LOCAL_ID_MASK) < self.boundary
    }

    /// Freed permanent ids awaiting reuse, ascending.
    pub fn freed_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.freed.iter().map(move |&id| id | self.mask)
    }

    /// Restores the freshly constructed state, e.g. after a server reboot.
    pub fn reset(&mut self) {
        self.temp = self.boundary;
        self.next_permanent = FIRST_PERMANENT_ID;
        self.freed.clear();
        self.named.clear();
        #[cfg(feature = "tracing")]
        tracing::debug!(client = self.client_id, "node id allocator reset");
    }
}

impl Default for NodeIdAllocator {
    /// Client 0 with the default boundary.
    fn default() -> Self {
        Self::with_checked(0, DEFAULT_BOUNDARY)
    }
}

/// Client id encoded in the high bits of `id`.
#[inline]
pub fn client_of(id: i32) -> u32 {
    (id as u32) >> CLIENT_SHIFT
}

/// Local part of `id`, with the client bits cleared.
#[inline]
pub fn local_id(id: i32) -> i32 {
    id & LOCAL_ID_MASK
}
