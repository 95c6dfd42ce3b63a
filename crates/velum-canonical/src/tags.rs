//! Wire tag registry for the tagged encoding layer.
//!
//! The registry is an explicit, immutable configuration value: constructed
//! once, passed by reference to the encoding/decoding layer, and never
//! mutated afterward, so decoding stays deterministic and thread-safe.
//! Tag numbers are versioned and never reused for a different meaning.

/// Immutable mapping from envelope variant to on-wire CBOR tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRegistry {
    /// Outer tag wrapping a standalone envelope in transport.
    pub envelope: u64,
    /// Tag wrapping a leaf's scalar value.
    pub leaf: u64,
    /// Tag wrapping an assertion's `[predicate, object]` pair.
    pub assertion: u64,
    /// Tag wrapping a known value's numeric identifier.
    pub known_value: u64,
    /// Tag wrapping the interior of a wrapped envelope.
    pub wrapped: u64,
    /// Tag wrapping an encrypted placeholder.
    pub encrypted: u64,
    /// Tag wrapping an elided placeholder's bare digest.
    pub elided: u64,
}

impl TagRegistry {
    /// The standard Velum tag assignment (registry version 1).
    pub const STANDARD: TagRegistry = TagRegistry {
        envelope: 200,
        leaf: 201,
        assertion: 202,
        known_value: 203,
        wrapped: 204,
        encrypted: 205,
        elided: 206,
    };
}
