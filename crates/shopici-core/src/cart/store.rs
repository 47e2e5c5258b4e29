//! Cart persistence mirror trait.

use crate::error::Result;

/// Fixed key under which the serialized cart blob is stored.
///
/// The suffix doubles as the format version: a future incompatible format
/// moves to a new key and may still read this one.
pub const CART_STORAGE_KEY: &str = "shopici_cart_v1";

/// A device-local string key-value store used to mirror the cart across
/// sessions.
///
/// Both operations are synchronous from the aggregate's point of view.
/// Implementations must treat an absent key as `Ok(None)`, not an error.
///
/// Callers own the failure policy: hydration falls back to an empty cart and
/// write failures are swallowed, so implementations should not retry or
/// panic on storage problems.
pub trait CartStore: Send + Sync {
    /// Reads the serialized payload stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Stores `payload` under `key`, replacing any previous value.
    fn write(&self, key: &str, payload: &str) -> Result<()>;
}
