//! Hash map selection for the cache layer.
//!
//! `FastMap` resolves to the fastest enabled backend: `rustc-hash` wins
//! over `ahash`, and the std `HashMap` (SipHash) is the fallback when
//! neither is enabled or `std-hash` is selected explicitly. Keys here are
//! short strings such as pool addresses, where FxHash does well.

#[cfg(feature = "rustc-hash")]
pub type FastMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[cfg(all(feature = "ahash", not(feature = "rustc-hash")))]
pub type FastMap<K, V> = ahash::AHashMap<K, V>;

#[cfg(not(any(feature = "rustc-hash", feature = "ahash")))]
pub type FastMap<K, V> = std::collections::HashMap<K, V>;
