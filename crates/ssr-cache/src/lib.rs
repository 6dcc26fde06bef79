//! Process-lifetime memoization caches for the SSR engine.
//!
//! Every cache in this crate is keyed by filesystem path, populated lazily on
//! first access and never invalidated: static build output is assumed to be
//! stable for the lifetime of the server process.
//!
//! - [`MemoCache`]: Generic path-keyed memo table
//! - [`TextCache`]: File contents memo ([`TemplateCache`], [`ResourceCache`])
//! - [`StaticPageCache`]: Memoized existence checks for pre-rendered pages
//!
//! # Concurrency
//!
//! Locks are held only for the map lookup or insert, never while reading a
//! file. Two tasks missing the same key concurrently both load it and both
//! insert; since loads are idempotent the outcome is identical.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use ssr_cache::MemoCache;
//!
//! let cache: MemoCache<u32> = MemoCache::new();
//! let value = cache.get_or_try_insert_with(Path::new("/a"), || Ok::<_, ()>(7));
//! assert_eq!(value, Ok(7));
//! assert_eq!(cache.get(Path::new("/a")), Some(7));
//! ```

mod memo;
mod page;
mod text;

pub use memo::MemoCache;
pub use page::StaticPageCache;
pub use text::{ResourceCache, TemplateCache, TextCache};
