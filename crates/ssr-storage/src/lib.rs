//! Read-only resource loading for the SSR engine.
//!
//! The render engine never touches the filesystem directly. Document
//! templates, pre-rendered pages and stylesheets are all read through the
//! [`ResourceLoader`] trait so that:
//!
//! - caches can be verified with call counts in unit tests
//! - the engine stays independent from where the build output lives
//!
//! # Architecture
//!
//! - [`ResourceLoader`] trait with `read_to_string()` and `exists()`
//! - [`FsLoader`] for the local filesystem
//! - [`MockLoader`] for testing (behind the `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use ssr_storage::{FsLoader, ResourceLoader};
//!
//! let loader = FsLoader::new();
//! if loader.exists(Path::new("dist/browser/index.html")) {
//!     let html = loader.read_to_string(Path::new("dist/browser/index.html"))?;
//! }
//! # Ok::<(), ssr_storage::LoaderError>(())
//! ```

mod fs;
mod loader;
#[cfg(feature = "mock")]
mod mock;

pub use fs::FsLoader;
pub use loader::{LoaderError, LoaderErrorKind, ResourceLoader};
#[cfg(feature = "mock")]
pub use mock::MockLoader;
