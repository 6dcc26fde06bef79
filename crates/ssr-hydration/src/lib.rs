//! Node navigation paths and compact hydration state encoding.
//!
//! Leaf utilities used by a hydration layer to re-attach server-rendered DOM
//! to client state without storing absolute node paths:
//!
//! - [`navigate_between`]: Minimal `FirstChild`/`NextSibling` path between two nodes
//! - [`navigate_to`]: Replay a path from a reference node
//! - [`compress_node_location`] / [`decompress_node_location`]: Compact path strings
//! - [`ngh_json`]: Quote-free structural codec for hydration state
//! - [`Document`]: Arena tree implementing [`NodeTree`]
//!
//! # Example
//!
//! ```
//! use ssr_hydration::{Document, NodeNavigationStep, navigate_between};
//!
//! let mut doc = Document::new();
//! let html = doc.append_element(doc.root(), "html");
//! let body = doc.append_element(html, "body");
//! let header = doc.append_element(body, "header");
//! let main = doc.append_element(body, "main");
//!
//! let path = navigate_between(&doc, body, main)?;
//! assert_eq!(path, [NodeNavigationStep::FirstChild, NodeNavigationStep::NextSibling]);
//! # let _ = header;
//! # Ok::<(), ssr_hydration::NavigationError>(())
//! ```

mod error;
mod location;
mod navigation;
pub mod ngh_json;
mod tree;

pub use error::{LocationError, NavigationError, NghError};
pub use location::{NodeLocation, ReferenceNode, compress_node_location, decompress_node_location};
pub use navigation::{NodeNavigationStep, navigate_between, navigate_to};
pub use ngh_json::NghValue;
pub use tree::{Document, NodeId, NodeKind, NodeTree};
