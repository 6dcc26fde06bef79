//! Critical CSS inlining for server-rendered documents.
//!
//! [`CriticalCssProcessor`] wraps a [`CssInliner`] and gives it access to
//! stylesheets through a process-lifetime [`ResourceCache`](ssr_cache::ResourceCache)
//! plus per-call warning and error collectors. Problems found while inlining
//! are reported in the result and never fail the render.
//!
//! [`StylesheetInliner`] is the built-in inliner: it copies local stylesheets
//! into `<style>` blocks and defers the original `<link>` until load.

mod inliner;
mod processor;
mod stylesheet;

pub use inliner::{CssInliner, InlineSession, InlinerSettings, Preload};
pub use processor::{CriticalCssProcessor, InlineCriticalCssResult, ProcessOptions};
pub use stylesheet::StylesheetInliner;
