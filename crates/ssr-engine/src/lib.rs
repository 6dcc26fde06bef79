//! Server-side rendering engine.
//!
//! [`CommonEngine`] turns a [`RenderRequest`] into HTML:
//!
//! 1. Pre-rendered pages under the public path are served verbatim.
//! 2. The document template is resolved (inline or from a cached file).
//! 3. The [`PlatformRenderer`] renders the application into the template.
//! 4. Critical CSS is inlined, unless disabled for the request.
//!
//! The framework renderer is a collaborator; [`ShellRenderer`] is a minimal
//! implementation that only marks the application root.

mod engine;
mod error;
mod paths;
mod provider;
mod renderer;
mod request;

pub use engine::CommonEngine;
pub use error::EngineError;
pub use provider::{INITIAL_CONFIG, Provider, REQUEST, RESPONSE, SERVER_CONTEXT};
pub use renderer::{PlatformRenderer, RenderError, ShellRenderer};
pub use request::{BootstrapTarget, RenderRequest};
