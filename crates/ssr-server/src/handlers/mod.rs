//! HTTP request handlers.

pub(crate) mod render;
