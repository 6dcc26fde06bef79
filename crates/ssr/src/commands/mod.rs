//! CLI command implementations.

pub(crate) mod ngh;
pub(crate) mod render;
pub(crate) mod serve;

pub(crate) use ngh::NghCommand;
pub(crate) use render::RenderArgs;
pub(crate) use serve::ServeArgs;
