//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod paths;
pub(crate) mod render;

pub(crate) use build::BuildArgs;
pub(crate) use paths::PathsArgs;
pub(crate) use render::RenderArgs;
