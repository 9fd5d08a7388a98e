//! Terminal panel rendering.

pub(crate) mod constants;
pub(crate) mod render;
