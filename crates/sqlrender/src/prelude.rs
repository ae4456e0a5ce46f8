//! Convenient imports for rendering SQL templates.
//!
//! ```rust
//! use sqlrender::prelude::*;
//! ```

pub use crate::{Dialect, RenderError, RenderedQuery, Renderer, RendererConfig, Value};
