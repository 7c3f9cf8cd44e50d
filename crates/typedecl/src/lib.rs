//! typedecl turns interface declaration files into a format neutral IR with
//! every generic instantiation and cross-file reference resolved.
//!
//! The [`Generator`] drives both phases over a [`FrontEnd`](typedecl_frontend::FrontEnd)
//! and hands each file to the registered [`Renderer`]s.

pub mod config;
pub mod driver;
pub mod error;
pub mod render;

pub use config::TypedeclConfig;
pub use driver::{Generation, Generator, RenderedFile};
pub use error::{Error, Result};
pub use render::{JsonRenderer, RenderMeta, Renderer};
