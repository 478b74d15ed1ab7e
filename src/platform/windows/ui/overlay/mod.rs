//! Overlay rendering module.

pub mod renderer;

pub use renderer::Renderer;
