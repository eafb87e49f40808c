//! Render pipelines and the uniforms they consume.
//!
//! - `basic` builds the single textured scene pipeline
//! - `light` holds the point light uniform and its per-frame update

pub mod basic;
pub mod light;
