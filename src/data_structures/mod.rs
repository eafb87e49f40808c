//! Scene data: the shared geometry table, the texture registry and GPU textures.
//!
//! - `geometry` holds the vertex/index arrays and the builder that authors them
//! - `registry` maps runs of the index array to textures and placements
//! - `texture` contains GPU texture wrapper and creation utilities

pub mod geometry;
pub mod registry;
pub mod texture;
