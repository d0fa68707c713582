#![warn(missing_docs)]

//! Tiled TMX loader that batches tile layers into per-texture meshes.
//!
//! A [`MapStore`] parses a map, resolves each tileset image through a
//! [`TextureProvider`], groups the tiles of every layer into one [`Batch`] per texture
//! and hands the finished batches to a [`RenderBackend`]. The [`render::mq`] module
//! wires all of this to Macroquad.

mod backend;
mod batch;
mod config;
mod diagnostics;
mod error;
mod geometry;
mod gid;
mod loader {
    pub mod tmx_loader;
}
mod locator;
mod map;
mod objects;
mod store;
mod tileset;

/// Macroquad-backed collaborators.
pub mod render {
    pub mod mq;
}

pub use backend::{AssetLocator, BufferHandle, RenderBackend, TextureId, TextureInfo, TextureProvider};
pub use batch::{batch_cells, build_layers, Batch, GridInfo, TileLayer};
pub use config::{AssetConfig, TextureFilter};
pub use diagnostics::{LoadDiagnostics, SkipReason, SkippedLayer};
pub use error::MapError;
pub use geometry::{quad_indices, source_cell, tile_quad, uv_rect, TileSource, UvRect, Vertex};
pub use gid::{Flip, TileId, FLIP_D, FLIP_H, FLIP_V, GID_MASK};
pub use loader::tmx_loader::{
    parse_csv, parse_document, LayerData, LayerRef, MapDescriptor, ObjectGroupRef, TilesetRef,
};
pub use locator::DirLocator;
pub use map::Map;
pub use objects::{extract_objects, MapObject, Property, PropertyValue};
pub use store::MapStore;
pub use tileset::{bare_image_name, TilesetEntry, TilesetRegistry};
