//! Seams to the outside world: texture upload, file lookup and GPU buffers.
//!
//! The core only ever talks to these traits. [`crate::render::mq`] provides
//! implementations on top of Macroquad; tests use in-memory fakes.

use std::path::PathBuf;

use crate::geometry::Vertex;

/// Opaque handle of a texture owned by a [`TextureProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Opaque handle of the buffers a [`RenderBackend`] created for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

/// A resolved texture and its size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// Handle used as the batching key
    pub id: TextureId,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Resolves a bare image name (no directory part) to a texture.
///
/// Implementations must be idempotent: asking twice for the same name yields the same handle.
pub trait TextureProvider {
    /// Returns `None` when the image cannot be found or decoded.
    fn resolve_texture(&mut self, name: &str) -> Option<TextureInfo>;
}

/// Finds the file backing a logical asset name.
pub trait AssetLocator {
    /// Path of the file, if any.
    fn find_path(&self, logical_name: &str) -> Option<PathBuf>;
}

/// Device side of a batch: buffer upload, release and draw.
pub trait RenderBackend {
    /// Uploads one finished batch. Called once per batch.
    fn upload_batch(&mut self, vertices: &[Vertex], indices: &[u32]) -> BufferHandle;

    /// Frees the buffers behind `handle`.
    fn release_buffers(&mut self, handle: BufferHandle);

    /// Draws the buffers behind `handle` with `texture` bound.
    fn draw_batch(&mut self, handle: BufferHandle, texture: TextureId);
}
