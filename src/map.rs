use macroquad::math::{uvec2, UVec2};

use crate::backend::{RenderBackend, TextureProvider};
use crate::batch::{build_layers, Batch, GridInfo, TileLayer};
use crate::diagnostics::LoadDiagnostics;
use crate::error::MapError;
use crate::loader::tmx_loader::{parse_document, MapDescriptor};
use crate::objects::{extract_objects, MapObject};
use crate::tileset::TilesetRegistry;

/// A fully loaded level: batched tile layers plus its objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    name: String,
    size: UVec2,
    tile_size: UVec2,
    layers: Vec<TileLayer>,
    objects: Vec<MapObject>,
    diagnostics: LoadDiagnostics,
}

impl Map {
    /// Parses and batches a TMX document. Nothing is uploaded yet.
    ///
    /// Fails on a missing `<map>` root, a zero dimension, or when no tileset resolves.
    pub fn build(
        name: &str,
        text: &str,
        textures: &mut dyn TextureProvider,
    ) -> Result<Self, MapError> {
        let doc = parse_document(text)?;
        let desc = MapDescriptor::parse(&doc)?;

        if desc.width == 0 || desc.height == 0 || desc.tile_width == 0 || desc.tile_height == 0 {
            return Err(MapError::InvalidDimensions {
                name: name.to_owned(),
                width: desc.width,
                height: desc.height,
                tile_width: desc.tile_width,
                tile_height: desc.tile_height,
            });
        }

        let grid = GridInfo {
            size: uvec2(desc.width, desc.height),
            tile_size: uvec2(desc.tile_width, desc.tile_height),
        };

        let mut diagnostics = LoadDiagnostics::default();
        let tilesets =
            TilesetRegistry::resolve_all(&desc.tilesets, grid.tile_size, textures, &mut diagnostics);
        if tilesets.is_empty() {
            return Err(MapError::NoValidTilesets(name.to_owned()));
        }

        let layers = build_layers(&desc.layers, grid, &tilesets, &mut diagnostics);
        let objects = extract_objects(&desc.object_groups);

        if diagnostics.unresolved_tiles > 0 {
            log::warn!(
                "map '{}': {} tiles matched no tileset",
                name,
                diagnostics.unresolved_tiles
            );
        }

        Ok(Self {
            name: name.to_owned(),
            size: grid.size,
            tile_size: grid.tile_size,
            layers,
            objects,
            diagnostics,
        })
    }

    /// Hands every batch to the backend. Batches already uploaded are left alone.
    pub(crate) fn upload(&mut self, backend: &mut dyn RenderBackend) {
        for batch in self.layers.iter_mut().flat_map(|l| l.batches.iter_mut()) {
            if batch.buffer.is_none() {
                batch.buffer = Some(backend.upload_batch(&batch.vertices, &batch.indices));
            }
        }
    }

    /// Frees every uploaded batch.
    pub(crate) fn release(&mut self, backend: &mut dyn RenderBackend) {
        for batch in self.layers.iter_mut().flat_map(|l| l.batches.iter_mut()) {
            if let Some(handle) = batch.buffer.take() {
                backend.release_buffers(handle);
            }
        }
    }

    /// Draws visible layers in order, each batch with its texture.
    pub(crate) fn draw(&self, backend: &mut dyn RenderBackend) {
        for layer in self.layers.iter().filter(|l| l.visible) {
            for batch in &layer.batches {
                if let Some(handle) = batch.buffer {
                    backend.draw_batch(handle, batch.texture);
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in tiles.
    pub fn size_in_tiles(&self) -> UVec2 {
        self.size
    }

    /// Tile size in pixels.
    pub fn tile_size(&self) -> UVec2 {
        self.tile_size
    }

    /// Size in pixels, or `None` if it does not fit in `u32`.
    pub fn size_in_pixels(&self) -> Option<UVec2> {
        Some(uvec2(
            self.size.x.checked_mul(self.tile_size.x)?,
            self.size.y.checked_mul(self.tile_size.y)?,
        ))
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    /// First layer called `name`.
    pub fn layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// All batches, layer by layer.
    pub fn batches(&self) -> impl Iterator<Item = &Batch> {
        self.layers.iter().flat_map(|l| l.batches.iter())
    }

    pub fn batch_count(&self) -> usize {
        self.batches().count()
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    pub fn objects_by_name<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s MapObject> + 's {
        self.objects.iter().filter(move |o| o.name == name)
    }

    /// Objects whose class (or legacy type) is `kind`.
    pub fn objects_by_type<'s>(&'s self, kind: &'s str) -> impl Iterator<Item = &'s MapObject> + 's {
        self.objects.iter().filter(move |o| o.kind == kind)
    }

    /// What was skipped while loading.
    pub fn diagnostics(&self) -> &LoadDiagnostics {
        &self.diagnostics
    }
}
