//! Groups the tiles of each layer into one batch per texture.

use macroquad::math::{uvec2, UVec2};

use crate::backend::{BufferHandle, TextureId};
use crate::diagnostics::{LoadDiagnostics, SkipReason, SkippedLayer};
use crate::geometry::{quad_indices, tile_quad, TileSource, Vertex};
use crate::gid::TileId;
use crate::loader::tmx_loader::{LayerData, LayerRef};
use crate::tileset::TilesetRegistry;

/// Geometry drawn with a single texture bind.
///
/// Always holds whole quads: `indices.len() == vertices.len() / 4 * 6`.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub texture: TextureId,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Set once the render backend has the buffers
    pub buffer: Option<BufferHandle>,
}

impl Batch {
    pub fn new(texture: TextureId) -> Self {
        Self {
            texture,
            vertices: Vec::new(),
            indices: Vec::new(),
            buffer: None,
        }
    }

    /// Appends a quad and its two triangles.
    pub fn push_quad(&mut self, quad: [Vertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&quad);
        self.indices.extend_from_slice(&quad_indices(base));
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// One tile layer, drawn back to front in batch order.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub name: String,
    pub visible: bool,
    /// Read from the map and kept for callers; backends draw batches fully opaque.
    pub opacity: f32,
    /// In order of first appearance while scanning cells row by row
    pub batches: Vec<Batch>,
}

/// Map-wide inputs shared by every layer.
#[derive(Debug, Clone, Copy)]
pub struct GridInfo {
    /// Size in tiles
    pub size: UVec2,
    /// Tile size in pixels
    pub tile_size: UVec2,
}

/// Batches one layer's cells.
///
/// `cells` is row-major; cells past its end count as empty and extra values are ignored.
/// Cells whose GID matches no tileset are skipped and counted in `diag`.
pub fn batch_cells(
    cells: &[TileId],
    grid: GridInfo,
    tilesets: &TilesetRegistry,
    diag: &mut LoadDiagnostics,
) -> Vec<Batch> {
    let mut batches: Vec<Batch> = Vec::new();
    let width = grid.size.x as usize;
    if width == 0 {
        return batches;
    }
    let cell_count = width.saturating_mul(grid.size.y as usize);

    // bounded by the data, not the declared grid
    for (idx, &id) in cells.iter().take(cell_count).enumerate() {
        if id.is_empty() {
            continue;
        }

        let gid = id.clean();
        let Some(ts) = tilesets.find(gid) else {
            diag.unresolved_tiles += 1;
            continue;
        };

        // few textures per layer, a scan is fine
        let slot = match batches.iter().position(|b| b.texture == ts.texture) {
            Some(i) => i,
            None => {
                batches.push(Batch::new(ts.texture));
                batches.len() - 1
            }
        };

        let cell = uvec2((idx % width) as u32, (idx / width) as u32);
        let quad = tile_quad(
            cell,
            grid.tile_size,
            gid - ts.first_gid,
            &TileSource::from(ts),
            id.flip(),
        );
        batches[slot].push_quad(quad);
    }

    batches.retain(|b| !b.is_empty());
    batches
}

/// Builds every readable layer. Layers without a name or usable data are skipped
/// and recorded in `diag`.
pub fn build_layers(
    layers: &[LayerRef],
    grid: GridInfo,
    tilesets: &TilesetRegistry,
    diag: &mut LoadDiagnostics,
) -> Vec<TileLayer> {
    let mut out = Vec::with_capacity(layers.len());

    for layer in layers {
        let name = layer.name();
        let skip = |reason: SkipReason, diag: &mut LoadDiagnostics| {
            log::warn!("skipping layer '{}': {:?}", name, reason);
            diag.skipped_layers.push(SkippedLayer {
                name: name.to_owned(),
                reason,
            });
        };

        if name.is_empty() {
            skip(SkipReason::Unnamed, diag);
            continue;
        }

        let cells = match layer.data() {
            LayerData::Tiles(cells) => cells,
            LayerData::Unsupported(encoding) => {
                skip(SkipReason::UnsupportedEncoding(encoding), diag);
                continue;
            }
            LayerData::Missing => {
                skip(SkipReason::NoData, diag);
                continue;
            }
        };

        let expected = (grid.size.x as usize).saturating_mul(grid.size.y as usize);
        if cells.len() < expected {
            log::warn!(
                "layer '{}' has {} cells, expected {}; the rest are empty",
                name,
                cells.len(),
                expected
            );
        }

        let batches = batch_cells(&cells, grid, tilesets, diag);
        log::debug!("layer '{}': {} batches", name, batches.len());

        out.push(TileLayer {
            name: name.to_owned(),
            visible: layer.visible(),
            opacity: layer.opacity(),
            batches,
        });
    }
    out
}
