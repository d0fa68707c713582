//! Quad and UV math for a single tile. Everything here is a pure function.

use macroquad::math::{vec2, UVec2, Vec2};

use crate::gid::Flip;
use crate::tileset::TilesetEntry;

/// One corner of a tile quad.
///
/// `position` is in map pixel space (origin top-left, y down); `uv` is normalized
/// against the owning texture.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec2,
    pub uv: Vec2,
}

/// What the builder needs to know about the tileset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSource {
    pub columns: u32,
    /// Size of one tile inside the image
    pub tile_size: UVec2,
    pub texture_size: UVec2,
}

impl From<&TilesetEntry> for TileSource {
    fn from(ts: &TilesetEntry) -> Self {
        TileSource {
            columns: ts.columns,
            tile_size: ts.tile_size,
            texture_size: ts.texture_size,
        }
    }
}

/// Texture-space rectangle of a tile, already normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Row and column of `tile_num` inside a tileset image `columns` wide.
///
/// `columns` must be non-zero.
#[inline]
pub fn source_cell(tile_num: u32, columns: u32) -> (u32, u32) {
    let row = if tile_num >= columns { tile_num / columns } else { 0 };
    let col = tile_num % columns;
    (row, col)
}

/// Normalized source rectangle of `tile_num`.
pub fn uv_rect(tile_num: u32, src: &TileSource) -> UvRect {
    let (row, col) = source_cell(tile_num, src.columns);
    let offset_x = col as f32 * src.tile_size.x as f32;
    let offset_y = row as f32 * src.tile_size.y as f32;
    let tex_w = src.texture_size.x as f32;
    let tex_h = src.texture_size.y as f32;

    UvRect {
        left: offset_x / tex_w,
        top: offset_y / tex_h,
        right: (offset_x + src.tile_size.x as f32) / tex_w,
        bottom: (offset_y + src.tile_size.y as f32) / tex_h,
    }
}

// Corner order of every quad, as (is_right, is_bottom)
const CORNERS: [(bool, bool); 4] = [
    (false, true), // left-bottom
    (true, true),  // right-bottom
    (true, false), // right-top
    (false, false), // left-top
];

/// The four vertices of the tile drawn at grid cell `cell`.
///
/// Corners come out left-bottom, right-bottom, right-top, left-top. Flips only move
/// UVs between corners; positions never change.
pub fn tile_quad(
    cell: UVec2,
    grid_tile_size: UVec2,
    tile_num: u32,
    src: &TileSource,
    flip: Flip,
) -> [Vertex; 4] {
    let uv = uv_rect(tile_num, src);
    let tw = grid_tile_size.x as f32;
    let th = grid_tile_size.y as f32;
    let left = cell.x as f32 * tw;
    let top = cell.y as f32 * th;

    CORNERS.map(|(right, bottom)| {
        let position = vec2(
            if right { left + tw } else { left },
            if bottom { top + th } else { top },
        );

        // undo the flips in reverse order to find which source corner lands here
        let (mut sx, mut sy) = (right, bottom);
        if flip.vertical {
            sy = !sy;
        }
        if flip.horizontal {
            sx = !sx;
        }
        if flip.diagonal {
            std::mem::swap(&mut sx, &mut sy);
        }

        Vertex {
            position,
            uv: vec2(
                if sx { uv.right } else { uv.left },
                if sy { uv.bottom } else { uv.top },
            ),
        }
    })
}

/// Two triangles over the quad whose first vertex is `base`.
#[inline]
pub fn quad_indices(base: u32) -> [u32; 6] {
    [base, base + 1, base + 2, base, base + 2, base + 3]
}
