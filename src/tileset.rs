use macroquad::prelude::*;

use crate::backend::{TextureId, TextureInfo, TextureProvider};
use crate::diagnostics::LoadDiagnostics;
use crate::loader::tmx_loader::TilesetRef;

/// A tileset whose image resolved to a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TilesetEntry {
    pub name: String,
    /// Bare image name the texture was requested under
    pub image: String,
    pub texture: TextureId,
    /// Texture size in pixels
    pub texture_size: UVec2,
    /// Tile size in pixels inside the image
    pub tile_size: UVec2,
    pub columns: u32,
    /// Full rows only: `tile_count / columns`
    pub rows: u32,
    pub tile_count: u32,
    pub first_gid: u32,
}

impl TilesetEntry {
    /// Whether `gid` (flip bits already removed) falls in `[first_gid, first_gid + tile_count)`.
    #[inline]
    pub fn contains(&self, gid: u32) -> bool {
        gid >= self.first_gid && (gid - self.first_gid) < self.tile_count
    }

    /// Exclusive end of the GID range.
    #[inline]
    pub fn end_gid(&self) -> u64 {
        self.first_gid as u64 + self.tile_count as u64
    }
}

/// Drops any directory part, accepting both separators.
pub fn bare_image_name(source: &str) -> &str {
    source
        .rfind(|c| c == '/' || c == '\\')
        .map_or(source, |i| &source[i + 1..])
}

/// Resolves one tileset element against the texture provider.
///
/// `map_tile_size` stands in for a tileset without its own tile size.
/// Returns `None` when there is no image, the provider does not know it, or the
/// grid is unusable (zero columns, zero sized texture).
pub fn resolve(
    tileset: &TilesetRef,
    map_tile_size: UVec2,
    textures: &mut dyn TextureProvider,
) -> Option<TilesetEntry> {
    let image = bare_image_name(tileset.image_source()?);
    if image.is_empty() {
        return None;
    }

    let TextureInfo { id, width, height } = textures.resolve_texture(image)?;
    let columns = tileset.columns();
    if columns == 0 || width == 0 || height == 0 {
        return None;
    }

    let tile_size = match (tileset.tile_width(), tileset.tile_height()) {
        (0, _) | (_, 0) => map_tile_size,
        (w, h) => uvec2(w, h),
    };
    let tile_count = tileset.tile_count();

    Some(TilesetEntry {
        name: tileset.name().to_owned(),
        image: image.to_owned(),
        texture: id,
        texture_size: uvec2(width, height),
        tile_size,
        columns,
        // a partial last row is not counted
        rows: tile_count / columns,
        tile_count,
        first_gid: tileset.first_gid(),
    })
}

/// Resolved tilesets of one map load, sorted by `first_gid`.
#[derive(Debug, Default, Clone)]
pub struct TilesetRegistry {
    entries: Vec<TilesetEntry>,
}

impl TilesetRegistry {
    /// Resolves every tileset, skipping (and recording) the ones that fail.
    pub fn resolve_all(
        tilesets: &[TilesetRef],
        map_tile_size: UVec2,
        textures: &mut dyn TextureProvider,
        diag: &mut LoadDiagnostics,
    ) -> Self {
        let mut registry = Self::default();
        for ts in tilesets {
            match resolve(ts, map_tile_size, textures) {
                Some(entry) => registry.insert(entry, diag),
                None => {
                    let label = ts.image_source().unwrap_or(ts.name()).to_owned();
                    log::warn!("tileset '{}' could not be resolved, skipping", label);
                    diag.unresolved_tilesets.push(label);
                }
            }
        }
        log::debug!("resolved {} of {} tilesets", registry.len(), tilesets.len());
        registry
    }

    /// Adds an entry unless its GID range overlaps one already present.
    pub fn insert(&mut self, entry: TilesetEntry, diag: &mut LoadDiagnostics) {
        let overlaps = self.entries.iter().any(|e| {
            (entry.first_gid as u64) < e.end_gid() && (e.first_gid as u64) < entry.end_gid()
        });
        if overlaps {
            log::warn!(
                "tileset '{}' (gids {}..{}) overlaps an earlier tileset, skipping",
                entry.name,
                entry.first_gid,
                entry.end_gid()
            );
            diag.unresolved_tilesets.push(entry.image);
            return;
        }

        let at = self.entries.partition_point(|e| e.first_gid < entry.first_gid);
        self.entries.insert(at, entry);
    }

    /// Tileset owning `gid` (flip bits already removed).
    pub fn find(&self, gid: u32) -> Option<&TilesetEntry> {
        let idx = self.entries.partition_point(|e| e.first_gid <= gid);
        let candidate = self.entries.get(idx.checked_sub(1)?)?;
        candidate.contains(gid).then_some(candidate)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TilesetEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
