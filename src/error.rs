use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of a map load. A load that returns one of these publishes nothing.
#[derive(Debug, Error)]
pub enum MapError {
    /// The asset locator has no file for this logical name
    #[error("map asset '{0}' could not be located")]
    NotFound(String),

    /// File I/O error
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The descriptor text is not a well-formed element tree
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The descriptor has no root `<map>` element
    #[error("malformed map descriptor: {0}")]
    MalformedDescriptor(String),

    /// Grid or tile dimensions are zero (or were missing/unparsable)
    #[error("map '{name}' has a zero dimension: {width}x{height} tiles of {tile_width}x{tile_height} px")]
    InvalidDimensions {
        /// Map name
        name: String,
        /// Width in tiles
        width: u32,
        /// Height in tiles
        height: u32,
        /// Tile width in pixels
        tile_width: u32,
        /// Tile height in pixels
        tile_height: u32,
    },

    /// Not a single tileset could be resolved to a texture
    #[error("no tileset of map '{0}' could be resolved to a texture")]
    NoValidTilesets(String),
}
