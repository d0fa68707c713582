/// Non-fatal problems met while loading one map.
///
/// None of these stop a load; they only mean some tiles will not be drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadDiagnostics {
    /// Image source (or tileset name) of every tileset that was skipped
    pub unresolved_tilesets: Vec<String>,
    /// Cells whose GID matched no resolved tileset
    pub unresolved_tiles: usize,
    /// Layers skipped as a whole, with the reason
    pub skipped_layers: Vec<SkippedLayer>,
}

/// A layer that produced no batches at all because it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLayer {
    /// Layer name (may be empty)
    pub name: String,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Why a layer was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `name` attribute missing or empty
    Unnamed,
    /// No `<data>` element
    NoData,
    /// `<data>` encoding other than CSV
    UnsupportedEncoding(String),
}

impl LoadDiagnostics {
    /// True when the load degraded in no way.
    pub fn is_clean(&self) -> bool {
        self.unresolved_tilesets.is_empty()
            && self.unresolved_tiles == 0
            && self.skipped_layers.is_empty()
    }
}
