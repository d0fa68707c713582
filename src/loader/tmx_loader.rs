// src/loader/tmx_loader.rs
use roxmltree::{Document, Node};

use crate::error::MapError;
use crate::gid::TileId;

/// Structural view of a `<map>` element.
///
/// Holds the map-level numbers plus borrowed handles to the tileset, layer and
/// object group elements; later stages read those handles directly.
#[derive(Debug)]
pub struct MapDescriptor<'a, 'input> {
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tilesets: Vec<TilesetRef<'a, 'input>>,
    pub layers: Vec<LayerRef<'a, 'input>>,
    pub object_groups: Vec<ObjectGroupRef<'a, 'input>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TilesetRef<'a, 'input>(Node<'a, 'input>);

#[derive(Debug, Clone, Copy)]
pub struct LayerRef<'a, 'input>(Node<'a, 'input>);

#[derive(Debug, Clone, Copy)]
pub struct ObjectGroupRef<'a, 'input>(Node<'a, 'input>);

/// Decoded cell data of one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerData {
    /// Row-major GIDs
    Tiles(Vec<TileId>),
    /// `<data>` uses an encoding other than CSV
    Unsupported(String),
    /// No `<data>` element
    Missing,
}

/// Parses descriptor text into a document for [`MapDescriptor::parse`].
pub fn parse_document(text: &str) -> Result<Document<'_>, MapError> {
    Ok(Document::parse(text)?)
}

impl<'a, 'input> MapDescriptor<'a, 'input> {
    /// Reads the root `<map>` element of `doc`.
    ///
    /// Missing or unparsable numbers come back as `0`; rejecting those is up to the caller.
    pub fn parse(doc: &'a Document<'input>) -> Result<Self, MapError> {
        let map_node = doc
            .root()
            .children()
            .find(|n| n.has_tag_name("map"))
            .ok_or_else(|| {
                MapError::MalformedDescriptor(format!(
                    "expected root <map> element, found <{}>",
                    doc.root_element().tag_name().name()
                ))
            })?;

        let mut desc = MapDescriptor {
            width: attr_u32(map_node, "width"),
            height: attr_u32(map_node, "height"),
            tile_width: attr_u32(map_node, "tilewidth"),
            tile_height: attr_u32(map_node, "tileheight"),
            tilesets: Vec::new(),
            layers: Vec::new(),
            object_groups: Vec::new(),
        };
        desc.collect_children(map_node);
        Ok(desc)
    }

    // <group> is transparent: its children join the flat lists in document order
    fn collect_children(&mut self, parent: Node<'a, 'input>) {
        for node in parent.children().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "tileset" => self.tilesets.push(TilesetRef(node)),
                "layer" => self.layers.push(LayerRef(node)),
                "objectgroup" => self.object_groups.push(ObjectGroupRef(node)),
                "group" => self.collect_children(node),
                _ => {}
            }
        }
    }
}

impl<'a, 'input> TilesetRef<'a, 'input> {
    pub fn name(&self) -> &'a str {
        self.0.attribute("name").unwrap_or("")
    }

    pub fn first_gid(&self) -> u32 {
        attr_u32(self.0, "firstgid")
    }

    pub fn tile_count(&self) -> u32 {
        attr_u32(self.0, "tilecount")
    }

    pub fn columns(&self) -> u32 {
        attr_u32(self.0, "columns")
    }

    pub fn tile_width(&self) -> u32 {
        attr_u32(self.0, "tilewidth")
    }

    pub fn tile_height(&self) -> u32 {
        attr_u32(self.0, "tileheight")
    }

    /// `source` of the nested `<image>`, as written in the file.
    pub fn image_source(&self) -> Option<&'a str> {
        self.0
            .children()
            .find(|n| n.has_tag_name("image"))
            .and_then(|img| img.attribute("source"))
            .filter(|s| !s.is_empty())
    }
}

impl<'a, 'input> LayerRef<'a, 'input> {
    pub fn name(&self) -> &'a str {
        self.0.attribute("name").unwrap_or("")
    }

    pub fn visible(&self) -> bool {
        self.0.attribute("visible") != Some("0")
    }

    pub fn opacity(&self) -> f32 {
        self.0
            .attribute("opacity")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1.0)
    }

    /// Decodes the layer's `<data>` element.
    pub fn data(&self) -> LayerData {
        let Some(data) = self.0.children().find(|n| n.has_tag_name("data")) else {
            return LayerData::Missing;
        };

        let mut tiles = data.children().filter(|n| n.has_tag_name("tile")).peekable();
        if tiles.peek().is_some() {
            return LayerData::Tiles(tiles.map(|t| TileId(attr_u32(t, "gid"))).collect());
        }

        match data.attribute("encoding") {
            None | Some("csv") => LayerData::Tiles(parse_csv(data.text().unwrap_or(""))),
            Some(other) => LayerData::Unsupported(other.to_owned()),
        }
    }
}

impl<'a, 'input> ObjectGroupRef<'a, 'input> {
    pub fn name(&self) -> &'a str {
        self.0.attribute("name").unwrap_or("")
    }

    pub(crate) fn objects(&self) -> impl Iterator<Item = Node<'a, 'input>> {
        self.0.children().filter(|n| n.has_tag_name("object"))
    }
}

/// Splits a comma separated digit grid into GIDs.
///
/// Whitespace around values is ignored and empty fields are skipped. Parsing stops at
/// the first field that is not an unsigned integer.
pub fn parse_csv(text: &str) -> Vec<TileId> {
    // capacity hint only; trailing commas make it one too many
    let expected = text.bytes().filter(|&b| b == b',').count() + 1;
    let mut out = Vec::with_capacity(expected);

    for field in text.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        match field.parse::<u32>() {
            Ok(gid) => out.push(TileId(gid)),
            Err(_) => {
                log::warn!("stopping CSV decode at non-numeric field '{field}'");
                break;
            }
        }
    }
    out
}

pub(crate) fn attr_u32(node: Node, name: &str) -> u32 {
    node.attribute(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

/// Integer attribute that also accepts decimal text, truncated toward zero.
pub(crate) fn attr_i32_lenient(node: Node, name: &str) -> i32 {
    let Some(v) = node.attribute(name).map(str::trim) else {
        return 0;
    };
    v.parse::<i32>()
        .ok()
        .or_else(|| v.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i32))
        .unwrap_or(0)
}
