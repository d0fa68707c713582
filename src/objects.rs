use macroquad::math::{ivec2, uvec2, IVec2, UVec2};
use roxmltree::Node;

use crate::loader::tmx_loader::{attr_i32_lenient, attr_u32, ObjectGroupRef};

/// A `<property>` as written in the map. All three fields are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Property {
    pub name: String,
    /// Declared type (`int`, `bool`, ...); empty when omitted
    pub kind: String,
    pub value: String,
}

/// A property value interpreted according to its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    /// `string`, `file`, `color`, `class`, untyped, or anything that failed to parse
    String(String),
}

impl Property {
    /// Interprets `value` by `kind`. A value that does not parse as its type stays a string.
    pub fn parsed(&self) -> PropertyValue {
        let v = self.value.trim();
        let parsed = match self.kind.as_str() {
            "bool" => v.parse().ok().map(PropertyValue::Bool),
            "int" | "object" => v.parse().ok().map(PropertyValue::Int),
            "float" => v.parse().ok().map(PropertyValue::Float),
            _ => None,
        };
        parsed.unwrap_or_else(|| PropertyValue::String(self.value.clone()))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.parsed() {
            PropertyValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.parsed() {
            PropertyValue::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self.parsed() {
            PropertyValue::Float(f) => Some(f),
            PropertyValue::Int(i) => Some(i as f32),
            _ => None,
        }
    }
}

/// A positioned entity from an object group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapObject {
    pub id: u32,
    pub name: String,
    /// `class`, or the legacy `type` attribute
    pub kind: String,
    /// Name of the object group it came from
    pub group: String,
    /// Pixels, top-left of the map
    pub position: IVec2,
    pub size: UVec2,
    /// Declaration order; repeated names are kept
    pub properties: Vec<Property>,
}

impl MapObject {
    /// First property called `name`.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Every property called `name`, in declaration order.
    pub fn properties_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Property> + 's {
        self.properties.iter().filter(move |p| p.name == name)
    }
}

fn read_property(node: Node) -> Property {
    let attr = |name: &str| node.attribute(name).unwrap_or("").to_owned();
    Property {
        name: attr("name"),
        kind: attr("type"),
        // multi-line strings live in the element text
        value: node
            .attribute("value")
            .or_else(|| node.text())
            .unwrap_or("")
            .to_owned(),
    }
}

fn read_object(node: Node, group: &str) -> MapObject {
    let class = node
        .attribute("class")
        .filter(|c| !c.is_empty())
        .or_else(|| node.attribute("type"))
        .unwrap_or("");

    let properties = node
        .children()
        .find(|n| n.has_tag_name("properties"))
        .map(|props| {
            props
                .children()
                .filter(|n| n.has_tag_name("property"))
                .map(read_property)
                .collect()
        })
        .unwrap_or_default();

    MapObject {
        id: attr_u32(node, "id"),
        name: node.attribute("name").unwrap_or("").to_owned(),
        kind: class.to_owned(),
        group: group.to_owned(),
        position: ivec2(attr_i32_lenient(node, "x"), attr_i32_lenient(node, "y")),
        size: uvec2(
            attr_i32_lenient(node, "width").max(0) as u32,
            attr_i32_lenient(node, "height").max(0) as u32,
        ),
        properties,
    }
}

/// Every object of every group, groups in document order.
pub fn extract_objects(groups: &[ObjectGroupRef]) -> Vec<MapObject> {
    groups
        .iter()
        .flat_map(|group| {
            let name = group.name();
            group.objects().map(move |node| read_object(node, name))
        })
        .collect()
}
