//! Macroquad implementations of [`TextureProvider`] and [`RenderBackend`].
//!
//! Both need a live Macroquad context once they touch the GPU (texture creation,
//! drawing). Splitting batches into meshes does not.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use macroquad::color::WHITE;
use macroquad::models::{draw_mesh, Mesh, Vertex as MqVertex};
use macroquad::texture::{FilterMode, Image, Texture2D};

use crate::backend::{AssetLocator, BufferHandle, RenderBackend, TextureId, TextureInfo, TextureProvider};
use crate::config::{AssetConfig, TextureFilter};
use crate::geometry::Vertex;
use crate::locator::DirLocator;

/// Macroquad meshes index with `u16`, so a mesh holds at most this many quads.
pub const MAX_QUADS_PER_MESH: usize = 16384;

/// Textures shared between [`MacroquadTextures`] and [`MacroquadBackend`].
///
/// A [`TextureId`] is a slot index and stays valid for the life of the bank.
pub struct TextureBank<T = Texture2D> {
    inner: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for TextureBank<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for TextureBank<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: Clone> TextureBank<T> {
    /// Stores `tex` in `slot` when it names an existing slot, else in a new one.
    fn put(&self, slot: Option<TextureId>, tex: T) -> TextureId {
        let mut textures = self.inner.borrow_mut();
        if let Some(id) = slot {
            if let Some(old) = textures.get_mut(id.0 as usize) {
                *old = tex;
                return id;
            }
        }
        textures.push(tex);
        TextureId(textures.len() as u32 - 1)
    }

    pub fn get(&self, id: TextureId) -> Option<T> {
        self.inner.borrow().get(id.0 as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<TextureFilter> for FilterMode {
    fn from(f: TextureFilter) -> Self {
        match f {
            TextureFilter::Nearest => FilterMode::Nearest,
            TextureFilter::Linear => FilterMode::Linear,
        }
    }
}

/// Loads tileset images from disk through an [`AssetLocator`], once per name.
pub struct MacroquadTextures<L: AssetLocator> {
    locator: L,
    filter: FilterMode,
    bank: TextureBank,
    by_name: HashMap<String, TextureInfo>,
}

impl MacroquadTextures<DirLocator> {
    pub fn from_config(config: &AssetConfig) -> Self {
        Self::new(DirLocator::from_config(config), config.filter)
    }
}

impl<L: AssetLocator> MacroquadTextures<L> {
    pub fn new(locator: L, filter: TextureFilter) -> Self {
        Self {
            locator,
            filter: filter.into(),
            bank: TextureBank::default(),
            by_name: HashMap::new(),
        }
    }

    /// Bank to hand to a [`MacroquadBackend`].
    pub fn bank(&self) -> TextureBank {
        self.bank.clone()
    }

    /// Registers an already created texture under `name`.
    ///
    /// Replacing a name reuses its slot, so its [`TextureId`] and any batch drawn
    /// with it pick up the new texture.
    pub fn insert(&mut self, name: &str, tex: Texture2D) -> TextureInfo {
        tex.set_filter(self.filter);
        let (width, height) = (tex.width() as u32, tex.height() as u32);
        let previous = self.by_name.get(name).map(|info| info.id);
        let info = TextureInfo {
            width,
            height,
            id: self.bank.put(previous, tex),
        };
        self.by_name.insert(name.to_owned(), info);
        info
    }

    fn load_from_disk(&self, name: &str) -> anyhow::Result<Texture2D> {
        let path = self
            .locator
            .find_path(name)
            .with_context(|| format!("Locating texture {}", name))?;
        decode_texture(&path)
    }
}

fn decode_texture(path: &Path) -> anyhow::Result<Texture2D> {
    let bytes = std::fs::read(path).with_context(|| format!("Reading texture {}", path.display()))?;
    let image = Image::from_file_with_format(&bytes, None)
        .map_err(|e| anyhow::anyhow!("Decoding texture {}: {:?}", path.display(), e))?;
    Ok(Texture2D::from_image(&image))
}

impl<L: AssetLocator> TextureProvider for MacroquadTextures<L> {
    fn resolve_texture(&mut self, name: &str) -> Option<TextureInfo> {
        if let Some(info) = self.by_name.get(name) {
            return Some(*info);
        }
        match self.load_from_disk(name) {
            Ok(tex) => Some(self.insert(name, tex)),
            Err(err) => {
                log::warn!("{:#}", err);
                None
            }
        }
    }
}

/// Converts a batch into Macroquad meshes of at most [`MAX_QUADS_PER_MESH`] quads.
///
/// Indices must reference only vertices of their own quad, which every
/// [`crate::Batch`] guarantees.
pub fn split_into_meshes(vertices: &[Vertex], indices: &[u32]) -> Vec<Mesh> {
    vertices
        .chunks(MAX_QUADS_PER_MESH * 4)
        .zip(indices.chunks(MAX_QUADS_PER_MESH * 6))
        .enumerate()
        .map(|(n, (verts, idx))| {
            let base = (n * MAX_QUADS_PER_MESH * 4) as u32;
            Mesh {
                vertices: verts
                    .iter()
                    .map(|v| MqVertex::new(v.position.x, v.position.y, 0.0, v.uv.x, v.uv.y, WHITE))
                    .collect(),
                indices: idx.iter().map(|&i| (i - base) as u16).collect(),
                texture: None,
            }
        })
        .collect()
}

/// Keeps uploaded batches as Macroquad meshes and draws them with `draw_mesh`.
pub struct MacroquadBackend {
    bank: TextureBank,
    meshes: HashMap<BufferHandle, Vec<Mesh>>,
    next_handle: u32,
}

impl MacroquadBackend {
    pub fn new(bank: TextureBank) -> Self {
        Self {
            bank,
            meshes: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Number of live uploaded batches.
    pub fn live_batches(&self) -> usize {
        self.meshes.len()
    }
}

impl RenderBackend for MacroquadBackend {
    fn upload_batch(&mut self, vertices: &[Vertex], indices: &[u32]) -> BufferHandle {
        let handle = BufferHandle(self.next_handle);
        self.next_handle += 1;
        self.meshes.insert(handle, split_into_meshes(vertices, indices));
        handle
    }

    fn release_buffers(&mut self, handle: BufferHandle) {
        self.meshes.remove(&handle);
    }

    fn draw_batch(&mut self, handle: BufferHandle, texture: TextureId) {
        let Some(meshes) = self.meshes.get_mut(&handle) else {
            return;
        };
        let tex = self.bank.get(texture);
        if tex.is_none() {
            log::warn!("drawing batch {:?} with unknown texture {:?}", handle, texture);
        }
        for mesh in meshes.iter_mut() {
            mesh.texture = tex.clone();
            draw_mesh(mesh);
        }
    }
}
