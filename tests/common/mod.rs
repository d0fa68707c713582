// tests/common/mod.rs
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::rc::Rc;

use macroquad_tiled_batch::{
    AssetLocator, BufferHandle, MapStore, RenderBackend, TextureId, TextureInfo, TextureProvider,
    Vertex,
};

/// Knows a fixed set of images and counts every lookup.
#[derive(Default)]
pub struct CountingTextures {
    known: Vec<(String, u32, u32)>,
    pub calls: usize,
}

impl CountingTextures {
    pub fn with(mut self, name: &str, width: u32, height: u32) -> Self {
        self.known.push((name.to_owned(), width, height));
        self
    }
}

impl TextureProvider for CountingTextures {
    fn resolve_texture(&mut self, name: &str) -> Option<TextureInfo> {
        self.calls += 1;
        self.known
            .iter()
            .position(|(n, _, _)| n == name)
            .map(|i| TextureInfo {
                id: TextureId(i as u32 + 100),
                width: self.known[i].1,
                height: self.known[i].2,
            })
    }
}

/// Keeps uploaded buffers in memory and records every call.
#[derive(Default)]
pub struct RecordingBackend {
    next: u32,
    pub live: BTreeMap<BufferHandle, (Vec<Vertex>, Vec<u32>)>,
    pub uploads: usize,
    /// Shared so it can still be read after the owning store is dropped.
    pub released: Rc<RefCell<Vec<BufferHandle>>>,
    pub draws: Vec<(BufferHandle, TextureId)>,
}

impl RenderBackend for RecordingBackend {
    fn upload_batch(&mut self, vertices: &[Vertex], indices: &[u32]) -> BufferHandle {
        let handle = BufferHandle(self.next);
        self.next += 1;
        self.uploads += 1;
        self.live.insert(handle, (vertices.to_vec(), indices.to_vec()));
        handle
    }

    fn release_buffers(&mut self, handle: BufferHandle) {
        self.live.remove(&handle);
        self.released.borrow_mut().push(handle);
    }

    fn draw_batch(&mut self, handle: BufferHandle, texture: TextureId) {
        self.draws.push((handle, texture));
    }
}

/// Maps logical names to fixed paths.
#[derive(Default)]
pub struct MemLocator(pub HashMap<String, PathBuf>);

impl AssetLocator for MemLocator {
    fn find_path(&self, logical_name: &str) -> Option<PathBuf> {
        self.0.get(logical_name).cloned()
    }
}

pub type TestStore = MapStore<MemLocator, CountingTextures, RecordingBackend>;

pub fn textures() -> CountingTextures {
    CountingTextures::default()
        .with("terrain.png", 64, 64)
        .with("props.png", 32, 32)
}

pub fn store() -> TestStore {
    MapStore::new(MemLocator::default(), textures(), RecordingBackend::default())
}

/// 4x3 map, two tilesets, two layers, one object group.
pub const TOWN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" orientation="orthogonal" renderorder="right-down" width="4" height="3" tilewidth="16" tileheight="16">
 <tileset firstgid="1" name="terrain" tilewidth="16" tileheight="16" tilecount="16" columns="4">
  <image source="../tilesets/terrain.png" width="64" height="64"/>
 </tileset>
 <tileset firstgid="17" name="props" tilewidth="16" tileheight="16" tilecount="4" columns="2">
  <image source="props.png" width="32" height="32"/>
 </tileset>
 <layer id="1" name="ground" width="4" height="3">
  <data encoding="csv">
1,2,3,4,
5,6,7,8,
9,10,11,12
</data>
 </layer>
 <layer id="2" name="decor" width="4" height="3">
  <data encoding="csv">
0,17,0,6,
18,0,0,0,
0,0,20,0
</data>
 </layer>
 <objectgroup id="3" name="entities">
  <object id="1" name="spawn" class="player" x="10" y="20" width="32" height="32">
   <properties>
    <property name="team" type="int" value="1"/>
   </properties>
  </object>
  <object id="2" name="chest" class="loot" x="48" y="16" width="16" height="16"/>
  <object id="3" name="chest" class="loot" x="0" y="32" width="16" height="16"/>
 </objectgroup>
</map>
"#;
