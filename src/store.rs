use std::collections::HashMap;

use crate::backend::{AssetLocator, RenderBackend, TextureProvider};
use crate::error::MapError;
use crate::map::Map;

/// Owns every loaded [`Map`] together with the collaborators loading needs.
///
/// A map is published only after parsing, batching and upload all succeeded;
/// failed loads leave the store untouched.
pub struct MapStore<L, T, R>
where
    L: AssetLocator,
    T: TextureProvider,
    R: RenderBackend,
{
    locator: L,
    textures: T,
    backend: R,
    maps: HashMap<String, Map>,
}

impl<L, T, R> MapStore<L, T, R>
where
    L: AssetLocator,
    T: TextureProvider,
    R: RenderBackend,
{
    pub fn new(locator: L, textures: T, backend: R) -> Self {
        Self {
            locator,
            textures,
            backend,
            maps: HashMap::new(),
        }
    }

    /// Loads the map stored under the logical file name `name`.
    ///
    /// Returns the existing map without touching any collaborator if `name` is
    /// already loaded.
    pub fn load(&mut self, name: &str) -> Result<&Map, MapError> {
        if self.maps.contains_key(name) {
            return Ok(&self.maps[name]);
        }

        let path = self
            .locator
            .find_path(name)
            .ok_or_else(|| MapError::NotFound(name.to_owned()))?;
        let text = std::fs::read_to_string(&path).map_err(|source| MapError::Io {
            path: path.clone(),
            source,
        })?;

        self.load_from_str(name, &text)
    }

    /// Like [`MapStore::load`] but takes the descriptor text directly.
    pub fn load_from_str(&mut self, name: &str, text: &str) -> Result<&Map, MapError> {
        if self.maps.contains_key(name) {
            return Ok(&self.maps[name]);
        }

        let mut map = Map::build(name, text, &mut self.textures)?;
        map.upload(&mut self.backend);
        log::info!(
            "loaded map '{}': {} layers, {} batches, {} objects",
            name,
            map.layers().len(),
            map.batch_count(),
            map.objects().len()
        );

        Ok(&*self.maps.entry(name.to_owned()).or_insert(map))
    }

    /// Loaded map, if any. Never does I/O.
    pub fn get(&self, name: &str) -> Option<&Map> {
        self.maps.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.maps.contains_key(name)
    }

    /// Releases the map's GPU buffers and forgets it. Returns false if it was not loaded.
    pub fn unload(&mut self, name: &str) -> bool {
        let Some(mut map) = self.maps.remove(name) else {
            return false;
        };
        map.release(&mut self.backend);
        log::info!("unloaded map '{}'", name);
        true
    }

    /// Unloads everything.
    pub fn clear(&mut self) {
        for (_, mut map) in self.maps.drain() {
            map.release(&mut self.backend);
        }
    }

    /// Issues draw calls for every visible layer of `name`, in order.
    /// Returns false if the map is not loaded.
    pub fn draw(&mut self, name: &str) -> bool {
        match self.maps.get(name) {
            Some(map) => {
                map.draw(&mut self.backend);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Names of loaded maps, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    pub fn textures(&self) -> &T {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut T {
        &mut self.textures
    }

    pub fn backend(&self) -> &R {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut R {
        &mut self.backend
    }
}

impl<L, T, R> Drop for MapStore<L, T, R>
where
    L: AssetLocator,
    T: TextureProvider,
    R: RenderBackend,
{
    fn drop(&mut self) {
        self.clear();
    }
}
