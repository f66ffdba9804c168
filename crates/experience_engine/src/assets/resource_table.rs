//! Resource table with a one-time readiness notification

use super::{AssetError, AssetLoader, ModelResource, Resource, SourceDescriptor};
use crate::events::{names, EventBus};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Loaded resources keyed by symbolic name
///
/// All methods take `&self` so handlers of the `ready` event may read the
/// table while it is being filled.
#[derive(Debug, Default)]
pub struct ResourceTable {
    sources: Vec<SourceDescriptor>,
    items: RefCell<HashMap<String, Rc<Resource>>>,
    loaded: Cell<usize>,
    ready: Cell<bool>,
    events: EventBus,
}

impl ResourceTable {
    /// Create a table expecting `sources`
    pub fn new(sources: Vec<SourceDescriptor>) -> Self {
        Self {
            sources,
            ..Self::default()
        }
    }

    /// Event bus carrying the one-time `ready` event
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Sources this table expects
    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    /// Look up a resource
    pub fn get(&self, name: &str) -> Option<Rc<Resource>> {
        self.items.borrow().get(name).cloned()
    }

    /// Look up a model bundle
    pub fn model(&self, name: &str) -> Result<ModelResource, AssetError> {
        self.get(name)
            .and_then(|resource| resource.as_model().cloned())
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    /// Number of sources expected
    pub fn to_load(&self) -> usize {
        self.sources.len()
    }

    /// Number of sources loaded so far
    pub fn loaded(&self) -> usize {
        self.loaded.get()
    }

    /// Fraction of sources loaded, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.sources.is_empty() {
            return if self.ready.get() { 1.0 } else { 0.0 };
        }
        self.loaded.get() as f32 / self.sources.len() as f32
    }

    /// Whether `ready` has fired
    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    /// Record a finished source
    ///
    /// Fires `ready` once when the last expected source arrives.
    pub fn source_loaded(&self, name: &str, resource: Resource) {
        let replaced = self
            .items
            .borrow_mut()
            .insert(name.to_string(), Rc::new(resource))
            .is_some();
        if replaced {
            log::warn!("Resource '{}' loaded twice; keeping the latest", name);
        } else {
            self.loaded.set(self.loaded.get() + 1);
        }
        log::debug!("Loaded '{}' ({}/{})", name, self.loaded.get(), self.to_load());

        if self.loaded.get() >= self.sources.len() {
            self.fire_ready();
        }
    }

    /// Load every expected source through `loader`
    ///
    /// A failed source is logged and never counted, so `ready` does not fire
    /// and input stays inert. An empty source list is ready immediately.
    pub fn load_all(&self, loader: &mut dyn AssetLoader) {
        if self.sources.is_empty() {
            self.fire_ready();
            return;
        }
        for source in &self.sources {
            match loader.load(source) {
                Ok(resource) => self.source_loaded(&source.name, resource),
                Err(e) => log::error!("Failed to load source '{}': {}", source.name, e),
            }
        }
    }

    fn fire_ready(&self) {
        if self.ready.replace(true) {
            return;
        }
        log::info!("Resources ready ({} sources)", self.sources.len());
        self.events.trigger(names::READY, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AnimationClip, SourceKind};
    use crate::foundation::math::Vec3;
    use crate::scene::Aabb;
    use std::path::PathBuf;

    struct FakeLoader {
        fail: Option<&'static str>,
    }

    impl AssetLoader for FakeLoader {
        fn load(&mut self, source: &SourceDescriptor) -> Result<Resource, AssetError> {
            if self.fail == Some(source.name.as_str()) {
                return Err(AssetError::InvalidData("broken".into()));
            }
            Ok(Resource::Model(ModelResource {
                scene_name: source.name.clone(),
                bounds: Aabb::new(Vec3::zeros(), Vec3::repeat(1.0)),
                mesh_count: 1,
                animations: vec![AnimationClip::new("Survey", 3.0)],
            }))
        }
    }

    fn sources(names: &[&str]) -> Vec<SourceDescriptor> {
        names
            .iter()
            .map(|name| SourceDescriptor {
                name: name.to_string(),
                kind: SourceKind::GltfModel,
                path: PathBuf::from(format!("models/{name}.glb")),
            })
            .collect()
    }

    fn ready_counter(table: &ResourceTable) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        table.events().on(names::READY, move |_| sink.set(sink.get() + 1));
        count
    }

    #[test]
    fn test_ready_fires_once_after_last_source() {
        let table = ResourceTable::new(sources(&["fox", "tree"]));
        let fired = ready_counter(&table);

        table.load_all(&mut FakeLoader { fail: None });
        assert!(table.is_ready());
        assert_eq!(fired.get(), 1);
        assert_eq!(table.progress(), 1.0);

        table.source_loaded("fox", Resource::Texture { path: "x.png".into() });
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_failed_source_keeps_table_not_ready() {
        let table = ResourceTable::new(sources(&["fox", "tree"]));
        let fired = ready_counter(&table);

        table.load_all(&mut FakeLoader { fail: Some("tree") });
        assert!(!table.is_ready());
        assert_eq!(fired.get(), 0);
        assert_eq!(table.loaded(), 1);
        assert_eq!(table.progress(), 0.5);
    }

    #[test]
    fn test_ready_handler_can_read_table() {
        let table = Rc::new(ResourceTable::new(sources(&["fox"])));
        let found = Rc::new(Cell::new(false));
        let (reader, sink) = (Rc::downgrade(&table), Rc::clone(&found));
        table.events().on(names::READY, move |_| {
            if let Some(table) = reader.upgrade() {
                sink.set(table.model("fox").is_ok());
            }
        });

        table.load_all(&mut FakeLoader { fail: None });
        assert!(found.get());
    }

    #[test]
    fn test_missing_model_lookup() {
        let table = ResourceTable::new(Vec::new());
        assert!(matches!(table.model("fox"), Err(AssetError::NotFound(_))));
        table.load_all(&mut FakeLoader { fail: None });
        assert!(table.is_ready());
    }
}
