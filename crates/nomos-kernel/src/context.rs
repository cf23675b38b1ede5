use nomos_registry::RegistryStore;
use nomos_spec::SpecStore;
use std::path::Path;

/// The read-only inputs every validator receives.
///
/// Both stores are borrowed for the duration of a run; validators never
/// reach for global state. `root` is only consulted by reference checks,
/// which look for registered locations on disk.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub spec: &'a SpecStore,
    pub registry: &'a RegistryStore,
    pub root: Option<&'a Path>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(spec: &'a SpecStore, registry: &'a RegistryStore) -> Self {
        Self {
            spec,
            registry,
            root: None,
        }
    }

    pub fn with_root(mut self, root: &'a Path) -> Self {
        self.root = Some(root);
        self
    }
}
