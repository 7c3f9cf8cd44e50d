use crate::ir::root::RootNode;
use indexmap::IndexMap;
use std::sync::Arc;

/// Every lowered file, keyed by file name.
///
/// Filled during lowering and read-only afterwards; resolution looks up
/// sibling files through it.
#[derive(Debug, Clone, Default)]
pub struct FileMap {
    roots: IndexMap<String, Arc<RootNode>>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a root under its own file name, replacing any previous one.
    pub fn insert(&mut self, root: RootNode) {
        self.roots.insert(root.file_name.clone(), Arc::new(root));
    }

    pub fn get(&self, file_name: &str) -> Option<&RootNode> {
        self.roots.get(file_name).map(Arc::as_ref)
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.roots.contains_key(file_name)
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    pub fn roots(&self) -> impl Iterator<Item = &RootNode> {
        self.roots.values().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl FromIterator<RootNode> for FileMap {
    fn from_iter<I: IntoIterator<Item = RootNode>>(iter: I) -> Self {
        let mut map = FileMap::new();
        for root in iter {
            map.insert(root);
        }
        map
    }
}
