//! Name-based loading and caching of MERL tables.
//!
//! Materials refer to measured BRDFs by name (`"gold-metallic-paint"`); the
//! cache resolves `<name>.binary` under its base directory and hands out
//! shared tables, so several spheres using the same measurement read one copy.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::merl::{DimensionCheck, MerlResult, MerlTable};

/// Directory measured BRDFs are looked up in when no base is given.
pub const DEFAULT_BRDF_DIR: &str = "BRDF";

/// File extension of MERL tables.
const MERL_EXTENSION: &str = "binary";

/// Cache for loaded MERL tables.
pub struct BrdfCache {
    /// Cached tables by name
    tables: HashMap<String, Arc<MerlTable>>,

    /// Base directory for resolving names
    base_dir: Option<PathBuf>,

    /// Header policy applied to every load
    check: DimensionCheck,
}

impl BrdfCache {
    /// Create a cache resolving names under [`DEFAULT_BRDF_DIR`].
    pub fn new() -> Self {
        Self::with_base_dir(DEFAULT_BRDF_DIR)
    }

    /// Create a cache with a base directory for relative names.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            tables: HashMap::new(),
            base_dir: Some(base_dir.into()),
            check: DimensionCheck::default(),
        }
    }

    /// Create a cache that treats names as paths relative to the working directory.
    pub fn without_base_dir() -> Self {
        Self {
            tables: HashMap::new(),
            base_dir: None,
            check: DimensionCheck::default(),
        }
    }

    /// Set the header policy for subsequent loads.
    pub fn with_dimension_check(mut self, check: DimensionCheck) -> Self {
        self.check = check;
        self
    }

    /// Load a table by name, using the cache if available.
    pub fn load(&mut self, name: &str) -> MerlResult<Arc<MerlTable>> {
        if let Some(table) = self.tables.get(name) {
            return Ok(table.clone());
        }

        let path = self.resolve_path(name);
        let table = Arc::new(MerlTable::open(&path, self.check)?);
        self.tables.insert(name.to_string(), table.clone());

        log::info!("Loaded measured BRDF '{}' from {}", name, path.display());

        Ok(table)
    }

    /// Get a cached table without loading.
    pub fn get(&self, name: &str) -> Option<Arc<MerlTable>> {
        self.tables.get(name).cloned()
    }

    /// Get the number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Resolve a name to `<base>/<name>.binary`. Absolute names skip the base.
    pub fn resolve_path(&self, name: &str) -> PathBuf {
        // Append rather than replace, so dots in the name survive
        let file = PathBuf::from(format!("{}.{}", name, MERL_EXTENSION));

        if file.is_absolute() {
            file
        } else if let Some(base) = &self.base_dir {
            base.join(file)
        } else {
            file
        }
    }
}

impl Default for BrdfCache {
    fn default() -> Self {
        Self::new()
    }
}
