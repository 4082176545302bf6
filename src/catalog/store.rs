use crate::catalog::filter::filter_products;
use crate::catalog::loader::load_catalog;
use crate::model::{CatalogError, FilterQuery, Product};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::info;

/// One immutable version of the catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub source: Option<PathBuf>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self {
            products: Vec::new(),
            source: None,
            loaded_at: None,
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Shared handle to the current catalog snapshot.
///
/// Readers take an `Arc` of the snapshot and drop the lock before doing
/// any work; a reload builds the new snapshot first and swaps it in.
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    /// Starts out empty: queries return nothing until a catalog is loaded.
    pub fn new() -> Self {
        Self::with_catalog(Catalog::empty())
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        // A poisoned lock still guards a complete snapshot.
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Loads `path` and replaces the current catalog with it.
    ///
    /// On error the previous catalog stays in place.
    pub fn initialize_catalog(&self, path: &Path) -> Result<Arc<Catalog>, CatalogError> {
        let products = load_catalog(path)?;
        let catalog = Arc::new(Catalog {
            products,
            source: Some(path.to_path_buf()),
            loaded_at: Some(Utc::now()),
        });

        self.replace(catalog.clone());
        info!("Loaded {} products from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn replace(&self, catalog: Arc<Catalog>) {
        match self.current.write() {
            Ok(mut guard) => *guard = catalog,
            Err(poisoned) => *poisoned.into_inner() = catalog,
        }
    }

    pub fn filter_products(&self, query: &FilterQuery) -> Vec<Product> {
        let snapshot = self.snapshot();
        filter_products(&snapshot.products, query)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn queries_before_initialization_are_empty() {
        let store = CatalogStore::new();
        assert!(store.filter_products(&FilterQuery::default()).is_empty());
        assert!(store.snapshot().loaded_at.is_none());
    }

    #[test]
    fn reinitialization_replaces_the_whole_catalog() {
        let dir = tempdir().unwrap();
        let old = write(dir.path(), "old.json", r#"[{"id": 1, "name": "Bread", "price": 2}]"#);
        let new = write(dir.path(), "new.json", r#"[{"id": 2, "name": "Jacket", "price": 80}]"#);

        let store = CatalogStore::new();
        store.initialize_catalog(&old).unwrap();
        store.initialize_catalog(&new).unwrap();

        let ids: Vec<i64> = store
            .filter_products(&FilterQuery::default())
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(store.snapshot().source.as_deref(), Some(new.as_path()));
    }

    #[test]
    fn failed_load_keeps_previous_catalog() {
        let dir = tempdir().unwrap();
        let good = write(dir.path(), "good.json", r#"[{"id": 1, "name": "Milk", "price": 1.5}]"#);
        let bad = write(dir.path(), "bad.json", "not json");

        let store = CatalogStore::new();
        store.initialize_catalog(&good).unwrap();

        let missing = store.initialize_catalog(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(CatalogError::NotFound(_))));
        let malformed = store.initialize_catalog(&bad);
        assert!(matches!(malformed, Err(CatalogError::Malformed { .. })));

        let products = store.filter_products(&FilterQuery::default());
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, 1);
    }

    #[test]
    fn readers_see_whole_snapshots_during_reloads() {
        let dir = tempdir().unwrap();
        let three = write(
            dir.path(),
            "three.json",
            r#"[{"id": 1, "price": 1}, {"id": 2, "price": 2}, {"id": 3, "price": 3}]"#,
        );
        let five = write(
            dir.path(),
            "five.json",
            r#"[{"id": 1, "price": 1}, {"id": 2, "price": 2}, {"id": 3, "price": 3},
                {"id": 4, "price": 4}, {"id": 5, "price": 5}]"#,
        );

        let store = Arc::new(CatalogStore::new());
        store.initialize_catalog(&three).unwrap();

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    let path = if i % 2 == 0 { &five } else { &three };
                    store.initialize_catalog(path).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        let len = store.filter_products(&FilterQuery::default()).len();
                        assert!(len == 3 || len == 5, "saw partial catalog of {}", len);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
