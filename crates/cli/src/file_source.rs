use anyhow::{Context, Result};
use async_trait::async_trait;
use catalog_picker::{prepare_new_category, CategorySource};
use catalog_taxonomy::{append_root_leaf, parse_tree, CategoryNode, NormalizedCategory};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Category tree kept in a JSON file: an array of `{id, label, children?}` nodes
pub struct JsonFileSource {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Vec<CategoryNode>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read category tree {}", self.path.display()))?;
        parse_tree(&raw)
            .with_context(|| format!("Invalid category tree {}", self.path.display()))
    }

    async fn store(&self, tree: &[CategoryNode]) -> Result<()> {
        let mut body = serde_json::to_string_pretty(tree)?;
        body.push('\n');
        tokio::fs::write(&self.path, body)
            .await
            .with_context(|| format!("Failed to write category tree {}", self.path.display()))
    }
}

#[async_trait]
impl CategorySource for JsonFileSource {
    async fn fetch_tree(&self) -> Result<Vec<CategoryNode>> {
        self.load().await
    }

    async fn create_category(&self, name: &str) -> Result<NormalizedCategory> {
        let _guard = self.write_lock.lock().await;
        let tree = self.load().await?;
        let created = prepare_new_category(&tree, name)?;
        let tree = append_root_leaf(&tree, created.clone().into_leaf());
        self.store(&tree).await?;
        log::info!(
            "Created category {} ({}) in {}",
            created.name,
            created.id,
            self.path.display()
        );
        Ok(created)
    }
}
