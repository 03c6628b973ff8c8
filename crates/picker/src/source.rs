use anyhow::{bail, Result};
use async_trait::async_trait;
use catalog_taxonomy::{for_each_node, CategoryId, CategoryNode, NormalizedCategory};
use tokio::sync::Mutex;

/// Remote side of the picker: the catalog service's category endpoints
#[async_trait]
pub trait CategorySource: Send + Sync {
    /// Root-level forest
    async fn fetch_tree(&self) -> Result<Vec<CategoryNode>>;

    async fn create_category(&self, name: &str) -> Result<NormalizedCategory>;
}

/// Next free numeric id: one above the largest unsigned numeric id in the tree.
/// `None` once `u64::MAX` is taken.
pub fn next_numeric_id(tree: &[CategoryNode]) -> Option<u64> {
    let mut max = 0u64;
    for_each_node(tree, &mut |node, _| {
        if let Some(id) = node.id.as_u64() {
            max = max.max(id);
        }
    });
    max.checked_add(1)
}

/// Validate a create request against the current forest and assign an id.
///
/// Names must be non-blank and unique among root-level categories
/// (case-insensitive), since new categories always land at the root.
pub fn prepare_new_category(tree: &[CategoryNode], name: &str) -> Result<NormalizedCategory> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Category name must not be empty");
    }
    let lowered = name.to_lowercase();
    if tree
        .iter()
        .any(|node| node.label.trim().to_lowercase() == lowered)
    {
        bail!("Category \"{name}\" already exists at the top level");
    }
    let Some(id) = next_numeric_id(tree) else {
        bail!("No numeric category id left to assign");
    };
    Ok(NormalizedCategory::new(CategoryId::from(id), name))
}

/// In-memory source
#[derive(Debug, Default)]
pub struct StaticSource {
    tree: Mutex<Vec<CategoryNode>>,
}

impl StaticSource {
    pub fn new(tree: Vec<CategoryNode>) -> Self {
        Self {
            tree: Mutex::new(tree),
        }
    }

    pub async fn snapshot(&self) -> Vec<CategoryNode> {
        self.tree.lock().await.clone()
    }
}

#[async_trait]
impl CategorySource for StaticSource {
    async fn fetch_tree(&self) -> Result<Vec<CategoryNode>> {
        Ok(self.tree.lock().await.clone())
    }

    async fn create_category(&self, name: &str) -> Result<NormalizedCategory> {
        let mut tree = self.tree.lock().await;
        let created = prepare_new_category(&tree, name)?;
        tree.push(created.clone().into_leaf());
        Ok(created)
    }
}
