use serde::{Deserialize, Serialize};

/// One entry of the category hierarchy
///
/// Serialized with the keys `url`, `category` and `childrens`, the layout
/// downstream consumers of `hierarchy.json` read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub url: String,

    #[serde(rename = "category")]
    pub label: String,

    #[serde(rename = "childrens", default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Creates a leaf category
    pub fn leaf(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, this node included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(CategoryNode::node_count).sum::<usize>()
    }

    /// Levels in this subtree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(CategoryNode::depth).max().unwrap_or(0)
    }
}

/// The ordered top-level categories of a shop
///
/// Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTree {
    pub roots: Vec<CategoryNode>,
}

impl CategoryTree {
    pub fn new(roots: Vec<CategoryNode>) -> Self {
        Self { roots }
    }

    pub fn node_count(&self) -> usize {
        self.roots.iter().map(CategoryNode::node_count).sum()
    }

    /// Depth of the deepest branch; 0 for an empty tree
    pub fn depth(&self) -> usize {
        self.roots.iter().map(CategoryNode::depth).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
