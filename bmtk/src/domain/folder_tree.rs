// bmtk/src/domain/folder_tree.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::locale::{Locale, Message};

/// Label and id of the synthetic treemap root
pub const TREEMAP_ROOT: &str = "All Bookmarks";
/// Name of the synthetic nested-tree root
pub const TREE_ROOT: &str = "Root";

/// Node of the nested folder tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderTreeNode {
    pub name: String,
    /// Insertion order = first-seen path order
    pub children: Vec<FolderTreeNode>,
    /// Bookmarks whose full folder path equals this node's path
    pub url_count: usize,
    /// Distinct folder paths exactly one segment below this node's path.
    /// Derived from the path index, not from `children.len()`.
    pub subfolder_count: usize,
}

impl FolderTreeNode {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            url_count: 0,
            subfolder_count: 0,
        }
    }

    pub fn child(&self, name: &str) -> Option<&FolderTreeNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns the child with `name`, appending a new one when absent
    pub fn child_mut_or_insert(&mut self, name: &str) -> &mut FolderTreeNode {
        let pos = match self.children.iter().position(|c| c.name == name) {
            Some(pos) => pos,
            None => {
                self.children.push(FolderTreeNode::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[pos]
    }

    /// Follows the given segments from this node
    pub fn find<'a, I>(&self, segments: I) -> Option<&FolderTreeNode>
    where
        I: IntoIterator<Item = &'a str>,
    {
        segments
            .into_iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Number of nodes below this one
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Depth-first pre-order text rendering; the node itself is not printed.
    ///
    /// ```text
    ///   ├─ Work (URLs: 0, Subfolders: 1)
    ///     ├─ Projects (URLs: 2, Subfolders: 0)
    /// ```
    pub fn render_text(&self, locale: Locale) -> String {
        let mut lines = Vec::new();
        for child in &self.children {
            child.render_into(1, locale, &mut lines);
        }
        lines.join("\n")
    }

    fn render_into(&self, depth: usize, locale: Locale, lines: &mut Vec<String>) {
        lines.push(format!(
            "{}├─ {} ({}: {}, {}: {})",
            "  ".repeat(depth),
            self.name,
            Message::UrlCount.text(locale),
            self.url_count,
            Message::SubfolderCount.text(locale),
            self.subfolder_count,
        ));
        for child in &self.children {
            child.render_into(depth + 1, locale, lines);
        }
    }
}

/// How the treemap groups folders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreemapMode {
    /// One node per folder path prefix, nested by path
    #[default]
    Hierarchical,
    /// One flat level keyed by folder name
    Grouped,
}

impl FromStr for TreemapMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hierarchical" => Ok(TreemapMode::Hierarchical),
            "grouped" => Ok(TreemapMode::Grouped),
            other => Err(DomainError::InvalidArgument(format!(
                "Unknown treemap mode: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for TreemapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreemapMode::Hierarchical => write!(f, "hierarchical"),
            TreemapMode::Grouped => write!(f, "grouped"),
        }
    }
}

/// Parallel, index-aligned arrays for an area-proportional chart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreemapData {
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub values: Vec<usize>,
    pub text: Vec<String>,
}

impl TreemapData {
    pub fn push<L, P, T>(&mut self, label: L, parent: P, value: usize, text: T)
    where
        L: Into<String>,
        P: Into<String>,
        T: Into<String>,
    {
        self.labels.push(label.into());
        self.parents.push(parent.into());
        self.values.push(value);
        self.text.push(text.into());
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> FolderTreeNode {
        let mut root = FolderTreeNode::new(TREE_ROOT);
        let work = root.child_mut_or_insert("Work");
        work.subfolder_count = 1;
        let projects = work.child_mut_or_insert("Projects");
        projects.url_count = 2;
        root.child_mut_or_insert("Fun").url_count = 1;
        root
    }

    #[test]
    fn given_tree_when_render_text_then_indents_two_spaces_per_level() {
        let text = sample_tree().render_text(Locale::En);

        let expected = [
            "  ├─ Work (URLs: 0, Subfolders: 1)",
            "    ├─ Projects (URLs: 2, Subfolders: 0)",
            "  ├─ Fun (URLs: 1, Subfolders: 0)",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn given_japanese_locale_when_render_text_then_uses_japanese_labels() {
        let text = sample_tree().render_text(Locale::Ja);

        assert!(text.starts_with("  ├─ Work (URL数: 0, 子フォルダ: 1)"));
    }

    #[test]
    fn given_existing_child_when_inserting_again_then_no_duplicate_is_created() {
        let mut root = sample_tree();

        root.child_mut_or_insert("Work");

        assert_eq!(root.children.len(), 2);
        assert_eq!(root.descendant_count(), 3);
        assert!(root.find(["Work", "Projects"]).is_some());
        assert!(root.find(["Work", "Nope"]).is_none());
    }

    #[test]
    fn given_empty_tree_when_render_text_then_returns_empty_string() {
        assert_eq!(FolderTreeNode::new(TREE_ROOT).render_text(Locale::En), "");
    }
}
