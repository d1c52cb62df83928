//! Tree output formatting for grouped display.
//!
//! Tree-style formatting similar to the `tree` command, with Unicode
//! box-drawing characters for visual hierarchy.

use super::{layer_badge, OutputConfig};
use colored::Colorize;
use lineage_core::Layer;

/// Tree output formatter
pub struct TreeOutput;

/// Tree branch characters
struct TreeChars {
    /// Vertical line for continuing branches (|)
    pipe: &'static str,
    /// Branch for non-last items (|-)
    branch: &'static str,
    /// Branch for last item in a level (L-)
    last: &'static str,
    /// Spacing for items under last branch
    space: &'static str,
}

const UNICODE: TreeChars = TreeChars {
    pipe: "\u{2502}   ",                 // |
    branch: "\u{251c}\u{2500}\u{2500} ", // |--
    last: "\u{2514}\u{2500}\u{2500} ",   // L--
    space: "    ",
};

impl TreeOutput {
    /// Render a root label and its children
    pub fn from_nodes(root: &str, children: &[TreeNode], config: &OutputConfig) -> String {
        let root_str = if config.use_colors() {
            root.bold().to_string()
        } else {
            root.to_string()
        };

        let mut lines = vec![root_str];
        Self::format_nodes(children, config, "", &mut lines);
        lines.join("\n")
    }

    /// Format tree nodes recursively
    fn format_nodes(
        nodes: &[TreeNode],
        config: &OutputConfig,
        prefix: &str,
        lines: &mut Vec<String>,
    ) {
        let chars = &UNICODE;
        let use_colors = config.use_colors();
        let len = nodes.len();

        for (i, node) in nodes.iter().enumerate() {
            let is_last = i == len - 1;
            let connector = if is_last { chars.last } else { chars.branch };
            let child_prefix = format!(
                "{}{}",
                prefix,
                if is_last { chars.space } else { chars.pipe }
            );

            let name_str = if use_colors {
                match node.kind {
                    TreeKind::Group => node.name.blue().bold().to_string(),
                    TreeKind::Layer(layer) => format!("{} {}", layer_badge(layer), node.name),
                    TreeKind::Column => node.name.bright_green().to_string(),
                    TreeKind::Other => node.name.clone(),
                }
            } else {
                match node.kind {
                    TreeKind::Layer(layer) => {
                        format!("[{}] {}", layer.as_str().to_uppercase(), node.name)
                    }
                    _ => node.name.clone(),
                }
            };

            let suffix = node
                .suffix
                .as_ref()
                .map(|s| {
                    if use_colors {
                        format!(" {}", s.dimmed())
                    } else {
                        format!(" {}", s)
                    }
                })
                .unwrap_or_default();

            lines.push(format!("{}{}{}{}", prefix, connector, name_str, suffix));

            if !node.children.is_empty() {
                Self::format_nodes(&node.children, config, &child_prefix, lines);
            }
        }
    }
}

/// A node in the tree structure
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Name of the node
    pub name: String,
    /// Kind of node (for coloring)
    pub kind: TreeKind,
    /// Optional suffix (e.g., row count, column type)
    pub suffix: Option<String>,
    /// Child nodes
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>, kind: TreeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            suffix: None,
            children: Vec::new(),
        }
    }

    /// Builder: add a suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Builder: add children
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }
}

/// Kind of tree node for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeKind {
    /// Grouping heading (system, direction)
    Group,
    /// Job or dataset, badged with its layer
    Layer(Layer),
    /// Schema column
    Column,
    #[default]
    Other,
}
