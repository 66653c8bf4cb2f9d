//! Expandable trees rendered statelessly per request.
//!
//! Each branch renders an affordance link carrying its selection token. When
//! the request comes back with that token, the node's expanded flag is
//! flipped before the tree is rendered again.

pub mod node;

use std::collections::HashSet;
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::events::{Observers, PropertyChange};
use crate::html::{HtmlElement, HtmlTable, HyperLink};
use crate::listing::filesystem::{DirectoryHandle, LocalDirectory};
use crate::request::Request;
use crate::sort::{self, Collator};

pub use node::{Label, TreeNode};
use node::RenderContext;

/// Query parameter carrying the selection token unless configured otherwise.
pub const DEFAULT_TOKEN_PARAM: &str = "hashcode";

/// Image URLs for the expand/collapse affordance and for leaves.
///
/// Without an image, branches fall back to `+`/`-` and leaves show no icon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeIcons {
    pub expanded: Option<String>,
    pub collapsed: Option<String>,
    pub document: Option<String>,
}

impl TreeIcons {
    pub fn with_expanded(mut self, url: impl Into<String>) -> Self {
        self.expanded = Some(url.into());
        self
    }

    pub fn with_collapsed(mut self, url: impl Into<String>) -> Self {
        self.collapsed = Some(url.into());
        self
    }

    pub fn with_document(mut self, url: impl Into<String>) -> Self {
        self.document = Some(url.into());
        self
    }
}

/// A forest of [`TreeNode`]s with shared rendering settings.
pub struct HtmlTree {
    elements: Vec<TreeNode>,
    icons: TreeIcons,
    sort: bool,
    collator: Option<Collator>,
    token_param: String,
    observers: Observers,
}

impl Default for HtmlTree {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            icons: TreeIcons::default(),
            sort: true,
            collator: None,
            token_param: DEFAULT_TOKEN_PARAM.to_string(),
            observers: Observers::default(),
        }
    }
}

impl HtmlTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, element: TreeNode) {
        let label = element.label_text().unwrap_or_default().to_string();
        self.elements.push(element);
        self.observers.element_added(&label);
    }

    pub fn remove_element(&mut self, index: usize) -> Option<TreeNode> {
        if index >= self.elements.len() {
            return None;
        }
        let removed = self.elements.remove(index);
        self.observers
            .element_removed(removed.label_text().unwrap_or_default());
        Some(removed)
    }

    pub fn elements(&self) -> &[TreeNode] {
        &self.elements
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut TreeNode> {
        self.elements.get_mut(index)
    }

    pub fn observers_mut(&mut self) -> &mut Observers {
        &mut self.observers
    }

    pub fn icons(&self) -> &TreeIcons {
        &self.icons
    }

    pub fn set_icons(&mut self, icons: TreeIcons) -> bool {
        let change = PropertyChange::new(
            "icons",
            format!("{:?}", self.icons),
            format!("{:?}", icons),
        );
        self.observers.change(change, || self.icons = icons)
    }

    pub fn is_sorted(&self) -> bool {
        self.sort
    }

    /// Whether top-level elements are collated. Nodes control their own children.
    pub fn set_sort(&mut self, sort: bool) -> bool {
        let current = self.sort;
        self.observers
            .change(PropertyChange::new("sort", current, sort), || self.sort = sort)
    }

    pub fn set_locale(&mut self, locale: Option<&str>) -> bool {
        let current = self
            .collator
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_default();
        let collator = Collator::for_locale(locale);
        self.observers.change(
            PropertyChange::new("locale", current, locale.unwrap_or_default()),
            || self.collator = collator,
        )
    }

    pub fn token_param(&self) -> &str {
        &self.token_param
    }

    pub fn set_token_param(&mut self, name: impl Into<String>) {
        self.token_param = name.into();
    }

    /// Give every node its selection token for this pass.
    pub fn assign_tokens(&mut self) -> Result<()> {
        node::resolve_tokens(&mut self.elements, 0, &mut HashSet::new())
    }

    /// Node holding `token` as of the last [`assign_tokens`](Self::assign_tokens).
    pub fn find(&self, token: u64) -> Option<&TreeNode> {
        node::find(&self.elements, token)
    }

    /// Apply the request's selection token, then render the whole tree.
    ///
    /// A missing or non-numeric token leaves every node as it was.
    pub fn render(&mut self, request: &Request) -> Result<String> {
        self.assign_tokens()?;

        let selected = request
            .param(&self.token_param)
            .and_then(|v| v.trim().parse::<u64>().ok());
        if let Some(token) = selected {
            if !node::toggle(&mut self.elements, token) {
                debug!("no tree node with token {}", token);
            }
        }

        let ctx = RenderContext {
            icons: &self.icons,
            collator: self.collator.as_ref(),
            token_param: &self.token_param,
        };
        let mut view: Vec<&TreeNode> = self.elements.iter().collect();
        if self.sort {
            sort::sort(ctx.collator, &mut view);
        }

        let mut table = HtmlTable::new().with_cell_padding(0).with_cell_spacing(0);
        for element in view {
            for row in element.render(&ctx)? {
                table.add_row(row);
            }
        }
        Ok(table.to_html())
    }
}

/// Build a tree mirroring the local directory `path` under `base`, `depth` levels deep.
///
/// Directories get a label link pointing at `script_path` plus their path;
/// unreadable subdirectories are shown without children.
pub fn load_directory(
    base: &Path,
    path: &str,
    depth: usize,
    script_path: &str,
) -> Result<TreeNode> {
    let handle = LocalDirectory::new(base, path);
    let name = match handle.path().rsplit('/').next() {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => "/".to_string(),
    };
    let mut root = TreeNode::link(HyperLink::new(
        format!("{}{}", script_path, crate::encode::url_path(handle.path())),
        name,
    ));
    if depth == 0 {
        return Ok(root);
    }
    for entry in handle.list_children()? {
        let child = if entry.is_directory {
            load_directory(base, &entry.path, depth - 1, script_path)
                .unwrap_or_else(|_| TreeNode::text(entry.name.clone()))
        } else {
            TreeNode::text(entry.name.clone())
        };
        root.add_child(child);
    }
    Ok(root)
}
