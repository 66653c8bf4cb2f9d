use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::html::{
    HtmlElement, HtmlImage, HtmlTable, HtmlTableCell, HtmlTableRow, HtmlText, HyperLink,
    VerticalAlign,
};
use crate::sort::{self, Collator, SortKey};
use crate::tree::TreeIcons;

/// What a node displays: plain text, or text wrapped in a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Text(HtmlText),
    Link(HyperLink),
}

impl Label {
    /// The unescaped display text.
    pub fn text(&self) -> &str {
        match self {
            Label::Text(t) => t.text(),
            Label::Link(l) => l.text(),
        }
    }
}

impl HtmlElement for Label {
    fn to_html(&self) -> String {
        match self {
            Label::Text(t) => t.to_html(),
            Label::Link(l) => l.to_html(),
        }
    }
}

/// One entry in an expandable tree.
///
/// Children keep their insertion order; sorting only affects how an expanded
/// node lists them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    label: Option<Label>,
    icon_link: Option<HyperLink>,
    children: Vec<TreeNode>,
    expanded: bool,
    sort: bool,
    key: Option<u64>,
    token: Option<u64>,
}

impl Default for TreeNode {
    fn default() -> Self {
        Self {
            label: None,
            icon_link: None,
            children: Vec::new(),
            expanded: false,
            sort: true,
            key: None,
            token: None,
        }
    }
}

impl TreeNode {
    /// A node with neither label nor icon link; both must be set before rendering.
    pub fn new() -> Self {
        Self::default()
    }

    /// A node labelled with plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            label: Some(Label::Text(HtmlText::new(text))),
            ..Self::default()
        }
    }

    /// A node whose label is a link.
    pub fn link(link: HyperLink) -> Self {
        Self {
            label: Some(Label::Link(link)),
            ..Self::default()
        }
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn label_text(&self) -> Option<&str> {
        self.label.as_ref().map(Label::text)
    }

    /// Replace the label with plain text, dropping any label link.
    pub fn set_text(&mut self, text: HtmlText) {
        self.label = Some(Label::Text(text));
    }

    /// Replace the label with a link.
    pub fn set_text_link(&mut self, link: HyperLink) {
        self.label = Some(Label::Link(link));
    }

    pub fn icon_link(&self) -> Option<&HyperLink> {
        self.icon_link.as_ref()
    }

    /// Set the expand/collapse link on this node and a copy on every current descendant.
    ///
    /// Children added later do not inherit it.
    pub fn set_icon_link(&mut self, link: HyperLink) {
        for child in &mut self.children {
            child.set_icon_link(link.clone());
        }
        self.icon_link = Some(link);
    }

    pub fn add_child(&mut self, child: TreeNode) {
        self.children.push(child);
    }

    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Remove the child at `index` (insertion order).
    pub fn remove_child(&mut self, index: usize) -> Option<TreeNode> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&TreeNode> {
        self.children.get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut TreeNode> {
        self.children.get_mut(index)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub fn is_sorted(&self) -> bool {
        self.sort
    }

    /// Whether children are collated before an expanded node lists them.
    pub fn set_sort(&mut self, sort: bool) {
        self.sort = sort;
    }

    /// Pin this node's selection token instead of deriving it from its position.
    pub fn set_key(&mut self, key: u64) {
        self.key = Some(key);
    }

    /// The selection token from the most recent resolution pass.
    pub fn token(&self) -> Option<u64> {
        self.token
    }

    /// Render this node and, if expanded, its subtree as table rows.
    pub(crate) fn render(&self, ctx: &RenderContext<'_>) -> Result<Vec<HtmlTableRow>> {
        let icon_link = self
            .icon_link
            .as_ref()
            .ok_or(Error::PropertyNotSet("icon_link"))?;
        let label = self.label.as_ref().ok_or(Error::PropertyNotSet("text"))?;
        let label_cell = HtmlTableCell::from_element(label).no_wrap();

        if self.is_leaf() {
            let icon = ctx
                .icons
                .document
                .as_deref()
                .map(|src| HtmlImage::new(src, "").to_html())
                .unwrap_or_default();
            let row = HtmlTableRow::new()
                .with_valign(VerticalAlign::Top)
                .with_cell(HtmlTableCell::new(icon))
                .with_cell(label_cell);
            return Ok(vec![row]);
        }

        let token = self.token.ok_or(Error::PropertyNotSet("token"))?;
        let (action, src, fallback) = if self.expanded {
            ("contract", ctx.icons.expanded.as_deref(), "-")
        } else {
            ("expand", ctx.icons.collapsed.as_deref(), "+")
        };
        let mut affordance = icon_link.clone();
        affordance.set_parameter(ctx.token_param, token.to_string());
        affordance.set_parameter("action", action);
        let icon = match src {
            Some(src) => HtmlImage::new(src, fallback).to_html(),
            None => fallback.to_string(),
        };

        let mut rows = vec![HtmlTableRow::new()
            .with_valign(VerticalAlign::Top)
            .with_cell(HtmlTableCell::new(affordance.wrap(&icon)))
            .with_cell(label_cell)];

        if self.expanded {
            let mut view: Vec<&TreeNode> = self.children.iter().collect();
            if self.sort {
                sort::sort(ctx.collator, &mut view);
            }
            let mut nested = HtmlTable::new().with_cell_padding(0).with_cell_spacing(0);
            for child in view {
                for row in child.render(ctx)? {
                    nested.add_row(row);
                }
            }
            rows.push(
                HtmlTableRow::new()
                    .with_cell(HtmlTableCell::new(""))
                    .with_cell(HtmlTableCell::from_element(&nested)),
            );
        }
        Ok(rows)
    }
}

impl SortKey for TreeNode {
    fn sort_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.label_text().unwrap_or(""))
    }
}

/// Settings shared by every node during one render.
pub(crate) struct RenderContext<'a> {
    pub icons: &'a TreeIcons,
    pub collator: Option<&'a Collator>,
    pub token_param: &'a str,
}

/// Assign a selection token to every node under `nodes`.
///
/// A derived token hashes the parent's token, the label text and the node's
/// ordinal among same-labelled siblings, so rebuilding the same tree yields
/// the same tokens.
pub(crate) fn resolve_tokens(
    nodes: &mut [TreeNode],
    parent: u64,
    seen: &mut HashSet<u64>,
) -> Result<()> {
    let mut ordinals: HashMap<String, u32> = HashMap::new();
    for node in nodes {
        let text = node.label_text().unwrap_or("").to_string();
        let ordinal = ordinals.entry(text.clone()).or_insert(0);
        let token = node
            .key
            .unwrap_or_else(|| derive_token(parent, &text, *ordinal));
        *ordinal += 1;
        if !seen.insert(token) {
            return Err(Error::DuplicateToken(token));
        }
        node.token = Some(token);
        resolve_tokens(&mut node.children, token, seen)?;
    }
    Ok(())
}

/// Flip the expanded flag of the node holding `token`. Returns whether one was found.
pub(crate) fn toggle(nodes: &mut [TreeNode], token: u64) -> bool {
    for node in nodes {
        if node.token == Some(token) {
            node.expanded = !node.expanded;
            return true;
        }
        if toggle(&mut node.children, token) {
            return true;
        }
    }
    false
}

pub(crate) fn find(nodes: &[TreeNode], token: u64) -> Option<&TreeNode> {
    for node in nodes {
        if node.token == Some(token) {
            return Some(node);
        }
        if let Some(found) = find(&node.children, token) {
            return Some(found);
        }
    }
    None
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a, masked to 53 bits.
fn derive_token(parent: u64, text: &str, ordinal: u32) -> u64 {
    let mut hash = FNV_OFFSET;
    let bytes = parent
        .to_le_bytes()
        .into_iter()
        .chain(text.bytes())
        .chain([0])
        .chain(ordinal.to_le_bytes());
    for b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash & ((1 << 53) - 1)
}
