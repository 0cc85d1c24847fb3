//! # Tree Query/Mutation Library
//!
//! Stateless algorithms over a list of sibling root nodes (a page's content,
//! the header or the footer).
//!
//! ## Semantics
//!
//! - Lookups walk depth-first, parent before children, and descend into tab
//!   panels. Identifiers are unique, so the first match is the only match.
//! - "Not found" is an ordinary `None`/`false`, never a panic.
//! - Structural changes consult [`crate::rules`] before touching the tree;
//!   a refused insert or move leaves the tree exactly as it was.
//!
//! Child lists are addressed by *slot id*: a container's own id for its
//! `children`, or a tab item's id for that tab's panel.

use crate::factory::default_node;
use crate::rules::is_allowed;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};
use trellis_model::{
    ContainerKind, IdGenerator, Node, NodeId, NodeType, ResponsiveStyle, ResponsiveStylePatch,
    StyleValue, Visibility,
};

/// Style property that carries a column's width share
pub const WIDTH_PROPERTY: &str = "flexBasis";

/// Where a moved node lands relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Before,
    After,
    /// Append to the target's own child list (container node or tab panel)
    Inside,
}

/// Field-level update applied by [`update_by_id`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodePatch {
    /// Empty string clears the name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ResponsiveStylePatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_style: Option<ResponsiveStylePatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// Empty string clears the custom CSS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Shallow-merged into the node's content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Map<String, Value>>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn style(mut self, breakpoint: trellis_model::Breakpoint, property: &str, value: impl Into<StyleValue>) -> Self {
        self.style = Some(self.style.take().unwrap_or_default().set(breakpoint, property, value));
        self
    }

    pub fn hover_style(
        mut self,
        breakpoint: trellis_model::Breakpoint,
        property: &str,
        value: impl Into<StyleValue>,
    ) -> Self {
        self.hover_style = Some(self.hover_style.take().unwrap_or_default().set(breakpoint, property, value));
        self
    }

    pub fn custom_css(mut self, css: impl Into<String>) -> Self {
        self.custom_css = Some(css.into());
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Content keys to merge; non-object values are ignored
    pub fn content(mut self, content: Value) -> Self {
        if let Value::Object(map) = content {
            self.content = Some(map);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// The list that holds a located node
#[derive(Debug, Clone, Copy)]
pub enum ParentRef<'a> {
    /// Synthetic root container (page content, header or footer)
    Root,
    Node(&'a Node),
    Panel { owner: &'a Node, item_id: &'a str },
}

impl<'a> ParentRef<'a> {
    pub fn kind(&self) -> ContainerKind {
        match self {
            ParentRef::Root => ContainerKind::Root,
            ParentRef::Node(node) => node
                .node_type()
                .container_kind()
                .unwrap_or(ContainerKind::Root),
            ParentRef::Panel { .. } => ContainerKind::Panel,
        }
    }

    /// Slot id of the parent list, `None` for the root
    pub fn slot_id(&self) -> Option<&'a str> {
        match self {
            ParentRef::Root => None,
            ParentRef::Node(node) => Some(node.id.as_str()),
            ParentRef::Panel { item_id, .. } => Some(item_id),
        }
    }
}

/// A node together with its parent list and position
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub parent: ParentRef<'a>,
    pub node: &'a Node,
    pub index: usize,
}

/// Where a validated move takes a node from and to (slot ids, `None` = root)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub from: Option<String>,
    pub to: Option<String>,
    pub node_type: NodeType,
}

// Queries

pub fn find_by_id<'a>(roots: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in roots {
        if node.id == id {
            return Some(node);
        }
        for slot in node.slots() {
            if let Some(found) = find_by_id(slot.nodes, id) {
                return Some(found);
            }
        }
    }
    None
}

pub fn find_by_id_mut<'a>(roots: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
    for node in roots.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        for slot in node.slots_mut() {
            if let Some(found) = find_by_id_mut(slot.nodes, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Ancestors of `id`, outermost first, ending with the node itself.
///
/// `None` when `id` is absent; a returned path always ends at `id`.
pub fn find_path<'a>(roots: &'a [Node], id: &str) -> Option<Vec<&'a Node>> {
    for node in roots {
        if node.id == id {
            return Some(vec![node]);
        }
        for slot in node.slots() {
            if let Some(mut tail) = find_path(slot.nodes, id) {
                tail.insert(0, node);
                return Some(tail);
            }
        }
    }
    None
}

pub fn find_with_parent<'a>(roots: &'a [Node], id: &str) -> Option<Located<'a>> {
    locate(roots, id, ParentRef::Root)
}

fn locate<'a>(nodes: &'a [Node], id: &str, parent: ParentRef<'a>) -> Option<Located<'a>> {
    if let Some(index) = nodes.iter().position(|n| n.id == id) {
        return Some(Located {
            parent,
            node: &nodes[index],
            index,
        });
    }
    for node in nodes {
        for slot in node.slots() {
            let parent = match slot.kind {
                ContainerKind::Panel => ParentRef::Panel {
                    owner: node,
                    item_id: slot.id,
                },
                _ => ParentRef::Node(node),
            };
            if let Some(found) = locate(slot.nodes, id, parent) {
                return Some(found);
            }
        }
    }
    None
}

/// Child list addressed by slot id (`None` = the roots themselves)
fn find_slot<'a>(roots: &'a [Node], slot_id: Option<&str>) -> Option<(&'a [Node], ContainerKind)> {
    let Some(slot_id) = slot_id else {
        return Some((roots, ContainerKind::Root));
    };
    for node in roots {
        for slot in node.slots() {
            if slot.id == slot_id {
                return Some((slot.nodes, slot.kind));
            }
            if let Some(found) = find_slot(slot.nodes, Some(slot_id)) {
                return Some(found);
            }
        }
    }
    None
}

fn find_slot_mut<'a>(roots: &'a mut Vec<Node>, slot_id: Option<&str>) -> Option<(&'a mut Vec<Node>, ContainerKind)> {
    let Some(slot_id) = slot_id else {
        return Some((roots, ContainerKind::Root));
    };
    for node in roots.iter_mut() {
        for slot in node.slots_mut() {
            if slot.id == slot_id {
                return Some((slot.nodes, slot.kind));
            }
            if let Some(found) = find_slot_mut(slot.nodes, Some(slot_id)) {
                return Some(found);
            }
        }
    }
    None
}

/// The list holding `id`, that list's kind and the node's index in it
fn parent_list_mut<'a>(
    nodes: &'a mut Vec<Node>,
    kind: ContainerKind,
    id: &str,
) -> Option<(&'a mut Vec<Node>, ContainerKind, usize)> {
    if let Some(index) = nodes.iter().position(|n| n.id == id) {
        return Some((nodes, kind, index));
    }
    for node in nodes.iter_mut() {
        for slot in node.slots_mut() {
            if let Some(found) = parent_list_mut(slot.nodes, slot.kind, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Every identifier in the trees: nodes and id-bearing content items
pub fn collect_ids(roots: &[Node]) -> Vec<String> {
    let mut ids = Vec::new();
    for root in roots {
        root.walk(&mut |node| {
            ids.push(node.id.clone());
            ids.extend(node.item_ids().into_iter().map(String::from));
        });
    }
    ids
}

// Mutations

/// Merge `patch` into node `id`.
///
/// Scalars overwrite; content and each breakpoint's style map are
/// shallow-merged. Returns `false` (and changes nothing) when the node is
/// missing or the merged content breaks the kind's content contract.
pub fn update_by_id(roots: &mut [Node], id: &str, patch: &NodePatch) -> bool {
    update_by_id_reserving(roots, id, patch, &HashSet::new())
}

/// [`update_by_id`], also refusing merged content that reuses an id from
/// `reserved` (the identifiers of the document's other trees).
///
/// Merged content must keep tab panels legal and every identifier unique,
/// since a content patch can carry whole panels and item lists.
pub fn update_by_id_reserving(roots: &mut [Node], id: &str, patch: &NodePatch, reserved: &HashSet<String>) -> bool {
    let mut taken = ids_outside(roots, id);
    let Some(node) = find_by_id_mut(roots, id) else {
        return false;
    };

    // Content first: it is the only part that can be rejected
    if let Some(content) = &patch.content {
        let mut merged = node.clone();
        if let Err(e) = merged.merge_content(content) {
            warn!(node_id = %id, error = %e, "Rejected content update");
            return false;
        }

        taken.extend(reserved.iter().cloned());
        let issues = content_issues(&merged, &taken);
        if let Some(issue) = issues.first() {
            warn!(node_id = %id, issue = %issue, "Rejected content update");
            return false;
        }
        *node = merged;
    }

    if let Some(name) = &patch.name {
        node.name = non_empty(name);
    }
    if let Some(style) = &patch.style {
        node.style.merge(style);
    }
    if let Some(hover) = &patch.hover_style {
        node.hover_style
            .get_or_insert_with(ResponsiveStyle::default)
            .merge(hover);
    }
    if let Some(visibility) = patch.visibility {
        node.visibility = Some(visibility);
    }
    if let Some(css) = &patch.custom_css {
        node.custom_css = non_empty(css);
    }
    if let Some(locked) = patch.locked {
        node.locked = locked;
    }
    true
}

/// Identifiers in `roots` that do not belong to node `id` or its subtree
fn ids_outside(roots: &[Node], id: &str) -> HashSet<String> {
    fn visit(node: &Node, skip: &str, ids: &mut HashSet<String>) {
        if node.id == skip {
            return;
        }
        ids.insert(node.id.clone());
        ids.extend(node.item_ids().into_iter().map(String::from));
        for slot in node.slots() {
            for child in slot.nodes {
                visit(child, skip, ids);
            }
        }
    }

    let mut ids = HashSet::new();
    for root in roots {
        visit(root, id, &mut ids);
    }
    ids
}

/// Containment and identifier problems below `node`, with `taken` holding
/// the ids already used elsewhere
fn content_issues(node: &Node, taken: &HashSet<String>) -> Vec<TreeIssue> {
    let mut issues = Vec::new();
    for slot in node.slots() {
        check_containment(slot.nodes, Some(slot.id), slot.kind, &mut issues);
    }

    let mut seen = HashSet::new();
    node.walk(&mut |n| {
        let own = std::iter::once(n.id.as_str()).chain(n.item_ids());
        for id in own {
            if taken.contains(id) || !seen.insert(id.to_string()) {
                issues.push(TreeIssue::DuplicateId(id.to_string()));
            }
        }
    });
    issues
}

fn non_empty(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Splice node `id` (and its subtree) out of its parent list.
///
/// Width rebalancing of sibling columns is left to the caller.
pub fn remove_by_id(roots: &mut Vec<Node>, id: &str) -> bool {
    take_by_id(roots, id).is_some()
}

/// Remove node `id` and hand it back
pub fn take_by_id(roots: &mut Vec<Node>, id: &str) -> Option<Node> {
    let (list, _, index) = parent_list_mut(roots, ContainerKind::Root, id)?;
    Some(list.remove(index))
}

/// Create a default `node_type` node under the container resolved from `target`.
///
/// Resolution: `None` is the root list; a slot id (container node or tab
/// item) whose list accepts `node_type` gets the node appended; otherwise the
/// node goes right after `target` in the target's own parent list, if that
/// list accepts it. Inserting a column into a row rebalances every column's
/// width share. Returns the new node's id.
pub fn insert_node(
    roots: &mut Vec<Node>,
    target: Option<&str>,
    node_type: NodeType,
    ids: &mut IdGenerator,
) -> Option<NodeId> {
    let destination = resolve_insert(roots, target, node_type)?;
    let node = default_node(node_type, ids);
    let new_id = node.id.clone();

    let (list, kind) = match destination {
        Anchor::Append(slot_id) => {
            let (list, kind) = find_slot_mut(roots, slot_id.as_deref())?;
            list.push(node);
            (list, kind)
        }
        Anchor::After(sibling) => {
            let (list, kind, index) = parent_list_mut(roots, ContainerKind::Root, &sibling)?;
            list.insert(index + 1, node);
            (list, kind)
        }
        Anchor::Before(sibling) => {
            let (list, kind, index) = parent_list_mut(roots, ContainerKind::Root, &sibling)?;
            list.insert(index, node);
            (list, kind)
        }
    };

    if node_type == NodeType::Column && kind == ContainerKind::Row {
        rebalance_columns(list);
    }

    debug!(node_id = %new_id, node_type = %node_type, "Inserted node");
    Some(new_id)
}

enum Anchor {
    Append(Option<String>),
    Before(String),
    After(String),
}

fn resolve_insert(roots: &[Node], target: Option<&str>, node_type: NodeType) -> Option<Anchor> {
    let Some(target) = target else {
        return is_allowed(node_type, ContainerKind::Root).then_some(Anchor::Append(None));
    };

    if let Some((_, kind)) = find_slot(roots, Some(target)) {
        if is_allowed(node_type, kind) {
            return Some(Anchor::Append(Some(target.to_string())));
        }
    }

    if let Some(located) = find_with_parent(roots, target) {
        if is_allowed(node_type, located.parent.kind()) {
            return Some(Anchor::After(target.to_string()));
        }
    }

    debug!(target = %target, node_type = %node_type, "No container accepts inserted node");
    None
}

/// Check a move without performing it
pub fn plan_move(roots: &[Node], source_id: &str, target_id: &str, placement: Placement) -> Option<MovePlan> {
    if source_id == target_id {
        return None;
    }
    let source = find_with_parent(roots, source_id)?;
    let node_type = source.node.node_type();

    let (to, kind) = match placement {
        Placement::Inside => {
            let (_, kind) = find_slot(roots, Some(target_id))?;
            (Some(target_id.to_string()), kind)
        }
        Placement::Before | Placement::After => {
            let target = find_with_parent(roots, target_id)?;
            (target.parent.slot_id().map(String::from), target.parent.kind())
        }
    };

    if !is_allowed(node_type, kind) {
        return None;
    }

    // The target (or target panel) must not live inside the moved subtree
    let inside_source = find_by_id(std::slice::from_ref(source.node), target_id).is_some()
        || find_slot(std::slice::from_ref(source.node), Some(target_id)).is_some();
    if inside_source {
        return None;
    }

    Some(MovePlan {
        from: source.parent.slot_id().map(String::from),
        to,
        node_type,
    })
}

/// Move `source_id` next to (or into) `target_id`.
///
/// Atomic: every check happens before the node is detached, so a refused
/// move leaves the tree untouched. Returns whether the move happened.
pub fn move_node(roots: &mut Vec<Node>, source_id: &str, target_id: &str, placement: Placement) -> bool {
    let Some(plan) = plan_move(roots, source_id, target_id, placement) else {
        debug!(source = %source_id, target = %target_id, ?placement, "Refused illegal move");
        return false;
    };

    let original_index = find_with_parent(roots, source_id).map(|l| l.index).unwrap_or(0);
    let Some(node) = take_by_id(roots, source_id) else {
        return false;
    };

    // Target positions are looked up after the removal, so a shift in a
    // shared parent list is already accounted for
    let anchor = match placement {
        Placement::Inside => Anchor::Append(Some(target_id.to_string())),
        Placement::Before => Anchor::Before(target_id.to_string()),
        Placement::After => Anchor::After(target_id.to_string()),
    };

    match place(roots, anchor, node) {
        Ok(()) => {
            debug!(source = %source_id, target = %target_id, ?placement, "Moved node");
            true
        }
        Err(node) => {
            warn!(source = %source_id, "Move destination vanished, restoring node");
            if let Some((list, _)) = find_slot_mut(roots, plan.from.as_deref()) {
                let index = original_index.min(list.len());
                list.insert(index, node);
            }
            false
        }
    }
}

fn place(roots: &mut Vec<Node>, anchor: Anchor, node: Node) -> Result<(), Node> {
    match anchor {
        Anchor::Append(slot_id) => match find_slot_mut(roots, slot_id.as_deref()) {
            Some((list, _)) => {
                list.push(node);
                Ok(())
            }
            None => Err(node),
        },
        Anchor::Before(sibling) => match parent_list_mut(roots, ContainerKind::Root, &sibling) {
            Some((list, _, index)) => {
                list.insert(index, node);
                Ok(())
            }
            None => Err(node),
        },
        Anchor::After(sibling) => match parent_list_mut(roots, ContainerKind::Root, &sibling) {
            Some((list, _, index)) => {
                list.insert(index + 1, node);
                Ok(())
            }
            None => Err(node),
        },
    }
}

/// Clone node `id` with fresh identifiers throughout and insert the copy
/// right after the original. Returns the copy's id.
pub fn duplicate_by_id(roots: &mut Vec<Node>, id: &str, ids: &mut IdGenerator) -> Option<NodeId> {
    let (list, _, index) = parent_list_mut(roots, ContainerKind::Root, id)?;
    let mut copy = list[index].clone();
    copy.regenerate_ids(ids);
    let new_id = copy.id.clone();
    list.insert(index + 1, copy);

    debug!(source = %id, copy = %new_id, "Duplicated node");
    Some(new_id)
}

// Column widths

/// `100 / count` percent, two decimals, trailing zeros trimmed
pub fn width_share(count: usize) -> String {
    if count <= 1 {
        return "100%".to_string();
    }
    let share = (10_000.0 / count as f64).round() / 100.0;
    let text = format!("{:.2}", share);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", text)
}

/// Give every column in `list` an equal desktop width share
pub fn rebalance_columns(list: &mut [Node]) {
    let count = list
        .iter()
        .filter(|n| n.node_type() == NodeType::Column)
        .count();
    let share = width_share(count);
    for column in list.iter_mut().filter(|n| n.node_type() == NodeType::Column) {
        column
            .style
            .desktop
            .insert(WIDTH_PROPERTY.to_string(), StyleValue::from(share.as_str()));
    }
}

/// Rebalance the columns of row `row_id`; `false` if it is not a row
pub fn rebalance_row(roots: &mut [Node], row_id: &str) -> bool {
    match find_by_id_mut(roots, row_id) {
        Some(row) if row.node_type() == NodeType::Row => {
            if let Some(children) = row.children_mut() {
                rebalance_columns(children);
            }
            true
        }
        _ => false,
    }
}

// Validation

/// Well-formedness problem found by [`validate_tree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeIssue {
    DuplicateId(String),
    IllegalChild {
        parent: Option<String>,
        parent_kind: ContainerKind,
        child: String,
        child_type: NodeType,
    },
}

impl fmt::Display for TreeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeIssue::DuplicateId(id) => write!(f, "duplicate identifier `{}`", id),
            TreeIssue::IllegalChild {
                parent,
                parent_kind,
                child,
                child_type,
            } => write!(
                f,
                "`{}` ({}) is not allowed under {} `{}`",
                child,
                child_type,
                parent_kind,
                parent.as_deref().unwrap_or("<root>")
            ),
        }
    }
}

/// Check identifier uniqueness and containment for a root list
pub fn validate_tree(roots: &[Node]) -> Vec<TreeIssue> {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    for id in collect_ids(roots) {
        if !seen.insert(id.clone()) {
            issues.push(TreeIssue::DuplicateId(id));
        }
    }

    check_containment(roots, None, ContainerKind::Root, &mut issues);
    issues
}

fn check_containment(nodes: &[Node], parent: Option<&str>, kind: ContainerKind, issues: &mut Vec<TreeIssue>) {
    for node in nodes {
        if !is_allowed(node.node_type(), kind) {
            issues.push(TreeIssue::IllegalChild {
                parent: parent.map(String::from),
                parent_kind: kind,
                child: node.id.clone(),
                child_type: node.node_type(),
            });
        }
        for slot in node.slots() {
            check_containment(slot.nodes, Some(slot.id), slot.kind, issues);
        }
    }
}
