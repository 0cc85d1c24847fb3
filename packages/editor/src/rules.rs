//! # Drop-Legality Rules
//!
//! One static containment table shared by the mutation library (hard
//! enforcement) and the drag surface (pre-drop feedback), so the UI never
//! offers a drop the engine would refuse.
//!
//! | parent  | allowed children |
//! |---------|------------------|
//! | root    | section          |
//! | section | row              |
//! | row     | column           |
//! | column  | any element      |
//! | panel   | any element      |

use crate::tree::{self, Placement};
use trellis_model::{ContainerKind, Node, NodeType};

const ROOT_CHILDREN: &[NodeType] = &[NodeType::Section];
const SECTION_CHILDREN: &[NodeType] = &[NodeType::Row];
const ROW_CHILDREN: &[NodeType] = &[NodeType::Column];
const ELEMENT_CHILDREN: &[NodeType] = &NodeType::ELEMENTS;

/// Child kinds a container of `parent` kind may hold
pub fn allowed_children(parent: ContainerKind) -> &'static [NodeType] {
    match parent {
        ContainerKind::Root => ROOT_CHILDREN,
        ContainerKind::Section => SECTION_CHILDREN,
        ContainerKind::Row => ROW_CHILDREN,
        ContainerKind::Column | ContainerKind::Panel => ELEMENT_CHILDREN,
    }
}

pub fn is_allowed(child: NodeType, parent: ContainerKind) -> bool {
    allowed_children(parent).contains(&child)
}

/// Would dropping `dragged_id` at `target_id` be accepted by [`tree::move_node`]?
///
/// Pure check for drag feedback; the tree is never touched.
pub fn can_drop(roots: &[Node], dragged_id: &str, target_id: &str, placement: Placement) -> bool {
    tree::plan_move(roots, dragged_id, target_id, placement).is_some()
}
