//! # Node Model
//!
//! The universal tree unit. A [`Node`] carries the fields every kind shares
//! (identity, styles, visibility, lock, custom CSS) plus a [`NodeKind`]:
//! a closed set of tagged variants, one per kind, each holding either the
//! container's `children` or the leaf's typed `content`.
//!
//! ## Wire format
//!
//! ```json
//! {
//!   "id": "a1-7",
//!   "type": "heading",
//!   "style": { "desktop": { "fontSize": "32px" }, "tablet": {}, "mobile": {} },
//!   "content": { "text": "Welcome", "level": 1 }
//! }
//! ```
//!
//! Child lists are loaded leniently: a child missing `id` or `type` (or with
//! an unknown `type`) is dropped with a warning instead of failing the load.

use crate::error::{ModelError, ModelResult};
use crate::id_generator::IdGenerator;
use crate::lenient;
use crate::style::{ResponsiveStyle, Visibility};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub type NodeId = String;

/// Document tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,

    /// Display name shown in layer panels and breadcrumbs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub style: ResponsiveStyle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_style: Option<ResponsiveStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,

    /// Author CSS; the `selector` placeholder is scoped to this node at compile time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,

    #[serde(default)]
    pub locked: bool,

    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    Section {
        #[serde(default, deserialize_with = "lenient::nodes")]
        children: Vec<Node>,
    },
    Row {
        #[serde(default, deserialize_with = "lenient::nodes")]
        children: Vec<Node>,
    },
    Column {
        #[serde(default, deserialize_with = "lenient::nodes")]
        children: Vec<Node>,
    },
    Heading {
        #[serde(default)]
        content: HeadingContent,
    },
    Text {
        #[serde(default)]
        content: TextContent,
    },
    Image {
        #[serde(default)]
        content: ImageContent,
    },
    Button {
        #[serde(default)]
        content: ButtonContent,
    },
    Video {
        #[serde(default)]
        content: VideoContent,
    },
    Icon {
        #[serde(default)]
        content: IconContent,
    },
    Divider {
        #[serde(default)]
        content: DividerContent,
    },
    Spacer {
        #[serde(default)]
        content: SpacerContent,
    },
    List {
        #[serde(default)]
        content: ListContent,
    },
    Form {
        #[serde(default)]
        content: FormContent,
    },
    Tabs {
        #[serde(default)]
        content: TabsContent,
    },
    Accordion {
        #[serde(default)]
        content: AccordionContent,
    },
    Navbar {
        #[serde(default)]
        content: NavbarContent,
    },
    Social {
        #[serde(default)]
        content: SocialContent,
    },
    Map {
        #[serde(default)]
        content: MapContent,
    },
    Embed {
        #[serde(default)]
        content: EmbedContent,
    },
}

/// Payload-free discriminant of [`NodeKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    Section,
    Row,
    Column,
    Heading,
    Text,
    Image,
    Button,
    Video,
    Icon,
    Divider,
    Spacer,
    List,
    Form,
    Tabs,
    Accordion,
    Navbar,
    Social,
    Map,
    Embed,
}

impl NodeType {
    pub const ALL: [NodeType; 19] = [
        NodeType::Section,
        NodeType::Row,
        NodeType::Column,
        NodeType::Heading,
        NodeType::Text,
        NodeType::Image,
        NodeType::Button,
        NodeType::Video,
        NodeType::Icon,
        NodeType::Divider,
        NodeType::Spacer,
        NodeType::List,
        NodeType::Form,
        NodeType::Tabs,
        NodeType::Accordion,
        NodeType::Navbar,
        NodeType::Social,
        NodeType::Map,
        NodeType::Embed,
    ];

    /// Leaf element kinds, in palette order
    pub const ELEMENTS: [NodeType; 16] = [
        NodeType::Heading,
        NodeType::Text,
        NodeType::Image,
        NodeType::Button,
        NodeType::Video,
        NodeType::Icon,
        NodeType::Divider,
        NodeType::Spacer,
        NodeType::List,
        NodeType::Form,
        NodeType::Tabs,
        NodeType::Accordion,
        NodeType::Navbar,
        NodeType::Social,
        NodeType::Map,
        NodeType::Embed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Section => "section",
            NodeType::Row => "row",
            NodeType::Column => "column",
            NodeType::Heading => "heading",
            NodeType::Text => "text",
            NodeType::Image => "image",
            NodeType::Button => "button",
            NodeType::Video => "video",
            NodeType::Icon => "icon",
            NodeType::Divider => "divider",
            NodeType::Spacer => "spacer",
            NodeType::List => "list",
            NodeType::Form => "form",
            NodeType::Tabs => "tabs",
            NodeType::Accordion => "accordion",
            NodeType::Navbar => "navbar",
            NodeType::Social => "social",
            NodeType::Map => "map",
            NodeType::Embed => "embed",
        }
    }

    /// Section, row and column own a `children` list
    pub fn is_container(&self) -> bool {
        matches!(self, NodeType::Section | NodeType::Row | NodeType::Column)
    }

    pub fn is_element(&self) -> bool {
        !self.is_container()
    }

    /// The container kind a node of this type provides to its children
    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            NodeType::Section => Some(ContainerKind::Section),
            NodeType::Row => Some(ContainerKind::Row),
            NodeType::Column => Some(ContainerKind::Column),
            _ => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown node type `{}`", s))
    }
}

/// What a child list belongs to, for containment checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    /// Page content, header or footer list
    Root,
    Section,
    Row,
    Column,
    /// Child list of a single tab item
    Panel,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContainerKind::Root => "root",
            ContainerKind::Section => "section",
            ContainerKind::Row => "row",
            ContainerKind::Column => "column",
            ContainerKind::Panel => "panel",
        };
        f.write_str(s)
    }
}

/// A child list owned by a node: either its own `children` or one tab panel
#[derive(Debug)]
pub struct Slot<'a> {
    /// Id of the owning node, or of the tab item for panels
    pub id: &'a str,
    pub kind: ContainerKind,
    pub nodes: &'a [Node],
}

#[derive(Debug)]
pub struct SlotMut<'a> {
    pub id: &'a str,
    pub kind: ContainerKind,
    pub nodes: &'a mut Vec<Node>,
}

// Content payloads

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeadingContent {
    pub text: String,
    pub level: u8,
}

impl Default for HeadingContent {
    fn default() -> Self {
        Self {
            text: String::new(),
            level: 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextContent {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageContent {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonContent {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoContent {
    pub src: String,
    pub autoplay: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IconContent {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DividerContent {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpacerContent {
    pub height: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListContent {
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormContent {
    pub fields: Vec<FormField>,
    pub submit_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_field_type")]
    pub field_type: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
}

fn default_field_type() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TabsContent {
    pub items: Vec<TabItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::nodes")]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccordionContent {
    pub items: Vec<AccordionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccordionItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavbarContent {
    pub brand: String,
    pub links: Vec<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialContent {
    pub networks: Vec<SocialEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialEntry {
    pub id: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapContent {
    pub address: String,
    pub zoom: u8,
}

impl Default for MapContent {
    fn default() -> Self {
        Self {
            address: String::new(),
            zoom: 14,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbedContent {
    pub html: String,
}

impl Node {
    /// Create a node with empty styles and no optional fields set
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: None,
            style: ResponsiveStyle::default(),
            hover_style: None,
            visibility: None,
            custom_css: None,
            locked: false,
            kind,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match &self.kind {
            NodeKind::Section { .. } => NodeType::Section,
            NodeKind::Row { .. } => NodeType::Row,
            NodeKind::Column { .. } => NodeType::Column,
            NodeKind::Heading { .. } => NodeType::Heading,
            NodeKind::Text { .. } => NodeType::Text,
            NodeKind::Image { .. } => NodeType::Image,
            NodeKind::Button { .. } => NodeType::Button,
            NodeKind::Video { .. } => NodeType::Video,
            NodeKind::Icon { .. } => NodeType::Icon,
            NodeKind::Divider { .. } => NodeType::Divider,
            NodeKind::Spacer { .. } => NodeType::Spacer,
            NodeKind::List { .. } => NodeType::List,
            NodeKind::Form { .. } => NodeType::Form,
            NodeKind::Tabs { .. } => NodeType::Tabs,
            NodeKind::Accordion { .. } => NodeType::Accordion,
            NodeKind::Navbar { .. } => NodeType::Navbar,
            NodeKind::Social { .. } => NodeType::Social,
            NodeKind::Map { .. } => NodeType::Map,
            NodeKind::Embed { .. } => NodeType::Embed,
        }
    }

    /// Label for breadcrumbs: the display name, falling back to the type
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.node_type().as_str())
    }

    /// Own `children` list (containers only)
    pub fn children(&self) -> Option<&Vec<Node>> {
        match &self.kind {
            NodeKind::Section { children }
            | NodeKind::Row { children }
            | NodeKind::Column { children } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.kind {
            NodeKind::Section { children }
            | NodeKind::Row { children }
            | NodeKind::Column { children } => Some(children),
            _ => None,
        }
    }

    /// Every child list this node owns: its `children`, or one per tab panel
    pub fn slots(&self) -> Vec<Slot<'_>> {
        let Node { id, kind, .. } = self;
        match kind {
            NodeKind::Section { children } => vec![Slot { id, kind: ContainerKind::Section, nodes: children }],
            NodeKind::Row { children } => vec![Slot { id, kind: ContainerKind::Row, nodes: children }],
            NodeKind::Column { children } => vec![Slot { id, kind: ContainerKind::Column, nodes: children }],
            NodeKind::Tabs { content } => content
                .items
                .iter()
                .map(|TabItem { id, children, .. }| Slot {
                    id,
                    kind: ContainerKind::Panel,
                    nodes: children,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn slots_mut(&mut self) -> Vec<SlotMut<'_>> {
        let Node { id, kind, .. } = self;
        match kind {
            NodeKind::Section { children } => vec![SlotMut { id, kind: ContainerKind::Section, nodes: children }],
            NodeKind::Row { children } => vec![SlotMut { id, kind: ContainerKind::Row, nodes: children }],
            NodeKind::Column { children } => vec![SlotMut { id, kind: ContainerKind::Column, nodes: children }],
            NodeKind::Tabs { content } => content
                .items
                .iter_mut()
                .map(|TabItem { id, children, .. }| SlotMut {
                    id,
                    kind: ContainerKind::Panel,
                    nodes: children,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Depth-first, parent-before-children walk over this subtree
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for slot in self.slots() {
            for child in slot.nodes {
                child.walk(visit);
            }
        }
    }

    /// Ids of identifier-bearing items inside `content` (not nested nodes)
    pub fn item_ids(&self) -> Vec<&str> {
        match &self.kind {
            NodeKind::List { content } => content.items.iter().map(|i| i.id.as_str()).collect(),
            NodeKind::Form { content } => content.fields.iter().map(|f| f.id.as_str()).collect(),
            NodeKind::Tabs { content } => content.items.iter().map(|i| i.id.as_str()).collect(),
            NodeKind::Accordion { content } => content.items.iter().map(|i| i.id.as_str()).collect(),
            NodeKind::Navbar { content } => content.links.iter().map(|l| l.id.as_str()).collect(),
            NodeKind::Social { content } => content.networks.iter().map(|n| n.id.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Assign fresh identifiers to this node, every nested node and every
    /// identifier-bearing content item
    pub fn regenerate_ids(&mut self, ids: &mut IdGenerator) {
        self.id = ids.new_id();

        match &mut self.kind {
            NodeKind::Section { children }
            | NodeKind::Row { children }
            | NodeKind::Column { children } => {
                for child in children {
                    child.regenerate_ids(ids);
                }
            }
            NodeKind::List { content } => {
                for item in &mut content.items {
                    item.id = ids.new_id();
                }
            }
            NodeKind::Form { content } => {
                for field in &mut content.fields {
                    field.id = ids.new_id();
                }
            }
            NodeKind::Tabs { content } => {
                for item in &mut content.items {
                    item.id = ids.new_id();
                    for child in &mut item.children {
                        child.regenerate_ids(ids);
                    }
                }
            }
            NodeKind::Accordion { content } => {
                for item in &mut content.items {
                    item.id = ids.new_id();
                }
            }
            NodeKind::Navbar { content } => {
                for link in &mut content.links {
                    link.id = ids.new_id();
                }
            }
            NodeKind::Social { content } => {
                for entry in &mut content.networks {
                    entry.id = ids.new_id();
                }
            }
            NodeKind::Heading { .. }
            | NodeKind::Text { .. }
            | NodeKind::Image { .. }
            | NodeKind::Button { .. }
            | NodeKind::Video { .. }
            | NodeKind::Icon { .. }
            | NodeKind::Divider { .. }
            | NodeKind::Spacer { .. }
            | NodeKind::Map { .. }
            | NodeKind::Embed { .. } => {}
        }
    }

    /// Content payload as JSON (`None` for containers)
    pub fn content_value(&self) -> Option<Value> {
        let value = match &self.kind {
            NodeKind::Section { .. } | NodeKind::Row { .. } | NodeKind::Column { .. } => return None,
            NodeKind::Heading { content } => serde_json::to_value(content),
            NodeKind::Text { content } => serde_json::to_value(content),
            NodeKind::Image { content } => serde_json::to_value(content),
            NodeKind::Button { content } => serde_json::to_value(content),
            NodeKind::Video { content } => serde_json::to_value(content),
            NodeKind::Icon { content } => serde_json::to_value(content),
            NodeKind::Divider { content } => serde_json::to_value(content),
            NodeKind::Spacer { content } => serde_json::to_value(content),
            NodeKind::List { content } => serde_json::to_value(content),
            NodeKind::Form { content } => serde_json::to_value(content),
            NodeKind::Tabs { content } => serde_json::to_value(content),
            NodeKind::Accordion { content } => serde_json::to_value(content),
            NodeKind::Navbar { content } => serde_json::to_value(content),
            NodeKind::Social { content } => serde_json::to_value(content),
            NodeKind::Map { content } => serde_json::to_value(content),
            NodeKind::Embed { content } => serde_json::to_value(content),
        };
        value.ok()
    }

    /// Shallow-merge `patch` into the content payload.
    ///
    /// The merged object must still deserialize as this kind's content;
    /// otherwise the node is left untouched.
    pub fn merge_content(&mut self, patch: &Map<String, Value>) -> ModelResult<()> {
        let node_type = self.node_type();
        match &mut self.kind {
            NodeKind::Section { .. } | NodeKind::Row { .. } | NodeKind::Column { .. } => {
                Err(ModelError::NoContent {
                    node_type: node_type.to_string(),
                })
            }
            NodeKind::Heading { content } => merge_into(content, patch, node_type),
            NodeKind::Text { content } => merge_into(content, patch, node_type),
            NodeKind::Image { content } => merge_into(content, patch, node_type),
            NodeKind::Button { content } => merge_into(content, patch, node_type),
            NodeKind::Video { content } => merge_into(content, patch, node_type),
            NodeKind::Icon { content } => merge_into(content, patch, node_type),
            NodeKind::Divider { content } => merge_into(content, patch, node_type),
            NodeKind::Spacer { content } => merge_into(content, patch, node_type),
            NodeKind::List { content } => merge_into(content, patch, node_type),
            NodeKind::Form { content } => merge_into(content, patch, node_type),
            NodeKind::Tabs { content } => merge_into(content, patch, node_type),
            NodeKind::Accordion { content } => merge_into(content, patch, node_type),
            NodeKind::Navbar { content } => merge_into(content, patch, node_type),
            NodeKind::Social { content } => merge_into(content, patch, node_type),
            NodeKind::Map { content } => merge_into(content, patch, node_type),
            NodeKind::Embed { content } => merge_into(content, patch, node_type),
        }
    }
}

fn merge_into<T>(target: &mut T, patch: &Map<String, Value>, node_type: NodeType) -> ModelResult<()>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = match serde_json::to_value(&*target)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }

    let next: T = serde_json::from_value(Value::Object(merged))
        .map_err(|e| ModelError::content_mismatch(node_type.as_str(), e.to_string()))?;
    *target = next;
    Ok(())
}
