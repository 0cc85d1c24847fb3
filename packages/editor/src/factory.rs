//! Default-node factory.
//!
//! The single source of truth for what a brand-new node of each kind looks
//! like. The `match` in [`default_node`] is exhaustive over [`NodeType`], so
//! a new kind cannot be added without a factory entry.

use trellis_model::*;

/// Width share of a freshly created, lone column
pub const FULL_WIDTH: &str = "100%";

/// Build a canonical starting node of `node_type` with fresh identifiers
pub fn default_node(node_type: NodeType, ids: &mut IdGenerator) -> Node {
    let id = ids.new_id();
    let kind = match node_type {
        NodeType::Section => NodeKind::Section {
            children: vec![default_node(NodeType::Row, ids)],
        },
        NodeType::Row => NodeKind::Row {
            children: vec![default_node(NodeType::Column, ids)],
        },
        NodeType::Column => NodeKind::Column { children: Vec::new() },
        NodeType::Heading => NodeKind::Heading {
            content: HeadingContent {
                text: "Heading".to_string(),
                level: 2,
            },
        },
        NodeType::Text => NodeKind::Text {
            content: TextContent {
                text: "Start typing your text here.".to_string(),
            },
        },
        NodeType::Image => NodeKind::Image {
            content: ImageContent {
                src: "https://placehold.co/600x400".to_string(),
                alt: "Placeholder image".to_string(),
            },
        },
        NodeType::Button => NodeKind::Button {
            content: ButtonContent {
                label: "Click me".to_string(),
                href: "#".to_string(),
            },
        },
        NodeType::Video => NodeKind::Video {
            content: VideoContent::default(),
        },
        NodeType::Icon => NodeKind::Icon {
            content: IconContent {
                name: "star".to_string(),
            },
        },
        NodeType::Divider => NodeKind::Divider {
            content: DividerContent::default(),
        },
        NodeType::Spacer => NodeKind::Spacer {
            content: SpacerContent {
                height: "40px".to_string(),
            },
        },
        NodeType::List => NodeKind::List {
            content: ListContent {
                items: (1..=3)
                    .map(|n| ListItem {
                        id: ids.new_id(),
                        text: format!("List item {}", n),
                    })
                    .collect(),
            },
        },
        NodeType::Form => NodeKind::Form {
            content: FormContent {
                fields: vec![
                    form_field(ids, "Name", "text", "Your name", true),
                    form_field(ids, "Email", "email", "you@example.com", true),
                    form_field(ids, "Message", "textarea", "How can we help?", false),
                ],
                submit_label: "Send".to_string(),
            },
        },
        NodeType::Tabs => NodeKind::Tabs {
            content: TabsContent {
                items: (1..=2)
                    .map(|n| TabItem {
                        id: ids.new_id(),
                        title: format!("Tab {}", n),
                        children: vec![default_node(NodeType::Text, ids)],
                    })
                    .collect(),
            },
        },
        NodeType::Accordion => NodeKind::Accordion {
            content: AccordionContent {
                items: (1..=2)
                    .map(|n| AccordionItem {
                        id: ids.new_id(),
                        title: format!("Question {}", n),
                        body: "Answer goes here.".to_string(),
                    })
                    .collect(),
            },
        },
        NodeType::Navbar => NodeKind::Navbar {
            content: NavbarContent {
                brand: "Brand".to_string(),
                links: [("Home", "/"), ("About", "/about"), ("Contact", "/contact")]
                    .into_iter()
                    .map(|(label, href)| NavLink {
                        id: ids.new_id(),
                        label: label.to_string(),
                        href: href.to_string(),
                    })
                    .collect(),
            },
        },
        NodeType::Social => NodeKind::Social {
            content: SocialContent {
                networks: ["facebook", "instagram", "linkedin"]
                    .into_iter()
                    .map(|network| SocialEntry {
                        id: ids.new_id(),
                        network: network.to_string(),
                        url: format!("https://{}.com/", network),
                    })
                    .collect(),
            },
        },
        NodeType::Map => NodeKind::Map {
            content: MapContent {
                address: "New York, NY".to_string(),
                zoom: 14,
            },
        },
        NodeType::Embed => NodeKind::Embed {
            content: EmbedContent {
                html: "<div>Embed code</div>".to_string(),
            },
        },
    };

    let mut node = Node::new(id, kind);
    node.visibility = Some(Visibility::default());
    if node_type == NodeType::Column {
        node.style
            .desktop
            .insert("flexBasis".to_string(), StyleValue::from(FULL_WIDTH));
    }
    node
}

fn form_field(ids: &mut IdGenerator, label: &str, field_type: &str, placeholder: &str, required: bool) -> FormField {
    FormField {
        id: ids.new_id(),
        label: label.to_string(),
        field_type: field_type.to_string(),
        placeholder: placeholder.to_string(),
        required,
    }
}
