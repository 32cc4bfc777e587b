//! Strongly typed view of a layered SVG map.
//!
//! Only the structure the analysis needs survives parsing: groups with
//! their `id` and `inkscape:label`, and path elements with their path data
//! and fill style. Everything else (defs, text, transforms) is dropped.

use crate::config::GroupSelector;
use crate::error::AnalysisError;

/// Namespace of Inkscape's `inkscape:*` attributes.
pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";

/// A parsed vector map. The root group stands for the `<svg>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Group,
}

/// A `<g>` element and everything below it, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub id: Option<String>,
    pub label: Option<String>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Group(Group),
    Path(PathElement),
}

/// A `<path>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    pub id: Option<String>,
    /// Raw path data (`d` attribute).
    pub data: String,
    pub style: Style,
}

/// Parsed `style` declarations, plus the `fill` presentation attribute as
/// a fallback when the style itself does not set `fill`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    declarations: Vec<(String, String)>,
    fill_attribute: Option<String>,
}

impl Document {
    /// Parse SVG text into a document tree.
    pub fn parse(svg: &str) -> Result<Self, AnalysisError> {
        let xml = roxmltree::Document::parse(svg)?;
        let root = xml.root_element();
        let mut group = Group {
            id: root.attribute("id").map(str::to_string),
            label: root.attribute((INKSCAPE_NS, "label")).map(str::to_string),
            children: Vec::new(),
        };
        collect_children(root, &mut group.children);
        Ok(Self { root: group })
    }

    /// Depth-first search for the first group matching `selector`.
    pub fn find_group(&self, selector: &GroupSelector) -> Option<&Group> {
        self.root.find(selector)
    }
}

fn collect_children(node: roxmltree::Node<'_, '_>, out: &mut Vec<Node>) {
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "g" => {
                let mut group = Group {
                    id: child.attribute("id").map(str::to_string),
                    label: child.attribute((INKSCAPE_NS, "label")).map(str::to_string),
                    children: Vec::new(),
                };
                collect_children(child, &mut group.children);
                out.push(Node::Group(group));
            }
            "path" => {
                // A path without data has no geometry to contribute.
                let Some(data) = child.attribute("d") else {
                    continue;
                };
                let mut style = Style::parse(child.attribute("style").unwrap_or(""));
                style.fill_attribute = child.attribute("fill").map(|f| f.trim().to_string());
                out.push(Node::Path(PathElement {
                    id: child.attribute("id").map(str::to_string),
                    data: data.to_string(),
                    style,
                }));
            }
            // Paths are only looked for inside groups and the root.
            "defs" | "metadata" | "text" => {}
            _ => collect_children(child, out),
        }
    }
}

impl Group {
    pub fn matches(&self, selector: &GroupSelector) -> bool {
        self.label.as_deref() == Some(selector.label.as_str())
            && selector
                .id
                .as_deref()
                .map_or(true, |id| self.id.as_deref() == Some(id))
    }

    /// This group or the first matching descendant, pre-order.
    pub fn find(&self, selector: &GroupSelector) -> Option<&Group> {
        if self.matches(selector) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Node::Group(group) => group.find(selector),
            Node::Path(_) => None,
        })
    }

    /// Every path below this group, nested groups included, in document order.
    pub fn descendant_paths(&self) -> Vec<&PathElement> {
        let mut out = Vec::new();
        self.push_paths(&mut out);
        out
    }

    fn push_paths<'a>(&'a self, out: &mut Vec<&'a PathElement>) {
        for child in &self.children {
            match child {
                Node::Group(group) => group.push_paths(out),
                Node::Path(path) => out.push(path),
            }
        }
    }
}

impl Style {
    /// Parse a `prop: value; prop: value` declaration list. Empty and
    /// malformed declarations are skipped.
    pub fn parse(style: &str) -> Self {
        let declarations = style
            .split(';')
            .filter_map(|decl| {
                let (prop, value) = decl.split_once(':')?;
                let prop = prop.trim();
                if prop.is_empty() {
                    return None;
                }
                Some((prop.to_ascii_lowercase(), value.trim().to_string()))
            })
            .collect();
        Self {
            declarations,
            fill_attribute: None,
        }
    }

    /// Value of the last declaration of `prop`, as in CSS cascade order.
    pub fn get(&self, prop: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(p, _)| p == prop)
            .map(|(_, v)| v.as_str())
    }

    /// Effective fill: the style's `fill`, else the `fill` attribute.
    pub fn fill(&self) -> Option<&str> {
        self.get("fill").or(self.fill_attribute.as_deref())
    }

    /// True when the fill equals `token`, ignoring ASCII case.
    pub fn fill_is(&self, token: &str) -> bool {
        self.fill()
            .is_some_and(|fill| fill.eq_ignore_ascii_case(token.trim()))
    }

    /// True when the element is explicitly not filled.
    pub fn is_unfilled(&self) -> bool {
        self.fill_is("none")
    }
}
