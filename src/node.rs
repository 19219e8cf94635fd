use crate::error::{Error, Result};

/// Tags that render as `<tag />` and so may have no content.
pub const SELF_CLOSING_TAGS: [&str; 3] = ["hr", "br", "img"];

/// HTML attributes, serialized in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `key="value"` pairs joined by single spaces.
    pub fn to_html(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}=\"{v}\""))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn write_into(&self, out: &mut String) {
        if !self.is_empty() {
            out.push(' ');
            out.push_str(&self.to_html());
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

/// A node without children: raw text, a tagged run of text, or a void element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    tag: Option<String>,
    content: Option<String>,
    attributes: Attributes,
}

impl Leaf {
    /// Build a leaf, rejecting missing content on tags that need it.
    pub fn new(tag: Option<&str>, content: Option<String>) -> Result<Self> {
        if content.is_none() && !tag.is_some_and(|t| SELF_CLOSING_TAGS.contains(&t)) {
            return Err(Error::Construction("LeafNode must have a value.".to_string()));
        }
        Ok(Self {
            tag: tag.map(str::to_string),
            content,
            attributes: Attributes::new(),
        })
    }

    /// Untagged text, emitted verbatim.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            tag: None,
            content: Some(content.into()),
            attributes: Attributes::new(),
        }
    }

    pub fn tagged(tag: &str, content: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.to_string()),
            content: Some(content.into()),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn write_html(&self, out: &mut String) {
        match (&self.tag, &self.content) {
            (None, Some(content)) => out.push_str(content),
            (Some(tag), Some(content)) => {
                out.push('<');
                out.push_str(tag);
                self.attributes.write_into(out);
                out.push('>');
                out.push_str(content);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            (Some(tag), None) => {
                out.push('<');
                out.push_str(tag);
                self.attributes.write_into(out);
                out.push_str(" />");
            }
            // Rejected by the constructors.
            (None, None) => {}
        }
    }
}

/// A tagged element owning a non-empty list of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parent {
    tag: String,
    children: Vec<RenderNode>,
    attributes: Attributes,
}

impl Parent {
    pub fn new(tag: &str, children: Vec<RenderNode>) -> Result<Self> {
        if tag.is_empty() {
            return Err(Error::Construction("ParentNode must have a tag.".to_string()));
        }
        if children.is_empty() {
            return Err(Error::Construction(
                "ParentNode must have children.".to_string(),
            ));
        }
        Ok(Self {
            tag: tag.to_string(),
            children,
            attributes: Attributes::new(),
        })
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn children(&self) -> &[RenderNode] {
        &self.children
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        self.attributes.write_into(out);
        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// The intermediate tree markdown compiles into before becoming HTML text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    Leaf(Leaf),
    Parent(Parent),
}

impl RenderNode {
    /// Wrap `children` in a `tag` element.
    pub fn parent(tag: &str, children: Vec<RenderNode>) -> Result<Self> {
        Parent::new(tag, children).map(RenderNode::Parent)
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            RenderNode::Leaf(leaf) => leaf.tag(),
            RenderNode::Parent(parent) => Some(parent.tag()),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            RenderNode::Leaf(leaf) => leaf.write_html(out),
            RenderNode::Parent(parent) => parent.write_html(out),
        }
    }
}

impl From<Leaf> for RenderNode {
    fn from(leaf: Leaf) -> Self {
        RenderNode::Leaf(leaf)
    }
}

impl From<Parent> for RenderNode {
    fn from(parent: Parent) -> Self {
        RenderNode::Parent(parent)
    }
}
