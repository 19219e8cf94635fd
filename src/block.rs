use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Formatting applied to an inline span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Plain,
    Bold,
    Italic,
    Code,
    Link,
    Image,
}

impl SpanKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SpanKind::Plain => "text",
            SpanKind::Bold => "bold",
            SpanKind::Italic => "italic",
            SpanKind::Code => "code",
            SpanKind::Link => "link",
            SpanKind::Image => "image",
        }
    }

    /// Whether spans of this kind point somewhere and so need a url.
    pub fn needs_url(self) -> bool {
        matches!(self, SpanKind::Link | SpanKind::Image)
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpanKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" | "plain" => Ok(SpanKind::Plain),
            "bold" => Ok(SpanKind::Bold),
            "italic" => Ok(SpanKind::Italic),
            "code" => Ok(SpanKind::Code),
            "link" => Ok(SpanKind::Link),
            "image" => Ok(SpanKind::Image),
            other => Err(Error::UnknownSpanKind(other.to_string())),
        }
    }
}

/// A run of inline text tagged with one kind of formatting.
///
/// `url` is set for links and images only; `alt_text` for images only.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub content: String,
    pub kind: SpanKind,
    pub url: Option<String>,
    pub alt_text: Option<String>,
}

impl TextSpan {
    pub fn new(content: impl Into<String>, kind: SpanKind) -> Self {
        Self {
            content: content.into(),
            kind,
            url: None,
            alt_text: None,
        }
    }

    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(content, SpanKind::Plain)
    }

    pub fn link(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::new(content, SpanKind::Link)
        }
    }

    pub fn image(alt: impl Into<String>, url: impl Into<String>) -> Self {
        let alt = alt.into();
        Self {
            content: alt.clone(),
            kind: SpanKind::Image,
            url: Some(url.into()),
            alt_text: Some(alt),
        }
    }

    pub fn is_plain(&self) -> bool {
        self.kind == SpanKind::Plain
    }
}

// Alt text is derived from content, so it takes no part in equality.
impl PartialEq for TextSpan {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content && self.kind == other.kind && self.url == other.url
    }
}

impl Eq for TextSpan {}

/// Structural type of a block, decided by its leading markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Heading,
    Code,
    Quote,
    UnorderedList,
    OrderedList,
    Paragraph,
}

/// A blank-line-delimited chunk of markdown, trimmed and classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub text: String,
    pub kind: BlockType,
}
