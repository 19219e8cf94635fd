use std::sync::LazyLock;

use regex::Regex;

use crate::block::{SpanKind, TextSpan};
use crate::error::{Error, Result};
use crate::node::{Leaf, RenderNode};

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("Invalid image regex"));

// `regex` has no lookbehind, so image syntax is skipped by hand in `find_links`.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("Invalid link regex"));

/// Delimiter passes, applied in this order.
const DELIMITERS: [(&str, SpanKind); 3] = [
    ("**", SpanKind::Bold),
    ("*", SpanKind::Italic),
    ("`", SpanKind::Code),
];

/// A `[text](url)` style reference found in a run of text.
struct Reference {
    start: usize,
    end: usize,
    text: String,
    url: String,
}

/// Split raw inline markdown into typed spans, in source order.
///
/// Each pass only looks at spans still plain after the previous ones, so
/// formatting never nests: `**a *b* c**` is a single bold span.
pub fn tokenize(text: &str) -> Result<Vec<TextSpan>> {
    let mut spans = vec![TextSpan::plain(text)];
    for (delimiter, kind) in DELIMITERS {
        spans = split_nodes_delimiter(spans, delimiter, kind)?;
    }
    let spans = split_nodes_image(spans);
    Ok(split_nodes_link(spans))
}

/// Tokenize `text` and convert every span to a render node.
pub fn text_to_children(text: &str) -> Result<Vec<RenderNode>> {
    tokenize(text)?.iter().map(span_to_node).collect()
}

/// Split every plain span on `delimiter`, tagging the odd pieces with `kind`.
///
/// Fails when a span holds an unpaired delimiter.
pub fn split_nodes_delimiter(
    spans: Vec<TextSpan>,
    delimiter: &str,
    kind: SpanKind,
) -> Result<Vec<TextSpan>> {
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        if !span.is_plain() {
            out.push(span);
            continue;
        }

        let parts: Vec<&str> = span.content.split(delimiter).collect();
        if parts.len() % 2 == 0 {
            return Err(Error::UnmatchedDelimiter {
                delimiter: delimiter.to_string(),
                text: span.content.clone(),
            });
        }

        for (i, part) in parts.into_iter().enumerate() {
            if i % 2 == 1 {
                out.push(TextSpan::new(part, kind));
            } else if !part.is_empty() {
                out.push(TextSpan::plain(part));
            }
        }
    }

    Ok(out)
}

/// Pull `![alt](url)` images out of plain spans.
pub fn split_nodes_image(spans: Vec<TextSpan>) -> Vec<TextSpan> {
    split_references(spans, find_images, |alt, url| TextSpan::image(alt, url))
}

/// Pull `[text](url)` links out of plain spans.
pub fn split_nodes_link(spans: Vec<TextSpan>) -> Vec<TextSpan> {
    split_references(spans, find_links, |text, url| TextSpan::link(text, url))
}

/// `(alt, url)` for every image in `text`.
pub fn extract_markdown_images(text: &str) -> Vec<(String, String)> {
    find_images(text)
        .into_iter()
        .map(|r| (r.text, r.url))
        .collect()
}

/// `(text, url)` for every link in `text`, ignoring images.
pub fn extract_markdown_links(text: &str) -> Vec<(String, String)> {
    find_links(text)
        .into_iter()
        .map(|r| (r.text, r.url))
        .collect()
}

/// Convert one span into the leaf that renders it.
pub fn span_to_node(span: &TextSpan) -> Result<RenderNode> {
    let leaf = match span.kind {
        SpanKind::Plain => Leaf::text(&span.content),
        SpanKind::Bold => Leaf::tagged("b", &span.content),
        SpanKind::Italic => Leaf::tagged("i", &span.content),
        SpanKind::Code => Leaf::tagged("code", &span.content),
        SpanKind::Link => {
            let url = span.url.as_deref().ok_or(Error::MissingUrl(span.kind))?;
            Leaf::tagged("a", &span.content).with_attribute("href", url)
        }
        SpanKind::Image => {
            let url = span.url.as_deref().ok_or(Error::MissingUrl(span.kind))?;
            let alt = span.alt_text.as_deref().unwrap_or(&span.content);
            Leaf::new(Some("img"), None)?
                .with_attribute("src", url)
                .with_attribute("alt", alt)
        }
    };
    Ok(leaf.into())
}

fn split_references<F>(
    spans: Vec<TextSpan>,
    find: fn(&str) -> Vec<Reference>,
    make: F,
) -> Vec<TextSpan>
where
    F: Fn(String, String) -> TextSpan,
{
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        if !span.is_plain() {
            out.push(span);
            continue;
        }

        let found = find(&span.content);
        if found.is_empty() {
            out.push(span);
            continue;
        }

        let mut cursor = 0;
        for reference in found {
            let prefix = &span.content[cursor..reference.start];
            if !prefix.is_empty() {
                out.push(TextSpan::plain(prefix));
            }
            out.push(make(reference.text, reference.url));
            cursor = reference.end;
        }

        let rest = &span.content[cursor..];
        if !rest.is_empty() {
            out.push(TextSpan::plain(rest));
        }
    }

    out
}

fn find_images(text: &str) -> Vec<Reference> {
    IMAGE_RE
        .captures_iter(text)
        .filter_map(|caps| reference(&caps))
        .collect()
}

fn find_links(text: &str) -> Vec<Reference> {
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(caps) = LINK_RE.captures_at(text, pos) {
        let Some(whole) = caps.get(0) else { break };
        if text[..whole.start()].ends_with('!') {
            // `[` is one byte, so this stays on a char boundary.
            pos = whole.start() + 1;
            continue;
        }
        if let Some(r) = reference(&caps) {
            found.push(r);
        }
        pos = whole.end();
    }

    found
}

fn reference(caps: &regex::Captures<'_>) -> Option<Reference> {
    let whole = caps.get(0)?;
    Some(Reference {
        start: whole.start(),
        end: whole.end(),
        text: caps.get(1)?.as_str().to_string(),
        url: caps.get(2)?.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain(s: &str) -> TextSpan {
        TextSpan::plain(s)
    }

    fn span(s: &str, kind: SpanKind) -> TextSpan {
        TextSpan::new(s, kind)
    }

    #[test]
    fn split_simple_code() {
        let spans = split_nodes_delimiter(
            vec![plain("This is text with a `code block` word")],
            "`",
            SpanKind::Code,
        )
        .unwrap();
        assert_eq!(
            spans,
            vec![
                plain("This is text with a "),
                span("code block", SpanKind::Code),
                plain(" word"),
            ]
        );
    }

    #[test]
    fn split_bold_text() {
        let spans =
            split_nodes_delimiter(vec![plain("This is **bold** text")], "**", SpanKind::Bold)
                .unwrap();
        assert_eq!(
            spans,
            vec![
                plain("This is "),
                span("bold", SpanKind::Bold),
                plain(" text")
            ]
        );
    }

    #[test]
    fn unmatched_delimiter_names_the_text() {
        let err = split_nodes_delimiter(
            vec![plain("This is a `broken code block")],
            "`",
            SpanKind::Code,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unmatched delimiter '`' in text: This is a `broken code block"
        );
    }

    #[test]
    fn typed_spans_pass_through_delimiter_split() {
        let spans = split_nodes_delimiter(
            vec![span("a `b", SpanKind::Bold), plain("c")],
            "`",
            SpanKind::Code,
        )
        .unwrap();
        assert_eq!(spans, vec![span("a `b", SpanKind::Bold), plain("c")]);
    }

    #[test]
    fn empty_delimited_pieces_are_kept_typed() {
        let spans = split_nodes_delimiter(vec![plain("``")], "`", SpanKind::Code).unwrap();
        assert_eq!(spans, vec![span("", SpanKind::Code)]);
    }

    #[test]
    fn no_split_needed() {
        let spans =
            split_nodes_delimiter(vec![plain("This is plain text.")], "`", SpanKind::Code)
                .unwrap();
        assert_eq!(spans, vec![plain("This is plain text.")]);
    }

    #[test]
    fn extracts_images() {
        let text = "This is text with a ![rick roll](https://i.imgur.com/aKaOqIh.gif) and ![obi wan](https://i.imgur.com/fJRm4Vk.jpeg)";
        assert_eq!(
            extract_markdown_images(text),
            vec![
                (
                    "rick roll".to_string(),
                    "https://i.imgur.com/aKaOqIh.gif".to_string()
                ),
                (
                    "obi wan".to_string(),
                    "https://i.imgur.com/fJRm4Vk.jpeg".to_string()
                ),
            ]
        );
        assert!(extract_markdown_images("This text has no images.").is_empty());
    }

    #[test]
    fn link_extraction_skips_images() {
        let text = "![image1](https://image.com/1.png) and [link1](https://link.com) with ![image2](https://image.com/2.png) and [link2](https://link2.com)";
        assert_eq!(
            extract_markdown_links(text),
            vec![
                ("link1".to_string(), "https://link.com".to_string()),
                ("link2".to_string(), "https://link2.com".to_string()),
            ]
        );
        assert_eq!(extract_markdown_images(text).len(), 2);
    }

    #[test]
    fn split_image_then_link() {
        let spans = split_nodes_link(split_nodes_image(vec![plain(
            "Text with an image ![img](https://image.com/1.png) and a link [link](https://link.com)",
        )]));
        assert_eq!(
            spans,
            vec![
                plain("Text with an image "),
                TextSpan::image("img", "https://image.com/1.png"),
                plain(" and a link "),
                TextSpan::link("link", "https://link.com"),
            ]
        );
    }

    #[test]
    fn repeated_link_is_split_at_each_occurrence() {
        let spans = split_nodes_link(vec![plain("[a](u) and [a](u)")]);
        assert_eq!(
            spans,
            vec![
                TextSpan::link("a", "u"),
                plain(" and "),
                TextSpan::link("a", "u"),
            ]
        );
    }

    #[test]
    fn tokenize_plain_text_is_identity() {
        assert_eq!(
            tokenize("This is simple text.").unwrap(),
            vec![plain("This is simple text.")]
        );
    }

    #[test]
    fn tokenize_complex_text() {
        let text = "This is **text** with an *italic* word and a `code block` and an ![obi wan image](https://i.imgur.com/fJRm4Vk.jpeg) and a [link](https://boot.dev)";
        assert_eq!(
            tokenize(text).unwrap(),
            vec![
                plain("This is "),
                span("text", SpanKind::Bold),
                plain(" with an "),
                span("italic", SpanKind::Italic),
                plain(" word and a "),
                span("code block", SpanKind::Code),
                plain(" and an "),
                TextSpan::image("obi wan image", "https://i.imgur.com/fJRm4Vk.jpeg"),
                plain(" and a "),
                TextSpan::link("link", "https://boot.dev"),
            ]
        );
    }

    #[test]
    fn bold_does_not_resolve_nested_italic() {
        assert_eq!(
            tokenize("**bold *nested* text**").unwrap(),
            vec![span("bold *nested* text", SpanKind::Bold)]
        );
    }

    #[test]
    fn code_spans_hide_links() {
        assert_eq!(
            tokenize("`[x](y)`").unwrap(),
            vec![span("[x](y)", SpanKind::Code)]
        );
    }

    #[test]
    fn span_nodes_render() {
        let cases = [
            (plain("Some text"), "Some text"),
            (span("Bold text", SpanKind::Bold), "<b>Bold text</b>"),
            (span("Italic text", SpanKind::Italic), "<i>Italic text</i>"),
            (
                span("print('Hello')", SpanKind::Code),
                "<code>print('Hello')</code>",
            ),
            (
                TextSpan::link("Click here", "https://www.example.com"),
                "<a href=\"https://www.example.com\">Click here</a>",
            ),
            (
                TextSpan::image("a cat", "/cat.png"),
                "<img src=\"/cat.png\" alt=\"a cat\" />",
            ),
        ];
        for (span, html) in cases {
            assert_eq!(span_to_node(&span).unwrap().to_html(), html);
        }
    }

    #[test]
    fn link_without_url_is_rejected() {
        let err = span_to_node(&span("Click", SpanKind::Link)).unwrap_err();
        assert!(matches!(err, Error::MissingUrl(SpanKind::Link)));
    }

    #[test]
    fn image_without_url_is_rejected() {
        let err = span_to_node(&span("x", SpanKind::Image)).unwrap_err();
        assert!(matches!(err, Error::MissingUrl(SpanKind::Image)));
        assert_eq!(err.to_string(), "image spans require a URL");
    }

    #[test]
    fn image_without_alt_text_falls_back_to_content() {
        let mut image = TextSpan::image("fallback", "/x.png");
        image.alt_text = None;
        assert_eq!(
            span_to_node(&image).unwrap().to_html(),
            "<img src=\"/x.png\" alt=\"fallback\" />"
        );
    }
}
