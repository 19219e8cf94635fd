use log::debug;

use crate::block::{Block, BlockType};
use crate::blocks::{self, FENCE, heading_level, is_numbered_sequence, ordered_item, unordered_item};
use crate::error::Result;
use crate::inline::text_to_children;
use crate::node::{Leaf, RenderNode};

/// Convert classified blocks into a single render tree.
///
/// A lone blockquote is returned as is; anything else is wrapped in a `div`.
pub fn blocks_to_node(blocks: &[Block]) -> Result<RenderNode> {
    let mut nodes = blocks
        .iter()
        .map(block_to_node)
        .collect::<Result<Vec<_>>>()?;
    debug!("compiled {} blocks", nodes.len());

    if nodes.len() == 1 && nodes[0].tag() == Some("blockquote") {
        return Ok(nodes.remove(0));
    }
    RenderNode::parent("div", nodes)
}

pub fn block_to_node(block: &Block) -> Result<RenderNode> {
    match block.kind {
        BlockType::Heading => heading_node(&block.text),
        BlockType::Code => code_node(&block.text),
        BlockType::Quote => quote_node(&block.text),
        BlockType::UnorderedList => list_node(&block.text, "ul", unordered_item),
        BlockType::OrderedList => list_node(&block.text, "ol", ordered_content),
        BlockType::Paragraph => paragraph_node(&block.text),
    }
}

fn paragraph_node(text: &str) -> Result<RenderNode> {
    RenderNode::parent("p", text_to_children(text)?)
}

fn heading_node(block: &str) -> Result<RenderNode> {
    let level = heading_level(block);
    let text = block.trim_start_matches('#').trim();
    RenderNode::parent(&format!("h{level}"), text_to_children(text)?)
}

/// `pre > code > text`, with the fenced content left unparsed.
///
/// Everything between the fences is kept, info string included.
fn code_node(block: &str) -> Result<RenderNode> {
    let inner = block.strip_prefix(FENCE).unwrap_or(block);
    let inner = inner.strip_suffix(FENCE).unwrap_or(inner);

    let code = RenderNode::parent("code", vec![Leaf::text(inner).into()])?;
    RenderNode::parent("pre", vec![code])
}

fn list_node(block: &str, tag: &str, item: fn(&str) -> Option<&str>) -> Result<RenderNode> {
    let items = block
        .lines()
        .map(|line| {
            let content = item(line).unwrap_or(line).trim();
            RenderNode::parent("li", text_to_children(content)?)
        })
        .collect::<Result<Vec<_>>>()?;
    RenderNode::parent(tag, items)
}

/// Compile a quote block, recursing once per nesting level.
///
/// Returns an empty untagged leaf when the quote holds nothing.
fn quote_node(block: &str) -> Result<RenderNode> {
    let lines: Vec<&str> = block.lines().map(strip_quote_marker).collect();
    let children = quote_children(&lines)?;
    if children.is_empty() {
        return Ok(Leaf::text("").into());
    }
    RenderNode::parent("blockquote", children)
}

fn strip_quote_marker(line: &str) -> &str {
    line.strip_prefix('>').unwrap_or(line).trim()
}

/// Group the unquoted lines of a quote into sub-blocks and compile each one.
fn quote_children(lines: &[&str]) -> Result<Vec<RenderNode>> {
    let mut nodes = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let (end, node) = if line.is_empty() {
            i += 1;
            continue;
        } else if line.starts_with('>') {
            let end = run_end(lines, i, |l| l.starts_with('>'));
            (end, quote_node(&lines[i..end].join("\n"))?)
        } else if line.starts_with(FENCE) {
            let end = fence_end(lines, i);
            (end, code_node(&lines[i..end].join("\n"))?)
        } else if is_list_item(line) {
            let end = run_end(lines, i, is_list_item);
            (end, list_run_node(&lines[i..end])?)
        } else {
            let end = run_end(lines, i, |l| !l.is_empty() && !starts_sub_block(l));
            (end, paragraph_node(&lines[i..end].join("\n"))?)
        };
        nodes.push(node);
        i = end;
    }

    Ok(nodes)
}

/// Index of the first line at or after `start` that fails `keep`.
fn run_end(lines: &[&str], start: usize, keep: impl Fn(&str) -> bool) -> usize {
    lines[start..]
        .iter()
        .position(|line| !keep(line))
        .map_or(lines.len(), |offset| start + offset)
}

/// One past the closing fence of the code run opening at `start`.
/// An unclosed fence runs to the end of the quote.
fn fence_end(lines: &[&str], start: usize) -> usize {
    let opening = lines[start];
    if opening.len() >= 2 * FENCE.len() && opening.ends_with(FENCE) {
        return start + 1;
    }
    lines[start + 1..]
        .iter()
        .position(|line| line.ends_with(FENCE))
        .map_or(lines.len(), |offset| start + 1 + offset + 1)
}

fn ordered_content(line: &str) -> Option<&str> {
    ordered_item(line).map(|(_, content)| content)
}

fn is_list_item(line: &str) -> bool {
    unordered_item(line).is_some() || ordered_item(line).is_some()
}

fn starts_sub_block(line: &str) -> bool {
    line.starts_with('>') || line.starts_with(FENCE) || is_list_item(line)
}

/// A run of list lines inside a quote. Lines that do not form a valid
/// list (mixed markers, broken numbering) fall back to a paragraph.
fn list_run_node(lines: &[&str]) -> Result<RenderNode> {
    let text = lines.join("\n");
    if lines.iter().all(|line| unordered_item(line).is_some()) {
        list_node(&text, "ul", unordered_item)
    } else if is_numbered_sequence(lines) {
        list_node(&text, "ol", ordered_content)
    } else {
        paragraph_node(&text)
    }
}

/// Compile one markdown document into a render tree.
pub fn compile(markdown: &str) -> Result<RenderNode> {
    blocks_to_node(&blocks::parse(markdown))
}
