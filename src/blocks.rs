use log::debug;

use crate::block::{Block, BlockType};

/// Opening and closing marker of a fenced code block.
pub const FENCE: &str = "```";

/// Split a document into trimmed, non-empty blocks separated by blank lines.
///
/// A run of empty lines counts as a single separator. Whitespace-only lines
/// do not separate blocks.
pub fn split_blocks(markdown: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in markdown.lines() {
        if line.is_empty() {
            flush_block(&mut current, &mut blocks);
        } else {
            current.push(line);
        }
    }
    flush_block(&mut current, &mut blocks);

    blocks
}

fn flush_block(lines: &mut Vec<&str>, blocks: &mut Vec<String>) {
    if lines.is_empty() {
        return;
    }
    let joined = lines.join("\n");
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        blocks.push(trimmed.to_string());
    }
    lines.clear();
}

/// Parse markdown text into a list of classified blocks
pub fn parse(markdown: &str) -> Vec<Block> {
    split_blocks(markdown)
        .into_iter()
        .map(|text| {
            let kind = classify(&text);
            debug!("classified {} byte block as {kind:?}", text.len());
            Block { text, kind }
        })
        .collect()
}

/// Decide the structural type of a block. The first matching rule wins.
pub fn classify(block: &str) -> BlockType {
    if is_heading(block) {
        return BlockType::Heading;
    }
    if block.starts_with(FENCE) && block.ends_with(FENCE) {
        return BlockType::Code;
    }

    let lines: Vec<&str> = block.lines().collect();
    if lines.iter().all(|line| line.starts_with('>')) {
        BlockType::Quote
    } else if lines.iter().all(|line| unordered_item(line).is_some()) {
        BlockType::UnorderedList
    } else if is_numbered_sequence(&lines) {
        BlockType::OrderedList
    } else {
        BlockType::Paragraph
    }
}

/// One or more `#` followed by a space.
pub fn is_heading(block: &str) -> bool {
    let rest = block.trim_start_matches('#');
    rest.len() < block.len() && rest.starts_with(' ')
}

/// Number of leading `#` characters.
pub fn heading_level(block: &str) -> usize {
    block.len() - block.trim_start_matches('#').len()
}

/// Content of a `* item` or `- item` line.
pub fn unordered_item(line: &str) -> Option<&str> {
    line.strip_prefix("* ").or_else(|| line.strip_prefix("- "))
}

/// Number and content of an `N. item` line.
///
/// The number is any run of ASCII digits, leading zeros included; the
/// content after `". "` must not be empty.
pub fn ordered_item(line: &str) -> Option<(usize, &str)> {
    let (number, content) = line.split_once(". ")?;
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) || content.is_empty() {
        return None;
    }
    number.parse().ok().map(|n| (n, content))
}

/// Whether every line is an `N. item` line numbered exactly `1..=len`.
pub fn is_numbered_sequence(lines: &[&str]) -> bool {
    !lines.is_empty()
        && lines
            .iter()
            .enumerate()
            .all(|(i, line)| ordered_item(line).is_some_and(|(n, _)| n == i + 1))
}
