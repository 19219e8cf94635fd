mod block;
mod blocks;
mod compiler;
pub mod config;
mod error;
mod inline;
mod node;
pub mod page;

pub use block::{Block, BlockType, SpanKind, TextSpan};
pub use blocks::{classify, split_blocks};
pub use compiler::block_to_node;
pub use config::Config;
pub use error::{Error, Result};
pub use inline::{
    extract_markdown_images, extract_markdown_links, span_to_node, split_nodes_delimiter,
    split_nodes_image, split_nodes_link, text_to_children, tokenize,
};
pub use node::{Attributes, Leaf, Parent, RenderNode, SELF_CLOSING_TAGS};
pub use page::{extract_title, generate_page, render_page};

/// Parse markdown text into a vector of classified blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    blocks::parse(markdown)
}

/// Compile markdown into a render tree.
pub fn compile(markdown: &str) -> Result<RenderNode> {
    compiler::compile(markdown)
}

/// Serialize a render tree to HTML.
pub fn serialize(node: &RenderNode) -> String {
    node.to_html()
}

/// Convert markdown to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> Result<String> {
    compile(markdown).map(|node| serialize(&node))
}
