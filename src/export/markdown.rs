//! Markdown Exporter - converts a chapter tree to Markdown.
//!
//! Every chapter becomes a setext level-1 heading followed by its converted
//! HTML content. Subchapters follow their parent, each preceded by two blank
//! lines, so nesting depth is not visible in the output.

use std::io::{Seek, Write};
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::chapter::Chapter;
use crate::error::Result;

use super::Exporter;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("valid regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").expect("valid regex"));

/// Configuration for Markdown export.
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    /// Strip `<script>` and `<style>` blocks before conversion (default true).
    pub sanitize: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { sanitize: true }
    }
}

/// Exporter for Markdown output.
#[derive(Debug, Clone, Default)]
pub struct MarkdownExporter {
    config: MarkdownConfig,
}

impl MarkdownExporter {
    /// Create a new MarkdownExporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the exporter with custom settings.
    pub fn with_config(mut self, config: MarkdownConfig) -> Self {
        self.config = config;
        self
    }

    /// Render a chapter and all of its descendants.
    pub fn render(&self, chapter: &Chapter) -> String {
        debug!("Rendering chapter {:?} to Markdown", chapter.name);

        let mut content = format!(
            "{}\n\n{}",
            title_block(&chapter.name),
            self.convert(&chapter.content)
        );

        for sub_chapter in &chapter.sub_chapters {
            content.push_str("\n\n\n");
            content.push_str(&self.render(sub_chapter));
        }

        content
    }

    fn convert(&self, html: &str) -> String {
        if html.trim().is_empty() {
            return String::new();
        }

        if self.config.sanitize {
            let html = SCRIPT_RE.replace_all(html, "");
            let html = STYLE_RE.replace_all(&html, "");
            html2md::parse_html(&html)
        } else {
            html2md::parse_html(html)
        }
    }
}

impl Exporter for MarkdownExporter {
    fn export<W: Write + Seek>(&self, chapter: &Chapter, writer: &mut W) -> Result<()> {
        writer.write_all(self.render(chapter).as_bytes())?;
        Ok(())
    }
}

/// Render a chapter tree with the default configuration.
pub fn to_markdown(chapter: &Chapter) -> String {
    MarkdownExporter::new().render(chapter)
}

/// Name underlined with one `=` per character.
fn title_block(name: &str) -> String {
    let underline = "=".repeat(name.chars().count());
    format!("{name}\n{underline}")
}
