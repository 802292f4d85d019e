//! MOBI exporter.
//!
//! There is no native MOBI writer here: the tree is written as an EPUB next
//! to the target file and handed to an external compiler (`kindlegen` by
//! default), which drops the `.mobi` beside it. The intermediate EPUB is then
//! removed.

use std::fs;
use std::process::{Command, Stdio};

use log::{debug, warn};

use crate::chapter::Chapter;
use crate::error::Result;

use super::{EpubConfig, EpubExporter, announce_saved};

/// Compiler invoked when none is configured.
pub const DEFAULT_COMPILER: &str = "kindlegen";

/// Configuration for MOBI export.
#[derive(Debug, Clone)]
pub struct MobiConfig {
    /// Executable that turns an EPUB into a MOBI; looked up on `PATH`.
    pub compiler: String,
    /// Skip the `Ebook saved to ...` messages on stdout.
    pub quiet: bool,
}

impl Default for MobiConfig {
    fn default() -> Self {
        Self {
            compiler: DEFAULT_COMPILER.to_string(),
            quiet: false,
        }
    }
}

/// MOBI format exporter.
///
/// ```no_run
/// use booksmith::Chapter;
/// use booksmith::export::MobiExporter;
///
/// let book = Chapter::new("story").with_content("<p>Once upon a time</p>");
/// let path = MobiExporter::new().to_mobi(&book, "story.txt")?;
/// assert_eq!(path, "story.txt.mobi");
/// # Ok::<(), booksmith::Error>(())
/// ```
pub struct MobiExporter {
    config: MobiConfig,
    epub: EpubExporter,
}

impl MobiExporter {
    /// Create a new exporter with default configuration.
    pub fn new() -> Self {
        Self {
            config: MobiConfig::default(),
            epub: EpubExporter::new(),
        }
    }

    /// Configure the exporter with custom settings.
    ///
    /// `quiet` is forwarded to the EPUB stage unless an EPUB exporter was set
    /// with [`MobiExporter::with_epub_exporter`] afterwards.
    pub fn with_config(mut self, config: MobiConfig) -> Self {
        self.epub = self.epub.with_config(EpubConfig {
            quiet: config.quiet,
            ..Default::default()
        });
        self.config = config;
        self
    }

    /// Use a custom EPUB exporter for the intermediate file.
    pub fn with_epub_exporter(mut self, epub: EpubExporter) -> Self {
        self.epub = epub;
        self
    }

    /// Write the chapter tree as MOBI and return the filename used.
    ///
    /// The compiler's exit status is not checked: kindlegen reports warnings
    /// through a non-zero status even when the MOBI was written.
    pub fn to_mobi(&self, chapter: &Chapter, filename: &str) -> Result<String> {
        let filename = mobi_filename(chapter, filename);
        let epub_filename = intermediate_epub(&filename);

        self.epub.to_epub(chapter, &epub_filename)?;

        debug!("Running {} {}", self.config.compiler, epub_filename);
        match Command::new(&self.config.compiler)
            .arg(&epub_filename)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => debug!("{} exited with {status}", self.config.compiler),
            Err(e) => warn!("Could not run {}: {e}", self.config.compiler),
        }

        announce_saved(&filename, self.config.quiet);

        fs::remove_file(&epub_filename)?;

        Ok(filename)
    }
}

impl Default for MobiExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a chapter tree as MOBI with the default configuration.
pub fn to_mobi(chapter: &Chapter, filename: &str) -> Result<String> {
    MobiExporter::new().to_mobi(chapter, filename)
}

/// Target filename for a MOBI export.
///
/// Empty means `"<chapter name>.mobi"`. Otherwise `.mobi` is appended unless
/// already present; other extensions are kept (`book.txt` → `book.txt.mobi`).
pub fn mobi_filename(chapter: &Chapter, filename: &str) -> String {
    if filename.is_empty() {
        format!("{}.mobi", chapter.name)
    } else if filename.ends_with(".mobi") {
        filename.to_string()
    } else {
        format!("{filename}.mobi")
    }
}

/// EPUB path written before compiling `filename`.
pub fn intermediate_epub(filename: &str) -> String {
    match filename.strip_suffix(".mobi") {
        Some(stem) => format!("{stem}.epub"),
        None => format!("{filename}.epub"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobi_filename() {
        let chapter = Chapter::new("My Story");
        assert_eq!(mobi_filename(&chapter, ""), "My Story.mobi");
        assert_eq!(mobi_filename(&chapter, "story"), "story.mobi");
        assert_eq!(mobi_filename(&chapter, "story.mobi"), "story.mobi");
        assert_eq!(mobi_filename(&chapter, "story.txt"), "story.txt.mobi");
    }

    #[test]
    fn test_intermediate_epub() {
        assert_eq!(intermediate_epub("story.mobi"), "story.epub");
        assert_eq!(intermediate_epub("out/a.mobi.b.mobi"), "out/a.mobi.b.epub");
        assert_eq!(intermediate_epub("odd"), "odd.epub");
    }

    #[test]
    fn test_with_config() {
        let exporter = MobiExporter::new().with_config(MobiConfig {
            compiler: "true".to_string(),
            quiet: true,
        });
        assert_eq!(exporter.config.compiler, "true");
        assert!(exporter.config.quiet);
    }
}
