//! Export module for turning chapter trees into documents.
//!
//! Provides the `Exporter` trait and format-specific implementations.
//!
//! # Architecture
//!
//! Exporters use a builder pattern:
//! - `new()` creates an exporter with default configuration
//! - `with_config()` allows customization
//! - `export()` writes to any `Write + Seek` destination
//!
//! Each format also has a path-based entry point mirroring how the CLI uses
//! it: [`to_markdown`], [`to_epub`] and [`to_mobi`].
//!
//! # Example
//!
//! ```no_run
//! use booksmith::Chapter;
//! use booksmith::export::{EpubExporter, Exporter};
//! use std::fs::File;
//!
//! let book = Chapter::new("My Book").with_author("Me");
//! let mut file = File::create("output.epub")?;
//! EpubExporter::new().export(&book, &mut file)?;
//! # Ok::<(), booksmith::Error>(())
//! ```

use std::io::{Seek, Write};

use crate::chapter::Chapter;
use crate::error::Result;

mod epub;
mod markdown;
mod mobi;

pub use epub::{EpubConfig, EpubExporter, append_to_epub, to_epub};
pub use markdown::{MarkdownConfig, MarkdownExporter, to_markdown};
pub use mobi::{MobiConfig, MobiExporter, intermediate_epub, mobi_filename, to_mobi};

/// Trait for exporting chapter trees to specific formats.
///
/// Configuration is held in the struct, and the `export` method writes to
/// any `Write + Seek` destination.
pub trait Exporter {
    /// Export the chapter tree to the provided writer.
    fn export<W: Write + Seek>(&self, chapter: &Chapter, writer: &mut W) -> Result<()>;
}

/// Message printed once an ebook file is on disk.
pub(crate) fn announce_saved(filename: &str, quiet: bool) {
    log::info!("Ebook saved to {filename:?}");
    if !quiet {
        println!("Ebook saved to \"{filename}\"");
    }
}
