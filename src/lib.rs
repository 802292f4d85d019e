//! # booksmith
//!
//! Export a tree of nested chapters to Markdown, EPUB and MOBI.
//!
//! ## Features
//!
//! - Markdown: one setext heading per chapter, HTML content converted to Markdown
//! - EPUB 2: one section per chapter, with `<img>` sources downloaded and embedded
//! - MOBI: EPUB compiled by an external `kindlegen`-compatible binary
//!
//! ## Quick Start
//!
//! ```no_run
//! use booksmith::{Chapter, to_epub, to_markdown, to_mobi};
//!
//! let book = Chapter::new("My Book")
//!     .with_author("Author Name")
//!     .with_content("<p>Preface</p>")
//!     .with_sub_chapter(Chapter::new("Chapter 1").with_content("<p>It begins.</p>"));
//!
//! let markdown = to_markdown(&book);
//! assert!(markdown.starts_with("My Book\n=======\n"));
//!
//! to_epub(&book, "book.epub")?;
//! to_mobi(&book, "book")?; // writes book.mobi
//! # Ok::<(), booksmith::Error>(())
//! ```
//!
//! ## Nesting
//!
//! Every exporter walks the tree depth-first. Neither output keeps the nesting:
//! Markdown uses level-1 headings throughout and EPUB gets a flat list of
//! sections in pre-order.

pub mod book;
pub mod chapter;
pub mod epub;
pub mod error;
pub mod export;
pub mod fetch;
mod util;

pub use book::{Book, Metadata, Resource, Section};
pub use chapter::Chapter;
pub use epub::{write_epub, write_epub_to_writer};
pub use error::{Error, Result};
pub use export::{to_epub, to_markdown, to_mobi};
pub use fetch::{DefaultFetcher, FetchedImage, ImageFetcher};
pub use util::filename;
