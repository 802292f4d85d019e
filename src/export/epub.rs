//! EPUB exporter.
//!
//! Walks the chapter tree depth-first and emits one section per chapter.
//! Nesting is flattened: subchapters become sibling sections after their
//! parent. Images referenced by `<img src>` are fetched, stored in the package
//! and the chapter markup is rewritten to point at the local copy.

use std::io::{Seek, Write};
use std::ops::Range;
use std::path::Path;

use log::{debug, warn};
use scraper::{Html, Selector};

use crate::book::{Book, Metadata};
use crate::chapter::Chapter;
use crate::epub::{write_epub, write_epub_to_writer};
use crate::error::{Error, Result};
use crate::fetch::{DefaultFetcher, ImageFetcher, url_path};
use crate::util::{extension_for_media_type, guess_media_type};

use super::{Exporter, announce_saved};

/// Configuration for EPUB export.
#[derive(Debug, Clone, Default)]
pub struct EpubConfig {
    /// Language written to the package metadata (default `en`).
    pub language: Option<String>,
    /// Skip the `Ebook saved to ...` message on stdout.
    pub quiet: bool,
}

/// EPUB format exporter.
///
/// # Example
///
/// ```no_run
/// use booksmith::Chapter;
/// use booksmith::export::EpubExporter;
///
/// let book = Chapter::new("My Book")
///     .with_author("Me")
///     .with_content("<p>Hello</p>");
/// let path = EpubExporter::new().to_epub(&book, "")?;
/// assert_eq!(path, "My Book.epub");
/// # Ok::<(), booksmith::Error>(())
/// ```
pub struct EpubExporter {
    config: EpubConfig,
    fetcher: Box<dyn ImageFetcher>,
}

impl EpubExporter {
    /// Create a new exporter with default configuration.
    pub fn new() -> Self {
        Self {
            config: EpubConfig::default(),
            fetcher: Box::new(DefaultFetcher::new()),
        }
    }

    /// Configure the exporter with custom settings.
    pub fn with_config(mut self, config: EpubConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the source of image bytes.
    pub fn with_fetcher(mut self, fetcher: impl ImageFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Assemble the package in memory without writing it.
    pub fn build(&self, chapter: &Chapter) -> Result<Book> {
        let mut metadata = Metadata::new(&chapter.name).with_author(&chapter.author);
        if let Some(ref language) = self.config.language {
            metadata = metadata.with_language(language);
        }

        let mut book = Book::new(metadata);
        append_to_epub(&mut book, chapter, false, self.fetcher.as_ref())?;
        Ok(book)
    }

    /// Write the chapter tree to `filename` and return the path used.
    ///
    /// An empty `filename` becomes `"<chapter name>.epub"`.
    pub fn to_epub(&self, chapter: &Chapter, filename: &str) -> Result<String> {
        let filename = if filename.is_empty() {
            format!("{}.epub", chapter.name)
        } else {
            filename.to_string()
        };

        let book = self.build(chapter)?;
        write_epub(&book, &filename)?;

        announce_saved(&filename, self.config.quiet);
        Ok(filename)
    }
}

impl Default for EpubExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for EpubExporter {
    fn export<W: Write + Seek>(&self, chapter: &Chapter, writer: &mut W) -> Result<()> {
        let book = self.build(chapter)?;
        write_epub_to_writer(&book, writer)
    }
}

/// Write a chapter tree to an EPUB file with the default configuration.
pub fn to_epub(chapter: &Chapter, filename: &str) -> Result<String> {
    EpubExporter::new().to_epub(chapter, filename)
}

/// Append `chapter` and, recursively, all of its subchapters as sections.
///
/// With `images_only`, the section for `chapter` holds nothing but its image
/// tags (rewritten to local paths). Subchapters are always appended in full.
/// No exporter in this crate sets `images_only`; it exists for callers that
/// only want a chapter's pictures.
///
/// In full mode every image rewrites the *first* textual occurrence of its
/// `src` in the original markup. Two images sharing a `src` therefore
/// resolve to the same occurrence: the first tag is rewritten and the second
/// keeps its original reference.
pub fn append_to_epub(
    book: &mut Book,
    chapter: &Chapter,
    images_only: bool,
    fetcher: &dyn ImageFetcher,
) -> Result<()> {
    debug!("Adding section {:?}", chapter.name);

    let document = Html::parse_fragment(&chapter.content);
    let selector = Selector::parse("img").map_err(|e| Error::Selector(format!("{e:?}")))?;

    let mut content = String::new();
    let mut rewrites: Vec<(Range<usize>, String)> = Vec::new();

    for element in document.select(&selector) {
        let Some(src) = element.value().attr("src").filter(|s| !s.is_empty()) else {
            debug!("Skipping <img> without src");
            continue;
        };

        if images_only {
            let tag = element.html();
            match register_image(book, src, fetcher) {
                Ok(path) => content.push_str(&rewrite_first(&tag, src, &path)),
                Err(e) => {
                    warn!("Could not embed image {src:?}: {e}");
                    content.push_str(&tag);
                }
            }
            continue;
        }

        let Some(range) = find_reference(&chapter.content, src) else {
            debug!("No textual reference to {src:?} in {:?}", chapter.name);
            continue;
        };
        if rewrites.iter().any(|(r, _)| overlaps(r, &range)) {
            debug!("Reference to {src:?} already rewritten");
            continue;
        }

        match register_image(book, src, fetcher) {
            Ok(path) => rewrites.push((range, path)),
            Err(e) => warn!("Could not embed image {src:?}: {e}"),
        }
    }

    if !images_only {
        content = splice(&chapter.content, rewrites);
    }

    let html = format!("<h1>{}</h1>{}", chapter.name, content);
    book.add_section(html, &chapter.name, None)?;

    for sub_chapter in &chapter.sub_chapters {
        append_to_epub(book, sub_chapter, false, fetcher)?;
    }

    Ok(())
}

/// Fetch an image and store it in the package, returning its local path.
fn register_image(book: &mut Book, src: &str, fetcher: &dyn ImageFetcher) -> Result<String> {
    let image = fetcher.fetch(src)?;

    let path = url_path(src);
    let extension = match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some(ext) if guess_media_type(path).starts_with("image/") => {
            format!(".{}", ext.to_lowercase())
        }
        _ => extension_for_media_type(&image.media_type).to_string(),
    };

    let local = book.add_image(image.data, image.media_type, &extension);
    debug!("Embedded {src:?} as {local:?}");
    Ok(local)
}

/// Byte range of the first occurrence of `src` in `content`.
///
/// The DOM hands back decoded attribute values, so an `&` in a URL may be
/// spelled `&amp;` in the markup.
fn find_reference(content: &str, src: &str) -> Option<Range<usize>> {
    if let Some(start) = content.find(src) {
        return Some(start..start + src.len());
    }
    let escaped = src.replace('&', "&amp;");
    if escaped != src
        && let Some(start) = content.find(&escaped)
    {
        return Some(start..start + escaped.len());
    }
    None
}

fn rewrite_first(tag: &str, src: &str, path: &str) -> String {
    match find_reference(tag, src) {
        Some(range) => splice(tag, vec![(range, path.to_string())]),
        None => tag.to_string(),
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Apply non-overlapping replacements to `content`.
fn splice(content: &str, mut rewrites: Vec<(Range<usize>, String)>) -> String {
    rewrites.sort_by_key(|(range, _)| range.start);

    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    for (range, replacement) in rewrites {
        out.push_str(&content[cursor..range.start]);
        out.push_str(&replacement);
        cursor = range.end;
    }
    out.push_str(&content[cursor..]);
    out
}
