//! In-memory EPUB package.
//!
//! [`Book`] collects metadata, XHTML sections in reading order and image
//! resources. The exporters fill it in; [`crate::epub::write_epub`] turns it
//! into a ZIP container.

use crate::error::{Error, Result};

/// Directory (inside `OEBPS/`) holding section documents.
pub const TEXT_DIR: &str = "text";
/// Directory (inside `OEBPS/`) holding images.
pub const IMAGE_DIR: &str = "images";

/// Package being assembled for one export.
#[derive(Debug, Clone, Default)]
pub struct Book {
    pub metadata: Metadata,
    /// Sections in reading order. Every section is also a flat TOC entry.
    pub sections: Vec<Section>,
    pub images: Vec<Resource>,
}

/// Book metadata (Dublin Core subset)
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub title: String,
    pub authors: Vec<String>,
    pub language: String,
    pub identifier: String,
}

/// One XHTML content document.
#[derive(Debug, Clone)]
pub struct Section {
    /// Path relative to `OEBPS/`, e.g. `text/section0001.xhtml`.
    pub href: String,
    pub title: String,
    /// Body markup; wrapped into a full XHTML document on write.
    pub body: String,
}

/// A binary resource such as an image.
#[derive(Debug, Clone)]
pub struct Resource {
    /// Path relative to `OEBPS/`, e.g. `images/image0001.png`.
    pub href: String,
    pub data: Vec<u8>,
    pub media_type: String,
}

impl Book {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            ..Default::default()
        }
    }

    /// Register a section and return its href.
    ///
    /// Without a `filename` one is generated from the section's position.
    /// Registering the same filename twice fails.
    pub fn add_section(
        &mut self,
        body: impl Into<String>,
        title: impl Into<String>,
        filename: Option<&str>,
    ) -> Result<String> {
        let name = match filename {
            Some(name) => name.to_string(),
            None => format!("section{:04}.xhtml", self.sections.len() + 1),
        };
        let href = format!("{TEXT_DIR}/{name}");

        if self.sections.iter().any(|s| s.href == href) {
            return Err(Error::DuplicateSection(name));
        }

        self.sections.push(Section {
            href: href.clone(),
            title: title.into(),
            body: body.into(),
        });
        Ok(href)
    }

    /// Store image bytes and return the path sections use to reference them.
    ///
    /// `extension` includes the leading dot and may be empty.
    pub fn add_image(
        &mut self,
        data: Vec<u8>,
        media_type: impl Into<String>,
        extension: &str,
    ) -> String {
        let name = format!("image{:04}{}", self.images.len() + 1, extension);
        let href = format!("{IMAGE_DIR}/{name}");

        self.images.push(Resource {
            href,
            data,
            media_type: media_type.into(),
        });

        // Sections live in a sibling directory
        format!("../{IMAGE_DIR}/{name}")
    }

    /// Get an image by its href.
    pub fn get_image(&self, href: &str) -> Option<&Resource> {
        self.images.iter().find(|r| r.href == href)
    }
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Add an author; empty names are ignored.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        let author = author.into();
        if !author.is_empty() {
            self.authors.push(author);
        }
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }
}
