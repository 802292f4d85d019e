//! The chapter tree every exporter walks.

/// One node of a book's content tree.
///
/// Children are owned, so a tree is always finite and acyclic. Exporters
/// only ever borrow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
pub struct Chapter {
    /// Display title.
    pub name: String,
    /// Author; only the root's author ends up in EPUB metadata.
    #[cfg_attr(feature = "cli", serde(default))]
    pub author: String,
    /// HTML markup, possibly empty.
    #[cfg_attr(feature = "cli", serde(default))]
    pub content: String,
    /// Child chapters in reading order.
    #[cfg_attr(feature = "cli", serde(default, alias = "subChapters"))]
    pub sub_chapters: Vec<Chapter>,
}

impl Chapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_sub_chapter(mut self, chapter: Chapter) -> Self {
        self.sub_chapters.push(chapter);
        self
    }

    /// Total number of chapters in this tree, root included.
    pub fn count(&self) -> usize {
        1 + self.sub_chapters.iter().map(Chapter::count).sum::<usize>()
    }

    /// Depth-first, pre-order walk over the tree.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }
}

/// Pre-order iterator returned by [`Chapter::iter`].
pub struct Iter<'a> {
    stack: Vec<&'a Chapter>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Chapter;

    fn next(&mut self) -> Option<Self::Item> {
        let chapter = self.stack.pop()?;
        // Reversed so the first child is visited next
        self.stack.extend(chapter.sub_chapters.iter().rev());
        Some(chapter)
    }
}

impl<'a> IntoIterator for &'a Chapter {
    type Item = &'a Chapter;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
