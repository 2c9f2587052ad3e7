//! Document classification by id prefix and visibility.

use sealdoc_types::{Document, FILE_ATTACHMENT_NAME, Visibility};

/// Document type derived from the id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Note,
    Book,
    Tag,
    File,
    /// Any other id, including ids without a `:`. Never transformed.
    Opaque,
}

impl DocumentKind {
    /// Matches the segment before the first `:` of the id.
    pub fn from_id(id: &str) -> Self {
        match id.split_once(':').map(|(prefix, _)| prefix) {
            Some("note") => Self::Note,
            Some("book") => Self::Book,
            Some("tag") => Self::Tag,
            Some("file") => Self::File,
            _ => Self::Opaque,
        }
    }

    /// Whether this kind's fields are sealed in a document envelope.
    pub fn has_sealed_body(&self) -> bool {
        matches!(self, Self::Note | Self::Book | Self::Tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: DocumentKind,
    pub is_public: bool,
}

impl Classification {
    /// Reads the id and the visibility signal that applies to its kind:
    /// `share` for notes, books and tags, a non-empty `publicIn` for files.
    pub fn of(doc: &Document) -> Self {
        let visibility = match DocumentKind::from_id(&doc.id) {
            DocumentKind::File => doc.is_published().then_some(Visibility::Public),
            _ => doc.visibility(),
        };
        classify(&doc.id, visibility)
    }

    /// Whether the outward hook must encrypt a document of this class.
    pub fn needs_encryption(&self) -> bool {
        !self.is_public && self.kind != DocumentKind::Opaque
    }
}

/// Pure and total: every id maps to exactly one kind.
pub fn classify(id: &str, visibility: Option<Visibility>) -> Classification {
    Classification {
        kind: DocumentKind::from_id(id),
        is_public: visibility.is_some_and(|v| v.is_public()),
    }
}

/// Whether a file document carries its `index` bytes rather than a stub.
pub(crate) fn has_materialized_file(doc: &Document) -> bool {
    doc.attachment(FILE_ATTACHMENT_NAME)
        .is_some_and(|slot| !slot.is_stub())
}
