//! Content store data model.
//!
//! A [`ContentItem`] is owned by exactly one user. The draft types are used
//! for both create and full-replacement update so both paths share one set
//! of field rules.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{FieldErrors, required_text};
use super::UserId;

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 30;
/// Maximum body length in characters.
pub const BODY_MAX: usize = 300;
/// Maximum summary length in characters.
pub const SUMMARY_MAX: usize = 60;
/// Maximum document reference length in characters.
pub const DOCUMENT_MAX: usize = 100;

/// Validation errors raised by content field constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentValidationError {
    #[error("content id must be a valid UUID")]
    InvalidId,
    #[error("This field may not be blank.")]
    Blank,
    #[error("Ensure this field has no more than {max} characters.")]
    TooLong { max: usize },
    #[error("Only PDF files are allowed.")]
    NotPdf,
    #[error("Please provide a search query using the 'q' parameter.")]
    EmptyQuery,
}

/// Identifier of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(Uuid);

impl ContentId {
    /// Parse a [`ContentId`] from its hyphenated string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ContentValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| ContentValidationError::InvalidId)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ContentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn bounded(value: &str, max: usize) -> Result<String, ContentValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ContentValidationError::Blank);
    }
    if trimmed.chars().count() > max {
        return Err(ContentValidationError::TooLong { max });
    }
    Ok(trimmed.to_owned())
}

macro_rules! bounded_text {
    ($(#[$meta:meta])* $name:ident, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl AsRef<str>) -> Result<Self, ContentValidationError> {
                bounded(value.as_ref(), $max).map(Self)
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }
    };
}

bounded_text! {
    /// Item title, 1 to 30 characters.
    Title, TITLE_MAX
}

bounded_text! {
    /// Item body, up to 300 characters.
    Body, BODY_MAX
}

bounded_text! {
    /// Short summary, up to 60 characters.
    Summary, SUMMARY_MAX
}

/// Reference to the uploaded PDF document attached to an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef(String);

impl DocumentRef {
    /// Accept a non-empty reference whose extension is `pdf`, ignoring case.
    ///
    /// # Examples
    /// ```
    /// use cms_backend::domain::DocumentRef;
    ///
    /// assert!(DocumentRef::new("reports/q3.PDF").is_ok());
    /// assert!(DocumentRef::new("notes.docx").is_err());
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, ContentValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ContentValidationError::Blank);
        }
        if trimmed.chars().count() > DOCUMENT_MAX {
            return Err(ContentValidationError::TooLong { max: DOCUMENT_MAX });
        }
        let is_pdf = trimmed
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(ContentValidationError::NotPdf);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Raw content fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentInput {
    pub title: Option<String>,
    pub body: Option<String>,
    pub summary: Option<String>,
    pub document: Option<String>,
    pub author_id: Option<String>,
}

/// Validated editable fields of a content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDraft {
    pub title: Title,
    pub body: Body,
    pub summary: Summary,
    pub document: DocumentRef,
}

impl ContentDraft {
    /// Validate the editable fields of `input`, collecting every failure.
    pub fn try_from_input(input: &ContentInput) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = required_text(&mut errors, "title", input.title.as_deref())
            .and_then(|raw| errors.check("title", Title::new(raw)));
        let body = required_text(&mut errors, "body", input.body.as_deref())
            .and_then(|raw| errors.check("body", Body::new(raw)));
        let summary = required_text(&mut errors, "summary", input.summary.as_deref())
            .and_then(|raw| errors.check("summary", Summary::new(raw)));
        let document = required_text(&mut errors, "document", input.document.as_deref())
            .and_then(|raw| errors.check("document", DocumentRef::new(raw)));

        match (title, body, summary, document) {
            (Some(title), Some(body), Some(summary), Some(document)) => Ok(Self {
                title,
                body,
                summary,
                document,
            }),
            _ => Err(errors),
        }
    }
}

/// Stored content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: ContentId,
    pub author_id: UserId,
    pub draft: ContentDraft,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// Replace the editable fields, keeping id, author, and creation time.
    ///
    /// `updated_at` never moves backwards even if the clock does.
    pub fn revise(mut self, draft: ContentDraft, now: DateTime<Utc>) -> Self {
        self.draft = draft;
        self.updated_at = now.max(self.updated_at);
        self
    }
}

/// Which items a caller may see in a listing or search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    All,
    OwnedBy(UserId),
}

impl Visibility {
    pub fn permits(&self, item: &ContentItem) -> bool {
        match self {
            Self::All => true,
            Self::OwnedBy(owner) => item.author_id == *owner,
        }
    }
}

/// Trimmed, non-empty search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// # Examples
    /// ```
    /// use cms_backend::domain::SearchTerm;
    ///
    /// let term = SearchTerm::new(Some("  report ")).expect("non-empty");
    /// assert_eq!(term.as_str(), "report");
    /// assert!(SearchTerm::new(Some("   ")).is_err());
    /// assert!(SearchTerm::new(None).is_err());
    /// ```
    pub fn new(raw: Option<&str>) -> Result<Self, ContentValidationError> {
        match raw.map(str::trim) {
            Some(text) if !text.is_empty() => Ok(Self(text.to_owned())),
            _ => Err(ContentValidationError::EmptyQuery),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Case-insensitive substring match against title, body, or summary.
    pub fn matches(&self, draft: &ContentDraft) -> bool {
        let needle = self.0.to_lowercase();
        [
            draft.title.as_str(),
            draft.body.as_str(),
            draft.summary.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// `ILIKE` pattern with `%`, `_`, and `\` escaped.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}
