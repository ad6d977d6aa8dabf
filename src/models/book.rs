//! Book model and catalog filters

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub isbn: Option<String>,
    pub title: String,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i64>,
    /// Shelf / location code
    pub signature: Option<String>,
    pub description: Option<String>,
    /// Comma-separated free tags
    pub keywords: Option<String>,
}

/// Mutable attributes of a book.
///
/// Used both for creation and for full-record replacement: a field left
/// `None` on update is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct BookFields {
    pub isbn: Option<String>,
    #[validate(required(message = "Title is required"))]
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i64>,
    pub signature: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

/// Book form as submitted by the add/edit pages (every value is text)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookForm {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<String>,
    pub signature: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

impl TryFrom<BookForm> for BookFields {
    type Error = AppError;

    fn try_from(form: BookForm) -> AppResult<Self> {
        Ok(Self {
            year: parse_year(form.year.as_deref())?,
            isbn: form.isbn,
            title: form.title,
            author: form.author,
            publisher: form.publisher,
            signature: form.signature,
            description: form.description,
            keywords: form.keywords,
        })
    }
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            isbn: book.isbn.clone(),
            title: Some(book.title.clone()),
            author: book.author.clone(),
            publisher: book.publisher.clone(),
            year: book.year.map(|y| y.to_string()),
            signature: book.signature.clone(),
            description: book.description.clone(),
            keywords: book.keywords.clone(),
        }
    }
}

/// Parse a year given as text. Blank or absent means no year.
pub fn parse_year(value: Option<&str>) -> AppResult<Option<i64>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::Parse(format!("'{}' is not a valid year", raw))),
    }
}

/// Filter parameters accepted by the listing and download endpoints
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// ISBN contains
    pub isbn: Option<String>,
    /// Title contains
    pub title: Option<String>,
    /// Author contains
    pub author: Option<String>,
    /// Publisher contains
    pub publisher: Option<String>,
    /// Exact publication year
    pub year: Option<String>,
    /// Signature contains
    pub signature: Option<String>,
    /// Keywords contains
    pub keywords: Option<String>,
}

/// Text attributes that support containment filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Isbn,
    Title,
    Author,
    Publisher,
    Signature,
    Keywords,
}

impl TextField {
    pub fn column(self) -> &'static str {
        match self {
            TextField::Isbn => "isbn",
            TextField::Title => "title",
            TextField::Author => "author",
            TextField::Publisher => "publisher",
            TextField::Signature => "signature",
            TextField::Keywords => "keywords",
        }
    }
}

/// What to do with a `year` filter that is not an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearParsing {
    /// Drop the filter
    Lenient,
    /// Fail with a parse error
    Strict,
}

/// Typed catalog filter. All constraints are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Case-sensitive substring constraints
    pub contains: Vec<(TextField, String)>,
    /// Exact year
    pub year: Option<i64>,
}

impl BookFilter {
    /// Build a filter from raw query parameters. Absent and empty
    /// parameters impose no constraint.
    pub fn from_query(query: &BookQuery, year_parsing: YearParsing) -> AppResult<Self> {
        let text = [
            (TextField::Isbn, &query.isbn),
            (TextField::Title, &query.title),
            (TextField::Author, &query.author),
            (TextField::Publisher, &query.publisher),
            (TextField::Signature, &query.signature),
            (TextField::Keywords, &query.keywords),
        ];

        let contains = text
            .into_iter()
            .filter_map(|(field, value)| match value.as_deref() {
                Some(v) if !v.is_empty() => Some((field, v.to_string())),
                _ => None,
            })
            .collect();

        let year = match parse_year(query.year.as_deref()) {
            Ok(year) => year,
            Err(e) => match year_parsing {
                YearParsing::Strict => return Err(e),
                YearParsing::Lenient => {
                    tracing::debug!("Ignoring year filter: {}", e);
                    None
                }
            },
        };

        Ok(Self { contains, year })
    }

    pub fn is_empty(&self) -> bool {
        self.contains.is_empty() && self.year.is_none()
    }
}
