//! Tabular exchange: bulk CSV import and export of catalog records
//!
//! The row/record mapping is an explicit column table. Each column pairs a
//! header with a typed reader and a renderer, so nothing depends on how the
//! CSV parser would guess types.

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{parse_year, Book, BookFields, BookFilter},
        import_report::ImportSummary,
    },
    repository::Repository,
    services::catalog::CatalogService,
};

/// Recognized headers, in export column order
pub const HEADERS: [&str; 8] = [
    "ISBN",
    "Title",
    "Author",
    "Publisher",
    "Year",
    "Signature",
    "Description",
    "Keywords",
];

/// One row of a tabular file: `(header, value)` pairs in column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularRow(Vec<(String, String)>);

impl TabularRow {
    /// Value of the first column with this exact header
    pub fn get(&self, header: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(h, _)| h.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TabularRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

struct Column {
    header: &'static str,
    read: fn(&mut BookFields, Option<&str>) -> AppResult<()>,
    write: fn(&Book) -> String,
}

// Absent header reads as the empty string, never as null.
macro_rules! text_column {
    ($header:literal, $field:ident) => {
        Column {
            header: $header,
            read: |fields, value| {
                fields.$field = Some(value.unwrap_or_default().to_string());
                Ok(())
            },
            write: |book| book.$field.clone().unwrap_or_default(),
        }
    };
}

const COLUMNS: [Column; 8] = [
    text_column!("ISBN", isbn),
    Column {
        header: "Title",
        read: |fields, value| {
            fields.title = Some(value.unwrap_or_default().to_string());
            Ok(())
        },
        write: |book| book.title.clone(),
    },
    text_column!("Author", author),
    text_column!("Publisher", publisher),
    Column {
        header: "Year",
        read: |fields, value| {
            fields.year = parse_year(value)?;
            Ok(())
        },
        write: |book| book.year.map(|y| y.to_string()).unwrap_or_default(),
    },
    text_column!("Signature", signature),
    text_column!("Description", description),
    text_column!("Keywords", keywords),
];

/// Derive the fields of a new book from one imported row
pub fn row_to_fields(row: &TabularRow) -> AppResult<BookFields> {
    let mut fields = BookFields::default();
    for column in &COLUMNS {
        (column.read)(&mut fields, row.get(column.header))?;
    }
    Ok(fields)
}

/// One row per book, same order as the input, identifier excluded
pub fn export_rows(books: &[Book]) -> Vec<TabularRow> {
    books
        .iter()
        .map(|book| {
            COLUMNS
                .iter()
                .map(|column| (column.header, (column.write)(book)))
                .collect::<TabularRow>()
        })
        .collect()
}

/// Parse a header-first CSV document held in memory
pub fn read_csv(contents: &[u8]) -> AppResult<Vec<TabularRow>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(contents);

    let headers: StringRecord = reader.headers().map_err(malformed)?.clone();
    if headers.is_empty() {
        return Err(AppError::UnsupportedFormat(
            "File has no header row".to_string(),
        ));
    }

    reader
        .records()
        .map(|record| -> AppResult<TabularRow> {
            let record = record.map_err(malformed)?;
            Ok(headers.iter().zip(record.iter()).collect())
        })
        .collect()
}

/// Render books as a CSV document with the recognized header line
pub fn write_csv(books: &[Book]) -> AppResult<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(HEADERS)
        .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    for row in export_rows(books) {
        writer
            .write_record(row.values())
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e)))
}

fn malformed(error: csv::Error) -> AppError {
    AppError::UnsupportedFormat(format!("Malformed CSV: {}", error))
}

fn at_row(error: AppError, row: usize) -> AppError {
    match error {
        AppError::Parse(msg) => AppError::Parse(format!("row {}: {}", row, msg)),
        AppError::Validation(msg) => AppError::Validation(format!("row {}: {}", row, msg)),
        other => other,
    }
}

#[derive(Clone)]
pub struct ExchangeService {
    repository: Repository,
    atomic: bool,
}

impl ExchangeService {
    pub fn new(repository: Repository, atomic: bool) -> Self {
        Self { repository, atomic }
    }

    /// Create one book per row and return how many were created.
    ///
    /// Every row is converted and validated before the first insert, so a
    /// bad row commits nothing.
    pub async fn import_rows(&self, rows: &[TabularRow]) -> AppResult<usize> {
        let books = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                row_to_fields(row)
                    .and_then(|fields| {
                        CatalogService::validate(&fields)?;
                        Ok(fields)
                    })
                    .map_err(|e| at_row(e, index + 1))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let created = self
            .repository
            .books_create_many(&books, self.atomic)
            .await?;
        tracing::info!("Imported {} book(s) (atomic: {})", created, self.atomic);
        Ok(created)
    }

    /// Import an uploaded file
    pub async fn import_file(&self, file_name: &str, contents: &[u8]) -> AppResult<ImportSummary> {
        if !file_name.to_ascii_lowercase().ends_with(".csv") {
            tracing::warn!("Rejected upload {:?}: not a .csv file", file_name);
            return Err(AppError::UnsupportedFormat(format!(
                "{} is not a CSV file",
                file_name
            )));
        }

        let rows = read_csv(contents).inspect_err(|e| {
            tracing::warn!("Rejected upload {:?}: {}", file_name, e);
        })?;
        let created = self.import_rows(&rows).await?;

        Ok(ImportSummary {
            created,
            atomic: self.atomic,
        })
    }

    /// Export the books matching `filter` as a CSV document
    pub async fn export_csv(&self, filter: &BookFilter) -> AppResult<Vec<u8>> {
        let books = self.repository.books_search(filter).await?;
        tracing::debug!("Exporting {} book(s)", books.len());
        write_csv(&books)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Book {
        Book {
            id: 7,
            isbn: Some("9780441013593".to_string()),
            title: "Dune".to_string(),
            author: Some("Frank Herbert".to_string()),
            publisher: None,
            year: Some(1965),
            signature: Some("SF-HER-1".to_string()),
            description: None,
            keywords: Some("desert, spice".to_string()),
        }
    }

    #[test]
    fn test_missing_headers_read_as_empty_strings() {
        let row: TabularRow = [("Title", "X"), ("Year", "1999")].into_iter().collect();
        let fields = row_to_fields(&row).unwrap();
        assert_eq!(fields.title.as_deref(), Some("X"));
        assert_eq!(fields.year, Some(1999));
        assert_eq!(fields.isbn.as_deref(), Some(""));
        assert_eq!(fields.keywords.as_deref(), Some(""));
    }

    #[test]
    fn test_blank_year_is_null() {
        let row: TabularRow = [("Title", "X"), ("Year", " ")].into_iter().collect();
        assert_eq!(row_to_fields(&row).unwrap().year, None);
    }

    #[test]
    fn test_bad_year_is_parse_error() {
        let row: TabularRow = [("Title", "X"), ("Year", "MCMXC")].into_iter().collect();
        assert!(matches!(row_to_fields(&row), Err(AppError::Parse(_))));
    }

    #[test]
    fn test_headers_are_case_sensitive() {
        let row: TabularRow = [("title", "lowercase")].into_iter().collect();
        assert_eq!(row_to_fields(&row).unwrap().title.as_deref(), Some(""));
    }

    #[test]
    fn test_export_rows_fixed_columns() {
        let rows = export_rows(&[book()]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].headers().collect::<Vec<_>>(), HEADERS.to_vec());
        assert_eq!(
            rows[0].values().collect::<Vec<_>>(),
            vec![
                "9780441013593",
                "Dune",
                "Frank Herbert",
                "",
                "1965",
                "SF-HER-1",
                "",
                "desert, spice"
            ]
        );
    }

    #[test]
    fn test_write_csv_quotes_and_reads_back() {
        let bytes = write_csv(&[book()]).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(
            text.starts_with("ISBN,Title,Author,Publisher,Year,Signature,Description,Keywords\n")
        );
        assert!(text.contains("\"desert, spice\""));

        let rows = read_csv(&bytes).unwrap();
        assert_eq!(rows, export_rows(&[book()]));
    }

    #[test]
    fn test_read_csv_rejects_ragged_rows() {
        let result = read_csv(b"Title,Year\nA,2001,extra\n");
        assert!(matches!(result, Err(AppError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_read_csv_rejects_empty_file() {
        assert!(matches!(read_csv(b""), Err(AppError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_read_csv_rejects_invalid_utf8() {
        let result = read_csv(b"Title\n\xff\xfe\n");
        assert!(matches!(result, Err(AppError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_error_row_context() {
        let error = at_row(AppError::Parse("'x' is not a valid year".to_string()), 3);
        assert_eq!(error.to_string(), "Parse error: row 3: 'x' is not a valid year");
    }
}
