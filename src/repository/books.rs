//! Book domain methods on Repository

use sqlx::{Executor, QueryBuilder, Sqlite};

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFields, BookFilter},
};

const BOOK_COLUMNS: &str =
    "id, isbn, title, author, publisher, year, signature, description, keywords";

async fn insert_book<'e, E>(executor: E, fields: &BookFields) -> AppResult<Book>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = format!(
        r#"
        INSERT INTO books (isbn, title, author, publisher, year, signature, description, keywords)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        BOOK_COLUMNS
    );
    let book = sqlx::query_as::<_, Book>(&query)
        .bind(&fields.isbn)
        .bind(&fields.title)
        .bind(&fields.author)
        .bind(&fields.publisher)
        .bind(fields.year)
        .bind(&fields.signature)
        .bind(&fields.description)
        .bind(&fields.keywords)
        .fetch_one(executor)
        .await?;
    Ok(book)
}

impl Repository {
    /// Get book by ID
    pub async fn books_get_by_id(&self, id: i64) -> AppResult<Book> {
        let query = format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS);
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Books matching every constraint of the filter, in insertion order.
    ///
    /// Text constraints use `instr` rather than `LIKE`: containment must be
    /// case-sensitive and `%`/`_` in the needle are literal.
    pub async fn books_search(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM books WHERE 1=1",
            BOOK_COLUMNS
        ));

        for (field, needle) in &filter.contains {
            builder
                .push(format!(" AND instr({}, ", field.column()))
                .push_bind(needle.clone())
                .push(") > 0");
        }

        if let Some(year) = filter.year {
            builder.push(" AND year = ").push_bind(year);
        }

        builder.push(" ORDER BY id");

        let books = builder
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Create a book
    pub async fn books_create(&self, fields: &BookFields) -> AppResult<Book> {
        insert_book(&self.pool, fields).await
    }

    /// Create many books in order.
    ///
    /// When `atomic` is set, all inserts share one transaction. Otherwise each
    /// insert commits on its own and a failure leaves earlier rows in place.
    pub async fn books_create_many(&self, books: &[BookFields], atomic: bool) -> AppResult<usize> {
        if atomic {
            let mut tx = self.pool.begin().await?;
            for fields in books {
                insert_book(&mut *tx, fields).await?;
            }
            tx.commit().await?;
        } else {
            for fields in books {
                insert_book(&self.pool, fields).await?;
            }
        }
        Ok(books.len())
    }

    /// Replace every mutable attribute of a book
    pub async fn books_update(&self, id: i64, fields: &BookFields) -> AppResult<Book> {
        let query = format!(
            r#"
            UPDATE books
            SET isbn = ?, title = ?, author = ?, publisher = ?, year = ?,
                signature = ?, description = ?, keywords = ?
            WHERE id = ?
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&fields.isbn)
            .bind(&fields.title)
            .bind(&fields.author)
            .bind(&fields.publisher)
            .bind(fields.year)
            .bind(&fields.signature)
            .bind(&fields.description)
            .bind(&fields.keywords)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Delete a book
    pub async fn books_delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}
