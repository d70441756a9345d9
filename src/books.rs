//! Book store.
//!
//! Every operation is a single statement against the `books` table. Comments
//! live in a JSON array column; appending one is done with `json_insert`
//! inside the `UPDATE`, so two concurrent appends to the same book both land.

use libsql::Connection;

use crate::error::{StoreError, StoreResult};
use crate::id::BookId;
use crate::model::{Book, BookSummary};

pub struct Library<'a> {
    conn: &'a Connection,
}

impl<'a> Library<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, title: &str) -> StoreResult<Book> {
        let query = r#"
            INSERT INTO books (id, title)
            VALUES (?, ?)
            RETURNING id, title, comments
        "#;

        let id = BookId::generate();
        let mut rows = self
            .conn
            .query(query, libsql::params![id.to_hex(), title])
            .await?;

        match rows.next().await? {
            Some(row) => self.row_to_book(&row),
            None => Err(StoreError::NoRow("insert book")),
        }
    }

    pub async fn list(&self) -> StoreResult<Vec<BookSummary>> {
        let query = r#"
            SELECT id, title, json_array_length(comments)
            FROM books
            ORDER BY seq ASC
        "#;

        let mut rows = self.conn.query(query, ()).await?;
        let mut books = Vec::new();

        while let Some(row) = rows.next().await? {
            let id: String = row.get(0)?;
            let commentcount: i64 = row.get(2)?;
            books.push(BookSummary {
                id: BookId::parse(&id)?,
                title: row.get(1)?,
                commentcount: commentcount.max(0) as u64,
            });
        }

        Ok(books)
    }

    pub async fn get(&self, id: &BookId) -> StoreResult<Option<Book>> {
        let query = "SELECT id, title, comments FROM books WHERE id = ?";

        let mut rows = self.conn.query(query, libsql::params![id.to_hex()]).await?;

        match rows.next().await? {
            Some(row) => Ok(Some(self.row_to_book(&row)?)),
            None => Ok(None),
        }
    }

    /// Appends `comment` and returns the book as stored afterwards, or `None`
    /// when no book has this id.
    pub async fn append_comment(&self, id: &BookId, comment: &str) -> StoreResult<Option<Book>> {
        let query = r#"
            UPDATE books
            SET comments = json_insert(comments, '$[#]', ?)
            WHERE id = ?
            RETURNING id, title, comments
        "#;

        let mut rows = self
            .conn
            .query(query, libsql::params![comment, id.to_hex()])
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(self.row_to_book(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, id: &BookId) -> StoreResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM books WHERE id = ?", libsql::params![id.to_hex()])
            .await?;
        Ok(removed > 0)
    }

    pub async fn delete_all(&self) -> StoreResult<u64> {
        Ok(self.conn.execute("DELETE FROM books", ()).await?)
    }

    pub async fn count(&self) -> StoreResult<u64> {
        let mut rows = self.conn.query("SELECT COUNT(*) FROM books", ()).await?;
        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)?.max(0) as u64),
            None => Err(StoreError::NoRow("count books")),
        }
    }

    fn row_to_book(&self, row: &libsql::Row) -> StoreResult<Book> {
        let id: String = row.get(0)?;
        let comments: String = row.get(2)?;
        let comments = serde_json::from_str(&comments).map_err(|source| StoreError::Comments {
            id: id.clone(),
            source,
        })?;

        Ok(Book {
            id: BookId::parse(&id)?,
            title: row.get(1)?,
            comments,
        })
    }
}
