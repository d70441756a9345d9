use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::id::BookId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: BookId,
    pub title: String,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    #[serde(rename = "_id")]
    pub id: BookId,
    pub title: String,
    pub commentcount: u64,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        BookSummary {
            id: book.id,
            title: book.title.clone(),
            commentcount: book.comments.len() as u64,
        }
    }
}

/// Body of `POST /api/books`.
#[derive(Debug, Default, Deserialize)]
pub struct NewBook {
    #[serde(default, deserialize_with = "text_field")]
    pub title: Option<String>,
}

/// Body of `POST /api/books/:id`. Any `id` sent alongside is ignored; the
/// path decides which book is commented on.
#[derive(Debug, Default, Deserialize)]
pub struct NewComment {
    #[serde(default, deserialize_with = "text_field")]
    pub comment: Option<String>,
}

/// Reads a body field as text. Numbers and booleans become their literal
/// text, arrays and objects their compact JSON, `null` counts as absent.
fn text_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

impl NewBook {
    /// The title, unless it is absent or empty.
    pub fn title(self) -> Option<String> {
        self.title.filter(|t| !t.is_empty())
    }
}

impl NewComment {
    /// Any comment text is accepted, including an empty one.
    pub fn comment(self) -> Option<String> {
        self.comment
    }
}
