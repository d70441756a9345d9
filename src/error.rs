use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid book id: {0:?}")]
pub struct InvalidId(pub String);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error")]
    Database(#[from] libsql::Error),

    #[error("stored id is malformed")]
    StoredId(#[from] InvalidId),

    #[error("comments of book {id} are not a list of strings")]
    Comments {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode response")]
    Serialize(#[source] serde_json::Error),

    #[error("statement returned no row: {0}")]
    NoRow(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_chain_is_unpacked() {
        let source = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let err = StoreError::Comments {
            id: "65a1f0c2e4b0a1b2c3d4e5f6".to_string(),
            source,
        };
        let text = crate::unpack_error(&err);
        assert!(text.starts_with("comments of book 65a1f0c2e4b0a1b2c3d4e5f6 are not a list of strings: "));
        assert!(text.contains("EOF"));
    }
}
