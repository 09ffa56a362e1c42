//! Post records as the remote store returns them, and the payload written back.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::DomainError;

/// Store-assigned identifier. Tables keyed by `bigint` yield numbers, tables
/// keyed by `uuid` or `text` yield strings; both are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Number(value) => write!(f, "{value}"),
            PostId::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

/// Column values written on insert and update. The id is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostFields {
    pub title: String,
    pub content: String,
}

impl PostFields {
    /// Build a payload, rejecting blank fields.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Result<Self, DomainError> {
        let title = title.into();
        let content = content.into();
        ensure_non_empty(&title, "title")?;
        ensure_non_empty(&content, "content")?;
        Ok(Self { title, content })
    }
}

fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("`{field}` must not be empty")));
    }
    Ok(())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_verbatim() {
        assert_eq!(PostId::Number(42).to_string(), "42");
        assert_eq!(PostId::Text("007".into()).to_string(), "007");
        let raw = "0b5c7f0e-5d5b-4c53-9d8e-3f7ad1b8a001";
        assert_eq!(PostId::Text(raw.into()).to_string(), raw);
    }

    #[test]
    fn numeric_text_ids_keep_their_variant() {
        let ids: Vec<PostId> = serde_json::from_str(r#"[42, "42"]"#).expect("ids");
        assert_eq!(ids, vec![PostId::Number(42), PostId::Text("42".into())]);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn store_rows_ignore_extra_columns_and_nulls() {
        let rows: Vec<Post> = serde_json::from_str(
            r#"[
                {"id": 1, "title": "A", "content": "x", "created_at": "2024-01-01T00:00:00Z"},
                {"id": "abc", "title": null, "content": "y"}
            ]"#,
        )
        .expect("rows");

        assert_eq!(rows[0].id, PostId::Number(1));
        assert_eq!(rows[0].title, "A");
        assert_eq!(rows[1].id, PostId::Text("abc".into()));
        assert_eq!(rows[1].title, "");
    }

    #[test]
    fn fields_require_title_and_content() {
        assert!(PostFields::new("Title", "Body").is_ok());
        assert!(PostFields::new("", "Body").is_err());
        assert!(PostFields::new("Title", "   ").is_err());
    }

    #[test]
    fn fields_serialize_without_id() {
        let fields = PostFields::new("T", "C").expect("fields");
        let value = serde_json::to_value(&fields).expect("json");
        assert_eq!(value, serde_json::json!({"title": "T", "content": "C"}));
    }
}
