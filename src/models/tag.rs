//! Tag model

use serde::{Deserialize, Serialize};

/// Tag entity. Names are unique case-insensitively and stored lowercased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Input for creating a tag, optionally associated with existing blogs
#[derive(Debug, Clone, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub blog_ids: Option<Vec<i64>>,
}

/// Tag name/description pair, used for updates and for creating a single
/// tag directly on a blog. Blog associations are not editable through
/// updates; a tag moves between blogs by attach/detach.
#[derive(Debug, Clone, Deserialize)]
pub struct TagBody {
    pub name: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tag_blog_ids_optional() {
        let input: NewTag =
            serde_json::from_str(r#"{"name": "Go", "description": "golang"}"#).expect("parse");
        assert_eq!(input.blog_ids, None);
    }
}
