use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::services::normalizer::parse_date;

const SHORT_DESCRIPTION_CHARS: usize = 50;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub created_at: String,
}

impl Post {
    pub fn new(title: String, description: String, image: String, created_at: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            image,
            created_at,
        }
    }

    pub fn short_description(&self) -> String {
        let head: String = self.description.chars().take(SHORT_DESCRIPTION_CHARS).collect();
        format!("{}...", head)
    }

    /// e.g. `March 5, 2024`
    pub fn created_at_formatted(&self) -> Option<String> {
        parse_date(&self.created_at).map(|date| date.format("%B %-d, %Y").to_string())
    }
}

/// Post as served over the API, with its derived display fields.
#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub short_description: String,
    pub created_at_formatted: Option<String>,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        Self {
            short_description: post.short_description(),
            created_at_formatted: post.created_at_formatted(),
            post,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_description_truncates() {
        let post = Post::new("T".into(), "x".repeat(80), "img".into(), "2024-03-05".into());
        assert_eq!(post.short_description(), format!("{}...", "x".repeat(50)));

        let post = Post::new("T".into(), "short".into(), "img".into(), "2024-03-05".into());
        assert_eq!(post.short_description(), "short...");
    }

    #[test]
    fn test_created_at_formatted() {
        let post = Post::new("T".into(), "d".into(), "img".into(), "2024-03-05".into());
        assert_eq!(post.created_at_formatted().as_deref(), Some("March 5, 2024"));

        let post = Post::new("T".into(), "d".into(), "img".into(), "someday".into());
        assert_eq!(post.created_at_formatted(), None);
    }

    #[test]
    fn test_view_flattens_post() {
        let post = Post::new("Title".into(), "Body".into(), "img".into(), "2024-12-25".into());
        let json = serde_json::to_value(PostView::from(post)).unwrap();
        assert_eq!(json["title"], "Title");
        assert_eq!(json["short_description"], "Body...");
        assert_eq!(json["created_at_formatted"], "December 25, 2024");
    }
}
