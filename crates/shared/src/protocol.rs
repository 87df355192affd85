use serde::{Deserialize, Serialize};

use crate::domain::{BookId, CommentId, UserId};

/// Body of `GET /books/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comments: Vec<BookComment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookComment {
    pub id: CommentId,
    pub username: String,
    pub comment: String,
    // Range is checked at render time.
    pub rating: i64,
}

/// Body of `POST /bookcomments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCommentRequest {
    pub comment: String,
    pub user_id: UserId,
    pub book_id: BookId,
    pub rating: Option<u8>,
}
