use std::sync::Mutex;

use async_trait::async_trait;
use shared::{
    domain::{BookId, CommentId},
    error::{ApiException, ErrorBody},
    protocol::{Book, BookComment, NewCommentRequest},
};

use crate::{BookApi, RequestError};

/// In-memory `BookApi` that records every call.
pub(crate) struct FakeApi {
    book: Mutex<Result<Book, RequestError>>,
    post: Mutex<Result<(), RequestError>>,
    pub(crate) fetches: Mutex<Vec<(BookId, Option<String>)>>,
    pub(crate) posts: Mutex<Vec<(NewCommentRequest, Option<String>)>>,
}

impl FakeApi {
    pub(crate) fn serving(book: Book) -> Self {
        Self {
            book: Mutex::new(Ok(book)),
            post: Mutex::new(Ok(())),
            fetches: Mutex::new(Vec::new()),
            posts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_book(&self, book: Result<Book, RequestError>) {
        *self.book.lock().expect("lock") = book;
    }

    pub(crate) fn set_post_result(&self, result: Result<(), RequestError>) {
        *self.post.lock().expect("lock") = result;
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.lock().expect("lock").len()
    }

    pub(crate) fn posted(&self) -> Vec<(NewCommentRequest, Option<String>)> {
        self.posts.lock().expect("lock").clone()
    }
}

#[async_trait]
impl BookApi for FakeApi {
    async fn fetch_book(&self, book_id: BookId, token: Option<&str>) -> Result<Book, RequestError> {
        self.fetches
            .lock()
            .expect("lock")
            .push((book_id, token.map(str::to_string)));
        self.book.lock().expect("lock").clone()
    }

    async fn post_comment(
        &self,
        payload: &NewCommentRequest,
        token: Option<&str>,
    ) -> Result<(), RequestError> {
        self.posts
            .lock()
            .expect("lock")
            .push((payload.clone(), token.map(str::to_string)));
        self.post.lock().expect("lock").clone()
    }
}

pub(crate) fn server_error(status: u16, message: Option<&str>) -> RequestError {
    let body = match message {
        Some(message) => ErrorBody::new(message),
        None => ErrorBody::default(),
    };
    RequestError::Server(ApiException::new(status, body))
}

pub(crate) fn comment(id: i64, username: &str, text: &str, rating: i64) -> BookComment {
    BookComment {
        id: CommentId(id),
        username: username.into(),
        comment: text.into(),
        rating,
    }
}

pub(crate) fn sample_book(comments: Vec<BookComment>) -> Book {
    Book {
        id: Some(BookId(3)),
        title: "The Left Hand of Darkness".into(),
        author: "Ursula K. Le Guin".into(),
        description: "An envoy on the planet Gethen.".into(),
        comments,
    }
}
