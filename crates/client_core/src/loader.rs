//! Book loading state for the page, guarded against stale completions.

use shared::{domain::BookId, error::ErrorCode, protocol::Book};
use tracing::{debug, info, warn};

use crate::{BookApi, RequestError};

pub const NETWORK_FAILURE_MESSAGE: &str = "Kindly check your network and reload again.";
pub const UNREADABLE_BOOK_MESSAGE: &str = "Received an unreadable book record from the server.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded(Book),
    Failed(LoadFailure),
}

/// Identifies one started load; only the latest ticket may settle the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    book_id: BookId,
}

impl LoadTicket {
    pub fn book_id(&self) -> BookId {
        self.book_id
    }
}

#[derive(Debug, Default)]
pub struct BookLoader {
    state: LoadState,
    generation: u64,
}

impl BookLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn book(&self) -> Option<&Book> {
        match &self.state {
            LoadState::Loaded(book) => Some(book),
            _ => None,
        }
    }

    pub fn begin(&mut self, book_id: BookId) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket {
            generation: self.generation,
            book_id,
        }
    }

    /// Applies a finished fetch. Returns `false` when a newer load has started since.
    ///
    /// `load` holds `&mut self` across the fetch, so only callers that drive
    /// `begin`/`complete` themselves (e.g. with fetches spawned elsewhere) can hit a stale ticket.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<Book, RequestError>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                book_id = %ticket.book_id,
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale book response"
            );
            return false;
        }

        self.state = match result {
            Ok(book) => {
                info!(book_id = %ticket.book_id, comments = book.comments.len(), "book loaded");
                LoadState::Loaded(book)
            }
            Err(err) => {
                warn!(book_id = %ticket.book_id, "book load failed: {err}");
                LoadState::Failed(describe_fetch_failure(&err))
            }
        };
        true
    }

    pub async fn load(
        &mut self,
        api: &dyn BookApi,
        book_id: BookId,
        token: Option<&str>,
    ) -> &LoadState {
        let ticket = self.begin(book_id);
        let result = api.fetch_book(book_id, token).await;
        self.complete(ticket, result);
        &self.state
    }
}

/// User-facing message for a failed book fetch.
pub fn describe_fetch_failure(err: &RequestError) -> LoadFailure {
    let message = match err {
        RequestError::Server(exception) => match (exception.code, &exception.message) {
            (
                ErrorCode::Unauthorized | ErrorCode::NotFound | ErrorCode::Internal,
                Some(message),
            ) => message.clone(),
            _ => NETWORK_FAILURE_MESSAGE.to_string(),
        },
        RequestError::Decode(_) => UNREADABLE_BOOK_MESSAGE.to_string(),
        RequestError::Network(_) | RequestError::Endpoint(_) => {
            NETWORK_FAILURE_MESSAGE.to_string()
        }
    };
    LoadFailure { message }
}

#[cfg(test)]
mod tests {
    use shared::error::{ApiException, ErrorBody};

    use super::*;

    fn book(title: &str) -> Book {
        Book {
            id: None,
            title: title.into(),
            author: "Anon".into(),
            description: String::new(),
            comments: Vec::new(),
        }
    }

    #[test]
    fn stale_completion_does_not_overwrite_newer_load() {
        let mut loader = BookLoader::new();
        let first = loader.begin(BookId(1));
        let second = loader.begin(BookId(2));

        assert!(loader.complete(second, Ok(book("Second"))));
        assert!(!loader.complete(first, Ok(book("First"))));
        assert_eq!(loader.book().map(|b| b.title.as_str()), Some("Second"));
    }

    #[test]
    fn loading_flag_clears_on_failure() {
        let mut loader = BookLoader::new();
        let ticket = loader.begin(BookId(4));
        assert!(loader.is_loading());
        loader.complete(ticket, Err(RequestError::Network("refused".into())));
        assert!(!loader.is_loading());
        assert_eq!(
            loader.state(),
            &LoadState::Failed(LoadFailure {
                message: NETWORK_FAILURE_MESSAGE.into()
            })
        );
    }

    #[test]
    fn server_messages_surface_only_for_known_statuses() {
        let not_found =
            RequestError::Server(ApiException::new(404, ErrorBody::new("Book not found")));
        assert_eq!(describe_fetch_failure(&not_found).message, "Book not found");

        let teapot =
            RequestError::Server(ApiException::new(418, ErrorBody::new("short and stout")));
        assert_eq!(describe_fetch_failure(&teapot).message, NETWORK_FAILURE_MESSAGE);

        let silent = RequestError::Server(ApiException::new(500, ErrorBody::default()));
        assert_eq!(describe_fetch_failure(&silent).message, NETWORK_FAILURE_MESSAGE);

        let garbled = RequestError::Decode("expected value".into());
        assert_eq!(describe_fetch_failure(&garbled).message, UNREADABLE_BOOK_MESSAGE);
    }
}
