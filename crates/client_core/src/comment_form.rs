//! Draft comment state, validation and submission.

use std::time::Duration;

use shared::{domain::BookId, error::ErrorCode, protocol::NewCommentRequest};
use tracing::{error, info, warn};

use crate::{
    navigation::Route,
    session::SessionContext,
    settings::DEFAULT_LOGIN_REDIRECT_SECS,
    stars::{RatingError, StarPicker},
    status_text, BookApi, RequestError,
};

pub const COMMENT_REQUIRED_MESSAGE: &str = "Comment is required";
pub const SERVER_ERROR_MESSAGE: &str = "Error in server";
pub const LOGIN_REQUIRED_TITLE: &str = "Login Required";
pub const LOGIN_REQUIRED_TEXT: &str = "You need to login to leave a comment on a book.";

/// Auto-dismissing notice shown when an anonymous user tries to comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginNotice {
    pub title: &'static str,
    pub text: &'static str,
    pub delay: Duration,
    pub redirect: Route,
}

impl LoginNotice {
    pub fn new(delay: Duration) -> Self {
        Self {
            title: LOGIN_REQUIRED_TITLE,
            text: LOGIN_REQUIRED_TEXT,
            delay,
            redirect: Route::Login,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid,
    /// No book is mounted yet; nothing was validated or sent.
    NotMounted,
    LoginRequired(LoginNotice),
    Posted,
    /// The server refused the comment; the message is on the form.
    Rejected,
    /// Transport failure; logged only.
    NetworkFailed,
}

#[derive(Debug, Clone)]
pub struct CommentForm {
    comment: String,
    stars: StarPicker,
    touched: bool,
    server_message: Option<String>,
    login_delay: Duration,
}

impl Default for CommentForm {
    fn default() -> Self {
        Self {
            comment: String::new(),
            stars: StarPicker::default(),
            touched: false,
            server_message: None,
            login_delay: Duration::from_secs(DEFAULT_LOGIN_REDIRECT_SECS),
        }
    }
}

impl CommentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn stars(&self) -> &StarPicker {
        &self.stars
    }

    pub fn rating(&self) -> Option<u8> {
        self.stars.selected()
    }

    pub fn click_star(&mut self, position: u8) -> Result<Option<u8>, RatingError> {
        self.stars.click(position)
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.comment.is_empty() {
            return Err(COMMENT_REQUIRED_MESSAGE);
        }
        Ok(())
    }

    /// Inline message, shown once a submit has been attempted.
    pub fn validation_message(&self) -> Option<&'static str> {
        if !self.touched {
            return None;
        }
        self.validate().err()
    }

    pub fn server_message(&self) -> Option<&str> {
        self.server_message.as_deref()
    }

    pub fn reset(&mut self) {
        self.comment.clear();
        self.stars.reset();
        self.touched = false;
        self.server_message = None;
    }

    pub fn payload(&self, session: &SessionContext, book_id: BookId) -> Option<NewCommentRequest> {
        Some(NewCommentRequest {
            comment: self.comment.clone(),
            user_id: session.user_id()?,
            book_id,
            rating: self.stars.selected(),
        })
    }

    pub async fn submit(
        &mut self,
        api: &dyn BookApi,
        session: &SessionContext,
        book_id: BookId,
    ) -> SubmitOutcome {
        self.touched = true;
        if let Err(message) = self.validate() {
            info!(%book_id, "comment rejected by validation: {message}");
            return SubmitOutcome::Invalid;
        }
        self.server_message = None;

        let Some(payload) = self.payload(session, book_id) else {
            info!(%book_id, "anonymous comment attempt; login required");
            return SubmitOutcome::LoginRequired(LoginNotice::new(self.login_delay));
        };

        match api.post_comment(&payload, session.token()).await {
            Ok(()) => {
                info!(%book_id, user_id = %payload.user_id, "comment posted");
                self.reset();
                SubmitOutcome::Posted
            }
            Err(RequestError::Server(exception)) => {
                warn!(%book_id, status = exception.status, "comment refused: {exception}");
                let message = match exception.code {
                    ErrorCode::Unauthorized | ErrorCode::Internal => SERVER_ERROR_MESSAGE.into(),
                    ErrorCode::NotFound | ErrorCode::Other => exception
                        .message
                        .unwrap_or_else(|| status_text(exception.status)),
                };
                self.server_message = Some(message);
                SubmitOutcome::Rejected
            }
            Err(err) => {
                error!(%book_id, "Network error: {err}");
                SubmitOutcome::NetworkFailed
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/comment_form_tests.rs"]
mod tests;
