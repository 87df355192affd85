use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response};
use shared::{
    domain::BookId,
    error::{ApiException, ErrorBody},
    protocol::{Book, NewCommentRequest},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub mod comment_form;
pub mod loader;
pub mod navigation;
pub mod page;
pub mod session;
pub mod settings;
pub mod stars;

pub use comment_form::{CommentForm, LoginNotice, SubmitOutcome};
pub use loader::{BookLoader, LoadFailure, LoadState, LoadTicket};
pub use navigation::{follow_login_redirect, Navigator, Route};
pub use page::{render_text, BookPage, BookView, CommentView, FormView, PageView};
pub use session::{SessionContext, SessionError, SessionStore};
pub use settings::{load_settings, ClientSettings};
pub use stars::{render_stars, RatingError, StarPicker};

#[derive(Debug, Clone, Error)]
pub enum RequestError {
    #[error("network failure: {0}")]
    Network(String),
    #[error(transparent)]
    Server(#[from] ApiException),
    #[error("unreadable response body: {0}")]
    Decode(String),
    #[error("invalid endpoint url: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// The two StoryCircle endpoints the book page consumes.
#[async_trait]
pub trait BookApi: Send + Sync {
    async fn fetch_book(&self, book_id: BookId, token: Option<&str>) -> Result<Book, RequestError>;
    async fn post_comment(
        &self,
        payload: &NewCommentRequest,
        token: Option<&str>,
    ) -> Result<(), RequestError>;
}

pub struct HttpBookApi {
    http: Client,
    base_url: Url,
}

impl HttpBookApi {
    pub fn new(server_url: &str) -> Result<Self, RequestError> {
        let mut base_url = Url::parse(server_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, RequestError> {
        Ok(self.base_url.join(path)?)
    }

    fn authorized(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        let builder = builder.header(header::CONTENT_TYPE, "application/json");
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl BookApi for HttpBookApi {
    async fn fetch_book(&self, book_id: BookId, token: Option<&str>) -> Result<Book, RequestError> {
        let url = self.endpoint(&format!("books/{book_id}"))?;
        debug!(%url, "fetching book");
        let response = Self::authorized(self.http.get(url), token)
            .send()
            .await
            .map_err(|err| RequestError::Network(err.to_string()))?;
        if !response.status().is_success() {
            return Err(read_failure(response).await);
        }

        let raw = response
            .bytes()
            .await
            .map_err(|err| RequestError::Network(err.to_string()))?;
        serde_json::from_slice(&raw).map_err(|err| RequestError::Decode(err.to_string()))
    }

    async fn post_comment(
        &self,
        payload: &NewCommentRequest,
        token: Option<&str>,
    ) -> Result<(), RequestError> {
        let url = self.endpoint("bookcomments")?;
        debug!(%url, book_id = %payload.book_id, "posting book comment");
        let response = Self::authorized(self.http.post(url), token)
            .json(payload)
            .send()
            .await
            .map_err(|err| RequestError::Network(err.to_string()))?;
        if !response.status().is_success() {
            return Err(read_failure(response).await);
        }
        Ok(())
    }
}

async fn read_failure(response: Response) -> RequestError {
    let status = response.status().as_u16();
    let body = match response.bytes().await {
        Ok(raw) => ErrorBody::parse(&raw),
        Err(err) => {
            warn!(status, "failed to read error body: {err}");
            ErrorBody::default()
        }
    };
    RequestError::Server(ApiException::new(status, body))
}

/// Reason phrase for a status, used when the server sent no message.
pub fn status_text(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[cfg(test)]
#[path = "tests/test_support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
