//! The book detail page: loader + comment form behind one owner, and its view model.

use std::{fmt::Write as _, sync::Arc, time::Duration};

use shared::domain::{BookId, CommentId};
use tracing::{debug, info};

use crate::{
    comment_form::{CommentForm, SubmitOutcome},
    loader::{BookLoader, LoadState},
    session::SessionContext,
    stars::{render_stars, RatingError},
    BookApi,
};

pub const LOADING_TEXT: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    Loading,
    Failed { message: String },
    Book(BookView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookView {
    pub title: String,
    pub author: String,
    pub description: String,
    pub comments: Vec<CommentView>,
    pub form: FormView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub id: CommentId,
    pub username: String,
    pub comment: String,
    pub stars: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub comment: String,
    pub star_glyphs: String,
    pub selected_rating: Option<u8>,
    pub validation_message: Option<String>,
    pub server_message: Option<String>,
}

impl FormView {
    fn of(form: &CommentForm) -> Self {
        Self {
            comment: form.comment().to_string(),
            star_glyphs: form.stars().glyphs(),
            selected_rating: form.rating(),
            validation_message: form.validation_message().map(str::to_string),
            server_message: form.server_message().map(str::to_string),
        }
    }
}

pub struct BookPage {
    api: Arc<dyn BookApi>,
    session: SessionContext,
    book_id: Option<BookId>,
    loader: BookLoader,
    form: CommentForm,
}

impl BookPage {
    pub fn new(api: Arc<dyn BookApi>, session: SessionContext) -> Self {
        Self {
            api,
            session,
            book_id: None,
            loader: BookLoader::new(),
            form: CommentForm::new(),
        }
    }

    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.form = self.form.with_login_delay(delay);
        self
    }

    pub fn book_id(&self) -> Option<BookId> {
        self.book_id
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn loader(&self) -> &BookLoader {
        &self.loader
    }

    pub fn form(&self) -> &CommentForm {
        &self.form
    }

    /// Mounts the page on `book_id` and fetches it.
    pub async fn mount(&mut self, book_id: BookId) -> &LoadState {
        self.book_id = Some(book_id);
        self.refetch().await;
        self.loader.state()
    }

    /// Follows a route change; fetches only when the identifier actually changed.
    pub async fn set_book(&mut self, book_id: BookId) {
        if self.book_id == Some(book_id) {
            debug!(%book_id, "route unchanged; keeping loaded book");
            return;
        }
        self.mount(book_id).await;
    }

    /// Swaps the injected identity; a different token refetches the book.
    pub async fn set_session(&mut self, session: SessionContext) {
        let token_changed = self.session.token() != session.token();
        self.session = session;
        if token_changed && self.book_id.is_some() {
            info!("session token changed; refetching book");
            self.refetch().await;
        }
    }

    pub async fn refetch(&mut self) {
        let Some(book_id) = self.book_id else {
            return;
        };
        self.loader
            .load(self.api.as_ref(), book_id, self.session.token())
            .await;
    }

    pub fn edit_comment(&mut self, comment: impl Into<String>) {
        self.form.set_comment(comment);
    }

    pub fn click_star(&mut self, position: u8) -> Result<Option<u8>, RatingError> {
        self.form.click_star(position)
    }

    /// Submits the draft; a posted comment triggers a refetch of the book.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(book_id) = self.book_id else {
            debug!("submit ignored; no book mounted");
            return SubmitOutcome::NotMounted;
        };
        let outcome = self
            .form
            .submit(self.api.as_ref(), &self.session, book_id)
            .await;
        if outcome == SubmitOutcome::Posted {
            self.refetch().await;
        }
        outcome
    }

    /// Fails when the server handed back a rating outside 1..=5.
    pub fn view(&self) -> Result<PageView, RatingError> {
        match self.loader.state() {
            LoadState::Idle | LoadState::Loading => Ok(PageView::Loading),
            LoadState::Failed(failure) => Ok(PageView::Failed {
                message: failure.message.clone(),
            }),
            LoadState::Loaded(book) => {
                let comments = book
                    .comments
                    .iter()
                    .map(|c| {
                        Ok(CommentView {
                            id: c.id,
                            username: c.username.clone(),
                            comment: c.comment.clone(),
                            stars: render_stars(c.rating)?,
                        })
                    })
                    .collect::<Result<Vec<_>, RatingError>>()?;
                Ok(PageView::Book(BookView {
                    title: book.title.clone(),
                    author: book.author.clone(),
                    description: book.description.clone(),
                    comments,
                    form: FormView::of(&self.form),
                }))
            }
        }
    }
}

pub fn render_text(view: &PageView) -> String {
    let mut out = String::new();
    match view {
        PageView::Loading => out.push_str(LOADING_TEXT),
        PageView::Failed { message } => out.push_str(message),
        PageView::Book(book) => {
            let _ = writeln!(out, "{}", book.title);
            let _ = writeln!(out, "  {}", book.author);
            if !book.description.is_empty() {
                let _ = writeln!(out);
                let _ = writeln!(out, "{}", book.description);
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "Comments");
            for comment in &book.comments {
                let _ = writeln!(out, "  User: {}", comment.username);
                let _ = writeln!(out, "  Comment: {}", comment.comment);
                let _ = writeln!(out, "  Rating: {}", comment.stars);
                let _ = writeln!(out);
            }
            let form = &book.form;
            if !form.comment.is_empty() || form.validation_message.is_some() {
                let _ = writeln!(out, "Draft: {}", form.comment);
                let _ = writeln!(out, "Rating: {}", form.star_glyphs);
            }
            if let Some(message) = &form.validation_message {
                let _ = writeln!(out, "! {message}");
            }
            if let Some(message) = &form.server_message {
                let _ = writeln!(out, "! {message}");
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
