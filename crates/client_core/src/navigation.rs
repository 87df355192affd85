use std::fmt;

use shared::domain::BookId;
use tracing::info;

use crate::comment_form::LoginNotice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/books/{index}`
    Book(BookId),
    /// `/login`
    Login,
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed == "/login" {
            return Some(Self::Login);
        }
        let index = trimmed.strip_prefix("/books/")?;
        index.parse().ok().map(Self::Book)
    }

    pub fn path(&self) -> String {
        match self {
            Self::Book(book_id) => format!("/books/{book_id}"),
            Self::Login => "/login".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Waits out the notice and then sends the user to the notice's redirect target.
pub async fn follow_login_redirect(notice: &LoginNotice, navigator: &dyn Navigator) {
    tokio::time::sleep(notice.delay).await;
    info!(route = %notice.redirect, "redirecting after login notice");
    navigator.navigate(notice.redirect);
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use super::*;

    #[derive(Default)]
    struct RecordingNavigator {
        visited: Arc<Mutex<Vec<Route>>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.visited.lock().expect("lock").push(route);
        }
    }

    #[test]
    fn parses_book_and_login_paths() {
        assert_eq!(Route::parse("/books/17"), Some(Route::Book(BookId(17))));
        assert_eq!(Route::parse("/books/17/"), Some(Route::Book(BookId(17))));
        assert_eq!(Route::parse("/login"), Some(Route::Login));
        assert_eq!(Route::parse("/books/abc"), None);
        assert_eq!(Route::parse("/authors/3"), None);
        assert_eq!(Route::Book(BookId(5)).to_string(), "/books/5");
    }

    #[tokio::test(start_paused = true)]
    async fn redirect_waits_for_the_notice_delay() {
        let navigator = RecordingNavigator::default();
        let visited = navigator.visited.clone();
        let notice = LoginNotice::new(Duration::from_secs(3));

        let started = tokio::time::Instant::now();
        follow_login_redirect(&notice, &navigator).await;

        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(*visited.lock().expect("lock"), vec![Route::Login]);
    }
}
