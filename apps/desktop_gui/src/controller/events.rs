//! UI/backend events and error modeling for the book page window.

use client_core::{LoginNotice, PageView, Route};

pub enum UiEvent {
    Info(String),
    PageUpdated(PageView),
    LoginNotice(LoginNotice),
    Navigate(Route),
    SignedIn,
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Storage,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    RenderPage,
    ClickStar,
    SignIn,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("rating should be")
            || message_lower.contains("invalid")
            || message_lower.contains("must be")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("session store")
            || message_lower.contains("directory")
            || message_lower.contains("permission")
        {
            UiErrorCategory::Storage
        } else if message_lower.contains("network")
            || message_lower.contains("connection")
            || message_lower.contains("url")
            || message_lower.contains("runtime")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_rating_and_storage_failures() {
        let rating = UiError::from_message(
            UiErrorContext::RenderPage,
            "Rating should be between 1 and 5, got 6.",
        );
        assert_eq!(rating.category(), UiErrorCategory::Validation);
        assert_eq!(rating.context(), UiErrorContext::RenderPage);

        let storage = UiError::from_message(
            UiErrorContext::SignIn,
            "failed to write session store '/x': Permission denied",
        );
        assert_eq!(storage.category(), UiErrorCategory::Storage);

        let other = UiError::from_message(UiErrorContext::BackendStartup, "something odd");
        assert_eq!(other.category(), UiErrorCategory::Unknown);
        assert_eq!(other.message(), "something odd");
    }
}
