//! Backend commands queued from UI to backend worker.

use shared::domain::{BookId, UserId};

pub enum BackendCommand {
    OpenBook { book_id: BookId },
    EditComment { text: String },
    ClickStar { position: u8 },
    SubmitComment,
    SignIn { token: String, user_id: UserId },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenBook { .. } => "open_book",
            Self::EditComment { .. } => "edit_comment",
            Self::ClickStar { .. } => "click_star",
            Self::SubmitComment => "submit_comment",
            Self::SignIn { .. } => "sign_in",
        }
    }
}
