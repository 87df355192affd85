use std::time::{Duration, Instant};

use client_core::{BookView, LoginNotice, PageView, Route};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{BookId, UserId, MAX_RATING, MIN_RATING};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(0xd9, 0x3f, 0x3f);

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub book_id: BookId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppViewState {
    Book,
    Login,
}

struct ActiveNotice {
    notice: LoginNotice,
    shown_at: Instant,
}

impl ActiveNotice {
    fn expired(&self) -> bool {
        self.shown_at.elapsed() >= self.notice.delay
    }
}

#[derive(Default)]
struct LoginForm {
    token: String,
    user_id: String,
    error: Option<String>,
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Validation => "Invalid data",
        UiErrorCategory::Storage => "Session storage",
        UiErrorCategory::Unknown => "Error",
    }
}

pub struct BookPageApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    book_id: BookId,
    view_state: AppViewState,
    page: PageView,
    draft: String,
    syncing_draft: bool,
    notice: Option<ActiveNotice>,
    login_form: LoginForm,
    status: String,
    status_banner: Option<UiError>,
}

impl BookPageApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            book_id: startup.book_id,
            view_state: AppViewState::Book,
            page: PageView::Loading,
            draft: String::new(),
            syncing_draft: false,
            notice: None,
            login_form: LoginForm::default(),
            status: "Starting".to_string(),
            status_banner: None,
        };
        app.dispatch(BackendCommand::OpenBook {
            book_id: startup.book_id,
        });
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::PageUpdated(view) => {
                    if self.syncing_draft {
                        if let PageView::Book(book) = &view {
                            self.draft = book.form.comment.clone();
                            self.syncing_draft = false;
                        }
                    }
                    self.page = view;
                }
                UiEvent::LoginNotice(notice) => {
                    self.notice = Some(ActiveNotice {
                        notice,
                        shown_at: Instant::now(),
                    });
                }
                UiEvent::Navigate(route) => {
                    self.notice = None;
                    self.status = format!("Navigated to {route}");
                    match route {
                        Route::Login => self.view_state = AppViewState::Login,
                        Route::Book(book_id) => {
                            self.view_state = AppViewState::Book;
                            if book_id != self.book_id {
                                self.book_id = book_id;
                                self.dispatch(BackendCommand::OpenBook { book_id });
                            }
                        }
                    }
                }
                UiEvent::SignedIn => {
                    self.login_form = LoginForm::default();
                    self.status = "Signed in".to_string();
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    self.status_banner = Some(err);
                }
            }
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = &self.status_banner else {
            return;
        };
        let mut dismiss = false;
        egui::Frame::NONE
            .fill(ERROR_RED.gamma_multiply(0.25))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 6))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(err_label(banner.category())).strong());
                    ui.label(banner.message());
                    if ui.button("Dismiss").clicked() {
                        dismiss = true;
                    }
                });
            });
        if dismiss {
            self.status_banner = None;
        }
    }

    fn show_book_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            egui::ScrollArea::vertical().show(ui, |ui| match self.page.clone() {
                PageView::Loading => {
                    ui.label(client_core::page::LOADING_TEXT);
                }
                PageView::Failed { message } => {
                    ui.colored_label(ERROR_RED, message);
                }
                PageView::Book(book) => self.show_book(ui, &book),
            });
        });
    }

    fn show_book(&mut self, ui: &mut egui::Ui, book: &BookView) {
        ui.heading(egui::RichText::new(&book.title).size(32.0));
        ui.label(egui::RichText::new(&book.author).size(24.0).strong());
        ui.label(egui::RichText::new(&book.description).size(16.0));
        ui.separator();

        ui.heading("Comments");
        for comment in &book.comments {
            egui::Frame::NONE
                .inner_margin(egui::Margin::symmetric(8, 4))
                .show(ui, |ui| {
                    ui.label(format!("User: {}", comment.username));
                    ui.label(format!("Comment: {}", comment.comment));
                    ui.label(format!("Rating: {}", comment.stars));
                });
        }
        ui.separator();

        ui.label(egui::RichText::new("Comment").strong());
        let edit = ui.add(
            egui::TextEdit::singleline(&mut self.draft)
                .hint_text("Share what you thought")
                .desired_width(420.0),
        );
        if edit.changed() {
            let text = self.draft.clone();
            self.dispatch(BackendCommand::EditComment { text });
        }

        ui.label(egui::RichText::new("Rating").strong());
        ui.horizontal(|ui| {
            let glyphs: Vec<char> = book.form.star_glyphs.chars().collect();
            for (position, glyph) in (MIN_RATING..=MAX_RATING).zip(glyphs) {
                let star = ui
                    .add(
                        egui::Label::new(egui::RichText::new(glyph.to_string()).size(24.0))
                            .sense(egui::Sense::click()),
                    )
                    .on_hover_cursor(egui::CursorIcon::PointingHand);
                if star.clicked() {
                    self.dispatch(BackendCommand::ClickStar { position });
                }
            }
        });

        if ui.button("Add comment").clicked() {
            self.syncing_draft = true;
            self.dispatch(BackendCommand::SubmitComment);
        }
        if let Some(message) = &book.form.validation_message {
            ui.colored_label(ERROR_RED, message);
        }
        if let Some(message) = &book.form.server_message {
            ui.colored_label(ERROR_RED, message);
        }
        ui.add_space(8.0);
        ui.small(egui::RichText::new(&self.status).weak());
    }

    fn show_login_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            ui.vertical_centered(|ui| {
                ui.set_width(420.0);
                ui.heading("Sign in");
                ui.weak("Paste the token and user id issued by StoryCircle.");
                ui.add_space(8.0);

                ui.label(egui::RichText::new("Token").strong());
                ui.add(egui::TextEdit::singleline(&mut self.login_form.token).password(true));
                ui.label(egui::RichText::new("User id").strong());
                ui.add(egui::TextEdit::singleline(&mut self.login_form.user_id));

                if ui.button("Sign in").clicked() {
                    self.try_sign_in();
                }
                if ui.button("Back to book").clicked() {
                    self.view_state = AppViewState::Book;
                }
                if let Some(error) = &self.login_form.error {
                    ui.colored_label(ERROR_RED, error);
                }
            });
        });
    }

    fn try_sign_in(&mut self) {
        let token = self.login_form.token.trim().to_string();
        if token.is_empty() {
            self.login_form.error = Some("Token is required".to_string());
            return;
        }
        let user_id = match self.login_form.user_id.parse::<UserId>() {
            Ok(user_id) => user_id,
            Err(_) => {
                self.login_form.error = Some("User id must be a number".to_string());
                return;
            }
        };
        self.login_form.error = None;
        self.dispatch(BackendCommand::SignIn { token, user_id });
    }

    fn show_login_notice(&mut self, ctx: &egui::Context) {
        if self.notice.as_ref().is_some_and(ActiveNotice::expired) {
            self.notice = None;
        }
        let Some(active) = &self.notice else {
            return;
        };
        egui::Window::new(active.notice.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("⚠").size(28.0));
                ui.label(active.notice.text);
            });
    }
}

impl eframe::App for BookPageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        match self.view_state {
            AppViewState::Book => self.show_book_screen(ctx),
            AppViewState::Login => self.show_login_screen(ctx),
        }
        self.show_login_notice(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
