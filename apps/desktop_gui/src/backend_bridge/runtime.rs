//! Backend worker: owns the book page on its own tokio runtime and reports back over `UiEvent`s.

use std::{sync::Arc, thread};

use client_core::{
    follow_login_redirect, BookPage, ClientSettings, HttpBookApi, Navigator, PageView, Route,
    SessionContext, SessionStore, SubmitOutcome,
};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Routes page navigation back onto the UI thread.
struct ChannelNavigator {
    ui_tx: Sender<UiEvent>,
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        let _ = self.ui_tx.try_send(UiEvent::Navigate(route));
    }
}

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(run_worker(cmd_rx, ui_tx, settings));
    });
}

async fn run_worker(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: ClientSettings,
) {
    let store = SessionStore::new(&settings.session_path);
    let session = match store.load() {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!("starting anonymous, session store unreadable: {err}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                err.to_string(),
            )));
            SessionContext::anonymous()
        }
    };
    let api = match HttpBookApi::new(&settings.server_url) {
        Ok(api) => api,
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("backend worker startup failure: invalid server url: {err}"),
            )));
            tracing::error!(server_url = %settings.server_url, "invalid server url: {err}");
            return;
        }
    };
    let mut page =
        BookPage::new(Arc::new(api), session).with_login_delay(settings.login_redirect_delay());
    let navigator: Arc<dyn Navigator> = Arc::new(ChannelNavigator {
        ui_tx: ui_tx.clone(),
    });
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::OpenBook { book_id } => {
                let _ = ui_tx.try_send(UiEvent::PageUpdated(PageView::Loading));
                page.mount(book_id).await;
                publish_view(&page, &ui_tx);
            }
            BackendCommand::EditComment { text } => page.edit_comment(text),
            BackendCommand::ClickStar { position } => match page.click_star(position) {
                Ok(_) => publish_view(&page, &ui_tx),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::ClickStar,
                        err.to_string(),
                    )));
                }
            },
            BackendCommand::SubmitComment => {
                let outcome = page.submit().await;
                if let SubmitOutcome::LoginRequired(notice) = outcome {
                    let _ = ui_tx.try_send(UiEvent::LoginNotice(notice.clone()));
                    let navigator = navigator.clone();
                    tokio::spawn(async move {
                        follow_login_redirect(&notice, navigator.as_ref()).await;
                    });
                }
                publish_view(&page, &ui_tx);
            }
            BackendCommand::SignIn { token, user_id } => {
                let session = SessionContext::new(Some(token), Some(user_id));
                if let Err(err) = store.save(&session) {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::SignIn,
                        err.to_string(),
                    )));
                    continue;
                }
                tracing::info!(%user_id, "session stored from login view");
                let _ = ui_tx.try_send(UiEvent::SignedIn);
                let _ = ui_tx.try_send(UiEvent::PageUpdated(PageView::Loading));
                page.set_session(session).await;
                if let Some(book_id) = page.book_id() {
                    let _ = ui_tx.try_send(UiEvent::Navigate(Route::Book(book_id)));
                }
                publish_view(&page, &ui_tx);
            }
        }
    }
    tracing::info!("ui command channel closed; backend worker exiting");
}

fn publish_view(page: &BookPage, ui_tx: &Sender<UiEvent>) {
    let event = match page.view() {
        Ok(view) => UiEvent::PageUpdated(view),
        Err(err) => {
            tracing::error!("book page could not be rendered: {err}");
            UiEvent::Error(UiError::from_message(UiErrorContext::RenderPage, err.to_string()))
        }
    };
    let _ = ui_tx.try_send(event);
}
