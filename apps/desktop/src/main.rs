use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    follow_login_redirect, load_settings, render_text, BookPage, ClientSettings, HttpBookApi,
    Navigator, Route, SessionContext, SessionStore, SubmitOutcome,
};
use shared::domain::{BookId, UserId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "storycircle", about = "StoryCircle book page in the terminal")]
struct Cli {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    session_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a book and print its page.
    Show { book_id: i64 },
    /// Leave a rated comment on a book.
    Comment {
        book_id: i64,
        #[arg(long, default_value = "")]
        text: String,
        /// 1-5; omit to keep the default single star.
        #[arg(long)]
        rating: Option<u8>,
    },
    /// Store the token and user id the page reads.
    Login {
        #[arg(long)]
        token: String,
        #[arg(long)]
        user_id: i64,
    },
    Logout,
}

struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        println!("-> {route}");
        if route == Route::Login {
            println!("Run `storycircle login --token <token> --user-id <id>` to sign in.");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(session_path) = cli.session_path {
        settings.session_path = session_path;
    }
    let store = SessionStore::new(&settings.session_path);
    tracing::debug!(
        server_url = %settings.server_url,
        session_path = %settings.session_path.display(),
        "settings resolved"
    );

    match cli.command {
        Command::Login { token, user_id } => {
            store
                .save(&SessionContext::new(Some(token), Some(UserId(user_id))))
                .context("failed to save session")?;
            println!("Signed in as user_id={user_id}");
        }
        Command::Logout => {
            store.clear().context("failed to clear session")?;
            println!("Signed out");
        }
        Command::Show { book_id } => {
            let mut page = open_page(&store, &settings)?;
            page.mount(BookId(book_id)).await;
            print_page(&page)?;
        }
        Command::Comment {
            book_id,
            text,
            rating,
        } => {
            let mut page = open_page(&store, &settings)?;
            page.mount(BookId(book_id)).await;
            if page.loader().book().is_none() {
                print_page(&page)?;
                return Ok(());
            }

            page.edit_comment(text);
            if let Some(rating) = rating.filter(|r| Some(*r) != page.form().rating()) {
                page.click_star(rating)?;
            }

            match page.submit().await {
                SubmitOutcome::Posted => {
                    println!("Comment added.\n");
                    print_page(&page)?;
                }
                SubmitOutcome::LoginRequired(notice) => {
                    println!("{}: {}", notice.title, notice.text);
                    follow_login_redirect(&notice, &TerminalNavigator).await;
                }
                SubmitOutcome::Invalid | SubmitOutcome::Rejected => print_page(&page)?,
                SubmitOutcome::NotMounted | SubmitOutcome::NetworkFailed => {}
            }
        }
    }

    Ok(())
}

fn open_page(store: &SessionStore, settings: &ClientSettings) -> Result<BookPage> {
    let server_url = settings.server_url.as_str();
    let session = store
        .load()
        .with_context(|| format!("failed to read session from {}", store.path().display()))?;
    let api = HttpBookApi::new(server_url)
        .with_context(|| format!("invalid server url '{server_url}'"))?;
    Ok(BookPage::new(Arc::new(api), session).with_login_delay(settings.login_redirect_delay()))
}

fn print_page(page: &BookPage) -> Result<()> {
    let view = page.view().context("book page could not be rendered")?;
    println!("{}", render_text(&view));
    Ok(())
}
