//! Command-line interface for the console client.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OpenOutcome};
use crate::config::{Config, ConfigStore};
use crate::pages::admin::{self, NewsFormIntent, NewsFormReducer, NewsFormState};
use crate::pages::contacts::{self, ContactFormIntent, ContactFormReducer, ContactFormState};
use crate::pages::Reducer;
use crate::routes::{AdminSection, Route};

#[derive(Parser)]
#[command(
    name = "matchday",
    version,
    about = "Console client for the football club website API"
)]
pub struct Cli {
    /// Path to the configuration file (default: platform config dir).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL from configuration.
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a page by its route path (e.g. /news or /admin/coaches).
    Open {
        #[arg(value_name = "PATH")]
        path: String,

        /// Sign in as this user before opening.
        #[arg(long = "as-user", value_name = "ID")]
        as_user: Option<i64>,
    },

    /// List every known route.
    Routes,

    /// Delete a record from an admin section.
    Delete {
        /// Section slug (players, coaches, matches, news, media,
        /// history, standings, messages).
        #[arg(value_parser = parse_section)]
        section: AdminSection,

        id: i64,

        /// Admin user to act as.
        #[arg(long = "as-user", value_name = "ID")]
        as_user: i64,
    },

    /// Create a news article.
    AddNews {
        #[arg(long)]
        title: String,

        #[arg(long)]
        category: String,

        /// Publication date, e.g. 2024-05-01.
        #[arg(long)]
        date: String,

        #[arg(long)]
        text: Option<String>,

        /// Admin user to act as.
        #[arg(long = "as-user", value_name = "ID")]
        as_user: i64,
    },

    /// Send a message through the contact form.
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        text: String,
    },
}

fn parse_section(value: &str) -> Result<AdminSection, String> {
    AdminSection::from_slug(value).ok_or_else(|| {
        format!(
            "unknown section '{value}' (expected one of: {})",
            AdminSection::ALL
                .iter()
                .map(|s| s.slug())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&path).context("loading configuration")?;
    if let Some(base_url) = cli.base_url.clone() {
        config.api.base_url = base_url;
        config.validate().context("applying --base-url")?;
    }
    let app = AppContext::new(ConfigStore::new(config, path));

    match cli.command {
        Command::Open { path, as_user } => {
            let route = match Route::parse(&path) {
                Ok(route) => route,
                Err(err) => bail!("{err}; run 'matchday routes' for the list"),
            };
            resolve_session(&app, as_user).await;

            let outcome = app.open(route).await;
            print_outcome(&outcome);
            if let OpenOutcome::Redirect(target) = outcome {
                print_outcome(&app.open(target).await);
            }
            print_toasts(&app);
            Ok(())
        }

        Command::Routes => {
            for route in Route::navigation() {
                println!("{:<18} {}", route.path(), route.title());
            }
            Ok(())
        }

        Command::Delete {
            section,
            id,
            as_user,
        } => {
            resolve_session(&app, Some(as_user)).await;
            ensure_admin(&app)?;

            let mutation = admin::delete_mutation(app.api(), app.queries(), app.toasts(), section);
            let result = mutation.mutate(id).await;
            print_toasts(&app);
            result?;
            Ok(())
        }

        Command::AddNews {
            title,
            category,
            date,
            text,
            as_user,
        } => {
            resolve_session(&app, Some(as_user)).await;
            ensure_admin(&app)?;

            let state = NewsFormState::default();
            let state = NewsFormReducer::reduce(state, NewsFormIntent::SetTitle(title));
            let state = NewsFormReducer::reduce(state, NewsFormIntent::SetCategory(category));
            let state = NewsFormReducer::reduce(state, NewsFormIntent::SetDate(date));
            let state =
                NewsFormReducer::reduce(state, NewsFormIntent::SetText(text.unwrap_or_default()));
            let draft = match state.draft() {
                Ok(draft) => draft,
                Err(message) => bail!("{message}"),
            };

            let mutation = admin::create_news_mutation(app.api(), app.queries(), app.toasts());
            match mutation.mutate(draft).await {
                Ok(news) => {
                    print_toasts(&app);
                    println!("Создана новость #{}", news.id);
                    Ok(())
                }
                Err(err) => {
                    let state =
                        NewsFormReducer::reduce(state, NewsFormIntent::SaveFailed(err.to_string()));
                    for line in state.render() {
                        println!("{line}");
                    }
                    print_toasts(&app);
                    Err(err.into())
                }
            }
        }

        Command::Contact { name, email, text } => {
            app.start_anonymous();

            let state = ContactFormState::default();
            let state = ContactFormReducer::reduce(state, ContactFormIntent::SetName(name));
            let state = ContactFormReducer::reduce(state, ContactFormIntent::SetEmail(email));
            let state = ContactFormReducer::reduce(state, ContactFormIntent::SetText(text));
            let draft = match state.draft() {
                Ok(draft) => draft,
                Err(message) => bail!("{message}"),
            };

            let mutation = contacts::send_mutation(app.api(), app.queries(), app.toasts());
            let state = match mutation.mutate(draft).await {
                Ok(_) => ContactFormReducer::reduce(state, ContactFormIntent::Sent),
                Err(err) => {
                    ContactFormReducer::reduce(state, ContactFormIntent::SendFailed(err.to_string()))
                }
            };
            for line in state.render() {
                println!("{line}");
            }
            print_toasts(&app);
            Ok(())
        }
    }
}

/// Sign in with the explicit user, the configured one, or anonymously.
async fn resolve_session(app: &AppContext, as_user: Option<i64>) {
    let configured = app.config().get().session.restore_user_id;
    match as_user.or(configured) {
        Some(id) => app.restore_session(id).await,
        None => app.start_anonymous(),
    }
}

fn ensure_admin(app: &AppContext) -> anyhow::Result<()> {
    if !app.session().current().is_admin() {
        bail!("команда доступна только администраторам");
    }
    Ok(())
}

fn print_outcome(outcome: &OpenOutcome) {
    match outcome {
        OpenOutcome::Page { title, lines } => {
            println!("== {title} ==");
            for line in lines {
                println!("{line}");
            }
        }
        OpenOutcome::Redirect(route) => println!("-> {route}"),
        OpenOutcome::Denied => println!("Доступ запрещен"),
        OpenOutcome::SessionLoading => println!("Загрузка сессии..."),
    }
}

fn print_toasts(app: &AppContext) {
    for toast in app.take_toasts() {
        println!("[{}] {}", toast.kind, toast.message);
    }
}
