// Framework bootstrap for the dashboard command line client.

use crate::domain::records::{InvoiceStatus, SettingsUpdate};
use crate::domain::{ApiError, Location, Route, SessionIdentity};
use crate::frameworks::config;
use crate::interface_adapters::browser::InMemoryBrowser;
use crate::interface_adapters::clients::BackendClient;
use crate::interface_adapters::views;
use crate::use_cases::{
    GuardRender, LoginUseCase, LogoutUseCase, NavigationFlow, PageData, Screen, export_workflow,
    filter_invoices, load_page, parse_status_filter, save_settings, trigger_workflow,
};

use clap::{Parser, Subcommand};
use std::io::{Error, Result};
use std::path::PathBuf;
use url::Url;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "InvoiceSync dashboard client")]
#[command(version)]
pub struct Cli {
    /// Backend base URL (without the /api suffix)
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a page the way the browser would, callback fragments included
    Open {
        /// Full application URL, e.g. http://localhost:3000/dashboard#session_id=...
        href: String,

        /// Run the invoice workflow once the dashboard is shown
        #[arg(long)]
        trigger_workflow: bool,

        /// Sign out after rendering
        #[arg(long)]
        logout: bool,

        /// Invoice list: keep invoices whose number or email subject contains this
        #[arg(long, default_value = "")]
        search: String,

        /// Invoice list: status to keep
        #[arg(
            long,
            default_value = "all",
            value_parser = ["all", "not_updated", "matched", "not_matched", "downloaded"]
        )]
        status: String,
    },

    /// Print the identity provider URL for signing in from the given page
    Login {
        /// Application URL the login starts from
        href: String,
    },

    /// Show or update the Google integration settings
    Settings {
        /// Application URL carrying the session (callback fragments included)
        href: String,

        /// Google Sheet holding the invoice numbers
        #[arg(long)]
        sheet_url: Option<String>,

        /// Google Drive folder for downloaded attachments
        #[arg(long)]
        folder_id: Option<String>,
    },

    /// Workflow tools
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommand,
    },
}

#[derive(Subcommand)]
pub enum WorkflowCommand {
    /// Write the n8n workflow JSON built from your settings
    Export {
        /// Application URL carrying the session (callback fragments included)
        href: String,

        /// Output file; `-` writes to stdout
        #[arg(long, default_value = "invoice-workflow.json")]
        out: PathBuf,
    },
}

// Options of `open` that shape the protected page.
struct OpenOptions {
    trigger_workflow: bool,
    logout: bool,
    search: String,
    status: String,
}

type Settled = Screen<(Route, SessionIdentity)>;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Stdout carries the rendered pages.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();
    let cli = Cli::parse();
    run(cli).await
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Open {
            href,
            trigger_workflow,
            logout,
            search,
            status,
        } => {
            let backend = build_backend(cli.backend_url)?;
            let options = OpenOptions {
                trigger_workflow,
                logout,
                search,
                status,
            };
            open(backend, &href, options).await
        }
        Commands::Login { href } => {
            let provider = Url::parse(&config::auth_provider_url())
                .map_err(|e| Error::other(format!("invalid AUTH_PROVIDER_URL: {e}")))?;
            let browser = InMemoryBrowser::open(parse_location(&href)?);
            let url = LoginUseCase {
                navigator: browser,
                provider,
            }
            .execute();
            println!("{url}");
            Ok(())
        }
        Commands::Settings {
            href,
            sheet_url,
            folder_id,
        } => {
            let backend = build_backend(cli.backend_url)?;
            let update = SettingsUpdate {
                google_sheet_url: sheet_url,
                google_drive_folder_id: folder_id,
            };
            settings(backend, &href, update).await
        }
        Commands::Workflow {
            command: WorkflowCommand::Export { href, out },
        } => {
            let backend = build_backend(cli.backend_url)?;
            export(backend, &href, out).await
        }
    }
}

fn build_backend(backend_url: Option<String>) -> Result<BackendClient> {
    let backend_url = backend_url.unwrap_or_else(config::backend_url);
    let timeout = config::request_timeout();
    let backend = BackendClient::new(backend_url.clone(), timeout)
        .map_err(|e| Error::other(format!("failed to initialize backend client: {e}")))?;
    tracing::debug!(
        backend_url = %backend_url,
        request_timeout_ms = timeout.as_millis(),
        "backend client configured"
    );
    Ok(backend)
}

fn parse_location(href: &str) -> Result<Location> {
    Location::parse(href).map_err(|e| Error::other(format!("invalid url {href}: {e}")))
}

async fn settle(flow: &NavigationFlow<BackendClient, InMemoryBrowser>) -> Result<Settled> {
    flow.settle(&|route: Route, identity: &SessionIdentity| (route, identity.clone()))
        .await
        .map_err(Error::other)
}

fn verified(screen: &Settled) -> Option<(Route, SessionIdentity)> {
    match screen {
        Screen::Protected {
            render: GuardRender::Content((route, identity)),
            ..
        } => Some((*route, identity.clone())),
        _ => None,
    }
}

// Settle the page load and insist on a verified session.
async fn require_session(
    backend: &BackendClient,
    href: &str,
) -> Result<(InMemoryBrowser, SessionIdentity)> {
    let browser = InMemoryBrowser::open(parse_location(href)?);
    let flow = NavigationFlow::new(backend.clone(), browser.clone());
    let screen = settle(&flow).await?;
    match verified(&screen) {
        Some((_, identity)) => Ok((browser, identity)),
        None => {
            if let Some(text) = views::render_screen(&screen, |_| String::new()) {
                println!("{text}");
            }
            Err(Error::other(format!(
                "no active session at {}",
                browser.location()
            )))
        }
    }
}

async fn open(backend: BackendClient, href: &str, options: OpenOptions) -> Result<()> {
    let status = parse_status_filter(&options.status).map_err(Error::other)?;
    let browser = InMemoryBrowser::open(parse_location(href)?);
    let flow = NavigationFlow::new(backend.clone(), browser.clone());

    let mut screen = settle(&flow).await?;
    let mut notice = String::new();
    if options.trigger_workflow && verified(&screen).is_some() {
        let before = browser.location();
        match trigger_workflow(&backend, &browser).await {
            Ok(result) => notice.push_str(&views::render_trigger_result(&result)),
            Err(err) => notice.push_str(&format!("Workflow failed: {}\n", api_error_text(&err))),
        }
        // A missing sheet sends the user to the settings page.
        if browser.location() != before {
            screen = settle(&flow).await?;
        }
    }
    tracing::info!(location = %browser.location(), "navigation settled");

    let page = match verified(&screen) {
        Some((route, identity)) => {
            let mut body = notice;
            body.push_str(&page_body(&backend, route, &options.search, status).await);
            Some(views::render_layout(route, &identity, &body))
        }
        None => None,
    };
    if let Some(text) = views::render_screen(&screen, |_| page.clone().unwrap_or_default()) {
        println!("{text}");
    }

    if options.logout && page.is_some() {
        let response = LogoutUseCase {
            api: backend,
            navigator: browser.clone(),
        }
        .execute()
        .await;
        tracing::info!(revoked = response.revoked, "signed out");
        println!("{}", views::render_landing());
    }
    Ok(())
}

async fn page_body(
    backend: &BackendClient,
    route: Route,
    search: &str,
    status: Option<InvoiceStatus>,
) -> String {
    match load_page(backend, route).await {
        Ok(PageData::Invoices { invoices, stats }) => views::render_page(&PageData::Invoices {
            invoices: filter_invoices(&invoices, search, status),
            stats,
        }),
        Ok(data) => views::render_page(&data),
        Err(err) => {
            tracing::warn!(error = %err, %route, "page data failed to load");
            format!("Failed to load {}: {}\n", route.label(), api_error_text(&err))
        }
    }
}

async fn settings(backend: BackendClient, href: &str, update: SettingsUpdate) -> Result<()> {
    let (_browser, identity) = require_session(&backend, href).await?;
    let saved = save_settings(&backend, update)
        .await
        .map_err(|e| Error::other(format!("failed to save settings: {}", api_error_text(&e))))?;
    let body = views::render_page(&PageData::Settings(saved));
    println!("{}", views::render_layout(Route::Settings, &identity, &body));
    Ok(())
}

async fn export(backend: BackendClient, href: &str, out: PathBuf) -> Result<()> {
    require_session(&backend, href).await?;
    let document = export_workflow(&backend)
        .await
        .map_err(|e| Error::other(format!("failed to export workflow: {}", api_error_text(&e))))?;
    let pretty = serde_json::to_string_pretty(&document).map_err(Error::other)?;

    if out.as_os_str() == "-" {
        println!("{pretty}");
    } else {
        tokio::fs::write(&out, pretty).await?;
        tracing::info!(path = %out.display(), "workflow exported");
        println!("Wrote {}", out.display());
    }
    Ok(())
}

// Prefer the backend's own wording when it sent one.
fn api_error_text(err: &ApiError) -> String {
    match err {
        ApiError::Upstream {
            message: Some(message),
            ..
        } => message.clone(),
        other => other.to_string(),
    }
}
