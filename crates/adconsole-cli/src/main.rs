//! adconsole: terminal console for the screensaver ad platform.
//!
//! Set ADCONSOLE_API_URL (or API_URL) to point at the backend.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use adconsole_api_client::ApiClient;
use adconsole_cli::pages::{
    AssetDetailPage, AssetListPage, DetailOptions, TemplateUploadForm, UploadForm,
};
use adconsole_cli::{init_tracing, Route, ViewMode, ViewState};
use adconsole_core::{AssetId, AssetStatus, ConsoleConfig};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "adconsole", about = "Screensaver ad platform console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a console route: /, /asset/<id>, /upload or /upload-template
    Open {
        path: String,
        /// File for the upload routes
        #[arg(long)]
        file: Option<PathBuf>,
        /// Asset display name or template name for the upload routes
        #[arg(long)]
        name: Option<String>,
        /// Keep refreshing a detail page until processing finishes
        #[arg(long)]
        watch: bool,
    },
    /// List all assets
    List {
        #[arg(long, value_enum, default_value_t = ViewMode::Grid)]
        view: ViewMode,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show one asset with its links and preview
    Show {
        id: String,
        /// Keep refreshing until processing finishes (Ctrl-C to stop)
        #[arg(long)]
        watch: bool,
        /// Poll interval in milliseconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,
        /// Template to preview next to the output
        #[arg(long)]
        template: Option<String>,
        /// Presigned URL expiration in minutes
        #[arg(long)]
        expiration: Option<u32>,
    },
    /// Upload an image or video asset
    Upload {
        file: Option<PathBuf>,
        /// Name to register instead of the file name
        #[arg(long)]
        name: Option<String>,
    },
    /// Upload a named video template
    UploadTemplate {
        #[arg(long)]
        name: Option<String>,
        file: Option<PathBuf>,
    },
    /// List templates
    Templates,
    /// Set an asset's processing status
    SetStatus { id: String, status: AssetStatus },
    /// Delete an asset
    Delete { id: String },
    /// Get the presigned URL of an asset's original upload
    Url {
        id: String,
        /// Expiration in minutes
        #[arg(long)]
        expiration: Option<u32>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn parse_id(id: &str) -> anyhow::Result<AssetId> {
    AssetId::parse(id).context("Asset id must not be empty")
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let config = ConsoleConfig::from_env().context("Failed to load configuration")?;
    let client = ApiClient::from_config(&config).context(
        "Failed to create API client. Check ADCONSOLE_API_URL (or API_URL)",
    )?;
    tracing::debug!(api_url = %client.base_url(), "Console starting");

    match cli.command {
        Commands::Open {
            path,
            file,
            name,
            watch,
        } => {
            let route = Route::parse(&path)?;
            match route {
                Route::AssetList => run_list(&client, ViewMode::Grid, OutputFormat::Table).await,
                Route::AssetDetail(id) => {
                    run_show(&client, id, detail_options(&config, None, None, None), watch).await
                }
                Route::Upload => run_upload(&client, &config, file, name).await,
                Route::TemplateUpload => run_upload_template(&client, name, file).await,
            }
        }
        Commands::List { view, format } => run_list(&client, view, format).await,
        Commands::Show {
            id,
            watch,
            interval_ms,
            template,
            expiration,
        } => {
            let options = detail_options(&config, interval_ms, template, expiration);
            run_show(&client, parse_id(&id)?, options, watch).await
        }
        Commands::Upload { file, name } => run_upload(&client, &config, file, name).await,
        Commands::UploadTemplate { name, file } => run_upload_template(&client, name, file).await,
        Commands::Templates => {
            let templates = client.list_templates().await?;
            print_json(&templates)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::SetStatus { id, status } => {
            let asset = client.update_asset_status(&parse_id(&id)?, status).await?;
            print_json(&asset)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Delete { id } => {
            let id = parse_id(&id)?;
            let confirmation = client.delete_asset(&id).await?;
            let message = confirmation
                .message
                .unwrap_or_else(|| format!("Asset {} deleted", id));
            print_json(&serde_json::json!({ "success": true, "message": message }))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Url { id, expiration } => {
            let minutes = expiration.unwrap_or(config.url_expiration_minutes);
            let url = client.get_presigned_url(&parse_id(&id)?, minutes).await?;
            print_json(&url)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn detail_options(
    config: &ConsoleConfig,
    interval_ms: Option<u64>,
    template: Option<String>,
    expiration: Option<u32>,
) -> DetailOptions {
    DetailOptions {
        poll_interval: interval_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| config.poll_interval()),
        url_expiration_minutes: expiration.unwrap_or(config.url_expiration_minutes),
        template,
    }
}

async fn run_list(
    client: &ApiClient,
    view: ViewMode,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let mut page = AssetListPage::new(view);
    page.load(client).await;

    match (format, page.state()) {
        (OutputFormat::Json, ViewState::Ready(listing)) => print_json(listing)?,
        (OutputFormat::Json, ViewState::Empty) => print_json(&serde_json::json!([]))?,
        _ => println!("{}", page.render()),
    }
    Ok(exit_code(!page.state().is_error()))
}

async fn run_show(
    client: &ApiClient,
    id: AssetId,
    options: DetailOptions,
    watch: bool,
) -> anyhow::Result<ExitCode> {
    let mut page = AssetDetailPage::open(client.clone(), id, options).await;
    if watch {
        page.follow(|out| println!("{}\n", out)).await;
    } else {
        page.load().await;
        println!("{}", page.render());
    }

    let state = page.state();
    page.close();
    Ok(exit_code(state.asset.is_some() || state.error.is_none()))
}

async fn run_upload(
    client: &ApiClient,
    config: &ConsoleConfig,
    file: Option<PathBuf>,
    name: Option<String>,
) -> anyhow::Result<ExitCode> {
    let mut form = UploadForm::new();
    form.set_name(name);
    if let Some(path) = file {
        if form.select_path(&path).is_err() {
            println!("{}", form.render());
            return Ok(ExitCode::FAILURE);
        }
    }

    match form.submit(client).await {
        Ok(Route::AssetDetail(id)) => {
            println!("Upload complete, opening /asset/{}\n", id);
            run_show(client, id, detail_options(config, None, None, None), false).await
        }
        Ok(route) => {
            println!("Upload complete, opening {}", route);
            Ok(ExitCode::SUCCESS)
        }
        Err(_) => {
            println!("{}", form.render());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_upload_template(
    client: &ApiClient,
    name: Option<String>,
    file: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let mut form = TemplateUploadForm::new();
    if let Some(name) = name {
        form.set_name(name);
    }
    if let Some(path) = file {
        if form.select_path(&path).is_err() {
            println!("{}", form.render());
            return Ok(ExitCode::FAILURE);
        }
    }

    let ok = form.submit(client).await.is_ok();
    println!("{}", form.render());
    Ok(exit_code(ok))
}
