use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use directory_core::{config::load_settings, DirectoryController, HttpDirectorySource};
use shared::domain::FilterField;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "deputados", about = "Browse the federal deputies directory")]
struct Args {
    /// Substring of the deputy's name.
    #[arg(long, default_value = "")]
    name: String,
    /// Federative unit code, e.g. SP.
    #[arg(long = "uf", default_value = "")]
    region: String,
    /// Party code, e.g. PT.
    #[arg(long, default_value = "")]
    party: String,
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Settings file (defaults to ./directory.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also print the selectable region and party codes.
    #[arg(long)]
    parties: bool,
    /// Print the view model as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())?;
    info!(base_url = %settings.api_base_url, "deputados: using directory api");
    let source = HttpDirectorySource::from_settings(&settings)
        .context("failed to build directory http client")?;
    let controller = DirectoryController::new(Arc::new(source));

    let options = controller.load_options();

    controller.set_field(FilterField::Name, args.name).await;
    controller.set_field(FilterField::Region, args.region).await;
    controller.set_field(FilterField::Party, args.party).await;
    controller.commit().await.settled().await;

    if args.page > 1 && controller.view().await.error.is_none() {
        match controller.go_to_page(args.page).await {
            Ok(Some(pending)) => pending.settled().await,
            Ok(None) => {}
            Err(err) => {
                eprintln!("cannot open page: {err}");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    options.settled().await;
    let view = controller.view().await;

    if args.json {
        let document = if args.parties {
            serde_json::json!({ "view": view, "options": controller.options().await })
        } else {
            serde_json::to_value(&view)?
        };
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        if args.parties {
            print!("{}", render::render_options(&controller.options().await));
            println!();
        }
        print!("{}", render::render_view(&view));
    }

    Ok(if view.error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
