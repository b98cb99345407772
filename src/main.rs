use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dummyshop::{
    application::{CatalogService, FetchOutcome, ListView},
    domain::{PageQuery, ResourceKind},
    infrastructure::{
        adapters::dummyjson::DummyJsonAdapter,
        cli::{self, Cli, Commands, ConfigAction},
        config::{AppConfig, BASE_URL_VAR, PAGE_SIZE_VAR},
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "dummyshop=debug,info"
    } else {
        "dummyshop=info,warn,error"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = AppConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let adapter = Arc::new(DummyJsonAdapter::new(config.base_url.clone())?);
    tracing::debug!(base_url = adapter.base_url(), "DummyJSON provider configured");
    let service = CatalogService::new(adapter.clone(), adapter);

    match cli.command {
        Commands::Products {
            page,
            limit,
            search,
            category,
        } => {
            let view = cli::build_view(
                ResourceKind::Product,
                limit.unwrap_or(config.page_size),
                page,
                &search,
                Some(&category),
            );
            show_list(&service, &view).await;
        }

        Commands::Users {
            page,
            limit,
            search,
        } => {
            let view = cli::build_view(
                ResourceKind::User,
                limit.unwrap_or(config.page_size),
                page,
                &search,
                None,
            );
            show_list(&service, &view).await;
        }

        Commands::Product { id } => show_detail(&service, ResourceKind::Product, &id).await,

        Commands::User { id } => show_detail(&service, ResourceKind::User, &id).await,

        Commands::Login { username, password } => {
            match service.session().login(&username, &password).await {
                Ok(session) => cli::print_session(&session),
                Err(e) => {
                    eprintln!("Login failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Dashboard {
            username,
            password,
            limit,
        } => {
            if let Err(e) = service.session().login(&username, &password).await {
                eprintln!("Login failed: {}", e);
                std::process::exit(1);
            }

            let query = PageQuery::new(1, limit.unwrap_or(config.page_size));
            match service.dashboard(&query, Utc::now()).await {
                Ok(FetchOutcome::Applied) => {
                    let state = service.products().snapshot();
                    println!("Dashboard: {} of {} products", state.items.len(), state.total);
                    for item in &state.items {
                        println!("{}", cli::dashboard_line(item));
                    }
                }
                Ok(_) => {
                    let reason = service.products().snapshot().error.unwrap_or_default();
                    eprintln!("{}", reason);
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Dashboard unavailable: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::List => {
                println!("Configuration:");
                println!("  {}: {}", BASE_URL_VAR, config.base_url);
                println!("  {}: {}", PAGE_SIZE_VAR, config.page_size);
            }

            ConfigAction::Test => {
                println!("Testing {} connection...", service.provider_name());
                match service.ping().await {
                    Ok(()) => println!("  {}: ✓ Connected", config.base_url),
                    Err(e) => {
                        println!("  {}: ✗ Failed ({})", config.base_url, e);
                        std::process::exit(1);
                    }
                }
            }
        },
    }

    Ok(())
}

async fn show_list(service: &CatalogService, view: &ListView) {
    let kind = view.kind();
    let store = service.store(kind);

    match store.fetch(&view.query()).await {
        Ok(FetchOutcome::Applied) => {}
        Ok(_) => {
            let state = store.snapshot();
            eprintln!("{}", state.error.unwrap_or_else(|| kind.failure_message().to_string()));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    let state = store.snapshot();
    let visible = view.visible(&state.items);
    let pagination = view.pagination(state.total);

    if kind == ResourceKind::Product {
        println!("Categories: {}", view.categories(&state.items).join(", "));
    }
    println!("Showing {} {}s", visible.len(), kind);

    if visible.is_empty() {
        println!("No {}s found", kind);
    }
    for item in &visible {
        match kind {
            ResourceKind::Product => println!("{}", cli::product_line(item)),
            ResourceKind::User => println!("{}", cli::user_line(item)),
        }
    }

    if pagination.out_of_range() {
        tracing::warn!(
            page = pagination.page,
            total_pages = pagination.total_pages(),
            "requested page lies past the reported total"
        );
    }
    println!("\n{}", cli::pager_line(&pagination));
}

async fn show_detail(service: &CatalogService, kind: ResourceKind, id: &str) {
    match service.get(kind, id).await {
        Ok(item) => cli::print_detail(kind, &item),
        Err(e) => {
            eprintln!("Error fetching {}: {}", kind, e);
            std::process::exit(1);
        }
    }
}
