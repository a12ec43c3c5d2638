use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// Declare modules
mod catalog_api;
mod config;
mod controller;
mod error;
mod models;

use catalog_api::HttpCatalogApi;
use controller::CatalogController;
use models::{FilterPatch, SortKey, SortOrder, Vehicle};

const USER_AGENT: &str = concat!("ridauto-catalog/", env!("CARGO_PKG_VERSION"));

/// Command-line browser for the Ridauto Motor vehicle catalog.
#[derive(Debug, Parser)]
#[command(name = "ridauto-catalog", version, about)]
struct Cli {
    /// Look up a single vehicle by slug (or id) and exit
    #[arg(long)]
    slug: Option<String>,

    /// Filter by brand (substring match, case-insensitive)
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    min_price: Option<String>,
    #[arg(long)]
    max_price: Option<String>,
    #[arg(long)]
    min_year: Option<String>,
    #[arg(long)]
    max_year: Option<String>,
    #[arg(long)]
    fuel_type: Option<String>,
    #[arg(long)]
    transmission: Option<String>,
    /// "nuevo" or "ocasion"
    #[arg(long)]
    vehicle_type: Option<String>,
    /// Listing status; defaults to "available", pass an empty string to clear
    #[arg(long)]
    status: Option<String>,

    /// Sort key: created_at, price, year or kilometers
    #[arg(long)]
    sort_by: Option<SortKey>,
    /// Sort direction: asc or desc
    #[arg(long)]
    sort_order: Option<SortOrder>,

    /// Number of pages to fetch (20 vehicles each)
    #[arg(long, default_value_t = 1)]
    pages: u32,
}

impl Cli {
    /// Filter flags as the same (key, value) pairs the website round-trips
    /// through the address bar.
    fn filter_pairs(&self) -> Vec<(&'static str, &str)> {
        let flags = [
            ("brand", &self.brand),
            ("min_price", &self.min_price),
            ("max_price", &self.max_price),
            ("min_year", &self.min_year),
            ("max_year", &self.max_year),
            ("fuel_type", &self.fuel_type),
            ("transmission", &self.transmission),
            ("vehicle_type", &self.vehicle_type),
            ("status", &self.status),
        ];
        flags
            .into_iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
            .collect()
    }
}

fn print_listing_line(vehicle: &Vehicle) {
    println!(
        "{:>4}  {:<12} {:<20} {:>9.0} EUR {:>9} km  [{}]",
        vehicle.year, vehicle.brand, vehicle.model, vehicle.price, vehicle.kilometers, vehicle.slug
    );
}

fn print_detail(vehicle: &Vehicle) {
    println!("{} {} ({})", vehicle.brand, vehicle.model, vehicle.year);
    println!("  price:        {:.0} EUR", vehicle.price);
    println!("  kilometers:   {}", vehicle.kilometers);
    println!("  fuel:         {}", vehicle.fuel_type);
    println!("  transmission: {}", vehicle.transmission);
    println!("  color:        {}", vehicle.color);
    println!("  power:        {} hp", vehicle.power_hp);
    println!("  status:       {}", vehicle.status);
    if !vehicle.features.is_empty() {
        println!("  features:     {}", vehicle.features.join(", "));
    }
    if !vehicle.images.is_empty() {
        println!("  images:       {}", vehicle.images.len());
    }
    if !vehicle.description.is_empty() {
        println!("\n{}", vehicle.description);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "ridauto_catalog=info".into()),
        )
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let settings = config::Settings::new().context("Failed to load configuration")?;
    tracing::info!(api = %settings.api_base_url, "configuration loaded");

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let api = Arc::new(HttpCatalogApi::new(client, settings.api_base_url));
    let controller = CatalogController::new(api);

    // Detail mode: single lookup, no collection state involved.
    if let Some(slug) = cli.slug.as_deref() {
        match controller.get_by_slug(slug).await {
            Ok(vehicle) => print_detail(&vehicle),
            Err(err) => {
                eprintln!("{}", err.user_message("Vehicle not found"));
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Listing mode: seed filters from the flags (the way the website seeds
    // them from URL parameters on page load), then page through.
    let patch = FilterPatch::from_query_pairs(cli.filter_pairs());
    if patch.is_empty() {
        controller.initialize().await;
    } else {
        controller.set_filters(patch).await;
    }

    if cli.sort_by.is_some() || cli.sort_order.is_some() {
        let key = cli.sort_by.unwrap_or(SortKey::CreatedAt);
        let order = cli.sort_order.unwrap_or(SortOrder::Desc);
        controller.set_sort(key, order).await;
    }

    for _ in 1..cli.pages {
        if !controller.snapshot().has_more {
            break;
        }
        controller.load_more().await;
    }

    let state = controller.snapshot();
    if let Some(error) = &state.error {
        eprintln!("{error}");
        std::process::exit(1);
    }

    for vehicle in &state.vehicles {
        print_listing_line(vehicle);
    }
    tracing::info!(
        count = state.vehicles.len(),
        has_more = state.has_more,
        "listing complete"
    );

    Ok(())
}
