use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use property_scout::diagnostics::{self, ProbeStatus};
use property_scout::format::{format_address, format_date, format_price, truncate_text};
use property_scout::images::{enabled_images, main_image};
use property_scout::{ApiClient, Config, Filter, Listing, LoadOutcome, Property, SortDirection};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "property-scout", version, about = "Browse listings from the property backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List properties matching a filter
    List(ListArgs),
    /// Show one property with its gallery and transaction history
    Show { id: String },
    /// Probe the backend's endpoints
    Diagnose,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    owner_name: Option<String>,
    #[arg(long)]
    min_price: Option<i64>,
    #[arg(long)]
    max_price: Option<i64>,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    sort_by: Option<String>,
    /// Sort descending instead of ascending
    #[arg(long, requires = "sort_by")]
    desc: bool,
    /// Write the page as JSON to this file
    #[arg(long)]
    out: Option<PathBuf>,
}

impl ListArgs {
    fn filter(&self) -> Filter {
        Filter {
            name: self.name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            owner_name: self.owner_name.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            year: self.year,
            page: self.page,
            page_size: self.page_size,
            sort_by: self.sort_by.clone(),
            sort_direction: self.sort_by.as_ref().map(|_| {
                if self.desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                }
            }),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "property_scout=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;

    info!("🏠 Property Scout");
    info!("Backend: {}", config.properties_url());

    match cli.command {
        Command::List(args) => list(config, args).await,
        Command::Show { id } => show(config, &id).await,
        Command::Diagnose => diagnose(&config).await,
    }
}

async fn list(config: Config, args: ListArgs) -> anyhow::Result<()> {
    let listing = Listing::new(ApiClient::new(config)?);

    if let LoadOutcome::Failed(err) = listing.load(args.filter()).await {
        anyhow::bail!("Failed to fetch properties: {}", err);
    }

    let state = listing.snapshot();
    let Some(page) = state.page else {
        anyhow::bail!("No results");
    };

    info!(
        "\n✅ Page {} of {} ({} properties total)\n",
        page.page, page.total_pages, page.total_count
    );

    for (i, property) in page.properties.iter().enumerate() {
        println!("{}. {} ({})", i + 1, property.name, format_price(property.price));
        println!("   {}", format_address(&property.address));
        if let Some(city) = &property.city {
            println!("   City: {}", city);
        }
        println!("   ID: {}", property.id);
        println!("   Image: {}", main_image(property));
        println!();
    }

    if let Some(path) = args.out {
        let json = serde_json::to_string_pretty(&page)?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("💾 Saved page to {}", path.display());
    }

    Ok(())
}

async fn show(config: Config, id: &str) -> anyhow::Result<()> {
    let listing = Listing::new(ApiClient::new(config)?);
    let property = listing
        .detail(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to fetch property {}: {}", id, e))?;

    print_detail(&property);
    Ok(())
}

fn print_detail(property: &Property) {
    println!("{}", property.name);
    println!("{}", format_price(property.price));
    println!("{}", format_address(&property.address));
    if let Some(year) = property.year {
        println!("Built: {}", year);
    }
    if let Some(code) = &property.code_internal {
        println!("Code: {}", code);
    }

    println!("\nOwner: {}", property.owner.name);
    println!("  Phone: {}", property.owner.phone);
    println!("  Email: {}", property.owner.email);

    println!("\nGallery (main: {})", main_image(property));
    for image in enabled_images(property) {
        println!("  - {} {}", image.url, truncate_text(&image.description, 40));
    }

    if !property.traces.is_empty() {
        println!("\nHistory:");
        for trace in property.traces_chronological() {
            let date = trace
                .parsed_date()
                .map(format_date)
                .unwrap_or_else(|| trace.date.clone());
            println!(
                "  {} {}: {} (tax {})",
                date,
                trace.label,
                format_price(trace.value),
                format_price(trace.tax)
            );
        }
    }
}

async fn diagnose(config: &Config) -> anyhow::Result<()> {
    let results = diagnostics::diagnose(config).await?;

    for result in &results {
        let marker = match result.status {
            ProbeStatus::Success => "✅",
            ProbeStatus::Error => "❌",
        };
        println!("{} {} [{}]", marker, result.endpoint, result.checked_at.format("%H:%M:%S"));
        println!("   {}", result.message);
    }

    Ok(())
}
