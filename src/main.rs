use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use household::{HouseholdMember, InMemoryProfileStore};
use mealsync::persist::JsonFileStore;
use mealsync::request::GenerateRequest;
use mealsync::service::MealPlanService;
use recipe::{InMemoryCatalog, Recipe};
use shopping::{InMemoryPriceTable, PriceEntry};

/// mealsync - household meal planning and grocery consolidation
#[derive(Parser)]
#[command(name = "mealsync")]
#[command(about = "Plans weekly meals across household groups and consolidates the shopping list", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one optimization over JSON fixture files
    Generate {
        /// Generation request (groups, duration, meal types, budget, goals)
        #[arg(long)]
        request: PathBuf,

        /// Recipe catalog
        #[arg(long)]
        catalog: PathBuf,

        /// Household profiles, keyed by group id
        #[arg(long)]
        profiles: PathBuf,

        /// Ingredient price table
        #[arg(long)]
        prices: PathBuf,

        /// Output file for the committed run
        #[arg(long, default_value = "mealsync-run.json")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = mealsync::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    mealsync::observability::init_observability("mealsync", &config.observability.log_level)?;

    match cli.command {
        Commands::Generate {
            request,
            catalog,
            profiles,
            prices,
            out,
        } => generate_command(config, request, catalog, profiles, prices, out).await,
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&body).with_context(|| format!("parsing {}", path.display()))
}

async fn generate_command(
    config: mealsync::config::Config,
    request_path: PathBuf,
    catalog_path: PathBuf,
    profiles_path: PathBuf,
    prices_path: PathBuf,
    out: PathBuf,
) -> Result<()> {
    let request: GenerateRequest = read_json(&request_path)?;
    let recipes: Vec<Recipe> = read_json(&catalog_path)?;
    let catalog = InMemoryCatalog::new(recipes).context("validating recipe catalog")?;
    let profiles: HashMap<String, Vec<HouseholdMember>> = read_json(&profiles_path)?;
    let profiles = InMemoryProfileStore::new(profiles);
    let price_entries: Vec<PriceEntry> = read_json(&prices_path)?;
    let prices = InMemoryPriceTable::from_entries(price_entries);
    let store = JsonFileStore::new(&out);

    let service = MealPlanService::from_config(&config);
    let response = service
        .generate_meal_plans(request, &catalog, &profiles, &prices, &store)
        .await?;

    for warning in &response.warnings {
        tracing::warn!(?warning, "plan warning");
    }
    tracing::info!(
        plans = response.plans.len(),
        grocery_lines = response.grocery_list.items.len(),
        total_cost = %response.grocery_list.total_cost,
        overlap_efficiency = response.metrics.overlap_efficiency,
        cost_savings = %response.metrics.cost_savings,
        waste_reduction = response.metrics.waste_reduction,
        out = %out.display(),
        "meal plans generated"
    );

    Ok(())
}
