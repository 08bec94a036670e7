use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use configuration::{ServerOverrides, Settings};
use core_types::Assumptions;
use projection::{BreakEvenMetrics, ProjectionEngine};
use rust_decimal::Decimal;
use std::fs::File;
use std::path::PathBuf;
use web_server::AppState;

/// The main entry point for the Farmstead projection service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; DATABASE_URL may already be exported.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = configuration::load_config().context("Failed to load configuration")?;
    let _guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => handle_serve(args, settings).await,
        Commands::Migrate => handle_migrate(&settings).await,
        Commands::Project(args) => handle_project(args, &settings),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Break-even and profitability projections for farm operations.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Apply the database migrations and exit.
    Migrate,
    /// Run a projection offline and print the monthly table.
    Project(ProjectArgs),
}

#[derive(Parser)]
struct ServeArgs {
    #[command(flatten)]
    overrides: ServerOverrides,

    /// Keep assumptions and sales in memory instead of PostgreSQL.
    #[arg(long)]
    in_memory: bool,
}

#[derive(Parser)]
struct ProjectArgs {
    /// Revenue per unit sold.
    #[arg(long)]
    price: Decimal,

    /// Variable cost per unit sold.
    #[arg(long)]
    unit_variable_cost: Decimal,

    /// Fixed costs per month.
    #[arg(long)]
    fixed_costs: Decimal,

    /// Month-over-month growth in unit volume (0.05 = +5%).
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    growth_rate: Decimal,

    /// Units sold in month 1.
    #[arg(long)]
    baseline: Decimal,

    /// Number of months to simulate, overriding `projection.horizon_months`.
    #[arg(long)]
    horizon: Option<u32>,

    /// Calendar date of month 1 (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Also write the monthly table to this CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, mut settings: Settings) -> anyhow::Result<()> {
    args.overrides.apply(&mut settings.server);
    let addr = settings.server.socket_addr()?;

    let state = if args.in_memory {
        tracing::warn!("Serving from memory; nothing will be persisted.");
        AppState::in_memory(&settings)?
    } else {
        AppState::connect(&settings).await?
    };

    web_server::run_server(addr, state).await
}

async fn handle_migrate(settings: &Settings) -> anyhow::Result<()> {
    let pool = database::connect(&settings.database).await?;
    database::run_migrations(&pool).await?;
    println!("Migrations applied.");
    Ok(())
}

fn handle_project(args: ProjectArgs, settings: &Settings) -> anyhow::Result<()> {
    let mut projection_settings = settings.projection.clone();
    if let Some(horizon) = args.horizon {
        projection_settings.horizon_months = horizon;
    }
    let engine = ProjectionEngine::new(projection_settings)?;

    let assumptions = Assumptions::new(
        args.price,
        args.unit_variable_cost,
        args.fixed_costs,
        args.growth_rate,
    );
    let start_date = args.start_date.unwrap_or_else(|| Utc::now().date_naive());
    let metrics = engine.compute_metrics(&assumptions, args.baseline, start_date)?;

    println!("{}", projection_table(&metrics));
    println!("{}", summary_table(&metrics));

    if let Some(path) = args.csv {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        projection::write_projections_csv(&metrics.monthly_projections, file)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn projection_table(metrics: &BreakEvenMetrics) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Month",
        "Units",
        "Revenue",
        "Variable Costs",
        "Fixed Costs",
        "Total Costs",
        "Profit",
        "Cumulative Profit",
    ]);

    for p in &metrics.monthly_projections {
        table.add_row(vec![
            Cell::new(p.month),
            Cell::new(p.units.round_dp(2)),
            Cell::new(p.revenue.round_dp(2)),
            Cell::new(p.variable_costs.round_dp(2)),
            Cell::new(p.fixed_costs.round_dp(2)),
            Cell::new(p.total_costs.round_dp(2)),
            Cell::new(p.profit.round_dp(2)),
            Cell::new(p.cumulative_profit.round_dp(2)),
        ]);
    }
    table
}

fn summary_table(metrics: &BreakEvenMetrics) -> Table {
    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        "Contribution margin".to_string(),
        metrics.contribution_margin.round_dp(2).to_string(),
    ]);
    table.add_row(vec![
        "Contribution margin ratio (%)".to_string(),
        metrics.contribution_margin_ratio.round_dp(2).to_string(),
    ]);
    table.add_row(vec![
        "Break-even units / month".to_string(),
        or_dash(metrics.break_even_units.map(|u| u.round_dp(2).to_string())),
    ]);
    table.add_row(vec![
        "Break-even revenue / month".to_string(),
        or_dash(metrics.break_even_revenue.map(|r| r.round_dp(2).to_string())),
    ]);
    table.add_row(vec![
        "Break-even month".to_string(),
        or_dash(metrics.break_even_month.map(|m| m.to_string())),
    ]);
    table.add_row(vec![
        "Break-even date".to_string(),
        or_dash(metrics.break_even_date.map(|d| d.to_string())),
    ]);
    table.add_row(vec![
        "Payback period (months)".to_string(),
        or_dash(metrics.payback_period.map(|m| m.to_string())),
    ]);
    table.add_row(vec![
        format!("Cumulative profit after {} months", metrics.horizon_months),
        metrics.final_cumulative_profit().round_dp(2).to_string(),
    ]);
    table
}
