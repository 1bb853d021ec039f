//! kim: predict next-period demand for a customer and product.
//!
//! Usage:
//!   kim --list-products [--data sales.csv]
//!   kim --customer Acme --product Widget --month 4 --year 2025 [--json]
//!   kim --product Widget --quantities 100,120,90,80,70,60 --month 6 --year 2025
//!
//! Common options: --config kim.json --data FILE --model FILE --from YYYY-MM-DD --to YYYY-MM-DD

use anyhow::{bail, Context, Result};
use clap::Parser;
use demand_forecast::data::unique_products;
use demand_forecast::features::LAG_COUNT;
use demand_forecast::models::linear_regression::LinearRegression;
use kola_inventory::cache::TransactionCache;
use kola_inventory::config::CommonArgs;
use kola_inventory::{
    forecast_demand, forecast_from_quantities, DemandReport, MonthlySales, PredictionTarget,
};

#[derive(Parser)]
#[command(name = "kim")]
#[command(about = "Predict next-period demand for a customer and product", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Print the distinct products in the sales history and exit
    #[arg(long)]
    list_products: bool,

    /// Product to forecast
    #[arg(long, required_unless_present = "list_products")]
    product: Option<String>,

    /// Customer whose history drives the forecast
    #[arg(long, required_unless_present_any = ["quantities", "list_products"])]
    customer: Option<String>,

    /// Target month (1-12)
    #[arg(long, default_value_t = 6)]
    month: u32,

    /// Target year
    #[arg(long, default_value_t = 2025)]
    year: i32,

    /// Six monthly quantities, latest first, instead of the sales history
    #[arg(long, value_delimiter = ',')]
    quantities: Option<Vec<u64>>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.common.resolve()?;
    let window = config.window()?;

    let mut cache = TransactionCache::new();

    if cli.list_products {
        let transactions = cache
            .get_or_load(&config.sales_path, &window)
            .with_context(|| format!("Cannot load sales from {}", config.sales_path.display()))?;
        for product in unique_products(&transactions) {
            println!("{product}");
        }
        return Ok(());
    }

    let product = cli.product.as_deref().context("--product is required")?;
    let target = PredictionTarget::new(cli.month, cli.year)?;

    let model = LinearRegression::from_json_file(&config.model_path)
        .with_context(|| format!("Cannot load model from {}", config.model_path.display()))?;

    let report = match &cli.quantities {
        Some(values) => {
            let quantities = lag_quantities(values)?;
            let customer = cli.customer.as_deref().unwrap_or_default();
            forecast_from_quantities(customer, product, quantities, &target, &model)?
        }
        None => {
            let customer = cli
                .customer
                .as_deref()
                .context("--customer is required unless --quantities is given")?;
            let transactions = cache
                .get_or_load(&config.sales_path, &window)
                .with_context(|| {
                    format!("Cannot load sales from {}", config.sales_path.display())
                })?;
            let sales = MonthlySales::from_transactions(&transactions)?;
            forecast_demand(&sales, customer, product, &target, &model)?
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn lag_quantities(values: &[u64]) -> Result<[u64; LAG_COUNT]> {
    match <[u64; LAG_COUNT]>::try_from(values) {
        Ok(quantities) => Ok(quantities),
        Err(_) => bail!(
            "--quantities needs {} comma-separated values, got {}",
            LAG_COUNT,
            values.len()
        ),
    }
}

fn print_report(report: &DemandReport) {
    println!("Kola Inventory Manager");
    if !report.customer.is_empty() {
        println!("  customer:     {}", report.customer);
    }
    println!("  product:      {}", report.product);
    match report.latest_month {
        Some(latest) => println!("  latest month: {latest}"),
        None if report.has_history => println!("  latest month: (manual quantities)"),
        None => println!("  latest month: no history available"),
    }
    println!();
    for (name, value) in &report.features {
        println!("  {name:<22} {value}");
    }
    println!();
    println!(
        "Predicted demand for {} in {}/{}: {} units ({})",
        report.product,
        report.target.month(),
        report.target.year(),
        report.predicted_units,
        report.model
    );
}
