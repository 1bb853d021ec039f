//! kim-recommend: recommend next month's order quantity from the trade index.
//!
//! Usage:
//!   kim-recommend --product "Kola Classic" --prev-month March --units 100
//!   kim-recommend --list-products
//!
//! Common options: --config kim.json --trade-index FILE --mapping FILE --json

use anyhow::{Context, Result};
use clap::Parser;
use kola_inventory::config::CommonArgs;
use trade_index::{CategoryMapping, Recommender, TradeIndexTable};

#[derive(Parser)]
#[command(name = "kim-recommend")]
#[command(about = "Recommend next month's order quantity from the trade index", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Print the mapped products and exit
    #[arg(long)]
    list_products: bool,

    /// Product to restock
    #[arg(long, required_unless_present = "list_products")]
    product: Option<String>,

    /// Month the previous order was placed in, e.g. March
    #[arg(long, required_unless_present = "list_products")]
    prev_month: Option<String>,

    /// Units ordered in the previous month
    #[arg(
        long,
        required_unless_present = "list_products",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    units: Option<u64>,

    /// Print the recommendation as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.common.resolve()?;

    let mapping = CategoryMapping::from_csv(&config.category_mapping_path).with_context(|| {
        format!(
            "Cannot load category mapping from {}",
            config.category_mapping_path.display()
        )
    })?;

    if cli.list_products {
        for product in mapping.products() {
            println!("{product}");
        }
        return Ok(());
    }

    let table = TradeIndexTable::from_csv(&config.trade_index_path).with_context(|| {
        format!(
            "Cannot load trade index from {}",
            config.trade_index_path.display()
        )
    })?;

    let product = cli.product.as_deref().context("--product is required")?;
    let prev_month = cli.prev_month.as_deref().context("--prev-month is required")?;
    let units = cli.units.context("--units is required")?;

    let recommender = Recommender::new(mapping, table);
    let rec = recommender.recommend(product, prev_month, units)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rec)?);
    } else {
        println!(
            "Recommended units for {} in {}: {} units ({} {:+.1}% on {} units)",
            rec.product,
            rec.pred_month,
            rec.recommended_units,
            rec.category,
            rec.pct_change * 100.0,
            rec.prev_units
        );
    }

    Ok(())
}
