use demand_forecast::data::{DateWindow, TransactionLoader};
use demand_forecast::features::{build_all_feature_vectors, PredictionTarget};
use demand_forecast::models::linear_regression::LinearRegression;
use demand_forecast::{MonthlySales, Predictor, Result};

const SALES: &str = "\
created_at,name,product_name,quantity
2024-10-02 10:15:00,Mama Put,Kola Classic,40
2024-11-12 09:00:00,Mama Put,Kola Classic,35
2025-01-08 14:30:00,Mama Put,Kola Classic,52
2025-02-19 16:45:00,Mama Put,Kola Classic,48
2025-02-03 11:00:00,Corner Shop,Chin Chin,12
";

fn main() -> Result<()> {
    let transactions = TransactionLoader::from_reader(SALES.as_bytes(), &DateWindow::unbounded())?;
    let sales = MonthlySales::from_transactions(&transactions)?;

    // Weighted recent history plus a constant
    let model = LinearRegression::new(5.0, &[0.5, 0.25, 0.1, 0.05, 0.05, 0.05, 0.0, 0.0])?;
    let target = PredictionTarget::new(3, 2025)?;

    for (group, features) in build_all_feature_vectors(&sales, &target) {
        println!(
            "{:<28} lags {:?} -> {} units",
            group.to_string(),
            features.lags(),
            model.predict_units(&features)?
        );
    }

    Ok(())
}
