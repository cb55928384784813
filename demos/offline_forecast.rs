// Trains on a transactions CSV and prints a short forecast, without the HTTP layer
//
// Usage: cargo run --example offline_forecast -- transactions.csv [days]

use chrono::Days;
use sales_forecast::forecast::forecast;
use sales_forecast::{DataLoader, ForecastContext, ForecastRequest, Trainer};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let csv_path = args
        .next()
        .ok_or("usage: offline_forecast <transactions.csv> [days]")?;
    let days: u64 = match args.next() {
        Some(raw) => raw.parse()?,
        None => 14,
    };

    println!("Loading data from: {}", csv_path);
    let mut context = ForecastContext::new();
    let report = context.load(DataLoader::from_csv(&csv_path)?);
    println!(
        "Loaded {} transactions ({} outliers removed), {} days from {} to {}",
        report.total_records,
        report.outliers_removed,
        report.daily_records,
        report.date_range.start,
        report.date_range.end
    );

    let training = Trainer::default().train(&mut context)?;
    println!(
        "\n{}: {} training days, {} test days",
        training.model, training.training_days, training.test_days
    );
    println!("MAE:  {:.2}", training.mae);
    println!("RMSE: {:.2}", training.rmse);
    match training.mape {
        Some(mape) => println!("MAPE: {:.2}%", mape),
        None => println!("MAPE: n/a"),
    }

    let start = report
        .date_range
        .end
        .checked_add_days(Days::new(1))
        .ok_or("date out of range")?;
    let end = start
        .checked_add_days(Days::new(days.max(2) - 1))
        .ok_or("date out of range")?;
    let request = ForecastRequest::new(&start.to_string(), &end.to_string());
    let output = forecast(&mut context, &request)?;

    println!("\nForecast for the next {} days:", output.rows.len());
    for row in &output.rows {
        match (row.lower_bound, row.upper_bound) {
            (Some(lower), Some(upper)) => println!(
                "{} {:<9} {:>10.2}  [{:.2}, {:.2}]",
                row.date, row.day_of_week, row.forecast, lower, upper
            ),
            _ => println!("{} {:<9} {:>10.2}", row.date, row.day_of_week, row.forecast),
        }
    }
    println!(
        "\nTotal: {:.2}, average: {:.2}/day",
        output.summary.total_forecast, output.summary.average_daily_forecast
    );

    Ok(())
}
