use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::chart::comparison_chart;
use sales_forecast::comparison::compare;
use sales_forecast::utils::date_range;
use sales_forecast::{ComparisonRequest, DataLoader, ForecastContext, ForecastError, Trainer};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily amount equal to the year's last two digits, 2021-03-01 to 2022-12-31
fn loaded_context() -> ForecastContext {
    let mut csv = String::from("transaction date,amount\n");
    for date in date_range(ymd(2021, 3, 1), ymd(2022, 12, 31)) {
        let amount = if date.format("%Y").to_string() == "2021" { 21 } else { 22 };
        csv.push_str(&format!("{},{}\n", date, amount));
    }

    let mut context = ForecastContext::new();
    context.load(DataLoader::from_bytes(csv.as_bytes()).unwrap());
    context
}

fn request(month: u32, years: Vec<i32>, include_forecast_year: Option<i32>) -> ComparisonRequest {
    ComparisonRequest {
        month,
        years,
        include_forecast_year,
    }
}

#[test]
fn test_compare_without_data_is_not_ready() {
    let context = ForecastContext::new();
    assert!(matches!(
        compare(&context, &request(6, vec![2022], None)),
        Err(ForecastError::NotReady(_))
    ));
}

#[rstest]
#[case(0)]
#[case(13)]
fn test_month_out_of_range(#[case] month: u32) {
    let context = loaded_context();
    let req = request(month, vec![2022], None);

    assert!(matches!(req.validate(), Err(ForecastError::InvalidRange(_))));
    assert!(matches!(
        compare(&context, &req),
        Err(ForecastError::InvalidRange(_))
    ));
}

#[test]
fn test_only_years_with_data_are_summarised() {
    let context = loaded_context();
    let output = compare(&context, &request(6, vec![2020, 2021, 2022, 2023], None)).unwrap();

    assert_eq!(output.month_name, "June");
    let labels: Vec<&str> = output.summary.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["2021", "2022"]);

    for summary in &output.summary {
        assert_eq!(summary.days_with_data, 30);
        assert_eq!(summary.max_daily_amount, summary.min_daily_amount);
    }
    assert_eq!(output.summary[0].total_amount, 21.0 * 30.0);
    assert_eq!(output.summary[1].average_daily_amount, 22.0);
}

#[test]
fn test_styles_cycle_by_request_position() {
    let context = loaded_context();
    let output = compare(&context, &request(3, vec![2021, 2022], None)).unwrap();

    assert_eq!(output.series[0].style.color, "blue");
    assert_eq!(output.series[0].style.dash, "solid");
    assert_eq!(output.series[1].style.color, "green");
    assert_eq!(output.series[1].style.dash, "dash");
    assert_eq!(output.series[0].points.first().unwrap().day, 1);
    assert_eq!(output.series[0].points.last().unwrap().day, 31);
}

#[test]
fn test_repeated_years_are_compared_once() {
    let context = loaded_context();
    let output = compare(&context, &request(7, vec![2022, 2021, 2022], None)).unwrap();

    let labels: Vec<&str> = output.summary.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["2022", "2021"]);
}

#[test]
fn test_forecast_year_requires_model() {
    let mut context = loaded_context();
    let req = request(2, vec![2022], Some(2023));

    let output = compare(&context, &req).unwrap();
    assert_eq!(output.series.len(), 1);

    Trainer::default().train(&mut context).unwrap();
    let series_len = context.series().len();
    let output = compare(&context, &req).unwrap();

    assert_eq!(output.series.len(), 2);
    let forecast = &output.series[1];
    assert_eq!(forecast.label, "2023 (Forecast)");
    assert!(forecast.is_forecast);
    assert_eq!(forecast.style.color, "red");
    assert_eq!(forecast.style.dash, "dashdot");
    assert_eq!(forecast.points.len(), 28);
    assert_eq!(output.summary[1].days_with_data, 28);
    // Comparison forecasts are not written back
    assert_eq!(context.series().len(), series_len);

    let figure = comparison_chart(&output);
    assert_eq!(figure.data.len(), 2);
    assert_eq!(figure.data[1]["marker"]["symbol"], "diamond");
    assert!(figure.to_html().contains("Daily Sales Comparison - February"));
}
