use approx::assert_relative_eq;
use chrono::{Days, NaiveDate};
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::chart::forecast_chart;
use sales_forecast::data::{BackfillStats, Provenance};
use sales_forecast::forecast::{backfill, forecast, generate};
use sales_forecast::utils::date_range;
use sales_forecast::{DataLoader, ForecastContext, ForecastError, ForecastRequest, Trainer};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn trained_context() -> ForecastContext {
    let mut csv = String::from("transaction date,amount\n");
    for date in date_range(ymd(2022, 1, 1), ymd(2022, 12, 31)) {
        csv.push_str(&format!("{},50\n", date));
    }

    let mut context = ForecastContext::new();
    context.load(DataLoader::from_bytes(csv.as_bytes()).unwrap());
    Trainer::default().train(&mut context).unwrap();
    context
}

#[test]
fn test_forecast_before_training_is_not_ready() {
    let mut context = ForecastContext::new();
    let request = ForecastRequest::new("2023-01-01", "2023-01-05");

    assert!(matches!(
        forecast(&mut context, &request),
        Err(ForecastError::NotReady(_))
    ));
}

#[rstest]
#[case("2023-01-05", "2023-01-01")]
#[case("2023-01-05", "2023-01-05")]
#[case("not a date", "2023-01-05")]
#[case("2023-01-01", "2023-13-01")]
fn test_invalid_ranges(#[case] start: &str, #[case] end: &str) {
    let mut context = trained_context();
    let before = context.series().len();

    let result = forecast(&mut context, &ForecastRequest::new(start, end));
    assert!(matches!(result, Err(ForecastError::InvalidRange(_))));
    assert_eq!(context.series().len(), before);
}

#[test]
fn test_forecast_covers_range_without_gaps() {
    let mut context = trained_context();
    let request = ForecastRequest::new("2023-01-01", "2023-02-15");

    let output = forecast(&mut context, &request).unwrap();
    let expected_days = (ymd(2023, 2, 15) - ymd(2023, 1, 1)).num_days() as usize + 1;

    assert_eq!(output.rows.len(), expected_days);
    assert_eq!(output.summary.total_days, expected_days);
    for pair in output.rows.windows(2) {
        assert_eq!(pair[0].date + Days::new(1), pair[1].date);
    }
    assert!(output.rows.iter().all(|r| r.lower_bound.is_some()));

    assert_relative_eq!(output.summary.average_daily_forecast, 50.0, epsilon = 1e-3);
    assert_relative_eq!(
        output.summary.total_forecast,
        50.0 * expected_days as f64,
        epsilon = 1e-1
    );
    assert!(output.summary.min_forecast <= output.summary.max_forecast);
    assert!(output.summary.std_forecast >= 0.0);
}

#[test]
fn test_forecast_backfills_series_once() {
    let mut context = trained_context();
    let request = ForecastRequest::new("2023-01-01", "2023-01-05");

    forecast(&mut context, &request).unwrap();
    forecast(&mut context, &request).unwrap();

    assert_eq!(context.series().len(), 365 + 5);
    let tail = context.series().window(ymd(2023, 1, 1), ymd(2023, 1, 5));
    assert_eq!(tail.len(), 5);
    assert!(tail.iter().all(|r| r.provenance == Provenance::Forecast));
}

#[test]
fn test_backfill_reports_every_outcome() {
    let mut context = trained_context();
    let model = context.active_model().unwrap();

    // Last actual day plus two new dates
    let output = generate(model.as_ref(), ymd(2022, 12, 31), ymd(2023, 1, 2), false).unwrap();
    let stats = backfill(context.series_mut(), &output);
    assert_eq!(
        stats,
        BackfillStats {
            appended: 2,
            replaced: 0,
            preserved: 1,
        }
    );

    let stats = backfill(context.series_mut(), &output);
    assert_eq!(
        stats,
        BackfillStats {
            appended: 0,
            replaced: 2,
            preserved: 1,
        }
    );
}

#[test]
fn test_forecast_never_overwrites_actuals() {
    let mut context = trained_context();
    let request = ForecastRequest::new("2022-12-30", "2023-01-02");

    forecast(&mut context, &request).unwrap();

    let last_actual = context.series().get(ymd(2022, 12, 31)).unwrap();
    assert_eq!(last_actual.provenance, Provenance::Actual);
    assert_eq!(last_actual.amount, 50.0);
    assert_eq!(context.series().len(), 365 + 2);
}

#[test]
fn test_generate_without_uncertainty() {
    let context = trained_context();
    let model = context.active_model().unwrap();

    let output = generate(model.as_ref(), ymd(2023, 3, 1), ymd(2023, 3, 3), false).unwrap();
    assert!(output.rows.iter().all(|r| r.lower_bound.is_none() && r.upper_bound.is_none()));

    let json = serde_json::to_value(&output.rows[0]).unwrap();
    assert!(json.get("lower_bound").is_none());
    assert_eq!(json["date"], "2023-03-01");

    let html = forecast_chart(&output, "Sales Forecast").to_html();
    assert!(html.contains("<title>Sales Forecast</title>"));
    assert!(!html.contains("Prediction Interval"));
}

#[test]
fn test_request_defaults_to_uncertainty() {
    let request: ForecastRequest =
        serde_json::from_str(r#"{"start_date": "2023-01-01", "end_date": "2023-01-02"}"#).unwrap();
    assert!(request.include_uncertainty);
}
