use approx::assert_relative_eq;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use sales_forecast::data::DailyRecord;
use sales_forecast::models::exponential_smoothing::ExponentialSmoothing;
use sales_forecast::models::seasonal::{SeasonalConfig, SeasonalRegression};
use sales_forecast::models::{ForecastModel, ModelSpec, TrainedForecastModel};
use sales_forecast::utils::date_range;
use sales_forecast::ForecastError;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn history(start: NaiveDate, days: u64, value: impl Fn(usize, NaiveDate) -> f64) -> Vec<DailyRecord> {
    (0..days)
        .map(|i| {
            let date = start + Days::new(i);
            DailyRecord::actual(date, value(i as usize, date))
        })
        .collect()
}

#[test]
fn test_seasonal_constant_series() {
    let data = history(ymd(2021, 1, 1), 730, |_, _| 100.0);
    let trained = SeasonalRegression::default().fit(&data).unwrap();

    assert_eq!(trained.training_days(), 730);
    assert_eq!(trained.last_training_date(), ymd(2022, 12, 31));
    assert_eq!(trained.seasonality_names(), vec!["yearly", "weekly", "monthly"]);

    let dates = date_range(ymd(2023, 1, 1), ymd(2023, 1, 10));
    let rows = trained.predict(&dates, true).unwrap();
    assert_eq!(rows.len(), 10);
    for row in &rows {
        assert_relative_eq!(row.forecast, 100.0, epsilon = 1e-3);
        assert!(row.lower_bound.unwrap() <= row.forecast);
        assert!(row.upper_bound.unwrap() >= row.forecast);
    }
}

#[test]
fn test_seasonal_learns_weekly_pattern() {
    let data = history(ymd(2021, 1, 1), 730, |_, date| {
        if date.weekday() == Weekday::Sat {
            150.0
        } else {
            100.0
        }
    });
    let trained = SeasonalRegression::default().fit(&data).unwrap();

    // 2023-01-07 is a Saturday, 2023-01-10 a Tuesday
    let rows = trained
        .predict(&[ymd(2023, 1, 7), ymd(2023, 1, 10)], false)
        .unwrap();
    assert!(rows[0].forecast > rows[1].forecast + 30.0);
    assert!(rows[0].lower_bound.is_none());
    assert_eq!(rows[0].day_of_week, "Saturday");
    assert_eq!(rows[1].month, "January");
    assert_eq!(rows[1].year, 2023);
}

#[test]
fn test_seasonal_interval_widens_with_horizon() {
    let data = history(ymd(2021, 1, 1), 730, |i, _| 100.0 + ((i * 37) % 11) as f64);
    let trained = SeasonalRegression::default().fit(&data).unwrap();
    assert!(trained.residual_std() > 0.0);

    let rows = trained
        .predict(&[ymd(2023, 1, 1), ymd(2024, 1, 1)], true)
        .unwrap();
    let width = |i: usize| rows[i].upper_bound.unwrap() - rows[i].lower_bound.unwrap();
    assert!(width(1) > width(0));
}

#[test]
fn test_seasonal_needs_two_rows() {
    let data = history(ymd(2023, 1, 1), 1, |_, _| 1.0);
    assert!(matches!(
        SeasonalRegression::default().fit(&data),
        Err(ForecastError::TrainingFailed(_))
    ));
}

#[test]
fn test_seasonal_config_validation() {
    let config = SeasonalConfig {
        changepoint_prior_scale: 0.0,
        ..SeasonalConfig::default()
    };
    assert!(matches!(
        SeasonalRegression::new(config),
        Err(ForecastError::InvalidParameter(_))
    ));

    let config = SeasonalConfig {
        interval_width: 1.5,
        ..SeasonalConfig::default()
    };
    assert!(SeasonalRegression::new(config).is_err());
}

#[test]
fn test_exponential_smoothing_constant_forecast() {
    let data = history(ymd(2023, 1, 1), 30, |_, _| 50.0);
    let model = ExponentialSmoothing::new(0.3, 0.8).unwrap();
    let trained = model.fit(&data).unwrap();

    let rows = trained
        .predict(&date_range(ymd(2023, 1, 31), ymd(2023, 2, 4)), true)
        .unwrap();
    assert_eq!(rows.len(), 5);
    for row in rows {
        assert_relative_eq!(row.forecast, 50.0);
        assert_relative_eq!(row.lower_bound.unwrap(), 50.0);
    }
}

#[test]
fn test_model_spec_erases_type() {
    let data = history(ymd(2023, 1, 1), 60, |i, _| 10.0 + i as f64);

    let specs = vec![
        ModelSpec::default(),
        ModelSpec::Smoothing(ExponentialSmoothing::new(0.5, 0.8).unwrap()),
    ];
    for spec in specs {
        let trained = spec.fit_shared(&data).unwrap();
        assert_eq!(trained.name(), spec.name());
        assert_eq!(trained.training_days(), 60);
        assert_eq!(trained.predict(&[ymd(2023, 3, 10)], false).unwrap().len(), 1);
    }
}
