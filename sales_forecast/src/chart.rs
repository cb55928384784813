//! Interactive HTML charts
//!
//! Charts are Plotly figures serialised as JSON and embedded in a standalone
//! HTML page that loads the Plotly runtime from its CDN.

use crate::comparison::ComparisonOutput;
use crate::forecast::ForecastOutput;
use serde::Serialize;
use serde_json::{json, Value};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// A Plotly figure: traces plus layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    /// Title stored in the layout, if any
    pub fn title(&self) -> Option<&str> {
        self.layout.get("title").and_then(Value::as_str)
    }

    /// Render the figure as a self-contained HTML document
    pub fn to_html(&self) -> String {
        // A literal "</" would end the script element early
        let figure = json!({ "data": self.data, "layout": self.layout })
            .to_string()
            .replace("</", "<\\/");
        let title = escape_html(self.title().unwrap_or("Chart"));

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <script src="{PLOTLY_CDN}"></script>
</head>
<body>
    <div id="chart" style="width:100%;height:100vh;"></div>
    <script>
        var figure = {figure};
        Plotly.newPlot("chart", figure.data, figure.layout, {{responsive: true}});
    </script>
</body>
</html>
"#
        )
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Line chart of a forecast, with a shaded band when bounds are present
pub fn forecast_chart(output: &ForecastOutput, title: &str) -> Figure {
    let dates: Vec<String> = output.rows.iter().map(|r| r.date.to_string()).collect();
    let values: Vec<f64> = output.rows.iter().map(|r| r.forecast).collect();

    let mut data = vec![json!({
        "type": "scatter",
        "x": dates,
        "y": values,
        "mode": "lines+markers",
        "name": "Forecast",
        "line": { "color": "green", "width": 2 },
    })];

    let bounds: Option<(Vec<f64>, Vec<f64>)> = output
        .rows
        .iter()
        .map(|r| r.lower_bound.zip(r.upper_bound))
        .collect::<Option<Vec<_>>>()
        .map(|pairs| pairs.into_iter().unzip());

    if let (true, Some((lower, upper))) = (output.include_uncertainty, bounds) {
        data.push(json!({
            "type": "scatter",
            "x": dates,
            "y": upper,
            "mode": "lines",
            "line": { "width": 0 },
            "showlegend": false,
            "hoverinfo": "skip",
        }));
        data.push(json!({
            "type": "scatter",
            "x": dates,
            "y": lower,
            "mode": "lines",
            "line": { "width": 0 },
            "fill": "tonexty",
            "fillcolor": "rgba(0,100,80,0.2)",
            "name": "Prediction Interval",
        }));
    }

    Figure {
        data,
        layout: json!({
            "title": title,
            "xaxis": { "title": "Date" },
            "yaxis": { "title": "Forecasted Sales (€)" },
            "hovermode": "x unified",
            "template": "plotly_white",
        }),
    }
}

/// One line per compared year, plotted against the day of month
pub fn comparison_chart(output: &ComparisonOutput) -> Figure {
    let data = output
        .series
        .iter()
        .map(|series| {
            let days: Vec<u32> = series.points.iter().map(|p| p.day).collect();
            let amounts: Vec<f64> = series.points.iter().map(|p| p.amount).collect();

            let mut trace = json!({
                "type": "scatter",
                "x": days,
                "y": amounts,
                "mode": "lines+markers",
                "name": series.label,
                "line": {
                    "color": series.style.color,
                    "dash": series.style.dash,
                    "width": series.style.width,
                },
            });
            if let Some((symbol, size)) = &series.style.marker {
                trace["marker"] = json!({ "symbol": symbol, "size": size });
            }
            trace
        })
        .collect();

    Figure {
        data,
        layout: json!({
            "title": format!("Daily Sales Comparison - {}", output.month_name),
            "xaxis": { "title": "Day of Month", "tickmode": "linear", "tick0": 1, "dtick": 1 },
            "yaxis": { "title": "Sales (€)" },
            "legend": { "title": { "text": "Year" } },
            "hovermode": "x unified",
            "template": "plotly_white",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastSummary;
    use crate::models::ForecastRow;
    use chrono::NaiveDate;

    fn output(include_uncertainty: bool) -> ForecastOutput {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bounds = include_uncertainty.then_some((90.0, 110.0));
        ForecastOutput {
            rows: vec![ForecastRow::new(date, 100.0, bounds)],
            summary: ForecastSummary {
                total_days: 1,
                average_daily_forecast: 100.0,
                total_forecast: 100.0,
                min_forecast: 100.0,
                max_forecast: 100.0,
                std_forecast: 0.0,
            },
            include_uncertainty,
        }
    }

    #[test]
    fn test_band_only_with_uncertainty() {
        assert_eq!(forecast_chart(&output(true), "t").data.len(), 3);
        assert_eq!(forecast_chart(&output(false), "t").data.len(), 1);
    }

    #[test]
    fn test_html_escapes_title_and_script() {
        let html = forecast_chart(&output(false), "</script><b>&").to_html();
        assert!(html.contains("<title>&lt;/script&gt;&lt;b&gt;&amp;</title>"));
        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains("Plotly.newPlot"));
    }
}
