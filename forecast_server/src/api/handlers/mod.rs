pub mod comparison;
pub mod forecast;
pub mod health;
pub mod training;
pub mod upload;

pub use comparison::forecast_comparison;
pub use forecast::forecast;
pub use health::{health_check, service_info};
pub use training::train_model;
pub use upload::upload_data;

use serde::Deserialize;

/// `?format=` query parameter selecting the response representation
#[derive(Debug, Default, Deserialize)]
pub struct OutputFormat {
    pub format: Option<String>,
}

impl OutputFormat {
    /// Whether structured JSON was requested instead of an HTML chart
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}
