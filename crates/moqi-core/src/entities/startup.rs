use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A registered company profile that swipers rate. Read-only to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Startup {
    pub id: String,
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub founding_year: Option<i32>,
    /// Employee-count band, e.g. `"1-10"`.
    pub employee_band: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
