use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An end user browsing and rating startups.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Swiper {
    pub id: String,
    pub name: String,
    pub age: Option<u32>,
    pub field_of_study: Option<String>,
    pub created_at: DateTime<Utc>,
}
