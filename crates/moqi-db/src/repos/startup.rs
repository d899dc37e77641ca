//! Startup repository: reference data the pipeline reads.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use moqi_core::entities::Startup;
use moqi_core::ids::PREFIX_STARTUP;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_int, get_opt_string, parse_datetime};
use crate::service::MoqiService;

const SELECT_COLS: &str = "id, name, tagline, description, industry, founding_year, \
                           employee_band, logo_url, created_at";

/// Fields for registering a startup profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewStartup {
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub founding_year: Option<i32>,
    pub employee_band: Option<String>,
    pub logo_url: Option<String>,
}

impl NewStartup {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

fn row_to_startup(row: &libsql::Row) -> Result<Startup, DatabaseError> {
    Ok(Startup {
        id: row.get(0)?,
        name: row.get(1)?,
        tagline: get_opt_string(row, 2)?,
        description: get_opt_string(row, 3)?,
        industry: get_opt_string(row, 4)?,
        founding_year: get_opt_int(row, 5)?,
        employee_band: get_opt_string(row, 6)?,
        logo_url: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl MoqiService {
    pub async fn create_startup(&self, new: &NewStartup) -> Result<Startup, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_STARTUP).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO startups ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ),
                libsql::params![
                    id.as_str(),
                    new.name.as_str(),
                    new.tagline.as_deref(),
                    new.description.as_deref(),
                    new.industry.as_deref(),
                    new.founding_year.map(i64::from),
                    new.employee_band.as_deref(),
                    new.logo_url.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Startup {
            id,
            name: new.name.clone(),
            tagline: new.tagline.clone(),
            description: new.description.clone(),
            industry: new.industry.clone(),
            founding_year: new.founding_year,
            employee_band: new.employee_band.clone(),
            logo_url: new.logo_url.clone(),
            created_at: now,
        })
    }

    pub async fn get_startup(&self, id: &str) -> Result<Startup, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM startups WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_startup(&row)
    }

    /// All startups in registration order.
    pub async fn list_startups(&self) -> Result<Vec<Startup>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM startups ORDER BY rowid"), ())
            .await?;

        let mut startups = Vec::new();
        while let Some(row) = rows.next().await? {
            startups.push(row_to_startup(&row)?);
        }
        Ok(startups)
    }
}
