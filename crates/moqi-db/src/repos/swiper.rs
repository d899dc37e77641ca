//! Swiper repository.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use moqi_core::entities::Swiper;
use moqi_core::ids::PREFIX_SWIPER;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_int, get_opt_string, parse_datetime};
use crate::service::MoqiService;

const SELECT_COLS: &str = "id, name, age, field_of_study, created_at";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSwiper {
    pub name: String,
    pub age: Option<u32>,
    pub field_of_study: Option<String>,
}

impl NewSwiper {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

fn row_to_swiper(row: &libsql::Row) -> Result<Swiper, DatabaseError> {
    Ok(Swiper {
        id: row.get(0)?,
        name: row.get(1)?,
        age: get_opt_int(row, 2)?,
        field_of_study: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl MoqiService {
    pub async fn create_swiper(&self, new: &NewSwiper) -> Result<Swiper, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SWIPER).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO swipers ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                libsql::params![
                    id.as_str(),
                    new.name.as_str(),
                    new.age.map(i64::from),
                    new.field_of_study.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Swiper {
            id,
            name: new.name.clone(),
            age: new.age,
            field_of_study: new.field_of_study.clone(),
            created_at: now,
        })
    }

    pub async fn get_swiper(&self, id: &str) -> Result<Swiper, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM swipers WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_swiper(&row)
    }
}
