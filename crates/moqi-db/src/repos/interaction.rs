//! Interaction repository: one row per (swiper, startup), created at swipe
//! time and updated in place afterwards.

use chrono::Utc;

use moqi_core::entities::{Interaction, InteractionFilter, InteractionPatch, NewInteraction};
use moqi_core::ids::PREFIX_INTERACTION;

use crate::error::{DatabaseError, is_unique_violation};
use crate::helpers::{get_int, parse_datetime, parse_enum};
use crate::service::MoqiService;

const SELECT_COLS: &str = "id, swiper_id, startup_id, has_liked, coin_allocation, \
                           feedback_preference, created_at, updated_at";

/// Upper bound enforced on `coin_allocation` before it reaches SQL.
const MAX_COINS: u32 = 100;

fn row_to_interaction(row: &libsql::Row) -> Result<Interaction, DatabaseError> {
    Ok(Interaction {
        id: row.get(0)?,
        swiper_id: row.get(1)?,
        startup_id: row.get(2)?,
        has_liked: row.get::<i64>(3)? != 0,
        coin_allocation: get_int(row, 4)?,
        feedback_preference: parse_enum(&row.get::<String>(5)?)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

fn check_coins(coins: u32) -> Result<(), DatabaseError> {
    if coins > MAX_COINS {
        return Err(DatabaseError::InvalidState(format!(
            "coin_allocation {coins} exceeds {MAX_COINS}"
        )));
    }
    Ok(())
}

impl MoqiService {
    /// Insert a new interaction row.
    ///
    /// Returns `DatabaseError::Conflict` if the pair already has a row.
    pub async fn create_interaction(
        &self,
        new: &NewInteraction,
    ) -> Result<Interaction, DatabaseError> {
        check_coins(new.coin_allocation)?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_INTERACTION).await?;

        let result = self
            .db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO interactions ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                libsql::params![
                    id.as_str(),
                    new.swiper_id.as_str(),
                    new.startup_id.as_str(),
                    i64::from(new.has_liked),
                    i64::from(new.coin_allocation),
                    new.feedback_preference.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await;

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(DatabaseError::Conflict {
                    swiper_id: new.swiper_id.clone(),
                    startup_id: new.startup_id.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(
            interaction_id = %id,
            swiper_id = %new.swiper_id,
            startup_id = %new.startup_id,
            has_liked = new.has_liked,
            "created interaction"
        );

        Ok(Interaction {
            id,
            swiper_id: new.swiper_id.clone(),
            startup_id: new.startup_id.clone(),
            has_liked: new.has_liked,
            coin_allocation: new.coin_allocation,
            feedback_preference: new.feedback_preference,
            created_at: now,
            updated_at: now,
        })
    }

    /// Insert the row, or overwrite the existing row for the same pair in
    /// place. The row id and `created_at` of an existing row are kept.
    pub async fn upsert_interaction(
        &self,
        new: &NewInteraction,
    ) -> Result<Interaction, DatabaseError> {
        check_coins(new.coin_allocation)?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_INTERACTION).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO interactions ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT (swiper_id, startup_id) DO UPDATE SET
                         has_liked = excluded.has_liked,
                         coin_allocation = excluded.coin_allocation,
                         feedback_preference = excluded.feedback_preference,
                         updated_at = excluded.updated_at"
                ),
                libsql::params![
                    id.as_str(),
                    new.swiper_id.as_str(),
                    new.startup_id.as_str(),
                    i64::from(new.has_liked),
                    i64::from(new.coin_allocation),
                    new.feedback_preference.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.find_interaction(&new.swiper_id, &new.startup_id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    pub async fn get_interaction(&self, id: &str) -> Result<Interaction, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM interactions WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_interaction(&row)
    }

    /// The row for a (swiper, startup) pair, if any.
    pub async fn find_interaction(
        &self,
        swiper_id: &str,
        startup_id: &str,
    ) -> Result<Option<Interaction>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM interactions WHERE swiper_id = ?1 AND startup_id = ?2"
                ),
                [swiper_id, startup_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_interaction(&row)?)),
            None => Ok(None),
        }
    }

    /// Apply a partial update. Returns the updated row.
    ///
    /// An empty patch returns the current row without writing.
    pub async fn update_interaction(
        &self,
        id: &str,
        patch: &InteractionPatch,
    ) -> Result<Interaction, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(has_liked) = patch.has_liked {
            sets.push(format!("has_liked = ?{idx}"));
            params.push(i64::from(has_liked).into());
            idx += 1;
        }
        if let Some(coins) = patch.coin_allocation {
            check_coins(coins)?;
            sets.push(format!("coin_allocation = ?{idx}"));
            params.push(i64::from(coins).into());
            idx += 1;
        }
        if let Some(pref) = patch.feedback_preference {
            sets.push(format!("feedback_preference = ?{idx}"));
            params.push(pref.as_str().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_interaction(id).await;
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!("UPDATE interactions SET {} WHERE id = ?{idx}", sets.join(", "));
        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }

        tracing::debug!(interaction_id = id, ?patch, "updated interaction");
        self.get_interaction(id).await
    }

    /// Rows for one swiper or one startup, in creation order.
    pub async fn list_interactions(
        &self,
        filter: &InteractionFilter,
    ) -> Result<Vec<Interaction>, DatabaseError> {
        let (column, value) = match filter {
            InteractionFilter::Swiper(id) => ("swiper_id", id.as_str()),
            InteractionFilter::Startup(id) => ("startup_id", id.as_str()),
        };
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM interactions WHERE {column} = ?1 ORDER BY rowid"
                ),
                [value],
            )
            .await?;

        let mut interactions = Vec::new();
        while let Some(row) = rows.next().await? {
            interactions.push(row_to_interaction(&row)?);
        }
        Ok(interactions)
    }

    /// IDs of every startup the swiper already has a row for.
    pub async fn list_swiped_startup_ids(
        &self,
        swiper_id: &str,
    ) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT startup_id FROM interactions WHERE swiper_id = ?1 ORDER BY rowid",
                [swiper_id],
            )
            .await?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<String>(0)?);
        }
        Ok(ids)
    }
}
