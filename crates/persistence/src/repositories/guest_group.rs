//! Guest group repository for database operations.

use async_trait::async_trait;
use domain::models::{Guest, GuestGroup, NewGuestGroup};
use domain::services::{CodeWrite, GuestStore, StoreError};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::entities::GuestGroupEntity;
use crate::metrics::{record_pool_metrics, QueryTimer};

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed guest store.
#[derive(Clone)]
pub struct GuestGroupRepository {
    pool: PgPool,
}

impl GuestGroupRepository {
    /// Creates a new GuestGroupRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// List all guest groups in creation order.
    pub async fn list_all(&self) -> Result<Vec<GuestGroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_guest_groups");
        let result = sqlx::query_as::<_, GuestGroupEntity>(
            r#"
            SELECT id, group_invite, contact, guests, rsvp_code, created_at, updated_at
            FROM guest_groups
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a guest group by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GuestGroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_guest_group_by_id");
        let result = sqlx::query_as::<_, GuestGroupEntity>(
            r#"
            SELECT id, group_invite, contact, guests, rsvp_code, created_at, updated_at
            FROM guest_groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a guest group by its RSVP code.
    pub async fn find_by_rsvp_code(
        &self,
        code: &str,
    ) -> Result<Option<GuestGroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_guest_group_by_code");
        let result = sqlx::query_as::<_, GuestGroupEntity>(
            r#"
            SELECT id, group_invite, contact, guests, rsvp_code, created_at, updated_at
            FROM guest_groups
            WHERE rsvp_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a new guest group without a code.
    pub async fn insert(&self, group: &NewGuestGroup) -> Result<GuestGroupEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_guest_group");
        let result = sqlx::query_as::<_, GuestGroupEntity>(
            r#"
            INSERT INTO guest_groups (id, group_invite, contact, guests)
            VALUES ($1, $2, $3, $4)
            RETURNING id, group_invite, contact, guests, rsvp_code, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&group.group_invite)
        .bind(&group.contact)
        .bind(Json(&group.guests))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set the RSVP code if the group has none yet.
    ///
    /// Returns `None` when no row matched, either because the group is
    /// missing or because it already carries a code.
    pub async fn set_code_where_absent(
        &self,
        id: Uuid,
        code: &str,
    ) -> Result<Option<GuestGroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_guest_group_code");
        let result = sqlx::query_as::<_, GuestGroupEntity>(
            r#"
            UPDATE guest_groups
            SET rsvp_code = $2, updated_at = NOW()
            WHERE id = $1 AND (rsvp_code IS NULL OR rsvp_code = '')
            RETURNING id, group_invite, contact, guests, rsvp_code, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace the guest list of a group.
    pub async fn update_guests(
        &self,
        id: Uuid,
        guests: &[Guest],
    ) -> Result<Option<GuestGroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_guest_group_guests");
        let result = sqlx::query_as::<_, GuestGroupEntity>(
            r#"
            UPDATE guest_groups
            SET guests = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, group_invite, contact, guests, rsvp_code, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(Json(guests))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    error!(error = %err, "Guest store query failed");
    StoreError::Unavailable(err.to_string())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

#[async_trait]
impl GuestStore for GuestGroupRepository {
    async fn list_groups(&self) -> Result<Vec<GuestGroup>, StoreError> {
        let rows = self.list_all().await.map_err(unavailable)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_group(&self, id: Uuid) -> Result<Option<GuestGroup>, StoreError> {
        let row = self.find_by_id(id).await.map_err(unavailable)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<GuestGroup>, StoreError> {
        let row = self.find_by_rsvp_code(code).await.map_err(unavailable)?;
        Ok(row.map(Into::into))
    }

    async fn create_group(&self, group: NewGuestGroup) -> Result<GuestGroup, StoreError> {
        let row = self.insert(&group).await.map_err(unavailable)?;
        Ok(row.into())
    }

    async fn set_code_if_absent(&self, id: Uuid, code: &str) -> Result<CodeWrite, StoreError> {
        match self.set_code_where_absent(id, code).await {
            Ok(Some(row)) => Ok(CodeWrite::Written(row.into())),
            Ok(None) => {
                // Nothing matched: tell a missing group from one already coded
                let current = self
                    .find_by_id(id)
                    .await
                    .map_err(unavailable)?
                    .ok_or(StoreError::NotFound(id))?;
                Ok(CodeWrite::AlreadySet(current.into()))
            }
            Err(e) if is_unique_violation(&e) => Err(StoreError::CodeCollision),
            Err(e) => Err(unavailable(e)),
        }
    }

    async fn record_responses(
        &self,
        id: Uuid,
        guests: Vec<Guest>,
    ) -> Result<GuestGroup, StoreError> {
        let row = self
            .update_guests(id, &guests)
            .await
            .map_err(unavailable)?
            .ok_or(StoreError::NotFound(id))?;
        Ok(row.into())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let timer = QueryTimer::new("ping");
        let result = sqlx::query("SELECT 1").execute(&self.pool).await;
        timer.record();
        record_pool_metrics(&self.pool);
        result.map(|_| ()).map_err(unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_collisions() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn test_pool_errors_map_to_unavailable() {
        assert!(matches!(
            unavailable(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
    }
}
