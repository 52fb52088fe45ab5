//! Guest group entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Guest, GuestGroup};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the guest_groups table.
///
/// Guests are kept as a JSONB array in the order they were entered.
#[derive(Debug, Clone, FromRow)]
pub struct GuestGroupEntity {
    pub id: Uuid,
    pub group_invite: String,
    pub contact: String,
    pub guests: Json<Vec<Guest>>,
    pub rsvp_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GuestGroupEntity> for GuestGroup {
    fn from(entity: GuestGroupEntity) -> Self {
        Self {
            id: entity.id,
            group_invite: entity.group_invite,
            contact: entity.contact,
            guests: entity.guests.0,
            // Rows imported from older sheets may carry '' instead of NULL
            rsvp_code: entity.rsvp_code.filter(|code| !code.is_empty()),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
