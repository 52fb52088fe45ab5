//! Guest group: the unit of invitation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::guest::{BusTime, Guest};

/// A group of guests invited together and sharing one RSVP code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GuestGroup {
    pub id: Uuid,
    pub group_invite: String,
    #[serde(default)]
    pub contact: String,
    /// Display order.
    #[serde(default)]
    pub guests: Vec<Guest>,
    /// Set at most once.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub rsvp_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let code = Option::<String>::deserialize(deserializer)?;
    Ok(code.filter(|c| !c.is_empty()))
}

impl GuestGroup {
    pub fn has_code(&self) -> bool {
        self.rsvp_code.is_some()
    }

    /// A group has responded once any of its guests has a defined `coming`.
    pub fn has_responded(&self) -> bool {
        self.guests.iter().any(Guest::has_responded)
    }

    pub fn party_size(&self) -> usize {
        self.guests.len()
    }

    pub fn coming_count(&self) -> usize {
        self.guests.iter().filter(|g| g.is_coming()).count()
    }

    /// True if any guest asked for a bus, attending or not.
    pub fn bus_requested(&self) -> bool {
        self.guests.iter().any(|g| g.bus_time.is_some())
    }

    /// Counts bus seats per departure among guests who are coming.
    pub fn bus_counts(&self) -> (usize, usize) {
        self.guests
            .iter()
            .filter(|g| g.needs_bus())
            .fold((0, 0), |(early, late), g| match g.bus_time {
                Some(BusTime::Early) => (early + 1, late),
                Some(BusTime::Late) => (early, late + 1),
                None => (early, late),
            })
    }
}

/// A guest group as handed to the store for creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuestGroup {
    pub group_invite: String,
    pub contact: String,
    pub guests: Vec<Guest>,
}

/// Guest entry in a create request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct NewGuest {
    #[validate(length(min = 1, max = 100, message = "Guest name must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub full_name: String,
}

/// Request to add a guest group.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct CreateGuestGroupRequest {
    #[validate(length(min = 1, max = 100, message = "Group name must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub group_invite: String,

    #[validate(length(min = 1, max = 50, message = "Contact must be 1-50 characters"))]
    #[validate(custom(function = "shared::validation::validate_contact"))]
    pub contact: String,

    #[serde(default)]
    #[validate(length(max = 20, message = "A group can have at most 20 guests"))]
    #[validate(nested)]
    pub guests: Vec<NewGuest>,
}

impl CreateGuestGroupRequest {
    /// Converts a validated request into store input. Names are trimmed.
    pub fn into_new_group(self) -> NewGuestGroup {
        NewGuestGroup {
            group_invite: self.group_invite.trim().to_string(),
            contact: self.contact.trim().to_string(),
            guests: self
                .guests
                .into_iter()
                .map(|g| Guest::new(g.full_name.trim()))
                .collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Builds a stored group with the given guests.
    pub fn group(name: &str, guests: Vec<Guest>) -> GuestGroup {
        let now = Utc::now();
        GuestGroup {
            id: Uuid::new_v4(),
            group_invite: name.to_string(),
            contact: "600 700 800".to_string(),
            guests,
            rsvp_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn guest(name: &str, coming: Option<bool>, bus_time: Option<BusTime>) -> Guest {
        Guest {
            full_name: name.to_string(),
            coming,
            bus_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{group, guest};
    use super::*;

    #[test]
    fn test_has_responded() {
        let pending = group("Kowalski", vec![guest("Jan", None, None)]);
        assert!(!pending.has_responded());

        let declined = group("Nowak", vec![guest("Ewa", Some(false), None)]);
        assert!(declined.has_responded());
    }

    #[test]
    fn test_sparse_document_is_normalized() {
        let g: GuestGroup = serde_json::from_value(serde_json::json!({
            "id": uuid::Uuid::new_v4(),
            "group_invite": "Legacy",
            "rsvp_code": "",
            "created_at": "2026-05-01T12:00:00Z",
            "updated_at": "2026-05-01T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(g.contact, "");
        assert!(g.guests.is_empty());
        assert_eq!(g.rsvp_code, None);
    }

    #[test]
    fn test_empty_group_has_not_responded() {
        let empty = group("Empty", vec![]);
        assert!(!empty.has_responded());
        assert_eq!(empty.party_size(), 0);
    }

    #[test]
    fn test_bus_counts_only_attending_guests() {
        let g = group(
            "Smith",
            vec![
                guest("A", Some(true), Some(BusTime::Early)),
                guest("B", Some(false), Some(BusTime::Late)),
                guest("C", Some(true), None),
            ],
        );
        assert_eq!(g.bus_counts(), (1, 0));
        assert!(g.bus_requested());
        assert_eq!(g.coming_count(), 2);
    }

    #[test]
    fn test_create_request_valid() {
        let req: CreateGuestGroupRequest = serde_json::from_value(serde_json::json!({
            "group_invite": "  The Smiths ",
            "contact": "+1 555 123 4567",
            "guests": [{ "full_name": " John Smith " }, { "full_name": "Jane Smith" }]
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let new_group = req.into_new_group();
        assert_eq!(new_group.group_invite, "The Smiths");
        assert_eq!(new_group.guests[0], Guest::new("John Smith"));
        assert_eq!(new_group.guests.len(), 2);
    }

    #[test]
    fn test_create_request_without_guests_is_valid() {
        let req: CreateGuestGroupRequest = serde_json::from_value(serde_json::json!({
            "group_invite": "The Smiths",
            "contact": "555 1234"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.guests.is_empty());
    }

    #[test]
    fn test_create_request_missing_name_rejected() {
        let req: CreateGuestGroupRequest = serde_json::from_value(serde_json::json!({
            "group_invite": "   ",
            "contact": "555 1234",
            "guests": []
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("group_invite"));
    }

    #[test]
    fn test_create_request_invalid_guest_rejected() {
        let req: CreateGuestGroupRequest = serde_json::from_value(serde_json::json!({
            "group_invite": "The Smiths",
            "contact": "555 1234",
            "guests": [{ "full_name": "" }]
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_too_many_guests_rejected() {
        let guests: Vec<_> = (0..21)
            .map(|i| serde_json::json!({ "full_name": format!("Guest {}", i) }))
            .collect();
        let req: CreateGuestGroupRequest = serde_json::from_value(serde_json::json!({
            "group_invite": "Big Family",
            "contact": "555 1234",
            "guests": guests
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("guests"));
    }

    #[test]
    fn test_create_request_unknown_field_rejected() {
        let result = serde_json::from_value::<CreateGuestGroupRequest>(serde_json::json!({
            "group_invite": "The Smiths",
            "contact": "555 1234",
            "rsvp_code": "sneaky00"
        }));
        assert!(result.is_err());
    }
}
