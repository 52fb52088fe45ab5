//! Individual guest within a guest group.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Departure time of the shuttle bus to the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusTime {
    #[serde(rename = "16:30")]
    Early,
    #[serde(rename = "17:00")]
    Late,
}

impl BusTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusTime::Early => "16:30",
            BusTime::Late => "17:00",
        }
    }
}

impl fmt::Display for BusTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "16:30" => Ok(BusTime::Early),
            "17:00" => Ok(BusTime::Late),
            other => Err(format!("Unknown bus time: {}", other)),
        }
    }
}

/// A single invited person.
///
/// `coming` is `None` until the guest has answered. `bus_time` is
/// independent of `coming`: a bus request may exist without confirmed
/// attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Guest {
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coming: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus_time: Option<BusTime>,
}

impl Guest {
    /// Creates a guest who has not responded yet.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            coming: None,
            bus_time: None,
        }
    }

    pub fn has_responded(&self) -> bool {
        self.coming.is_some()
    }

    pub fn is_coming(&self) -> bool {
        self.coming == Some(true)
    }

    /// True when the guest is coming and asked for a seat on the bus.
    pub fn needs_bus(&self) -> bool {
        self.is_coming() && self.bus_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_time_serialization() {
        assert_eq!(serde_json::to_string(&BusTime::Early).unwrap(), "\"16:30\"");
        assert_eq!(serde_json::to_string(&BusTime::Late).unwrap(), "\"17:00\"");
        let parsed: BusTime = serde_json::from_str("\"17:00\"").unwrap();
        assert_eq!(parsed, BusTime::Late);
    }

    #[test]
    fn test_bus_time_rejects_unknown_slot() {
        assert!(serde_json::from_str::<BusTime>("\"18:00\"").is_err());
        assert!("18:00".parse::<BusTime>().is_err());
        assert_eq!("16:30".parse::<BusTime>().unwrap(), BusTime::Early);
    }

    #[test]
    fn test_guest_defaults_missing_fields() {
        let guest: Guest = serde_json::from_str(r#"{"full_name":"Ann Lee"}"#).unwrap();
        assert_eq!(guest, Guest::new("Ann Lee"));
        assert!(!guest.has_responded());
    }

    #[test]
    fn test_guest_skips_unset_fields_when_serialized() {
        let json = serde_json::to_value(Guest::new("Ann Lee")).unwrap();
        assert_eq!(json, serde_json::json!({ "full_name": "Ann Lee" }));
    }

    #[test]
    fn test_needs_bus_requires_attendance() {
        let mut guest = Guest::new("Zed");
        guest.bus_time = Some(BusTime::Late);
        assert!(!guest.needs_bus());

        guest.coming = Some(false);
        assert!(!guest.needs_bus());

        guest.coming = Some(true);
        assert!(guest.needs_bus());
    }
}
