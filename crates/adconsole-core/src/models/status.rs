use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Processing status of an asset.
///
/// The canonical wire names are `pending`, `processing`, `ready` and `failed`.
/// Older backends report `uploaded` and `processed`; those are read as
/// `Pending` and `Ready`. Anything else decodes to the default (`Pending`)
/// so an unexpected value from the backend never breaks a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    #[default]
    Pending,
    Processing,
    Ready,
    Failed,
}

impl AssetStatus {
    pub const ALL: [AssetStatus; 4] = [
        AssetStatus::Pending,
        AssetStatus::Processing,
        AssetStatus::Ready,
        AssetStatus::Failed,
    ];

    /// Strict parse of a canonical name or a legacy alias.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" | "uploaded" => Some(AssetStatus::Pending),
            "processing" => Some(AssetStatus::Processing),
            "ready" | "processed" => Some(AssetStatus::Ready),
            "failed" => Some(AssetStatus::Failed),
            _ => None,
        }
    }

    /// Parse that never fails; unknown values map to the default.
    pub fn parse_lenient(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Pending => "pending",
            AssetStatus::Processing => "processing",
            AssetStatus::Ready => "ready",
            AssetStatus::Failed => "failed",
        }
    }

    /// Whether the backend is still working on the asset. Watchers keep
    /// polling while this holds.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, AssetStatus::Pending | AssetStatus::Processing)
    }

    pub fn badge(&self) -> StatusBadge {
        StatusBadge::for_status(*self)
    }
}

impl Display for AssetStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "Invalid status '{}'. Must be one of: pending, processing, ready, failed",
                s
            )
        })
    }
}

impl<'de> Deserialize<'de> for AssetStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Numbers, objects and null all fall back to the default.
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw.as_str().map(Self::parse_lenient).unwrap_or_default())
    }
}

/// Display attributes for a status: label, icon and styling class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub icon: &'static str,
    pub class: &'static str,
}

const BADGES: [(AssetStatus, StatusBadge); 4] = [
    (
        AssetStatus::Pending,
        StatusBadge {
            label: "Pending",
            icon: "⏳",
            class: "status-pending",
        },
    ),
    (
        AssetStatus::Processing,
        StatusBadge {
            label: "Processing",
            icon: "⚙️",
            class: "status-processing",
        },
    ),
    (
        AssetStatus::Ready,
        StatusBadge {
            label: "Ready",
            icon: "✓",
            class: "status-ready",
        },
    ),
    (
        AssetStatus::Failed,
        StatusBadge {
            label: "Failed",
            icon: "✗",
            class: "status-failed",
        },
    ),
];

impl StatusBadge {
    /// Entry used for anything the table does not know about.
    pub fn default_entry() -> StatusBadge {
        Self::for_status(AssetStatus::default())
    }

    pub fn for_status(status: AssetStatus) -> StatusBadge {
        BADGES
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, badge)| *badge)
            .unwrap_or(BADGES[0].1)
    }

    /// Badge for a raw status string as received from the backend.
    pub fn from_wire(value: &str) -> StatusBadge {
        match AssetStatus::parse(value) {
            Some(status) => Self::for_status(status),
            None => Self::default_entry(),
        }
    }
}

impl Display for StatusBadge {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.icon, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_aliases_map_to_canonical_values() {
        assert_eq!(AssetStatus::parse("uploaded"), Some(AssetStatus::Pending));
        assert_eq!(AssetStatus::parse("processed"), Some(AssetStatus::Ready));
        assert_eq!(AssetStatus::parse(" Processing "), Some(AssetStatus::Processing));
        assert_eq!(AssetStatus::parse("archived"), None);
    }

    #[test]
    fn unknown_status_deserializes_to_default() {
        let status: AssetStatus = serde_json::from_str("\"transcoding\"").unwrap();
        assert_eq!(status, AssetStatus::Pending);

        let status: AssetStatus = serde_json::from_str("null").unwrap();
        assert_eq!(status, AssetStatus::Pending);
    }

    #[test]
    fn serializes_canonical_names() {
        assert_eq!(
            serde_json::to_string(&AssetStatus::Ready).unwrap(),
            "\"ready\""
        );
        assert_eq!(AssetStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn in_progress_set() {
        assert!(AssetStatus::Pending.is_in_progress());
        assert!(AssetStatus::Processing.is_in_progress());
        assert!(!AssetStatus::Ready.is_in_progress());
        assert!(!AssetStatus::Failed.is_in_progress());
    }

    #[test]
    fn badge_table_covers_every_status() {
        for status in AssetStatus::ALL {
            let badge = StatusBadge::for_status(status);
            assert_eq!(badge.class, format!("status-{}", status));
        }
        assert_eq!(StatusBadge::for_status(AssetStatus::Ready).icon, "✓");
        assert_eq!(StatusBadge::for_status(AssetStatus::Failed).label, "Failed");
    }

    #[test]
    fn badge_falls_back_to_default_entry() {
        for raw in ["", "archived", "PROCESSING_V2", "🤷", "null"] {
            assert_eq!(StatusBadge::from_wire(raw), StatusBadge::default_entry());
        }
        assert_eq!(StatusBadge::default_entry().label, "Pending");
        assert_eq!(StatusBadge::from_wire("processed").label, "Ready");
    }

    #[test]
    fn from_str_reports_allowed_values() {
        let err = "bogus".parse::<AssetStatus>().unwrap_err();
        assert!(err.contains("pending, processing, ready, failed"));
    }
}
