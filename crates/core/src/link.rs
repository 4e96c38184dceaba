//! Content locker link domain types.
//!
//! A content locker link is an external URL a visitor is sent through before
//! a coupon code is considered unlocked. Purely advisory: nothing verifies
//! completion, and coupons reference links weakly by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::LinkId;

/// A content locker link (domain type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentLockerLink {
    pub id: LinkId,
    pub name: String,
    pub url: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLink {
    pub name: String,
    pub url: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// Partial update applied onto an existing link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLink {
    pub name: Option<String>,
    pub url: Option<String>,
    pub active: Option<bool>,
}

/// Export/import shape: a link minus identity and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkExport {
    pub name: String,
    pub url: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl From<ContentLockerLink> for LinkExport {
    fn from(l: ContentLockerLink) -> Self {
        Self {
            name: l.name,
            url: l.url,
            active: l.active,
        }
    }
}

impl From<LinkExport> for NewLink {
    fn from(e: LinkExport) -> Self {
        Self {
            name: e.name,
            url: e.url,
            active: e.active,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_link_defaults_active() {
        let link: NewLink = serde_json::from_value(serde_json::json!({
            "name": "Survey gate",
            "url": "https://locker.example/gate"
        }))
        .unwrap();
        assert!(link.active);
    }

    #[test]
    fn test_export_strips_identity() {
        let link = ContentLockerLink {
            id: LinkId::new(3),
            name: "Survey gate".to_owned(),
            url: "https://locker.example/gate".to_owned(),
            active: false,
            created_at: Utc::now(),
        };
        let export = LinkExport::from(link);
        let json = serde_json::to_value(&export).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("created_at"));
        assert!(!export.active);
    }
}
