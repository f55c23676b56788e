//! Actor profile shown after sign-in.

use serde::{Deserialize, Serialize};

/// Subset of `app.bsky.actor.defs#profileViewDetailed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Profile {
    pub did: String,
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub follows_count: u64,
    #[serde(default)]
    pub posts_count: u64,
}

impl Profile {
    /// Returns display name, falling back to the handle.
    #[must_use]
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_profile() {
        let json = r#"{
            "did": "did:plc:x",
            "handle": "alice.bsky.social",
            "displayName": "Alice",
            "followersCount": 12,
            "followsCount": 3,
            "postsCount": 40,
            "labels": []
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.name(), "Alice");
        assert_eq!(profile.followers_count, 12);
        assert!(profile.description.is_none());
    }

    #[test]
    fn test_name_falls_back_to_handle() {
        let profile = Profile {
            handle: "alice.bsky.social".into(),
            display_name: Some("  ".into()),
            ..Profile::default()
        };

        assert_eq!(profile.name(), "alice.bsky.social");
    }
}
