//! Built-in profiles — named, mutually exclusive override bundles.
//!
//! At most one profile is active at a time. Activating a profile stashes the
//! prior values of exactly the keys it overrides so deactivation restores
//! them precisely. Each profile may declare one side affordance: an extra
//! toggle that is only meaningful while the profile is active and is forced
//! off when it deactivates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::keys::ToggleKey;

/// Identifier of a built-in profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileId {
    /// Spotlight-and-carousel home feed, distractions trimmed.
    Cinema,
    /// Watch-page tunnel vision: nothing around the player.
    Focus,
    /// Quiet browsing: shorts, hype, and promos gone.
    Zen,
}

impl ProfileId {
    pub const ALL: &'static [ProfileId] = &[ProfileId::Cinema, ProfileId::Focus, ProfileId::Zen];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ProfileId::Cinema => "cinema",
            ProfileId::Focus => "focus",
            ProfileId::Zen => "zen",
        }
    }

    pub fn parse(name: &str) -> Option<ProfileId> {
        ProfileId::ALL.iter().copied().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileId {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileId::parse(s).ok_or_else(|| SettingsError::UnknownProfile(s.to_string()))
    }
}

/// A named bundle of toggle overrides.
#[derive(Clone, Copy, Debug)]
pub struct Profile {
    pub id: ProfileId,
    pub label: &'static str,
    pub description: &'static str,
    /// Overrides applied on activation; exactly these keys are stashed.
    pub overrides: &'static [(ToggleKey, bool)],
    /// Extra toggle only available while this profile is active.
    pub side_toggle: Option<ToggleKey>,
}

const CINEMA: Profile = Profile {
    id: ProfileId::Cinema,
    label: "Cinema",
    description: "Spotlight one video on the home feed, carousel for the rest",
    overrides: &[
        (ToggleKey::HideHoverPreview, true),
        (ToggleKey::HideShortsShelf, true),
        (ToggleKey::HideFilterChips, true),
        (ToggleKey::HideTopBanner, true),
        (ToggleKey::HidePromotedVideos, true),
    ],
    side_toggle: Some(ToggleKey::CinemaAutoRotate),
};

const FOCUS: Profile = Profile {
    id: ProfileId::Focus,
    label: "Focus",
    description: "Just the player: no related, comments, or end-screen noise",
    overrides: &[
        (ToggleKey::HideRelatedVideos, true),
        (ToggleKey::HideComments, true),
        (ToggleKey::HideEndScreenCards, true),
        (ToggleKey::HideEndScreenFeed, true),
        (ToggleKey::HideInfoCards, true),
        (ToggleKey::HideMiniPlayer, true),
    ],
    side_toggle: Some(ToggleKey::FocusDimChrome),
};

const ZEN: Profile = Profile {
    id: ProfileId::Zen,
    label: "Zen",
    description: "Quiet feeds: shorts, hype banners, and promos hidden",
    overrides: &[
        (ToggleKey::HideShorts, true),
        (ToggleKey::HideShortsShelf, true),
        (ToggleKey::HideBreakingNews, true),
        (ToggleKey::HideCommunityPosts, true),
        (ToggleKey::HideSurveys, true),
        (ToggleKey::HidePromotedVideos, true),
    ],
    side_toggle: Some(ToggleKey::ZenHideBadges),
};

/// The built-in profile catalog.
pub fn catalog() -> &'static [Profile] {
    &[CINEMA, FOCUS, ZEN]
}

/// Look up a profile by id.
pub fn profile(id: ProfileId) -> &'static Profile {
    match id {
        ProfileId::Cinema => &CINEMA,
        ProfileId::Focus => &FOCUS,
        ProfileId::Zen => &ZEN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_match() {
        for p in catalog() {
            assert_eq!(profile(p.id).id, p.id);
        }
        assert_eq!(catalog().len(), ProfileId::ALL.len());
    }

    #[test]
    fn test_profile_id_round_trip() {
        for &id in ProfileId::ALL {
            assert_eq!(ProfileId::parse(id.as_str()), Some(id));
        }
        assert!(ProfileId::parse("studio").is_none());
    }

    #[test]
    fn test_side_toggles_not_overridden() {
        // A side affordance is controlled by activation state, never part of
        // the override bundle it belongs to.
        for p in catalog() {
            if let Some(side) = p.side_toggle {
                assert!(p.overrides.iter().all(|&(k, _)| k != side));
            }
        }
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ProfileId::Cinema).unwrap(), "\"cinema\"");
    }
}
