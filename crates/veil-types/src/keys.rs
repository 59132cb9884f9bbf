//! Toggle keys — the flat boolean preference namespace.
//!
//! Every hideable feature area is addressed by one [`ToggleKey`]. Keys travel
//! over the persistence boundary as camelCase strings (`hideSidebar`,
//! `hideExploreMusic`, …); in memory they are a fieldless enum so the cascade
//! tables can be exhaustive and typo-free.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

macro_rules! toggle_keys {
    ($($variant:ident => $wire:literal),+ $(,)?) => {
        /// A named boolean preference controlling visibility of one UI feature.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum ToggleKey {
            $($variant),+
        }

        impl ToggleKey {
            /// Every known toggle key, in declaration order.
            pub const ALL: &'static [ToggleKey] = &[$(ToggleKey::$variant),+];

            /// The key's wire name, as stored in the settings store.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(ToggleKey::$variant => $wire),+
                }
            }

            /// Parse a wire name. Returns `None` for unknown keys.
            pub fn parse(name: &str) -> Option<ToggleKey> {
                match name {
                    $($wire => Some(ToggleKey::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

toggle_keys! {
    // Masthead and its one-way dependents.
    HideMasthead => "hideMasthead",
    HideSearchbar => "hideSearchbar",
    HideNotifications => "hideNotifications",
    HideCreateButton => "hideCreateButton",
    HideAvatar => "hideAvatar",

    // Below-the-fold master and its one-way dependents.
    HideFold => "hideFold",
    HideDescription => "hideDescription",
    HideComments => "hideComments",
    HideRelatedVideos => "hideRelatedVideos",
    HideLiveChat => "hideLiveChat",
    HideMerchShelf => "hideMerchShelf",

    // Player action row — bidirectional AND group.
    HideActions => "hideActions",
    HideActionLikeDislike => "hideActionLikeDislike",
    HideActionShare => "hideActionShare",
    HideActionSave => "hideActionSave",
    HideActionEllipsis => "hideActionEllipsis",
    HideActionJoin => "hideActionJoin",
    HideActionSubscribe => "hideActionSubscribe",
    HideActionClip => "hideActionClip",

    // Sidebar master (hard reset over everything below it).
    HideSidebar => "hideSidebar",
    HideSidebarHome => "hideSidebarHome",
    HideSidebarShorts => "hideSidebarShorts",
    HideSidebarSubscriptions => "hideSidebarSubscriptions",
    HideSidebarMoreFrom => "hideSidebarMoreFrom",
    HideSidebarFooter => "hideSidebarFooter",
    HideSidebarSettings => "hideSidebarSettings",

    // "Explore" section — bidirectional AND group under the sidebar.
    HideSidebarExplore => "hideSidebarExplore",
    HideExploreTrending => "hideExploreTrending",
    HideExploreMusic => "hideExploreMusic",
    HideExploreMovies => "hideExploreMovies",
    HideExploreLive => "hideExploreLive",
    HideExploreGaming => "hideExploreGaming",
    HideExploreNews => "hideExploreNews",
    HideExploreSports => "hideExploreSports",
    HideExploreLearning => "hideExploreLearning",
    HideExploreFashion => "hideExploreFashion",
    HideExplorePodcasts => "hideExplorePodcasts",

    // "You" section — bidirectional AND group under the sidebar.
    HideSidebarYou => "hideSidebarYou",
    HideYouHistory => "hideYouHistory",
    HideYouPlaylists => "hideYouPlaylists",
    HideYouYourVideos => "hideYouYourVideos",
    HideYouWatchLater => "hideYouWatchLater",
    HideYouLikedVideos => "hideYouLikedVideos",
    HideYouClips => "hideYouClips",

    // Independent feature toggles.
    HideHomeFeed => "hideHomeFeed",
    HideShorts => "hideShorts",
    HideShortsShelf => "hideShortsShelf",
    HideHoverPreview => "hideHoverPreview",
    HideFilterChips => "hideFilterChips",
    HideTopBanner => "hideTopBanner",
    HideBreakingNews => "hideBreakingNews",
    HideCommunityPosts => "hideCommunityPosts",
    HideSurveys => "hideSurveys",
    HidePromotedVideos => "hidePromotedVideos",
    HideMiniPlayer => "hideMiniPlayer",
    HideAutoplayToggle => "hideAutoplayToggle",
    HideEndScreenCards => "hideEndScreenCards",
    HideEndScreenFeed => "hideEndScreenFeed",
    HideInfoCards => "hideInfoCards",
    HideChapters => "hideChapters",
    HideTranscript => "hideTranscript",
    HidePlaylistsShelf => "hidePlaylistsShelf",
    HideMixes => "hideMixes",
    HideWatchedVideos => "hideWatchedVideos",
    HideLiveVideos => "hideLiveVideos",
    HidePremieres => "hidePremieres",
    HideChannelBanner => "hideChannelBanner",

    // Profile side affordances — meaningful only while their profile is active.
    CinemaAutoRotate => "cinemaAutoRotate",
    FocusDimChrome => "focusDimChrome",
    ZenHideBadges => "zenHideBadges",
}

impl ToggleKey {
    /// Wire name in kebab case, used for root marker attributes
    /// (`hideMasthead` → `hide-masthead`).
    pub fn as_kebab(&self) -> String {
        let mut out = String::with_capacity(self.as_str().len() + 4);
        for c in self.as_str().chars() {
            if c.is_ascii_uppercase() {
                out.push('-');
                out.push(c.to_ascii_lowercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for ToggleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToggleKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToggleKey::parse(s).ok_or_else(|| SettingsError::UnknownKey(s.to_string()))
    }
}

impl Serialize for ToggleKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ToggleKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = ToggleKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a toggle key wire name")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ToggleKey, E> {
                ToggleKey::parse(v).ok_or_else(|| E::custom(format!("unknown toggle key: {v}")))
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}
