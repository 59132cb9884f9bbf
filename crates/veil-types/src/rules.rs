//! Declarative cascade rule tables.
//!
//! Every relationship between toggle keys lives here, in three tables:
//!
//! - [`HARD_RESET`] — a master key that forces an enumerated whitelist of
//!   descendants (including grandchildren) to its own value, in both
//!   directions. Disabling a master key deliberately zeroes every descendant,
//!   even ones the user set independently; this is a clean-slate policy, not
//!   an accident.
//! - [`ONE_WAY`] — a key that forces its direct dependents to its own value,
//!   with no feedback from the dependents.
//! - [`AND_GROUPS`] — a parent forced onto its children when set directly,
//!   and recomputed as the logical AND of its children whenever any child
//!   changes.
//!
//! A key appears as the subject of at most one table; the cascade engine
//! checks the tables in the order above and treats uncovered keys as
//! independent.

use crate::keys::ToggleKey;
use crate::keys::ToggleKey::*;

/// A master key with a deep descendant whitelist.
#[derive(Clone, Copy, Debug)]
pub struct HardResetRule {
    pub key: ToggleKey,
    pub descendants: &'static [ToggleKey],
}

/// A key whose dependents follow it without feeding back.
#[derive(Clone, Copy, Debug)]
pub struct OneWayRule {
    pub key: ToggleKey,
    pub dependents: &'static [ToggleKey],
}

/// A parent key kept equal to the AND of a fixed child list.
#[derive(Clone, Copy, Debug)]
pub struct AndGroup {
    pub parent: ToggleKey,
    pub children: &'static [ToggleKey],
}

/// Everything the sidebar master governs, grandchildren included.
const SIDEBAR_DESCENDANTS: &[ToggleKey] = &[
    HideSidebarHome,
    HideSidebarShorts,
    HideSidebarSubscriptions,
    HideSidebarMoreFrom,
    HideSidebarFooter,
    HideSidebarSettings,
    HideSidebarExplore,
    HideExploreTrending,
    HideExploreMusic,
    HideExploreMovies,
    HideExploreLive,
    HideExploreGaming,
    HideExploreNews,
    HideExploreSports,
    HideExploreLearning,
    HideExploreFashion,
    HideExplorePodcasts,
    HideSidebarYou,
    HideYouHistory,
    HideYouPlaylists,
    HideYouYourVideos,
    HideYouWatchLater,
    HideYouLikedVideos,
    HideYouClips,
];

pub const HARD_RESET: &[HardResetRule] = &[HardResetRule {
    key: HideSidebar,
    descendants: SIDEBAR_DESCENDANTS,
}];

pub const ONE_WAY: &[OneWayRule] = &[
    OneWayRule {
        key: HideMasthead,
        dependents: &[HideSearchbar, HideNotifications, HideCreateButton, HideAvatar],
    },
    // hideFold is write-only: nothing reads the dependents back into it.
    OneWayRule {
        key: HideFold,
        dependents: &[
            HideDescription,
            HideComments,
            HideRelatedVideos,
            HideLiveChat,
            HideMerchShelf,
        ],
    },
];

pub const AND_GROUPS: &[AndGroup] = &[
    AndGroup {
        parent: HideActions,
        children: &[
            HideActionLikeDislike,
            HideActionShare,
            HideActionSave,
            HideActionEllipsis,
            HideActionJoin,
            HideActionSubscribe,
            HideActionClip,
        ],
    },
    AndGroup {
        parent: HideSidebarExplore,
        children: &[
            HideExploreTrending,
            HideExploreMusic,
            HideExploreMovies,
            HideExploreLive,
            HideExploreGaming,
            HideExploreNews,
            HideExploreSports,
            HideExploreLearning,
            HideExploreFashion,
            HideExplorePodcasts,
        ],
    },
    AndGroup {
        parent: HideSidebarYou,
        children: &[
            HideYouHistory,
            HideYouPlaylists,
            HideYouYourVideos,
            HideYouWatchLater,
            HideYouLikedVideos,
            HideYouClips,
        ],
    },
];

/// Look up the hard-reset rule a key is the master of, if any.
pub fn hard_reset_rule(key: ToggleKey) -> Option<&'static HardResetRule> {
    HARD_RESET.iter().find(|r| r.key == key)
}

/// Look up the one-way rule a key is the subject of, if any.
pub fn one_way_rule(key: ToggleKey) -> Option<&'static OneWayRule> {
    ONE_WAY.iter().find(|r| r.key == key)
}

/// Look up the AND group a key is the parent of, if any.
pub fn and_group(key: ToggleKey) -> Option<&'static AndGroup> {
    AND_GROUPS.iter().find(|g| g.parent == key)
}

/// Look up the AND group a key is a child of, if any.
pub fn and_parent_of(key: ToggleKey) -> Option<&'static AndGroup> {
    AND_GROUPS.iter().find(|g| g.children.contains(&key))
}
