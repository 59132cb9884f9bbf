//! Stock applier wiring for the standard feature areas.
//!
//! The selectors here are deliberately generic region hooks; the browser
//! glue that knows the host page's real markup substitutes its own bindings
//! and the core never depends on them.

use veil_types::ToggleKey::*;

use crate::applier::{Binding, SelectorApplier};

/// Masthead region: the top bar and its controls.
pub fn masthead_applier() -> SelectorApplier {
    SelectorApplier::new(
        "masthead",
        vec![
            Binding::new(HideMasthead, "#masthead"),
            Binding::new(HideSearchbar, "#masthead-search"),
            Binding::new(HideNotifications, "#masthead-notifications"),
            Binding::new(HideCreateButton, "#masthead-create"),
            Binding::new(HideAvatar, "#masthead-avatar"),
        ],
    )
}

/// Navigation region: the sidebar and its sections.
pub fn navigation_applier() -> SelectorApplier {
    SelectorApplier::new(
        "navigation",
        vec![
            Binding::new(HideSidebar, "#sidebar"),
            Binding::new(HideSidebarExplore, "#sidebar-explore"),
            Binding::new(HideSidebarYou, "#sidebar-you"),
            Binding::new(HideSidebarSubscriptions, "#sidebar-subscriptions"),
            Binding::new(HideSidebarFooter, "#sidebar-footer"),
        ],
    )
}

/// Feed shelves: shorts, promos, banners, and the rest of the home feed
/// clutter.
pub fn shelves_applier() -> SelectorApplier {
    SelectorApplier::new(
        "shelves",
        vec![
            Binding::new(HideShortsShelf, "#shorts-shelf"),
            Binding::new(HidePromotedVideos, "#promoted-shelf"),
            Binding::new(HideTopBanner, "#feed-banner"),
            Binding::new(HideBreakingNews, "#breaking-news-shelf"),
            Binding::new(HideCommunityPosts, "#community-shelf"),
            Binding::new(HidePlaylistsShelf, "#playlists-shelf"),
            Binding::new(HideMixes, "#mixes-shelf"),
        ],
    )
}

/// Watch page: everything around the player.
pub fn watch_applier() -> SelectorApplier {
    SelectorApplier::new(
        "watch",
        vec![
            Binding::new(HideRelatedVideos, "#related"),
            Binding::new(HideComments, "#comments"),
            Binding::new(HideDescription, "#description"),
            Binding::new(HideLiveChat, "#live-chat"),
            Binding::new(HideMerchShelf, "#merch-shelf"),
            Binding::new(HideActions, "#action-row"),
            Binding::new(HideEndScreenCards, "#end-screen-cards"),
            Binding::new(HideEndScreenFeed, "#end-screen-feed"),
            Binding::new(HideInfoCards, "#info-cards"),
            Binding::new(HideMiniPlayer, "#mini-player"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_cascade::CascadeEngine;
    use veil_types::{ResolvedView, Settings, ToggleKey};

    use crate::applier::VisibilityApplier;
    use crate::dom::{DocumentSurface, ScriptedDocument};

    #[test]
    fn test_stock_appliers_cover_disjoint_keys() {
        let appliers = [
            masthead_applier(),
            navigation_applier(),
            shelves_applier(),
            watch_applier(),
        ];
        let mut seen: Vec<ToggleKey> = Vec::new();
        for applier in &appliers {
            for &key in applier.keys() {
                assert!(!seen.contains(&key), "{key} wired into two appliers");
                seen.push(key);
            }
        }
    }

    #[test]
    fn test_masthead_cascade_hides_all_controls() {
        let doc = ScriptedDocument::new();
        let search = doc.insert_element(&["#masthead-search"]);
        let avatar = doc.insert_element(&["#masthead-avatar"]);

        let settings = CascadeEngine::new().apply(&Settings::new(), ToggleKey::HideMasthead, true);
        let mut applier = masthead_applier();
        let view = ResolvedView::for_keys(&settings, &applier.keys().to_vec());
        applier.apply(&doc, &view).unwrap();

        assert_eq!(doc.inline_style(search, "display"), Some("none".into()));
        assert_eq!(doc.inline_style(avatar, "display"), Some("none".into()));
    }
}
