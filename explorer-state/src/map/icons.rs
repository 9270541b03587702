use shared_types::{CategoryId, Place};

/// A map symbol shared by a set of categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconGroup {
    /// Also the image id registered with the map.
    pub name: &'static str,
    pub icon_url: &'static str,
    pub options: &'static [CategoryId],
}

/// Popup image for places without a thumbnail.
pub const PLACEHOLDER_IMAGE_URL: &str = "/assets/placeholder-image.svg";

pub const ICON_GROUPS: [IconGroup; 4] = [
    IconGroup {
        name: "Things To Do",
        icon_url: "/assets/Icons/Things-To-Do.svg",
        options: &[10359, 10334, 10325, 10212],
    },
    IconGroup {
        name: "Where To Stay",
        icon_url: "/assets/Icons/Where-To-Stay.svg",
        options: &[10321, 10324, 10320, 10322, 10323],
    },
    IconGroup {
        name: "Food & Drink",
        icon_url: "/assets/Icons/Food-Drink.svg",
        options: &[10360, 10367, 10370, 10353, 10363, 10362, 10366, 10368],
    },
    IconGroup {
        name: "Events",
        icon_url: "/assets/Icons/Events.svg",
        options: &[],
    },
];

pub fn group_for_category(id: CategoryId) -> Option<&'static IconGroup> {
    ICON_GROUPS.iter().find(|group| group.options.contains(&id))
}

/// Chosen by the place's first category only.
pub fn icon_group(place: &Place) -> Option<&'static IconGroup> {
    place.first_category_id().and_then(group_for_category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_category_decides_the_icon() {
        let place = Place {
            category: "10360,10359".to_string(),
            ..Default::default()
        };
        assert_eq!(icon_group(&place).map(|g| g.name), Some("Food & Drink"));
    }

    /// Icon urls are served from `web/public`.
    #[test]
    fn every_image_url_ships_with_the_site() {
        let public = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../web/public");
        let urls = ICON_GROUPS
            .iter()
            .map(|group| group.icon_url)
            .chain([PLACEHOLDER_IMAGE_URL]);
        for url in urls {
            let file = public.join(url.trim_start_matches('/'));
            assert!(file.is_file(), "{} is missing", file.display());
        }
    }

    #[test]
    fn unknown_or_missing_category_has_no_icon() {
        let unknown = Place {
            category: "1,10359".to_string(),
            ..Default::default()
        };
        assert!(icon_group(&unknown).is_none());
        assert!(icon_group(&Place::default()).is_none());
    }
}
