//! View models for the sidebar list.

use shared_types::{Place, PlaceId};

use crate::category_tree::CategoryTree;

/// Shown instead of a photo when a place has none.
pub const FALLBACK_BACKGROUND: &str = "#006094";

pub fn card_dom_id(place_id: PlaceId) -> String {
    format!("place-{place_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardImage {
    Url(String),
    Colour(&'static str),
}

impl CardImage {
    /// Inline style for the card banner. Upstream urls go into a quoted CSS
    /// string, escaped so they cannot end it early.
    pub fn style(&self) -> String {
        match self {
            CardImage::Url(url) => format!("background-image: url(\"{}\")", css_string(url)),
            CardImage::Colour(colour) => format!("background-color: {colour}"),
        }
    }
}

fn css_string(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '"' | '\'' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            // Line breaks cannot appear in a CSS string, even escaped as-is.
            '\n' | '\r' | '\u{c}' => escaped.push_str(&format!("\\{:x} ", c as u32)),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCardModel {
    pub id: PlaceId,
    pub dom_id: String,
    pub title: String,
    pub address: String,
    pub image: CardImage,
    pub facilities: Vec<String>,
    /// Names that did not fit, joined for the "+N" tooltip.
    pub hidden_facilities: Option<String>,
    pub hidden_count: usize,
}

impl PlaceCardModel {
    pub fn build(place: &Place, tree: &CategoryTree, preview: usize) -> Self {
        let names: Vec<String> = place
            .category_ids()
            .into_iter()
            .filter_map(|id| tree.name_of(id))
            .map(str::to_string)
            .collect();
        let shown = names.len().min(preview);
        let hidden = &names[shown..];

        let image = [&place.thumb, &place.image]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())
            .map(|url| CardImage::Url(url.clone()))
            .unwrap_or(CardImage::Colour(FALLBACK_BACKGROUND));

        Self {
            id: place.id,
            dom_id: card_dom_id(place.id),
            title: place.title.clone(),
            address: place.display_address(),
            image,
            hidden_facilities: (!hidden.is_empty()).then(|| hidden.join(", ")),
            hidden_count: hidden.len(),
            facilities: names[..shown].to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollStep {
    Scrolled,
    Retry,
    GiveUp,
}

/// Polls for a card to be mounted, once per animation frame, before
/// scrolling it into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRetry {
    attempts: u32,
    max: u32,
}

impl ScrollRetry {
    pub fn new(max: u32) -> Self {
        Self { attempts: 0, max }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn next(&mut self, found: bool) -> ScrollStep {
        if found {
            return ScrollStep::Scrolled;
        }
        self.attempts += 1;
        if self.attempts >= self.max {
            ScrollStep::GiveUp
        } else {
            ScrollStep::Retry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::CategoryNode;

    fn tree() -> CategoryTree {
        CategoryTree::from_nodes(&[CategoryNode::branch(
            1,
            "Food",
            vec![
                CategoryNode::leaf(11, "Bakery"),
                CategoryNode::leaf(12, "Bar"),
                CategoryNode::leaf(13, "Cafe"),
                CategoryNode::leaf(14, "Diner"),
            ],
        )])
    }

    #[test]
    fn card_lists_known_facilities_and_collapses_the_rest() {
        let place = Place {
            id: 4,
            title: "Main St".to_string(),
            city: "Ocala".to_string(),
            category: "11,12,99,13,14".to_string(),
            ..Default::default()
        };
        let card = PlaceCardModel::build(&place, &tree(), 3);
        assert_eq!(card.dom_id, "place-4");
        assert_eq!(card.facilities, vec!["Bakery", "Bar", "Cafe"]);
        assert_eq!(card.hidden_facilities.as_deref(), Some("Diner"));
        assert_eq!(card.hidden_count, 1);
        assert_eq!(card.address, "Ocala");
    }

    #[test]
    fn image_falls_back_from_thumb_to_colour() {
        let mut place = Place {
            image: Some("big.jpg".to_string()),
            ..Default::default()
        };
        assert_eq!(
            PlaceCardModel::build(&place, &tree(), 3).image,
            CardImage::Url("big.jpg".to_string())
        );
        place.thumb = Some("small.jpg".to_string());
        assert_eq!(
            PlaceCardModel::build(&place, &tree(), 3).image,
            CardImage::Url("small.jpg".to_string())
        );
        let bare = Place::default();
        let card = PlaceCardModel::build(&bare, &tree(), 3);
        assert_eq!(card.image, CardImage::Colour(FALLBACK_BACKGROUND));
        assert!(card.hidden_facilities.is_none());
    }

    #[test]
    fn image_urls_cannot_escape_the_style() {
        let image = CardImage::Url(r#"https://cdn.test/a'b).jpg"x\y"#.to_string());
        assert_eq!(
            image.style(),
            r#"background-image: url("https://cdn.test/a\'b).jpg\"x\\y")"#
        );
        assert_eq!(
            CardImage::Url("a\nb".to_string()).style(),
            r#"background-image: url("a\a b")"#
        );
        assert_eq!(
            CardImage::Colour(FALLBACK_BACKGROUND).style(),
            "background-color: #006094"
        );
    }

    #[test]
    fn scroll_gives_up_after_max_attempts() {
        let mut retry = ScrollRetry::new(8);
        for _ in 0..7 {
            assert_eq!(retry.next(false), ScrollStep::Retry);
        }
        assert_eq!(retry.next(false), ScrollStep::GiveUp);
        assert_eq!(retry.attempts(), 8);
    }

    #[test]
    fn scroll_stops_once_card_is_mounted() {
        let mut retry = ScrollRetry::new(8);
        assert_eq!(retry.next(false), ScrollStep::Retry);
        assert_eq!(retry.next(true), ScrollStep::Scrolled);
    }
}
