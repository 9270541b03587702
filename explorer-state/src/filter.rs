//! Filter engine: three independent predicates (region, category, text)
//! intersected over the full place list.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use shared_types::{CategoryId, Place, RegionId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_text: String,
    /// `0` (or anything negative) means any region.
    pub region_id: RegionId,
    pub selected_category_ids: BTreeSet<CategoryId>,
    pub selected_top_category_id: Option<CategoryId>,
}

impl FilterCriteria {
    pub fn is_unfiltered(&self) -> bool {
        self.search_text.trim().is_empty()
            && self.region_id <= 0
            && self.selected_category_ids.is_empty()
    }
}

/// Returns the places passing all three predicates, in input order.
pub fn filter_places(
    places: &[Place],
    search_text: &str,
    region_id: RegionId,
    category_ids: &BTreeSet<CategoryId>,
) -> Vec<Place> {
    let query = search_text.trim().to_lowercase();

    places
        .iter()
        .filter(|place| {
            matches_region(place, region_id)
                && matches_category(place, category_ids)
                && matches_text(place, &query)
        })
        .cloned()
        .collect()
}

pub fn filter_by_criteria(places: &[Place], criteria: &FilterCriteria) -> Vec<Place> {
    filter_places(
        places,
        &criteria.search_text,
        criteria.region_id,
        &criteria.selected_category_ids,
    )
}

fn matches_region(place: &Place, region_id: RegionId) -> bool {
    region_id <= 0 || place.regions.contains(&region_id)
}

fn matches_category(place: &Place, category_ids: &BTreeSet<CategoryId>) -> bool {
    category_ids.is_empty()
        || place
            .category_ids()
            .iter()
            .any(|id| category_ids.contains(id))
}

/// `query` is already trimmed and lower-cased.
fn matches_text(place: &Place, query: &str) -> bool {
    query.is_empty() || place.search_haystack().contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cafes() -> Vec<Place> {
        vec![
            Place {
                id: 1,
                regions: vec![5],
                category: "10,20".to_string(),
                title: "Cafe A".to_string(),
                ..Default::default()
            },
            Place {
                id: 2,
                regions: vec![6],
                category: "30".to_string(),
                title: "Cafe B".to_string(),
                ..Default::default()
            },
        ]
    }

    fn ids(places: &[Place]) -> Vec<i64> {
        places.iter().map(|p| p.id).collect()
    }

    #[test]
    fn region_filter_keeps_members_only() {
        let result = filter_places(&cafes(), "", 5, &BTreeSet::new());
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn category_filter_intersects_parsed_ids() {
        let result = filter_places(&cafes(), "", 0, &BTreeSet::from([30]));
        assert_eq!(ids(&result), vec![2]);

        let result = filter_places(&cafes(), "", 0, &BTreeSet::from([20, 30]));
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn text_filter_is_case_insensitive_and_trimmed() {
        let result = filter_places(&cafes(), "  CAFE ", 0, &BTreeSet::new());
        assert_eq!(ids(&result), vec![1, 2]);

        let result = filter_places(&cafes(), "cafe b", 0, &BTreeSet::new());
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn text_matches_address_fields() {
        let places = vec![Place {
            id: 9,
            title: "Museum".to_string(),
            city: "Ocala".to_string(),
            zip_code: "34470".to_string(),
            ..Default::default()
        }];
        assert_eq!(ids(&filter_places(&places, "ocala", 0, &BTreeSet::new())), vec![9]);
        assert_eq!(ids(&filter_places(&places, "3447", 0, &BTreeSet::new())), vec![9]);
        assert!(filter_places(&places, "tampa", 0, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn predicates_are_intersected() {
        let result = filter_places(&cafes(), "cafe", 6, &BTreeSet::from([10]));
        assert!(result.is_empty());
    }

    #[test]
    fn negative_region_means_any() {
        let result = filter_places(&cafes(), "", -1, &BTreeSet::new());
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn result_is_an_ordered_subset_and_deterministic() {
        let places = cafes();
        let criteria = FilterCriteria {
            search_text: "a".to_string(),
            selected_category_ids: BTreeSet::from([10, 30]),
            ..Default::default()
        };
        let first = filter_by_criteria(&places, &criteria);
        let second = filter_by_criteria(&places, &criteria);
        assert_eq!(first, second);
        assert!(first.iter().all(|p| places.contains(p)));
        assert_eq!(ids(&first), vec![1, 2]);
    }

    #[test]
    fn unfiltered_criteria() {
        assert!(FilterCriteria::default().is_unfiltered());
        let criteria = FilterCriteria {
            search_text: "  ".to_string(),
            region_id: 0,
            ..Default::default()
        };
        assert!(criteria.is_unfiltered());
        let criteria = FilterCriteria {
            region_id: 3,
            ..Default::default()
        };
        assert!(!criteria.is_unfiltered());
    }
}
