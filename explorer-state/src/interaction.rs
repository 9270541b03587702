//! Shared selection and hover state for the map and the sidebar.

use serde::{Deserialize, Serialize};
use shared_types::{Place, PlaceId};

/// Where a selection came from. Only selections made outside the map move
/// the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionOrigin {
    Map,
    Sidebar,
    Programmatic,
}

impl SelectionOrigin {
    pub fn moves_camera(self) -> bool {
        !matches!(self, SelectionOrigin::Map)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub place_id: PlaceId,
    pub origin: SelectionOrigin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    selected: Option<Selection>,
    hovered: Option<PlaceId>,
}

impl Interaction {
    pub fn selection(&self) -> Option<Selection> {
        self.selected
    }

    pub fn selected_id(&self) -> Option<PlaceId> {
        self.selected.map(|s| s.place_id)
    }

    pub fn hovered_id(&self) -> Option<PlaceId> {
        self.hovered
    }

    /// Click semantics: selecting the already selected place deselects it.
    /// Returns the new selection.
    pub fn toggle(&mut self, place_id: PlaceId, origin: SelectionOrigin) -> Option<Selection> {
        self.selected = match self.selected {
            Some(current) if current.place_id == place_id => None,
            _ => Some(Selection { place_id, origin }),
        };
        self.selected
    }

    /// Selects unconditionally. Returns `true` when the selection changed.
    pub fn select(&mut self, place_id: PlaceId, origin: SelectionOrigin) -> bool {
        let next = Some(Selection { place_id, origin });
        let changed = self.selected != next;
        self.selected = next;
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Latest hover wins.
    pub fn hover(&mut self, place_id: PlaceId) -> bool {
        let changed = self.hovered != Some(place_id);
        self.hovered = Some(place_id);
        changed
    }

    /// Clears the hover only if it still points at `place_id`, so a late
    /// leave event cannot wipe out a newer hover.
    pub fn leave(&mut self, place_id: PlaceId) -> bool {
        if self.hovered == Some(place_id) {
            self.hovered = None;
            true
        } else {
            false
        }
    }

    pub fn clear_hover(&mut self) -> bool {
        self.hovered.take().is_some()
    }

    /// Drops selection and hover that no longer point into `visible`.
    /// Returns `(selection_cleared, hover_cleared)`.
    pub fn retain_visible(&mut self, visible: &[Place]) -> (bool, bool) {
        let present = |id: PlaceId| visible.iter().any(|place| place.id == id);

        let selection_cleared = match self.selected {
            Some(selection) if !present(selection.place_id) => {
                self.selected = None;
                true
            }
            _ => false,
        };
        let hover_cleared = match self.hovered {
            Some(id) if !present(id) => {
                self.hovered = None;
                true
            }
            _ => false,
        };

        (selection_cleared, hover_cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: PlaceId) -> Place {
        Place {
            id,
            ..Default::default()
        }
    }

    #[test]
    fn clicking_the_selected_place_deselects_it() {
        let mut interaction = Interaction::default();
        assert_eq!(
            interaction.toggle(7, SelectionOrigin::Map).map(|s| s.place_id),
            Some(7)
        );
        assert_eq!(interaction.toggle(8, SelectionOrigin::Map).map(|s| s.place_id), Some(8));
        assert_eq!(interaction.toggle(8, SelectionOrigin::Sidebar), None);
        assert_eq!(interaction.selected_id(), None);
    }

    #[test]
    fn select_is_not_a_toggle() {
        let mut interaction = Interaction::default();
        assert!(interaction.select(3, SelectionOrigin::Programmatic));
        assert!(!interaction.select(3, SelectionOrigin::Programmatic));
        assert_eq!(interaction.selected_id(), Some(3));
    }

    #[test]
    fn stale_leave_keeps_newer_hover() {
        let mut interaction = Interaction::default();
        interaction.hover(1);
        interaction.hover(2);
        assert!(!interaction.leave(1));
        assert_eq!(interaction.hovered_id(), Some(2));
        assert!(interaction.leave(2));
        assert_eq!(interaction.hovered_id(), None);
    }

    #[test]
    fn retain_visible_clears_missing_places() {
        let mut interaction = Interaction::default();
        interaction.select(7, SelectionOrigin::Sidebar);
        interaction.hover(8);

        assert_eq!(interaction.retain_visible(&[place(7), place(8)]), (false, false));
        assert_eq!(interaction.retain_visible(&[place(8)]), (true, false));
        assert_eq!(interaction.retain_visible(&[]), (false, true));
        assert_eq!(interaction, Interaction::default());
    }

    #[test]
    fn only_outside_selections_move_the_camera() {
        assert!(!SelectionOrigin::Map.moves_camera());
        assert!(SelectionOrigin::Sidebar.moves_camera());
        assert!(SelectionOrigin::Programmatic.moves_camera());
    }
}
