use std::collections::BTreeSet;

use crate::model::ids::{CategoryId, IndicatorId, SubCompetencyId};
use crate::model::taxonomy::{CompetencyCategory, SubCompetency, Taxonomy};

/// Aggregated checkbox state of a container node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Unselected,
    Partial,
    All,
}

impl SelectionState {
    /// A container with no leaves is `Unselected`.
    #[must_use]
    pub fn from_counts(selected: usize, total: usize) -> Self {
        if total == 0 || selected == 0 {
            Self::Unselected
        } else if selected >= total {
            Self::All
        } else {
            Self::Partial
        }
    }

    #[must_use]
    pub fn is_all(self) -> bool {
        matches!(self, Self::All)
    }

    #[must_use]
    pub fn is_partial(self) -> bool {
        matches!(self, Self::Partial)
    }
}

/// Sparse map from indicator id to selected state.
///
/// Only selected ids are stored; an absent id is unselected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMap {
    selected: BTreeSet<IndicatorId>,
}

impl SelectionMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_selected(&self, id: &IndicatorId) -> bool {
        self.selected.contains(id)
    }

    pub fn set(&mut self, id: &IndicatorId, selected: bool) {
        if selected {
            self.selected.insert(id.clone());
        } else {
            self.selected.remove(id);
        }
    }

    /// Flip a single leaf; returns the new state.
    pub fn toggle(&mut self, id: &IndicatorId) -> bool {
        let next = !self.is_selected(id);
        self.set(id, next);
        next
    }

    pub fn set_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a IndicatorId>, selected: bool) {
        for id in ids {
            self.set(id, selected);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorId> + '_ {
        self.selected.iter()
    }

    fn count_selected<'a>(&self, ids: impl IntoIterator<Item = &'a IndicatorId>) -> (usize, usize) {
        ids.into_iter().fold((0, 0), |(selected, total), id| {
            (selected + usize::from(self.is_selected(id)), total + 1)
        })
    }
}

impl FromIterator<IndicatorId> for SelectionMap {
    fn from_iter<T: IntoIterator<Item = IndicatorId>>(iter: T) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}

impl SubCompetency {
    #[must_use]
    pub fn selection_state(&self, selection: &SelectionMap) -> SelectionState {
        let (selected, total) = selection.count_selected(self.indicator_ids());
        SelectionState::from_counts(selected, total)
    }
}

impl CompetencyCategory {
    #[must_use]
    pub fn selection_state(&self, selection: &SelectionMap) -> SelectionState {
        let (selected, total) = selection.count_selected(self.indicator_ids());
        SelectionState::from_counts(selected, total)
    }
}

impl Taxonomy {
    /// Number of selected ids that exist in this taxonomy.
    #[must_use]
    pub fn selected_count(&self, selection: &SelectionMap) -> usize {
        selection.count_selected(self.indicator_ids()).0
    }

    /// Write `selected` for every leaf of a sub-competency. Unknown ids are a no-op.
    pub fn set_sub_competency(
        &self,
        selection: &mut SelectionMap,
        id: &SubCompetencyId,
        selected: bool,
    ) {
        if let Some(sub) = self.sub_competency(id) {
            selection.set_all(sub.indicator_ids(), selected);
        }
    }

    /// Write `selected` for every leaf of a category. Unknown ids are a no-op.
    pub fn set_category(&self, selection: &mut SelectionMap, id: &CategoryId, selected: bool) {
        if let Some(category) = self.category(id) {
            selection.set_all(category.indicator_ids(), selected);
        }
    }

    /// Select every leaf unless all are already selected, in which case clear them.
    ///
    /// Returns the value written, or `None` for an unknown id.
    pub fn toggle_sub_competency(
        &self,
        selection: &mut SelectionMap,
        id: &SubCompetencyId,
    ) -> Option<bool> {
        let sub = self.sub_competency(id)?;
        let next = !sub.selection_state(selection).is_all();
        selection.set_all(sub.indicator_ids(), next);
        Some(next)
    }

    /// Category counterpart of [`Taxonomy::toggle_sub_competency`].
    pub fn toggle_category(&self, selection: &mut SelectionMap, id: &CategoryId) -> Option<bool> {
        let category = self.category(id)?;
        let next = !category.selection_state(selection).is_all();
        selection.set_all(category.indicator_ids(), next);
        Some(next)
    }
}
