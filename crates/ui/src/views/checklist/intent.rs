use selector_core::model::{CategoryId, IndicatorId, SelectionMap, SubCompetencyId, Taxonomy};

/// User actions on the checklist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChecklistIntent {
    ToggleIndicator(IndicatorId),
    ToggleSubCompetency(SubCompetencyId),
    ToggleCategory(CategoryId),
    Reset,
}

/// Apply `intent` to `selection`. Returns `true` when the selection changed.
pub(crate) fn apply_intent(
    taxonomy: &Taxonomy,
    selection: &mut SelectionMap,
    intent: &ChecklistIntent,
) -> bool {
    let before = selection.clone();
    match intent {
        ChecklistIntent::ToggleIndicator(id) => {
            if taxonomy.contains_indicator(id) {
                selection.toggle(id);
            }
        }
        ChecklistIntent::ToggleSubCompetency(id) => {
            taxonomy.toggle_sub_competency(selection, id);
        }
        ChecklistIntent::ToggleCategory(id) => {
            taxonomy.toggle_category(selection, id);
        }
        ChecklistIntent::Reset => selection.clear(),
    }
    *selection != before
}
