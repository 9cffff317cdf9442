use selector_core::model::{
    CategoryId, CompetencyCategory, IndicatorId, SelectionMap, SelectionState, SubCompetency,
    SubCompetencyId, Taxonomy,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndicatorVm {
    pub id: IndicatorId,
    pub text: String,
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubCompetencyVm {
    pub id: SubCompetencyId,
    pub title: String,
    pub state: SelectionState,
    pub indicators: Vec<IndicatorVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryVm {
    pub id: CategoryId,
    pub name: String,
    pub state: SelectionState,
    pub sub_competencies: Vec<SubCompetencyVm>,
}

/// Whole checklist as rendered: one snapshot of (taxonomy, selection).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecklistVm {
    pub categories: Vec<CategoryVm>,
    pub selected: usize,
    pub total: usize,
}

impl ChecklistVm {
    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.selected > 0
    }
}

#[must_use]
pub fn map_checklist(taxonomy: &Taxonomy, selection: &SelectionMap) -> ChecklistVm {
    ChecklistVm {
        categories: taxonomy
            .categories()
            .iter()
            .map(|category| map_category(category, selection))
            .collect(),
        selected: taxonomy.selected_count(selection),
        total: taxonomy.indicator_count(),
    }
}

fn map_category(category: &CompetencyCategory, selection: &SelectionMap) -> CategoryVm {
    CategoryVm {
        id: category.id.clone(),
        name: category.name.clone(),
        state: category.selection_state(selection),
        sub_competencies: category
            .sub_competencies
            .iter()
            .map(|sub| map_sub_competency(sub, selection))
            .collect(),
    }
}

fn map_sub_competency(sub: &SubCompetency, selection: &SelectionMap) -> SubCompetencyVm {
    SubCompetencyVm {
        id: sub.id.clone(),
        title: sub.title.clone(),
        state: sub.selection_state(selection),
        indicators: sub
            .indicators
            .iter()
            .map(|indicator| IndicatorVm {
                id: indicator.id.clone(),
                text: indicator.text.clone(),
                checked: selection.is_selected(&indicator.id),
            })
            .collect(),
    }
}

/// `aria-checked` value for a tri-state checkbox.
#[must_use]
pub fn aria_checked(state: SelectionState) -> &'static str {
    match state {
        SelectionState::Unselected => "false",
        SelectionState::Partial => "mixed",
        SelectionState::All => "true",
    }
}

/// `data-state` hook used by the stylesheet.
#[must_use]
pub fn data_state(state: SelectionState) -> &'static str {
    match state {
        SelectionState::Unselected => "unchecked",
        SelectionState::Partial => "partial",
        SelectionState::All => "checked",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAXONOMY: &str = r#"[{"id":"cat","name":"Category","subCompetencies":[
        {"id":"sub-1","title":"First","indicators":[
            {"id":"a","text":"A"},{"id":"b","text":"B"}]},
        {"id":"sub-2","title":"Second","indicators":[{"id":"c","text":"C"}]}]}]"#;

    #[test]
    fn partial_selection_maps_to_mixed_states() {
        let taxonomy = Taxonomy::from_json_str(TAXONOMY).unwrap();
        let selection: SelectionMap = [IndicatorId::new("a").unwrap()].into_iter().collect();
        let vm = map_checklist(&taxonomy, &selection);

        assert_eq!((vm.selected, vm.total), (1, 3));
        let category = &vm.categories[0];
        assert_eq!(category.state, SelectionState::Partial);
        assert_eq!(category.sub_competencies[0].state, SelectionState::Partial);
        assert_eq!(category.sub_competencies[1].state, SelectionState::Unselected);
        assert!(category.sub_competencies[0].indicators[0].checked);
        assert!(!category.sub_competencies[0].indicators[1].checked);
        assert_eq!(aria_checked(category.state), "mixed");
        assert_eq!(data_state(category.state), "partial");
    }

    #[test]
    fn unknown_ids_do_not_count_as_selected() {
        let taxonomy = Taxonomy::from_json_str(TAXONOMY).unwrap();
        let selection: SelectionMap = [IndicatorId::new("gone").unwrap()].into_iter().collect();
        let vm = map_checklist(&taxonomy, &selection);
        assert!(!vm.has_selection());
        assert_eq!(vm.categories[0].state, SelectionState::Unselected);
    }
}
