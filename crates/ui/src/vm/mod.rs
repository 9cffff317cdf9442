mod checklist_vm;

pub use checklist_vm::{
    CategoryVm, ChecklistVm, IndicatorVm, SubCompetencyVm, aria_checked, data_state,
    map_checklist,
};
