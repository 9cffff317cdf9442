mod checklist;

pub use checklist::{ChecklistIntent, ChecklistView};
pub(crate) use checklist::SelectionMirror;
