use dioxus::prelude::*;

use crate::vm::{CategoryVm, IndicatorVm, SubCompetencyVm, aria_checked, data_state};

use super::intent::ChecklistIntent;

#[component]
pub(super) fn ChecklistHeader(
    selected: usize,
    total: usize,
    on_intent: Callback<ChecklistIntent>,
) -> Element {
    rsx! {
        header { class: "checklist-header",
            h1 { class: "checklist-title", "Competency Checklist" }
            div { class: "checklist-summary",
                span { class: "checklist-count", "Selected: {selected} / {total}" }
                if selected > 0 {
                    button {
                        class: "btn btn-secondary checklist-reset",
                        r#type: "button",
                        onclick: move |_| on_intent.call(ChecklistIntent::Reset),
                        "Clear selection"
                    }
                }
            }
        }
    }
}

#[component]
pub(super) fn CategoryCard(category: CategoryVm, on_intent: Callback<ChecklistIntent>) -> Element {
    let input_id = format!("category-{}", category.id);
    let label = if category.state.is_all() {
        "All selected"
    } else {
        "Select all in category"
    };
    let toggle = category.id.clone();
    rsx! {
        section {
            class: "category-card",
            "data-state": data_state(category.state),
            div { class: "category-card__header",
                h2 { class: "category-card__title", "{category.name}" }
                label { class: "select-all", r#for: "{input_id}",
                    input {
                        id: "{input_id}",
                        r#type: "checkbox",
                        checked: category.state.is_all(),
                        "aria-checked": aria_checked(category.state),
                        onchange: move |_| {
                            on_intent.call(ChecklistIntent::ToggleCategory(toggle.clone()));
                        },
                    }
                    span { "{label}" }
                }
            }
            div { class: "category-card__body",
                for sub in category.sub_competencies.iter().cloned() {
                    SubCompetencyItem { key: "{sub.id}", sub, on_intent }
                }
            }
        }
    }
}

#[component]
pub(super) fn SubCompetencyItem(
    sub: SubCompetencyVm,
    on_intent: Callback<ChecklistIntent>,
) -> Element {
    let input_id = format!("sub-{}", sub.id);
    let label = if sub.state.is_all() { "All selected" } else { "Select all" };
    let toggle = sub.id.clone();
    rsx! {
        article {
            class: "sub-competency",
            "data-state": data_state(sub.state),
            div { class: "sub-competency__header",
                h3 { class: "sub-competency__title", "{sub.title}" }
                label { class: "select-all", r#for: "{input_id}",
                    input {
                        id: "{input_id}",
                        r#type: "checkbox",
                        checked: sub.state.is_all(),
                        "aria-checked": aria_checked(sub.state),
                        onchange: move |_| {
                            on_intent.call(ChecklistIntent::ToggleSubCompetency(toggle.clone()));
                        },
                    }
                    span { "{label}" }
                }
            }
            ul { class: "indicator-list",
                for indicator in sub.indicators.iter().cloned() {
                    IndicatorCheckbox { key: "{indicator.id}", indicator, on_intent }
                }
            }
        }
    }
}

#[component]
pub(super) fn IndicatorCheckbox(
    indicator: IndicatorVm,
    on_intent: Callback<ChecklistIntent>,
) -> Element {
    let input_id = format!("indicator-{}", indicator.id);
    let toggle = indicator.id.clone();
    rsx! {
        li {
            class: if indicator.checked { "indicator indicator--checked" } else { "indicator" },
            input {
                id: "{input_id}",
                r#type: "checkbox",
                checked: indicator.checked,
                onchange: move |_| on_intent.call(ChecklistIntent::ToggleIndicator(toggle.clone())),
            }
            label { r#for: "{input_id}", "{indicator.text}" }
        }
    }
}

#[component]
pub(super) fn ChecklistFooter() -> Element {
    rsx! {
        footer { class: "checklist-footer",
            p { "Progress is saved to your learning record as you go." }
        }
    }
}
