use selector_core::model::{CategoryId, IndicatorId, SubCompetencyId};
use selector_core::scorm::{CmiElement, ScormVersion};

use super::intent::ChecklistIntent;
use super::test_harness::setup_checklist_harness;

fn ind(raw: &str) -> IndicatorId {
    raw.parse().unwrap()
}

#[tokio::test(flavor = "current_thread")]
async fn checklist_smoke_renders_taxonomy_and_count() {
    let harness = setup_checklist_harness(ScormVersion::Scorm12, None).await;
    let html = harness.render();
    assert!(html.contains("Planning"), "missing category in {html}");
    assert!(html.contains("Journaling"), "missing sub-competency in {html}");
    assert!(html.contains("Keeps a calendar"), "missing indicator in {html}");
    assert!(html.contains("Selected: 0 / 5"), "missing count in {html}");
    assert!(!html.contains("Clear selection"), "reset shown without selection in {html}");
    assert!(html.contains("indicator-ind-x"), "missing indicator input id in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn checklist_smoke_restores_partial_selection() {
    let harness = setup_checklist_harness(ScormVersion::Scorm12, Some(r#"{"ind-x":true}"#)).await;
    assert!(harness.selection().is_selected(&ind("ind-x")));

    let html = harness.render();
    assert!(html.contains("Selected: 1 / 5"), "missing count in {html}");
    assert!(html.contains(r#"aria-checked="mixed""#), "missing partial state in {html}");
    assert!(html.contains("Clear selection"), "missing reset in {html}");
    assert_eq!(
        harness.lms().value(CmiElement::CompletionStatus).as_deref(),
        Some("incomplete")
    );
}

#[tokio::test(flavor = "current_thread")]
async fn checklist_smoke_completing_a_sub_competency_persists_on_teardown() {
    let mut harness =
        setup_checklist_harness(ScormVersion::Scorm2004, Some(r#"{"ind-x":true}"#)).await;

    harness.dispatch(ChecklistIntent::ToggleIndicator(ind("ind-y")));
    harness.dispatch(ChecklistIntent::ToggleIndicator(ind("ind-z")));

    let html = harness.render();
    assert!(html.contains("Selected: 3 / 5"), "missing count in {html}");
    assert!(html.contains("All selected"), "sub-competency not fully selected in {html}");
    assert_eq!(
        harness.lms().value(CmiElement::CompletionStatus).as_deref(),
        Some("completed")
    );

    let lms = harness.lms();
    harness.unmount();
    assert_eq!(
        lms.value(CmiElement::SuspendData).as_deref(),
        Some(r#"{"ind-x":true,"ind-y":true,"ind-z":true}"#)
    );
    assert_eq!(lms.value(CmiElement::Exit).as_deref(), Some("normal"));
}

#[tokio::test(flavor = "current_thread")]
async fn checklist_smoke_group_toggles_and_reset() {
    let mut harness = setup_checklist_harness(ScormVersion::Scorm12, None).await;

    harness.dispatch(ChecklistIntent::ToggleCategory("cat-a".parse::<CategoryId>().unwrap()));
    assert_eq!(harness.selection().len(), 4);

    harness.dispatch(ChecklistIntent::ToggleSubCompetency(
        "sub-a2".parse::<SubCompetencyId>().unwrap(),
    ));
    assert_eq!(harness.selection().len(), 3);
    assert!(harness.render().contains(r#"aria-checked="mixed""#));

    harness.dispatch(ChecklistIntent::Reset);
    assert!(harness.selection().is_empty());
    let html = harness.render();
    assert!(html.contains("Selected: 0 / 5"), "missing count in {html}");
    assert_eq!(harness.lms().value(CmiElement::SuspendData).as_deref(), Some("{}"));
}
