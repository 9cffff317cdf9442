use std::collections::BTreeMap;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use selector_core::model::{SelectionMap, Taxonomy};
use selector_core::scorm::{CmiElement, ScormVersion};
use selector_core::time::{fixed_clock, fixed_now};
use services::{AppServices, ChecklistService, LaunchOptions, LocalLms};
use storage::repository::{AttemptKey, AttemptRecord, Storage};

use crate::context::{UiApp, build_app_context};
use crate::views::ChecklistView;

use super::intent::ChecklistIntent;
use super::view::ChecklistTestHandles;

const TAXONOMY: &str = r#"[
  {"id":"cat-a","name":"Planning","subCompetencies":[
    {"id":"sub-a1","title":"Goals","indicators":[
      {"id":"ind-x","text":"Sets goals"},
      {"id":"ind-y","text":"Reviews goals"},
      {"id":"ind-z","text":"Shares goals"}]},
    {"id":"sub-a2","title":"Scheduling","indicators":[
      {"id":"ind-w","text":"Keeps a calendar"}]}]},
  {"id":"cat-b","name":"Reflection","subCompetencies":[
    {"id":"sub-b1","title":"Journaling","indicators":[
      {"id":"ind-p","text":"Writes entries"}]}]}
]"#;

struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn taxonomy(&self) -> Arc<Taxonomy> {
        self.services.taxonomy()
    }

    fn checklist(&self) -> Arc<ChecklistService> {
        self.services.checklist()
    }
}

#[derive(Props, Clone)]
struct HarnessProps {
    app: Arc<TestApp>,
    handles: ChecklistTestHandles,
}

impl PartialEq for HarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for HarnessProps {}

#[component]
fn ChecklistHarnessRoot(props: HarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { ChecklistView {} }
}

pub struct ChecklistHarness {
    pub dom: VirtualDom,
    pub services: AppServices,
    handles: ChecklistTestHandles,
}

impl ChecklistHarness {
    pub fn dispatch(&mut self, intent: ChecklistIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        drive_dom(&mut self.dom);
    }

    pub fn selection(&self) -> SelectionMap {
        let selection = self.handles.selection();
        self.dom.in_runtime(|| SelectionMap::clone(&selection.peek()))
    }

    pub fn lms(&self) -> Arc<LocalLms> {
        self.services.local_lms().expect("local lms bound")
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    /// Drop the view tree, running its teardown. Returns the services so
    /// tests can inspect what was committed.
    pub fn unmount(self) -> AppServices {
        drop(self.dom);
        self.services
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub async fn setup_checklist_harness(
    version: ScormVersion,
    suspend_data: Option<&str>,
) -> ChecklistHarness {
    let storage = Storage::in_memory();
    let key = AttemptKey::new("course", "learner");
    if let Some(data) = suspend_data {
        let values = BTreeMap::from([(
            CmiElement::SuspendData.key(version).to_owned(),
            data.to_owned(),
        )]);
        storage
            .attempts
            .save_attempt(&AttemptRecord {
                key: key.clone(),
                version,
                values,
                commit_count: 1,
                committed_at: fixed_now(),
            })
            .await
            .expect("seed attempt");
    }

    let options = LaunchOptions {
        course_id: "course".to_owned(),
        learner_id: "learner".to_owned(),
        version,
        ..LaunchOptions::default()
    };
    let taxonomy = Taxonomy::from_json_str(TAXONOMY).expect("taxonomy");
    let (services, writer) = AppServices::new_local(&storage, taxonomy, options, fixed_clock())
        .await
        .expect("services");
    if let Some(writer) = writer {
        tokio::spawn(writer.run());
    }

    let handles = ChecklistTestHandles::default();
    let mut dom = VirtualDom::new_with_props(
        ChecklistHarnessRoot,
        HarnessProps {
            app: Arc::new(TestApp {
                services: services.clone(),
            }),
            handles: handles.clone(),
        },
    );
    dom.rebuild_in_place();
    drive_dom(&mut dom);

    ChecklistHarness {
        dom,
        services,
        handles,
    }
}
