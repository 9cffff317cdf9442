use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use selector_core::model::SelectionMap;
use tracing::debug;

use crate::context::AppContext;
use crate::platform::DesktopCloseBridge;
use crate::vm::map_checklist;

use super::components::{CategoryCard, ChecklistFooter, ChecklistHeader};
use super::intent::{ChecklistIntent, apply_intent};

/// Latest selection, readable outside the reactive scope (drop and window
/// close handlers).
#[derive(Clone, Default)]
pub(crate) struct SelectionMirror(Rc<RefCell<SelectionMap>>);

impl SelectionMirror {
    pub(crate) fn snapshot(&self) -> SelectionMap {
        self.0.borrow().clone()
    }

    fn replace(&self, selection: SelectionMap) {
        *self.0.borrow_mut() = selection;
    }
}

impl PartialEq for SelectionMirror {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[component]
pub fn ChecklistView() -> Element {
    let ctx = use_context::<AppContext>();
    let taxonomy = ctx.taxonomy();
    let mirror = use_hook(SelectionMirror::default);

    let mut selection = use_signal({
        let checklist = ctx.checklist();
        let mirror = mirror.clone();
        move || {
            let restored = checklist.mount();
            mirror.replace(restored.clone());
            restored
        }
    });

    let dispatch = use_callback({
        let taxonomy = ctx.taxonomy();
        let checklist = ctx.checklist();
        let mirror = mirror.clone();
        move |intent: ChecklistIntent| {
            let mut next = SelectionMap::clone(&selection.peek());
            if !apply_intent(&taxonomy, &mut next, &intent) {
                debug!(?intent, "intent left the selection unchanged");
                return;
            }
            checklist.selection_changed(&next);
            mirror.replace(next.clone());
            selection.set(next);
        }
    });

    use_drop({
        let checklist = ctx.checklist();
        let mirror = mirror.clone();
        move || checklist.teardown(&mirror.snapshot())
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<ChecklistTestHandles>() {
                handles.register(dispatch, selection);
            }
        }
    }

    let vm = map_checklist(&taxonomy, &selection.read());

    rsx! {
        div { class: "checklist",
            ChecklistHeader { selected: vm.selected, total: vm.total, on_intent: dispatch }
            main { class: "checklist-body",
                if vm.categories.is_empty() {
                    p { class: "checklist-empty", "No competencies to show." }
                }
                for category in vm.categories.iter().cloned() {
                    CategoryCard { key: "{category.id}", category, on_intent: dispatch }
                }
            }
            ChecklistFooter {}
            if ctx.desktop_window() {
                DesktopCloseBridge { selection: mirror.clone() }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct ChecklistTestHandles {
    dispatch: Rc<RefCell<Option<Callback<ChecklistIntent>>>>,
    selection: Rc<RefCell<Option<Signal<SelectionMap>>>>,
}

#[cfg(test)]
impl ChecklistTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<ChecklistIntent>,
        selection: Signal<SelectionMap>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.selection.borrow_mut() = Some(selection);
    }

    pub(crate) fn dispatch(&self) -> Callback<ChecklistIntent> {
        (*self.dispatch.borrow()).expect("checklist dispatch registered")
    }

    pub(crate) fn selection(&self) -> Signal<SelectionMap> {
        (*self.selection.borrow()).expect("checklist selection registered")
    }
}
