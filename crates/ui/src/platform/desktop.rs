use dioxus::desktop::tao::event::{Event, WindowEvent};
use dioxus::desktop::use_wry_event_handler;
use dioxus::prelude::*;
use tracing::info;

use crate::context::AppContext;
use crate::views::SelectionMirror;

/// Runs the unload path when the window is asked to close.
///
/// The desktop event loop may end the process without dropping the view, so
/// the selection is stored here and the host is given a chance to flush.
#[component]
pub fn DesktopCloseBridge(selection: SelectionMirror) -> Element {
    let ctx = use_context::<AppContext>();
    use_wry_event_handler(move |event, _| {
        if let Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } = event
        {
            info!("window close requested; saving checklist");
            ctx.checklist().unload(&selection.snapshot());
            ctx.flush();
        }
    });
    rsx! {}
}
