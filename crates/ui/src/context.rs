use std::sync::Arc;

use selector_core::model::Taxonomy;
use services::ChecklistService;

pub trait UiApp: Send + Sync {
    fn taxonomy(&self) -> Arc<Taxonomy>;
    fn checklist(&self) -> Arc<ChecklistService>;

    /// Whether the window-close bridge should be mounted.
    fn desktop_window(&self) -> bool {
        false
    }

    /// Called after the close path has committed, so the host can wait for
    /// pending writes before the process exits.
    fn flush(&self) {}
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
    taxonomy: Arc<Taxonomy>,
    checklist: Arc<ChecklistService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            app: Arc::clone(app),
            taxonomy: app.taxonomy(),
            checklist: app.checklist(),
        }
    }

    #[must_use]
    pub fn taxonomy(&self) -> Arc<Taxonomy> {
        Arc::clone(&self.taxonomy)
    }

    #[must_use]
    pub fn checklist(&self) -> Arc<ChecklistService> {
        Arc::clone(&self.checklist)
    }

    #[must_use]
    pub fn desktop_window(&self) -> bool {
        self.app.desktop_window()
    }

    pub fn flush(&self) {
        self.app.flush();
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
