mod components;
mod intent;
mod view;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use intent::ChecklistIntent;
pub(crate) use view::SelectionMirror;
pub use view::ChecklistView;
#[cfg(test)]
pub(crate) use view::ChecklistTestHandles;
