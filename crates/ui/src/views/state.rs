use dioxus::prelude::*;

/// Render state of a view backed by a single resource.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(resource: Resource<T>) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => resource
            .value()
            .read()
            .as_ref()
            .map_or(ViewState::Loading, |data| ViewState::Ready(data.clone())),
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
