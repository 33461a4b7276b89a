/// Lifecycle of the one-time bulk load. Failure returns to
/// `NotLoaded` so a later attempt can retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadEvent {
    Begin,
    Succeed,
    Fail,
}

impl LoadState {
    /// Single transition function. A `Begin` on an already loaded
    /// catalog stays `Loaded`: the load request is a no-op.
    pub fn apply(self, event: LoadEvent) -> LoadState {
        match (self, event) {
            (LoadState::NotLoaded, LoadEvent::Begin) => LoadState::Loading,
            (LoadState::Loading, LoadEvent::Succeed) => LoadState::Loaded,
            (LoadState::Loading, LoadEvent::Fail) => LoadState::NotLoaded,
            (LoadState::Loaded, _) => LoadState::Loaded,
            (state, _) => state,
        }
    }

    pub fn is_loaded(self) -> bool {
        self == LoadState::Loaded
    }
}
