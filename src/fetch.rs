/// Outcome of a single gateway fetch, as seen by whatever renders it.
///
/// Replaces separate loading/error/data flags so impossible combinations such
/// as "loading with stale data and an error" cannot be represented.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Failed { reason: String },
    Loaded(T),
}

impl<T> FetchState<T> {
    pub fn failed(reason: impl Into<String>) -> Self {
        FetchState::Failed { reason: reason.into() }
    }
}
