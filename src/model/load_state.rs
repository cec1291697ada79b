use serde::{Deserialize, Serialize};

/// A value the backend populates lazily. Project-item field values arrive
/// in a second retrieval pass, so until then they are `NotLoaded` rather
/// than absent.
#[derive(Default, PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "state", content = "value")]
#[serde(rename_all = "camelCase")]
pub enum LoadState<T> {
    #[default]
    NotLoaded,
    Loaded(T),
}

impl<T> LoadState<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded(_))
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> LoadState<U> {
        match self {
            LoadState::NotLoaded => LoadState::NotLoaded,
            LoadState::Loaded(v) => LoadState::Loaded(f(v)),
        }
    }

    pub fn expect_loaded(&self) -> &T {
        match self {
            LoadState::NotLoaded => panic!("value not loaded"),
            LoadState::Loaded(v) => v,
        }
    }
}

impl<T> LoadState<Option<T>> {
    pub fn flatten(&self) -> Option<&T> {
        match self {
            LoadState::NotLoaded => None,
            LoadState::Loaded(v) => v.as_ref(),
        }
    }
}

impl<T> From<T> for LoadState<T> {
    fn from(value: T) -> Self {
        LoadState::Loaded(value)
    }
}
