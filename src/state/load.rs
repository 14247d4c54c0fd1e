use crate::api::ApiError;
use crate::cache::EntityCache;

/// Request lifecycle of a fetchable view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum LoadState {
    #[default]
    Loading,
    Error(String),
    Ready,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FetchMode {
    /// First load or explicit retry: show the skeleton.
    Initial,
    /// Refresh after a mutation: keep showing settled content.
    Background,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FetchTicket {
    id: u64,
    mode: FetchMode,
}

/// Tracks the latest fetch for a view and ignores responses to older ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Fetch {
    state: LoadState,
    request_id: u64,
}

impl Fetch {
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn begin(&mut self, mode: FetchMode) -> FetchTicket {
        self.request_id = self.request_id.wrapping_add(1);
        // A background refresh never regresses a settled view to the skeleton.
        if mode == FetchMode::Initial || self.state != LoadState::Ready {
            self.state = LoadState::Loading;
        }
        FetchTicket {
            id: self.request_id,
            mode,
        }
    }

    /// Records a response. Returns false for stale responses, which the
    /// caller must drop.
    pub fn settle<T>(&mut self, ticket: FetchTicket, result: &Result<T, ApiError>) -> bool {
        if ticket.id != self.request_id {
            tracing::debug!(ticket = ticket.id, latest = self.request_id, "stale response ignored");
            return false;
        }

        match result {
            Ok(_) => self.state = LoadState::Ready,
            Err(e) => {
                let keep_content =
                    ticket.mode == FetchMode::Background && self.state == LoadState::Ready;
                if !keep_content {
                    self.state = LoadState::Error(e.message.clone());
                }
            }
        }
        true
    }
}

/// What a fetchable view renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Presentation {
    Skeleton,
    ErrorPanel(String),
    /// Loaded but nothing to list; offers the creation action inline.
    Empty,
    Content,
}

pub(crate) fn present(fetch: &Fetch, cache: &EntityCache) -> Presentation {
    match fetch.state() {
        LoadState::Loading => Presentation::Skeleton,
        LoadState::Error(message) => Presentation::ErrorPanel(message.clone()),
        LoadState::Ready if cache.is_empty() => Presentation::Empty,
        LoadState::Ready => Presentation::Content,
    }
}
