//! View state for the logs screen.
//!
//! The screen is modeled as an immutable-per-render state value plus a
//! pure [`update`] function consuming [`Action`]s. Each fetch carries the
//! generation of the state that started it; results from a superseded
//! search arrive with an old generation and are discarded.

use logview_client::{AggregatedLogEntry, LogEntry, LogQuery};
use tracing::debug;

/// Monotonic counter identifying which search a fetch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    /// The generation after this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// The detail viewer: closed, or open over a fetched drilldown list.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewerState {
    /// No drilldown is being viewed.
    #[default]
    Closed,
    /// Browsing a drilldown list one entry at a time.
    Open {
        /// The fetched individual logs. Never empty.
        logs: Vec<LogEntry>,
        /// Index of the displayed log, always in `[0, logs.len() - 1]`.
        index: usize,
    },
}

impl ViewerState {
    /// Whether the viewer is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// The displayed log with its position: `(log, index, total)`.
    #[must_use]
    pub fn current(&self) -> Option<(&LogEntry, usize, usize)> {
        match self {
            Self::Closed => None,
            Self::Open { logs, index } => logs.get(*index).map(|log| (log, *index, logs.len())),
        }
    }

    /// Whether the viewer shows the first entry (or is closed).
    #[must_use]
    pub fn at_first(&self) -> bool {
        match self {
            Self::Closed => true,
            Self::Open { index, .. } => *index == 0,
        }
    }

    /// Whether the viewer shows the last entry (or is closed).
    #[must_use]
    pub fn at_last(&self) -> bool {
        match self {
            Self::Closed => true,
            Self::Open { logs, index } => *index + 1 >= logs.len(),
        }
    }
}

/// The complete state of the logs screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenState {
    /// The aggregated list currently shown.
    pub aggregated: Vec<AggregatedLogEntry>,
    /// The active search filter.
    pub filter: LogQuery,
    /// Generation of the most recent search.
    pub generation: Generation,
    /// The detail viewer.
    pub viewer: ViewerState,
}

impl ScreenState {
    /// Initial state with the given filter and nothing loaded.
    #[must_use]
    pub fn new(filter: LogQuery) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}

/// Events the screen reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new search was submitted with this filter.
    SearchStarted {
        /// The filter to use from now on (empty fields already dropped).
        filter: LogQuery,
    },
    /// An aggregated fetch completed.
    SearchLoaded {
        /// Generation of the state that started the fetch.
        generation: Generation,
        /// The fetched rows.
        entries: Vec<AggregatedLogEntry>,
    },
    /// A drilldown fetch completed.
    DrilldownLoaded {
        /// Generation of the state that started the fetch.
        generation: Generation,
        /// The fetched individual logs.
        logs: Vec<LogEntry>,
    },
    /// Step the viewer forward.
    NextLog,
    /// Step the viewer backward.
    PrevLog,
    /// Close the viewer.
    CloseViewer,
}

/// Compute the next state for an action.
///
/// Fetch results whose generation is older than the state's are stale
/// and leave the state untouched. The viewer index is clamped to the
/// drilldown bounds; stepping never wraps around.
#[must_use]
pub fn update(state: ScreenState, action: Action) -> ScreenState {
    match action {
        Action::SearchStarted { filter } => ScreenState {
            filter,
            generation: state.generation.next(),
            ..state
        },
        Action::SearchLoaded {
            generation,
            entries,
        } => {
            if generation < state.generation {
                debug!("discarding stale aggregated results");
                return state;
            }
            ScreenState {
                aggregated: entries,
                ..state
            }
        }
        Action::DrilldownLoaded { generation, logs } => {
            if generation < state.generation {
                debug!("discarding stale drilldown results");
                return state;
            }
            if logs.is_empty() {
                // Nothing to show; the viewer stays closed
                return state;
            }
            ScreenState {
                viewer: ViewerState::Open { logs, index: 0 },
                ..state
            }
        }
        Action::NextLog => step(state, 1),
        Action::PrevLog => step(state, -1),
        Action::CloseViewer => ScreenState {
            viewer: ViewerState::Closed,
            ..state
        },
    }
}

fn step(state: ScreenState, direction: isize) -> ScreenState {
    match state.viewer {
        ViewerState::Closed => state,
        ViewerState::Open { logs, index } => {
            let last = logs.len().saturating_sub(1);
            let index = match direction {
                d if d > 0 => index.saturating_add(1).min(last),
                _ => index.saturating_sub(1),
            };
            ScreenState {
                viewer: ViewerState::Open { logs, index },
                ..state
            }
        }
    }
}
