use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    state::{SubmissionEvent, SubmissionState},
    SignupError, SubmissionPolicy,
};

pub type ViewId = Uuid;

/// Values typed in the form, kept so a failed submission can be corrected
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub email: String,
    pub consent: bool,
}

/// What a page view currently shows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub state: SubmissionState,
    pub draft: Draft,
}

/// One submission of one page view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    view: ViewId,
    attempt: u64,
}

impl Ticket {
    pub fn view(&self) -> ViewId {
        self.view
    }
}

struct ViewEntry {
    snapshot: ViewSnapshot,
    attempt: u64,
    touched: Instant,
}

/// Page views
/// Every page instance owns its own submission state, forgotten once idle for longer than the ttl
/// or pushed out by newer views once `capacity` is reached
#[derive(Clone)]
pub struct PageViews {
    views: Arc<Mutex<HashMap<ViewId, ViewEntry>>>,
    ttl: Duration,
    capacity: usize,
}

impl PageViews {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            views: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            capacity: capacity.max(1),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<ViewId, ViewEntry>> {
        self.views.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_live(&self, entry: &ViewEntry) -> bool {
        entry.touched.elapsed() < self.ttl
    }

    /// Create a new idle page view
    pub fn open(&self) -> ViewId {
        let mut views = self.entries();

        let before = views.len();
        views.retain(|_, entry| self.is_live(entry));
        if views.len() < before {
            info!("Evicted {} expired page views", before - views.len());
        }

        while views.len() >= self.capacity {
            let Some(oldest) = views
                .iter()
                .min_by_key(|(_, entry)| entry.touched)
                .map(|(id, _)| *id)
            else {
                break;
            };
            views.remove(&oldest);
            warn!("Page view limit of {} reached, dropped view {}", self.capacity, oldest);
        }

        let id = Uuid::new_v4();
        views.insert(
            id,
            ViewEntry {
                snapshot: ViewSnapshot::default(),
                attempt: 0,
                touched: Instant::now(),
            },
        );

        id
    }

    pub fn snapshot(&self, id: ViewId) -> Option<ViewSnapshot> {
        self.entries()
            .get(&id)
            .filter(|entry| self.is_live(entry))
            .map(|entry| entry.snapshot.clone())
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Start a submission
    /// Refused while the previous one is still in flight
    pub fn begin(
        &self,
        id: ViewId,
        draft: Draft,
        policy: SubmissionPolicy,
    ) -> Result<Ticket, SignupError> {
        let mut views = self.entries();
        let entry = views
            .get_mut(&id)
            .filter(|entry| self.is_live(entry))
            .ok_or(SignupError::UnknownView)?;

        if !entry.snapshot.state.can_submit() {
            return Err(SignupError::AlreadySubmitting);
        }

        entry.snapshot.state = std::mem::take(&mut entry.snapshot.state)
            .transition(&SubmissionEvent::Submit, policy);
        entry.snapshot.draft = draft;
        entry.attempt += 1;
        entry.touched = Instant::now();

        Ok(Ticket {
            view: id,
            attempt: entry.attempt,
        })
    }

    /// Apply the endpoint's answer
    /// Dropped when the view is gone or has moved on to another submission
    pub fn settle(
        &self,
        ticket: &Ticket,
        event: SubmissionEvent,
        policy: SubmissionPolicy,
    ) -> Option<SubmissionState> {
        let mut views = self.entries();

        let Some(entry) = views.get_mut(&ticket.view).filter(|entry| {
            self.is_live(entry)
                && entry.attempt == ticket.attempt
                && entry.snapshot.state.is_submitting()
        }) else {
            debug!(
                "Dropping stale response for view {} attempt {}",
                ticket.view, ticket.attempt
            );
            return None;
        };

        entry.snapshot.state = std::mem::take(&mut entry.snapshot.state).transition(&event, policy);
        if entry.snapshot.state.is_success() {
            entry.snapshot.draft = Draft::default();
        }
        entry.touched = Instant::now();
        debug!("View {} is now {}", ticket.view, entry.snapshot.state.status());

        Some(entry.snapshot.state.clone())
    }
}
