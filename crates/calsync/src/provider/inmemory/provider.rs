//! In-memory provider implementation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use calsync_core::auth::AuthorizationState;
use calsync_core::calendar::{
    CalendarId, CalendarRef, EventId, EventRecord, NewCalendar, Source, SourceKind, Span,
};
use calsync_core::provider::{
    check_predicate_span, CalendarProvider, DateRange, EventPredicate, ProviderError, Result,
};

/// Widest predicate the provider accepts.
const MAX_PREDICATE_SPAN_DAYS: i64 = 4 * 366;

#[derive(Debug, Clone, Default)]
struct StoreData {
    /// Kept in creation order, which is the enumeration order.
    calendars: Vec<CalendarRef>,
    events: HashMap<EventId, EventRecord>,
}

#[derive(Debug, Default)]
struct Faults {
    removals: HashSet<EventId>,
    denials: HashSet<EventId>,
    save_titles: HashSet<String>,
    commits: bool,
}

#[derive(Debug, Default)]
struct Store {
    working: StoreData,
    committed: StoreData,
    faults: Faults,
}

impl Store {
    fn finish_write(&mut self, commit: bool) {
        if commit {
            self.committed = self.working.clone();
        }
    }
}

#[derive(Debug)]
struct Access {
    status: AuthorizationState,
    answer: bool,
    prompts: usize,
}

/// In-memory calendar provider for testing.
///
/// Writes land in a working copy. Writes made with `commit = true` (and
/// explicit commits) snapshot it; `reset` restores the last snapshot.
/// Recurrence is not modelled, so the span argument has no effect.
#[derive(Debug, Clone)]
pub struct InMemoryProvider {
    store: Arc<RwLock<Store>>,
    access: Arc<Mutex<Access>>,
    sources: Vec<Source>,
    default_source: Option<Source>,
    prompt_delay: Option<StdDuration>,
    max_span: Duration,
    mutations: Arc<AtomicUsize>,
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProvider {
    /// Creates an authorized provider with a local source and an iCloud source.
    ///
    /// The local source is the default one.
    pub fn new() -> Self {
        let local = Source::new("local", "On My Device", SourceKind::Local);
        let icloud = Source::new("icloud", "iCloud", SourceKind::CalDav);

        Self {
            store: Arc::new(RwLock::new(Store::default())),
            access: Arc::new(Mutex::new(Access {
                status: AuthorizationState::Authorized,
                answer: true,
                prompts: 0,
            })),
            sources: vec![local.clone(), icloud],
            default_source: Some(local),
            prompt_delay: None,
            max_span: Duration::days(MAX_PREDICATE_SPAN_DAYS),
            mutations: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_authorization(self, status: AuthorizationState) -> Self {
        self.access().status = status;
        self
    }

    /// Sets what the user answers when prompted for access.
    pub fn with_prompt_answer(self, granted: bool) -> Self {
        self.access().answer = granted;
        self
    }

    /// Makes the access prompt take `delay` before it is answered.
    pub fn with_prompt_delay(mut self, delay: StdDuration) -> Self {
        self.prompt_delay = Some(delay);
        self
    }

    pub fn with_sources(mut self, sources: Vec<Source>, default_source: Option<Source>) -> Self {
        self.sources = sources;
        self.default_source = default_source;
        self
    }

    pub fn with_max_span(mut self, max_span: Duration) -> Self {
        self.max_span = max_span;
        self
    }

    /// Changes the authorization status, e.g. to simulate a revocation in settings.
    pub fn set_authorization(&self, status: AuthorizationState) {
        self.access().status = status;
    }

    /// Number of times access was requested.
    pub fn prompt_count(&self) -> usize {
        self.access().prompts
    }

    /// Number of writes applied to the working copy.
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Returns true if the working copy differs from the last commit.
    pub async fn has_pending_changes(&self) -> bool {
        let store = self.store.read().await;
        store.working.calendars != store.committed.calendars
            || store.working.events != store.committed.events
    }

    /// Adds a committed calendar without checking whether its source allows it.
    ///
    /// Used to set up calendars in read-only sources.
    pub async fn seed_calendar(&self, title: &str, source: Source, writable: bool) -> CalendarRef {
        let calendar = CalendarRef {
            id: CalendarId::new(Uuid::new_v4().to_string()),
            title: title.to_string(),
            source,
            writable,
        };

        let mut store = self.store.write().await;
        store.working.calendars.push(calendar.clone());
        store.finish_write(true);
        calendar
    }

    /// Makes every removal of `id` fail.
    pub async fn fail_removal_of(&self, id: &EventId) {
        self.store.write().await.faults.removals.insert(id.clone());
    }

    /// Makes every removal of `id` fail as if access had been revoked.
    pub async fn deny_removal_of(&self, id: &EventId) {
        self.store.write().await.faults.denials.insert(id.clone());
    }

    /// Makes saving any event titled `title` fail.
    pub async fn fail_saves_titled(&self, title: &str) {
        self.store
            .write()
            .await
            .faults
            .save_titles
            .insert(title.to_string());
    }

    pub async fn fail_commits(&self, fail: bool) {
        self.store.write().await.faults.commits = fail;
    }

    fn access(&self) -> MutexGuard<'_, Access> {
        self.access.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_access(&self) -> Result<()> {
        match self.access().status {
            AuthorizationState::Authorized => Ok(()),
            _ => Err(ProviderError::AccessDenied),
        }
    }

    fn record_mutation(&self) {
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CalendarProvider for InMemoryProvider {
    fn authorization_status(&self) -> AuthorizationState {
        self.access().status
    }

    async fn request_access(&self) -> Result<bool> {
        if let Some(delay) = self.prompt_delay {
            tokio::time::sleep(delay).await;
        }

        let mut access = self.access();
        access.prompts += 1;
        access.status = if access.answer {
            AuthorizationState::Authorized
        } else {
            AuthorizationState::Denied
        };
        Ok(access.answer)
    }

    async fn calendars(&self) -> Result<Vec<CalendarRef>> {
        self.check_access()?;
        Ok(self.store.read().await.working.calendars.clone())
    }

    async fn sources(&self) -> Result<Vec<Source>> {
        self.check_access()?;
        Ok(self.sources.clone())
    }

    async fn default_source(&self) -> Result<Option<Source>> {
        self.check_access()?;
        Ok(self.default_source.clone())
    }

    async fn save_calendar(&self, calendar: &NewCalendar, commit: bool) -> Result<CalendarRef> {
        self.check_access()?;

        if !self.sources.iter().any(|s| s.id == calendar.source.id) {
            return Err(ProviderError::NotFound {
                entity_type: "Source",
                id: calendar.source.id.clone(),
            });
        }
        if !calendar.source.allows_calendar_changes {
            return Err(ProviderError::SourceReadOnly(calendar.source.title.clone()));
        }

        let saved = CalendarRef {
            id: CalendarId::new(Uuid::new_v4().to_string()),
            title: calendar.title.clone(),
            source: calendar.source.clone(),
            writable: true,
        };

        let mut store = self.store.write().await;
        store.working.calendars.push(saved.clone());
        store.finish_write(commit);
        self.record_mutation();

        Ok(saved)
    }

    async fn delete_calendar(&self, id: &CalendarId, commit: bool) -> Result<()> {
        self.check_access()?;

        let mut store = self.store.write().await;
        let index = store
            .working
            .calendars
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| ProviderError::NotFound {
                entity_type: "Calendar",
                id: id.to_string(),
            })?;

        let source = &store.working.calendars[index].source;
        if !source.allows_calendar_changes {
            return Err(ProviderError::SourceReadOnly(source.title.clone()));
        }

        store.working.calendars.remove(index);
        store
            .working
            .events
            .retain(|_, event| event.calendar_id.as_ref() != Some(id));
        store.finish_write(commit);
        self.record_mutation();

        Ok(())
    }

    async fn save_event(
        &self,
        event: &EventRecord,
        _span: Span,
        commit: bool,
    ) -> Result<EventRecord> {
        self.check_access()?;

        let calendar_id = event
            .calendar_id
            .clone()
            .ok_or(ProviderError::MissingCalendar)?;

        let mut store = self.store.write().await;
        let calendar = store
            .working
            .calendars
            .iter()
            .find(|c| c.id == calendar_id)
            .ok_or_else(|| ProviderError::NotFound {
                entity_type: "Calendar",
                id: calendar_id.to_string(),
            })?;
        if !calendar.writable {
            return Err(ProviderError::CalendarReadOnly(calendar.title.clone()));
        }
        if event.end < event.start {
            return Err(ProviderError::InvalidDates(
                "end precedes start".to_string(),
            ));
        }
        if store.faults.save_titles.contains(&event.title) {
            return Err(ProviderError::Rejected(format!(
                "event '{}' could not be saved",
                event.title
            )));
        }

        // Moving an event to another calendar invalidates its identifier.
        let id = match &event.id {
            Some(id) => {
                let existing = store.working.events.get(id).ok_or_else(|| {
                    ProviderError::NotFound {
                        entity_type: "Event",
                        id: id.to_string(),
                    }
                })?;
                if existing.calendar_id.as_ref() == Some(&calendar_id) {
                    id.clone()
                } else {
                    store.working.events.remove(id);
                    EventId::new(Uuid::new_v4().to_string())
                }
            }
            None => EventId::new(Uuid::new_v4().to_string()),
        };

        let saved = EventRecord {
            id: Some(id.clone()),
            ..event.clone()
        };
        store.working.events.insert(id, saved.clone());
        store.finish_write(commit);
        self.record_mutation();

        Ok(saved)
    }

    async fn delete_event(&self, id: &EventId, _span: Span, commit: bool) -> Result<()> {
        self.check_access()?;

        let mut store = self.store.write().await;
        let event = store
            .working
            .events
            .get(id)
            .ok_or_else(|| ProviderError::NotFound {
                entity_type: "Event",
                id: id.to_string(),
            })?;

        let read_only = store
            .working
            .calendars
            .iter()
            .find(|c| Some(&c.id) == event.calendar_id.as_ref())
            .filter(|c| !c.writable);
        if let Some(calendar) = read_only {
            return Err(ProviderError::CalendarReadOnly(calendar.title.clone()));
        }
        if store.faults.denials.contains(id) {
            return Err(ProviderError::AccessDenied);
        }
        if store.faults.removals.contains(id) {
            return Err(ProviderError::Rejected(format!(
                "event {id} could not be removed"
            )));
        }

        store.working.events.remove(id);
        store.finish_write(commit);
        self.record_mutation();

        Ok(())
    }

    async fn event(&self, id: &EventId) -> Result<Option<EventRecord>> {
        self.check_access()?;
        Ok(self.store.read().await.working.events.get(id).cloned())
    }

    fn predicate(&self, range: DateRange, calendars: &[CalendarId]) -> Result<EventPredicate> {
        self.check_access()?;
        check_predicate_span(&range, self.max_span)?;
        Ok(EventPredicate::new(range, calendars.to_vec()))
    }

    async fn events_matching(&self, predicate: &EventPredicate) -> Result<Vec<EventRecord>> {
        self.check_access()?;

        let store = self.store.read().await;
        Ok(store
            .working
            .events
            .values()
            .filter(|e| {
                e.calendar_id
                    .as_ref()
                    .is_some_and(|calendar| predicate.matches(calendar, e.start, e.end))
            })
            .cloned()
            .collect())
    }

    async fn commit(&self) -> Result<()> {
        self.check_access()?;

        let mut store = self.store.write().await;
        if store.faults.commits {
            return Err(ProviderError::Backend(
                "the calendar database refused the commit".to_string(),
            ));
        }
        store.finish_write(true);
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        let mut store = self.store.write().await;
        store.working = store.committed.clone();
        Ok(())
    }
}
