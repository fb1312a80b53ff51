use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::extraction::extractor::ResumeExtractor;
use crate::models::resume::ResumeRecord;
use crate::render::CategoryTable;
use crate::upload::UploadController;

/// Cookie carrying a visitor's session id.
pub const SESSION_COOKIE: &str = "folio_session";

/// Sessions remembered at once. The oldest is forgotten first.
pub const MAX_SESSIONS: usize = 1024;

/// The session named by the request's cookie, if it holds a valid id.
pub fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

pub fn session_cookie(session: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[derive(Debug, Clone, Default)]
struct Sessions {
    records: HashMap<Uuid, Arc<ResumeRecord>>,
    /// Insertion order, for eviction.
    order: VecDeque<Uuid>,
}

impl Sessions {
    fn with(&self, session: Uuid, record: Arc<ResumeRecord>, capacity: usize) -> Self {
        let mut next = self.clone();
        if next.records.insert(session, record).is_none() {
            next.order.push_back(session);
        }
        while next.order.len() > capacity {
            if let Some(oldest) = next.order.pop_front() {
                next.records.remove(&oldest);
            }
        }
        next
    }
}

/// Résumés on display, one per visitor session.
///
/// Visitors without a parsed upload see the seeded default. A successful
/// parse replaces the record of the uploader's session only. The session
/// map is swapped wholesale, so readers always see complete records.
pub struct ResumeStore {
    seeded: Arc<ResumeRecord>,
    sessions: ArcSwap<Sessions>,
    capacity: usize,
}

impl ResumeStore {
    pub fn new(seeded: ResumeRecord) -> Self {
        Self::with_capacity(seeded, MAX_SESSIONS)
    }

    pub fn with_capacity(seeded: ResumeRecord, capacity: usize) -> Self {
        Self {
            seeded: Arc::new(seeded),
            sessions: ArcSwap::from_pointee(Sessions::default()),
            capacity: capacity.max(1),
        }
    }

    /// The record shown to `session`, falling back to the seeded default.
    pub fn get(&self, session: Option<Uuid>) -> Arc<ResumeRecord> {
        session
            .and_then(|id| self.sessions.load().records.get(&id).cloned())
            .unwrap_or_else(|| self.seeded())
    }

    /// The compiled-in résumé, regardless of later uploads.
    pub fn seeded(&self) -> Arc<ResumeRecord> {
        Arc::clone(&self.seeded)
    }

    pub fn replace(&self, session: Uuid, record: ResumeRecord) -> Arc<ResumeRecord> {
        let record = Arc::new(record);
        self.sessions
            .rcu(|sessions| sessions.with(session, Arc::clone(&record), self.capacity));
        record
    }

    #[cfg(test)]
    pub fn session_count(&self) -> usize {
        self.sessions.load().records.len()
    }
}

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub resume: Arc<ResumeStore>,
    /// Pluggable extraction backend. Default: LlmResumeExtractor.
    pub extractor: Arc<dyn ResumeExtractor>,
    pub uploader: Arc<UploadController>,
    pub categories: Arc<CategoryTable>,
}

impl AppState {
    pub fn new(seeded: ResumeRecord, extractor: Arc<dyn ResumeExtractor>) -> Self {
        let resume = Arc::new(ResumeStore::new(seeded));
        let uploader = Arc::new(UploadController::new(
            Arc::clone(&extractor),
            Arc::clone(&resume),
        ));
        Self {
            resume,
            extractor,
            uploader,
            categories: Arc::new(CategoryTable::default()),
        }
    }
}
