//! Paginated transaction lists for a single view.
//!
//! `PaginatedList` is the synchronous state machine: it hands out a
//! `PageTicket` for each fetch and applies results against it. `Feed` drives
//! it asynchronously against a `PageSource`, never holding its lock across an
//! upstream request. Each fetch and its completion run in a spawned task, so
//! a dropped request still moves the list out of `Loading`.

use crate::blockchain::client::{ClientError, ScanClient};
use crate::normalize::identity_key;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::{Debug, Display};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedState {
    Idle,
    Loading { page: u32 },
    HasMore { next_page: u32 },
    Exhausted,
    Errored { message: String },
}

/// Permission to fetch one page, tied to the generation that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket<K> {
    pub generation: u64,
    pub key: K,
    pub page: u32,
    pub page_size: u32,
}

/// Point-in-time copy of a list, safe to hand out of the lock.
#[derive(Debug, Clone, Serialize)]
pub struct FeedSnapshot<K> {
    pub key: Option<K>,
    #[serde(flatten)]
    pub state: FeedState,
    pub items: Vec<Value>,
}

impl<K> FeedSnapshot<K> {
    /// Whether continuation is currently enabled.
    pub fn has_more(&self) -> bool {
        matches!(self.state, FeedState::HasMore { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FeedState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FeedState::Errored { message } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct PaginatedList<K> {
    key: Option<K>,
    generation: u64,
    page_size: u32,
    state: FeedState,
    items: Vec<Value>,
    seen: HashSet<String>,
}

impl<K: Clone + PartialEq> PaginatedList<K> {
    pub fn new(page_size: u32) -> Self {
        Self {
            key: None,
            generation: 0,
            page_size: page_size.max(1),
            state: FeedState::Idle,
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Point the list at `key` and start over from page 1.
    ///
    /// Clears accumulated items and invalidates every outstanding ticket.
    pub fn reset(&mut self, key: K) -> PageTicket<K> {
        self.generation += 1;
        self.key = Some(key.clone());
        self.items.clear();
        self.seen.clear();
        self.state = FeedState::Loading { page: 1 };

        PageTicket {
            generation: self.generation,
            key,
            page: 1,
            page_size: self.page_size,
        }
    }

    /// Ticket for the next page, or `None` when continuation is not enabled
    /// (idle, already loading, exhausted or errored).
    pub fn begin_next(&mut self) -> Option<PageTicket<K>> {
        let next_page = match self.state {
            FeedState::HasMore { next_page } => next_page,
            _ => return None,
        };
        let key = self.key.clone()?;
        self.state = FeedState::Loading { page: next_page };

        Some(PageTicket {
            generation: self.generation,
            key,
            page: next_page,
            page_size: self.page_size,
        })
    }

    /// Apply the outcome of a fetch. Returns `false` if the ticket is stale
    /// and the outcome was discarded.
    pub fn complete(&mut self, ticket: &PageTicket<K>, outcome: Result<Vec<Value>, String>) -> bool {
        let current = ticket.generation == self.generation
            && self.key.as_ref() == Some(&ticket.key)
            && self.state == FeedState::Loading { page: ticket.page };
        if !current {
            return false;
        }

        match outcome {
            Ok(page_items) => {
                let returned = page_items.len();
                if ticket.page == 1 {
                    self.items.clear();
                    self.seen.clear();
                }
                self.merge(page_items);

                self.state = if returned == ticket.page_size as usize {
                    FeedState::HasMore { next_page: ticket.page + 1 }
                } else {
                    FeedState::Exhausted
                };
            }
            Err(message) => {
                self.state = FeedState::Errored { message };
            }
        }
        true
    }

    /// Append items, dropping any whose identity key was already seen.
    fn merge(&mut self, page_items: Vec<Value>) {
        for item in page_items {
            if self.seen.insert(identity_key(&item)) {
                self.items.push(item);
            }
        }
    }

    pub fn snapshot(&self) -> FeedSnapshot<K> {
        FeedSnapshot {
            key: self.key.clone(),
            state: self.state.clone(),
            items: self.items.clone(),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FeedError {
    #[error("No active view for {0}")]
    NotActive(String),

    #[error("View for {0} was replaced by a newer navigation")]
    Superseded(String),

    #[error("Page load for {0} was aborted")]
    Aborted(String),
}

/// Where a feed gets its pages from.
pub trait PageSource: Send + Sync + 'static {
    type Key: Clone + PartialEq + Display + Debug + Send + Sync + 'static;

    fn fetch_page<'a>(
        &'a self,
        key: &'a Self::Key,
        page: u32,
        page_size: u32,
    ) -> BoxFuture<'a, Result<Vec<Value>, ClientError>>;
}

/// Recent transactions of an address, from the scan API.
#[derive(Clone)]
pub struct AddressTransactions {
    pub scan: ScanClient,
}

impl PageSource for AddressTransactions {
    type Key = String;

    fn fetch_page<'a>(
        &'a self,
        key: &'a String,
        page: u32,
        page_size: u32,
    ) -> BoxFuture<'a, Result<Vec<Value>, ClientError>> {
        Box::pin(self.scan.get_address_transactions(key, page, page_size))
    }
}

/// Transactions of an epoch, from the scan API.
#[derive(Clone)]
pub struct EpochTransactions {
    pub scan: ScanClient,
}

impl PageSource for EpochTransactions {
    type Key = u64;

    fn fetch_page<'a>(
        &'a self,
        key: &'a u64,
        page: u32,
        page_size: u32,
    ) -> BoxFuture<'a, Result<Vec<Value>, ClientError>> {
        Box::pin(self.scan.get_epoch_transactions(*key, page, page_size))
    }
}

/// A paginated list bound to its page source.
pub struct Feed<S: PageSource> {
    source: Arc<S>,
    list: Arc<Mutex<PaginatedList<S::Key>>>,
}

impl<S: PageSource> Feed<S> {
    pub fn new(source: S, page_size: u32) -> Self {
        Self {
            source: Arc::new(source),
            list: Arc::new(Mutex::new(PaginatedList::new(page_size))),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn snapshot(&self) -> FeedSnapshot<S::Key> {
        self.list.lock().await.snapshot()
    }

    /// Navigate to `key`: reset the list and load page 1.
    pub async fn navigate(&self, key: S::Key) -> Result<FeedSnapshot<S::Key>, FeedError> {
        let ticket = self.list.lock().await.reset(key);
        info!("Loading first page for {}", ticket.key);
        self.run(ticket).await
    }

    /// Load the next page of the list currently showing `key`.
    ///
    /// A no-op (returning the current snapshot) unless continuation is
    /// enabled.
    pub async fn load_more(&self, key: &S::Key) -> Result<FeedSnapshot<S::Key>, FeedError> {
        let ticket = {
            let mut list = self.list.lock().await;
            if list.key() != Some(key) {
                return Err(FeedError::NotActive(key.to_string()));
            }
            match list.begin_next() {
                Some(ticket) => ticket,
                None => {
                    debug!("Continuation for {} ignored in state {:?}", key, list.state());
                    return Ok(list.snapshot());
                }
            }
        };
        self.run(ticket).await
    }

    /// Fetch and apply one page in a task of its own. Dropping the caller
    /// only stops the wait, the list is still completed.
    async fn run(&self, ticket: PageTicket<S::Key>) -> Result<FeedSnapshot<S::Key>, FeedError> {
        let source = Arc::clone(&self.source);
        let list = Arc::clone(&self.list);
        let pending = ticket.clone();

        let task = tokio::spawn(async move {
            let outcome = source
                .fetch_page(&ticket.key, ticket.page, ticket.page_size)
                .await
                .map_err(|e| {
                    warn!("Failed to fetch page {} for {}: {}", ticket.page, ticket.key, e);
                    e.to_string()
                });

            let mut list = list.lock().await;
            if !list.complete(&ticket, outcome) {
                debug!("Discarding stale page {} for {}", ticket.page, ticket.key);
                return Err(FeedError::Superseded(ticket.key.to_string()));
            }
            Ok(list.snapshot())
        });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                error!("Page {} load for {} failed: {}", pending.page, pending.key, e);
                let mut list = self.list.lock().await;
                list.complete(&pending, Err("Page load aborted".to_string()));
                Err(FeedError::Aborted(pending.key.to_string()))
            }
        }
    }
}
