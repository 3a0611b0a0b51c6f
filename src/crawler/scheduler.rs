//! Scheduler for handing pages from discoverers to workers
//!
//! This module handles:
//! - The frontier: a handoff queue between link discovery and the workers
//! - The admission gate: a cap on link submissions waiting to hand off
//! - The completion join: counting outstanding pages to detect exhaustion
//!
//! Fetch concurrency is bounded separately, by the number of workers
//! draining the frontier.

use crate::state::Page;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Notify, OwnedSemaphorePermit, Semaphore};

/// Handoff queue of pages waiting for a worker
///
/// The channel buffers a single page: once one page is waiting, further
/// sends block until a worker takes it. All workers share the one receiver.
#[derive(Debug)]
pub struct Frontier {
    sender: mpsc::Sender<Page>,
    receiver: Mutex<mpsc::Receiver<Page>>,
    closed: AtomicBool,
    close_notify: Notify,
}

impl Frontier {
    /// Creates an open, empty frontier
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel(1);
        Self {
            sender,
            receiver: Mutex::new(receiver),
            closed: AtomicBool::new(false),
            close_notify: Notify::new(),
        }
    }

    /// Hands a page to the next free worker, waiting until one takes it
    ///
    /// Returns the page back if the frontier has been closed.
    pub async fn send(&self, page: Page) -> Result<(), Page> {
        if self.is_closed() {
            return Err(page);
        }
        self.sender.send(page).await.map_err(|e| e.0)
    }

    /// Waits for the next page, or returns `None` once the frontier is closed
    pub async fn recv(&self) -> Option<Page> {
        let closed = self.close_notify.notified();
        tokio::pin!(closed);
        closed.as_mut().enable();

        if self.is_closed() {
            return None;
        }

        tokio::select! {
            biased;
            _ = closed => None,
            page = async { self.receiver.lock().await.recv().await } => page,
        }
    }

    /// Closes the frontier, releasing every worker blocked in [`Frontier::recv`]
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.close_notify.notify_waiters();
    }

    /// Returns true once [`Frontier::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded limiter on link submissions in flight
///
/// A slot is held only while a submission waits for the frontier to accept
/// its page, not while the page is processed.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    width: usize,
}

impl AdmissionGate {
    /// Creates a gate admitting up to `width` concurrent submissions
    pub fn new(width: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(width)),
            width,
        }
    }

    /// Waits for a free slot; the slot is released when the permit drops
    ///
    /// Returns `None` only if the gate was shut down.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.semaphore).acquire_owned().await.ok()
    }

    /// Number of slots currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Total number of slots
    pub fn width(&self) -> usize {
        self.width
    }
}

/// Countdown of pages submitted but not yet fully handled
///
/// Every submitted page adds one unit (the root included) and every page a
/// worker finishes with removes one, whatever happened to it. The crawl is
/// exhausted when the count returns to zero.
#[derive(Debug, Default)]
pub struct CompletionJoin {
    outstanding: AtomicUsize,
    idle: Notify,
}

impl CompletionJoin {
    /// Creates a join with nothing outstanding
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one more outstanding page
    pub fn add(&self) {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
    }

    /// Marks one outstanding page as handled
    pub fn done(&self) {
        let previous = self.outstanding.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "completion join released more than added");
        if previous == 1 {
            self.idle.notify_waiters();
        }
    }

    /// Number of pages still outstanding
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Waits until no page is outstanding
    pub async fn wait(&self) {
        loop {
            let idle = self.idle.notified();
            tokio::pin!(idle);
            idle.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }

            idle.await;
        }
    }
}

/// Scheduler ties the frontier, the admission gate and the completion join together
#[derive(Debug, Clone)]
pub struct Scheduler {
    frontier: Arc<Frontier>,
    gate: AdmissionGate,
    join: Arc<CompletionJoin>,
}

impl Scheduler {
    /// Creates a scheduler whose admission gate has `admission_width` slots
    pub fn new(admission_width: usize) -> Self {
        Self {
            frontier: Arc::new(Frontier::new()),
            gate: AdmissionGate::new(admission_width),
            join: Arc::new(CompletionJoin::new()),
        }
    }

    /// Submits a page to the frontier without blocking the caller
    pub fn submit(&self, page: Page) {
        self.submit_all(vec![page]);
    }

    /// Submits a batch of pages to the frontier without blocking the caller
    ///
    /// Every page is counted in the completion join right away. A single
    /// submitter task then takes admission slots one page at a time and hands
    /// each slot to a short-lived send task, which waits for a worker to
    /// accept the page and gives the slot back. A page with many links
    /// therefore never has more than one task waiting on the gate.
    pub fn submit_all(&self, pages: Vec<Page>) {
        if pages.is_empty() {
            return;
        }
        for _ in &pages {
            self.join.add();
        }

        let frontier = Arc::clone(&self.frontier);
        let gate = self.gate.clone();
        let join = Arc::clone(&self.join);

        tokio::spawn(async move {
            let mut pages = pages.into_iter();
            while let Some(page) = pages.next() {
                let Some(slot) = gate.acquire().await else {
                    join.done();
                    pages.by_ref().for_each(|_| join.done());
                    return;
                };

                let frontier = Arc::clone(&frontier);
                let join = Arc::clone(&join);
                tokio::spawn(async move {
                    let _slot = slot;
                    if let Err(page) = frontier.send(page).await {
                        tracing::debug!("Frontier closed, dropping {}", page.url);
                        join.done();
                    }
                });
            }
        });
    }

    /// Waits for the next page to handle; `None` means the crawl is over
    pub async fn next_page(&self) -> Option<Page> {
        self.frontier.recv().await
    }

    /// Marks a page received from [`Scheduler::next_page`] as fully handled
    pub fn complete(&self) {
        self.join.done();
    }

    /// Waits until every submitted page has been handled
    pub async fn wait_idle(&self) {
        self.join.wait().await;
    }

    /// Closes the frontier so that idle workers stop
    pub fn close(&self) {
        self.frontier.close();
    }

    /// Number of pages submitted but not yet handled
    pub fn outstanding(&self) -> usize {
        self.join.outstanding()
    }

    /// Number of free admission slots; all of them are free once every
    /// submitted page has been accepted by a worker
    pub fn free_slots(&self) -> usize {
        self.gate.available()
    }
}
