//! The running pagination engine.

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::binding::AttachmentHub;
use crate::error::PageError;

use super::config::{CombineFn, PagerConfig, TransformFn};
use super::PageSource;

/// A running pagination engine for one screen.
///
/// Triggers go in through [`next_page`](Self::next_page) and
/// [`start_over`](Self::start_over); results come out as `watch` channels:
/// the accumulated [`data`](Self::data), whether a fetch is outstanding
/// ([`is_fetching`](Self::is_fetching)) and the 1-based index of the page
/// being loaded ([`loading_page`](Self::loading_page)).
///
/// Each `start_over` opens a new session that fully supersedes the
/// previous one: an in-flight fetch is cancelled by dropping its future
/// and its result is discarded. Within a session fetches are strictly
/// sequential. A fetch is retried immediately on failure up to the
/// configured bound; when all attempts fail the session stops advancing,
/// which on the data stream looks exactly like the end of the data. The
/// optional error channel (see [`PagerConfig::surface_errors`]) reports
/// the give-up to consumers that want to know.
pub struct Pager<S: PageSource> {
    next_tx: mpsc::UnboundedSender<()>,
    start_tx: mpsc::UnboundedSender<S::Params>,
    data_rx: watch::Receiver<Vec<S::Item>>,
    fetching_rx: watch::Receiver<bool>,
    page_rx: watch::Receiver<u32>,
    errors_rx: Option<mpsc::UnboundedReceiver<PageError>>,
}

impl<S: PageSource> Pager<S> {
    /// Spawn the engine under `hub`.
    ///
    /// The driver task runs until the hub's termination latches, every
    /// trigger handle is dropped, or the pager itself is dropped -
    /// whichever comes first. If the config carries
    /// [`start_with`](PagerConfig::start_with) parameters the first
    /// session begins immediately.
    pub fn spawn(source: S, config: PagerConfig<S>, hub: &AttachmentHub) -> Self {
        let (next_tx, next_rx) = mpsc::unbounded_channel();
        let (start_tx, start_rx) = mpsc::unbounded_channel();
        let (data_tx, data_rx) = watch::channel(Vec::new());
        let (fetching_tx, fetching_rx) = watch::channel(false);
        let (page_tx, page_rx) = watch::channel(0);
        let (errors_rx, error_tx) = if config.surface_errors {
            let (tx, rx) = mpsc::unbounded_channel();
            (Some(rx), Some(tx))
        } else {
            (None, None)
        };

        let driver = Driver {
            source,
            retry_attempts: config.retry_attempts,
            reset_on_start_over: config.reset_on_start_over,
            dedupe_consecutive: config.dedupe_consecutive,
            transform: config.transform,
            combine: config.combine,
            data_tx,
            fetching_tx,
            page_tx,
            error_tx,
            next_rx,
        };
        hub.spawn(run(driver, start_rx, config.initial_params));

        Self {
            next_tx,
            start_tx,
            data_rx,
            fetching_rx,
            page_rx,
            errors_rx,
        }
    }

    /// Ask for the next page of the current session.
    ///
    /// Ignored while no session is active and after the current session
    /// reached the end of its data.
    pub fn next_page(&self) {
        let _ = self.next_tx.send(());
    }

    /// Open a fresh session with `params`, superseding the current one.
    pub fn start_over(&self, params: S::Params) {
        let _ = self.start_tx.send(params);
    }

    /// The accumulated item sequence, re-emitted every time a page is
    /// merged in.
    pub fn data(&self) -> watch::Receiver<Vec<S::Item>> {
        self.data_rx.clone()
    }

    /// A snapshot of the current accumulated items.
    pub fn items(&self) -> Vec<S::Item> {
        self.data_rx.borrow().clone()
    }

    /// True exactly while a page fetch is outstanding.
    pub fn is_fetching(&self) -> watch::Receiver<bool> {
        self.fetching_rx.clone()
    }

    /// 1-based index of the page being loaded within the current session;
    /// 0 before the first session starts.
    pub fn loading_page(&self) -> watch::Receiver<u32> {
        self.page_rx.clone()
    }

    /// Take the error channel, if [`PagerConfig::surface_errors`] was set.
    ///
    /// Delivers one [`PageError::Exhausted`] per given-up fetch. Can be
    /// taken once.
    pub fn take_errors(&mut self) -> Option<mpsc::UnboundedReceiver<PageError>> {
        self.errors_rx.take()
    }
}

/// What the driver fetches next.
enum Fetch<'a, S: PageSource> {
    Initial(&'a S::Params),
    After(&'a S::Cursor),
}

struct Driver<S: PageSource> {
    source: S,
    retry_attempts: u32,
    reset_on_start_over: bool,
    dedupe_consecutive: bool,
    transform: Option<TransformFn<S::Item>>,
    combine: Option<CombineFn<S::Item>>,
    data_tx: watch::Sender<Vec<S::Item>>,
    fetching_tx: watch::Sender<bool>,
    page_tx: watch::Sender<u32>,
    error_tx: Option<mpsc::UnboundedSender<PageError>>,
    next_rx: mpsc::UnboundedReceiver<()>,
}

/// Outer loop: one iteration per session, switch-latest across sessions.
async fn run<S: PageSource>(
    mut driver: Driver<S>,
    mut start_rx: mpsc::UnboundedReceiver<S::Params>,
    initial: Option<S::Params>,
) {
    let mut pending = initial;
    loop {
        let params = match pending.take() {
            Some(params) => params,
            None => match start_rx.recv().await {
                Some(params) => params,
                None => return,
            },
        };

        // Triggers aimed at the superseded session must not leak into
        // this one.
        while driver.next_rx.try_recv().is_ok() {}

        tokio::select! {
            // A newer start-over wins: the session future is dropped,
            // cancelling its in-flight fetch.
            newer = start_rx.recv() => match newer {
                Some(params) => {
                    debug!("session superseded by new start-over");
                    pending = Some(params);
                }
                None => return,
            },
            _ = driver.session(&params) => {
                // Session ran to its end of data (or gave up). Idle until
                // the next start-over.
            }
        }
    }
}

impl<S: PageSource> Driver<S> {
    /// One pagination session: an initial fetch, then one fetch per
    /// accepted next-page trigger, strictly sequential.
    async fn session(&mut self, params: &S::Params) {
        self.page_tx.send_replace(1);

        let Some(page) = self.fetch(Fetch::Initial(params)).await else {
            return;
        };
        let mut cursor = self.source.cursor(&page);
        let items = self.transformed_items(&page);
        let ended = items.is_empty() || cursor.is_none();
        self.merge(items, true);
        if ended {
            return;
        }

        while self.next_rx.recv().await.is_some() {
            let page_no = *self.page_tx.borrow() + 1;
            self.page_tx.send_replace(page_no);

            // cursor is always Some here; a None ended the session above.
            let current = cursor.clone().expect("session advanced without a cursor");
            let Some(page) = self.fetch(Fetch::After(&current)).await else {
                return;
            };
            cursor = self.source.cursor(&page);
            let items = self.transformed_items(&page);
            let ended = items.is_empty() || cursor.is_none();
            self.merge(items, false);
            if ended {
                return;
            }
        }
    }

    /// Fetch one page with the configured retry bound. `None` means every
    /// attempt failed; the give-up is reported on the error channel and
    /// swallowed on the data path.
    async fn fetch(&mut self, what: Fetch<'_, S>) -> Option<S::Page> {
        let _guard = FetchingGuard::engage(&self.fetching_tx);
        let attempts = self.retry_attempts + 1;
        let mut last = None;
        for attempt in 1..=attempts {
            let result = match &what {
                Fetch::Initial(params) => self.source.load_initial(params).await,
                Fetch::After(cursor) => self.source.load_after(cursor).await,
            };
            match result {
                Ok(page) => return Some(page),
                Err(err) => {
                    warn!(attempt, attempts, error = %err, "page fetch failed");
                    last = Some(err);
                }
            }
        }
        let err = PageError::Exhausted {
            attempts,
            last: Box::new(last.expect("at least one attempt was made")),
        };
        if let Some(tx) = &self.error_tx {
            let _ = tx.send(err);
        }
        None
    }

    fn transformed_items(&self, page: &S::Page) -> Vec<S::Item> {
        let items = self.source.items(page);
        match &self.transform {
            Some(transform) => transform(items),
            None => items,
        }
    }

    /// Merge a page into the running total and emit, honoring the
    /// reset-on-start-over and dedupe policies.
    fn merge(&mut self, new_items: Vec<S::Item>, first_page_of_session: bool) {
        let accumulated = if first_page_of_session && self.reset_on_start_over {
            Vec::new()
        } else {
            self.data_tx.borrow().clone()
        };
        let merged = match &self.combine {
            Some(combine) => combine(accumulated, new_items),
            None => {
                let mut merged = accumulated;
                merged.extend(new_items);
                merged
            }
        };
        if self.dedupe_consecutive && *self.data_tx.borrow() == merged {
            return;
        }
        self.data_tx.send_replace(merged);
    }
}

/// Holds `is_fetching` true for exactly as long as it lives. Dropping the
/// fetch future - success, give-up, supersession or lifecycle termination
/// - releases it.
struct FetchingGuard<'a> {
    fetching_tx: &'a watch::Sender<bool>,
}

impl<'a> FetchingGuard<'a> {
    fn engage(fetching_tx: &'a watch::Sender<bool>) -> Self {
        fetching_tx.send_replace(true);
        Self { fetching_tx }
    }
}

impl Drop for FetchingGuard<'_> {
    fn drop(&mut self) {
        self.fetching_tx.send_replace(false);
    }
}
