//! Lifecycle binding: attachment tracking and pipeline termination.
//!
//! Every view-model owns an [`AttachmentHub`]. The hub tracks the at most
//! one owner currently attached to the view-model and watches that owner's
//! lifecycle events. The first *permanent* terminal event of the currently
//! attached owner latches the hub's termination flag; every pipeline bound
//! through [`AttachmentHub::bind_stream`], [`AttachmentHub::bind_future`]
//! or [`AttachmentHub::spawn`] completes at that point and not before.
//!
//! Transient events never latch: a paused or stopped owner, a screen
//! destroyed for a configuration change, or a nested view whose view layer
//! is being rebuilt all leave bound pipelines running, because the same
//! view-model will be re-attached to the recreated owner. Once a new owner
//! attaches, terminal events from the previous owner are ignored.
//!
//! The hub generates no errors of its own; it only gates completion.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures_util::{FutureExt, Stream, StreamExt};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::lifecycle::{OwnerHandle, Termination};

/// A cloneable handle observing a hub's latched termination flag.
///
/// The flag only ever transitions false → true. If the owning hub is
/// dropped without latching, the signal resolves as terminated anyway:
/// a discarded view-model must not keep pipelines alive.
#[derive(Debug, Clone)]
pub struct TerminationSignal {
    rx: watch::Receiver<bool>,
}

impl TerminationSignal {
    /// Whether termination has been latched.
    pub fn is_terminated(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once termination is latched (or the hub is gone).
    pub async fn terminated(mut self) {
        // Err means the sender side is gone; treat that as terminated.
        let _ = self.rx.wait_for(|latched| *latched).await;
    }
}

/// Tracks the current owner attachment for one view-model and latches
/// termination on the attached owner's first permanent terminal event.
///
/// Must be created inside a tokio runtime; construction spawns the
/// background watcher that follows attachment changes.
#[derive(Debug)]
pub struct AttachmentHub {
    attached_tx: watch::Sender<Option<OwnerHandle>>,
    terminated_tx: Arc<watch::Sender<bool>>,
}

impl AttachmentHub {
    /// Create a hub with no current attachment.
    pub fn new() -> Self {
        let (attached_tx, attached_rx) = watch::channel(None);
        let (terminated_tx, _) = watch::channel(false);
        let terminated_tx = Arc::new(terminated_tx);
        tokio::spawn(watch_attachments(attached_rx, Arc::clone(&terminated_tx)));
        Self {
            attached_tx,
            terminated_tx,
        }
    }

    /// Attach an owner, replacing any current attachment.
    pub fn attach(&self, owner: OwnerHandle) {
        if self.is_terminated() {
            warn!(owner = %owner.id(), "attach after termination has no effect");
            return;
        }
        debug!(owner = %owner.id(), kind = %owner.kind(), "owner attached");
        let _ = self.attached_tx.send(Some(owner));
    }

    /// Clear the current attachment, if any.
    pub fn detach(&self) {
        let _ = self.attached_tx.send(None);
    }

    /// The currently attached owner, if any.
    pub fn current(&self) -> Option<OwnerHandle> {
        self.attached_tx.borrow().clone()
    }

    /// Whether an owner is currently attached.
    pub fn is_attached(&self) -> bool {
        self.attached_tx.borrow().is_some()
    }

    /// Whether termination has been latched.
    pub fn is_terminated(&self) -> bool {
        *self.terminated_tx.borrow()
    }

    /// Latch termination directly, completing every bound pipeline.
    ///
    /// Called from a view-model's destruction hook so that registry-driven
    /// teardown cancels all owned subscriptions.
    pub fn close(&self) {
        if !self.is_terminated() {
            debug!("attachment hub closed");
            let _ = self.terminated_tx.send(true);
        }
    }

    /// A signal that resolves when termination latches.
    pub fn termination(&self) -> TerminationSignal {
        TerminationSignal {
            rx: self.terminated_tx.subscribe(),
        }
    }

    /// Gate a stream on this hub's termination.
    ///
    /// The returned stream yields the inner stream's items until the first
    /// permanent terminal event of the currently attached owner (or a
    /// [`close`](Self::close)), then ends. Pause/stop and transient
    /// destroys do not end it.
    pub fn bind_stream<S>(&self, stream: S) -> BoxStream<'static, S::Item>
    where
        S: Stream + Send + 'static,
        S::Item: Send,
    {
        stream.take_until(self.termination().terminated()).boxed()
    }

    /// Gate a future on this hub's termination.
    ///
    /// Resolves `Some(output)` if the future finishes first, `None` if
    /// termination wins; the inner future is dropped in that case.
    pub fn bind_future<F>(&self, fut: F) -> BoxFuture<'static, Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send,
    {
        let signal = self.termination();
        async move {
            tokio::select! {
                _ = signal.terminated() => None,
                out = fut => Some(out),
            }
        }
        .boxed()
    }

    /// Spawn a task that is aborted (by dropping its future) when
    /// termination latches. Long-lived drivers run under this.
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let signal = self.termination();
        tokio::spawn(async move {
            tokio::select! {
                _ = signal.terminated() => {}
                _ = fut => {}
            }
        })
    }
}

impl Default for AttachmentHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Follows the attachment stream; for whichever owner is current, watches
/// that owner's events and latches on the first permanent terminal one.
async fn watch_attachments(
    mut attached_rx: watch::Receiver<Option<OwnerHandle>>,
    terminated_tx: Arc<watch::Sender<bool>>,
) {
    loop {
        let current = attached_rx.borrow_and_update().clone();
        let owner = match current {
            Some(owner) => owner,
            None => {
                if attached_rx.changed().await.is_err() {
                    return;
                }
                continue;
            }
        };

        let mut events = owner.subscribe();

        // An owner can reach its terminal event before we subscribe (or
        // before it was attached at all); the phase check catches that.
        if let Some(last) = owner.phase() {
            if owner.termination_for(last) == Some(Termination::Permanent) {
                latch(&owner, &terminated_tx);
                return;
            }
        }

        loop {
            tokio::select! {
                changed = attached_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    // Re-read the attachment; the old owner's feed is
                    // dropped along with `events`.
                    break;
                }
                event = events.recv() => match event {
                    Ok(event) => {
                        if owner.termination_for(event) != Some(Termination::Permanent) {
                            continue;
                        }
                        // Only the *currently* attached owner may latch; a
                        // terminal event racing a re-attachment is stale.
                        let still_current = attached_rx
                            .borrow()
                            .as_ref()
                            .map(|cur| Arc::ptr_eq(cur, &owner))
                            .unwrap_or(false);
                        if still_current {
                            latch(&owner, &terminated_tx);
                            return;
                        }
                        break;
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(owner = %owner.id(), missed, "lagged behind lifecycle feed");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        // Owner dropped without a permanent terminal event;
                        // wait for the next attachment.
                        if attached_rx.changed().await.is_err() {
                            return;
                        }
                        break;
                    }
                }
            }
        }
    }
}

fn latch(owner: &OwnerHandle, terminated_tx: &watch::Sender<bool>) {
    debug!(owner = %owner.id(), "permanent termination latched");
    let _ = terminated_tx.send(true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::LifecycleEvent::*;
    use crate::lifecycle::{Owner, OwnerKind};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, timeout};

    const TICK: Duration = Duration::from_millis(50);
    const WAIT: Duration = Duration::from_secs(2);

    /// Adapt an unbounded receiver into a stream that ends when the sender
    /// side is dropped.
    fn channel_stream<T: Send + 'static>(
        rx: mpsc::UnboundedReceiver<T>,
    ) -> impl Stream<Item = T> + Send {
        futures_util::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })
    }

    fn resumed_screen() -> OwnerHandle {
        let owner = Owner::new(OwnerKind::Screen);
        for ev in [Create, Start, Resume] {
            owner.emit(ev).unwrap();
        }
        owner
    }

    #[tokio::test]
    async fn test_at_most_one_current_attachment() {
        let hub = AttachmentHub::new();
        assert!(!hub.is_attached());

        let a = resumed_screen();
        let b = resumed_screen();
        hub.attach(Arc::clone(&a));
        assert!(Arc::ptr_eq(&hub.current().unwrap(), &a));

        hub.attach(Arc::clone(&b));
        assert!(Arc::ptr_eq(&hub.current().unwrap(), &b));

        hub.detach();
        assert!(hub.current().is_none());
    }

    #[tokio::test]
    async fn test_pause_and_stop_do_not_cancel() {
        let hub = AttachmentHub::new();
        let owner = resumed_screen();
        hub.attach(Arc::clone(&owner));

        let (tx, rx) = mpsc::unbounded_channel();
        let mut bound = hub.bind_stream(channel_stream(rx));

        tx.send(1).unwrap();
        assert_eq!(timeout(WAIT, bound.next()).await.unwrap(), Some(1));

        owner.emit(Pause).unwrap();
        owner.emit(Stop).unwrap();
        sleep(TICK).await;

        // Still delivering after the owner went to the background.
        tx.send(2).unwrap();
        assert_eq!(timeout(WAIT, bound.next()).await.unwrap(), Some(2));
        assert!(!hub.is_terminated());
    }

    #[tokio::test]
    async fn test_permanent_destroy_cancels() {
        let hub = AttachmentHub::new();
        let owner = resumed_screen();
        hub.attach(Arc::clone(&owner));

        let (tx, rx) = mpsc::unbounded_channel::<i32>();
        let mut bound = hub.bind_stream(channel_stream(rx));

        owner.emit(Pause).unwrap();
        owner.emit(Stop).unwrap();
        owner.emit(Destroy).unwrap();

        // The stream ends even though the sender is still alive.
        assert_eq!(timeout(WAIT, bound.next()).await.unwrap(), None);
        drop(tx);
        assert!(hub.is_terminated());
    }

    #[tokio::test]
    async fn test_recreation_destroy_does_not_cancel() {
        let hub = AttachmentHub::new();
        let first = resumed_screen();
        hub.attach(Arc::clone(&first));

        let (tx, rx) = mpsc::unbounded_channel();
        let mut bound = hub.bind_stream(channel_stream(rx));

        // Rotation: the owner is destroyed but reports it will come back.
        first.set_will_recreate(true);
        first.emit(Pause).unwrap();
        first.emit(Stop).unwrap();
        first.emit(Destroy).unwrap();
        sleep(TICK).await;
        assert!(!hub.is_terminated());

        // Pipeline survives across the gap and the new attachment.
        tx.send(10).unwrap();
        assert_eq!(timeout(WAIT, bound.next()).await.unwrap(), Some(10));

        let second = resumed_screen();
        hub.attach(Arc::clone(&second));
        tx.send(11).unwrap();
        assert_eq!(timeout(WAIT, bound.next()).await.unwrap(), Some(11));

        // The recreated owner's permanent destroy ends it.
        second.emit(Pause).unwrap();
        second.emit(Stop).unwrap();
        second.emit(Destroy).unwrap();
        assert_eq!(timeout(WAIT, bound.next()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_previous_owner_terminal_ignored_after_reattach() {
        let hub = AttachmentHub::new();
        let first = resumed_screen();
        hub.attach(Arc::clone(&first));
        sleep(TICK).await;

        let second = resumed_screen();
        hub.attach(Arc::clone(&second));
        sleep(TICK).await;

        // A permanent destroy from the *previous* owner must not latch.
        first.emit(Pause).unwrap();
        first.emit(Stop).unwrap();
        first.emit(Destroy).unwrap();
        sleep(TICK).await;
        assert!(!hub.is_terminated());

        second.emit(Pause).unwrap();
        second.emit(Stop).unwrap();
        second.emit(Destroy).unwrap();
        let signal = hub.termination();
        timeout(WAIT, signal.terminated()).await.unwrap();
        assert!(hub.is_terminated());
    }

    #[tokio::test]
    async fn test_nested_view_detach_cancels_but_destroy_view_does_not() {
        let hub = AttachmentHub::new();
        let view = Owner::new(OwnerKind::NestedView);
        for ev in [Attach, Create, CreateView, Start, Resume] {
            view.emit(ev).unwrap();
        }
        hub.attach(Arc::clone(&view));

        let (tx, rx) = mpsc::unbounded_channel();
        let mut bound = hub.bind_stream(channel_stream(rx));

        view.emit(Pause).unwrap();
        view.emit(Stop).unwrap();
        view.emit(DestroyView).unwrap();
        sleep(TICK).await;

        tx.send(1).unwrap();
        assert_eq!(timeout(WAIT, bound.next()).await.unwrap(), Some(1));

        view.emit(Destroy).unwrap();
        view.emit(Detach).unwrap();
        assert_eq!(timeout(WAIT, bound.next()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_attach_after_owner_already_dead_latches() {
        let hub = AttachmentHub::new();
        let owner = resumed_screen();
        owner.emit(Pause).unwrap();
        owner.emit(Stop).unwrap();
        owner.emit(Destroy).unwrap();

        // Attaching to an owner that already terminated permanently must
        // still terminate the hub; the watcher reads the owner's phase.
        hub.attach(owner);
        let signal = hub.termination();
        timeout(WAIT, signal.terminated()).await.unwrap();
    }

    #[tokio::test]
    async fn test_close_completes_bound_pipelines() {
        let hub = AttachmentHub::new();
        let (_tx, rx) = mpsc::unbounded_channel::<i32>();
        let mut bound = hub.bind_stream(channel_stream(rx));

        hub.close();
        assert_eq!(timeout(WAIT, bound.next()).await.unwrap(), None);
        assert!(hub.is_terminated());
    }

    #[tokio::test]
    async fn test_bind_future_resolves_none_on_termination() {
        let hub = AttachmentHub::new();
        let pending = hub.bind_future(std::future::pending::<i32>());
        hub.close();
        assert_eq!(timeout(WAIT, pending).await.unwrap(), None);

        // A future that finishes before termination resolves Some.
        let hub = AttachmentHub::new();
        let done = hub.bind_future(async { 7 });
        assert_eq!(timeout(WAIT, done).await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_spawn_is_cancelled_on_close() {
        let hub = AttachmentHub::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = hub.spawn(async move {
            loop {
                sleep(Duration::from_millis(10)).await;
                if tx.send(()).is_err() {
                    return;
                }
            }
        });

        // Driver is running.
        timeout(WAIT, rx.recv()).await.unwrap().unwrap();
        hub.close();
        timeout(WAIT, handle).await.unwrap().unwrap();
    }
}
