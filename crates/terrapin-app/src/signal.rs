//! Bounded signal bus between the controller and the render context.
//!
//! Submission never blocks: a full queue already carries a pending
//! wake-up, so further repaints coalesce into it.

use crossfire::mpmc;
use crossfire::{MAsyncTx, MRx, TryRecvError, TrySendError, detect_backoff_cfg};
use std::sync::Arc;
use tracing::{debug, warn};

/// Control signals delivered from the controller to the render context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSignal {
    /// The scene changed; redraw at the next opportunity.
    Repaint,
    /// The command sequence is finished; leave the event loop.
    Shutdown,
}

pub type SignalSender = MAsyncTx<RenderSignal>;
pub type SignalReceiver = MRx<RenderSignal>;
pub type SignalSubmit = Arc<dyn Fn(RenderSignal) -> bool + Send + Sync>;

pub const SIGNAL_QUEUE_CAPACITY: usize = 32;

pub fn create_signal_bus(capacity: usize) -> (SignalSender, SignalReceiver) {
    detect_backoff_cfg();
    mpmc::bounded_tx_async_rx_blocking(capacity)
}

/// Outcome of draining the queue without blocking.
#[derive(Debug, Default, Clone, Copy)]
pub struct DrainedSignals {
    pub repaint: bool,
    pub shutdown: bool,
}

pub fn drain_pending_signals(receiver: &SignalReceiver) -> DrainedSignals {
    let mut drained = DrainedSignals::default();
    loop {
        match receiver.try_recv() {
            Ok(RenderSignal::Repaint) => drained.repaint = true,
            Ok(RenderSignal::Shutdown) => drained.shutdown = true,
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                // Every sender is gone; nothing further can arrive.
                drained.shutdown = true;
                break;
            }
        }
    }
    drained
}

pub fn make_signal_submit(sender: SignalSender) -> SignalSubmit {
    let sender = Arc::new(sender);
    Arc::new(move |signal: RenderSignal| match sender.try_send(signal) {
        Ok(()) => true,
        Err(TrySendError::Full(signal)) => {
            debug!(?signal, "render signal queue full; coalescing");
            false
        }
        Err(TrySendError::Disconnected(signal)) => {
            warn!(?signal, "render signal queue disconnected");
            false
        }
    })
}
