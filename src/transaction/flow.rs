//! Two-phase payment authorization simulation

use super::scheduler::{Scheduler, TimerHandle};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;

/// Callback fired once per completed authorization
pub type CompletionCallback = Box<dyn FnMut() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionPhase {
    #[default]
    Idle,
    /// Waiting on (simulated) settlement
    Processing,
    /// Settled; confirmation is on screen until the dwell timer elapses
    Settled,
}

/// What the dialog is selling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentOffer {
    pub title: &'static str,
    pub venue: &'static str,
    pub amount: &'static str,
    pub currency: &'static str,
    pub card_last4: &'static str,
}

pub const LOUNGE_ACCESS: PaymentOffer = PaymentOffer {
    title: "Premium Access",
    venue: "United Club • SFO Terminal 3",
    amount: "$50.00",
    currency: "USDC",
    card_last4: "4242",
};

/// Observable flow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransactionView {
    pub phase: TransactionPhase,
    /// Whether the payment dialog is shown
    pub open: bool,
    pub offer: PaymentOffer,
}

/// Delays for the two phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionTimings {
    pub settle: Duration,
    pub dwell: Duration,
}

impl Default for TransactionTimings {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(2000),
            dwell: Duration::from_millis(2000),
        }
    }
}

struct FlowState {
    phase: TransactionPhase,
    open: bool,
    /// Bumped on every start and reset; timers carry the epoch they were
    /// armed in and are ignored once it moves on
    epoch: u64,
    timer: Option<TimerHandle>,
}

impl FlowState {
    fn view(&self) -> TransactionView {
        TransactionView {
            phase: self.phase,
            open: self.open,
            offer: LOUNGE_ACCESS,
        }
    }
}

struct Shared<S> {
    scheduler: S,
    timings: TransactionTimings,
    state: Mutex<FlowState>,
    on_complete: Mutex<CompletionCallback>,
    view_tx: watch::Sender<TransactionView>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scripted authorization: Idle → Processing → Settled → callback → Idle.
///
/// Cloning yields another handle to the same flow.
pub struct TransactionFlow<S: Scheduler + 'static> {
    shared: Arc<Shared<S>>,
}

impl<S: Scheduler + 'static> Clone for TransactionFlow<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: Scheduler + 'static> TransactionFlow<S> {
    pub fn new(scheduler: S, timings: TransactionTimings, on_complete: CompletionCallback) -> Self {
        let state = FlowState {
            phase: TransactionPhase::Idle,
            open: false,
            epoch: 0,
            timer: None,
        };
        let (view_tx, _) = watch::channel(state.view());
        Self {
            shared: Arc::new(Shared {
                scheduler,
                timings,
                state: Mutex::new(state),
                on_complete: Mutex::new(on_complete),
                view_tx,
            }),
        }
    }

    pub fn view(&self) -> TransactionView {
        lock(&self.shared.state).view()
    }

    pub fn subscribe(&self) -> watch::Receiver<TransactionView> {
        self.shared.view_tx.subscribe()
    }

    /// Show the payment dialog
    pub fn open(&self) {
        let mut state = lock(&self.shared.state);
        state.open = true;
        self.publish(&state);
    }

    /// Start an authorization. Returns false (and does nothing) unless the
    /// flow is idle.
    pub fn confirm(&self) -> bool {
        let mut state = lock(&self.shared.state);
        if state.phase != TransactionPhase::Idle {
            tracing::debug!(phase = ?state.phase, "Confirmation ignored, authorization in progress");
            return false;
        }

        state.epoch += 1;
        state.phase = TransactionPhase::Processing;
        let epoch = state.epoch;
        state.timer = Some(self.arm(self.shared.timings.settle, epoch));
        tracing::info!(amount = LOUNGE_ACCESS.amount, "Payment processing");
        self.publish(&state);
        true
    }

    /// Reset to idle and hide the dialog without firing the callback
    pub fn close(&self) {
        let mut state = lock(&self.shared.state);
        if let Some(timer) = state.timer.take() {
            timer.cancel();
        }
        if state.phase != TransactionPhase::Idle {
            tracing::info!(phase = ?state.phase, "Payment dialog closed mid-flow");
        }
        state.epoch += 1;
        state.phase = TransactionPhase::Idle;
        state.open = false;
        self.publish(&state);
    }

    fn arm(&self, delay: Duration, epoch: u64) -> TimerHandle {
        let weak: Weak<Shared<S>> = Arc::downgrade(&self.shared);
        self.shared.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    TransactionFlow { shared }.timer_elapsed(epoch);
                }
            }),
        )
    }

    fn timer_elapsed(&self, epoch: u64) {
        let mut state = lock(&self.shared.state);
        if state.epoch != epoch {
            tracing::debug!(epoch, "Stale payment timer ignored");
            return;
        }

        let phase = state.phase;
        match phase {
            TransactionPhase::Processing => {
                state.phase = TransactionPhase::Settled;
                state.timer = Some(self.arm(self.shared.timings.dwell, epoch));
                tracing::info!("Payment settled");
                self.publish(&state);
            }
            TransactionPhase::Settled => {
                // Retire this epoch before running the callback
                state.epoch += 1;
                state.timer = None;
                let retired = state.epoch;
                drop(state);

                {
                    let mut callback = lock(&self.shared.on_complete);
                    (*callback)();
                }
                tracing::info!("Payment confirmed");

                let mut state = lock(&self.shared.state);
                // A close() or new confirm() during the callback wins
                if state.epoch == retired {
                    state.phase = TransactionPhase::Idle;
                    state.open = false;
                    self.publish(&state);
                }
            }
            TransactionPhase::Idle => {}
        }
    }

    fn publish(&self, state: &FlowState) {
        self.shared.view_tx.send_replace(state.view());
    }
}
