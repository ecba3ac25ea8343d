//! Simulated payment authorization
//!
//! Independent of the chat session; shares no state with the message log.

mod flow;
mod scheduler;

pub use flow::{TransactionFlow, TransactionPhase, TransactionTimings, TransactionView, LOUNGE_ACCESS};
pub use scheduler::{Scheduler, TokioScheduler};
