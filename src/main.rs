//! LayoverOS kiosk - airport concierge chat console
//!
//! Drives a single chat session against a remote agent service, with a
//! simulated lounge-access payment alongside.

mod agent;
mod config;
mod console;
mod markup;
mod quick_action;
mod render;
mod runtime;
mod state_machine;
mod transaction;
mod transcript;

use agent::{AgentTransport, Dispatcher, HttpTransport, LoggingTransport};
use config::KioskConfig;
use console::Console;
use runtime::SessionRuntime;
use std::sync::Arc;
use transaction::{TokioScheduler, TransactionFlow, LOUNGE_ACCESS};
use transcript::{Clock, SystemClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout belongs to the console
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "layover_kiosk=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = KioskConfig::from_env()?;
    tracing::info!(
        agent_url = %config.agent_url,
        airport = %config.context.airport_code,
        location = %config.context.user_location,
        "Starting kiosk"
    );

    let http = HttpTransport::new(&config.agent_url, config.request_timeout)?;
    let endpoint = http.chat_url().to_string();
    let transport: Arc<dyn AgentTransport> =
        Arc::new(LoggingTransport::new(Arc::new(http), endpoint));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let dispatcher = Dispatcher::new(Arc::clone(&transport), config.context.clone(), Arc::clone(&clock));
    let session = SessionRuntime::spawn(dispatcher, clock);

    let payment = TransactionFlow::new(
        TokioScheduler::new(tokio::runtime::Handle::current()),
        config.payment,
        Box::new(|| {
            println!(
                "Payment confirmed: {} {} for {}",
                LOUNGE_ACCESS.amount, LOUNGE_ACCESS.currency, LOUNGE_ACCESS.title
            );
        }),
    );

    Console::new(session, payment, transport, config.context.airport_code).run().await?;
    Ok(())
}
