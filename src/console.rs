//! Line-oriented kiosk console
//!
//! Maps stdin lines onto session and payment operations and re-renders
//! whenever either publishes a new snapshot.

use crate::agent::{AgentTransport, HealthStatus};
use crate::quick_action::QuickAction;
use crate::render::Renderer;
use crate::runtime::{SessionClosed, SessionHandle};
use crate::transaction::{Scheduler, TransactionFlow};
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    SubmitDraft,
    /// Replace the draft without sending it
    SetDraft(String),
    QuickAction(QuickAction),
    OpenPayment,
    ConfirmPayment,
    ClosePayment,
    Status,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::SubmitDraft;
        }
        if !trimmed.starts_with('/') {
            return Command::Submit(line.to_string());
        }
        if let Some(action) = QuickAction::from_command(trimmed) {
            return Command::QuickAction(action);
        }
        if let Some(text) = trimmed.strip_prefix("/draft ") {
            return Command::SetDraft(text.trim_start().to_string());
        }
        match trimmed {
            "/pay" => Command::OpenPayment,
            "/confirm" => Command::ConfirmPayment,
            "/close" => Command::ClosePayment,
            "/status" => Command::Status,
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Session(#[from] SessionClosed),
}

/// Console front end over a running session
pub struct Console<S: Scheduler + 'static> {
    session: SessionHandle,
    payment: TransactionFlow<S>,
    transport: Arc<dyn AgentTransport>,
    airport_code: String,
    renderer: Renderer,
}

impl<S: Scheduler + 'static> Console<S> {
    pub fn new(
        session: SessionHandle,
        payment: TransactionFlow<S>,
        transport: Arc<dyn AgentTransport>,
        airport_code: impl Into<String>,
    ) -> Self {
        Self {
            session,
            payment,
            transport,
            airport_code: airport_code.into(),
            renderer: Renderer::new(io::stdout().is_terminal()),
        }
    }

    /// Run until `/quit`, end of input, or the session stops
    pub async fn run(mut self) -> Result<(), ConsoleError> {
        let mut stdout = io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut session_rx = self.session.subscribe();
        let mut payment_rx = self.payment.subscribe();
        let (health_tx, mut health_rx) = mpsc::unbounded_channel();

        self.probe_health(&health_tx);
        self.renderer.session(&mut stdout, &self.session.view())?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !self.handle(Command::parse(&line), &health_tx, &mut stdout).await? {
                        break;
                    }
                }
                changed = session_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let view = session_rx.borrow_and_update().clone();
                    self.renderer.session(&mut stdout, &view)?;
                }
                changed = payment_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let view = *payment_rx.borrow_and_update();
                    self.renderer.payment(&mut stdout, &view)?;
                }
                Some(health) = health_rx.recv() => {
                    self.renderer.header(&mut stdout, &self.airport_code, &health)?;
                    stdout.flush()?;
                }
            }
        }

        self.payment.close();
        Ok(())
    }

    /// Returns false when the console should exit
    async fn handle(
        &mut self,
        command: Command,
        health_tx: &mpsc::UnboundedSender<HealthStatus>,
        out: &mut impl Write,
    ) -> Result<bool, ConsoleError> {
        match command {
            Command::Submit(text) => self.session.submit(text).await?,
            Command::SubmitDraft => self.session.submit_draft().await?,
            Command::SetDraft(text) => self.session.set_draft(text).await?,
            Command::QuickAction(action) => self.session.quick_action(action).await?,
            Command::OpenPayment => self.payment.open(),
            Command::ConfirmPayment => {
                if !self.payment.confirm() {
                    let phase = self.payment.view().phase;
                    writeln!(out, "Payment already in progress ({phase:?}).")?;
                }
            }
            Command::ClosePayment => self.payment.close(),
            Command::Status => self.probe_health(health_tx),
            Command::Quit => return Ok(false),
            Command::Unknown(command) => {
                writeln!(out, "Unknown command {command}")?;
                self.renderer.quick_actions(out)?;
                writeln!(out, "/draft <text> /pay /confirm /close /status /quit")?;
            }
        }
        out.flush()?;
        Ok(true)
    }

    /// Run the health probe off the loop; the result comes back on `health_tx`
    fn probe_health(&self, health_tx: &mpsc::UnboundedSender<HealthStatus>) {
        let transport = Arc::clone(&self.transport);
        let health_tx = health_tx.clone();
        tokio::spawn(async move {
            let health = transport.health().await;
            tracing::debug!(online = health.is_online(), "Health probe finished");
            // The console may have exited meanwhile
            let _ = health_tx.send(health);
        });
    }
}
