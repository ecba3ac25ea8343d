//! Terminal rendering of session and payment snapshots
//!
//! Read-only over the views it is given. Output goes to any `Write` so the
//! console and tests share one code path.

use crate::agent::HealthStatus;
use crate::markup::{self, Segment};
use crate::quick_action::QuickAction;
use crate::runtime::SessionView;
use crate::transaction::{TransactionPhase, TransactionView};
use crate::transcript::{Message, Role};
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::{self, Write};

const BUSY_TEXT: &str = "Processing Request...";

/// Incremental transcript printer.
///
/// Remembers how much of the log it has already shown, so each update only
/// prints new entries.
#[derive(Debug)]
pub struct Renderer {
    styled: bool,
    printed: usize,
    showed_busy: bool,
    shown_draft: String,
    last_payment: Option<TransactionView>,
}

impl Renderer {
    pub fn new(styled: bool) -> Self {
        Self {
            styled,
            printed: 0,
            showed_busy: false,
            shown_draft: String::new(),
            last_payment: None,
        }
    }

    pub fn header(
        &self,
        out: &mut impl Write,
        airport_code: &str,
        health: &HealthStatus,
    ) -> io::Result<()> {
        let status = if health.is_online() { "ONLINE" } else { "OFFLINE" };
        self.styled_line(out, Attribute::Bold, &format!("LIVE OPERATOR — {airport_code} • {status}"))?;
        if let HealthStatus::Offline { reason } = health {
            self.dim_line(out, &format!("(agent unreachable: {reason})"))?;
        }
        Ok(())
    }

    /// Print whatever changed since the previous snapshot
    pub fn session(&mut self, out: &mut impl Write, view: &SessionView) -> io::Result<()> {
        let first = self.printed == 0;
        for message in view.messages.iter().skip(self.printed) {
            self.message(out, message)?;
        }
        self.printed = view.messages.len();

        if first && view.quick_actions_visible {
            self.quick_actions(out)?;
        }

        if view.busy && !self.showed_busy {
            self.dim_line(out, BUSY_TEXT)?;
        }
        self.showed_busy = view.busy;

        if view.draft != self.shown_draft {
            if !view.draft.is_empty() {
                self.draft(out, &view.draft)?;
            }
            self.shown_draft.clone_from(&view.draft);
        }

        out.flush()
    }

    pub fn message(&self, out: &mut impl Write, message: &Message) -> io::Result<()> {
        let (label, color) = match message.role() {
            Role::User => ("YOU", Color::Green),
            Role::Agent => ("OPERATOR", Color::Grey),
        };

        if self.styled {
            queue!(out, SetForegroundColor(color), Print(label), ResetColor)?;
        } else {
            queue!(out, Print(label))?;
        }
        queue!(out, Print("\n"))?;

        let paragraphs = markup::parse(message.content());
        for paragraph in &paragraphs {
            queue!(out, Print("  "))?;
            for segment in paragraph {
                self.segment(out, segment)?;
            }
            queue!(out, Print("\n"))?;
        }

        // Timestamp sits flush right under the widest displayed line
        let width = markup::plain_text(&paragraphs)
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        self.dim_line(out, &format!("  {:>width$}", message.timestamp()))
    }

    /// Pending input, shown as it will display once sent
    pub fn draft(&self, out: &mut impl Write, draft: &str) -> io::Result<()> {
        queue!(out, Print("> "))?;
        for (index, paragraph) in markup::parse(draft).iter().enumerate() {
            if index > 0 {
                queue!(out, Print(" / "))?;
            }
            for segment in paragraph {
                self.segment(out, segment)?;
            }
        }
        queue!(out, Print("\n"))?;
        self.dim_line(out, "  Enter sends the draft")
    }

    pub fn quick_actions(&self, out: &mut impl Write) -> io::Result<()> {
        let hints = QuickAction::ALL
            .iter()
            .map(|action| format!("{} {}", action.command(), action.label()))
            .collect::<Vec<_>>()
            .join("   ");
        self.dim_line(out, &hints)
    }

    /// Print the payment dialog when its view changed
    pub fn payment(&mut self, out: &mut impl Write, view: &TransactionView) -> io::Result<()> {
        if self.last_payment.as_ref() == Some(view) {
            return Ok(());
        }
        let was_open = self.last_payment.is_some_and(|last| last.open);
        self.last_payment = Some(*view);

        if !view.open {
            if was_open {
                self.dim_line(out, "Payment dialog closed.")?;
            }
            return out.flush();
        }

        let offer = view.offer;
        match view.phase {
            TransactionPhase::Idle => {
                self.styled_line(out, Attribute::Bold, offer.title)?;
                self.dim_line(out, offer.venue)?;
                queue!(
                    out,
                    Print(format!(
                        "  Card **** {}   Total {} {}\n",
                        offer.card_last4, offer.amount, offer.currency
                    ))
                )?;
                self.dim_line(out, "/confirm to pay, /close to cancel")?;
            }
            TransactionPhase::Processing => self.dim_line(out, "Processing...")?,
            TransactionPhase::Settled => {
                self.styled_line(out, Attribute::Bold, "Payment Successful")?;
            }
        }
        out.flush()
    }

    fn segment(&self, out: &mut impl Write, segment: &Segment) -> io::Result<()> {
        if self.styled && segment.is_emphasis() {
            queue!(
                out,
                SetAttribute(Attribute::Bold),
                Print(segment.text()),
                SetAttribute(Attribute::Reset)
            )
        } else {
            queue!(out, Print(segment.text()))
        }
    }

    fn styled_line(&self, out: &mut impl Write, attribute: Attribute, text: &str) -> io::Result<()> {
        if self.styled {
            queue!(
                out,
                SetAttribute(attribute),
                Print(text),
                SetAttribute(Attribute::Reset),
                Print("\n")
            )
        } else {
            queue!(out, Print(text), Print("\n"))
        }
    }

    fn dim_line(&self, out: &mut impl Write, text: &str) -> io::Result<()> {
        self.styled_line(out, Attribute::Dim, text)
    }
}
