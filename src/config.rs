//! Kiosk configuration from the environment

use crate::agent::RequestContext;
use crate::transaction::TransactionTimings;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_AGENT_URL: &str = "http://localhost:8000/chat";
pub const DEFAULT_USER_LOCATION: &str = "Terminal 2";
pub const DEFAULT_AIRPORT_CODE: &str = "SFO";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Everything the kiosk needs to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KioskConfig {
    pub agent_url: String,
    pub context: RequestContext,
    /// Transport deadline; unset means wait indefinitely
    pub request_timeout: Option<Duration>,
    pub payment: TransactionTimings,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            agent_url: DEFAULT_AGENT_URL.to_string(),
            context: RequestContext::new(DEFAULT_USER_LOCATION, DEFAULT_AIRPORT_CODE),
            request_timeout: None,
            payment: TransactionTimings::default(),
        }
    }
}

impl KioskConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut context = RequestContext::new(
            var("LAYOVER_USER_LOCATION").unwrap_or(defaults.context.user_location),
            var("LAYOVER_AIRPORT_CODE").unwrap_or(defaults.context.airport_code),
        );
        if let Some(thread_id) = var("LAYOVER_THREAD_ID") {
            context = context.with_thread_id(thread_id);
        }

        let number = |name: &'static str| -> Result<Option<u64>, ConfigError> {
            var(name)
                .map(|value| {
                    value
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidNumber { name, value })
                })
                .transpose()
        };

        let request_timeout =
            number("LAYOVER_REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs);
        let payment = TransactionTimings {
            settle: number("LAYOVER_PAYMENT_SETTLE_MS")?
                .map_or(defaults.payment.settle, Duration::from_millis),
            dwell: number("LAYOVER_PAYMENT_DWELL_MS")?
                .map_or(defaults.payment.dwell, Duration::from_millis),
        };

        Ok(Self {
            agent_url: var("LAYOVER_AGENT_URL").unwrap_or(defaults.agent_url),
            context,
            request_timeout,
            payment,
        })
    }
}
