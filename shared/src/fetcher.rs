//! Fetch bookkeeping for the document overview.
//!
//! Every fetch opens a new generation. Responses, retry timers and transition
//! timers carry the [`FetchTicket`] they were issued under and are dropped on
//! arrival when the generation has moved on, so the newest request for the
//! current endpoint always wins and nothing scheduled for an old endpoint or
//! a closed view can touch state.

use serde::{Deserialize, Serialize};

use crate::capabilities::DeploymentEndpoint;
use crate::config::PipelineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchTicket {
    generation: u64,
    attempt: u32,
}

impl FetchTicket {
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }

    /// Zero for the first request, incremented per retry.
    #[must_use]
    pub const fn attempt(self) -> u32 {
        self.attempt
    }

    const fn next_attempt(self) -> Self {
        Self {
            generation: self.generation,
            attempt: self.attempt + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl From<&PipelineConfig> for RetryPolicy {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Re-issue the request with `ticket` once `delay_ms` has elapsed.
    Retry { ticket: FetchTicket, delay_ms: u64 },
    /// Retries exhausted after `attempts` requests.
    GiveUp { attempts: u32 },
    /// The failed request belonged to an older generation.
    Discard,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSession {
    endpoint: Option<DeploymentEndpoint>,
    generation: u64,
    in_flight: Option<FetchTicket>,
    retries_scheduled: u32,
}

impl FetchSession {
    #[must_use]
    pub const fn endpoint(&self) -> Option<&DeploymentEndpoint> {
        self.endpoint.as_ref()
    }

    /// Switches to `endpoint`, cancelling anything outstanding. Returns
    /// whether the endpoint actually changed.
    pub fn set_endpoint(&mut self, endpoint: Option<DeploymentEndpoint>) -> bool {
        if self.endpoint == endpoint {
            return false;
        }
        self.cancel();
        self.endpoint = endpoint;
        true
    }

    /// Opens a new generation. `None` when no endpoint is known.
    pub fn begin(&mut self) -> Option<FetchTicket> {
        self.endpoint.as_ref()?;
        self.generation = self.generation.wrapping_add(1);
        self.retries_scheduled = 0;
        let ticket = FetchTicket {
            generation: self.generation,
            attempt: 0,
        };
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    /// Invalidates every ticket issued so far.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = None;
    }

    /// Cancels and forgets the endpoint; used when the view goes away.
    pub fn close(&mut self) {
        self.cancel();
        self.endpoint = None;
    }

    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.endpoint.is_some() && ticket.generation == self.generation
    }

    pub fn record_success(&mut self, ticket: FetchTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight = None;
        true
    }

    pub fn record_failure(&mut self, ticket: FetchTicket, policy: RetryPolicy) -> FailureAction {
        if !self.is_current(ticket) {
            return FailureAction::Discard;
        }
        self.in_flight = None;
        if ticket.attempt < policy.max_retries {
            self.retries_scheduled += 1;
            FailureAction::Retry {
                ticket: ticket.next_attempt(),
                delay_ms: policy.retry_delay_ms,
            }
        } else {
            FailureAction::GiveUp {
                attempts: ticket.attempt + 1,
            }
        }
    }

    /// Called when a retry timer fires. Returns the ticket to send under,
    /// or `None` if the retry was cancelled in the meantime.
    pub fn resume(&mut self, ticket: FetchTicket) -> Option<FetchTicket> {
        if !self.is_current(ticket) {
            return None;
        }
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    #[must_use]
    pub const fn in_flight(&self) -> Option<FetchTicket> {
        self.in_flight
    }

    /// Retries scheduled in the current generation.
    #[must_use]
    pub const fn retries_scheduled(&self) -> u32 {
        self.retries_scheduled
    }
}
