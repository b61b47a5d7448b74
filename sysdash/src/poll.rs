//! Poll scheduling for the three dashboard endpoints.
//!
//! One scheduler owns all three slots. A slot never has more than one
//! request in flight: a tick that comes due while the previous request is
//! still pending is skipped. Every request carries a sequence number and the
//! navigation generation it was issued under so late responses can be told
//! apart from current ones.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Metrics,
    Services,
    Tasks,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::Metrics, Endpoint::Services, Endpoint::Tasks];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Metrics => "/api/metrics",
            Endpoint::Services => "/api/services",
            Endpoint::Tasks => "/api/tasks",
        }
    }

    /// Label used in error messages.
    pub fn context(self) -> &'static str {
        match self {
            Endpoint::Metrics => "fetching metrics",
            Endpoint::Services => "service info",
            Endpoint::Tasks => "fetching tasks",
        }
    }

    fn index(self) -> usize {
        match self {
            Endpoint::Metrics => 0,
            Endpoint::Services => 1,
            Endpoint::Tasks => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub metrics: Duration,
    pub services: Duration,
    pub tasks: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            metrics: Duration::from_millis(5000),
            services: Duration::from_millis(7000),
            tasks: Duration::from_millis(6000),
        }
    }
}

impl PollIntervals {
    /// Defaults, overridden by `SYSDASH_{METRICS,SERVICES,TASKS}_INTERVAL_MS`.
    pub fn from_env() -> Self {
        fn ms(var: &str, default: Duration) -> Duration {
            std::env::var(var)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|v| *v > 0)
                .map(Duration::from_millis)
                .unwrap_or(default)
        }
        let d = Self::default();
        Self {
            metrics: ms("SYSDASH_METRICS_INTERVAL_MS", d.metrics),
            services: ms("SYSDASH_SERVICES_INTERVAL_MS", d.services),
            tasks: ms("SYSDASH_TASKS_INTERVAL_MS", d.tasks),
        }
    }

    pub fn get(&self, endpoint: Endpoint) -> Duration {
        match endpoint {
            Endpoint::Metrics => self.metrics,
            Endpoint::Services => self.services,
            Endpoint::Tasks => self.tasks,
        }
    }
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket {
    pub endpoint: Endpoint,
    pub seq: u64,
    pub generation: u64,
}

#[derive(Debug)]
struct Slot {
    interval: Duration,
    next_due: Option<Instant>,
    in_flight: Option<u64>,
    refresh_queued: bool,
    next_seq: u64,
    last_applied: u64,
}

impl Slot {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            in_flight: None,
            refresh_queued: false,
            next_seq: 1,
            last_applied: 0,
        }
    }

    fn reset(&mut self, due: Option<Instant>) {
        self.next_due = due;
        self.in_flight = None;
        self.refresh_queued = false;
    }
}

#[derive(Debug)]
pub struct Scheduler {
    slots: [Slot; 3],
    generation: u64,
    active: bool,
}

impl Scheduler {
    pub fn new(intervals: PollIntervals) -> Self {
        Self {
            slots: Endpoint::ALL.map(|e| Slot::new(intervals.get(e))),
            generation: 0,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn in_flight(&self, endpoint: Endpoint) -> bool {
        self.slots[endpoint.index()].in_flight.is_some()
    }

    /// Start polling under a new generation; every endpoint is due now.
    pub fn activate(&mut self, now: Instant) {
        self.generation += 1;
        self.active = true;
        for slot in &mut self.slots {
            slot.reset(Some(now));
        }
    }

    /// Stop polling. Responses still in flight become stale.
    pub fn deactivate(&mut self) {
        self.generation += 1;
        self.active = false;
        for slot in &mut self.slots {
            slot.reset(None);
        }
    }

    /// Tickets for every endpoint whose interval has elapsed.
    pub fn due(&mut self, now: Instant) -> Vec<PollTicket> {
        if !self.active {
            return Vec::new();
        }
        let mut out = Vec::new();
        for endpoint in Endpoint::ALL {
            let slot = &mut self.slots[endpoint.index()];
            let Some(due) = slot.next_due else { continue };
            if due > now {
                continue;
            }
            slot.next_due = Some(now + slot.interval);
            if slot.in_flight.is_some() {
                tracing::trace!(?endpoint, "previous poll still in flight, skipping tick");
                continue;
            }
            out.push(self.issue(endpoint));
        }
        out
    }

    /// Poll `endpoint` right away (after a mutation). If a request is
    /// already in flight the refresh is queued behind it.
    pub fn request_now(&mut self, endpoint: Endpoint) -> Option<PollTicket> {
        if !self.active {
            return None;
        }
        let slot = &mut self.slots[endpoint.index()];
        if slot.in_flight.is_some() {
            slot.refresh_queued = true;
            return None;
        }
        Some(self.issue(endpoint))
    }

    /// Record a finished request. Returns `true` when its response is the
    /// newest for the current generation and should be rendered.
    pub fn complete(&mut self, ticket: PollTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        let slot = &mut self.slots[ticket.endpoint.index()];
        if slot.in_flight == Some(ticket.seq) {
            slot.in_flight = None;
        }
        if ticket.seq <= slot.last_applied {
            return false;
        }
        slot.last_applied = ticket.seq;
        true
    }

    /// Issue the refresh queued by [`request_now`](Self::request_now), if any.
    pub fn take_queued(&mut self, endpoint: Endpoint) -> Option<PollTicket> {
        if !self.active {
            return None;
        }
        let slot = &mut self.slots[endpoint.index()];
        if !slot.refresh_queued || slot.in_flight.is_some() {
            return None;
        }
        slot.refresh_queued = false;
        Some(self.issue(endpoint))
    }

    fn issue(&mut self, endpoint: Endpoint) -> PollTicket {
        let generation = self.generation;
        let slot = &mut self.slots[endpoint.index()];
        let seq = slot.next_seq;
        slot.next_seq += 1;
        slot.in_flight = Some(seq);
        PollTicket {
            endpoint,
            seq,
            generation,
        }
    }
}
