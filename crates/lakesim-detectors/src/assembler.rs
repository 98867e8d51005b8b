//! Temporal event assembly
//!
//! The assembler turns an ordered stream of per-frame verdicts into
//! time-bounded events. It is `idle` until a qualifying frame arrives, `open`
//! while frames keep qualifying, and closes the event on the first
//! non-qualifying frame. A qualifying frame that arrives within the merge
//! window of the last closed event reopens that event instead of starting a
//! new one.

use crate::classifier::{Peak, Verdict};
use chrono::{DateTime, Duration, Utc};
use tracing::{trace, warn};

/// Whether an event is currently under construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    Idle,
    Open,
}

/// What a single observation did to the assembler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Non-qualifying frame while idle
    Ignored,
    /// New event started
    Opened,
    /// Last closed event reopened by the merge rule
    Reopened,
    /// Open event extended
    Extended,
    /// Open event finalized
    Closed,
}

/// A time span covered by one event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,

    /// Strongest qualifying frame, when the classifier reports a metric
    pub peak: Option<Peak>,
}

impl EventSpan {
    fn open(timestamp: DateTime<Utc>, metric: Option<f64>) -> Self {
        Self {
            start: timestamp,
            end: timestamp,
            peak: metric.map(|value| Peak { timestamp, value }),
        }
    }

    fn extend(&mut self, timestamp: DateTime<Utc>, metric: Option<f64>) {
        self.end = timestamp;
        if let Some(value) = metric {
            match self.peak {
                Some(peak) if value <= peak.value => {}
                _ => self.peak = Some(Peak { timestamp, value }),
            }
        }
    }
}

/// Per-detector event state machine
#[derive(Debug, Clone)]
pub struct EventAssembler {
    merge_window: Duration,
    current: Option<EventSpan>,
    finalized: Vec<EventSpan>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl EventAssembler {
    /// Create an idle assembler with the given merge window
    pub fn new(merge_window: Duration) -> Self {
        Self {
            merge_window,
            current: None,
            finalized: Vec::new(),
            last_timestamp: None,
        }
    }

    /// Current state
    pub fn state(&self) -> AssemblerState {
        if self.current.is_some() {
            AssemblerState::Open
        } else {
            AssemblerState::Idle
        }
    }

    /// Events finalized so far
    pub fn finalized(&self) -> &[EventSpan] {
        &self.finalized
    }

    /// Feed the verdict for the next frame
    ///
    /// Frames must arrive in ascending time order; the assembler does not
    /// reorder them.
    pub fn observe(&mut self, timestamp: DateTime<Utc>, verdict: &Verdict) -> Transition {
        if let Some(last) = self.last_timestamp {
            if timestamp <= last {
                warn!(%timestamp, previous = %last, "Frame timestamps are not ascending");
            }
        }
        self.last_timestamp = Some(timestamp);

        let transition = match (self.current.as_mut(), verdict.qualifies) {
            (None, false) => Transition::Ignored,
            (Some(event), true) => {
                event.extend(timestamp, verdict.metric);
                Transition::Extended
            }
            (Some(_), false) => {
                self.close();
                Transition::Closed
            }
            (None, true) => self.open(timestamp, verdict.metric),
        };

        trace!(%timestamp, qualifies = verdict.qualifies, ?transition, "observed frame");
        transition
    }

    /// Close any open event and return every event in time order
    pub fn finish(mut self) -> Vec<EventSpan> {
        self.close();
        self.finalized
    }

    fn open(&mut self, timestamp: DateTime<Utc>, metric: Option<f64>) -> Transition {
        if let Some(last) = self.finalized.last() {
            // An end beyond the calendar means an unbounded window
            let within = match last.end.checked_add_signed(self.merge_window) {
                Some(limit) => timestamp <= limit,
                None => true,
            };
            if within {
                let mut event = *last;
                self.finalized.pop();
                event.extend(timestamp, metric);
                self.current = Some(event);
                return Transition::Reopened;
            }
        }

        self.current = Some(EventSpan::open(timestamp, metric));
        Transition::Opened
    }

    fn close(&mut self) {
        if let Some(event) = self.current.take() {
            self.finalized.push(event);
        }
    }
}
