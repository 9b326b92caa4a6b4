use crate::domain::ExtractedEvent;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::trace;

/// All events sharing one correlation id, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub correlation_id: String,
    pub events: Vec<ExtractedEvent>,
}

/// Groups extracted events into traces.
///
/// Traces come out in order of first appearance and events keep arrival order;
/// nothing is sorted by timestamp.
#[derive(Debug, Default)]
pub struct TraceCorrelator {
    traces: Vec<Trace>,
    index: HashMap<String, usize>,
    uncorrelated: usize,
}

impl TraceCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `event` to its trace. Returns `false` when it has no correlation id and was dropped.
    pub fn push(&mut self, event: ExtractedEvent) -> bool {
        let Some(id) = event.request_uuid.clone() else {
            self.uncorrelated += 1;
            trace!(source = %event.source, "dropping event without correlation id");
            return false;
        };

        match self.index.entry(id) {
            Entry::Occupied(slot) => self.traces[*slot.get()].events.push(event),
            Entry::Vacant(slot) => {
                let correlation_id = slot.key().clone();
                slot.insert(self.traces.len());
                self.traces.push(Trace {
                    correlation_id,
                    events: vec![event],
                });
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Events dropped for lack of a correlation id.
    pub fn uncorrelated(&self) -> usize {
        self.uncorrelated
    }

    pub fn into_traces(self) -> Vec<Trace> {
        self.traces
    }
}

impl Extend<ExtractedEvent> for TraceCorrelator {
    fn extend<I: IntoIterator<Item = ExtractedEvent>>(&mut self, events: I) {
        for event in events {
            self.push(event);
        }
    }
}

impl FromIterator<ExtractedEvent> for TraceCorrelator {
    fn from_iter<I: IntoIterator<Item = ExtractedEvent>>(events: I) -> Self {
        let mut correlator = Self::new();
        correlator.extend(events);
        correlator
    }
}
