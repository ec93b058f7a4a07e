//! In-process flow table.
//!
//! [`InMemoryFlowTable`] implements [`FlowTableClient`] over an ordered map so
//! flow clients can run without a switch (`--simulate`) and be tested.

use crate::api::FlowTableClient;
use crate::error::{OfdpaError, OfdpaResult, OfdpaStatus};
use crate::types::{FlowEntry, FlowKey, FlowStats, FlowTableId};
use log::debug;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::time::Instant;

#[derive(Debug, Clone)]
struct StoredFlow {
    entry: FlowEntry,
    installed_at: Instant,
}

/// An ordered flow table held in memory.
///
/// Entries are keyed and enumerated by (priority, match criteria).
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlowTable {
    flows: BTreeMap<FlowKey, StoredFlow>,
    capacity: Option<usize>,
    client_name: Option<String>,
}

impl InMemoryFlowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table that reports `OFDPA_E_FULL` once it holds `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        InMemoryFlowTable {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Returns the stored entries in table order.
    pub fn entries(&self) -> impl Iterator<Item = &FlowEntry> {
        self.flows.values().map(|stored| &stored.entry)
    }

    /// Returns the name passed to the last `initialize`.
    pub fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }
}

impl FlowTableClient for InMemoryFlowTable {
    fn initialize(&mut self, client_name: &str) -> OfdpaResult<()> {
        debug!("In-memory flow table initialized for {}", client_name);
        self.client_name = Some(client_name.to_string());
        Ok(())
    }

    fn flow_entry_init(&mut self, table_id: FlowTableId) -> OfdpaResult<FlowEntry> {
        Ok(FlowEntry::new(table_id))
    }

    fn flow_add(&mut self, flow: &FlowEntry) -> OfdpaResult<()> {
        let key = flow.key();
        if self.flows.contains_key(&key) {
            return Err(OfdpaError::from_status(OfdpaStatus::Exists));
        }
        if self.capacity.is_some_and(|cap| self.flows.len() >= cap) {
            return Err(OfdpaError::from_status(OfdpaStatus::Full));
        }

        self.flows.insert(
            key,
            StoredFlow {
                entry: flow.clone(),
                installed_at: Instant::now(),
            },
        );
        Ok(())
    }

    fn flow_delete(&mut self, flow: &FlowEntry) -> OfdpaResult<()> {
        self.flows
            .remove(&flow.key())
            .map(|_| ())
            .ok_or_else(OfdpaError::not_found)
    }

    fn flow_next_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowEntry> {
        self.flows
            .range((Bound::Excluded(flow.key()), Bound::Unbounded))
            .next()
            .map(|(_, stored)| stored.entry.clone())
            .ok_or_else(OfdpaError::not_found)
    }

    fn flow_stats_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowStats> {
        let stored = self
            .flows
            .get(&flow.key())
            .ok_or_else(OfdpaError::not_found)?;
        Ok(FlowStats {
            duration_sec: u32::try_from(stored.installed_at.elapsed().as_secs())
                .unwrap_or(u32::MAX),
            ..FlowStats::default()
        })
    }

    fn flow_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowEntry> {
        self.flows
            .get(&flow.key())
            .map(|stored| stored.entry.clone())
            .ok_or_else(OfdpaError::not_found)
    }
}
