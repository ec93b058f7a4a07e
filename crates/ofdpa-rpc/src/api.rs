//! The flow table client interface.

use crate::error::OfdpaResult;
use crate::types::{FlowEntry, FlowStats, FlowTableId};

/// Operations of the OF-DPA flow table service used by flow clients.
///
/// Every call is synchronous and returns once the service has answered.
/// Enumeration is cursor based: [`flow_next_get`](Self::flow_next_get) takes
/// the previously returned entry as its key and reports
/// [`OfdpaStatus::NotFound`](crate::OfdpaStatus::NotFound) past the last entry.
pub trait FlowTableClient {
    /// Registers this client with the service under `client_name`.
    fn initialize(&mut self, client_name: &str) -> OfdpaResult<()>;

    /// Returns a default-initialised entry for `table_id`.
    fn flow_entry_init(&mut self, table_id: FlowTableId) -> OfdpaResult<FlowEntry>;

    fn flow_add(&mut self, flow: &FlowEntry) -> OfdpaResult<()>;

    fn flow_delete(&mut self, flow: &FlowEntry) -> OfdpaResult<()>;

    /// Returns the entry following `flow` in table order.
    fn flow_next_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowEntry>;

    fn flow_stats_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowStats>;

    /// Looks up the entry whose key equals `flow`.
    ///
    /// The service has no direct lookup; presence is probed through
    /// [`flow_stats_get`](Self::flow_stats_get) and `flow` itself is returned.
    /// Only the key (priority and match) is confirmed: the actions and idle
    /// time in the result are the caller's, not the stored entry's.
    /// Implementations holding the entries locally override this.
    fn flow_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowEntry> {
        self.flow_stats_get(flow)?;
        Ok(flow.clone())
    }
}

impl<C: FlowTableClient + ?Sized> FlowTableClient for &mut C {
    fn initialize(&mut self, client_name: &str) -> OfdpaResult<()> {
        (**self).initialize(client_name)
    }

    fn flow_entry_init(&mut self, table_id: FlowTableId) -> OfdpaResult<FlowEntry> {
        (**self).flow_entry_init(table_id)
    }

    fn flow_add(&mut self, flow: &FlowEntry) -> OfdpaResult<()> {
        (**self).flow_add(flow)
    }

    fn flow_delete(&mut self, flow: &FlowEntry) -> OfdpaResult<()> {
        (**self).flow_delete(flow)
    }

    fn flow_next_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowEntry> {
        (**self).flow_next_get(flow)
    }

    fn flow_stats_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowStats> {
        (**self).flow_stats_get(flow)
    }

    fn flow_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowEntry> {
        (**self).flow_get(flow)
    }
}

impl<C: FlowTableClient + ?Sized> FlowTableClient for Box<C> {
    fn initialize(&mut self, client_name: &str) -> OfdpaResult<()> {
        (**self).initialize(client_name)
    }

    fn flow_entry_init(&mut self, table_id: FlowTableId) -> OfdpaResult<FlowEntry> {
        (**self).flow_entry_init(table_id)
    }

    fn flow_add(&mut self, flow: &FlowEntry) -> OfdpaResult<()> {
        (**self).flow_add(flow)
    }

    fn flow_delete(&mut self, flow: &FlowEntry) -> OfdpaResult<()> {
        (**self).flow_delete(flow)
    }

    fn flow_next_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowEntry> {
        (**self).flow_next_get(flow)
    }

    fn flow_stats_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowStats> {
        (**self).flow_stats_get(flow)
    }

    fn flow_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowEntry> {
        (**self).flow_get(flow)
    }
}
