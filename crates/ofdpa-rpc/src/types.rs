//! Flow table record types.

use ofdpa_types::{MacAddress, MatchField};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Flow tables reachable through this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlowTableId {
    /// The Policy ACL flow table (OF-DPA table 60).
    PolicyAcl,
}

impl FlowTableId {
    /// Returns the OF-DPA table number.
    pub const fn table_number(self) -> u32 {
        match self {
            FlowTableId::PolicyAcl => 60,
        }
    }
}

impl fmt::Display for FlowTableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowTableId::PolicyAcl => write!(f, "ACL Policy"),
        }
    }
}

/// Match criteria of a Policy ACL flow.
///
/// The derived ordering is the enumeration order of the in-memory table.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PolicyAclMatch {
    pub in_port: MatchField<u32>,
    pub source_mac: MatchField<MacAddress>,
    pub destination_mac: MatchField<MacAddress>,
    pub ether_type: u16,
    pub vlan_id: MatchField<u16>,
    pub vlan_pcp: MatchField<u8>,
    pub tunnel_id: u32,
    pub source_ip4: MatchField<Ipv4Addr>,
    pub destination_ip4: MatchField<Ipv4Addr>,
    pub source_ip6: MatchField<Ipv6Addr>,
    pub destination_ip6: MatchField<Ipv6Addr>,
    pub ip_protocol: MatchField<u16>,
    pub dscp: MatchField<u8>,
    pub source_l4_port: MatchField<u32>,
    pub destination_l4_port: MatchField<u32>,
    pub icmp_type: MatchField<u8>,
    pub icmp_code: MatchField<u8>,
}

/// Instructions applied to packets matching a Policy ACL flow.
///
/// `None` leaves the corresponding action unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyAclActions {
    pub group_id: Option<u32>,
    pub queue_id: Option<u32>,
    pub vlan_pcp: Option<u8>,
    pub dscp: Option<u8>,
    pub output_tunnel_port: Option<u32>,
    /// Clear all actions: the packet is dropped.
    pub discard: bool,
    pub copy_to_controller: bool,
}

/// A flow entry as exchanged with the flow table service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowEntry {
    pub table_id: FlowTableId,
    pub priority: u32,
    pub match_criteria: PolicyAclMatch,
    pub actions: PolicyAclActions,
    /// Idle timeout in seconds; 0 never expires.
    pub idle_time: u32,
}

impl FlowEntry {
    /// Returns a blank entry for `table_id`: every field wildcarded, no actions.
    pub fn new(table_id: FlowTableId) -> Self {
        FlowEntry {
            table_id,
            priority: 0,
            match_criteria: PolicyAclMatch::default(),
            actions: PolicyAclActions::default(),
            idle_time: 0,
        }
    }

    /// The key identifying this entry within its table.
    pub fn key(&self) -> FlowKey {
        FlowKey {
            priority: self.priority,
            match_criteria: self.match_criteria,
        }
    }
}

/// Identity of a flow within a table: priority plus match criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowKey {
    pub priority: u32,
    pub match_criteria: PolicyAclMatch,
}

/// Per-flow counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStats {
    pub duration_sec: u32,
    pub received_packets: u64,
    pub received_bytes: u64,
}
