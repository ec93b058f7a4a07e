//! Default values for the Policy ACL client.

use crate::builder::{AclRule, ETHERTYPE_IPV4, VLAN_ID_EXACT_MASK};
use ofdpa_rpc::{FlowEntry, FlowTableId, PolicyAclActions, PolicyAclMatch};
use ofdpa_types::{MacAddress, MatchField};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Default flow table service address.
pub const DEFAULT_RPC_ADDR: &str = "127.0.0.1:20408";

/// Environment variable consulted when `--rpc-addr` is not given.
pub const RPC_ADDR_ENV: &str = "OFDPA_RPC_ADDR";

/// Name this client registers with.
pub const DEFAULT_CLIENT_NAME: &str = "ofdpa Policy ACL client";

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Idle timeout given to submitted flows, in seconds.
pub const DEFAULT_IDLE_TIME: u32 = 30;

/// The rule used when no options are given.
pub const DEFAULT_RULE: AclRule = AclRule {
    count: 1,
    flow: FlowEntry {
        table_id: FlowTableId::PolicyAcl,
        priority: 0,
        match_criteria: PolicyAclMatch {
            in_port: MatchField::new(1, u32::MAX),
            source_mac: MatchField::new(
                MacAddress::new([0x00, 0x09, 0x07, 0x05, 0x03, 0x01]),
                MacAddress::BROADCAST,
            ),
            destination_mac: MatchField::new(
                MacAddress::new([0x00, 0x01, 0x03, 0x05, 0x07, 0x09]),
                MacAddress::BROADCAST,
            ),
            ether_type: ETHERTYPE_IPV4,
            vlan_id: MatchField::new(1, VLAN_ID_EXACT_MASK),
            vlan_pcp: MatchField::new(0, 0),
            tunnel_id: 0,
            source_ip4: MatchField::new(Ipv4Addr::new(1, 1, 1, 1), Ipv4Addr::BROADCAST),
            destination_ip4: MatchField::new(Ipv4Addr::new(2, 2, 2, 2), Ipv4Addr::BROADCAST),
            source_ip6: MatchField::new(Ipv6Addr::UNSPECIFIED, Ipv6Addr::UNSPECIFIED),
            destination_ip6: MatchField::new(Ipv6Addr::UNSPECIFIED, Ipv6Addr::UNSPECIFIED),
            ip_protocol: MatchField::new(17, 0xff),
            dscp: MatchField::new(0, 0),
            source_l4_port: MatchField::new(100, u32::MAX),
            destination_l4_port: MatchField::new(200, u32::MAX),
            icmp_type: MatchField::new(0, 0),
            icmp_code: MatchField::new(0, 0),
        },
        actions: PolicyAclActions {
            group_id: None,
            queue_id: None,
            vlan_pcp: None,
            dscp: None,
            output_tunnel_port: None,
            discard: false,
            copy_to_controller: false,
        },
        idle_time: DEFAULT_IDLE_TIME,
    },
};

/// Renders the "Default values" block appended to `--help`.
///
/// Only constrained fields are listed.
pub fn help_text(defaults: &AclRule) -> String {
    let m = &defaults.flow.match_criteria;
    let mut text = String::from("Default values:\n");
    let mut line = |name: &str, value: &dyn std::fmt::Display| {
        text.push_str(&format!("  {:<10}= {}\n", name, value));
    };

    line("COUNT", &defaults.count);
    line("PRIORITY", &defaults.flow.priority);
    if !m.in_port.is_wildcard() {
        line("IFNUM", &m.in_port.value);
    }
    if !m.source_mac.is_wildcard() {
        line("SRCMAC", &m.source_mac.value.dotted());
    }
    if !m.destination_mac.is_wildcard() {
        line("DESTMAC", &m.destination_mac.value.dotted());
    }
    if !m.vlan_id.is_wildcard() {
        line("VLANID", &m.vlan_id.value);
    }
    line("TUNNELID", &m.tunnel_id);
    line("ETHERTYPE", &format_args!("0x{:04x}", m.ether_type));
    if !m.dscp.is_wildcard() {
        line("DSCP", &m.dscp.value);
    }
    if !m.source_ip4.is_wildcard() {
        line("SOURCEIP", &m.source_ip4.value);
    }
    if !m.destination_ip4.is_wildcard() {
        line("DESTIP", &m.destination_ip4.value);
    }
    if !m.ip_protocol.is_wildcard() {
        line("PROTOCOL", &m.ip_protocol.value);
    }
    if !m.source_l4_port.is_wildcard() {
        line("SRCPORT", &m.source_l4_port.value);
    }
    if !m.destination_l4_port.is_wildcard() {
        line("DSTPORT", &m.destination_l4_port.value);
    }
    line("IDLETIME", &defaults.flow.idle_time);
    text
}
