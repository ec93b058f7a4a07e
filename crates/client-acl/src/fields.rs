//! Option decoding for Policy ACL fields.
//!
//! [`FIELD_SPECS`] maps every [`FieldKey`] to its command-line option and to
//! the decoder that applies it to a [`MatchBuilder`]. The CLI is generated
//! from the same table.

use crate::builder::MatchBuilder;
use crate::error::{ClientError, ClientResult};
use ofdpa_types::int::{parse_bounded, parse_unsigned};
use ofdpa_types::ip::{parse_ipv4, parse_ipv4_prefix, parse_ipv6, parse_ipv6_prefix};
use ofdpa_types::{MacAddress, ParseError};

/// Largest VLAN id accepted.
pub const VLAN_ID_MAX: u16 = 4095;
/// Largest VLAN priority accepted.
pub const VLAN_PCP_MAX: u8 = 7;
/// Largest DSCP accepted.
pub const DSCP_MAX: u8 = 63;
/// Largest L4 port accepted.
pub const L4_PORT_MAX: u16 = 65535;
/// Largest ethertype accepted; 0xFFFF is reserved as invalid.
pub const ETHERTYPE_MAX: u16 = 0xfffe;
/// Largest IP protocol accepted; 0xFFFF is reserved as invalid.
pub const IP_PROTOCOL_MAX: u16 = 0xfffe;

/// A settable rule field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Count,
    Priority,
    Interface,
    VlanId,
    TunnelId,
    VlanPriority,
    EtherType,
    SourceMac,
    DestinationMac,
    SourceMacMask,
    DestinationMacMask,
    DestinationIp4,
    DestinationIp4Prefix,
    IpProtocol,
    SourceIp4,
    SourceIp4Prefix,
    SourceIp6,
    SourceIp6Prefix,
    DestinationIp6,
    DestinationIp6Prefix,
    Dscp,
    SourceL4Port,
    DestinationL4Port,
    IcmpType,
    IcmpCode,
    SetGroup,
    SetQueue,
    SetVlanPriority,
    SetDscp,
    OutputTunnelPort,
    Discard,
    Copy,
}

type ApplyFn = fn(&mut MatchBuilder, &str) -> Result<(), ParseError>;

/// How a [`FieldKey`] appears on the command line and how it is decoded.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub long: &'static str,
    /// Placeholder shown in help; `None` for value-less flags.
    pub value_name: Option<&'static str>,
    pub help: &'static str,
    pub heading: Option<&'static str>,
    pub apply: ApplyFn,
}

impl FieldSpec {
    pub fn is_flag(&self) -> bool {
        self.value_name.is_none()
    }
}

const L2: Option<&str> = Some("L2 Qualifiers");
const L3: Option<&str> = Some("L3 Qualifiers");
const L4: Option<&str> = Some("L4 Qualifiers");
const WRITE_ACTIONS: Option<&str> = Some("Write Actions");
const OTHER_ACTIONS: Option<&str> = Some("Other Actions");

fn parse_interface(s: &str) -> Result<Option<u32>, ParseError> {
    if s.trim().eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        parse_unsigned(s).map(Some)
    }
}

/// Every field, in help order. Indexed by `FieldKey as usize`.
pub const FIELD_SPECS: &[FieldSpec] = &[
    FieldSpec {
        key: FieldKey::Count,
        long: "count",
        value_name: Some("COUNT"),
        help: "Number of ACLs to add, delete or list (0 lists or deletes all)",
        heading: None,
        apply: |b, s| {
            b.set_count(parse_unsigned(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::Priority,
        long: "priority",
        value_name: Some("PRIORITY"),
        help: "The priority of the rule",
        heading: None,
        apply: |b, s| {
            b.set_priority(parse_unsigned(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::Interface,
        long: "intf",
        value_name: Some("IFNUM"),
        help: "The ingress interface number (or \"all\")",
        heading: None,
        apply: |b, s| {
            b.set_in_port(parse_interface(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::VlanId,
        long: "vlan",
        value_name: Some("VLANID"),
        help: "The VLAN to which the ACL should be applied",
        heading: L2,
        apply: |b, s| {
            b.set_vlan_id(parse_bounded(s, VLAN_ID_MAX)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::TunnelId,
        long: "tunnelid",
        value_name: Some("TUNNELID"),
        help: "The tenant identifier",
        heading: L2,
        apply: |b, s| {
            b.set_tunnel_id(parse_unsigned(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::VlanPriority,
        long: "vlanpri",
        value_name: Some("VLANPRI"),
        help: "The VLAN priority tag",
        heading: L2,
        apply: |b, s| {
            b.set_vlan_priority(parse_bounded(s, VLAN_PCP_MAX)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::EtherType,
        long: "ether",
        value_name: Some("ETHERTYPE"),
        help: "The ethertype",
        heading: L2,
        apply: |b, s| {
            b.set_ether_type(parse_bounded(s, ETHERTYPE_MAX)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::SourceMac,
        long: "srcmac",
        value_name: Some("SRCMAC"),
        help: "The source MAC address",
        heading: L2,
        apply: |b, s| {
            b.set_source_mac(s.parse::<MacAddress>()?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::DestinationMac,
        long: "dstmac",
        value_name: Some("DESTMAC"),
        help: "The destination MAC address",
        heading: L2,
        apply: |b, s| {
            b.set_destination_mac(s.parse::<MacAddress>()?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::SourceMacMask,
        long: "srcmacmask",
        value_name: Some("MASK"),
        help: "The source MAC address mask (default ff:ff:ff:ff:ff:ff)",
        heading: L2,
        apply: |b, s| {
            b.set_source_mac_mask(s.parse::<MacAddress>()?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::DestinationMacMask,
        long: "dstmacmask",
        value_name: Some("MASK"),
        help: "The destination MAC address mask (default ff:ff:ff:ff:ff:ff)",
        heading: L2,
        apply: |b, s| {
            b.set_destination_mac_mask(s.parse::<MacAddress>()?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::DestinationIp4,
        long: "dstip4",
        value_name: Some("DESTIP4"),
        help: "The destination IPv4 address",
        heading: L3,
        apply: |b, s| {
            b.set_destination_ip4(parse_ipv4(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::DestinationIp4Prefix,
        long: "dstip4pfx",
        value_name: Some("PREFIXLEN"),
        help: "The destination IPv4 prefix length (default 32)",
        heading: L3,
        apply: |b, s| {
            b.set_destination_ip4_mask(parse_ipv4_prefix(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::IpProtocol,
        long: "proto",
        value_name: Some("PROTOCOL"),
        help: "The IP protocol",
        heading: L3,
        apply: |b, s| {
            b.set_ip_protocol(parse_bounded(s, IP_PROTOCOL_MAX)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::SourceIp4,
        long: "srcip4",
        value_name: Some("SOURCEIP4"),
        help: "The source IPv4 address",
        heading: L3,
        apply: |b, s| {
            b.set_source_ip4(parse_ipv4(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::SourceIp4Prefix,
        long: "srcip4pfx",
        value_name: Some("PREFIXLEN"),
        help: "The source IPv4 prefix length (default 32)",
        heading: L3,
        apply: |b, s| {
            b.set_source_ip4_mask(parse_ipv4_prefix(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::SourceIp6,
        long: "srcip6",
        value_name: Some("SOURCEIP6"),
        help: "The source IPv6 address",
        heading: L3,
        apply: |b, s| {
            b.set_source_ip6(parse_ipv6(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::SourceIp6Prefix,
        long: "srcip6pfx",
        value_name: Some("PREFIXLEN"),
        help: "The source IPv6 prefix length (default 0)",
        heading: L3,
        apply: |b, s| {
            b.set_source_ip6_mask(parse_ipv6_prefix(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::DestinationIp6,
        long: "dstip6",
        value_name: Some("DESTIP6"),
        help: "The destination IPv6 address",
        heading: L3,
        apply: |b, s| {
            b.set_destination_ip6(parse_ipv6(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::DestinationIp6Prefix,
        long: "dstip6pfx",
        value_name: Some("PREFIXLEN"),
        help: "The destination IPv6 prefix length (default 0)",
        heading: L3,
        apply: |b, s| {
            b.set_destination_ip6_mask(parse_ipv6_prefix(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::Dscp,
        long: "dscp",
        value_name: Some("DSCP"),
        help: "The DSCP",
        heading: L3,
        apply: |b, s| {
            b.set_dscp(parse_bounded(s, DSCP_MAX)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::SourceL4Port,
        long: "srcport",
        value_name: Some("SRCPORT"),
        help: "The source L4 port",
        heading: L4,
        apply: |b, s| {
            b.set_source_l4_port(parse_bounded(s, L4_PORT_MAX)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::DestinationL4Port,
        long: "dstport",
        value_name: Some("DSTPORT"),
        help: "The destination L4 port",
        heading: L4,
        apply: |b, s| {
            b.set_destination_l4_port(parse_bounded(s, L4_PORT_MAX)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::IcmpType,
        long: "icmptype",
        value_name: Some("ICMPTYPE"),
        help: "The ICMP packet type",
        heading: L4,
        apply: |b, s| {
            b.set_icmp_type(parse_unsigned(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::IcmpCode,
        long: "icmpcode",
        value_name: Some("ICMPCODE"),
        help: "The ICMP packet code",
        heading: L4,
        apply: |b, s| {
            b.set_icmp_code(parse_unsigned(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::SetGroup,
        long: "setgroup",
        value_name: Some("GROUP"),
        help: "Set the output group for packets in this flow",
        heading: WRITE_ACTIONS,
        apply: |b, s| {
            b.set_group(parse_unsigned(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::SetQueue,
        long: "setqueue",
        value_name: Some("QUEUE"),
        help: "Set the output queue for packets in this flow",
        heading: WRITE_ACTIONS,
        apply: |b, s| {
            b.set_queue(parse_unsigned(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::SetVlanPriority,
        long: "setvlanp",
        value_name: Some("PRIORITY"),
        help: "Set the VLAN priority for packets in this flow",
        heading: WRITE_ACTIONS,
        apply: |b, s| {
            b.set_action_vlan_priority(parse_bounded(s, VLAN_PCP_MAX)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::SetDscp,
        long: "setdscp",
        value_name: Some("DSCP"),
        help: "Set the DSCP for packets in this flow",
        heading: WRITE_ACTIONS,
        apply: |b, s| {
            b.set_action_dscp(parse_bounded(s, DSCP_MAX)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::OutputTunnelPort,
        long: "outtunnelport",
        value_name: Some("OUTTUNNELPORT"),
        help: "Output tunnel port for tenant type flows",
        heading: WRITE_ACTIONS,
        apply: |b, s| {
            b.set_output_tunnel_port(parse_unsigned(s)?);
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::Discard,
        long: "discard",
        value_name: None,
        help: "Discard matching flows",
        heading: OTHER_ACTIONS,
        apply: |b, _| {
            b.set_discard();
            Ok(())
        },
    },
    FieldSpec {
        key: FieldKey::Copy,
        long: "copy",
        value_name: None,
        help: "Copy matching flows to the CPU",
        heading: OTHER_ACTIONS,
        apply: |b, _| {
            b.set_copy_to_controller();
            Ok(())
        },
    },
];

impl FieldKey {
    /// Returns the table entry describing this field.
    pub fn spec(self) -> &'static FieldSpec {
        &FIELD_SPECS[self as usize]
    }

    /// Returns the long option name.
    pub fn long(self) -> &'static str {
        self.spec().long
    }
}

/// Decodes `text` for `key` and applies it to `builder`.
///
/// # Errors
///
/// Returns [`ClientError::InvalidField`] naming the option if `text` does not
/// decode or is out of range.
pub fn apply_field(builder: &mut MatchBuilder, key: FieldKey, text: &str) -> ClientResult<()> {
    let spec = key.spec();
    (spec.apply)(builder, text).map_err(|source| ClientError::invalid_field(spec.long, text, source))
}
