//! Human-readable rendering of Policy ACL flows.

use ofdpa_rpc::FlowEntry;
use std::fmt;

/// Displays a flow as an indented block of its constrained fields and actions.
///
/// Wildcarded fields are omitted. When the flow discards, the value-setting
/// actions are not shown.
pub struct FlowDisplay<'a>(pub &'a FlowEntry);

fn field(f: &mut fmt::Formatter<'_>, name: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "\t{:<25}= {}", name, value)
}

impl fmt::Display for FlowDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flow = self.0;
        let m = &flow.match_criteria;
        let actions = &flow.actions;

        field(f, "Priority", flow.priority)?;
        if !m.in_port.is_wildcard() {
            field(f, "Interface", m.in_port.value)?;
        }
        if !m.vlan_id.is_wildcard() {
            field(f, "VLAN ID", m.vlan_id.value)?;
        }
        if m.tunnel_id != 0 {
            field(f, "Tunnel ID", m.tunnel_id)?;
        }
        if !m.vlan_pcp.is_wildcard() {
            field(f, "VLAN Priority", m.vlan_pcp.value)?;
        }
        if !m.source_mac.is_wildcard() {
            field(f, "Source MAC address", m.source_mac.value.dotted())?;
            field(f, "Source MAC Mask", m.source_mac.mask.dotted())?;
        }
        if !m.destination_mac.is_wildcard() {
            field(f, "Destination MAC address", m.destination_mac.value.dotted())?;
            field(f, "Destination MAC Mask", m.destination_mac.mask.dotted())?;
        }
        field(f, "Ethertype", format_args!("0x{:04x}", m.ether_type))?;
        if !m.source_ip4.is_wildcard() {
            field(f, "Source IPv4 address", m.source_ip4.value)?;
            field(f, "Source IPv4 Mask", m.source_ip4.mask)?;
        }
        if !m.destination_ip4.is_wildcard() {
            field(f, "Destination IPv4 address", m.destination_ip4.value)?;
            field(f, "Destination IPv4 Mask", m.destination_ip4.mask)?;
        }
        if !m.source_ip6.is_wildcard() {
            field(f, "Source IPv6 address", m.source_ip6.value)?;
            field(f, "Source IPv6 Mask", m.source_ip6.mask)?;
        }
        if !m.destination_ip6.is_wildcard() {
            field(f, "Destination IPv6 address", m.destination_ip6.value)?;
            field(f, "Destination IPv6 Mask", m.destination_ip6.mask)?;
        }
        if !m.dscp.is_wildcard() {
            field(f, "DSCP", m.dscp.value)?;
        }
        if !m.ip_protocol.is_wildcard() {
            field(f, "IP Protocol", format_args!("0x{:02x}", m.ip_protocol.value))?;
        }
        if !m.source_l4_port.is_wildcard() {
            field(f, "Source L4 Port", m.source_l4_port.value)?;
        }
        if !m.destination_l4_port.is_wildcard() {
            field(f, "Destination L4 Port", m.destination_l4_port.value)?;
        }
        if !m.icmp_type.is_wildcard() {
            field(f, "ICMP Type", m.icmp_type.value)?;
        }
        if !m.icmp_code.is_wildcard() {
            field(f, "ICMP Code", m.icmp_code.value)?;
        }
        field(f, "Idle Time", flow.idle_time)?;

        writeln!(f, "  Actions:")?;
        if actions.copy_to_controller {
            writeln!(f, "\tCopy to controller")?;
        }
        if actions.discard {
            return writeln!(f, "\tDrop packet");
        }
        if let Some(group_id) = actions.group_id {
            writeln!(f, "\tSet output group ID = 0x{:08x}", group_id)?;
        }
        if let Some(queue_id) = actions.queue_id {
            writeln!(f, "\tSet CoS queue = {}", queue_id)?;
        }
        if let Some(pcp) = actions.vlan_pcp {
            writeln!(f, "\tSet VLAN priority = {}", pcp)?;
        }
        if let Some(dscp) = actions.dscp {
            writeln!(f, "\tSet DSCP = {}", dscp)?;
        }
        if let Some(port) = actions.output_tunnel_port {
            writeln!(f, "\tOutput tunnel port = 0x{:x}", port)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::DEFAULT_RULE;
    use ofdpa_rpc::{FlowTableId, PolicyAclActions};
    use ofdpa_types::MatchField;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_rule() {
        let text = FlowDisplay(&DEFAULT_RULE.flow).to_string();
        let expected = "\
\tPriority                 = 0
\tInterface                = 1
\tVLAN ID                  = 1
\tSource MAC address       = 0009.0705.0301
\tSource MAC Mask          = ffff.ffff.ffff
\tDestination MAC address  = 0001.0305.0709
\tDestination MAC Mask     = ffff.ffff.ffff
\tEthertype                = 0x0800
\tSource IPv4 address      = 1.1.1.1
\tSource IPv4 Mask         = 255.255.255.255
\tDestination IPv4 address = 2.2.2.2
\tDestination IPv4 Mask    = 255.255.255.255
\tIP Protocol              = 0x11
\tSource L4 Port           = 100
\tDestination L4 Port      = 200
\tIdle Time                = 30
  Actions:
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_discard_hides_set_actions() {
        let mut flow = FlowEntry::new(FlowTableId::PolicyAcl);
        flow.actions = PolicyAclActions {
            group_id: Some(0x10),
            dscp: Some(10),
            discard: true,
            copy_to_controller: true,
            ..PolicyAclActions::default()
        };
        let text = FlowDisplay(&flow).to_string();
        assert!(text.ends_with("  Actions:\n\tCopy to controller\n\tDrop packet\n"));
        assert!(!text.contains("Set DSCP"));
    }

    #[test]
    fn test_set_actions() {
        let mut flow = FlowEntry::new(FlowTableId::PolicyAcl);
        flow.match_criteria.icmp_type = MatchField::exact(8);
        flow.match_criteria.source_ip6 =
            MatchField::new("2001:db8::1".parse().unwrap(), "ffff::".parse().unwrap());
        flow.actions.group_id = Some(0x20001);
        flow.actions.queue_id = Some(4);
        flow.actions.output_tunnel_port = Some(0x10001);
        let text = FlowDisplay(&flow).to_string();
        assert!(text.contains("\tICMP Type                = 8\n"));
        assert!(text.contains("\tSource IPv6 address      = 2001:db8::1\n"));
        assert!(text.contains("\tSource IPv6 Mask         = ffff::\n"));
        assert!(text.contains("\tSet output group ID = 0x00020001\n"));
        assert!(text.contains("\tSet CoS queue = 4\n"));
        assert!(text.contains("\tOutput tunnel port = 0x10001\n"));
    }
}
