//! Policy ACL rule assembly.
//!
//! [`MatchBuilder`] starts from a default rule and overlays decoded option
//! values in the order they were given. Each setter is idempotent and the
//! last write to a field wins: value setters store only the value and mask
//! setters only the mask. [`MatchBuilder::finish`] applies the zero-value
//! wildcard rule and the ethertype/address-family check.

use crate::error::{ClientResult, ValidationError};
use ofdpa_rpc::FlowEntry;
use ofdpa_types::{MacAddress, MatchField};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Ethertype of IPv4 packets.
pub const ETHERTYPE_IPV4: u16 = 0x0800;

/// Ethertype of IPv6 packets.
pub const ETHERTYPE_IPV6: u16 = 0x86dd;

/// Mask matching all 13 bits of an OF-DPA VLAN id (12-bit id plus the present flag).
pub const VLAN_ID_EXACT_MASK: u16 = 0x1fff;

/// Mask applied when a VLAN priority is given.
pub const VLAN_PCP_MASK: u8 = 0x07;

/// Mask applied when a DSCP value is given.
pub const DSCP_MASK: u8 = 0xff;

/// A flow ready to submit, with the number of flows to add, list or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclRule {
    /// Batch size; 0 means no limit when listing or deleting.
    pub count: u32,
    pub flow: FlowEntry,
}

impl fmt::Display for AclRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AclRule(count={}, priority={}, table={})",
            self.count, self.flow.priority, self.flow.table_id
        )
    }
}

/// Accumulates option values into a Policy ACL rule.
#[derive(Debug, Clone)]
pub struct MatchBuilder {
    rule: AclRule,
    source_ip4_supplied: bool,
    destination_ip4_supplied: bool,
    ipv6_supplied: bool,
}

impl MatchBuilder {
    /// Starts from a copy of `defaults`.
    pub fn new(defaults: &AclRule) -> Self {
        MatchBuilder {
            rule: defaults.clone(),
            source_ip4_supplied: false,
            destination_ip4_supplied: false,
            ipv6_supplied: false,
        }
    }

    pub fn set_count(&mut self, count: u32) {
        self.rule.count = count;
    }

    pub fn set_priority(&mut self, priority: u32) {
        self.rule.flow.priority = priority;
    }

    /// Sets the ingress port; `None` matches any port.
    pub fn set_in_port(&mut self, port: Option<u32>) {
        self.rule.flow.match_criteria.in_port = match port {
            Some(port) => MatchField::exact(port),
            None => MatchField::wildcard(),
        };
    }

    /// Sets the VLAN id, keeping the current mask. An id of zero wildcards the field.
    pub fn set_vlan_id(&mut self, vlan_id: u16) {
        self.rule.flow.match_criteria.vlan_id.value = vlan_id;
    }

    pub fn set_tunnel_id(&mut self, tunnel_id: u32) {
        self.rule.flow.match_criteria.tunnel_id = tunnel_id;
    }

    pub fn set_vlan_priority(&mut self, pcp: u8) {
        self.rule.flow.match_criteria.vlan_pcp = MatchField::new(pcp, VLAN_PCP_MASK);
    }

    pub fn set_ether_type(&mut self, ether_type: u16) {
        self.rule.flow.match_criteria.ether_type = ether_type;
    }

    /// Sets the source MAC; the all-zero address wildcards the field.
    pub fn set_source_mac(&mut self, mac: MacAddress) {
        self.rule.flow.match_criteria.source_mac.value = mac;
    }

    pub fn set_source_mac_mask(&mut self, mask: MacAddress) {
        self.rule.flow.match_criteria.source_mac.mask = mask;
    }

    /// Sets the destination MAC; the all-zero address wildcards the field.
    pub fn set_destination_mac(&mut self, mac: MacAddress) {
        self.rule.flow.match_criteria.destination_mac.value = mac;
    }

    pub fn set_destination_mac_mask(&mut self, mask: MacAddress) {
        self.rule.flow.match_criteria.destination_mac.mask = mask;
    }

    /// Sets the source IPv4 address; `0.0.0.0` wildcards the field.
    pub fn set_source_ip4(&mut self, addr: Ipv4Addr) {
        self.rule.flow.match_criteria.source_ip4.value = addr;
        self.source_ip4_supplied = !addr.is_unspecified();
    }

    pub fn set_source_ip4_mask(&mut self, mask: Ipv4Addr) {
        self.rule.flow.match_criteria.source_ip4.mask = mask;
    }

    /// Sets the destination IPv4 address; `0.0.0.0` wildcards the field.
    pub fn set_destination_ip4(&mut self, addr: Ipv4Addr) {
        self.rule.flow.match_criteria.destination_ip4.value = addr;
        self.destination_ip4_supplied = !addr.is_unspecified();
    }

    pub fn set_destination_ip4_mask(&mut self, mask: Ipv4Addr) {
        self.rule.flow.match_criteria.destination_ip4.mask = mask;
    }

    /// Sets the source IPv6 address. The mask comes from the prefix length.
    pub fn set_source_ip6(&mut self, addr: Ipv6Addr) {
        self.rule.flow.match_criteria.source_ip6.value = addr;
        self.ipv6_supplied = true;
    }

    pub fn set_source_ip6_mask(&mut self, mask: Ipv6Addr) {
        self.rule.flow.match_criteria.source_ip6.mask = mask;
    }

    /// Sets the destination IPv6 address. The mask comes from the prefix length.
    pub fn set_destination_ip6(&mut self, addr: Ipv6Addr) {
        self.rule.flow.match_criteria.destination_ip6.value = addr;
        self.ipv6_supplied = true;
    }

    pub fn set_destination_ip6_mask(&mut self, mask: Ipv6Addr) {
        self.rule.flow.match_criteria.destination_ip6.mask = mask;
    }

    /// Sets the IP protocol, keeping the current mask. Protocol zero wildcards the field.
    pub fn set_ip_protocol(&mut self, protocol: u16) {
        self.rule.flow.match_criteria.ip_protocol.value = protocol;
    }

    pub fn set_dscp(&mut self, dscp: u8) {
        self.rule.flow.match_criteria.dscp = MatchField::new(dscp, DSCP_MASK);
    }

    pub fn set_source_l4_port(&mut self, port: u16) {
        self.rule.flow.match_criteria.source_l4_port.value = u32::from(port);
    }

    pub fn set_destination_l4_port(&mut self, port: u16) {
        self.rule.flow.match_criteria.destination_l4_port.value = u32::from(port);
    }

    pub fn set_icmp_type(&mut self, icmp_type: u8) {
        self.rule.flow.match_criteria.icmp_type = MatchField::exact(icmp_type);
    }

    pub fn set_icmp_code(&mut self, icmp_code: u8) {
        self.rule.flow.match_criteria.icmp_code = MatchField::exact(icmp_code);
    }

    pub fn set_group(&mut self, group_id: u32) {
        self.rule.flow.actions.group_id = Some(group_id);
    }

    pub fn set_queue(&mut self, queue_id: u32) {
        self.rule.flow.actions.queue_id = Some(queue_id);
    }

    pub fn set_action_vlan_priority(&mut self, pcp: u8) {
        self.rule.flow.actions.vlan_pcp = Some(pcp);
    }

    pub fn set_action_dscp(&mut self, dscp: u8) {
        self.rule.flow.actions.dscp = Some(dscp);
    }

    pub fn set_output_tunnel_port(&mut self, port: u32) {
        self.rule.flow.actions.output_tunnel_port = Some(port);
    }

    pub fn set_discard(&mut self) {
        self.rule.flow.actions.discard = true;
    }

    pub fn set_copy_to_controller(&mut self) {
        self.rule.flow.actions.copy_to_controller = true;
    }

    /// Completes the rule.
    ///
    /// A zero value leaves its field wildcarded even if a mask or prefix for
    /// the same field was given, whatever the option order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if an IPv6 address was given with the IPv4
    /// ethertype, or an IPv4 address with the IPv6 ethertype.
    pub fn finish(mut self) -> ClientResult<AclRule> {
        let m = &mut self.rule.flow.match_criteria;
        m.vlan_id.collapse_zero();
        m.source_mac.collapse_zero();
        m.destination_mac.collapse_zero();
        m.source_ip4.collapse_zero();
        m.destination_ip4.collapse_zero();
        m.ip_protocol.collapse_zero();
        m.dscp.collapse_zero();
        m.source_l4_port.collapse_zero();
        m.destination_l4_port.collapse_zero();

        let ether_type = m.ether_type;
        let ipv4_supplied = self.source_ip4_supplied || self.destination_ip4_supplied;
        if self.ipv6_supplied && ether_type == ETHERTYPE_IPV4 {
            return Err(ValidationError::Ipv6AddressWithEthertype { ether_type }.into());
        }
        if ipv4_supplied && ether_type == ETHERTYPE_IPV6 {
            return Err(ValidationError::Ipv4AddressWithEthertype { ether_type }.into());
        }

        Ok(self.rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::DEFAULT_RULE;
    use crate::error::ClientError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_untouched_defaults() {
        let rule = MatchBuilder::new(&DEFAULT_RULE).finish().unwrap();
        assert_eq!(rule, DEFAULT_RULE);
    }

    #[test]
    fn test_zero_ipv4_forces_wildcard_in_any_order() {
        let mut before = MatchBuilder::new(&DEFAULT_RULE);
        before.set_source_ip4(Ipv4Addr::UNSPECIFIED);
        before.set_source_ip4_mask(Ipv4Addr::new(255, 255, 255, 0));
        let before = before.finish().unwrap();

        let mut after = MatchBuilder::new(&DEFAULT_RULE);
        after.set_source_ip4_mask(Ipv4Addr::new(255, 255, 255, 0));
        after.set_source_ip4(Ipv4Addr::UNSPECIFIED);
        let after = after.finish().unwrap();

        assert!(before.flow.match_criteria.source_ip4.is_wildcard());
        assert_eq!(before, after);
    }

    #[test]
    fn test_nonzero_ipv4_keeps_exact_mask() {
        let mut builder = MatchBuilder::new(&DEFAULT_RULE);
        builder.set_destination_ip4(Ipv4Addr::new(10, 0, 0, 1));
        let rule = builder.finish().unwrap();
        assert_eq!(
            rule.flow.match_criteria.destination_ip4,
            MatchField::exact(Ipv4Addr::new(10, 0, 0, 1))
        );
    }

    #[test]
    fn test_zero_mac_wildcards() {
        let mut builder = MatchBuilder::new(&DEFAULT_RULE);
        builder.set_source_mac(MacAddress::ZERO);
        builder.set_source_mac_mask(MacAddress::BROADCAST);
        let rule = builder.finish().unwrap();
        assert!(rule.flow.match_criteria.source_mac.is_wildcard());
    }

    #[test]
    fn test_zero_l4_fields_wildcard() {
        let mut builder = MatchBuilder::new(&DEFAULT_RULE);
        builder.set_ip_protocol(0);
        builder.set_source_l4_port(0);
        builder.set_destination_l4_port(0);
        builder.set_vlan_id(0);
        builder.set_dscp(0);
        let m = builder.finish().unwrap().flow.match_criteria;
        assert!(m.ip_protocol.is_wildcard());
        assert!(m.source_l4_port.is_wildcard());
        assert!(m.destination_l4_port.is_wildcard());
        assert!(m.vlan_id.is_wildcard());
        assert!(m.dscp.is_wildcard());
    }

    #[test]
    fn test_field_masks() {
        let mut builder = MatchBuilder::new(&DEFAULT_RULE);
        builder.set_vlan_priority(5);
        builder.set_dscp(46);
        builder.set_icmp_type(0);
        builder.set_in_port(None);
        let m = builder.finish().unwrap().flow.match_criteria;
        assert_eq!(m.vlan_pcp, MatchField::new(5, VLAN_PCP_MASK));
        assert_eq!(m.dscp, MatchField::new(46, DSCP_MASK));
        assert_eq!(m.icmp_type, MatchField::new(0, 0xff));
        assert!(m.in_port.is_wildcard());
    }

    #[test]
    fn test_last_write_wins() {
        let mut builder = MatchBuilder::new(&DEFAULT_RULE);
        builder.set_priority(5);
        builder.set_priority(9);
        builder.set_dscp(0);
        builder.set_dscp(10);
        let rule = builder.finish().unwrap();
        assert_eq!(rule.flow.priority, 9);
        assert_eq!(rule.flow.match_criteria.dscp, MatchField::new(10, DSCP_MASK));
    }

    #[test]
    fn test_nonzero_after_zero_keeps_mask() {
        let mut builder = MatchBuilder::new(&DEFAULT_RULE);
        builder.set_vlan_id(0);
        builder.set_vlan_id(20);
        builder.set_ip_protocol(0);
        builder.set_ip_protocol(6);
        builder.set_source_l4_port(0);
        builder.set_source_l4_port(80);
        builder.set_destination_l4_port(0);
        builder.set_destination_l4_port(8080);
        builder.set_source_ip4(Ipv4Addr::UNSPECIFIED);
        builder.set_source_ip4(Ipv4Addr::new(10, 0, 0, 1));
        builder.set_destination_mac(MacAddress::ZERO);
        builder.set_destination_mac(MacAddress::BROADCAST);
        let m = builder.finish().unwrap().flow.match_criteria;
        assert_eq!(m.vlan_id, MatchField::new(20, VLAN_ID_EXACT_MASK));
        assert_eq!(m.ip_protocol, MatchField::new(6, 0xff));
        assert_eq!(m.source_l4_port, MatchField::exact(80));
        assert_eq!(m.destination_l4_port, MatchField::exact(8080));
        assert_eq!(m.source_ip4, MatchField::exact(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(m.destination_mac, MatchField::exact(MacAddress::BROADCAST));
    }

    #[test]
    fn test_prefix_before_address_is_kept() {
        let mut builder = MatchBuilder::new(&DEFAULT_RULE);
        builder.set_source_ip4_mask(Ipv4Addr::new(255, 255, 0, 0));
        builder.set_source_ip4(Ipv4Addr::UNSPECIFIED);
        builder.set_source_ip4(Ipv4Addr::new(10, 1, 0, 0));
        let m = builder.finish().unwrap().flow.match_criteria;
        assert_eq!(
            m.source_ip4,
            MatchField::new(Ipv4Addr::new(10, 1, 0, 0), Ipv4Addr::new(255, 255, 0, 0))
        );
    }

    #[test]
    fn test_later_zero_ipv4_clears_family_check() {
        let mut builder = MatchBuilder::new(&DEFAULT_RULE);
        builder.set_ether_type(ETHERTYPE_IPV6);
        builder.set_source_ip4(Ipv4Addr::new(10, 0, 0, 1));
        builder.set_source_ip4(Ipv4Addr::UNSPECIFIED);
        builder.set_destination_ip4(Ipv4Addr::UNSPECIFIED);
        let m = builder.finish().unwrap().flow.match_criteria;
        assert!(m.source_ip4.is_wildcard());
        assert!(m.destination_ip4.is_wildcard());

        let mut builder = MatchBuilder::new(&DEFAULT_RULE);
        builder.set_ether_type(ETHERTYPE_IPV6);
        builder.set_source_ip4(Ipv4Addr::new(10, 0, 0, 1));
        builder.set_destination_ip4(Ipv4Addr::UNSPECIFIED);
        assert!(builder.finish().is_err());
    }

    #[test]
    fn test_ipv6_with_ipv4_ethertype() {
        let mut builder = MatchBuilder::new(&DEFAULT_RULE);
        builder.set_source_ip6("2001:db8::1".parse().unwrap());
        let err = builder.finish().unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::Ipv6AddressWithEthertype { ether_type: 0x0800 })
        ));
    }

    #[test]
    fn test_ipv4_with_ipv6_ethertype() {
        let mut builder = MatchBuilder::new(&DEFAULT_RULE);
        builder.set_ether_type(ETHERTYPE_IPV6);
        builder.set_destination_ip4(Ipv4Addr::new(10, 0, 0, 1));
        assert!(matches!(
            builder.finish(),
            Err(ClientError::Validation(
                ValidationError::Ipv4AddressWithEthertype { .. }
            ))
        ));
    }

    #[test]
    fn test_ipv6_with_ipv6_ethertype() {
        let mut builder = MatchBuilder::new(&DEFAULT_RULE);
        builder.set_ether_type(ETHERTYPE_IPV6);
        builder.set_source_ip6("2001:db8::1".parse().unwrap());
        builder.set_source_ip6_mask(ofdpa_types::ip::ipv6_prefix_mask(64).unwrap());
        let rule = builder.finish().unwrap();
        assert_eq!(
            rule.flow.match_criteria.source_ip6.mask,
            "ffff:ffff:ffff:ffff::".parse::<Ipv6Addr>().unwrap()
        );
    }

    #[test]
    fn test_actions() {
        let mut builder = MatchBuilder::new(&DEFAULT_RULE);
        builder.set_group(0x20001);
        builder.set_queue(3);
        builder.set_discard();
        builder.set_copy_to_controller();
        let actions = builder.finish().unwrap().flow.actions;
        assert_eq!(actions.group_id, Some(0x20001));
        assert_eq!(actions.queue_id, Some(3));
        assert_eq!(actions.vlan_pcp, None);
        assert!(actions.discard);
        assert!(actions.copy_to_controller);
    }
}
