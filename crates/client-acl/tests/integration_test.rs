//! Integration tests for batch add, list and delete against a flow table.
//!
//! The mock wraps the in-memory table, records every call and can be told to
//! fail particular calls.

use client_acl::cli::parse_from;
use client_acl::defaults::DEFAULT_RULE;
use client_acl::{build_rule, run_with, BatchReport, ClientError, Mode, TableDriver};
use ofdpa_rpc::{
    FlowEntry, FlowStats, FlowTableClient, FlowTableId, InMemoryFlowTable, OfdpaError,
    OfdpaResult, OfdpaStatus,
};
use ofdpa_types::MacAddress;
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Initialize(String),
    EntryInit,
    Add(MacAddress),
    Delete(MacAddress),
    NextGet,
    StatsGet,
}

/// Mock flow table for testing
pub struct MockFlowTable {
    table: InMemoryFlowTable,
    pub calls: Vec<Call>,
    /// Fail the Nth add (1-based) with this status
    pub fail_add: Option<(usize, OfdpaStatus)>,
    /// Fail every delete with this status
    pub fail_delete: Option<OfdpaStatus>,
    /// Fail every get-next with this status
    pub fail_next_get: Option<OfdpaStatus>,
}

impl MockFlowTable {
    pub fn new() -> Self {
        Self {
            table: InMemoryFlowTable::new(),
            calls: Vec::new(),
            fail_add: None,
            fail_delete: None,
            fail_next_get: None,
        }
    }

    pub fn count_calls(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| matches(call)).count()
    }

    pub fn added_macs(&self) -> Vec<MacAddress> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Add(mac) => Some(*mac),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
}

fn destination_mac(flow: &FlowEntry) -> MacAddress {
    flow.match_criteria.destination_mac.value
}

impl FlowTableClient for MockFlowTable {
    fn initialize(&mut self, client_name: &str) -> OfdpaResult<()> {
        self.calls.push(Call::Initialize(client_name.to_string()));
        self.table.initialize(client_name)
    }

    fn flow_entry_init(&mut self, table_id: FlowTableId) -> OfdpaResult<FlowEntry> {
        self.calls.push(Call::EntryInit);
        self.table.flow_entry_init(table_id)
    }

    fn flow_add(&mut self, flow: &FlowEntry) -> OfdpaResult<()> {
        self.calls.push(Call::Add(destination_mac(flow)));
        let attempt = self.count_calls(|call| matches!(call, Call::Add(_)));
        match self.fail_add {
            Some((n, status)) if n == attempt => Err(OfdpaError::from_status(status)),
            _ => self.table.flow_add(flow),
        }
    }

    fn flow_delete(&mut self, flow: &FlowEntry) -> OfdpaResult<()> {
        self.calls.push(Call::Delete(destination_mac(flow)));
        match self.fail_delete {
            Some(status) => Err(OfdpaError::from_status(status)),
            None => self.table.flow_delete(flow),
        }
    }

    fn flow_next_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowEntry> {
        self.calls.push(Call::NextGet);
        match self.fail_next_get {
            Some(status) => Err(OfdpaError::from_status(status)),
            None => self.table.flow_next_get(flow),
        }
    }

    fn flow_stats_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowStats> {
        self.calls.push(Call::StatsGet);
        self.table.flow_stats_get(flow)
    }
}

fn mac(last: u8) -> MacAddress {
    MacAddress::new([0x00, 0x01, 0x03, 0x05, 0x07, last])
}

fn rule_with_count(count: u32) -> client_acl::AclRule {
    let mut rule = DEFAULT_RULE;
    rule.count = count;
    rule
}

fn populated(count: u32) -> MockFlowTable {
    let mut mock = MockFlowTable::new();
    run_with(&mut mock, Vec::new(), "test", Mode::Add, &rule_with_count(count)).unwrap();
    mock.calls.clear();
    mock
}

#[test]
fn test_add_batch_advances_destination_mac() {
    let mut mock = MockFlowTable::new();
    let report = run_with(&mut mock, Vec::new(), "test", Mode::Add, &rule_with_count(3)).unwrap();

    assert_eq!(report, BatchReport { processed: 3, failed: 0 });
    assert_eq!(mock.added_macs(), vec![mac(0x09), mac(0x0a), mac(0x0b)]);
    assert_eq!(mock.calls[0], Call::Initialize("test".to_string()));
    assert_eq!(mock.calls[1], Call::EntryInit);
    assert_eq!(mock.len(), 3);
}

#[test]
fn test_add_batch_stops_at_first_failure() {
    let mut mock = MockFlowTable::new();
    mock.fail_add = Some((2, OfdpaStatus::Full));
    let mut out = Vec::new();

    let err = run_with(&mut mock, &mut out, "test", Mode::Add, &rule_with_count(5)).unwrap_err();

    assert!(matches!(
        err,
        ClientError::Remote { operation: "flow_add", ref source } if source.status() == OfdpaStatus::Full
    ));
    assert_eq!(mock.added_macs(), vec![mac(0x09), mac(0x0a)]);
    // The first flow is not rolled back.
    assert_eq!(mock.len(), 1);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Failed to add Policy ACL flow entry: OF-DPA call failed: OFDPA_E_FULL (-24)."));
    assert!(text.contains("\tDestination MAC address  = 0001.0305.070a\n"));
}

#[test]
fn test_list_exact_template_with_no_successor() {
    let mut mock = populated(1);
    let mut driver = TableDriver::new(&mut mock, Vec::new());

    let report = driver.list_batch(&DEFAULT_RULE.flow, 0).unwrap();
    assert_eq!(report, BatchReport { processed: 1, failed: 0 });

    let (_, out) = driver.into_parts();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Listing up to 0 Policy ACL flows.\nFlow number 1.\n"));
    assert!(!text.contains("No more entries found."));
    // Found by the stats probe, so no seek fallback before the final get-next.
    assert_eq!(mock.calls, vec![Call::StatsGet, Call::NextGet]);
}

#[test]
fn test_list_missing_template_falls_back_to_next() {
    let mut mock = populated(2);
    let mut template = DEFAULT_RULE.flow.clone();
    template.match_criteria.destination_mac.value = mac(0x00);

    let mut driver = TableDriver::new(&mut mock, Vec::new());
    let report = driver.list_batch(&template, 0).unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(mock.calls[0], Call::StatsGet);
    assert_eq!(mock.calls[1], Call::NextGet);
}

#[test]
fn test_list_reports_short_table() {
    let mut mock = populated(2);
    let mut out = Vec::new();
    let report = run_with(&mut mock, &mut out, "test", Mode::List, &rule_with_count(10)).unwrap();

    assert_eq!(report.processed, 2);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Flow number 2.\n"));
    assert!(text.ends_with("\nNo more entries found.\n"));
}

#[test]
fn test_list_get_next_error_is_fatal() {
    let mut mock = populated(2);
    mock.fail_next_get = Some(OfdpaStatus::Rpc);

    let err = run_with(&mut mock, Vec::new(), "test", Mode::List, &rule_with_count(0)).unwrap_err();
    assert!(matches!(err, ClientError::Remote { operation: "flow_get", .. }));
}

#[test]
fn test_delete_all() {
    let mut mock = populated(4);
    let report = run_with(&mut mock, Vec::new(), "test", Mode::Delete, &rule_with_count(0)).unwrap();

    assert_eq!(report, BatchReport { processed: 4, failed: 0 });
    assert_eq!(mock.len(), 0);
    assert_eq!(
        mock.count_calls(|call| matches!(call, Call::Delete(_))),
        4
    );
}

#[test]
fn test_delete_failure_continues() {
    let mut mock = populated(3);
    mock.fail_delete = Some(OfdpaStatus::RequestDenied);
    let mut out = Vec::new();

    let report = run_with(&mut mock, &mut out, "test", Mode::Delete, &rule_with_count(0)).unwrap();

    assert_eq!(report, BatchReport { processed: 3, failed: 3 });
    assert_eq!(mock.len(), 3);
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("Error deleting Policy ACL flow entry").count(), 3);
}

#[test]
fn test_command_line_to_batch() {
    let invocation = parse_from([
        "client_acl",
        "--count",
        "2",
        "--dstmac",
        "00:00:00:00:00:ff",
        "--srcip4",
        "0",
        "--setqueue",
        "3",
    ])
    .unwrap();
    let rule = build_rule(&invocation.fields).unwrap();
    assert!(rule.flow.match_criteria.source_ip4.is_wildcard());

    let mut mock = MockFlowTable::new();
    let mut out = Vec::new();
    run_with(&mut mock, &mut out, "test", invocation.cli.mode(), &rule).unwrap();

    assert_eq!(
        mock.added_macs(),
        vec![
            MacAddress::new([0, 0, 0, 0, 0, 0xff]),
            MacAddress::new([0, 0, 0, 0, 1, 0]),
        ]
    );
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Adding 2 Policy ACL flows with the following parameters:\n"));
    assert!(text.contains("\tSet CoS queue = 3\n"));
}

#[test]
fn test_invalid_field_names_option() {
    let invocation = parse_from(["client_acl", "--dscp", "64"]).unwrap();
    let err = build_rule(&invocation.fields).unwrap_err();
    assert!(err.to_string().starts_with("Invalid dscp \"64\""));
}
