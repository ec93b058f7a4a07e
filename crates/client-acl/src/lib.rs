//! Policy ACL flow client for the OF-DPA flow table service.
//!
//! Builds one Policy ACL rule from command-line fields layered over
//! [`DEFAULT_RULE`](defaults::DEFAULT_RULE), then adds a batch of copies of
//! it (advancing the destination MAC each time), lists the table, or deletes
//! entries starting from the rule.
//!
//! # Example
//!
//! ```
//! use client_acl::{build_rule, run_with, Mode};
//! use client_acl::fields::FieldKey;
//! use ofdpa_rpc::InMemoryFlowTable;
//!
//! let rule = build_rule(&[(FieldKey::Count, "2".to_string())]).unwrap();
//! let mut table = InMemoryFlowTable::new();
//! let mut out = Vec::new();
//! let report = run_with(&mut table, &mut out, "example", Mode::Add, &rule).unwrap();
//! assert_eq!(report.processed, 2);
//! assert_eq!(table.len(), 2);
//! ```

pub mod builder;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod display;
pub mod driver;
pub mod error;
pub mod fields;

pub use builder::{AclRule, MatchBuilder};
pub use config::ClientConfig;
pub use display::FlowDisplay;
pub use driver::{BatchReport, BatchState, Mode, TableDriver};
pub use error::{ClientError, ClientResult, ValidationError};

use defaults::DEFAULT_RULE;
use fields::{apply_field, FieldKey};
use log::debug;
use ofdpa_rpc::{FlowTableClient, FlowTableId};
use std::io::Write;

/// Applies `fields` in order over the default rule and validates the result.
pub fn build_rule(fields: &[(FieldKey, String)]) -> ClientResult<AclRule> {
    let mut builder = MatchBuilder::new(&DEFAULT_RULE);
    for (key, text) in fields {
        apply_field(&mut builder, *key, text)?;
    }
    let rule = builder.finish()?;
    debug!("Built {}", rule);
    Ok(rule)
}

/// Registers with `client`, prepares the Policy ACL table and runs one batch.
pub fn run_with<C, W>(
    mut client: C,
    out: W,
    client_name: &str,
    mode: Mode,
    rule: &AclRule,
) -> ClientResult<BatchReport>
where
    C: FlowTableClient,
    W: Write,
{
    client
        .initialize(client_name)
        .map_err(|e| ClientError::remote("client_initialize", e))?;
    let template = client
        .flow_entry_init(FlowTableId::PolicyAcl)
        .map_err(|e| ClientError::remote("flow_entry_init", e))?;

    let mut driver = TableDriver::new(client, out);
    match mode {
        Mode::Add => driver.add_batch(&rule.flow, rule.count),
        Mode::List => driver.list_batch(&template, rule.count),
        Mode::Delete => driver.delete_batch(&rule.flow, rule.count),
    }
}
