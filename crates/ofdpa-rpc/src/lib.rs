//! Client interface to the OF-DPA flow table service.
//!
//! The service exposes its flow tables through a small synchronous RPC
//! contract: prepare, add, delete, get-next and stats-get. This crate models
//! that contract as the [`FlowTableClient`] trait and provides two
//! implementations.
//!
//! # Architecture
//!
//! - [`types`]: Flow records (`FlowEntry`, `PolicyAclMatch`, `PolicyAclActions`, `FlowStats`)
//! - [`error`]: Status codes and error handling
//! - [`api`]: The [`FlowTableClient`] trait
//! - [`transport`]: [`RpcClient`], a blocking TCP client with length-prefixed JSON frames
//! - [`memory`]: [`InMemoryFlowTable`], an ordered in-process table
//!
//! # Example
//!
//! ```
//! use ofdpa_rpc::{FlowTableClient, FlowTableId, InMemoryFlowTable, OfdpaResult};
//!
//! fn count_flows<C: FlowTableClient>(client: &mut C) -> OfdpaResult<usize> {
//!     let mut cursor = client.flow_entry_init(FlowTableId::PolicyAcl)?;
//!     let mut count = 0;
//!     loop {
//!         match client.flow_next_get(&cursor) {
//!             Ok(next) => {
//!                 count += 1;
//!                 cursor = next;
//!             }
//!             Err(e) if e.is_not_found() => return Ok(count),
//!             Err(e) => return Err(e),
//!         }
//!     }
//! }
//!
//! let mut table = InMemoryFlowTable::new();
//! assert_eq!(count_flows(&mut table).unwrap(), 0);
//! ```

pub mod api;
pub mod error;
pub mod memory;
pub mod transport;
pub mod types;

pub use api::FlowTableClient;
pub use error::{OfdpaError, OfdpaResult, OfdpaStatus, OfdpaStatusExt};
pub use memory::InMemoryFlowTable;
pub use transport::RpcClient;
pub use types::{FlowEntry, FlowKey, FlowStats, FlowTableId, PolicyAclActions, PolicyAclMatch};
