//! Runtime configuration and flow table selection.

use crate::cli::Cli;
use crate::defaults::{DEFAULT_CLIENT_NAME, DEFAULT_LOG_LEVEL, DEFAULT_RPC_ADDR};
use log::info;
use ofdpa_rpc::{FlowTableClient, InMemoryFlowTable, RpcClient};

/// Where and how the client talks to the flow table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `host:port` of the flow table service.
    pub rpc_addr: String,
    pub client_name: String,
    /// Use an in-process table instead of the service.
    pub simulate: bool,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            rpc_addr: DEFAULT_RPC_ADDR.to_string(),
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            simulate: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl From<&Cli> for ClientConfig {
    fn from(cli: &Cli) -> Self {
        ClientConfig {
            rpc_addr: cli.rpc_addr.clone(),
            client_name: cli.client_name.clone(),
            simulate: cli.simulate,
            log_level: cli.log_level.clone(),
        }
    }
}

impl ClientConfig {
    /// Returns the flow table this configuration selects.
    ///
    /// No connection is made until the first call. A simulated table starts
    /// empty on every call.
    pub fn connect(&self) -> Box<dyn FlowTableClient> {
        if self.simulate {
            info!("Using in-memory flow table");
            Box::new(InMemoryFlowTable::new())
        } else {
            info!("Using flow table service at {}", self.rpc_addr);
            Box::new(RpcClient::new(self.rpc_addr.clone()))
        }
    }
}
