//! Blocking RPC transport to the flow table service.
//!
//! Each call is one request/response exchange over a TCP connection. A frame
//! is a 4-byte big-endian length followed by a JSON document. The connection
//! is opened on first use and re-opened after a transport failure.

use crate::api::FlowTableClient;
use crate::error::{OfdpaError, OfdpaResult, OfdpaStatus};
use crate::types::{FlowEntry, FlowStats, FlowTableId};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

/// Largest frame body accepted from the peer.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// A request sent to the flow table service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum RpcRequest {
    ClientInitialize { name: String },
    FlowEntryInit { table_id: FlowTableId },
    FlowAdd { flow: FlowEntry },
    FlowDelete { flow: FlowEntry },
    FlowNextGet { flow: FlowEntry },
    FlowStatsGet { flow: FlowEntry },
}

impl RpcRequest {
    /// Returns the call name used in logs and error reports.
    pub fn name(&self) -> &'static str {
        match self {
            RpcRequest::ClientInitialize { .. } => "client_initialize",
            RpcRequest::FlowEntryInit { .. } => "flow_entry_init",
            RpcRequest::FlowAdd { .. } => "flow_add",
            RpcRequest::FlowDelete { .. } => "flow_delete",
            RpcRequest::FlowNextGet { .. } => "flow_next_get",
            RpcRequest::FlowStatsGet { .. } => "flow_stats_get",
        }
    }

    /// Executes this request against a local table and builds the reply.
    pub fn dispatch<C: FlowTableClient + ?Sized>(&self, table: &mut C) -> RpcResponse {
        let result = match self {
            RpcRequest::ClientInitialize { name } => {
                table.initialize(name).map(|()| RpcResponse::ok())
            }
            RpcRequest::FlowEntryInit { table_id } => {
                table.flow_entry_init(*table_id).map(RpcResponse::with_flow)
            }
            RpcRequest::FlowAdd { flow } => table.flow_add(flow).map(|()| RpcResponse::ok()),
            RpcRequest::FlowDelete { flow } => {
                table.flow_delete(flow).map(|()| RpcResponse::ok())
            }
            RpcRequest::FlowNextGet { flow } => {
                table.flow_next_get(flow).map(RpcResponse::with_flow)
            }
            RpcRequest::FlowStatsGet { flow } => {
                table.flow_stats_get(flow).map(RpcResponse::with_stats)
            }
        };
        result.unwrap_or_else(|e| RpcResponse::error(e.status()))
    }
}

/// The service's reply: a raw status code plus the payload of the call, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<FlowEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<FlowStats>,
}

impl RpcResponse {
    pub fn ok() -> Self {
        Self::error(OfdpaStatus::None)
    }

    pub fn error(status: OfdpaStatus) -> Self {
        RpcResponse {
            status: status.code(),
            flow: None,
            stats: None,
        }
    }

    pub fn with_flow(flow: FlowEntry) -> Self {
        RpcResponse {
            flow: Some(flow),
            ..Self::ok()
        }
    }

    pub fn with_stats(stats: FlowStats) -> Self {
        RpcResponse {
            stats: Some(stats),
            ..Self::ok()
        }
    }
}

/// Writes one length-prefixed frame.
pub fn write_frame<W: Write + ?Sized>(writer: &mut W, body: &[u8]) -> io::Result<()> {
    let len = u32::try_from(body.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "frame too large"))?;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(body)?;
    writer.flush()
}

/// Reads one length-prefixed frame.
pub fn read_frame<R: Read + ?Sized>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_be_bytes(len_bytes) as usize;
    if len > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame length {} exceeds {}", len, MAX_FRAME_LEN),
        ));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(body)
}

/// Answers requests arriving on `stream` from `table` until the peer closes it.
pub fn serve_connection<S, C>(stream: &mut S, table: &mut C) -> io::Result<()>
where
    S: Read + Write + ?Sized,
    C: FlowTableClient + ?Sized,
{
    loop {
        let body = match read_frame(stream) {
            Ok(body) => body,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e),
        };
        let request: RpcRequest = serde_json::from_slice(&body)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let response = request.dispatch(table);
        let reply = serde_json::to_vec(&response)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        write_frame(stream, &reply)?;
    }
}

/// Flow table client speaking to a remote service over TCP.
#[derive(Debug)]
pub struct RpcClient {
    addr: String,
    timeout: Option<Duration>,
    stream: Option<TcpStream>,
}

impl RpcClient {
    /// Creates a client for the service at `addr` (`host:port`). No connection
    /// is made until the first call.
    pub fn new(addr: impl Into<String>) -> Self {
        RpcClient {
            addr: addr.into(),
            timeout: None,
            stream: None,
        }
    }

    /// Sets the read/write timeout applied to the connection.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    fn exchange(&mut self, body: &[u8]) -> io::Result<Vec<u8>> {
        if self.stream.is_none() {
            debug!("Connecting to flow table service at {}", self.addr);
            let stream = TcpStream::connect(&self.addr)?;
            stream.set_read_timeout(self.timeout)?;
            stream.set_write_timeout(self.timeout)?;
            stream.set_nodelay(true)?;
            self.stream = Some(stream);
        }
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))?;
        write_frame(stream, body)?;
        read_frame(stream)
    }

    fn call(&mut self, request: &RpcRequest) -> OfdpaResult<RpcResponse> {
        debug!("RPC {} -> {}", request.name(), self.addr);
        let body = serde_json::to_vec(request)?;
        let reply = match self.exchange(&body) {
            Ok(reply) => reply,
            Err(e) => {
                warn!("RPC {} to {} failed: {}", request.name(), self.addr, e);
                self.stream = None;
                return Err(OfdpaError::transport(self.addr.clone(), e));
            }
        };

        let response: RpcResponse = serde_json::from_slice(&reply)?;
        OfdpaStatus::from_raw(response.status).into_result()?;
        Ok(response)
    }
}

impl FlowTableClient for RpcClient {
    fn initialize(&mut self, client_name: &str) -> OfdpaResult<()> {
        self.call(&RpcRequest::ClientInitialize {
            name: client_name.to_string(),
        })
        .map(|_| ())
    }

    fn flow_entry_init(&mut self, table_id: FlowTableId) -> OfdpaResult<FlowEntry> {
        self.call(&RpcRequest::FlowEntryInit { table_id })?
            .flow
            .ok_or(OfdpaError::MalformedReply {
                call: "flow_entry_init",
            })
    }

    fn flow_add(&mut self, flow: &FlowEntry) -> OfdpaResult<()> {
        self.call(&RpcRequest::FlowAdd { flow: flow.clone() })
            .map(|_| ())
    }

    fn flow_delete(&mut self, flow: &FlowEntry) -> OfdpaResult<()> {
        self.call(&RpcRequest::FlowDelete { flow: flow.clone() })
            .map(|_| ())
    }

    fn flow_next_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowEntry> {
        self.call(&RpcRequest::FlowNextGet { flow: flow.clone() })?
            .flow
            .ok_or(OfdpaError::MalformedReply {
                call: "flow_next_get",
            })
    }

    fn flow_stats_get(&mut self, flow: &FlowEntry) -> OfdpaResult<FlowStats> {
        self.call(&RpcRequest::FlowStatsGet { flow: flow.clone() })?
            .stats
            .ok_or(OfdpaError::MalformedReply {
                call: "flow_stats_get",
            })
    }
}
