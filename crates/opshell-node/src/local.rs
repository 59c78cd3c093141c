//! In-process node keeping its flows in memory.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

use crate::NODE_TARGET;
use crate::errors::NodeError;
use crate::ops::{
    AttachmentTrustInfo, Checkpoint, FlowHandle, FlowSummary, InternalNodeOps, NodeInfo,
    NodeLifecycle, NodeOps, ShutdownMode, ShutdownReport,
};

/// Platform version reported by [`LocalNode`].
pub const PLATFORM_VERSION: u32 = 14;

const FLOW_ID_PREFIX: &str = "flow-";

#[derive(Debug, Clone)]
struct FlowRecord {
    flow_name: String,
    arguments: Value,
    started_at: String,
}

#[derive(Debug)]
struct NodeState {
    running: bool,
    draining: bool,
    next_flow: u64,
    flows: BTreeMap<u64, FlowRecord>,
    network_map_entries: usize,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            running: true,
            draining: false,
            next_flow: 1,
            flows: BTreeMap::new(),
            network_map_entries: 0,
        }
    }
}

impl NodeState {
    /// Records a new flow, reading the clock before an id is consumed.
    fn admit<F>(&mut self, flow_name: &str, arguments: Value, clock: F) -> Result<u64, NodeError>
    where
        F: FnOnce() -> Result<String, NodeError>,
    {
        let started_at = clock()?;
        let number = self.next_flow;
        self.next_flow += 1;
        self.flows.insert(
            number,
            FlowRecord {
                flow_name: flow_name.to_owned(),
                arguments,
                started_at,
            },
        );
        Ok(number)
    }
}

fn flow_id(number: u64) -> String {
    format!("{FLOW_ID_PREFIX}{number}")
}

fn parse_flow_id(id: &str) -> Option<u64> {
    id.strip_prefix(FLOW_ID_PREFIX)?.parse().ok()
}

fn now_rfc3339() -> Result<String, NodeError> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}

/// Stand-in node serving both operations interfaces from memory.
#[derive(Debug)]
pub struct LocalNode {
    legal_name: String,
    addresses: Vec<String>,
    registered_flows: Vec<String>,
    attachments: Vec<AttachmentTrustInfo>,
    state: Mutex<NodeState>,
}

impl LocalNode {
    /// Creates a running node with no registered flows.
    #[must_use]
    pub fn new(legal_name: impl Into<String>) -> Self {
        Self {
            legal_name: legal_name.into(),
            addresses: vec![String::from("localhost:10002")],
            registered_flows: Vec::new(),
            attachments: Vec::new(),
            state: Mutex::new(NodeState::default()),
        }
    }

    /// Registers a flow that `startFlowDynamic` may start.
    #[must_use]
    pub fn with_flow(mut self, flow_name: impl Into<String>) -> Self {
        let name = flow_name.into();
        if !self.registered_flows.contains(&name) {
            self.registered_flows.push(name);
        }
        self
    }

    /// Records an attachment reported by `attachmentTrustInfos`.
    #[must_use]
    pub fn with_attachment(mut self, attachment: AttachmentTrustInfo) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Seeds the network map cache with `entries` entries.
    #[must_use]
    pub fn with_network_map_entries(self, entries: usize) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.network_map_entries = entries;
        }
        self
    }

    /// Number of cached network map entries.
    ///
    /// # Errors
    ///
    /// Fails when the node state is unavailable.
    pub fn network_map_entries(&self) -> Result<usize, NodeError> {
        Ok(self.lock()?.network_map_entries)
    }

    /// Returns the node's legal name.
    #[must_use]
    pub fn legal_name(&self) -> &str {
        &self.legal_name
    }

    fn lock(&self) -> Result<MutexGuard<'_, NodeState>, NodeError> {
        self.state.lock().map_err(|_| NodeError::StateUnavailable)
    }

    fn running(&self) -> Result<MutexGuard<'_, NodeState>, NodeError> {
        let state = self.lock()?;
        if state.running {
            Ok(state)
        } else {
            Err(NodeError::ShutDown)
        }
    }

    fn ensure_running(&self) -> Result<(), NodeError> {
        self.running().map(drop)
    }

    fn remove_flow(&self, id: &str, force: bool) -> Result<bool, NodeError> {
        let mut state = self.running()?;
        let removed = parse_flow_id(id)
            .and_then(|number| state.flows.remove(&number))
            .is_some();
        debug!(target: NODE_TARGET, id, force, removed, "kill flow requested");
        Ok(removed)
    }

    fn stop(&self, mode: ShutdownMode) -> Result<ShutdownReport, NodeError> {
        let mut state = self.running()?;
        let flows_in_flight = state.flows.len();
        match mode {
            ShutdownMode::Immediate => state.flows.clear(),
            ShutdownMode::Graceful => state.draining = true,
        }
        state.running = false;
        info!(
            target: NODE_TARGET,
            ?mode,
            flows_in_flight,
            node = %self.legal_name,
            "node stopped"
        );
        Ok(ShutdownReport {
            mode,
            flows_in_flight,
        })
    }
}

impl NodeOps for LocalNode {
    fn current_node_time(&self) -> Result<String, NodeError> {
        self.ensure_running()?;
        now_rfc3339()
    }

    fn node_info(&self) -> Result<NodeInfo, NodeError> {
        self.ensure_running()?;
        Ok(NodeInfo {
            legal_name: self.legal_name.clone(),
            platform_version: PLATFORM_VERSION,
            addresses: self.addresses.clone(),
        })
    }

    fn protocol_version(&self) -> Result<u32, NodeError> {
        self.ensure_running()?;
        Ok(PLATFORM_VERSION)
    }

    fn registered_flows(&self) -> Result<Vec<String>, NodeError> {
        self.ensure_running()?;
        let mut flows = self.registered_flows.clone();
        flows.sort();
        Ok(flows)
    }

    fn start_flow_dynamic(
        &self,
        flow_name: &str,
        arguments: Value,
    ) -> Result<FlowHandle, NodeError> {
        let mut state = self.running()?;
        if !self.registered_flows.iter().any(|name| name == flow_name) {
            return Err(NodeError::UnknownFlow {
                name: flow_name.to_owned(),
            });
        }
        if state.draining {
            return Err(NodeError::Draining {
                name: flow_name.to_owned(),
            });
        }

        let number = state.admit(flow_name, arguments, now_rfc3339)?;
        let id = flow_id(number);
        info!(target: NODE_TARGET, id = %id, flow = flow_name, "flow started");
        Ok(FlowHandle {
            id,
            flow_name: flow_name.to_owned(),
        })
    }

    fn state_machines_snapshot(&self) -> Result<Vec<FlowSummary>, NodeError> {
        let state = self.running()?;
        Ok(state
            .flows
            .iter()
            .map(|(number, record)| FlowSummary {
                id: flow_id(*number),
                flow_name: record.flow_name.clone(),
                started_at: record.started_at.clone(),
            })
            .collect())
    }

    fn kill_flow(&self, id: &str) -> Result<bool, NodeError> {
        self.remove_flow(id, false)
    }

    fn is_flows_draining_mode_enabled(&self) -> Result<bool, NodeError> {
        Ok(self.running()?.draining)
    }

    fn set_flows_draining_mode_enabled(&self, enabled: bool) -> Result<(), NodeError> {
        self.running()?.draining = enabled;
        info!(target: NODE_TARGET, enabled, "flows draining mode changed");
        Ok(())
    }

    fn clear_network_map_cache(&self) -> Result<(), NodeError> {
        let mut state = self.running()?;
        debug!(
            target: NODE_TARGET,
            entries = state.network_map_entries,
            "network map cache cleared"
        );
        state.network_map_entries = 0;
        Ok(())
    }
}

impl InternalNodeOps for LocalNode {
    fn protocol_version(&self) -> Result<u32, NodeError> {
        NodeOps::protocol_version(self)
    }

    fn dump_checkpoints(&self) -> Result<Vec<Checkpoint>, NodeError> {
        let state = self.running()?;
        Ok(state
            .flows
            .iter()
            .map(|(number, record)| Checkpoint {
                id: flow_id(*number),
                flow_name: record.flow_name.clone(),
                arguments: record.arguments.clone(),
                started_at: record.started_at.clone(),
            })
            .collect())
    }

    fn kill_flow(&self, id: &str, force: bool) -> Result<bool, NodeError> {
        self.remove_flow(id, force)
    }

    fn attachment_trust_infos(&self) -> Result<Vec<AttachmentTrustInfo>, NodeError> {
        self.ensure_running()?;
        Ok(self.attachments.clone())
    }
}

impl NodeLifecycle for LocalNode {
    fn shutdown(&self) -> Result<ShutdownReport, NodeError> {
        self.stop(ShutdownMode::Immediate)
    }

    fn graceful_shutdown(&self) -> Result<ShutdownReport, NodeError> {
        self.stop(ShutdownMode::Graceful)
    }

    fn is_running(&self) -> bool {
        self.lock().is_ok_and(|state| state.running)
    }
}
