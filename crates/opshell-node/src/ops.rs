//! The operations interfaces a node exposes to the shell.
//!
//! [`NodeOps`] is the public surface; [`InternalNodeOps`] carries the
//! operator-only extensions. The two traits share names
//! (`getProtocolVersion`, `killFlow`) without sharing a supertrait, so the
//! shell unions them at the operation table level instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::NodeError;

/// Identity and build information reported by `nodeInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    /// X.500 legal name of the node.
    pub legal_name: String,
    /// Platform version implemented by the node.
    pub platform_version: u32,
    /// Addresses the node listens on.
    pub addresses: Vec<String>,
}

/// Handle returned when a flow starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowHandle {
    /// Identifier used by `killFlow`.
    pub id: String,
    /// Name of the started flow.
    pub flow_name: String,
}

/// One in-flight flow as reported by `stateMachinesSnapshot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSummary {
    /// Flow identifier.
    pub id: String,
    /// Registered flow name.
    pub flow_name: String,
    /// RFC 3339 start time.
    pub started_at: String,
}

/// Serialised state of one in-flight flow as reported by `dumpCheckpoints`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Flow identifier.
    pub id: String,
    /// Registered flow name.
    pub flow_name: String,
    /// Arguments the flow was started with.
    pub arguments: Value,
    /// RFC 3339 start time.
    pub started_at: String,
}

/// Trust status of one stored attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentTrustInfo {
    /// Attachment hash.
    pub attachment_id: String,
    /// Original file name, when known.
    pub file_name: Option<String>,
    /// Party that uploaded the attachment.
    pub uploader: String,
    /// Whether the uploader is trusted.
    pub is_trusted_uploader: bool,
}

/// Public node operations.
pub trait NodeOps: Send + Sync {
    /// Current node time, RFC 3339.
    ///
    /// # Errors
    ///
    /// Fails when the node is shut down or the clock cannot be rendered.
    fn current_node_time(&self) -> Result<String, NodeError>;

    /// Node identity.
    ///
    /// # Errors
    ///
    /// Fails when the node is shut down.
    fn node_info(&self) -> Result<NodeInfo, NodeError>;

    /// Platform version spoken by the node.
    ///
    /// # Errors
    ///
    /// Fails when the node is shut down.
    fn protocol_version(&self) -> Result<u32, NodeError>;

    /// Names of the flows that can be started.
    ///
    /// # Errors
    ///
    /// Fails when the node is shut down.
    fn registered_flows(&self) -> Result<Vec<String>, NodeError>;

    /// Starts a registered flow.
    ///
    /// # Errors
    ///
    /// Fails when the flow is not registered, draining mode is enabled, or
    /// the node is shut down.
    fn start_flow_dynamic(&self, flow_name: &str, arguments: Value)
    -> Result<FlowHandle, NodeError>;

    /// Flows currently in flight.
    ///
    /// # Errors
    ///
    /// Fails when the node is shut down.
    fn state_machines_snapshot(&self) -> Result<Vec<FlowSummary>, NodeError>;

    /// Kills a flow; `false` when no such flow is in flight.
    ///
    /// # Errors
    ///
    /// Fails when the node is shut down.
    fn kill_flow(&self, id: &str) -> Result<bool, NodeError>;

    /// Whether draining mode is enabled.
    ///
    /// # Errors
    ///
    /// Fails when the node is shut down.
    fn is_flows_draining_mode_enabled(&self) -> Result<bool, NodeError>;

    /// Enables or disables draining mode.
    ///
    /// # Errors
    ///
    /// Fails when the node is shut down.
    fn set_flows_draining_mode_enabled(&self, enabled: bool) -> Result<(), NodeError>;

    /// Drops cached network map entries.
    ///
    /// # Errors
    ///
    /// Fails when the node is shut down.
    fn clear_network_map_cache(&self) -> Result<(), NodeError>;
}

/// Operator-only node operations.
pub trait InternalNodeOps: Send + Sync {
    /// Platform version spoken by the node.
    ///
    /// # Errors
    ///
    /// Fails when the node is shut down.
    fn protocol_version(&self) -> Result<u32, NodeError>;

    /// Checkpoints of every flow in flight.
    ///
    /// # Errors
    ///
    /// Fails when the node is shut down.
    fn dump_checkpoints(&self) -> Result<Vec<Checkpoint>, NodeError>;

    /// Kills a flow, optionally forcing it; `false` when no such flow is in
    /// flight.
    ///
    /// # Errors
    ///
    /// Fails when the node is shut down.
    fn kill_flow(&self, id: &str, force: bool) -> Result<bool, NodeError>;

    /// Trust status of stored attachments.
    ///
    /// # Errors
    ///
    /// Fails when the node is shut down.
    fn attachment_trust_infos(&self) -> Result<Vec<AttachmentTrustInfo>, NodeError>;
}

/// How a node was stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShutdownMode {
    /// In-flight flows were killed.
    Immediate,
    /// Draining mode was enabled before stopping.
    Graceful,
}

/// Summary of a completed shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutdownReport {
    /// How the node was stopped.
    pub mode: ShutdownMode,
    /// Flows in flight when the shutdown began.
    pub flows_in_flight: usize,
}

/// Lifecycle control handled by the shell itself rather than by dispatch.
pub trait NodeLifecycle {
    /// Stops the node, killing every in-flight flow.
    ///
    /// # Errors
    ///
    /// Fails when the node is already shut down.
    fn shutdown(&self) -> Result<ShutdownReport, NodeError>;

    /// Enables draining mode, then stops the node.
    ///
    /// # Errors
    ///
    /// Fails when the node is already shut down.
    fn graceful_shutdown(&self) -> Result<ShutdownReport, NodeError>;

    /// Returns true until the node has been stopped.
    fn is_running(&self) -> bool;
}
