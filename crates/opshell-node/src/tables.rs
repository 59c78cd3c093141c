//! Operation tables binding the node interfaces to the dispatcher.

use opshell_core::{
    Arguments, Operation, OperationTable, ParamType, Parameter, Signature, encode,
};
use serde_json::Value;

use crate::ops::{InternalNodeOps, NodeOps};

/// Interface name of the primary table.
pub const NODE_OPS_INTERFACE: &str = "NodeOps";

/// Interface name of the extended table.
pub const INTERNAL_NODE_OPS_INTERFACE: &str = "InternalNodeOps";

const fn string(name: &'static str) -> Parameter {
    Parameter::new(name, ParamType::String)
}

const fn boolean(name: &'static str) -> Parameter {
    Parameter::new(name, ParamType::Boolean)
}

/// Builds the table of [`NodeOps`] operations for any target implementing it.
#[must_use]
pub fn node_ops_table<T: NodeOps + ?Sized + 'static>() -> OperationTable<T> {
    OperationTable::new(NODE_OPS_INTERFACE)
        .with(Operation::new(
            Signature::nullary("currentNodeTime"),
            |node: &T, _: &Arguments| encode(&node.current_node_time()?),
        ))
        .with(Operation::new(
            Signature::nullary("nodeInfo"),
            |node: &T, _: &Arguments| encode(&node.node_info()?),
        ))
        .with(Operation::new(
            Signature::nullary("getProtocolVersion"),
            |node: &T, _: &Arguments| encode(&node.protocol_version()?),
        ))
        .with(Operation::new(
            Signature::nullary("registeredFlows"),
            |node: &T, _: &Arguments| encode(&node.registered_flows()?),
        ))
        .with(Operation::new(
            Signature::new(
                "startFlowDynamic",
                [string("flowName"), Parameter::new("arguments", ParamType::Json)],
            ),
            |node: &T, arguments: &Arguments| {
                let flow_name: String = arguments.get(0)?;
                let flow_arguments: Value = arguments.get(1)?;
                encode(&node.start_flow_dynamic(&flow_name, flow_arguments)?)
            },
        ))
        .with(Operation::new(
            Signature::nullary("stateMachinesSnapshot"),
            |node: &T, _: &Arguments| encode(&node.state_machines_snapshot()?),
        ))
        .with(Operation::new(
            Signature::new("killFlow", [string("id")]),
            |node: &T, arguments: &Arguments| {
                let id: String = arguments.get(0)?;
                encode(&node.kill_flow(&id)?)
            },
        ))
        .with(Operation::new(
            Signature::nullary("isFlowsDrainingModeEnabled"),
            |node: &T, _: &Arguments| encode(&node.is_flows_draining_mode_enabled()?),
        ))
        .with(Operation::new(
            Signature::new("setFlowsDrainingModeEnabled", [boolean("enabled")]),
            |node: &T, arguments: &Arguments| {
                let enabled: bool = arguments.get(0)?;
                encode(&node.set_flows_draining_mode_enabled(enabled)?)
            },
        ))
        .with(Operation::new(
            Signature::nullary("clearNetworkMapCache"),
            |node: &T, _: &Arguments| encode(&node.clear_network_map_cache()?),
        ))
}

/// Builds the table of [`InternalNodeOps`] operations for any target
/// implementing it.
#[must_use]
pub fn internal_node_ops_table<T: InternalNodeOps + ?Sized + 'static>() -> OperationTable<T> {
    OperationTable::new(INTERNAL_NODE_OPS_INTERFACE)
        .with(Operation::new(
            Signature::nullary("getProtocolVersion"),
            |node: &T, _: &Arguments| encode(&node.protocol_version()?),
        ))
        .with(Operation::new(
            Signature::nullary("dumpCheckpoints"),
            |node: &T, _: &Arguments| encode(&node.dump_checkpoints()?),
        ))
        .with(Operation::new(
            Signature::new("killFlow", [string("id"), boolean("force")]),
            |node: &T, arguments: &Arguments| {
                let id: String = arguments.get(0)?;
                let force: bool = arguments.get(1)?;
                encode(&node.kill_flow(&id, force)?)
            },
        ))
        .with(Operation::new(
            Signature::nullary("attachmentTrustInfos"),
            |node: &T, _: &Arguments| encode(&node.attachment_trust_infos()?),
        ))
}
