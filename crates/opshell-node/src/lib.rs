//! The node side of the operations shell.
//!
//! Declares the two operations interfaces a node exposes ([`NodeOps`] and
//! [`InternalNodeOps`]), the operation tables that bind them to the
//! dispatcher, an in-process [`LocalNode`] implementing both, and error
//! masking applied before failures reach the operator.

mod errors;
mod local;
mod masking;
mod ops;
mod tables;

#[cfg(test)]
mod tests;

use opshell_core::Dispatcher;

pub use errors::NodeError;
pub use local::{LocalNode, PLATFORM_VERSION};
pub use masking::{MASKED_MESSAGE, mask, mask_internal_errors};
pub use ops::{
    AttachmentTrustInfo, Checkpoint, FlowHandle, FlowSummary, InternalNodeOps, NodeInfo,
    NodeLifecycle, NodeOps, ShutdownMode, ShutdownReport,
};
pub use tables::{
    INTERNAL_NODE_OPS_INTERFACE, NODE_OPS_INTERFACE, internal_node_ops_table, node_ops_table,
};

/// Tracing target for node operations.
pub const NODE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::node");

/// Builds a dispatcher over both masked tables for targets implementing
/// both interfaces.
#[must_use]
pub fn node_dispatcher<T>() -> Dispatcher<T>
where
    T: NodeOps + InternalNodeOps + ?Sized + 'static,
{
    Dispatcher::new(
        mask_internal_errors(node_ops_table::<T>()),
        mask_internal_errors(internal_node_ops_table::<T>()),
    )
}
