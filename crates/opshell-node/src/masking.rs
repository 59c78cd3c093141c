//! Hides internal failure details from the operator.
//!
//! Every failure is logged in full before it leaves the node. Failures that
//! are not client relevant are then replaced by a generic internal error.

use opshell_core::{InvocationError, OperationTable};
use tracing::warn;

use crate::NODE_TARGET;

/// Message shown in place of an internal failure.
pub const MASKED_MESSAGE: &str = "something went wrong within the node";

/// Returns the replacement for `error` as seen by the operator.
#[must_use]
pub fn mask(operation: &str, error: InvocationError) -> InvocationError {
    warn!(
        target: NODE_TARGET,
        operation,
        client_relevant = error.is_client_relevant(),
        error = ?error,
        "operation failed"
    );
    if error.is_client_relevant() {
        error
    } else {
        InvocationError::internal(MASKED_MESSAGE)
    }
}

/// Wraps every operation of `table` with [`mask`].
#[must_use]
pub fn mask_internal_errors<T: ?Sized + 'static>(table: OperationTable<T>) -> OperationTable<T> {
    table.map_errors(mask)
}
