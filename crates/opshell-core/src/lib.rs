//! Textual command dispatch for node operations interfaces.
//!
//! An operator types a space-delimited command line; this crate turns it into
//! a single typed invocation against an operations target and forwards the
//! result (or the failure) to an output sink. Operations are published by
//! independent interfaces, each described by an [`OperationTable`]. The tables
//! share no common supertype, so they are merged structurally:
//!
//! - **Help**: with no tokens, the [`Dispatcher`] merges the catalogs of the
//!   primary and extended tables, hides the operations named by the
//!   [`HelpPolicy`] denylist, appends the shell-native [`StaticEntry`] rows,
//!   and emits the listing row by row.
//! - **Invocation**: with tokens, the dispatcher binds a [`CallParser`] to the
//!   union of both tables (the denylist does not apply) and performs exactly
//!   one resolution and invocation.
//!
//! # Example
//!
//! ```ignore
//! use opshell_core::{CollectedOutput, Dispatcher};
//!
//! let dispatcher = Dispatcher::new(primary_table, extended_table);
//! let mut output = CollectedOutput::default();
//! dispatcher.dispatch(&["fooBar".to_owned(), "hello".to_owned()], &node, &mut output)?;
//! ```

mod catalog;
mod coercion;
mod descriptor;
mod dispatch;
mod errors;
mod listing;
mod parser;
mod registry;
mod sink;

pub use catalog::OperationCatalog;
pub use coercion::{CoercionError, JsonTypeCoercer, TypeCoercer};
pub use descriptor::{DisplayedRow, OperationDescriptor, StaticEntry};
pub use dispatch::{DISPATCH_TARGET, DispatchOutcome, Dispatcher, NO_ARGUMENTS};
pub use errors::{DispatchError, InvocationError};
pub use listing::{
    DEFAULT_HIDDEN_OPERATIONS, Denylist, FilteredListing, HelpPolicy, MergedListing, augment,
    augment_with, filter, merge, merge_all,
};
pub use parser::{CallParser, PositionalCallParser};
pub use registry::{
    Arguments, Invoker, Operation, OperationTable, ParamType, Parameter, Signature, encode,
};
pub use sink::{CollectedOutput, OutputSink};

#[cfg(test)]
mod tests;
