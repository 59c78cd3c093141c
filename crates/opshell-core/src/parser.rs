//! Resolution of a token sequence into one typed invocation.

use serde_json::Value;
use tracing::debug;

use crate::coercion::{JsonTypeCoercer, TypeCoercer};
use crate::dispatch::DISPATCH_TARGET;
use crate::errors::DispatchError;
use crate::registry::{Arguments, Operation, OperationTable, Signature};

/// Resolves a command line against an operation table and invokes it.
pub trait CallParser<T: ?Sized> {
    /// Resolves `tokens` (operation name first, then positional arguments)
    /// against `table` and invokes the matching operation on `target`.
    ///
    /// # Errors
    ///
    /// Returns a resolution error when no operation matches, or
    /// [`DispatchError::Invocation`] when the target fails.
    fn resolve_and_invoke(
        &self,
        table: &OperationTable<T>,
        tokens: &[String],
        target: &T,
    ) -> Result<Value, DispatchError>;
}

/// Parser matching positional arguments by arity, then by type.
///
/// Overloads are tried in table order; the first whose arity matches and
/// whose arguments all coerce is invoked.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalCallParser<C = JsonTypeCoercer> {
    coercer: C,
}

impl<C: TypeCoercer> PositionalCallParser<C> {
    /// Creates a parser using `coercer` for argument conversion.
    pub const fn new(coercer: C) -> Self {
        Self { coercer }
    }

    /// Finds the operation `tokens` refer to and coerces its arguments.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::EmptyCommand`], `UnknownOperation`,
    /// `ArityMismatch`, or the first `InvalidArgument` encountered.
    pub fn resolve<'t, T: ?Sized>(
        &self,
        table: &'t OperationTable<T>,
        tokens: &[String],
    ) -> Result<(&'t Operation<T>, Arguments), DispatchError> {
        let Some((name, raw_arguments)) = tokens.split_first() else {
            return Err(DispatchError::EmptyCommand);
        };

        let candidates: Vec<&Operation<T>> = table.candidates(name).collect();
        if candidates.is_empty() {
            return Err(DispatchError::unknown_operation(
                name.as_str(),
                table.names_starting_with(name),
            ));
        }

        let mut first_rejection = None;
        for operation in candidates
            .iter()
            .copied()
            .filter(|operation| operation.signature().arity() == raw_arguments.len())
        {
            match self.coerce_arguments(operation.signature(), raw_arguments) {
                Ok(arguments) => return Ok((operation, arguments)),
                Err(error) => {
                    debug!(
                        target: DISPATCH_TARGET,
                        signature = %operation.signature(),
                        %error,
                        "overload rejected"
                    );
                    first_rejection.get_or_insert(error);
                }
            }
        }

        Err(first_rejection.unwrap_or_else(|| {
            DispatchError::arity_mismatch(
                name.as_str(),
                raw_arguments.len(),
                candidates.iter().map(|operation| operation.signature()),
            )
        }))
    }

    fn coerce_arguments(
        &self,
        signature: &Signature,
        raw_arguments: &[String],
    ) -> Result<Arguments, DispatchError> {
        signature
            .parameters()
            .iter()
            .zip(raw_arguments)
            .map(|(parameter, raw)| {
                self.coercer.coerce(raw, parameter.ty()).map_err(|source| {
                    DispatchError::invalid_argument(signature.name(), parameter.name(), source)
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Arguments::from)
    }
}

impl<T: ?Sized, C: TypeCoercer> CallParser<T> for PositionalCallParser<C> {
    fn resolve_and_invoke(
        &self,
        table: &OperationTable<T>,
        tokens: &[String],
        target: &T,
    ) -> Result<Value, DispatchError> {
        let (operation, arguments) = self.resolve(table, tokens)?;
        let name = operation.signature().name();
        debug!(
            target: DISPATCH_TARGET,
            signature = %operation.signature(),
            "invoking operation"
        );
        operation
            .invoke(target, &arguments)
            .map_err(|source| DispatchError::invocation(name, source))
    }
}
