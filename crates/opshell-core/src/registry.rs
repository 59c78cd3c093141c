//! Operation registry: typed signatures paired with invocation thunks.
//!
//! An [`OperationTable`] describes what one operations interface offers. Each
//! [`Operation`] carries a [`Signature`] (name plus typed parameters) and an
//! [`Invoker`] that calls the interface on a target with already-coerced
//! [`Arguments`]. Tables are generic over the target so that two unrelated
//! interfaces can be bound to the same concrete node and unioned before
//! resolution.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::catalog::OperationCatalog;
use crate::descriptor::OperationDescriptor;
use crate::errors::InvocationError;

/// Parameter types understood by the type coercer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Free text, passed through verbatim.
    String,
    /// `true` or `false`.
    Boolean,
    /// Signed 64-bit integer.
    Long,
    /// Finite floating-point number.
    Double,
    /// An arbitrary JSON document.
    Json,
}

impl ParamType {
    /// Returns the name shown in parameter descriptions.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Long => "Long",
            Self::Double => "Double",
            Self::Json => "Json",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A named, typed positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Parameter {
    name: &'static str,
    ty: ParamType,
}

impl Parameter {
    /// Creates a parameter.
    #[must_use]
    pub const fn new(name: &'static str, ty: ParamType) -> Self {
        Self { name, ty }
    }

    /// Returns the parameter name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the parameter type.
    #[must_use]
    pub const fn ty(&self) -> ParamType {
        self.ty
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// Operation name plus its ordered parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    name: String,
    parameters: Vec<Parameter>,
}

impl Signature {
    /// Creates a signature.
    pub fn new(name: impl Into<String>, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.into_iter().collect(),
        }
    }

    /// Creates a signature for an operation without parameters.
    pub fn nullary(name: impl Into<String>) -> Self {
        Self::new(name, [])
    }

    /// Returns the operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Number of positional arguments the operation expects.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Renders the parameter list as `name: Type, name: Type`.
    #[must_use]
    pub fn describe_parameters(&self) -> String {
        self.parameters
            .iter()
            .map(Parameter::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Returns the catalog descriptor for this signature.
    #[must_use]
    pub fn descriptor(&self) -> OperationDescriptor {
        OperationDescriptor::new(self.name.clone(), self.describe_parameters())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.describe_parameters())
    }
}

/// Positional argument values after coercion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<Value>,
}

impl Arguments {
    /// Deserialises the argument at `index` into `D`.
    ///
    /// # Errors
    ///
    /// Returns an internal [`InvocationError`] when the argument is missing or
    /// does not deserialise into `D`; either indicates a table whose invoker
    /// disagrees with its signature.
    pub fn get<D: DeserializeOwned>(&self, index: usize) -> Result<D, InvocationError> {
        let value = self.values.get(index).ok_or_else(|| {
            InvocationError::internal(format!("missing argument at position {index}"))
        })?;
        serde_json::from_value(value.clone()).map_err(|error| {
            InvocationError::internal(format!("argument at position {index}: {error}"))
                .with_source(error)
        })
    }

    /// Returns the raw values.
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}

/// Serialises an operation result into the value forwarded to the sink.
///
/// # Errors
///
/// Returns an internal [`InvocationError`] when serialisation fails.
pub fn encode<S: Serialize>(value: &S) -> Result<Value, InvocationError> {
    serde_json::to_value(value).map_err(|error| {
        InvocationError::internal(format!("failed to encode result: {error}")).with_source(error)
    })
}

/// Invocation thunk calling one operation on a target.
pub type Invoker<T> = Arc<dyn Fn(&T, &Arguments) -> Result<Value, InvocationError> + Send + Sync>;

/// A typed operation bound to its invocation thunk.
pub struct Operation<T: ?Sized> {
    signature: Signature,
    invoker: Invoker<T>,
}

impl<T: ?Sized> Operation<T> {
    /// Creates an operation from its signature and thunk.
    pub fn new<F>(signature: Signature, invoke: F) -> Self
    where
        F: Fn(&T, &Arguments) -> Result<Value, InvocationError> + Send + Sync + 'static,
    {
        Self {
            signature,
            invoker: Arc::new(invoke),
        }
    }

    /// Returns the signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Calls the operation on `target`.
    ///
    /// # Errors
    ///
    /// Propagates whatever the target raised.
    pub fn invoke(&self, target: &T, arguments: &Arguments) -> Result<Value, InvocationError> {
        (self.invoker)(target, arguments)
    }
}

impl<T: ?Sized> Clone for Operation<T> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            invoker: Arc::clone(&self.invoker),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Operations published by one interface (or a union of interfaces).
pub struct OperationTable<T: ?Sized> {
    interface: String,
    operations: Vec<Operation<T>>,
}

impl<T: ?Sized> OperationTable<T> {
    /// Creates an empty table for the named interface.
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            operations: Vec::new(),
        }
    }

    /// Adds an operation, builder style.
    #[must_use]
    pub fn with(mut self, operation: Operation<T>) -> Self {
        self.push(operation);
        self
    }

    /// Adds an operation.
    pub fn push(&mut self, operation: Operation<T>) {
        self.operations.push(operation);
    }

    /// Returns the interface name.
    #[must_use]
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Iterates over the operations in registration order.
    pub fn operations(&self) -> std::slice::Iter<'_, Operation<T>> {
        self.operations.iter()
    }

    /// Number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true when the table holds no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Introspects the table into a descriptor catalog.
    #[must_use]
    pub fn catalog(&self) -> OperationCatalog {
        self.operations
            .iter()
            .map(|operation| operation.signature().descriptor())
            .collect()
    }

    /// Operations registered under exactly `name`, in registration order.
    ///
    /// Yielded operations borrow the table only, so they outlive `name`.
    pub fn candidates<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Operation<T>> + use<'a, 'n, T> {
        self.operations
            .iter()
            .filter(move |operation| operation.signature().name() == name)
    }

    /// Returns true when any operation is registered under `name`.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.candidates(name).next().is_some()
    }

    /// Distinct names starting with `prefix`, ignoring ASCII case, sorted.
    #[must_use]
    pub fn names_starting_with(&self, prefix: &str) -> Vec<String> {
        let needle = prefix.to_ascii_lowercase();
        let mut names: Vec<String> = self
            .operations
            .iter()
            .map(|operation| operation.signature().name())
            .filter(|name| name.to_ascii_lowercase().starts_with(&needle))
            .map(str::to_owned)
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Returns a table holding this table's operations followed by
    /// `other`'s. No operation is dropped: overloads from either side stay
    /// available to resolution.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            interface: format!("{}+{}", self.interface, other.interface),
            operations: self
                .operations
                .iter()
                .chain(other.operations.iter())
                .cloned()
                .collect(),
        }
    }
}

impl<T: ?Sized + 'static> OperationTable<T> {
    /// Wraps every invoker so failures pass through `mapper` together with the
    /// name of the failing operation.
    #[must_use]
    pub fn map_errors<F>(self, mapper: F) -> Self
    where
        F: Fn(&str, InvocationError) -> InvocationError + Send + Sync + 'static,
    {
        let shared = Arc::new(mapper);
        let operations = self
            .operations
            .into_iter()
            .map(|operation| {
                let Operation { signature, invoker } = operation;
                let map = Arc::clone(&shared);
                let name = signature.name().to_owned();
                Operation::new(signature, move |target: &T, arguments: &Arguments| {
                    invoker(target, arguments).map_err(|error| map(&name, error))
                })
            })
            .collect();
        Self {
            interface: self.interface,
            operations,
        }
    }
}

impl<T: ?Sized> Clone for OperationTable<T> {
    fn clone(&self) -> Self {
        Self {
            interface: self.interface.clone(),
            operations: self.operations.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for OperationTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationTable")
            .field("interface", &self.interface)
            .field("operations", &self.operations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    struct Counter {
        base: i64,
    }

    fn add_operation() -> Operation<Counter> {
        Operation::new(
            Signature::new("add", [Parameter::new("amount", ParamType::Long)]),
            |counter: &Counter, arguments: &Arguments| {
                let amount: i64 = arguments.get(0)?;
                encode(&(counter.base + amount))
            },
        )
    }

    #[rstest]
    #[case::nullary(Signature::nullary("nodeInfo"), "")]
    #[case::single(
        Signature::new("killFlow", [Parameter::new("id", ParamType::String)]),
        "id: String"
    )]
    #[case::several(
        Signature::new(
            "startFlowDynamic",
            [
                Parameter::new("flowName", ParamType::String),
                Parameter::new("arguments", ParamType::Json),
            ],
        ),
        "flowName: String, arguments: Json"
    )]
    fn describes_parameters_in_declaration_order(
        #[case] signature: Signature,
        #[case] expected: &str,
    ) {
        assert_eq!(signature.describe_parameters(), expected);
        assert_eq!(signature.descriptor().parameter_types(), expected);
    }

    #[test]
    fn signature_display_includes_parameters() {
        let signature = Signature::new("add", [Parameter::new("amount", ParamType::Long)]);
        assert_eq!(signature.to_string(), "add(amount: Long)");
    }

    #[test]
    fn invokes_with_typed_arguments() {
        let operation = add_operation();
        let result = operation
            .invoke(&Counter { base: 40 }, &Arguments::from(vec![json!(2)]))
            .expect("invoke add");
        assert_eq!(result, json!(42));
    }

    #[test]
    fn missing_argument_is_internal_error() {
        let operation = add_operation();
        let error = operation
            .invoke(&Counter { base: 0 }, &Arguments::default())
            .expect_err("missing argument");
        assert!(!error.is_client_relevant());
        assert!(error.message().contains("position 0"));
    }

    #[test]
    fn union_keeps_operations_from_both_tables() {
        let primary = OperationTable::new("Primary").with(add_operation());
        let extended = OperationTable::new("Extended").with(add_operation());
        let union = primary.union(&extended);
        assert_eq!(union.interface(), "Primary+Extended");
        assert_eq!(union.candidates("add").count(), 2);
        assert_eq!(union.catalog().len(), 1);
    }

    #[test]
    fn names_starting_with_ignores_case() {
        let table = OperationTable::new("Primary")
            .with(add_operation())
            .with(Operation::new(Signature::nullary("addAll"), |_: &Counter, _| {
                Ok(Value::Null)
            }))
            .with(Operation::new(Signature::nullary("remove"), |_: &Counter, _| {
                Ok(Value::Null)
            }));
        assert_eq!(table.names_starting_with("ADD"), ["add", "addAll"]);
        assert!(table.names_starting_with("zzz").is_empty());
    }

    #[test]
    fn map_errors_sees_operation_name() {
        let table = OperationTable::new("Primary")
            .with(Operation::new(Signature::nullary("explode"), |_: &Counter, _| {
                Err(InvocationError::internal("boom"))
            }))
            .map_errors(|name, error| {
                InvocationError::client(format!("{name}: {}", error.message()))
            });
        let operation = table.candidates("explode").next().expect("operation");
        let error = operation
            .invoke(&Counter { base: 0 }, &Arguments::default())
            .expect_err("mapped error");
        assert_eq!(error.message(), "explode: boom");
        assert!(error.is_client_relevant());
    }
}
