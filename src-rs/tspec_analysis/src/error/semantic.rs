//! Errors in the meaning of definitions

use std::fmt;

use tspec_shared::{AsTspecError, Context, ErrorLocation, Severity, span::Span};

/// Errors in the meaning of an otherwise resolvable definition
///
/// A few of these are warnings; see [`SemanticError::severity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// Two definitions of a module share a name
    DuplicateDefinition {
        /// The shared name
        name: String,
        /// The span of the first definition's name
        first_span: Span,
        /// The span of the later definition's name
        duplicate_span: Span,
    },
    /// A field is declared or given twice
    DuplicateField {
        /// The field name
        name: String,
        /// The span of the first occurrence
        first_span: Span,
        /// The span of the repeated occurrence
        duplicate_span: Span,
    },
    /// An enumeration declares an item twice
    DuplicateEnumItem {
        /// The item name
        name: String,
        /// The span of the first declaration
        first_span: Span,
        /// The span of the repeated declaration
        duplicate_span: Span,
    },
    /// Two enumeration items share a number
    DuplicateEnumNumber {
        /// The shared number
        number: i64,
        /// The span of the item that has the number first
        first_span: Span,
        /// The span of the later item
        duplicate_span: Span,
    },
    /// An enumerated, record, set or union type written inside another type
    NestedStructuredType {
        /// The kind of the nested type, such as "record"
        kind: &'static str,
        /// The span of the nested type
        span: Span,
    },
    /// A union alternative marked optional
    OptionalAlternative {
        /// The alternative
        name: String,
        /// The span of the alternative
        span: Span,
    },
    /// A definition takes part in its own resolution
    CircularReference {
        /// The definitions on the cycle, starting and ending with the same one
        cycle: Vec<String>,
        /// The span of the reference that closes the cycle
        span: Span,
    },
    /// A value of the wrong type
    TypeMismatch {
        /// The required type
        expected: String,
        /// The type of the value given
        found: String,
        /// The span of the value
        span: Span,
    },
    /// A field that the type does not declare
    UnknownField {
        /// The field name
        field: String,
        /// The record, set or union type
        ty: String,
        /// The span of the field name
        span: Span,
    },
    /// A mandatory field that is not given
    MissingField {
        /// The field name
        field: String,
        /// The record or set type
        ty: String,
        /// The span of the incomplete value
        span: Span,
    },
    /// A union value with zero or several alternatives
    UnionNeedsOneAlternative {
        /// The union type
        ty: String,
        /// The span of the value
        span: Span,
    },
    /// A value list with the wrong number of elements for its type
    WrongElementCount {
        /// The number of fields of the type
        expected: usize,
        /// The number of elements given
        found: usize,
        /// The span of the value list
        span: Span,
    },
    /// `omit` or `*` where the value cannot be omitted
    OmitNotAllowed {
        /// The mechanism as written
        mechanism: &'static str,
        /// The span of the mechanism
        span: Span,
    },
    /// A matching mechanism that does not fit the type
    InvalidMatchingMechanism {
        /// The mechanism, such as "a range"
        mechanism: &'static str,
        /// The type being matched
        ty: String,
        /// The span of the template
        span: Span,
    },
    /// A range whose lower bound is greater than its upper bound
    InvalidRange {
        /// The span of the range
        span: Span,
    },
    /// A literal that does not parse
    InvalidLiteral {
        /// The kind of literal, such as "bitstring"
        kind: &'static str,
        /// The literal as written
        literal: String,
        /// The span of the literal
        span: Span,
    },
    /// An operator applied to values it does not accept
    InvalidOperands {
        /// The operator as written
        op: &'static str,
        /// The type of the operands
        ty: String,
        /// The span of the operation
        span: Span,
    },
    /// A value whose type follows neither from context nor from itself
    CannotInferType {
        /// The span of the value
        span: Span,
    },
    /// A value that must be known while checking but is not
    NotConstant {
        /// The span of the value
        span: Span,
    },
    /// Constant folding divided by zero
    DivisionByZero {
        /// The span of the division
        span: Span,
    },
    /// Constant folding left the integer range
    IntegerOverflow {
        /// The span of the operation
        span: Span,
    },
    /// A testcase or altstep declaring a return type
    ReturnTypeNotAllowed {
        /// The keyword of the behaviour
        keyword: &'static str,
        /// The span of the return type
        span: Span,
    },
    /// A bare `return` in a function that has a return type
    MissingReturnValue {
        /// The span of the return statement
        span: Span,
    },
    /// A `return` with a value in a behaviour without a return type
    UnexpectedReturnValue {
        /// The span of the returned value
        span: Span,
    },
    /// An assignment to something other than a variable
    NotAssignable {
        /// The assigned name
        name: String,
        /// The span of the name
        span: Span,
    },
    /// A call with the wrong number of arguments
    WrongArgumentCount {
        /// The called function
        function: String,
        /// The number of parameters
        expected: usize,
        /// The number of arguments given
        found: usize,
        /// The span of the call
        span: Span,
    },
    /// A call used as a value to a function without a return type
    NoReturnValue {
        /// The called function
        function: String,
        /// The span of the call
        span: Span,
    },
    /// A function running on a component called from elsewhere
    RunsOnMismatch {
        /// The called function
        function: String,
        /// The component the function runs on
        component: String,
        /// The span of the call
        span: Span,
    },
    /// Only types and values may be defined in an ASN module
    NotAllowedInAsn {
        /// The keyword of the definition
        keyword: &'static str,
        /// The span of the definition's name
        span: Span,
    },
    /// An `encode` attribute naming an encoding nobody implements
    UnknownEncoding {
        /// The encoding as written
        encoding: String,
        /// The span of the attribute
        span: Span,
    },
    /// A second `encode` attribute, which is ignored
    DuplicateEncode {
        /// The span of the setting in use
        first_span: Span,
        /// The span of the ignored setting
        duplicate_span: Span,
    },
    /// An `errorbehavior` setting with an unknown error type
    UnknownErrorType {
        /// The key as written
        key: String,
        /// The span of the key
        span: Span,
    },
    /// An `errorbehavior` setting with an unknown handling
    UnknownHandling {
        /// The handling as written
        key: String,
        /// The span of the handling
        span: Span,
    },
    /// A second `errorbehavior` setting for the same key, which is ignored
    DuplicateErrorBehavior {
        /// The error type key
        key: String,
        /// The span of the setting in use
        first_span: Span,
        /// The span of the ignored setting
        duplicate_span: Span,
    },
    /// An `ALL` setting replaced specific settings given before it
    OverriddenByAll {
        /// The replaced keys and the spans of their settings
        overridden: Vec<(String, Span)>,
        /// The span of the `ALL` setting
        span: Span,
    },
}

impl SemanticError {
    /// Returns the span the error is reported at
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::DuplicateDefinition { duplicate_span, .. }
            | Self::DuplicateField { duplicate_span, .. }
            | Self::DuplicateEnumItem { duplicate_span, .. }
            | Self::DuplicateEnumNumber { duplicate_span, .. }
            | Self::DuplicateEncode { duplicate_span, .. }
            | Self::DuplicateErrorBehavior { duplicate_span, .. } => *duplicate_span,
            Self::NestedStructuredType { span, .. }
            | Self::OptionalAlternative { span, .. }
            | Self::CircularReference { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::UnknownField { span, .. }
            | Self::MissingField { span, .. }
            | Self::UnionNeedsOneAlternative { span, .. }
            | Self::WrongElementCount { span, .. }
            | Self::OmitNotAllowed { span, .. }
            | Self::InvalidMatchingMechanism { span, .. }
            | Self::InvalidRange { span }
            | Self::InvalidLiteral { span, .. }
            | Self::InvalidOperands { span, .. }
            | Self::CannotInferType { span }
            | Self::NotConstant { span }
            | Self::DivisionByZero { span }
            | Self::IntegerOverflow { span }
            | Self::ReturnTypeNotAllowed { span, .. }
            | Self::MissingReturnValue { span }
            | Self::UnexpectedReturnValue { span }
            | Self::NotAssignable { span, .. }
            | Self::WrongArgumentCount { span, .. }
            | Self::NoReturnValue { span, .. }
            | Self::RunsOnMismatch { span, .. }
            | Self::NotAllowedInAsn { span, .. }
            | Self::UnknownEncoding { span, .. }
            | Self::UnknownErrorType { span, .. }
            | Self::UnknownHandling { span, .. }
            | Self::OverriddenByAll { span, .. } => *span,
        }
    }

    /// Returns whether the error is only a warning
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::UnknownEncoding { .. }
                | Self::DuplicateEncode { .. }
                | Self::UnknownErrorType { .. }
                | Self::UnknownHandling { .. }
                | Self::DuplicateErrorBehavior { .. }
                | Self::OverriddenByAll { .. }
        )
    }

    fn first_span(&self) -> Option<(Span, &'static str)> {
        match self {
            Self::DuplicateDefinition { first_span, .. }
            | Self::DuplicateField { first_span, .. }
            | Self::DuplicateEnumItem { first_span, .. }
            | Self::DuplicateEnumNumber { first_span, .. } => {
                Some((*first_span, "first declared here"))
            }
            Self::DuplicateEncode { first_span, .. }
            | Self::DuplicateErrorBehavior { first_span, .. } => {
                Some((*first_span, "this setting is used"))
            }
            Self::NestedStructuredType { .. }
            | Self::OptionalAlternative { .. }
            | Self::CircularReference { .. }
            | Self::TypeMismatch { .. }
            | Self::UnknownField { .. }
            | Self::MissingField { .. }
            | Self::UnionNeedsOneAlternative { .. }
            | Self::WrongElementCount { .. }
            | Self::OmitNotAllowed { .. }
            | Self::InvalidMatchingMechanism { .. }
            | Self::InvalidRange { .. }
            | Self::InvalidLiteral { .. }
            | Self::InvalidOperands { .. }
            | Self::CannotInferType { .. }
            | Self::NotConstant { .. }
            | Self::DivisionByZero { .. }
            | Self::IntegerOverflow { .. }
            | Self::ReturnTypeNotAllowed { .. }
            | Self::MissingReturnValue { .. }
            | Self::UnexpectedReturnValue { .. }
            | Self::NotAssignable { .. }
            | Self::WrongArgumentCount { .. }
            | Self::NoReturnValue { .. }
            | Self::RunsOnMismatch { .. }
            | Self::NotAllowedInAsn { .. }
            | Self::UnknownEncoding { .. }
            | Self::UnknownErrorType { .. }
            | Self::UnknownHandling { .. }
            | Self::OverriddenByAll { .. } => None,
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateDefinition { name, .. } => {
                write!(f, "`{name}` is defined more than once")
            }
            Self::DuplicateField { name, .. } => {
                write!(f, "field `{name}` is given more than once")
            }
            Self::DuplicateEnumItem { name, .. } => {
                write!(f, "enumeration item `{name}` is declared more than once")
            }
            Self::DuplicateEnumNumber { number, .. } => {
                write!(f, "enumeration number {number} is used more than once")
            }
            Self::NestedStructuredType { kind, .. } => {
                write!(f, "{kind} types must be declared as their own type definition")
            }
            Self::OptionalAlternative { name, .. } => {
                write!(f, "union alternative `{name}` cannot be optional")
            }
            Self::CircularReference { cycle, .. } => {
                write!(f, "circular reference - {}", cycle.join(" -> "))
            }
            Self::TypeMismatch {
                expected, found, ..
            } => write!(f, "expected a value of type `{expected}`, found `{found}`"),
            Self::UnknownField { field, ty, .. } => {
                write!(f, "type `{ty}` has no field named `{field}`")
            }
            Self::MissingField { field, ty, .. } => {
                write!(f, "field `{field}` of type `{ty}` is not given")
            }
            Self::UnionNeedsOneAlternative { ty, .. } => {
                write!(f, "a value of union type `{ty}` must choose exactly one alternative")
            }
            Self::WrongElementCount {
                expected, found, ..
            } => write!(f, "expected {expected} elements, found {found}"),
            Self::OmitNotAllowed { mechanism, .. } => {
                write!(f, "{mechanism} is only allowed for optional fields")
            }
            Self::InvalidMatchingMechanism { mechanism, ty, .. } => {
                write!(f, "{mechanism} cannot be used with type `{ty}`")
            }
            Self::InvalidRange { .. } => {
                write!(f, "the lower bound of the range is greater than the upper bound")
            }
            Self::InvalidLiteral { kind, literal, .. } => {
                write!(f, "`{literal}` is not a valid {kind} literal")
            }
            Self::InvalidOperands { op, ty, .. } => {
                write!(f, "operator `{op}` cannot be applied to values of type `{ty}`")
            }
            Self::CannotInferType { .. } => {
                write!(f, "the type of this value cannot be determined")
            }
            Self::NotConstant { .. } => write!(f, "expected a constant value"),
            Self::DivisionByZero { .. } => write!(f, "division by zero"),
            Self::IntegerOverflow { .. } => write!(f, "integer overflow"),
            Self::ReturnTypeNotAllowed { keyword, .. } => {
                write!(f, "a {keyword} cannot declare a return type")
            }
            Self::MissingReturnValue { .. } => write!(f, "expected a return value"),
            Self::UnexpectedReturnValue { .. } => {
                write!(f, "this definition does not return a value")
            }
            Self::NotAssignable { name, .. } => {
                write!(f, "`{name}` is not a variable and cannot be assigned")
            }
            Self::WrongArgumentCount {
                function,
                expected,
                found,
                ..
            } => write!(
                f,
                "`{function}` takes {expected} arguments but {found} were given"
            ),
            Self::NoReturnValue { function, .. } => {
                write!(f, "`{function}` does not return a value")
            }
            Self::RunsOnMismatch {
                function,
                component,
                ..
            } => write!(
                f,
                "`{function}` runs on `{component}` and can only be called from behaviours on that component"
            ),
            Self::NotAllowedInAsn { keyword, .. } => {
                write!(f, "{keyword} definitions are not allowed in ASN modules")
            }
            Self::UnknownEncoding { encoding, .. } => {
                write!(f, "unknown encoding `{encoding}`")
            }
            Self::DuplicateEncode { .. } => write!(f, "encoding is given more than once"),
            Self::UnknownErrorType { key, .. } => write!(f, "unknown error type `{key}`"),
            Self::UnknownHandling { key, .. } => {
                write!(f, "unknown error handling `{key}`")
            }
            Self::DuplicateErrorBehavior { key, .. } => {
                write!(f, "duplicate error behaviour setting for `{key}` is ignored")
            }
            Self::OverriddenByAll { overridden, .. } => {
                let keys = overridden
                    .iter()
                    .map(|(key, _)| key.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "`ALL` overrides the earlier settings for {keys}")
            }
        }
    }
}

impl AsTspecError for SemanticError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn severity(&self) -> Severity {
        if self.is_warning() {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    fn error_location(&self, source: &str) -> Option<ErrorLocation> {
        Some(ErrorLocation::from_source_and_span(source, self.span()))
    }

    fn context(&self) -> Vec<Context> {
        if matches!(self, Self::NestedStructuredType { .. }) {
            vec![Context::Help(
                "declare the type with `type` and refer to it by name".to_string(),
            )]
        } else if matches!(self, Self::UnknownHandling { .. }) {
            vec![Context::Note(
                "valid handlings are DEFAULT, ERROR, WARNING and IGNORE".to_string(),
            )]
        } else {
            vec![]
        }
    }

    fn context_with_source(&self, source: &str) -> Vec<(Context, Option<ErrorLocation>)> {
        if let Self::OverriddenByAll { overridden, .. } = self {
            return overridden
                .iter()
                .map(|(key, span)| {
                    (
                        Context::Note(format!("setting for `{key}` given here")),
                        Some(ErrorLocation::from_source_and_span(source, *span)),
                    )
                })
                .collect();
        }

        self.first_span()
            .map(|(span, note)| {
                (
                    Context::Note(note.to_string()),
                    Some(ErrorLocation::from_source_and_span(source, span)),
                )
            })
            .into_iter()
            .collect()
    }
}
