//! Results cached for checked definitions

use indexmap::IndexMap;
use tspec_ast::{BehaviourKind, LocalKind};

use crate::{
    attribute::AttributeInfo, body::Stmt, diagnostics::Diagnostic, eval::ConstValue,
    ids::AssignmentId, matching::TemplateValue, timestamp::CompilationTimestamp,
    types::SemType,
};

/// Where a definition is in its check lifecycle
#[derive(Debug, Clone, Default)]
pub enum CheckState {
    /// Not checked since it was added or replaced
    #[default]
    Unchecked,
    /// On the reference chain of the running pass
    ///
    /// The previous result is kept so a cancelled pass can restore it.
    Checking {
        /// The result before this pass started, if any
        previous: Option<Box<CheckedAssignment>>,
    },
    /// Checked; the result is cached
    Checked(Box<CheckedAssignment>),
}

impl CheckState {
    /// Returns the cached result, if the definition has been checked
    #[must_use]
    pub fn checked(&self) -> Option<&CheckedAssignment> {
        match self {
            Self::Checked(checked) => Some(checked),
            Self::Unchecked | Self::Checking { .. } => None,
        }
    }

    /// Returns whether the definition is on the reference chain of a running pass
    #[must_use]
    pub const fn is_checking(&self) -> bool {
        matches!(self, Self::Checking { .. })
    }
}

/// The cached result of checking one definition
#[derive(Debug, Clone)]
pub struct CheckedAssignment {
    pub(crate) timestamp: CompilationTimestamp,
    pub(crate) info: AssignmentInfo,
    pub(crate) dependencies: IndexMap<AssignmentId, CompilationTimestamp>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl CheckedAssignment {
    /// Returns the timestamp of the pass that produced this result
    #[must_use]
    pub const fn timestamp(&self) -> CompilationTimestamp {
        self.timestamp
    }

    /// Returns the kind specific result
    #[must_use]
    pub const fn info(&self) -> &AssignmentInfo {
        &self.info
    }

    /// Returns every definition this one referred to, with the timestamp
    /// its result carried when this one was checked
    #[must_use]
    pub const fn dependencies(&self) -> &IndexMap<AssignmentId, CompilationTimestamp> {
        &self.dependencies
    }

    /// Returns the diagnostics raised by the check
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns whether the check recorded an error
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Kind specific results
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentInfo {
    /// A type definition
    Type(TypeInfo),
    /// A constant
    Constant {
        /// The declared type
        ty: SemType,
        /// The folded value, if folding succeeded
        value: Option<ConstValue>,
    },
    /// A template
    Template {
        /// The declared type
        ty: SemType,
        /// The checked template, if every part is known
        template: Option<TemplateValue>,
    },
    /// A function, testcase or altstep
    Behaviour(BehaviourInfo),
    /// A component
    Component(ComponentInfo),
}

impl AssignmentInfo {
    /// Returns a short description of the kind of definition
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Type(_) => "a type",
            Self::Constant { .. } => "a constant",
            Self::Template { .. } => "a template",
            Self::Behaviour(info) => match info.kind {
                BehaviourKind::Function => "a function",
                BehaviourKind::Testcase => "a testcase",
                BehaviourKind::Altstep => "an altstep",
            },
            Self::Component(_) => "a component",
        }
    }
}

/// A checked type definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub(crate) ty: SemType,
    pub(crate) attributes: AttributeInfo,
}

impl TypeInfo {
    /// Returns the defined type; an alias is [`SemType::Named`]
    #[must_use]
    pub const fn ty(&self) -> &SemType {
        &self.ty
    }

    /// Returns the checked `with` attributes
    #[must_use]
    pub const fn attributes(&self) -> &AttributeInfo {
        &self.attributes
    }
}

/// The externally visible shape of a behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub(crate) params: Vec<(String, SemType)>,
    pub(crate) return_type: Option<SemType>,
    pub(crate) runs_on: Option<AssignmentId>,
}

impl Signature {
    /// Returns the parameters in declaration order
    #[must_use]
    pub fn params(&self) -> &[(String, SemType)] {
        &self.params
    }

    /// Returns the return type, if the behaviour declares one
    #[must_use]
    pub const fn return_type(&self) -> Option<&SemType> {
        self.return_type.as_ref()
    }

    /// Returns the component the behaviour runs on, if any
    #[must_use]
    pub const fn runs_on(&self) -> Option<AssignmentId> {
        self.runs_on
    }
}

/// A checked function, testcase or altstep
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviourInfo {
    pub(crate) kind: BehaviourKind,
    pub(crate) signature: Signature,
    pub(crate) body: Vec<Stmt>,
}

impl BehaviourInfo {
    /// Returns whether this is a function, testcase or altstep
    #[must_use]
    pub const fn kind(&self) -> BehaviourKind {
        self.kind
    }

    /// Returns the signature
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Returns the checked body
    #[must_use]
    pub fn body(&self) -> &[Stmt] {
        &self.body
    }
}

/// A checked component member
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInfo {
    pub(crate) name: String,
    pub(crate) kind: LocalKind,
    pub(crate) ty: SemType,
    pub(crate) initial: Option<ConstValue>,
}

impl MemberInfo {
    /// Returns the member name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the member is a variable, constant or timer
    #[must_use]
    pub const fn kind(&self) -> LocalKind {
        self.kind
    }

    /// Returns the member type
    #[must_use]
    pub const fn ty(&self) -> &SemType {
        &self.ty
    }

    /// Returns the initial value, if there is one
    #[must_use]
    pub const fn initial(&self) -> Option<&ConstValue> {
        self.initial.as_ref()
    }
}

/// A checked component definition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentInfo {
    pub(crate) members: Vec<MemberInfo>,
}

impl ComponentInfo {
    /// Returns the members in declaration order
    #[must_use]
    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    /// Finds a member by name
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&MemberInfo> {
        self.members.iter().find(|member| member.name == name)
    }
}
