//! Naming and type lookups shared by the emitters

use tspec_analysis::{
    AssignmentId, InternalError, ModuleId, Project, SemType, info::AssignmentInfo,
};

use crate::GeneratorConfig;

/// Words a generated identifier must not collide with
///
/// Besides the Java keywords this includes `java`, since a nested class of
/// that name would hide the `java.util` package.
const RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "java",
    "long", "native", "new", "null", "package", "private", "protected", "public", "record",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "var", "void", "volatile", "while", "yield",
];

/// Name of the parameter that carries the component a behaviour runs on
pub const COMPONENT_PARAM: &str = "_component";

/// Makes a canonical identifier usable in Java
pub fn java_identifier(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Quotes a string as a Java literal
pub fn string_literal(text: &str) -> String {
    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('"');
    for c in text.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c if c.is_control() => literal.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

/// How values of a type are represented in Java
#[derive(Debug, Clone, Copy)]
pub enum Repr<'a> {
    /// A boxed Java type such as `Long`
    Builtin(&'static str),
    /// A class or enum generated for a type definition, with its structure
    Class {
        /// The type definition
        id: AssignmentId,
        /// Its structure, with aliases followed
        structure: &'a SemType,
    },
    /// An anonymous `record of` or `set of`, held as a `java.util.List`
    List { element: &'a SemType, unordered: bool },
}

const fn builtin(ty: &SemType) -> Option<&'static str> {
    match ty {
        SemType::Boolean => Some("Boolean"),
        SemType::Integer => Some("Long"),
        SemType::Float => Some("Double"),
        SemType::Charstring | SemType::Octetstring | SemType::Bitstring => Some("String"),
        SemType::Enumerated(_)
        | SemType::Record(_)
        | SemType::Set(_)
        | SemType::Union(_)
        | SemType::RecordOf(_)
        | SemType::SetOf(_)
        | SemType::Named(_)
        | SemType::Error => None,
    }
}

/// The module being generated and what the emitters need to know about it
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    project: &'a Project,
    module: ModuleId,
    config: &'a GeneratorConfig,
}

impl<'a> Context<'a> {
    pub const fn new(project: &'a Project, module: ModuleId, config: &'a GeneratorConfig) -> Self {
        Self {
            project,
            module,
            config,
        }
    }

    pub const fn project(&self) -> &'a Project {
        self.project
    }

    pub const fn module(&self) -> ModuleId {
        self.module
    }

    pub const fn config(&self) -> &'a GeneratorConfig {
        self.config
    }

    /// Returns the name of the outer class generated for a module
    pub fn module_class(&self, module: ModuleId) -> String {
        java_identifier(&self.project.module(module).name().canonical())
    }

    /// Returns the Java name of a definition within its module class
    pub fn member_name(&self, id: AssignmentId) -> String {
        java_identifier(&self.project.definition(id).name().canonical())
    }

    /// Returns the name of a definition as seen from the current module
    pub fn qualified(&self, id: AssignmentId) -> String {
        if id.module() == self.module {
            self.member_name(id)
        } else {
            format!("{}.{}", self.module_class(id.module()), self.member_name(id))
        }
    }

    /// Returns `Module.name` as written, for messages
    pub fn display_name(&self, id: AssignmentId) -> String {
        self.project.assignment_name(id)
    }

    /// Returns the cached result of a definition
    pub fn info(&self, id: AssignmentId) -> Result<&'a AssignmentInfo, InternalError> {
        self.project
            .checked(id)
            .map(|checked| checked.info())
            .ok_or_else(|| InternalError::Unchecked(self.display_name(id)))
    }

    /// Follows type references to the Java representation of a type
    pub fn repr(&self, ty: &'a SemType) -> Result<Repr<'a>, InternalError> {
        let mut current = ty;
        loop {
            if let Some(name) = builtin(current) {
                return Ok(Repr::Builtin(name));
            }

            match current {
                SemType::Named(id) => {
                    let AssignmentInfo::Type(info) = self.info(*id)? else {
                        return Err(self.unexpected(*id, "type"));
                    };
                    match info.ty() {
                        SemType::Named(_) => current = info.ty(),
                        structure @ (SemType::Enumerated(_)
                        | SemType::Record(_)
                        | SemType::Set(_)
                        | SemType::Union(_)
                        | SemType::RecordOf(_)
                        | SemType::SetOf(_)) => {
                            return Ok(Repr::Class { id: *id, structure });
                        }
                        other @ (SemType::Boolean
                        | SemType::Integer
                        | SemType::Float
                        | SemType::Charstring
                        | SemType::Octetstring
                        | SemType::Bitstring
                        | SemType::Error) => current = other,
                    }
                }
                SemType::RecordOf(element) => {
                    return Ok(Repr::List {
                        element,
                        unordered: false,
                    });
                }
                SemType::SetOf(element) => {
                    return Ok(Repr::List {
                        element,
                        unordered: true,
                    });
                }
                SemType::Boolean
                | SemType::Integer
                | SemType::Float
                | SemType::Charstring
                | SemType::Octetstring
                | SemType::Bitstring
                | SemType::Enumerated(_)
                | SemType::Record(_)
                | SemType::Set(_)
                | SemType::Union(_)
                | SemType::Error => {
                    return Err(InternalError::MissingValue(format!(
                        "Java type of {}",
                        self.project.describe_type(current)
                    )));
                }
            }
        }
    }

    /// Returns the Java type used for values of `ty`
    pub fn java_type(&self, ty: &'a SemType) -> Result<String, InternalError> {
        Ok(match self.repr(ty)? {
            Repr::Builtin(name) => name.to_string(),
            Repr::Class { id, .. } => self.qualified(id),
            Repr::List { element, .. } => format!("java.util.List<{}>", self.java_type(element)?),
        })
    }

    /// Returns the Java type of templates matching `ty`
    pub fn template_type(&self, ty: &'a SemType) -> Result<String, InternalError> {
        Ok(format!("TspecRuntime.Template<{}>", self.java_type(ty)?))
    }

    /// Reports a reference to a definition of an unexpected kind
    pub fn unexpected(&self, id: AssignmentId, expected: &'static str) -> InternalError {
        InternalError::UnexpectedKind {
            name: self.project.module_name(self.module),
            target: self.display_name(id),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_words_are_suffixed() {
        assert_eq!(java_identifier("class"), "class_");
        assert_eq!(java_identifier("java"), "java_");
        assert_eq!(java_identifier("count"), "count");
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(string_literal("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(string_literal("\u{1}"), r#""\u0001""#);
    }
}
