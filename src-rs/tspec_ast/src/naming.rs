//! Identifiers and dialects
//!
//! Both dialects share one namespace. ASN names may contain `-` where TTCN
//! names use `_`, so every identifier has a canonical (TTCN) spelling used for
//! lookups and a display spelling that follows the dialect it was written in.

use std::fmt;

use crate::node::Node;

/// The dialect a module or identifier is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dialect {
    /// The native test-specification dialect
    Ttcn,
    /// The data-description dialect
    Asn,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ttcn => write!(f, "TTCN"),
            Self::Asn => write!(f, "ASN"),
        }
    }
}

/// An identifier as written in the source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identifier {
    name: String,
    dialect: Dialect,
}

/// A node containing an identifier
pub type IdentifierNode = Node<Identifier>;

impl Identifier {
    /// Creates a new identifier
    #[must_use]
    pub const fn new(name: String, dialect: Dialect) -> Self {
        Self { name, dialect }
    }

    /// Creates a TTCN identifier
    #[must_use]
    pub fn ttcn(name: impl Into<String>) -> Self {
        Self::new(name.into(), Dialect::Ttcn)
    }

    /// Creates an ASN identifier
    #[must_use]
    pub fn asn(name: impl Into<String>) -> Self {
        Self::new(name.into(), Dialect::Asn)
    }

    /// Returns the identifier exactly as written
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Returns the dialect the identifier was written in
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the canonical spelling used for identity and lookups
    #[must_use]
    pub fn canonical(&self) -> String {
        canonicalize(&self.name)
    }

    /// Returns the spelling of this identifier in the given dialect
    #[must_use]
    pub fn display_in(&self, dialect: Dialect) -> String {
        match dialect {
            Dialect::Ttcn => self.canonical(),
            Dialect::Asn => self.name.replace('_', "-"),
        }
    }

    /// Returns whether two identifiers name the same entity
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_in(self.dialect))
    }
}

/// Maps a name from either dialect to its canonical spelling
#[must_use]
pub fn canonicalize(name: &str) -> String {
    name.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asn_names_canonicalize_to_ttcn_spelling() {
        let asn = Identifier::asn("Message-Type");
        let ttcn = Identifier::ttcn("Message_Type");

        assert_eq!(asn.canonical(), "Message_Type");
        assert!(asn.same_as(&ttcn));
        assert_ne!(asn, ttcn);
    }

    #[test]
    fn display_follows_own_dialect() {
        assert_eq!(Identifier::asn("Message_Type").to_string(), "Message-Type");
        assert_eq!(Identifier::ttcn("Message-Type").to_string(), "Message_Type");
        assert_eq!(
            Identifier::ttcn("pdu_kind").display_in(Dialect::Asn),
            "pdu-kind"
        );
    }
}
