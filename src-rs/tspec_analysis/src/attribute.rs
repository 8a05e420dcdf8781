//! Checking of `with` attributes
//!
//! `errorbehavior` settings are applied in order. A repeated key keeps its
//! first setting. The first `ALL` setting discards every specific setting
//! collected before it, later specific settings are layered on top, and any
//! further `ALL` is ignored.

use std::fmt;

use indexmap::IndexMap;
use tspec_ast::{Attribute, attribute::ErrorBehaviorSettingNode, node::Node};
use tspec_shared::span::Span;

use crate::error::SemanticError;

/// Encodings the code generator knows about
pub const KNOWN_ENCODINGS: [&str; 6] = ["BER", "PER", "XER", "RAW", "TEXT", "JSON"];

macro_rules! error_types {
    ($($(#[doc = $doc:literal])* $variant:ident => $key:literal,)*) => {
        /// The error classes an encoder or decoder can report
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ErrorType {
            $($(#[doc = $doc])* $variant,)*
        }

        impl ErrorType {
            /// Every error type, in table order
            pub const ALL: &[Self] = &[$(Self::$variant,)*];

            /// Parses an error type key such as `UNBOUND`
            #[must_use]
            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Returns the key the error type is written with
            #[must_use]
            pub const fn key(self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)*
                }
            }
        }
    };
}

error_types! {
    /// Encoding an unbound value
    Unbound => "UNBOUND",
    /// Encoding an incomplete `any` type
    IncomplAny => "INCOMPL_ANY",
    /// Encoding an unknown enumeration value
    EncEnum => "ENC_ENUM",
    /// Decoding an incomplete message
    IncomplMsg => "INCOMPL_MSG",
    /// A length form the encoding does not allow
    LenForm => "LEN_FORM",
    /// Decoding an invalid message
    InvalMsg => "INVAL_MSG",
    /// A representation the encoder cannot handle
    Repr => "REPR",
    /// A value that violates a type constraint
    Constraint => "CONSTRAINT",
    /// An unexpected tag
    Tag => "TAG",
    /// Superfluous data while decoding
    Superfl => "SUPERFL",
    /// Unknown data in an extension
    Extension => "EXTENSION",
    /// Decoding an unknown enumeration value
    DecEnum => "DEC_ENUM",
    /// Decoding a field twice
    DecDupfld => "DEC_DUPFLD",
    /// Decoding a message with a mandatory field missing
    DecMissfld => "DEC_MISSFLD",
    /// Decoding an open type that cannot be resolved
    DecOpentype => "DEC_OPENTYPE",
    /// Decoding an invalid universal character string
    DecUcstr => "DEC_UCSTR",
    /// A length that does not fit the type
    LenErr => "LEN_ERR",
    /// A negative value where only unsigned ones fit
    SignErr => "SIGN_ERR",
    /// Fields of a set received in the wrong order
    IncompOrder => "INCOMP_ORDER",
    /// A token that does not match
    TokenErr => "TOKEN_ERR",
    /// A mismatch while matching the decoded message
    LogMatching => "LOG_MATCHING",
    /// A float that loses precision when encoded
    FloatTr => "FLOAT_TR",
    /// A float that is not a number
    FloatNan => "FLOAT_NAN",
    /// An omitted tag
    OmittedTag => "OMITTED_TAG",
    /// Conflicting settings for negative testing
    NegtestConfl => "NEGTEST_CONFL",
    /// Data left over after decoding
    ExtraData => "EXTRA_DATA",
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// What to do when an error of some type occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Handling {
    /// Whatever the encoding does by default
    #[default]
    Default,
    /// Fail the encoding or decoding
    Error,
    /// Log a warning and carry on
    Warning,
    /// Carry on silently
    Ignore,
}

impl Handling {
    /// Parses a handling key such as `WARNING`
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "DEFAULT" => Some(Self::Default),
            "ERROR" => Some(Self::Error),
            "WARNING" => Some(Self::Warning),
            "IGNORE" => Some(Self::Ignore),
            _ => None,
        }
    }

    /// Returns the key the handling is written with
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Ignore => "IGNORE",
        }
    }
}

/// The effective error behaviour of a definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBehaviorTable {
    all: Option<Handling>,
    specific: IndexMap<ErrorType, Handling>,
}

impl ErrorBehaviorTable {
    /// Returns the effective handling of `error_type`
    ///
    /// This is the specific setting if there is one, else the `ALL` setting,
    /// else [`Handling::Default`].
    #[must_use]
    pub fn effective(&self, error_type: ErrorType) -> Handling {
        self.specific
            .get(&error_type)
            .copied()
            .or(self.all)
            .unwrap_or_default()
    }

    /// Returns the effective handling of every error type in table order
    pub fn entries(&self) -> impl Iterator<Item = (ErrorType, Handling)> + '_ {
        ErrorType::ALL
            .iter()
            .map(|error_type| (*error_type, self.effective(*error_type)))
    }

    /// Returns whether no setting was given at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_none() && self.specific.is_empty()
    }
}

/// Checked attributes of a definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeInfo {
    encoding: Option<String>,
    variants: Vec<String>,
    error_behavior: ErrorBehaviorTable,
}

impl AttributeInfo {
    /// Returns the `encode` setting, if any
    #[must_use]
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Returns the `variant` settings in order
    #[must_use]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Returns the effective error behaviour
    #[must_use]
    pub const fn error_behavior(&self) -> &ErrorBehaviorTable {
        &self.error_behavior
    }
}

/// Checks the attributes of one definition
///
/// Every problem found here is a warning; the returned info is always
/// usable.
#[must_use]
pub fn check_attributes(attributes: &[Node<Attribute>]) -> (AttributeInfo, Vec<SemanticError>) {
    let mut warnings = vec![];
    let mut encoding: Option<&Node<String>> = None;
    let mut variants = vec![];
    let mut settings = vec![];

    for attribute in attributes {
        match &**attribute {
            Attribute::Encode(name) => {
                if let Some(first) = encoding {
                    warnings.push(SemanticError::DuplicateEncode {
                        first_span: first.span(),
                        duplicate_span: name.span(),
                    });
                    continue;
                }

                if !KNOWN_ENCODINGS.contains(&name.as_str()) {
                    warnings.push(SemanticError::UnknownEncoding {
                        encoding: name.to_string(),
                        span: name.span(),
                    });
                }
                encoding = Some(name);
            }
            Attribute::Variant(variant) => variants.push(variant.to_string()),
            Attribute::ErrorBehavior(list) => settings.extend(list),
        }
    }

    let (error_behavior, mut behavior_warnings) = build_error_behavior(&settings);
    warnings.append(&mut behavior_warnings);

    let info = AttributeInfo {
        encoding: encoding.map(|name| name.to_string()),
        variants,
        error_behavior,
    };

    (info, warnings)
}

/// Applies `errorbehavior` settings in order
#[must_use]
pub fn build_error_behavior(
    settings: &[&ErrorBehaviorSettingNode],
) -> (ErrorBehaviorTable, Vec<SemanticError>) {
    let mut warnings = vec![];
    let mut table = ErrorBehaviorTable::default();
    let mut all_span: Option<Span> = None;
    let mut specific_spans: IndexMap<ErrorType, Span> = IndexMap::new();

    for setting in settings {
        let key = setting.error_type();
        let Some(handling) = Handling::from_key(setting.handling()) else {
            warnings.push(SemanticError::UnknownHandling {
                key: setting.handling().to_string(),
                span: setting.handling().span(),
            });
            continue;
        };

        if key.as_str() == "ALL" {
            if let Some(first_span) = all_span {
                warnings.push(SemanticError::DuplicateErrorBehavior {
                    key: "ALL".to_string(),
                    first_span,
                    duplicate_span: key.span(),
                });
                continue;
            }

            if !specific_spans.is_empty() {
                let overridden = specific_spans
                    .drain(..)
                    .map(|(error_type, span)| (error_type.key().to_string(), span))
                    .collect();
                warnings.push(SemanticError::OverriddenByAll {
                    overridden,
                    span: key.span(),
                });
                table.specific.clear();
            }

            table.all = Some(handling);
            all_span = Some(key.span());
            continue;
        }

        let Some(error_type) = ErrorType::from_key(key) else {
            warnings.push(SemanticError::UnknownErrorType {
                key: key.to_string(),
                span: key.span(),
            });
            continue;
        };

        if let Some(first_span) = specific_spans.get(&error_type) {
            warnings.push(SemanticError::DuplicateErrorBehavior {
                key: error_type.key().to_string(),
                first_span: *first_span,
                duplicate_span: key.span(),
            });
            continue;
        }

        specific_spans.insert(error_type, key.span());
        table.specific.insert(error_type, handling);
    }

    (table, warnings)
}

#[cfg(test)]
mod tests {
    use tspec_ast::{Attribute, construct::attr};

    use super::*;

    fn settings(attribute: &Node<Attribute>) -> Vec<&ErrorBehaviorSettingNode> {
        match &**attribute {
            Attribute::ErrorBehavior(settings) => settings.iter().collect(),
            Attribute::Encode(_) | Attribute::Variant(_) => vec![],
        }
    }

    #[test]
    fn all_overrides_earlier_and_later_settings_layer_on_top() {
        let attribute = attr::error_behavior(&[
            ("UNBOUND", "ERROR"),
            ("ALL", "WARNING"),
            ("LEN_ERR", "IGNORE"),
        ]);

        let (table, warnings) = build_error_behavior(&settings(&attribute));

        assert_eq!(table.effective(ErrorType::Unbound), Handling::Warning);
        assert_eq!(table.effective(ErrorType::LenErr), Handling::Ignore);
        assert_eq!(table.effective(ErrorType::Tag), Handling::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            SemanticError::OverriddenByAll { overridden, .. } if overridden.len() == 1
        ));
    }

    #[test]
    fn repeated_key_keeps_the_first_setting() {
        let attribute = attr::error_behavior(&[("TAG", "IGNORE"), ("TAG", "ERROR")]);

        let (table, warnings) = build_error_behavior(&settings(&attribute));

        assert_eq!(table.effective(ErrorType::Tag), Handling::Ignore);
        assert!(matches!(
            &warnings[..],
            [SemanticError::DuplicateErrorBehavior { key, .. }] if key == "TAG"
        ));
    }

    #[test]
    fn second_all_is_ignored() {
        let attribute = attr::error_behavior(&[("ALL", "IGNORE"), ("ALL", "ERROR")]);

        let (table, warnings) = build_error_behavior(&settings(&attribute));

        assert_eq!(table.effective(ErrorType::Repr), Handling::Ignore);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn unknown_keys_are_warnings_and_unset_types_default() {
        let attribute = attr::error_behavior(&[("NO_SUCH", "ERROR"), ("TAG", "LOUDLY")]);

        let (table, warnings) = build_error_behavior(&settings(&attribute));

        assert!(table.is_empty());
        assert_eq!(table.effective(ErrorType::Tag), Handling::Default);
        assert!(matches!(
            &warnings[..],
            [
                SemanticError::UnknownErrorType { .. },
                SemanticError::UnknownHandling { .. }
            ]
        ));
        assert!(warnings.iter().all(SemanticError::is_warning));
    }

    #[test]
    fn encodings_are_validated() {
        let (info, warnings) = check_attributes(&[
            attr::encode("BER"),
            attr::encode("PER"),
            attr::error_behavior(&[("ALL", "IGNORE")]),
        ]);

        assert_eq!(info.encoding(), Some("BER"));
        assert_eq!(
            info.error_behavior().effective(ErrorType::ExtraData),
            Handling::Ignore
        );
        assert!(matches!(
            &warnings[..],
            [SemanticError::DuplicateEncode { .. }]
        ));

        let (_, warnings) = check_attributes(&[attr::encode("MORSE")]);
        assert!(matches!(
            &warnings[..],
            [SemanticError::UnknownEncoding { encoding, .. }] if encoding == "MORSE"
        ));
    }

    #[test]
    fn every_error_type_key_round_trips() {
        assert_eq!(ErrorType::ALL.len(), 26);
        for error_type in ErrorType::ALL {
            assert_eq!(ErrorType::from_key(error_type.key()), Some(*error_type));
        }
    }
}
