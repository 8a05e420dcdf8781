//! Template matching
//!
//! The generated runtime implements the same rules, so checked `match()`
//! expressions fold to the value the generated code would compute.

use crate::eval::ConstValue;

/// A checked template whose every part is known
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    /// A specific value
    Specific(ConstValue),
    /// `?`: any value that is present
    Any,
    /// `*`: any value, present or omitted
    AnyOrOmit,
    /// An omitted field
    Omit,
    /// Field templates of a record or set in declaration order
    Fields(Vec<(String, TemplateValue)>),
    /// A template for one alternative of a union
    Union {
        /// The chosen alternative
        alternative: String,
        /// The template for its value
        template: Box<TemplateValue>,
    },
    /// Element templates; `unordered` for set of types
    List {
        /// The element templates
        elements: Vec<TemplateValue>,
        /// Whether elements may match in any order
        unordered: bool,
    },
    /// Matches a value that matches any of the templates
    ValueList(Vec<TemplateValue>),
    /// Matches a value that matches none of the templates
    Complement(Vec<TemplateValue>),
    /// Matches a value between the bounds, both included
    Range {
        /// The lower bound
        lower: ConstValue,
        /// The upper bound
        upper: ConstValue,
    },
}

/// Returns whether `value` matches `template`
///
/// An omitted value is represented by [`ConstValue::Omit`].
#[must_use]
pub fn matches(template: &TemplateValue, value: &ConstValue) -> bool {
    match template {
        TemplateValue::Any => !value.is_omit(),
        TemplateValue::AnyOrOmit => true,
        TemplateValue::Omit => value.is_omit(),
        TemplateValue::Specific(expected) => expected == value,
        TemplateValue::Fields(field_templates) => {
            let ConstValue::Record(fields) = value else {
                return false;
            };
            field_templates.len() == fields.len()
                && field_templates.iter().all(|(name, template)| {
                    fields
                        .iter()
                        .find(|(field, _)| field == name)
                        .is_some_and(|(_, value)| matches(template, value))
                })
        }
        TemplateValue::Union {
            alternative,
            template,
        } => {
            let ConstValue::Union {
                alternative: chosen,
                value,
            } = value
            else {
                return false;
            };
            alternative == chosen && matches(template, value)
        }
        TemplateValue::List {
            elements,
            unordered,
        } => {
            let (ConstValue::List(values) | ConstValue::SetOf(values)) = value else {
                return false;
            };
            if *unordered {
                matches_unordered(elements, values)
            } else {
                elements.len() == values.len()
                    && elements
                        .iter()
                        .zip(values)
                        .all(|(template, value)| matches(template, value))
            }
        }
        TemplateValue::ValueList(templates) => {
            templates.iter().any(|template| matches(template, value))
        }
        TemplateValue::Complement(templates) => {
            !value.is_omit() && !templates.iter().any(|template| matches(template, value))
        }
        TemplateValue::Range { lower, upper } => {
            lower.ordering(value).is_some_and(|ordering| ordering.is_le())
                && value.ordering(upper).is_some_and(|ordering| ordering.is_le())
        }
    }
}

/// Set of matching: equal cardinality, and every pattern element finds at
/// least one value element it matches
///
/// Two pattern elements may be satisfied by the same value element.
fn matches_unordered(patterns: &[TemplateValue], values: &[ConstValue]) -> bool {
    patterns.len() == values.len()
        && patterns
            .iter()
            .all(|pattern| values.iter().any(|value| matches(pattern, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i64) -> ConstValue {
        ConstValue::Integer(value)
    }

    fn set_of(elements: Vec<TemplateValue>) -> TemplateValue {
        TemplateValue::List {
            elements,
            unordered: true,
        }
    }

    #[test]
    fn wildcards_and_omit() {
        assert!(matches(&TemplateValue::Any, &int(1)));
        assert!(!matches(&TemplateValue::Any, &ConstValue::Omit));
        assert!(matches(&TemplateValue::AnyOrOmit, &ConstValue::Omit));
        assert!(matches(&TemplateValue::AnyOrOmit, &int(1)));
        assert!(matches(&TemplateValue::Omit, &ConstValue::Omit));
        assert!(!matches(&TemplateValue::Omit, &int(1)));
    }

    #[test]
    fn set_of_is_unordered() {
        let template = set_of(vec![TemplateValue::Any, TemplateValue::Specific(int(1))]);

        assert!(matches(&template, &ConstValue::List(vec![int(1), int(2)])));
        assert!(matches(&template, &ConstValue::List(vec![int(2), int(1)])));
        assert!(!matches(&template, &ConstValue::List(vec![int(2), int(3)])));
    }

    #[test]
    fn set_of_omit_element_matches_no_present_value() {
        let template = set_of(vec![TemplateValue::Omit]);

        assert!(!matches(&template, &ConstValue::List(vec![int(1)])));
        assert!(!matches(&template, &ConstValue::List(vec![])));
    }

    #[test]
    fn cardinality_mismatch_never_matches() {
        let template = set_of(vec![TemplateValue::Any, TemplateValue::Any]);
        assert!(!matches(&template, &ConstValue::List(vec![int(1)])));
        assert!(!matches(
            &template,
            &ConstValue::List(vec![int(1), int(2), int(3)])
        ));

        let record_of = TemplateValue::List {
            elements: vec![TemplateValue::Any],
            unordered: false,
        };
        assert!(!matches(&record_of, &ConstValue::List(vec![])));
    }

    #[test]
    fn set_of_elements_need_not_be_a_bijection() {
        let template = set_of(vec![
            TemplateValue::Specific(int(1)),
            TemplateValue::Specific(int(1)),
        ]);

        assert!(matches(&template, &ConstValue::List(vec![int(1), int(2)])));
    }

    #[test]
    fn record_of_is_positional() {
        let template = TemplateValue::List {
            elements: vec![TemplateValue::Specific(int(1)), TemplateValue::Any],
            unordered: false,
        };

        assert!(matches(&template, &ConstValue::List(vec![int(1), int(2)])));
        assert!(!matches(&template, &ConstValue::List(vec![int(2), int(1)])));
    }

    #[test]
    fn value_lists_complements_and_ranges() {
        let small = TemplateValue::Range {
            lower: int(0),
            upper: int(9),
        };
        assert!(matches(&small, &int(0)));
        assert!(matches(&small, &int(9)));
        assert!(!matches(&small, &int(10)));

        let not_small = TemplateValue::Complement(vec![small.clone()]);
        assert!(matches(&not_small, &int(10)));
        assert!(!matches(&not_small, &ConstValue::Omit));

        let either = TemplateValue::ValueList(vec![
            TemplateValue::Specific(int(42)),
            TemplateValue::Omit,
        ]);
        assert!(matches(&either, &ConstValue::Omit));
        assert!(matches(&either, &int(42)));
        assert!(!matches(&either, &int(1)));
    }

    #[test]
    fn field_templates_match_by_name() {
        let template = TemplateValue::Fields(vec![
            ("id".to_string(), TemplateValue::Any),
            ("payload".to_string(), TemplateValue::AnyOrOmit),
        ]);

        let with_payload = ConstValue::Record(vec![
            ("id".to_string(), int(1)),
            ("payload".to_string(), ConstValue::Charstring("x".to_string())),
        ]);
        let without_id = ConstValue::Record(vec![
            ("id".to_string(), ConstValue::Omit),
            ("payload".to_string(), ConstValue::Omit),
        ]);

        assert!(matches(&template, &with_payload));
        assert!(!matches(&template, &without_id));
    }
}
