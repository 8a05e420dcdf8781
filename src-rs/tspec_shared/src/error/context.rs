/// Contextual information attached to an error
///
/// Notes carry supplementary detail ("first declared here"), help carries an
/// actionable suggestion.
///
/// # Examples
///
/// ```rust
/// use tspec_shared::error::Context;
///
/// let note = Context::Note("module `Types` was first imported here".to_string());
/// let help = Context::Help("qualify the reference as `Types.foo`".to_string());
/// let contexts = vec![note, help];
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// Additional information about the error.
    Note(String),

    /// A suggestion for resolving the error.
    Help(String),
}
