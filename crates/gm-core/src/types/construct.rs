//! Framework constructs discovered in Go source.

use serde::{Deserialize, Serialize};

use super::location::SourceLocation;
use super::provider::Provider;

/// A named flow registered through `DefineFlow`.
///
/// # Examples
///
/// ```
/// use gm_core::{Flow, SourceLocation};
///
/// let flow = Flow::new("summarize", SourceLocation::new("main.go", 12, 5, 210));
/// assert!(flow.input_type.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    /// Name given as the first argument.
    pub name: String,

    /// Position of the defining call.
    pub location: SourceLocation,

    /// Input type of the flow function literal, if one was passed inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,

    /// Output type of the flow function literal (the non-error result).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,

    /// Text of the `//` comment block directly above the defining statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Flow {
    /// Creates a flow with no signature or description.
    #[must_use]
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            location,
            input_type: None,
            output_type: None,
            description: None,
        }
    }
}

/// A reference to a model identifier such as `googleai/gemini-1.5-pro`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// The literal model identifier.
    pub name: String,

    /// Provider inferred from the identifier.
    pub provider: Provider,

    /// Position of the referencing call.
    pub location: SourceLocation,
}

impl Model {
    /// Creates a model reference.
    #[must_use]
    pub fn new(name: impl Into<String>, provider: Provider, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            provider,
            location,
        }
    }
}
