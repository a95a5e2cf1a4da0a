//! Error types for the layout pass

use thiserror::Error;

/// Fatal conditions raised while evaluating constraints and strategies.
///
/// Everything else the pass encounters degrades gracefully (zero boxes,
/// default scales, fallback wrapping); these variants abort the pass and
/// name the offending node.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A strategy or constraint ran against an element whose box was never
    /// resolved
    #[error("element '{id}' has no resolved bounding box")]
    Unresolved { id: String },

    /// A graph operation referenced a node id that was never added
    #[error("unknown layout node '{id}'")]
    UnknownNode { id: String },

    /// A size constraint named a reference child that does not exist in the
    /// container
    #[error("container '{container}' declares size reference '{reference}' but has no such child")]
    MissingReference {
        container: String,
        reference: String,
    },

    /// A reserved template node was reached with no content to fill it
    #[error("no content provided for reserved node '{id}'")]
    MissingContent { id: String },
}

impl LayoutError {
    pub fn unresolved(id: Option<&str>) -> Self {
        Self::Unresolved {
            id: id.unwrap_or("<anonymous>").to_string(),
        }
    }

    pub fn unknown_node(id: impl Into<String>) -> Self {
        Self::UnknownNode { id: id.into() }
    }

    pub fn missing_reference(
        container: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self::MissingReference {
            container: container.into(),
            reference: reference.into(),
        }
    }

    pub fn missing_content(id: impl Into<String>) -> Self {
        Self::MissingContent { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_display() {
        let err = LayoutError::unresolved(Some("chart"));
        assert!(err.to_string().contains("chart"));
        let err = LayoutError::unresolved(None);
        assert!(err.to_string().contains("<anonymous>"));
    }

    #[test]
    fn test_missing_reference_display() {
        let err = LayoutError::missing_reference("root", "chart");
        let msg = err.to_string();
        assert!(msg.contains("root"));
        assert!(msg.contains("chart"));
    }
}
