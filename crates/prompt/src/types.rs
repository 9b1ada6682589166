//! Prompt types for the proofreader.

use serde::{Deserialize, Serialize};

/// What the model is asked to produce for each chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProofreadMode {
    /// A list of flagged sentences with their corrections
    Report,
    /// The chunk itself with corrections applied in place
    InlineEdit,
}

impl ProofreadMode {
    /// Sampling temperature used for this mode.
    pub fn temperature(&self) -> f32 {
        match self {
            Self::Report => 0.2,
            Self::InlineEdit => 0.1,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::InlineEdit => "inline-edit",
        }
    }
}

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier (e.g. "proofread.report.system")
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Template string with Handlebars syntax
    pub template: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: proofread.report.system
title: Technical editor
apiVersion: "1.0"
createdBy: test
template: "You are a meticulous technical editor."
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "proofread.report.system");
        assert_eq!(def.api_version, "1.0");
        assert_eq!(def.template, "You are a meticulous technical editor.");
    }

    #[test]
    fn test_mode_temperatures() {
        assert_eq!(ProofreadMode::Report.temperature(), 0.2);
        assert_eq!(ProofreadMode::InlineEdit.temperature(), 0.1);
        assert_eq!(ProofreadMode::InlineEdit.as_str(), "inline-edit");
    }
}
