//! Prompt set: renders templates and assembles the messages for one chunk.

use crate::defaults::{self, INLINE_INSTRUCTIONS_ID, INLINE_SYSTEM_ID, REPORT_INSTRUCTIONS_ID,
    REPORT_SYSTEM_ID, REPORT_TASK_ID};
use crate::loader::{find_prompt, list_prompts};
use crate::types::ProofreadMode;
use handlebars::Handlebars;
use proofread_core::{AppError, AppResult};
use proofread_llm::ChatMessage;
use std::path::Path;

const ALL_IDS: [&str; 5] = [
    REPORT_SYSTEM_ID,
    REPORT_TASK_ID,
    REPORT_INSTRUCTIONS_ID,
    INLINE_SYSTEM_ID,
    INLINE_INSTRUCTIONS_ID,
];

/// Compiled prompt templates for both proofreading modes.
#[derive(Debug, Clone)]
pub struct PromptSet {
    registry: Handlebars<'static>,
    sentinel: String,
}

impl PromptSet {
    /// Built-in prompts only.
    pub fn builtin(sentinel: impl Into<String>) -> AppResult<Self> {
        let mut registry = Handlebars::new();

        // Plain text, never HTML: formatting tags must reach the model untouched
        registry.register_escape_fn(handlebars::no_escape);

        let mut set = Self {
            registry,
            sentinel: sentinel.into(),
        };
        for id in ALL_IDS {
            if let Some(template) = defaults::builtin(id) {
                set.register(id, template)?;
            }
        }
        Ok(set)
    }

    /// Built-in prompts, replaced by any overrides in `<workspace>/.proofread/prompts/`.
    pub fn load(workspace_path: &Path, sentinel: impl Into<String>) -> AppResult<Self> {
        let mut set = Self::builtin(sentinel)?;

        for id in list_prompts(workspace_path)? {
            if !ALL_IDS.contains(&id.as_str()) {
                tracing::warn!("Ignoring unknown prompt override: {}", id);
            }
        }

        for id in ALL_IDS {
            if let Some(definition) = find_prompt(workspace_path, id)? {
                set.register(id, &definition.template)?;
            }
        }
        Ok(set)
    }

    /// Replace one template.
    pub fn with_template(mut self, id: &str, template: &str) -> AppResult<Self> {
        if defaults::builtin(id).is_none() {
            return Err(AppError::Prompt(format!("Unknown prompt id: {}", id)));
        }
        self.register(id, template)?;
        Ok(self)
    }

    /// The "nothing to correct" reply the report prompt asks for.
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    fn register(&mut self, id: &str, template: &str) -> AppResult<()> {
        self.registry
            .register_template_string(id, template)
            .map_err(|e| AppError::Prompt(format!("Failed to register template {}: {}", id, e)))
    }

    fn render(&self, id: &str, instructions: Option<&str>) -> AppResult<String> {
        let data = serde_json::json!({
            "sentinel": self.sentinel,
            "instructions": instructions.unwrap_or_default(),
        });

        self.registry
            .render(id, &data)
            .map_err(|e| AppError::Prompt(format!("Failed to render template {}: {}", id, e)))
    }

    /// Build the ordered messages for one chunk.
    ///
    /// Report mode: system, task, optional instructions, chunk.
    /// Inline-edit mode: system, optional instructions, chunk.
    /// Blank instructions are treated as absent.
    pub fn build_messages(
        &self,
        mode: ProofreadMode,
        chunk: &str,
        additional_instructions: Option<&str>,
    ) -> AppResult<Vec<ChatMessage>> {
        let instructions = additional_instructions.filter(|s| !s.trim().is_empty());

        let mut messages = Vec::with_capacity(4);
        match mode {
            ProofreadMode::Report => {
                messages.push(ChatMessage::system(self.render(REPORT_SYSTEM_ID, None)?));
                messages.push(ChatMessage::user(self.render(REPORT_TASK_ID, None)?));
                if instructions.is_some() {
                    messages.push(ChatMessage::user(
                        self.render(REPORT_INSTRUCTIONS_ID, instructions)?,
                    ));
                }
            }
            ProofreadMode::InlineEdit => {
                messages.push(ChatMessage::system(self.render(INLINE_SYSTEM_ID, None)?));
                if instructions.is_some() {
                    messages.push(ChatMessage::user(
                        self.render(INLINE_INSTRUCTIONS_ID, instructions)?,
                    ));
                }
            }
        }

        // The chunk is sent verbatim, never through the template engine
        messages.push(ChatMessage::user(chunk));

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofread_llm::Role;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_report_messages_without_instructions() {
        let prompts = PromptSet::builtin("No issues were found.").unwrap();
        let messages = prompts
            .build_messages(ProofreadMode::Report, "The down was quiet.  \n", None)
            .unwrap();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[1].content.ends_with("No issues were found."));
        assert_eq!(messages[2].content, "The down was quiet.  \n");
    }

    #[test]
    fn test_report_messages_with_instructions() {
        let prompts = PromptSet::builtin("No issues were found.").unwrap();
        let messages = prompts
            .build_messages(ProofreadMode::Report, "chunk", Some("Use British spelling."))
            .unwrap();

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].content, "Use British spelling.");
        assert_eq!(messages[3].content, "chunk");
    }

    #[test]
    fn test_inline_messages() {
        let prompts = PromptSet::builtin("No issues were found.").unwrap();
        let messages = prompts
            .build_messages(ProofreadMode::InlineEdit, "<b>Hello</b>  \n", Some("Keep slang."))
            .unwrap();

        assert_eq!(messages.len(), 3);
        assert!(messages[0].content.contains("<b>...</b>"));
        assert_eq!(messages[1].content, "Additional instructions: Keep slang.");
        assert_eq!(messages[2].content, "<b>Hello</b>  \n");
    }

    #[test]
    fn test_blank_instructions_are_ignored() {
        let prompts = PromptSet::builtin("No issues were found.").unwrap();
        let messages = prompts
            .build_messages(ProofreadMode::InlineEdit, "text", Some("   "))
            .unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_chunk_is_not_templated() {
        let prompts = PromptSet::builtin("No issues were found.").unwrap();
        let messages = prompts
            .build_messages(ProofreadMode::Report, "{{sentinel}} & <i>x</i>", None)
            .unwrap();
        assert_eq!(messages[2].content, "{{sentinel}} & <i>x</i>");
    }

    #[test]
    fn test_with_template_override() {
        let prompts = PromptSet::builtin("CLEAN")
            .unwrap()
            .with_template(REPORT_TASK_ID, "List errors or say {{sentinel}}.")
            .unwrap();
        let messages = prompts
            .build_messages(ProofreadMode::Report, "chunk", None)
            .unwrap();
        assert_eq!(messages[1].content, "List errors or say CLEAN.");

        assert!(PromptSet::builtin("CLEAN")
            .unwrap()
            .with_template("proofread.unknown", "x")
            .is_err());
    }

    #[test]
    fn test_load_workspace_override() {
        let temp_dir = TempDir::new().unwrap();
        let prompts_dir = temp_dir.path().join(".proofread/prompts");
        fs::create_dir_all(&prompts_dir).unwrap();
        fs::write(
            prompts_dir.join("proofread.inline.system.yml"),
            r#"
id: proofread.inline.system
title: Legal editor
apiVersion: "1.0"
template: "You edit contracts. Preserve all tags."
"#,
        )
        .unwrap();

        let prompts = PromptSet::load(temp_dir.path(), "No issues were found.").unwrap();
        let messages = prompts
            .build_messages(ProofreadMode::InlineEdit, "chunk", None)
            .unwrap();
        assert_eq!(messages[0].content, "You edit contracts. Preserve all tags.");
    }
}
