use std::io;
use std::path::Path;

/// The persona and output contract sent ahead of every ingredient list.
///
/// Loaded from `prompt.txt` at compile time using `include_str!`, so the
/// wording can be edited without touching Rust string syntax.
pub const ANALYSIS_PROMPT: &str = include_str!("prompt.txt");

/// Closing reminder repeated after the user data. Models drift less when the
/// schema is restated last.
pub const RESPONSE_FORMAT: &str = r#"Respond ONLY in valid JSON using this exact structure:

{
  "highLevelInsight": "",
  "whyItMatters": "",
  "tradeOffs": "",
  "uncertainty": "",
  "guidance": ""
}

Do not include markdown.
Do not include explanations outside JSON."#;

/// Immutable prompt configuration, injected into the analyzer at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    instructions: String,
    response_format: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        PromptTemplate {
            instructions: ANALYSIS_PROMPT.trim().to_string(),
            response_format: RESPONSE_FORMAT.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Custom instructions with the default closing reminder
    pub fn new(instructions: impl Into<String>) -> Self {
        PromptTemplate {
            instructions: instructions.into(),
            ..Default::default()
        }
    }

    pub fn with_response_format(mut self, response_format: impl Into<String>) -> Self {
        self.response_format = response_format.into();
        self
    }

    /// Read instructions from a text file (e.g. a deployment-specific persona)
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let instructions = std::fs::read_to_string(path)?;
        Ok(Self::new(instructions.trim()))
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn response_format(&self) -> &str {
        &self.response_format
    }
}

/// Compose the full request: instructions, quoted user data, then the format reminder.
pub fn build_prompt(template: &PromptTemplate, user_text: &str) -> String {
    let quoted = user_text.trim().replace('"', "\\\"");
    format!(
        "{}\n\nUser provided ingredient information:\n\"{}\"\n\n{}\n",
        template.instructions(),
        quoted,
        template.response_format()
    )
}
