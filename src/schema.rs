use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single-line (or multi-line, via the textarea fallback) text question.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextField {
    /// Visible question label. Matched by substring against the rendered
    /// page, so it only needs to be unique enough to hit one question.
    pub label: String,
    /// Accepted `type` attribute values for the input control, e.g.
    /// `["text", "email"]`. Joined into a logical OR in the locator.
    pub types: Vec<String>,
    /// The value to type into the control.
    pub response: String,
    /// Also match a `<textarea>` for this question. When unset, the
    /// compiler-wide `exhaustive` switch decides.
    #[serde(default)]
    pub textarea: Option<bool>,
}

/// A single-choice question. Only the chosen option's label is used for
/// locating; the question label is informational.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RadioField {
    pub label: String,
    /// Visible label of the option to select.
    pub choice: String,
    /// Expected number of options. Informational only, never enforced.
    #[serde(default)]
    pub choice_count: Option<u32>,
}

/// A multi-choice question with one or more options to tick.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckboxField {
    pub label: String,
    /// Visible labels of the options to tick, in the order they should be
    /// attempted.
    pub choices: Vec<String>,
}

/// Caller-supplied description of a form: which questions exist and what
/// to answer. Field order within each category is preserved all the way
/// into the fill sequence.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FormSchema {
    /// Target form URL. May instead be supplied at fill time.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text: Vec<TextField>,
    #[serde(default)]
    pub radio: Vec<RadioField>,
    #[serde(default)]
    pub checkbox: Vec<CheckboxField>,
}

impl FormSchema {
    /// Parse and validate a schema from JSON. A field missing a required
    /// key (e.g. a text field without `response`) rejects the whole
    /// document.
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: FormSchema =
            serde_json::from_str(json).map_err(|e| Error::Schema(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Eager shape validation. Called by the compiler before any locator
    /// is synthesized, so a malformed schema can never produce a mapping
    /// that silently skips fields at fill time.
    pub fn validate(&self) -> Result<()> {
        for field in &self.text {
            if field.label.is_empty() {
                return Err(Error::Schema("text field with empty label".into()));
            }
            if field.types.is_empty() {
                return Err(Error::Schema(format!(
                    "text field {:?} declares no input types",
                    field.label
                )));
            }
            if field.response.is_empty() {
                return Err(Error::Schema(format!(
                    "text field {:?} has no response value",
                    field.label
                )));
            }
        }
        for field in &self.radio {
            if field.choice.is_empty() {
                return Err(Error::Schema(format!(
                    "radio field {:?} has an empty choice",
                    field.label
                )));
            }
        }
        for field in &self.checkbox {
            if field.choices.is_empty() {
                return Err(Error::Schema(format!(
                    "checkbox field {:?} declares no choices",
                    field.label
                )));
            }
            if field.choices.iter().any(String::is_empty) {
                return Err(Error::Schema(format!(
                    "checkbox field {:?} has an empty choice",
                    field.label
                )));
            }
        }
        Ok(())
    }
}
