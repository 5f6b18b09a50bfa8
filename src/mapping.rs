//! Compiles a [`FormSchema`] into the locator mapping the fill engine
//! consumes.
//!
//! Known limitation, preserved from the targeted renderer's behavior: a
//! locator resolves to the *first* matching element at fill time. Two
//! questions whose labels share a substring produce ambiguous locators;
//! the compiler does not try to detect or repair that.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::locator;
use crate::schema::FormSchema;

/// One compiled text question: where to type and what to type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TextEntry {
    pub locator: String,
    pub expected: String,
}

/// Compiled, ordered locators for one form. Read-only during filling;
/// entry order within each category is the schema's declaration order and
/// is also the fill order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocatorMapping {
    pub url: Option<String>,
    pub text: Vec<TextEntry>,
    /// Each entry resolves to a selectable radio option.
    pub radio: Vec<String>,
    /// Each entry resolves to an option label whose `for` attribute links
    /// to the togglable control.
    pub checkbox: Vec<String>,
}

/// Compile a schema into a locator mapping.
///
/// `exhaustive` is the compiler-wide textarea switch: any text field
/// without an explicit `textarea` flag inherits it. A field with the
/// effective flag set compiles to a single entry whose locator is the
/// union of the input-type match and a textarea match, so the question
/// fills whichever way it happens to be rendered.
///
/// Fails fast with [`crate::Error::Schema`] on a malformed schema; no
/// partial mapping is ever returned.
pub fn compile(schema: &FormSchema, exhaustive: bool) -> Result<LocatorMapping> {
    schema.validate()?;

    let mut mapping = LocatorMapping {
        url: schema.url.clone(),
        ..Default::default()
    };

    for field in &schema.text {
        let primary = locator::text_input(&field.label, &field.types);
        let expr = if field.textarea.unwrap_or(exhaustive) {
            locator::either(&primary, &locator::text_area(&field.label))
        } else {
            primary
        };
        mapping.text.push(TextEntry {
            locator: expr,
            expected: field.response.clone(),
        });
    }

    for field in &schema.radio {
        mapping.radio.push(locator::option_label(&field.choice));
    }

    for field in &schema.checkbox {
        for choice in &field.choices {
            mapping.checkbox.push(locator::option_label(choice));
        }
    }

    Ok(mapping)
}
