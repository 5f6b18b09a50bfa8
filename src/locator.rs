//! XPath synthesis for the Google Forms rendering convention.
//!
//! Question labels render inside a `<span>`; the matching input control
//! lives a fixed number of structural levels above that span, then a
//! descendant query away. Option labels (radio/checkbox choices) sit one
//! level deeper than question labels. The ancestor constants encode that
//! layout and are the knobs to turn for a different form renderer.
//!
//! Everything here is pure string building: no session, no side effects,
//! same inputs always produce the same expression.

/// Structural levels between a question's label span and its container.
pub const QUESTION_ANCESTOR_LEVELS: usize = 4;

/// Structural levels between an option's label span and its container.
/// Option labels nest one level deeper than question labels.
pub const OPTION_ANCESTOR_LEVELS: usize = 5;

/// Locator for the form's "clear" control. Exact text match: the clear
/// span is a button caption, not a question label.
pub const CLEAR_CONTROL: &str = "//span[text()=\"Clear form\"]";

/// Locator for the form's submit control.
pub const SUBMIT_CONTROL: &str = "//span[text()=\"Submit\"]";

fn ascend(levels: usize) -> String {
    "/..".repeat(levels)
}

/// Locator for a text question's `<input>` control. The label is matched
/// by substring (`contains`) to tolerate punctuation and markup around the
/// visible text; `types` become a logical OR over the `type` attribute.
pub fn text_input(label: &str, types: &[String]) -> String {
    let predicate = types
        .iter()
        .map(|t| format!("@type=\"{t}\""))
        .collect::<Vec<_>>()
        .join(" or ");
    format!(
        "//span[contains(text(), \"{label}\")]{}//input[{predicate}]",
        ascend(QUESTION_ANCESTOR_LEVELS)
    )
}

/// Locator for a text question rendered as a `<textarea>`.
pub fn text_area(label: &str) -> String {
    format!(
        "//span[contains(text(), \"{label}\")]{}//textarea",
        ascend(QUESTION_ANCESTOR_LEVELS)
    )
}

/// Locator for the clickable label of a radio or checkbox option, found
/// by the option's own visible text.
pub fn option_label(choice: &str) -> String {
    format!(
        "//span[contains(text(), \"{choice}\")]{}//label",
        ascend(OPTION_ANCESTOR_LEVELS)
    )
}

/// XPath union of two full expressions: try `primary`, and if it matches
/// nothing, `fallback` still can.
pub fn either(primary: &str, fallback: &str) -> String {
    format!("{primary} | {fallback}")
}
