//! User-facing notes explaining how an input was interpreted.
use crate::resolver::ResolutionResult;

/// Describe `result` for the user who typed `original_input`. A confident match needs no explanation, so the hint is
/// empty in that case.
pub fn hint(result: &ResolutionResult, original_input: &str) -> String {
    let original_input = original_input.trim();
    match &result.entity {
        None => format!("I don't know what \"{original_input}\" is."),
        Some(entity) if result.is_guess => format!("\"{original_input}\" didn't match exactly. Did you mean {}?", entity.name),
        Some(entity) if result.is_numeric_id => {
            format!("\"{original_input}\" looks like an ID, it resolves to {}.", entity.name)
        },
        Some(_) => String::new(),
    }
}
