//! Row filtering and default-language fallback, applied to a matrix before
//! it is handed to a serializer.

use std::collections::HashSet;

use tracing::debug;

use crate::{error::Error, types::TranslationMatrix};

/// Drops every row whose state is in `excluded_states`.
///
/// Rows without a state are kept, so a matrix read without a state column
/// passes through unchanged.
pub fn exclude_states(matrix: TranslationMatrix, excluded_states: &HashSet<String>) -> TranslationMatrix {
    if excluded_states.is_empty() {
        return matrix;
    }
    let TranslationMatrix { languages, rows } = matrix;
    let rows = rows
        .into_iter()
        .filter(|row| match &row.state {
            Some(state) if excluded_states.contains(state) => {
                debug!(key = %row.key, state = %state, "excluding row");
                false
            }
            _ => true,
        })
        .collect();
    TranslationMatrix { languages, rows }
}

/// Fills empty values from `default_language`.
///
/// Only values that are present and empty are filled; absent entries stay
/// absent, and the default language's own values are never touched. Fails
/// when `default_language` is not one of the matrix languages.
pub fn apply_fallback(
    mut matrix: TranslationMatrix,
    default_language: Option<&str>,
) -> Result<TranslationMatrix, Error> {
    let Some(default_language) = default_language else {
        return Ok(matrix);
    };
    if !matrix.has_language(default_language) {
        return Err(Error::configuration(format!(
            "default language `{}` is not one of the requested languages ({})",
            default_language,
            matrix.languages.join(", ")
        )));
    }

    for row in &mut matrix.rows {
        let fallback = match row.get_translation(default_language) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => continue,
        };
        for (language, value) in row.translations.iter_mut() {
            if language != default_language && value.is_empty() {
                debug!(key = %row.key, %language, "filling from default language");
                value.clone_from(&fallback);
            }
        }
    }
    Ok(matrix)
}
