use regex::{Regex, RegexBuilder};
use validator::ValidationErrors;

use crate::core::error::AppError;

/// Longest search pattern accepted from a query string
pub const MAX_SEARCH_PATTERN_LEN: usize = 200;

/// Message of the first failing field, checking `fields` in the given order.
///
/// `validator` reports errors as an unordered map, callers that surface a single
/// message use this to keep the reported field stable.
pub fn first_message(errors: &ValidationErrors, fields: &[&str]) -> Option<String> {
    let field_errors = errors.field_errors();
    fields.iter().find_map(|field| {
        field_errors
            .get(*field)
            .and_then(|errs| errs.first())
            .map(|err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("Invalid {}", field),
            })
    })
}

/// Compile a user-supplied name search as a case-insensitive regular expression.
///
/// Blank input means "no filter".
pub fn compile_search_pattern(search: Option<&str>) -> Result<Option<Regex>, AppError> {
    let Some(pattern) = search.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if pattern.len() > MAX_SEARCH_PATTERN_LEN {
        return Err(AppError::BadRequest(format!(
            "Search must not exceed {} characters",
            MAX_SEARCH_PATTERN_LEN
        )));
    }

    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|e| AppError::BadRequest(format!("Invalid search pattern: {}", e)))
}
