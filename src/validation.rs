use crate::models::MovieRequest;

pub const MIN_YEAR: i32 = 1888;
pub const MAX_TITLE_CHARS: usize = 100;

pub fn current_year() -> i32 {
    jiff::Zoned::now().year().into()
}

/// Checks a creation request against the field rules and returns every
/// violation in order. An empty list means the request is valid.
pub fn validate(req: &MovieRequest, current_year: i32) -> Vec<String> {
    let mut errors = Vec::new();

    match req.title.as_deref() {
        Some(title) if !title.trim().is_empty() => {
            if title.chars().count() > MAX_TITLE_CHARS {
                errors.push(format!("title must not exceed {MAX_TITLE_CHARS} characters"));
            }
        },
        _ => errors.push("title must not be empty".to_string()),
    }

    let max_year = current_year + 1;
    if !(MIN_YEAR..=max_year).contains(&req.year) {
        errors.push(format!("year must be between {MIN_YEAR} and {max_year}"));
    }

    errors
}
