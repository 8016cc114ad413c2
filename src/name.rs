//! Object name utilities.
//!
//! Names are the cross-reference currency of the flat text format, so the
//! characters that structure that format (`,`, `;`, `!`, newlines) are not
//! allowed inside them. All name comparisons in this crate are
//! case-insensitive.

/// Characters with structural meaning in the flat text format.
const FORBIDDEN: [char; 4] = [',', ';', '!', '\n'];

/// Checks that a name is usable in the flat text format.
///
/// Returns the trimmed name on success. Empty names (after trimming) and
/// names containing format delimiters are rejected.
pub fn validate_name(name: &str) -> Result<&str, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name must not be empty".to_string());
    }
    if let Some(bad) = trimmed.chars().find(|c| FORBIDDEN.contains(c)) {
        return Err(format!("Name contains illegal character {bad:?}: {trimmed}"));
    }
    Ok(trimmed)
}

/// Makes `base` unique with respect to `taken` by appending a counter.
///
/// Returns `base` unchanged when it is free, otherwise `"{base} 1"`,
/// `"{base} 2"`, and so on. `taken` is consulted case-insensitively.
pub fn make_unique_name<F>(base: &str, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !taken(base) {
        return base.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{base} {counter}");
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
