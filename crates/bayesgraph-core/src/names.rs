//! Node name allocation and sanitizing.
//!
//! Generated names run `a..z`, then `a1..z1`, `a2..z2` and so on. Allocation
//! is a pure function of the names already taken; nothing is remembered
//! between calls.

use std::collections::HashSet;

/// Returns the candidate name for allocation attempt `attempt`.
pub fn candidate(attempt: usize) -> String {
    let letter = (b'a' + (attempt % 26) as u8) as char;
    let suffix = attempt / 26;
    if suffix > 0 {
        format!("{letter}{suffix}")
    } else {
        letter.to_string()
    }
}

/// Returns the first candidate at or after `start` that is not in `taken`.
///
/// Terminates because `taken` is finite and the candidate sequence is not.
pub fn generate_name(start: usize, taken: &HashSet<&str>) -> String {
    let mut attempt = start;
    loop {
        let name = candidate(attempt);
        if !taken.contains(name.as_str()) {
            return name;
        }
        attempt += 1;
    }
}

/// Replaces every space with an underscore.
pub fn validate_value(value: &str) -> String {
    value.replace(' ', "_")
}

/// Returns the sanitized name if it is free, `None` if already in use.
pub fn check_name(value: &str, taken: &HashSet<&str>) -> Option<String> {
    let name = validate_value(value);
    if taken.contains(name.as_str()) {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_sequence() {
        assert_eq!(candidate(0), "a");
        assert_eq!(candidate(25), "z");
        assert_eq!(candidate(26), "a1");
        assert_eq!(candidate(27), "b1");
        assert_eq!(candidate(52), "a2");
    }

    #[test]
    fn generate_skips_taken_names() {
        let taken: HashSet<&str> = ["a", "b", "d"].into_iter().collect();
        assert_eq!(generate_name(0, &taken), "c");
        assert_eq!(generate_name(3, &taken), "e");
    }

    #[test]
    fn generate_wraps_into_suffixes() {
        let letters: Vec<String> = (0..26).map(candidate).collect();
        let taken: HashSet<&str> = letters.iter().map(String::as_str).collect();
        assert_eq!(generate_name(0, &taken), "a1");
    }

    #[test]
    fn validate_replaces_spaces() {
        assert_eq!(validate_value("rain fall today"), "rain_fall_today");
        assert_eq!(validate_value("plain"), "plain");
    }

    #[test]
    fn check_name_sanitizes_before_comparing() {
        let taken: HashSet<&str> = ["wet_grass"].into_iter().collect();
        assert_eq!(check_name("wet grass", &taken), None);
        assert_eq!(check_name("dry grass", &taken), Some("dry_grass".to_string()));
    }
}
