//! Name conversions between declared field names and wire names.
//!
//! JSON:API wire names are dashed (`first-name`); declared model field names
//! follow the host convention (`FirstName`). Conversions here are purely
//! mechanical so they can run without a descriptor when none applies.

/// Convert a declared field name (`FirstName`, `first_name`, `firstName`)
/// to its dashed wire form (`first-name`).
pub fn to_dashed(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch == '_' || ch == '-' {
            out.push('-');
            prev_lower = false;
        } else if ch.is_ascii_uppercase() {
            if prev_lower {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

/// Convert a dashed wire name (`first-name`) to PascalCase (`FirstName`).
pub fn to_pascal(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for ch in name.chars() {
        if ch == '-' || ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_dashed() {
        assert_eq!(to_dashed("FirstName"), "first-name");
        assert_eq!(to_dashed("Age"), "age");
        assert_eq!(to_dashed("first_name"), "first-name");
        assert_eq!(to_dashed("firstName"), "first-name");
        assert_eq!(to_dashed("already-dashed"), "already-dashed");
    }

    #[test]
    fn test_to_pascal() {
        assert_eq!(to_pascal("first-name"), "FirstName");
        assert_eq!(to_pascal("age"), "Age");
        assert_eq!(to_pascal("first_name"), "FirstName");
    }

    #[test]
    fn test_round_trip() {
        for name in ["FirstName", "Age", "HomeAddress2"] {
            assert_eq!(to_pascal(&to_dashed(name)), name);
        }
    }
}
