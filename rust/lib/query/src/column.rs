//! Logical field name → physical column name.
//!
//! The remote API names its columns in UPPER_SNAKE_CASE (`AUXIL_CODE`,
//! `STATUS`). Callers use whatever spelling is natural on their side
//! (`auxilCode`, `auxil_code`, `auxil-code`); [`column_name`] folds all of
//! them onto one column with a single rule, no per-field exceptions.

/// Convert a logical field name to its physical column name.
///
/// Rules, applied left to right:
/// - `-`, `.`, ` ` and `_` are word separators and become one `_`;
/// - a capital preceded by a lowercase letter or a digit starts a new word
///   (`auxilCode` → `AUXIL_CODE`, `line2Price` → `LINE2_PRICE`);
/// - inside a run of capitals, the last capital starts a new word when a
///   lowercase letter follows it (`XMLData` → `XML_DATA`);
/// - leading/trailing separators are dropped and the result is uppercased.
///
/// Names that are already UPPER_SNAKE_CASE come back unchanged.
pub fn column_name(logical: &str) -> String {
    let chars: Vec<char> = logical.chars().collect();
    let mut out = String::with_capacity(logical.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if is_separator(ch) {
            push_break(&mut out);
            continue;
        }

        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            let starts_word = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if starts_word {
                push_break(&mut out);
            }
        }

        out.extend(ch.to_uppercase());
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}

fn is_separator(ch: char) -> bool {
    matches!(ch, '_' | '-' | '.' | ' ')
}

/// Push a single `_`, never at the start and never doubled.
fn push_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('_') {
        out.push('_');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case() {
        assert_eq!(column_name("auxilCode"), "AUXIL_CODE");
        assert_eq!(column_name("status"), "STATUS");
        assert_eq!(column_name("dateCreated"), "DATE_CREATED");
    }

    #[test]
    fn already_upper_snake() {
        assert_eq!(column_name("AUXIL_CODE"), "AUXIL_CODE");
        assert_eq!(column_name("CODE"), "CODE");
    }

    #[test]
    fn separators_fold() {
        assert_eq!(column_name("auxil_code"), "AUXIL_CODE");
        assert_eq!(column_name("auxil-code"), "AUXIL_CODE");
        assert_eq!(column_name("auxil code"), "AUXIL_CODE");
        assert_eq!(column_name("auxil__code"), "AUXIL_CODE");
        assert_eq!(column_name("_internal_"), "INTERNAL");
    }

    #[test]
    fn acronyms_and_digits() {
        assert_eq!(column_name("XMLData"), "XML_DATA");
        assert_eq!(column_name("vatID"), "VAT_ID");
        assert_eq!(column_name("line2Price"), "LINE2_PRICE");
        assert_eq!(column_name("address1"), "ADDRESS1");
    }

    #[test]
    fn pascal_case() {
        assert_eq!(column_name("UnitSetRef"), "UNIT_SET_REF");
    }

    #[test]
    fn stable_across_calls() {
        let a = column_name("salesmanCode");
        let b = column_name("salesmanCode");
        assert_eq!(a, b);
    }

    #[test]
    fn empty() {
        assert_eq!(column_name(""), "");
        assert_eq!(column_name("__"), "");
    }
}
