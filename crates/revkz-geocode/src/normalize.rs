//! Text normalization shared by the extractors and the providers.

/// Trims and collapses internal whitespace runs to a single space.
#[must_use]
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercases and folds `ё` to `е`; the two are used interchangeably in
/// Kazakhstani and Russian street names.
#[must_use]
pub fn fold_case(s: &str) -> String {
    s.to_lowercase().replace('ё', "е")
}

/// Canonical, comparable form of a house number: no whitespace, `корпус`
/// shortened to `к`, `строение` to `с`, uppercased.
///
/// Idempotent: canonicalizing an already canonical value returns it unchanged.
#[must_use]
pub fn canonicalize_house_number(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let mut folded = fold_case(&compact);
    // Replace to a fixed point so that a removal cannot leave a fresh
    // abbreviation candidate behind for a second call to find.
    while folded.contains("корпус") || folded.contains("строение") {
        folded = folded.replace("корпус", "к").replace("строение", "с");
    }
    folded.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_whitespace_trims_and_collapses() {
        assert_eq!(normalize_whitespace("  ул.  Абая \t 34\n"), "ул. Абая 34");
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn fold_case_lowercases_and_folds_yo() {
        assert_eq!(fold_case("Ёлочная"), "елочная");
        assert_eq!(fold_case("Самал-2 ЖК"), "самал-2 жк");
    }

    #[test]
    fn canonicalize_removes_whitespace_and_uppercases() {
        assert_eq!(canonicalize_house_number("34 a"), canonicalize_house_number("34a"));
        assert_eq!(canonicalize_house_number("34 а"), "34А");
        assert_eq!(canonicalize_house_number(" 34 / 1 "), "34/1");
    }

    #[test]
    fn canonicalize_expands_building_abbreviations() {
        assert_eq!(canonicalize_house_number("12 корпус 3"), "12К3");
        assert_eq!(canonicalize_house_number("5 строение 2"), "5С2");
        assert_eq!(canonicalize_house_number("12К3"), "12К3");
    }

    #[test]
    fn canonicalize_does_not_equate_latin_and_cyrillic_letters() {
        assert_ne!(canonicalize_house_number("34a"), canonicalize_house_number("34а"));
    }

    #[test]
    fn canonicalize_is_idempotent() {
        for raw in [
            "34",
            "34а",
            "34 A",
            "34/1",
            "10-2",
            "7 корпус 1",
            "корпусорпус",
            "строениетроение 9",
            "ё1",
            "",
        ] {
            let once = canonicalize_house_number(raw);
            assert_eq!(canonicalize_house_number(&once), once, "input: {raw:?}");
        }
    }
}
