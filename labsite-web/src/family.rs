use regex::Regex;
use std::sync::LazyLock;

static TRAILING_KANJI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[一-龥]+$").expect("valid regex"));

/// Reduce a scraped author name to the family name stored in records.
///
/// Spaced names return their last token, whatever the Given/Family order
/// of the source. Unspaced names of up to four characters are kept whole;
/// longer ones keep their trailing kanji run when there is one.
pub fn family_from_full(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return String::new();
    }
    if name.contains(' ') {
        return name.split_whitespace().last().unwrap_or(name).to_string();
    }
    if name.chars().count() <= 4 {
        return name.to_string();
    }
    TRAILING_KANJI
        .find(name)
        .map_or(name, |m| m.as_str())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaced_names_take_last_token() {
        assert_eq!(family_from_full("John Smith"), "Smith");
        assert_eq!(family_from_full("  Ada  King Lovelace "), "Lovelace");
        // Family-first order is not detected.
        assert_eq!(family_from_full("Tanaka Taro"), "Taro");
    }

    #[test]
    fn short_names_are_unchanged() {
        assert_eq!(family_from_full("飯間"), "飯間");
        assert_eq!(family_from_full("狭間太郎"), "狭間太郎");
    }

    #[test]
    fn long_unspaced_names_keep_trailing_kanji() {
        assert_eq!(family_from_full("ProfessorYamada山田太郎"), "山田太郎");
        assert_eq!(
            family_from_full("Some Very Long Unspaced CJKName一二三四五"),
            "CJKName一二三四五"
        );
    }

    #[test]
    fn long_names_without_kanji_are_unchanged() {
        assert_eq!(family_from_full("Yamamoto"), "Yamamoto");
        assert_eq!(family_from_full(""), "");
    }
}
