//! Display names for the language codes the popup can show.

/// Known language codes and their display names.
const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("tr", "Turkish"),
    ("de", "German"),
    ("fr", "French"),
    ("es", "Spanish"),
    ("it", "Italian"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("zh-cn", "Chinese"),
    ("zh-tw", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("pt", "Portuguese"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("sv", "Swedish"),
    ("da", "Danish"),
    ("fi", "Finnish"),
    ("no", "Norwegian"),
    ("el", "Greek"),
    ("cs", "Czech"),
    ("hu", "Hungarian"),
    ("ro", "Romanian"),
    ("uk", "Ukrainian"),
    ("ms", "Malay"),
];

/// Human-readable name for a language code.
///
/// Unknown codes fall back to the uppercased code itself; this never fails.
pub fn display_name(code: &str) -> String {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| code.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve_to_names() {
        assert_eq!(display_name("en"), "English");
        assert_eq!(display_name("tr"), "Turkish");
        assert_eq!(display_name("zh-cn"), "Chinese");
    }

    #[test]
    fn unknown_codes_fall_back_to_uppercase() {
        assert_eq!(display_name("xx"), "XX");
        assert_eq!(display_name("tlh"), "TLH");
        assert_eq!(display_name(""), "");
    }
}
