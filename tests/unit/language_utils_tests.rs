/*!
 * Unit tests for language code utilities
 */

use bookwai::language_utils::{
    get_language_name, language_codes_match, normalize_to_part2t, validate_language_code,
};

#[test]
fn test_validateLanguageCode_withTwoLetterCodes_shouldAccept() {
    assert!(validate_language_code("en").is_ok());
    assert!(validate_language_code("fr").is_ok());
    assert!(validate_language_code("zh").is_ok());
}

#[test]
fn test_validateLanguageCode_withBibliographicCode_shouldAccept() {
    assert!(validate_language_code("fre").is_ok());
    assert!(validate_language_code("chi").is_ok());
}

#[test]
fn test_validateLanguageCode_withInvalidCode_shouldReject() {
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("english").is_err());
    assert!(validate_language_code("").is_err());
}

#[test]
fn test_normalizeToPart2t_shouldConvertAllForms() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fra").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t(" EN ").unwrap(), "eng");
}

#[test]
fn test_languageCodesMatch_acrossCodeFamilies_shouldBeTrue() {
    assert!(language_codes_match("fr", "fra"));
    assert!(language_codes_match("fr", "fre"));
    assert!(!language_codes_match("fr", "en"));
    assert!(!language_codes_match("fr", "bogus"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("zho").unwrap(), "Chinese");
    assert!(get_language_name("xx").is_err());
}
