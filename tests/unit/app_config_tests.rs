/*!
 * Unit tests for application configuration
 */

use bookwai::app_config::{Config, OracleProvider, ProviderConfig};

#[test]
fn test_defaultConfig_shouldUseOllamaProvider() {
    let config = Config::default();
    assert_eq!(config.translation.provider, OracleProvider::Ollama);
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fr");
}

#[test]
fn test_defaultConfig_shouldListBothProviders() {
    let config = Config::default();
    let types: Vec<&str> = config
        .translation
        .available_providers
        .iter()
        .map(|p| p.provider_type.as_str())
        .collect();
    assert!(types.contains(&"ollama"));
    assert!(types.contains(&"anthropic"));
}

#[test]
fn test_getModel_withActiveProviderConfig_shouldUseIt() {
    let mut config = Config::default();
    config.translation.provider = OracleProvider::Anthropic;
    for provider in &mut config.translation.available_providers {
        if provider.provider_type == "anthropic" {
            provider.model = "claude-3-opus".to_string();
        }
    }
    assert_eq!(config.translation.get_model(), "claude-3-opus");
}

#[test]
fn test_getEndpoint_withEmptyConfiguredEndpoint_shouldFallBackToDefault() {
    let mut config = Config::default();
    for provider in &mut config.translation.available_providers {
        provider.endpoint = String::new();
    }
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
}

#[test]
fn test_validate_anthropicWithoutApiKey_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = OracleProvider::Anthropic;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withInvalidLanguage_shouldFail() {
    let mut config = Config::default();
    config.source_language = "xx".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_defaultConfig_shouldPass() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_parseConfig_fromJson_shouldApplyDefaultsForMissingFields() {
    let json = r#"{
        "source_language": "en",
        "target_language": "zh",
        "translation": {
            "provider": "ollama",
            "available_providers": [
                {"type": "ollama", "model": "mistral"}
            ]
        }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.target_language, "zh");
    assert_eq!(config.translation.get_model(), "mistral");
    assert_eq!(config.translation.common.retry_count, 3);
    assert!(config.translation.common.retry_backoff_ms > 0);
}

#[test]
fn test_buildSystemPrompt_shouldSubstituteLanguageNames() {
    let config = Config::default();
    let prompt = config
        .translation
        .build_system_prompt("en", "fr", None);
    assert!(prompt.contains("English"));
    assert!(prompt.contains("French"));
    assert!(!prompt.contains("{source_language}"));
}

#[test]
fn test_buildSystemPrompt_withCustomPrompt_shouldUseIt() {
    let config = Config::default();
    let prompt = config.translation.build_system_prompt(
        "en",
        "fr",
        Some("Translate {source_language} poetry into {target_language}"),
    );
    assert_eq!(prompt, "Translate English poetry into French");
}

#[test]
fn test_providerConfig_new_shouldFillProviderDefaults() {
    let anthropic = ProviderConfig::new(OracleProvider::Anthropic);
    assert_eq!(anthropic.provider_type, "anthropic");
    assert_eq!(anthropic.endpoint, "https://api.anthropic.com");
    assert!(anthropic.api_key.is_empty());
}
