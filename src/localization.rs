use anyhow::Result;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

/// Languages with built-in message files, the first one being the fallback
pub const SUPPORTED_LANGUAGES: &[&str] = &["uz", "en"];

const BUILTIN_RESOURCES: &[(&str, &str)] = &[
    ("uz", include_str!("../locales/uz/main.ftl")),
    ("en", include_str!("../locales/en/main.ftl")),
];

/// Localization manager for the order bot
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
    default_language: String,
}

impl LocalizationManager {
    /// Create a new localization manager with the built-in messages
    pub fn new() -> Result<Self> {
        Self::build(SUPPORTED_LANGUAGES[0], None)
    }

    /// Create a localization manager with a custom fallback language
    pub fn with_default_language(default_language: &str) -> Result<Self> {
        Self::build(default_language, None)
    }

    /// Create a localization manager whose built-in messages are overridden
    /// by `<dir>/<lang>/main.ftl` files where they exist
    pub fn with_overrides(default_language: &str, dir: &Path) -> Result<Self> {
        Self::build(default_language, Some(dir))
    }

    fn build(default_language: &str, overrides: Option<&Path>) -> Result<Self> {
        if !SUPPORTED_LANGUAGES.contains(&default_language) {
            anyhow::bail!("Unsupported default language: {default_language}");
        }

        let mut bundles = HashMap::new();
        for (lang, source) in BUILTIN_RESOURCES {
            let locale: LanguageIdentifier = lang.parse()?;
            let mut bundle = Self::create_bundle(&locale, source.to_string());

            if let Some(dir) = overrides {
                let resource_path = dir.join(lang).join("main.ftl");
                if let Ok(content) = fs::read_to_string(&resource_path) {
                    debug!(path = %resource_path.display(), "Loading message overrides");
                    bundle.add_resource_overriding(parse_resource(lang, content));
                }
            }

            bundles.insert(lang.to_string(), bundle);
        }

        Ok(Self {
            bundles,
            default_language: default_language.to_string(),
        })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: &LanguageIdentifier, content: String) -> FluentBundle<FluentResource> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Telegram renders the Unicode isolation marks literally
        bundle.set_use_isolating(false);

        let lang = locale.to_string();
        if let Err(errors) = bundle.add_resource(parse_resource(&lang, content)) {
            warn!(language = %lang, errors = ?errors, "Duplicate messages in resource");
        }

        bundle
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Map a Telegram `language_code` (e.g. "en-US") to a supported language
    pub fn detect_language(&self, language_code: Option<&str>) -> &str {
        language_code
            .and_then(|code| code.parse::<LanguageIdentifier>().ok())
            .and_then(|langid| {
                let primary = langid.language.as_str().to_lowercase();
                SUPPORTED_LANGUAGES.iter().copied().find(|lang| *lang == primary)
            })
            .unwrap_or(self.default_language.as_str())
    }

    /// Get a localized message in the fallback language
    pub fn get_message(&self, key: &str, args: Option<&HashMap<&str, &str>>) -> String {
        self.get_message_in_language(key, &self.default_language, args)
    }

    /// Get a localized message, falling back to the default language when
    /// `language` is unsupported
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(&self.default_language))
        {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {}", key),
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, FluentValue::from(*value));
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            debug!(key, errors = ?errors, "Message formatted with errors");
        }

        value.into_owned()
    }

    /// Get a localized message for a Telegram language code
    pub fn t(&self, key: &str, language_code: Option<&str>) -> String {
        let language = self.detect_language(language_code);
        self.get_message_in_language(key, language, None)
    }

    /// Get a localized message with simple string arguments
    pub fn t_args(&self, key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        let language = self.detect_language(language_code);
        self.get_message_in_language(key, language, Some(&args_map))
    }

    /// The message `key` in every supported language, used to recognize
    /// keyboard button presses regardless of the user's language
    pub fn all_variants(&self, key: &str) -> Vec<String> {
        SUPPORTED_LANGUAGES
            .iter()
            .map(|lang| self.get_message_in_language(key, lang, None))
            .collect()
    }
}

fn parse_resource(lang: &str, content: String) -> FluentResource {
    match FluentResource::try_new(content) {
        Ok(resource) => resource,
        Err((resource, errors)) => {
            warn!(language = %lang, errors = ?errors, "Failed to parse part of the messages");
            resource
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_references_resolved() {
        let manager = LocalizationManager::new().unwrap();

        let message = manager.get_message_in_language("contact-expected", "en", None);
        assert_eq!(message, "Please share your contact or press 'Cancel'");
    }

    #[test]
    fn test_unknown_default_language_rejected() {
        assert!(LocalizationManager::with_default_language("de").is_err());
    }
}
