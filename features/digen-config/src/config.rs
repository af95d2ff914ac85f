use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Configuration of a generator run
///
/// Every field has a default, so a config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub markers: Markers,
    pub naming: Naming,
    /// Keywords which may qualify a type name, e.g. `any APIClient`
    pub existential_qualifiers: Vec<String>,
    pub emit: EmitOptions,
}
impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            naming: Naming::default(),
            existential_qualifiers: vec!["any".to_string(), "some".to_string()],
            emit: EmitOptions::default(),
        }
    }
}

impl GeneratorConfig {
    /// Checks values serde can not reject on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("markers.provider", &self.markers.provider),
            ("markers.injectable", &self.markers.injectable),
            ("naming.provide_prefix", &self.naming.provide_prefix),
            ("naming.resolver_suffix", &self.naming.resolver_suffix),
            ("naming.resolve_prefix", &self.naming.resolve_prefix),
            ("naming.intercept_prefix", &self.naming.intercept_prefix),
            ("naming.builder_name", &self.naming.builder_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty",
                });
            }
        }

        if self.naming.resolve_prefix == self.naming.intercept_prefix {
            return Err(ConfigError::Invalid {
                field: "naming.intercept_prefix",
                reason: "must differ from naming.resolve_prefix",
            });
        }

        if self.emit.indent == 0 {
            return Err(ConfigError::Invalid {
                field: "emit.indent",
                reason: "must be at least 1",
            });
        }

        Ok(())
    }

    /// Strips one existential qualifier from a type name
    ///
    /// `any APIClient` becomes `APIClient`. Names without a qualifier are returned unchanged.
    pub fn bare_type_name<'a>(&self, type_name: &'a str) -> &'a str {
        let trimmed = type_name.trim();
        for qualifier in &self.existential_qualifiers {
            if let Some(rest) = trimmed.strip_prefix(qualifier.as_str()) {
                if rest.starts_with(char::is_whitespace) {
                    return rest.trim_start();
                }
            }
        }
        trimmed
    }
}

/// Names of the marker interfaces declarations opt in with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Interfaces extending this one (transitively) are provider interfaces
    pub provider: String,
    /// Types conforming to this one are injectable
    pub injectable: String,
}
impl Default for Markers {
    fn default() -> Self {
        Self {
            provider: "Provider".to_string(),
            injectable: "Injectable".to_string(),
        }
    }
}

/// Naming rules for recognized and generated members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Naming {
    /// Provider interface functions with this prefix construct a type
    pub provide_prefix: String,
    pub provider_suffix: String,
    pub resolver_suffix: String,
    pub resolve_prefix: String,
    pub intercept_prefix: String,
    /// Parameter name of the builder callback passed to intercept functions
    pub builder_name: String,
}
impl Default for Naming {
    fn default() -> Self {
        Self {
            provide_prefix: "provide".to_string(),
            provider_suffix: "Provider".to_string(),
            resolver_suffix: "Resolver".to_string(),
            resolve_prefix: "resolve".to_string(),
            intercept_prefix: "intercept".to_string(),
            builder_name: "build".to_string(),
        }
    }
}

impl Naming {
    /// `AppProvider` -> `AppResolver`, `Services` -> `ServicesResolver`
    pub fn resolver_name(&self, provider_name: &str) -> String {
        let stem = if self.provider_suffix.is_empty() {
            provider_name
        } else {
            provider_name
                .strip_suffix(self.provider_suffix.as_str())
                .unwrap_or(provider_name)
        };
        format!("{stem}{}", self.resolver_suffix)
    }

    pub fn resolve_function(&self, type_name: &str) -> String {
        format!("{}{type_name}", self.resolve_prefix)
    }

    pub fn intercept_function(&self, type_name: &str) -> String {
        format!("{}{type_name}", self.intercept_prefix)
    }
}

/// Layout options for the code emitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitOptions {
    /// Spaces per indentation level
    pub indent: usize,
    /// Emit declarations of the marker interfaces before the resolvers
    pub preamble: bool,
    /// Emit the imports of the declaring files
    pub imports: bool,
}
impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            preamble: true,
            imports: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("AppProvider", "AppResolver")]
    #[case("Services", "ServicesResolver")]
    #[case("ProviderOfProvider", "ProviderOfResolver")]
    fn resolver_name_replaces_suffix(#[case] provider: &str, #[case] expected: &str) {
        assert_eq!(Naming::default().resolver_name(provider), expected);
    }

    #[rstest]
    #[case("any APIClient", "APIClient")]
    #[case("some  Repository", "Repository")]
    #[case("APIClient", "APIClient")]
    #[case("anything", "anything")]
    #[case(" URLSession ", "URLSession")]
    fn bare_type_name_strips_one_qualifier(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(GeneratorConfig::default().bare_type_name(input), expected);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_indent() {
        let mut config = GeneratorConfig::default();
        config.emit.indent = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "emit.indent",
                ..
            }
        ));
    }

    #[test]
    fn rejects_clashing_prefixes() {
        let mut config = GeneratorConfig::default();
        config.naming.intercept_prefix = config.naming.resolve_prefix.clone();

        assert!(config.validate().is_err());
    }
}
