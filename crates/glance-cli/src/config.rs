use glance_core::{AnnotationStyle, DEFAULT_SIMILARITY_THRESHOLD};
use std::path::PathBuf;

/// CLI configuration, loaded from environment variables.
pub struct Config {
    /// AWS region override; `None` defers to the SDK provider chain.
    pub region: Option<String>,
    /// Font used for face labels.
    pub font_path: PathBuf,
    /// Label size in pixels.
    pub font_size: f32,
    /// Default similarity threshold (percent) for `compare`.
    pub similarity_threshold: f32,
}

impl Config {
    /// Load configuration from `GLANCE_*` environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let style = AnnotationStyle::default();
        Self {
            region: lookup("GLANCE_REGION").filter(|r| !r.is_empty()),
            font_path: lookup("GLANCE_FONT_PATH")
                .map(PathBuf::from)
                .unwrap_or(style.font_path),
            font_size: parse_or(&lookup, "GLANCE_FONT_SIZE", style.font_size),
            similarity_threshold: parse_or(
                &lookup,
                "GLANCE_SIMILARITY_THRESHOLD",
                DEFAULT_SIMILARITY_THRESHOLD,
            ),
        }
    }

    /// Annotation style with the configured font.
    pub fn annotation_style(&self) -> AnnotationStyle {
        AnnotationStyle {
            font_path: self.font_path.clone(),
            font_size: self.font_size,
            ..AnnotationStyle::default()
        }
    }
}

fn parse_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f32) -> f32 {
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert!(config.region.is_none());
        assert_eq!(config.font_path, PathBuf::from("Ubuntu-R.ttf"));
        assert_eq!(config.font_size, 20.0);
        assert_eq!(config.similarity_threshold, 80.0);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("GLANCE_REGION", "sa-east-1"),
            ("GLANCE_FONT_PATH", "/usr/share/fonts/DejaVuSans.ttf"),
            ("GLANCE_FONT_SIZE", "28"),
            ("GLANCE_SIMILARITY_THRESHOLD", "92.5"),
        ]);
        assert_eq!(config.region.as_deref(), Some("sa-east-1"));
        assert_eq!(config.font_size, 28.0);
        assert_eq!(config.similarity_threshold, 92.5);

        let style = config.annotation_style();
        assert_eq!(style.font_path, PathBuf::from("/usr/share/fonts/DejaVuSans.ttf"));
        assert_eq!(style.font_size, 28.0);
        assert_eq!(style.stroke_width, 3);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = config_from(&[
            ("GLANCE_FONT_SIZE", "big"),
            ("GLANCE_SIMILARITY_THRESHOLD", ""),
            ("GLANCE_REGION", ""),
        ]);
        assert_eq!(config.font_size, 20.0);
        assert_eq!(config.similarity_threshold, 80.0);
        assert!(config.region.is_none());
    }
}
