use crate::error::{MsglogError, MsglogResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

/// Key of the preset used when a requested key is unknown.
pub const DEFAULT_STYLE_KEY: &str = "imessage";

/// Layout rules shared by every preset. Colors, radius, shadow and font come
/// from the `--mlg-*` variables set by the preset's scoped rule.
pub const BASE_CSS: &str = r#"
.mlg-wrap { display: flex; justify-content: center; padding: 14px; box-sizing: border-box; overflow: hidden; }
.mlg { width: 100%; max-width: 560px; background: var(--mlg-bg); color: var(--mlg-text); border-radius: 22px; padding: 18px 16px; box-shadow: var(--mlg-shadow); box-sizing: border-box; font-family: var(--mlg-font, 'Inter', sans-serif); border: var(--mlg-border, 1px solid rgba(0, 0, 0, 0.06)); overflow: hidden; }
.mlg-thread { display: flex; flex-direction: column; gap: 14px; width: 100%; }
.mlg-message { display: flex; gap: 10px; align-items: flex-start; font-size: 15px; line-height: 1.5; width: 100%; }
.mlg-message:last-child { margin-bottom: 0; }
.mlg-message.mlg-me { flex-direction: row-reverse; }
.mlg-avatar { width: 36px; height: 36px; min-width: 36px; min-height: 36px; border-radius: 50%; object-fit: cover; object-position: center; background: #cbd5e1; border: 1px solid rgba(255, 255, 255, 0.12); flex: 0 0 36px; margin-top: 2px; aspect-ratio: 1 / 1; }
.mlg-bubble { flex: 0 1 auto; width: auto; max-width: 80%; padding: 12px 15px; border-radius: var(--mlg-radius); background: var(--mlg-them-bg); color: var(--mlg-them-color); box-shadow: 0 4px 14px rgba(0, 0, 0, 0.12); word-break: break-word; overflow-wrap: break-word; white-space: pre-wrap; border: var(--mlg-bubble-border, 1px solid rgba(0, 0, 0, 0.04)); }
.mlg-message.mlg-me .mlg-bubble { background: var(--mlg-me-bg); color: var(--mlg-me-color); }
.mlg-bubble a { color: inherit; text-decoration: underline; }
.mlg-bubble--image { padding: 4px; background: transparent; box-shadow: none; border: none; }
.mlg-bubble-img { max-width: 220px; max-height: 280px; border-radius: var(--mlg-radius); display: block; object-fit: cover; }
@media (max-width: 720px) {
  .mlg-wrap { padding: 10px; }
  .mlg { max-width: 100%; border-radius: 18px; padding: 14px 12px; }
  .mlg-message { gap: 8px; font-size: 14px; }
  .mlg-bubble { max-width: 85%; padding: 11px 13px; line-height: 1.45; }
  .mlg-avatar { width: 32px; height: 32px; min-width: 32px; min-height: 32px; flex: 0 0 32px; aspect-ratio: 1 / 1; }
}
"#;

/// A named chat-app theme: a label plus `--mlg-*` variable assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePreset {
    pub key: String,
    pub label: String,
    pub vars: BTreeMap<String, String>,
}

impl StylePreset {
    pub fn new(key: &str, label: &str, vars: &[(&str, &str)]) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            vars: vars
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// CSS class the preset's variables are scoped to.
    pub fn class_name(&self) -> String {
        format!("mlg-{}", self.key)
    }

    /// The preset's variables as one rule scoped to `.mlg.mlg-{key}`.
    pub fn scoped_rule(&self) -> String {
        let vars = self
            .vars
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ");
        format!(".mlg.{} {{ {} }}", self.class_name(), vars)
    }
}

/// On-disk shape of a custom registry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RegistryConfig {
    default: Option<String>,
    include_builtin: Option<bool>,
    presets: Vec<StylePreset>,
}

/// Lookup table from style key to preset, with a guaranteed fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRegistry {
    presets: Vec<StylePreset>,
    default_index: usize,
}

impl StyleRegistry {
    /// Build a registry. Fails if any preset is invalid or `default_key` is not among them.
    pub fn new(presets: Vec<StylePreset>, default_key: &str) -> MsglogResult<Self> {
        validate_presets(&presets)?;
        let default_index = presets
            .iter()
            .position(|p| p.key == default_key)
            .ok_or_else(|| MsglogError::MissingDefaultPreset {
                key: default_key.to_string(),
            })?;
        Ok(Self {
            presets,
            default_index,
        })
    }

    /// The five built-in chat-app presets, `imessage` as default.
    pub fn builtin() -> &'static StyleRegistry {
        static BUILTIN: OnceLock<StyleRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| StyleRegistry {
            presets: builtin_presets(),
            default_index: 0,
        })
    }

    /// Load a registry from YAML. Built-in presets are included unless
    /// `include_builtin: false`; a custom preset with a built-in key replaces it.
    pub fn from_yaml(yaml: &str) -> MsglogResult<Self> {
        let config: RegistryConfig = serde_yaml::from_str(yaml)?;
        let mut presets = if config.include_builtin.unwrap_or(true) {
            builtin_presets()
        } else {
            Vec::new()
        };
        let custom_count = config.presets.len();
        let mut seen = HashSet::new();
        for preset in config.presets {
            if !seen.insert(preset.key.clone()) {
                return Err(MsglogError::DuplicatePreset { key: preset.key });
            }
            match presets.iter_mut().find(|p| p.key == preset.key) {
                Some(existing) => *existing = preset,
                None => presets.push(preset),
            }
        }
        let default_key = config
            .default
            .unwrap_or_else(|| DEFAULT_STYLE_KEY.to_string());
        let registry = Self::new(presets, &default_key)?;
        tracing::info!(
            custom = custom_count,
            total = registry.presets.len(),
            default_key = %default_key,
            "loaded style registry"
        );
        Ok(registry)
    }

    pub fn default_preset(&self) -> &StylePreset {
        &self.presets[self.default_index]
    }

    pub fn get(&self, key: &str) -> Option<&StylePreset> {
        self.presets.iter().find(|p| p.key == key)
    }

    /// Resolve a style key, falling back to the default preset for unknown keys.
    pub fn resolve(&self, key: &str) -> &StylePreset {
        self.get(key).unwrap_or_else(|| self.default_preset())
    }

    /// Base layout rules followed by the resolved preset's scoped rule.
    pub fn compile_style_block(&self, key: &str) -> String {
        format!("{}{}", BASE_CSS, self.resolve(key).scoped_rule())
    }

    /// Presets in registration order.
    pub fn presets(&self) -> impl Iterator<Item = &StylePreset> {
        self.presets.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.key.as_str())
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

/// Resolve a key against the built-in registry.
pub fn resolve_style(key: &str) -> &'static StylePreset {
    StyleRegistry::builtin().resolve(key)
}

/// Compile the stylesheet for a key against the built-in registry.
pub fn compile_style_block(key: &str) -> String {
    StyleRegistry::builtin().compile_style_block(key)
}

fn builtin_presets() -> Vec<StylePreset> {
    vec![
        StylePreset::new(
            "imessage",
            "iMessage",
            &[
                ("--mlg-bg", "#ffffff"),
                ("--mlg-text", "#000000"),
                ("--mlg-me-bg", "#007aff"),
                ("--mlg-me-color", "#ffffff"),
                ("--mlg-them-bg", "#e9e9eb"),
                ("--mlg-them-color", "#000000"),
                ("--mlg-radius", "18px"),
                ("--mlg-shadow", "none"),
                (
                    "--mlg-font",
                    "-apple-system, BlinkMacSystemFont, 'SF Pro Text', 'Helvetica Neue', sans-serif",
                ),
            ],
        ),
        StylePreset::new(
            "kakao",
            "KakaoTalk",
            &[
                ("--mlg-bg", "#b2c7d9"),
                ("--mlg-text", "#000000"),
                ("--mlg-me-bg", "#fee500"),
                ("--mlg-me-color", "#000000"),
                ("--mlg-them-bg", "#ffffff"),
                ("--mlg-them-color", "#000000"),
                ("--mlg-radius", "16px"),
                ("--mlg-shadow", "none"),
                (
                    "--mlg-font",
                    "'Apple SD Gothic Neo', 'Noto Sans KR', 'Malgun Gothic', sans-serif",
                ),
            ],
        ),
        StylePreset::new(
            "instagram",
            "Instagram DM",
            &[
                ("--mlg-bg", "#0b0b0b"),
                ("--mlg-text", "#f5f5f5"),
                (
                    "--mlg-me-bg",
                    "linear-gradient(135deg, #4c68d7 0%, #c56cd6 100%)",
                ),
                ("--mlg-me-color", "#ffffff"),
                ("--mlg-them-bg", "#262626"),
                ("--mlg-them-color", "#f5f5f5"),
                ("--mlg-radius", "18px"),
                ("--mlg-shadow", "0 16px 34px rgba(0, 0, 0, 0.38)"),
                ("--mlg-border", "1px solid rgba(255, 255, 255, 0.08)"),
                ("--mlg-bubble-border", "1px solid rgba(255, 255, 255, 0.06)"),
                (
                    "--mlg-font",
                    "'Segoe UI', -apple-system, BlinkMacSystemFont, Roboto, Helvetica, Arial, sans-serif",
                ),
            ],
        ),
        StylePreset::new(
            "twitter",
            "Twitter DM",
            &[
                ("--mlg-bg", "#15202b"),
                ("--mlg-text", "#ffffff"),
                ("--mlg-me-bg", "#1d9bf0"),
                ("--mlg-me-color", "#ffffff"),
                ("--mlg-them-bg", "#253341"),
                ("--mlg-them-color", "#ffffff"),
                ("--mlg-radius", "16px"),
                ("--mlg-shadow", "none"),
                (
                    "--mlg-font",
                    "'Segoe UI', -apple-system, BlinkMacSystemFont, sans-serif",
                ),
            ],
        ),
        StylePreset::new(
            "line",
            "LINE",
            &[
                ("--mlg-bg", "#7494a5"),
                ("--mlg-text", "#000000"),
                ("--mlg-me-bg", "#06c755"),
                ("--mlg-me-color", "#ffffff"),
                ("--mlg-them-bg", "#ffffff"),
                ("--mlg-them-color", "#000000"),
                ("--mlg-radius", "18px"),
                ("--mlg-shadow", "none"),
                ("--mlg-font", "'Hiragino Kaku Gothic Pro', 'Meiryo', sans-serif"),
            ],
        ),
    ]
}

fn preset_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").unwrap())
}

fn variable_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^--[A-Za-z0-9-]+$").unwrap())
}

/// Characters that would let a value escape its declaration or the style element.
const FORBIDDEN_VALUE_CHARS: &[char] = &[';', '{', '}', '<', '>'];

fn validate_presets(presets: &[StylePreset]) -> MsglogResult<()> {
    let mut seen = HashSet::new();
    for preset in presets {
        validate_preset(preset)?;
        if !seen.insert(preset.key.as_str()) {
            return Err(MsglogError::DuplicatePreset {
                key: preset.key.clone(),
            });
        }
    }
    Ok(())
}

fn validate_preset(preset: &StylePreset) -> MsglogResult<()> {
    if !preset_key_re().is_match(&preset.key) {
        return Err(MsglogError::InvalidPresetKey {
            key: preset.key.clone(),
        });
    }
    if preset.label.trim().is_empty() {
        return Err(MsglogError::MissingLabel {
            key: preset.key.clone(),
        });
    }
    if preset.vars.is_empty() {
        return Err(MsglogError::EmptyPreset {
            key: preset.key.clone(),
        });
    }
    for (name, value) in &preset.vars {
        if !variable_name_re().is_match(name) {
            return Err(MsglogError::InvalidVariableName {
                key: preset.key.clone(),
                name: name.clone(),
            });
        }
        if value.trim().is_empty() {
            return Err(MsglogError::InvalidVariableValue {
                key: preset.key.clone(),
                name: name.clone(),
                reason: "value is empty".to_string(),
            });
        }
        if let Some(c) = value.chars().find(|c| FORBIDDEN_VALUE_CHARS.contains(c)) {
            return Err(MsglogError::InvalidVariableValue {
                key: preset.key.clone(),
                name: name.clone(),
                reason: format!("character '{}' is not allowed", c),
            });
        }
    }
    Ok(())
}
