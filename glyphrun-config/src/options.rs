//! The recognized font option set.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::defaults;
use crate::error::ConfigError;

/// Options attached to a font at creation time.
///
/// Options are immutable once the font is loaded. Every field has a default,
/// so `{}` is a complete option object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontOptions {
    /// Apply outline hinting when rasterizing atlas glyphs
    pub hinting: bool,

    /// Anti-aliased coverage; when off, coverage is thresholded to 0 or 255
    pub antialias: bool,

    /// ISO 15924 script tag used when neither annotations nor neighbouring
    /// text determine a run's script (e.g. "Latn", "Arab")
    #[serde(alias = "default-script")]
    pub default_script: Option<String>,

    /// OpenType feature overrides applied on top of the shaping defaults.
    /// A value of 0 disables the feature, 1 enables it, larger values select
    /// an alternate.
    #[serde(alias = "feature-overrides")]
    pub features: BTreeMap<String, u32>,

    /// Rasterization size in pixels per em
    pub render_size: f32,

    /// Empty pixels kept around each glyph in the atlas
    pub margin: u32,

    /// Width and height of each atlas page in pixels
    pub page_size: u32,

    /// Number of shaped texts remembered per font (0 disables the cache)
    pub shape_cache_size: usize,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            hinting: defaults::hinting(),
            antialias: defaults::antialias(),
            default_script: defaults::default_script(),
            features: defaults::features(),
            render_size: defaults::render_size(),
            margin: defaults::margin(),
            page_size: defaults::page_size(),
            shape_cache_size: defaults::shape_cache_size(),
        }
    }
}

impl FontOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode options from a JSON object.
    ///
    /// Keys use snake case; `default-script` and `feature-overrides` are
    /// accepted as spellings of `default_script` and `features`.
    /// Unrecognized keys are ignored so that newer hosts can pass options an
    /// older engine does not know about. A recognized key whose value has the
    /// wrong type keeps its default and logs a warning. The result is passed
    /// through [`FontOptions::validate`].
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Object(map) => Ok(Self::from_map(&map)),
            Value::Null => Err(ConfigError::NotAnObject("null")),
            Value::Bool(_) => Err(ConfigError::NotAnObject("boolean")),
            Value::Number(_) => Err(ConfigError::NotAnObject("number")),
            Value::String(_) => Err(ConfigError::NotAnObject("string")),
            Value::Array(_) => Err(ConfigError::NotAnObject("array")),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let mut options = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "hinting" => assign(&mut options.hinting, key, value),
                "antialias" => assign(&mut options.antialias, key, value),
                "default_script" | "default-script" => {
                    assign(&mut options.default_script, key, value)
                }
                "features" | "feature-overrides" => assign(&mut options.features, key, value),
                "render_size" => assign(&mut options.render_size, key, value),
                "margin" => assign(&mut options.margin, key, value),
                "page_size" => assign(&mut options.page_size, key, value),
                "shape_cache_size" => assign(&mut options.shape_cache_size, key, value),
                _ => log::debug!("Ignoring unrecognized font option '{}'", key),
            }
        }
        options.validate()
    }

    /// Clamp numeric options into their supported ranges and drop malformed
    /// script and feature tags.
    #[must_use]
    pub fn validate(mut self) -> Self {
        if !(defaults::MIN_PAGE_SIZE..=defaults::MAX_PAGE_SIZE).contains(&self.page_size) {
            let clamped = self
                .page_size
                .clamp(defaults::MIN_PAGE_SIZE, defaults::MAX_PAGE_SIZE);
            log::warn!(
                "page_size {} outside [{}, {}], using {}",
                self.page_size,
                defaults::MIN_PAGE_SIZE,
                defaults::MAX_PAGE_SIZE,
                clamped
            );
            self.page_size = clamped;
        }

        if !self.render_size.is_finite() {
            log::warn!("render_size is not finite, using default");
            self.render_size = defaults::render_size();
        } else if !(defaults::MIN_RENDER_SIZE..=defaults::MAX_RENDER_SIZE)
            .contains(&self.render_size)
        {
            let clamped = self
                .render_size
                .clamp(defaults::MIN_RENDER_SIZE, defaults::MAX_RENDER_SIZE);
            log::warn!("render_size {} out of range, using {}", self.render_size, clamped);
            self.render_size = clamped;
        }

        if self.margin > defaults::MAX_MARGIN {
            log::warn!("margin {} too large, using {}", self.margin, defaults::MAX_MARGIN);
            self.margin = defaults::MAX_MARGIN;
        }

        self.default_script = self.default_script.take().and_then(|tag| {
            let normalized = normalize_script_tag(&tag);
            if normalized.is_none() {
                log::warn!("Ignoring invalid default_script '{}'", tag);
            }
            normalized
        });

        self.features.retain(|tag, _| {
            let valid = is_feature_tag(tag);
            if !valid {
                log::warn!("Ignoring invalid feature tag '{}'", tag);
            }
            valid
        });

        self
    }

    pub fn with_hinting(mut self, hinting: bool) -> Self {
        self.hinting = hinting;
        self
    }

    pub fn with_default_script(mut self, script: &str) -> Self {
        self.default_script = Some(script.to_string());
        self
    }

    pub fn with_feature(mut self, tag: &str, value: u32) -> Self {
        self.features.insert(tag.to_string(), value);
        self
    }

    pub fn with_render_size(mut self, render_size: f32) -> Self {
        self.render_size = render_size;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_shape_cache_size(mut self, entries: usize) -> Self {
        self.shape_cache_size = entries;
        self
    }
}

/// Overwrite `slot` with `value` if it deserializes, otherwise keep the
/// current value.
fn assign<T: DeserializeOwned>(slot: &mut T, key: &str, value: &Value) {
    match T::deserialize(value) {
        Ok(parsed) => *slot = parsed,
        Err(e) => log::warn!("Font option '{}' has an invalid value ({}), keeping default", key, e),
    }
}

/// Normalize an ISO 15924 tag to title case ("latn" -> "Latn").
///
/// Returns `None` unless the tag is exactly four ASCII letters.
pub fn normalize_script_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.len() != 4 || !tag.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let mut out = String::with_capacity(4);
    for (i, c) in tag.chars().enumerate() {
        if i == 0 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    Some(out)
}

/// OpenType feature tags are four printable ASCII characters.
pub fn is_feature_tag(tag: &str) -> bool {
    tag.len() == 4 && tag.bytes().all(|b| (0x20..=0x7E).contains(&b))
}
