use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Named duration tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Quick,
    #[default]
    Standard,
    Deep,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Quick, Preset::Standard, Preset::Deep];

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Quick => "quick",
            Preset::Standard => "standard",
            Preset::Deep => "deep",
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quick" => Ok(Preset::Quick),
            "standard" => Ok(Preset::Standard),
            "deep" => Ok(Preset::Deep),
            other => Err(ValidationError::InvalidValue {
                field: "preset".into(),
                message: format!("expected quick, standard or deep, got '{other}'"),
            }),
        }
    }
}

/// User-tunable timer settings. Durations are in minutes.
///
/// Persisted as camelCase JSON; fields missing from a stored object fall back
/// to their individual defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerSettings {
    pub quick_duration: u32,
    pub standard_duration: u32,
    pub deep_duration: u32,
    pub break_duration: u32,
    pub auto_start_break: bool,
    pub show_minutes_remaining: bool,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            quick_duration: 10,
            standard_duration: 25,
            deep_duration: 50,
            break_duration: 5,
            auto_start_break: true,
            show_minutes_remaining: false,
            sound_enabled: true,
            vibration_enabled: true,
        }
    }
}

impl TimerSettings {
    pub fn duration_min(&self, preset: Preset) -> u32 {
        match preset {
            Preset::Quick => self.quick_duration,
            Preset::Standard => self.standard_duration,
            Preset::Deep => self.deep_duration,
        }
    }

    /// Apply every field present in `patch`.
    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.quick_duration {
            self.quick_duration = v;
        }
        if let Some(v) = patch.standard_duration {
            self.standard_duration = v;
        }
        if let Some(v) = patch.deep_duration {
            self.deep_duration = v;
        }
        if let Some(v) = patch.break_duration {
            self.break_duration = v;
        }
        if let Some(v) = patch.auto_start_break {
            self.auto_start_break = v;
        }
        if let Some(v) = patch.show_minutes_remaining {
            self.show_minutes_remaining = v;
        }
        if let Some(v) = patch.sound_enabled {
            self.sound_enabled = v;
        }
        if let Some(v) = patch.vibration_enabled {
            self.vibration_enabled = v;
        }
    }
}

/// Partial settings update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_start_break: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_minutes_remaining: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibration_enabled: Option<bool>,
}

impl SettingsPatch {
    /// Build a single-field patch from a camelCase key and a raw value.
    ///
    /// The value is read as JSON first (`12`, `true`), then as a bare string.
    pub fn from_pair(key: &str, value: &str) -> Result<Self, ValidationError> {
        let parsed = serde_json::from_str::<serde_json::Value>(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
        let mut obj = serde_json::Map::new();
        obj.insert(key.to_string(), parsed);
        serde_json::from_value(serde_json::Value::Object(obj)).map_err(|e| {
            ValidationError::InvalidValue {
                field: key.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Reject zero-length durations.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let durations = [
            ("quickDuration", self.quick_duration),
            ("standardDuration", self.standard_duration),
            ("deepDuration", self.deep_duration),
            ("breakDuration", self.break_duration),
        ];
        for (field, value) in durations {
            if value == Some(0) {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    message: "duration must be at least one minute".into(),
                });
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
