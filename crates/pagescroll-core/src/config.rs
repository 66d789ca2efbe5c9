use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Process-wide scroll defaults
///
/// Every field may be overridden per request through `ScrollOptions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animation duration in milliseconds (takes priority over `speed`)
    #[serde(default)]
    pub duration_ms: Option<u64>,
    /// Scroll speed in positions per second, used when no duration is set
    #[serde(default)]
    pub speed: Option<f64>,
    /// Whether user input may cancel a running animation
    #[serde(default = "default_true")]
    pub interruptible: bool,
    /// Namespace used when a request does not name one
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Easing curve
    #[serde(default)]
    pub easing: EasingType,
    /// Distances below this are jumped instead of animated
    #[serde(default = "default_min_scroll_distance")]
    pub min_scroll_distance: f64,
    /// Tick interval in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Scroll vertically (false = horizontally)
    #[serde(default = "default_true")]
    pub vertical: bool,
    /// Offset subtracted from every resolved target position
    #[serde(default)]
    pub scroll_offset: f64,
    /// Keys whose release interrupts a running animation (Vim-style notation)
    #[serde(default = "default_interrupt_keys")]
    pub interrupt_keys: Vec<String>,
    /// Diagnostic verbosity
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            duration_ms: None,
            speed: None,
            interruptible: default_true(),
            namespace: default_namespace(),
            easing: EasingType::default(),
            min_scroll_distance: default_min_scroll_distance(),
            interval_ms: default_interval_ms(),
            vertical: default_true(),
            scroll_offset: 0.0,
            interrupt_keys: default_interrupt_keys(),
            log_level: LogLevel::default(),
        }
    }
}

/// Easing curve selectable from the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingType {
    /// Stay at the start, snap to the end on the last tick
    None,
    Linear,
    /// Quadratic ease-in-out
    #[default]
    QuadInOut,
    /// Cubic ease-out
    Cubic,
    /// Quintic ease-out
    Quintic,
    /// Exponential ease-out
    EaseOut,
    /// Exponential ease-in-out
    ExpoInOut,
}

impl EasingType {
    pub const ALL: [EasingType; 7] = [
        EasingType::None,
        EasingType::Linear,
        EasingType::QuadInOut,
        EasingType::Cubic,
        EasingType::Quintic,
        EasingType::EaseOut,
        EasingType::ExpoInOut,
    ];

    /// Name as written in the config file
    pub fn name(self) -> &'static str {
        match self {
            EasingType::None => "none",
            EasingType::Linear => "linear",
            EasingType::QuadInOut => "quad-in-out",
            EasingType::Cubic => "cubic",
            EasingType::Quintic => "quintic",
            EasingType::EaseOut => "ease-out",
            EasingType::ExpoInOut => "expo-in-out",
        }
    }
}

impl std::str::FromStr for EasingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EasingType::ALL
            .into_iter()
            .find(|easing| easing.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<_> = EasingType::ALL.iter().map(|e| e.name()).collect();
                format!("unknown easing '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Gate for the diagnostic side channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Never emit diagnostics
    Silent,
    /// Emit diagnostics in debug builds only
    #[default]
    DebugOnly,
    /// Always emit diagnostics
    Always,
}

impl LogLevel {
    /// Whether a diagnostic should be emitted under this level
    pub fn enabled(self) -> bool {
        match self {
            LogLevel::Silent => false,
            LogLevel::DebugOnly => cfg!(debug_assertions),
            LogLevel::Always => true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_min_scroll_distance() -> f64 {
    2.0
}

fn default_interval_ms() -> u64 {
    10
}

fn default_interrupt_keys() -> Vec<String> {
    [
        "<Space>", "<Esc>", "<Tab>", "<CR>", "<PageUp>", "<PageDown>", "<Home>", "<End>", "<Up>",
        "<Right>", "<Left>", "<Down>",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

/// Duration used when neither a duration nor a speed is configured anywhere
pub const DEFAULT_DURATION_MS: u64 = 1250;

impl ScrollConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Serialize configuration as TOML text
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/pagescroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pagescroll")
            .join("config.toml")
    }

    /// Tick interval as Duration
    #[inline]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
