use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// Everything tunable about a game, loaded from an optional YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub board: BoardConfig,
    pub snake: SnakeConfig,
    pub timing: TimingConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Side of the smallest preset, and of the board a game starts on.
    pub base_size: usize,
    pub preset_count: usize,
    pub preset_step: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_size: 17,
            preset_count: 4,
            preset_step: 2,
        }
    }
}

impl BoardConfig {
    /// Board sides offered by the size menu.
    pub fn presets(&self) -> Vec<usize> {
        (0..self.preset_count)
            .map(|i| self.base_size + i * self.preset_step)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    pub initial_length: usize,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self { initial_length: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub start_interval_ms: f64,
    pub speedup_per_point_ms: f64,
    pub min_interval_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            start_interval_ms: 300.0,
            speedup_per_point_ms: 12.5,
            min_interval_ms: 100.0,
        }
    }
}

impl TimingConfig {
    /// Delay between ticks at `score`: shrinks as the snake grows, down to a floor.
    pub fn tick_interval(&self, score: u32) -> Duration {
        let ms = (self.start_interval_ms - f64::from(score) * self.speedup_per_point_ms)
            .max(self.min_interval_ms);
        Duration::from_micros((ms * 1000.0).round() as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("wrapsnake-scores.yaml"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log output. Nothing is logged when unset, since the terminal is taken
    /// by the game.
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_owned(),
        }
    }
}

impl Config {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read config {}", path.display()))
            }
        };

        Self::from_yaml(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml_ng::from_str(content).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.snake.initial_length >= 1, "snake.initial_length must be at least 1");
        ensure!(self.board.preset_count >= 1, "board.preset_count must be at least 1");
        ensure!(
            self.board.base_size > self.snake.initial_length,
            "board.base_size ({}) must exceed snake.initial_length ({})",
            self.board.base_size,
            self.snake.initial_length
        );
        ensure!(
            self.timing.min_interval_ms > 0.0,
            "timing.min_interval_ms must be positive"
        );
        ensure!(
            self.timing.start_interval_ms >= self.timing.min_interval_ms,
            "timing.start_interval_ms must not be below timing.min_interval_ms"
        );
        ensure!(
            self.timing.speedup_per_point_ms >= 0.0,
            "timing.speedup_per_point_ms must not be negative"
        );
        Ok(())
    }
}
