use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use pagehost::{ClassName, ElementId, ScrollBehavior, Selector};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// Keyboard keys, named as `KeyboardEvent.key` reports them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum Key {
    #[strum(serialize = "ArrowLeft", serialize = "left")]
    ArrowLeft,
    #[strum(serialize = "ArrowRight", serialize = "right")]
    ArrowRight,
    #[strum(serialize = "ArrowUp", serialize = "up")]
    ArrowUp,
    #[strum(serialize = "ArrowDown", serialize = "down")]
    ArrowDown,
    Home,
    End,
    Enter,
    Escape,
    Tab,
    #[strum(serialize = " ", serialize = "Space")]
    Space,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CarouselConfig {
    pub root: Selector,
    pub track: Selector,
    pub slide: Selector,
    pub prev: Selector,
    pub next: Selector,
    pub dots: Selector,
    pub viewport: Selector,
    pub dot_class: ClassName,
    pub active_class: ClassName,
    pub autoplay_interval_ms: u64,
    pub swipe_threshold: f64,
    pub fallback_label: String,
    pub next_key: Key,
    pub prev_key: Key,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            root: Selector::from(".skills-carousel"),
            track: Selector::from(".sc-track"),
            slide: Selector::from(".sc-slide"),
            prev: Selector::from(".sc-prev"),
            next: Selector::from(".sc-next"),
            dots: Selector::from(".sc-dots"),
            viewport: Selector::from(".sc-viewport"),
            dot_class: ClassName::from("sc-dot"),
            active_class: ClassName::from("is-active"),
            autoplay_interval_ms: 2600,
            swipe_threshold: 35.0,
            fallback_label: "skill".to_string(),
            next_key: Key::ArrowRight,
            prev_key: Key::ArrowLeft,
        }
    }
}

impl CarouselConfig {
    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BackToTopConfig {
    pub button_id: ElementId,
    pub threshold: f64,
    pub behavior: ScrollBehavior,
}

impl Default for BackToTopConfig {
    fn default() -> Self {
        Self {
            button_id: ElementId::from("toTop"),
            threshold: 500.0,
            behavior: ScrollBehavior::Smooth,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub back_to_top: BackToTopConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "vitrine", "vitrine").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Resolves an explicit path or falls back to the platform config location.
pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => get_config_path(),
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("VITRINE")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default(explicit: Option<&Path>) -> Config {
    let loaded = resolve_path(explicit).and_then(|path| load_config(&path));
    match loaded {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Falling back to default configuration: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config(explicit: Option<&Path>) -> std::io::Result<PathBuf> {
    let path =
        resolve_path(explicit).map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    let file_name = config_path.file_name().map(|n| n.to_os_string());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );
                let touches_config = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);

                if meaningful_event
                    && touches_config
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
