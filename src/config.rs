/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Everything here is aesthetic tuning; the defaults match the classic
/// look and nothing requires a config file to exist.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct EffectsConfig {
    pub egg: EggConfig,
    pub rain: RainConfig,
    pub page: PageConfig,
}

#[derive(Clone, Debug)]
pub struct EggConfig {
    /// Delay before the detector auto-resets after an unlock.
    pub reset_delay_ms: u64,
    /// How long the unlock message stays visible.
    pub message_ms: u64,
}

#[derive(Clone, Debug)]
pub struct RainConfig {
    pub glyph_size: u16,
    pub spawn_depth: i32,
    pub reset_chance: f32,
    pub trail_alpha: f32,
    /// Interval between rain frames.
    pub frame_ms: u64,
    /// Delay between stop() and the one hard surface clear.
    pub clear_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct PageConfig {
    /// Page animation tick (boot-line reveal, flicker rolls).
    pub tick_ms: u64,
    pub flicker_chance: f32,
    pub flicker_ms: u64,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    egg: TomlEgg,
    #[serde(default)]
    rain: TomlRain,
    #[serde(default)]
    page: TomlPage,
}

#[derive(Deserialize, Debug)]
struct TomlEgg {
    #[serde(default = "default_reset_delay")]
    reset_delay_ms: u64,
    #[serde(default = "default_message_ms")]
    message_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlRain {
    #[serde(default = "default_glyph_size")]
    glyph_size: u16,
    #[serde(default = "default_spawn_depth")]
    spawn_depth: i32,
    #[serde(default = "default_reset_chance")]
    reset_chance: f32,
    #[serde(default = "default_trail_alpha")]
    trail_alpha: f32,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_clear_delay")]
    clear_delay_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlPage {
    #[serde(default = "default_tick_ms")]
    tick_ms: u64,
    #[serde(default = "default_flicker_chance")]
    flicker_chance: f32,
    #[serde(default = "default_flicker_ms")]
    flicker_ms: u64,
}

// ── Defaults ──

fn default_reset_delay() -> u64 { 5000 }
fn default_message_ms() -> u64 { 4000 }

fn default_glyph_size() -> u16 { 1 }
fn default_spawn_depth() -> i32 { 100 }
fn default_reset_chance() -> f32 { 0.025 }
fn default_trail_alpha() -> f32 { 0.04 }
fn default_frame_ms() -> u64 { 50 }
fn default_clear_delay() -> u64 { 500 }

fn default_tick_ms() -> u64 { 75 }
fn default_flicker_chance() -> f32 { 0.02 }
fn default_flicker_ms() -> u64 { 50 }

impl Default for TomlEgg {
    fn default() -> Self {
        TomlEgg {
            reset_delay_ms: default_reset_delay(),
            message_ms: default_message_ms(),
        }
    }
}

impl Default for TomlRain {
    fn default() -> Self {
        TomlRain {
            glyph_size: default_glyph_size(),
            spawn_depth: default_spawn_depth(),
            reset_chance: default_reset_chance(),
            trail_alpha: default_trail_alpha(),
            frame_ms: default_frame_ms(),
            clear_delay_ms: default_clear_delay(),
        }
    }
}

impl Default for TomlPage {
    fn default() -> Self {
        TomlPage {
            tick_ms: default_tick_ms(),
            flicker_chance: default_flicker_chance(),
            flicker_ms: default_flicker_ms(),
        }
    }
}

// ── Loading ──

impl EffectsConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        Self::from_toml(toml_cfg)
    }

    #[allow(dead_code)]
    pub fn defaults() -> Self {
        Self::from_toml(TomlConfig::default())
    }

    fn from_toml(t: TomlConfig) -> Self {
        EffectsConfig {
            egg: EggConfig {
                reset_delay_ms: t.egg.reset_delay_ms,
                message_ms: t.egg.message_ms,
            },
            rain: RainConfig {
                glyph_size: t.rain.glyph_size.max(1),
                spawn_depth: t.rain.spawn_depth.max(1),
                reset_chance: t.rain.reset_chance.clamp(0.0, 1.0),
                trail_alpha: t.rain.trail_alpha.clamp(0.0, 1.0),
                frame_ms: t.rain.frame_ms.max(1),
                clear_delay_ms: t.rain.clear_delay_ms,
            },
            page: PageConfig {
                tick_ms: t.page.tick_ms.max(1),
                flicker_chance: t.page.flicker_chance.clamp(0.0, 1.0),
                flicker_ms: t.page.flicker_ms,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_missing_keys() {
        let t: TomlConfig = toml::from_str(
            "[rain]\nreset_chance = 0.1\n\n[egg]\nreset_delay_ms = 2000\n",
        )
        .unwrap();
        let cfg = EffectsConfig::from_toml(t);
        assert!((cfg.rain.reset_chance - 0.1).abs() < f32::EPSILON);
        assert_eq!(cfg.egg.reset_delay_ms, 2000);
        // Untouched keys keep their defaults.
        assert_eq!(cfg.egg.message_ms, 4000);
        assert_eq!(cfg.rain.spawn_depth, 100);
        assert_eq!(cfg.page.tick_ms, 75);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let t: TomlConfig = toml::from_str(
            "[rain]\nreset_chance = 7.5\nglyph_size = 0\nspawn_depth = -3\n",
        )
        .unwrap();
        let cfg = EffectsConfig::from_toml(t);
        assert!((cfg.rain.reset_chance - 1.0).abs() < f32::EPSILON);
        assert_eq!(cfg.rain.glyph_size, 1);
        assert_eq!(cfg.rain.spawn_depth, 1);
    }
}
