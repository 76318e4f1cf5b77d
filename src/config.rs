/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete;
/// values outside their legal range are replaced by the default with a warning.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

use crate::domain::game::{MAX_DISKS, MIN_DISKS};

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub disks: u8,
    pub display: DisplayConfig,
    pub sound: SoundConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    pub style: DiskStyle,
    pub tick_rate_ms: u64,
    pub demo_interval_ticks: u32, // ticks between demo presses
}

#[derive(Clone, Debug, PartialEq)]
pub struct SoundConfig {
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub left: Vec<String>,
    pub middle: Vec<String>,
    pub right: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

/// How disks are drawn. All styles read the same game snapshot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DiskStyle {
    /// Solid colored bars, size number in the middle.
    Disks,
    /// Colored block glyphs.
    Blocks,
    /// Plain Unicode outlines, no color.
    Glyphs,
}

impl DiskStyle {
    pub fn from_name(s: &str) -> Option<DiskStyle> {
        match s.trim().to_lowercase().as_str() {
            "disks" | "disk" | "graphical" => Some(DiskStyle::Disks),
            "blocks" | "block" => Some(DiskStyle::Blocks),
            "glyphs" | "glyph" | "unicode" => Some(DiskStyle::Glyphs),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DiskStyle::Disks => "disks",
            DiskStyle::Blocks => "blocks",
            DiskStyle::Glyphs => "glyphs",
        }
    }

    /// Next style in the `T` cycle.
    pub fn next(self) -> DiskStyle {
        match self {
            DiskStyle::Disks => DiskStyle::Blocks,
            DiskStyle::Blocks => DiskStyle::Glyphs,
            DiskStyle::Glyphs => DiskStyle::Disks,
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    sound: TomlSound,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_disks")]
    disks: u8,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_style")]
    style: String,
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_demo_interval")]
    demo_interval_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_sound_enabled")]
    enabled: bool,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_left")]
    left: Vec<String>,
    #[serde(default = "default_middle")]
    middle: Vec<String>,
    #[serde(default = "default_right")]
    right: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

// ── Defaults ──

fn default_disks() -> u8 { 3 }
fn default_style() -> String { "disks".into() }
fn default_tick_rate() -> u64 { 50 }
fn default_demo_interval() -> u32 { 8 } // 0.4s per press at 50ms
fn default_sound_enabled() -> bool { true }

fn default_left() -> Vec<String> { vec!["X".into(), "L1".into()] }
fn default_middle() -> Vec<String> { vec!["Y".into(), "A".into()] }
fn default_right() -> Vec<String> { vec!["B".into(), "R1".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame { disks: default_disks() }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            style: default_style(),
            tick_rate_ms: default_tick_rate(),
            demo_interval_ticks: default_demo_interval(),
        }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: default_sound_enabled() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            left: default_left(),
            middle: default_middle(),
            right: default_right(),
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::resolve(TomlConfig::default())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) ~/.local/share/hanoi, (4) /usr/share/hanoi.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        load_from(&search_dirs)
    }

    /// Parse config text. Unknown or out-of-range values fall back per key.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::resolve(toml_cfg))
    }

    fn resolve(toml_cfg: TomlConfig) -> Self {
        let disks = if (MIN_DISKS..=MAX_DISKS).contains(&toml_cfg.game.disks) {
            toml_cfg.game.disks
        } else {
            warn!(
                disks = toml_cfg.game.disks,
                "config: disks must be {MIN_DISKS}..={MAX_DISKS}, using {}",
                default_disks()
            );
            default_disks()
        };

        let style = DiskStyle::from_name(&toml_cfg.display.style).unwrap_or_else(|| {
            warn!(style = %toml_cfg.display.style, "config: unknown disk style, using disks");
            DiskStyle::Disks
        });

        GameConfig {
            disks,
            display: DisplayConfig {
                style,
                tick_rate_ms: toml_cfg.display.tick_rate_ms.max(1),
                demo_interval_ticks: toml_cfg.display.demo_interval_ticks.max(1),
            },
            sound: SoundConfig {
                enabled: toml_cfg.sound.enabled,
            },
            gamepad: GamepadConfig {
                left: toml_cfg.gamepad.left,
                middle: toml_cfg.gamepad.middle,
                right: toml_cfg.gamepad.right,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable (symlinks resolved)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/hanoi");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/hanoi");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories. The first readable
/// file wins, even when it fails to parse.
fn load_from(search_dirs: &[PathBuf]) -> GameConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match GameConfig::from_toml_str(&text) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "config parse error");
                    eprintln!("Warning: config.toml parse error: {e}");
                    eprintln!("Using default settings.");
                    return GameConfig::default();
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config unreadable");
                eprintln!("Warning: could not read {}: {e}", path.display());
            }
        }
    }
    GameConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.disks, 3);
        assert_eq!(cfg.display.style, DiskStyle::Disks);
        assert_eq!(cfg.display.tick_rate_ms, 50);
        assert!(cfg.sound.enabled);
        assert_eq!(cfg.gamepad.left, vec!["X".to_string(), "L1".to_string()]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[game]\ndisks = 6\n\n[display]\nstyle = \"glyphs\"\n",
        )
        .unwrap();
        assert_eq!(cfg.disks, 6);
        assert_eq!(cfg.display.style, DiskStyle::Glyphs);
        assert_eq!(cfg.display.demo_interval_ticks, 8);
        assert_eq!(cfg.gamepad.confirm, vec!["Start".to_string()]);
    }

    #[test]
    fn out_of_range_disks_fall_back() {
        let cfg = GameConfig::from_toml_str("[game]\ndisks = 12\n").unwrap();
        assert_eq!(cfg.disks, 3);
        let cfg = GameConfig::from_toml_str("[game]\ndisks = 2\n").unwrap();
        assert_eq!(cfg.disks, 3);
    }

    #[test]
    fn unknown_style_falls_back() {
        let cfg = GameConfig::from_toml_str("[display]\nstyle = \"sparkles\"\n").unwrap();
        assert_eq!(cfg.display.style, DiskStyle::Disks);
    }

    #[test]
    fn zero_rates_are_clamped() {
        let cfg = GameConfig::from_toml_str(
            "[display]\ntick_rate_ms = 0\ndemo_interval_ticks = 0\n",
        )
        .unwrap();
        assert_eq!(cfg.display.tick_rate_ms, 1);
        assert_eq!(cfg.display.demo_interval_ticks, 1);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(GameConfig::from_toml_str("[game\ndisks = ").is_err());
        assert!(GameConfig::from_toml_str("[game]\ndisks = \"many\"\n").is_err());
    }

    #[test]
    fn load_reads_the_first_file_found() {
        let root = std::env::temp_dir().join(format!("hanoi-config-{}", std::process::id()));
        let (first, second) = (root.join("first"), root.join("second"));
        std::fs::create_dir_all(&first).unwrap();
        std::fs::create_dir_all(&second).unwrap();
        std::fs::write(second.join("config.toml"), "[game]\ndisks = 5\n").unwrap();
        assert_eq!(load_from(&[first.clone(), second.clone()]).disks, 5);

        // A broken file earlier in the search order wins and falls back.
        std::fs::write(first.join("config.toml"), "[game\n").unwrap();
        assert_eq!(load_from(&[first, second]), GameConfig::default());
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn style_names_and_cycle() {
        assert_eq!(DiskStyle::from_name("Unicode"), Some(DiskStyle::Glyphs));
        assert_eq!(DiskStyle::from_name(" blocks "), Some(DiskStyle::Blocks));
        assert_eq!(DiskStyle::from_name("nope"), None);
        let mut style = DiskStyle::Disks;
        for _ in 0..3 {
            style = style.next();
        }
        assert_eq!(style, DiskStyle::Disks);
        assert_eq!(DiskStyle::Blocks.name(), "blocks");
    }
}
