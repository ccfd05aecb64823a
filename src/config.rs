use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::graphics::canvas::{DEFAULT_ARC_ANGLE_MAX, DEFAULT_ARC_ANGLE_OFFSET};
use crate::graphics::{FontName, Rotation};

/// Largest width or height accepted for the rendered panel.
pub const MAX_DIMENSION: u32 = 4096;

/// Text drawn by the showcase when none is configured.
pub const DEFAULT_TEXT: &str = "Hello";

/// Rendering options that can be set via CLI or config file
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub resolution: Resolution,
    pub family: Family,
    pub rotation: Rotation,
    pub font: FontName,
    pub arc_angle_max: f32,
    pub arc_angle_offset: f32,
    pub text_wrap: bool,
    pub text: Option<String>,
    /// PNG destination; `None` prints the frame to stdout.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Display family the frame is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Family {
    /// 1-bit OLED/LCD panels.
    #[default]
    Mono,
    /// 16-bit RGB565 TFT panels.
    Color,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            resolution: Resolution {
                width: 128,
                height: 64,
            },
            family: Family::Mono,
            rotation: Rotation::Deg0,
            font: FontName::Default,
            arc_angle_max: DEFAULT_ARC_ANGLE_MAX,
            arc_angle_offset: DEFAULT_ARC_ANGLE_OFFSET,
            text_wrap: true,
            text: None,
            output: None,
        }
    }
}

impl Options {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or(DEFAULT_TEXT)
    }
}

/// Load options from a `key = value` file, or the defaults when no file is
/// given.
pub fn load_config(path: Option<&Path>) -> Result<Options> {
    let Some(path) = path else {
        return Ok(Options::default());
    };
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&data).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Apply every setting found in `data` on top of the defaults.
pub fn parse_config(data: &str) -> Result<Options> {
    let mut entries = Vec::new();
    parse_properties(data, &mut |key, value| {
        entries.push((key.to_string(), value.to_string()))
    });

    let mut opts = Options::default();
    for (key, value) in &entries {
        apply_setting(&mut opts, key, value)?;
    }
    Ok(opts)
}

/// Walk `key = value` lines, calling `handler` for each pair.
///
/// Blank lines and `#` comments are skipped, as is anything after a `#` on
/// a value line. Lines without `=` are reported and ignored.
pub fn parse_properties(data: &str, handler: &mut dyn FnMut(&str, &str)) {
    for (number, line) in data.lines().enumerate() {
        let line = match line.split_once('#') {
            Some((content, _)) => content,
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => {
                let key = key.trim();
                if key.is_empty() {
                    log::warn!("Value without key on line {}", number + 1);
                    continue;
                }
                handler(key, value.trim());
            }
            None => log::warn!("Key without value on line {}", number + 1),
        }
    }
}

fn apply_setting(opts: &mut Options, key: &str, value: &str) -> Result<()> {
    match key.to_ascii_lowercase().as_str() {
        "resolution" => opts.resolution = parse_resolution(value)?,
        "family" => opts.family = parse_family(value)?,
        "rotation" => opts.rotation = parse_rotation(value)?,
        "font" => opts.font = parse_font_name(value)?,
        "arc_angle_max" => opts.arc_angle_max = parse_angle(value)?,
        "arc_angle_offset" => opts.arc_angle_offset = parse_angle(value)?,
        "text_wrap" => opts.text_wrap = parse_bool(value)?,
        "text" => opts.text = Some(value.to_string()),
        "output" => opts.output = Some(PathBuf::from(value)),
        other => log::warn!("Ignoring unknown config key '{}'", other),
    }
    Ok(())
}

/// Parse a resolution string in the format "WIDTHxHEIGHT"
pub fn parse_resolution(s: &str) -> Result<Resolution> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        anyhow::bail!("Resolution must be in WIDTHxHEIGHT format");
    }

    let width: u32 = parts[0].trim().parse().context("Invalid width value")?;
    let height: u32 = parts[1].trim().parse().context("Invalid height value")?;

    if width == 0 || height == 0 {
        anyhow::bail!("Resolution values must be positive");
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        anyhow::bail!("Resolution values must not exceed {}", MAX_DIMENSION);
    }

    Ok(Resolution { width, height })
}

pub fn parse_family(s: &str) -> Result<Family> {
    match s.to_ascii_lowercase().as_str() {
        "mono" | "bicolor" => Ok(Family::Mono),
        "color" | "colour" | "rgb565" => Ok(Family::Color),
        _ => anyhow::bail!("Invalid display family '{}' (mono, color)", s),
    }
}

/// Rotation in degrees: 0, 90, 180 or 270.
pub fn parse_rotation(s: &str) -> Result<Rotation> {
    let degrees: u16 = s.trim().parse().context("Invalid rotation value")?;
    Rotation::from_degrees(degrees)
        .with_context(|| format!("Rotation must be 0, 90, 180 or 270, got {}", degrees))
}

pub fn parse_font_name(s: &str) -> Result<FontName> {
    let wanted = s.to_ascii_lowercase();
    FontName::ALL
        .into_iter()
        .find(|name| name.as_str() == wanted)
        .with_context(|| format!("Unknown font '{}'", s))
}

pub fn parse_angle(s: &str) -> Result<f32> {
    let angle: f32 = s.trim().parse().context("Invalid angle value")?;
    if !angle.is_finite() {
        anyhow::bail!("Angle must be a finite number");
    }
    Ok(angle)
}

pub fn parse_bool(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => anyhow::bail!("Invalid boolean '{}'", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_parse_resolution_valid() {
        let res = parse_resolution("128x64").unwrap();
        assert_eq!(res.width, 128);
        assert_eq!(res.height, 64);
    }

    #[test]
    fn test_parse_resolution_invalid_format() {
        assert!(parse_resolution("128-64").is_err());
        assert!(parse_resolution("128x64x2").is_err());
    }

    #[test]
    fn test_parse_resolution_invalid_values() {
        assert!(parse_resolution("0x64").is_err());
        assert!(parse_resolution("128x0").is_err());
        assert!(parse_resolution("abcxdef").is_err());
        assert!(parse_resolution("5000x64").is_err());
    }

    #[rstest]
    #[case("0", Rotation::Deg0)]
    #[case("90", Rotation::Deg90)]
    #[case("180", Rotation::Deg180)]
    #[case(" 270 ", Rotation::Deg270)]
    fn test_parse_rotation(#[case] input: &str, #[case] expected: Rotation) {
        assert_eq!(parse_rotation(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_rotation_rejects_other_angles() {
        assert!(parse_rotation("45").is_err());
        assert!(parse_rotation("-90").is_err());
        assert!(parse_rotation("north").is_err());
    }

    #[test]
    fn test_parse_family_and_font() {
        assert_eq!(parse_family("MONO").unwrap(), Family::Mono);
        assert_eq!(parse_family("rgb565").unwrap(), Family::Color);
        assert!(parse_family("cmyk").is_err());
        assert_eq!(parse_font_name("Pico").unwrap(), FontName::Pico);
        assert_eq!(parse_font_name("default").unwrap(), FontName::Default);
        assert!(parse_font_name("comic").is_err());
    }

    #[test]
    fn test_parse_bool_and_angle() {
        assert!(parse_bool("yes").unwrap());
        assert!(!parse_bool("OFF").unwrap());
        assert!(parse_bool("maybe").is_err());
        assert_eq!(parse_angle("180").unwrap(), 180.0);
        assert!(parse_angle("inf").is_err());
        assert!(parse_angle("NaN").is_err());
    }

    #[test]
    fn test_options_default() {
        let opts = Options::default();
        assert_eq!(
            opts.resolution,
            Resolution {
                width: 128,
                height: 64
            }
        );
        assert_eq!(opts.family, Family::Mono);
        assert_eq!(opts.arc_angle_max, 360.0);
        assert!(opts.text_wrap);
        assert_eq!(opts.text(), DEFAULT_TEXT);
        assert!(opts.output.is_none());
    }

    #[test]
    fn test_parse_properties_skips_comments_and_bare_keys() {
        let mut seen = Vec::new();
        parse_properties(
            "# header\n\nfont = pico  # small\nlonely\n = orphan\nrotation=90\n",
            &mut |k, v| seen.push((k.to_string(), v.to_string())),
        );
        assert_eq!(
            seen,
            vec![
                ("font".to_string(), "pico".to_string()),
                ("rotation".to_string(), "90".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_config_applies_settings() {
        let opts = parse_config(
            "resolution = 160x128\nfamily = color\nfont = pico\ntext_wrap = no\n\
             arc_angle_max = 240\narc_angle_offset = -120\ntext = 12:45\nunknown = 1\n",
        )
        .unwrap();
        assert_eq!(opts.resolution.width, 160);
        assert_eq!(opts.family, Family::Color);
        assert_eq!(opts.font, FontName::Pico);
        assert!(!opts.text_wrap);
        assert_eq!(opts.arc_angle_max, 240.0);
        assert_eq!(opts.arc_angle_offset, -120.0);
        assert_eq!(opts.text(), "12:45");
    }

    #[test]
    fn test_parse_config_reports_bad_value() {
        assert!(parse_config("rotation = 45\n").is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "resolution = 96x16").unwrap();
        writeln!(file, "output = frame.png").unwrap();

        let opts = load_config(Some(file.path())).unwrap();
        assert_eq!(
            opts.resolution,
            Resolution {
                width: 96,
                height: 16
            }
        );
        assert_eq!(opts.output, Some(PathBuf::from("frame.png")));
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.cfg");
        let err = load_config(Some(missing.as_path())).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_without_path_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), Options::default());
    }
}
