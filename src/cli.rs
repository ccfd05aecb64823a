use std::path::PathBuf;

use crate::config::{
    parse_angle, parse_family, parse_font_name, parse_resolution, parse_rotation, Options,
};
use crate::logging::LogLevel;
use anyhow::{Context, Result};
use clap::Parser;

/// Render the graphics showcase for a bi-color or RGB565 panel
#[derive(Parser, Debug, Default)]
#[command(name = "gfxdemo")]
#[command(version)]
#[command(
    about = "Draw shapes, arcs and text onto an in-memory display and dump the frame",
    long_about = None
)]
pub struct Cli {
    /// Panel resolution (e.g., 128x64)
    #[arg(short, long, value_name = "WIDTHxHEIGHT")]
    pub res: Option<String>,

    /// Display family (mono, color)
    #[arg(long, value_name = "FAMILY")]
    pub family: Option<String>,

    /// Rotation in degrees (0, 90, 180, 270)
    #[arg(short = 'R', long, value_name = "DEGREES")]
    pub rotation: Option<String>,

    /// Font (default, pico)
    #[arg(short, long, value_name = "NAME")]
    pub font: Option<String>,

    /// Text printed in the top-left corner
    #[arg(short, long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Sweep of a full gauge arc in degrees
    #[arg(long, value_name = "DEGREES", allow_hyphen_values = true)]
    pub arc_max: Option<String>,

    /// Rotation applied to gauge arcs in degrees
    #[arg(long, value_name = "DEGREES", allow_hyphen_values = true)]
    pub arc_offset: Option<String>,

    /// Disable text wrapping at the right edge
    #[arg(long)]
    pub nowrap: bool,

    /// Config file of key = value settings
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the frame as PNG instead of printing it
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Log verbosity (0 = nothing .. 6 = everything)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<i32>,
}

impl Cli {
    /// Merge CLI arguments into the options struct
    pub fn merge_into_options(&self, mut opts: Options) -> Result<Options> {
        if let Some(ref res) = self.res {
            opts.resolution = parse_resolution(res).context("Invalid resolution format")?;
        }

        if let Some(ref family) = self.family {
            opts.family = parse_family(family)?;
        }

        if let Some(ref rotation) = self.rotation {
            opts.rotation = parse_rotation(rotation)?;
        }

        if let Some(ref font) = self.font {
            opts.font = parse_font_name(font)?;
        }

        if let Some(ref text) = self.text {
            opts.text = Some(text.clone());
        }

        if let Some(ref max) = self.arc_max {
            opts.arc_angle_max = parse_angle(max).context("Invalid arc maximum")?;
        }

        if let Some(ref offset) = self.arc_offset {
            opts.arc_angle_offset = parse_angle(offset).context("Invalid arc offset")?;
        }

        if self.nowrap {
            opts.text_wrap = false;
        }

        if let Some(ref output) = self.output {
            opts.output = Some(output.clone());
        }

        Ok(opts)
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .map(LogLevel::from_i32)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Family, Resolution};
    use crate::graphics::{FontName, Rotation};

    #[test]
    fn test_merge_basic_options() {
        let cli = Cli {
            res: Some("160x128".to_string()),
            family: Some("color".to_string()),
            rotation: Some("90".to_string()),
            nowrap: true,
            ..Default::default()
        };

        let opts = cli.merge_into_options(Options::default()).unwrap();
        assert_eq!(
            opts.resolution,
            Resolution {
                width: 160,
                height: 128
            }
        );
        assert_eq!(opts.family, Family::Color);
        assert_eq!(opts.rotation, Rotation::Deg90);
        assert!(!opts.text_wrap);
    }

    #[test]
    fn test_merge_keeps_unset_options() {
        let base = Options {
            font: FontName::Pico,
            text: Some("from file".to_string()),
            ..Default::default()
        };
        let opts = Cli::default().merge_into_options(base.clone()).unwrap();
        assert_eq!(opts, base);
    }

    #[test]
    fn test_invalid_resolution() {
        let cli = Cli {
            res: Some("invalid".to_string()),
            ..Default::default()
        };
        assert!(cli.merge_into_options(Options::default()).is_err());
    }

    #[test]
    fn test_invalid_arc_offset() {
        let cli = Cli {
            arc_offset: Some("left".to_string()),
            ..Default::default()
        };
        assert!(cli.merge_into_options(Options::default()).is_err());
    }

    #[test]
    fn test_parse_from_args() {
        let cli = Cli::try_parse_from([
            "gfxdemo",
            "--res",
            "96x16",
            "--font",
            "pico",
            "--arc-offset",
            "-135",
            "--log-level",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.log_level(), LogLevel::Debug);

        let opts = cli.merge_into_options(Options::default()).unwrap();
        assert_eq!(opts.font, FontName::Pico);
        assert_eq!(opts.arc_angle_offset, -135.0);
        assert_eq!(opts.resolution.height, 16);
    }

    #[test]
    fn test_default_log_level() {
        assert_eq!(Cli::default().log_level(), LogLevel::Info);
    }
}
