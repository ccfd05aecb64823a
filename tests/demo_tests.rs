//! Demo rendering through config, CLI and PNG output.

use std::io::Write as _;

use clap::Parser;
use rpidisplay_gfx::config::{self, Family};
use rpidisplay_gfx::demo::{self, Frame};
use rpidisplay_gfx::Cli;

#[test]
fn test_cli_overrides_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# panel").unwrap();
    writeln!(file, "resolution = 96x16").unwrap();
    writeln!(file, "family = color").unwrap();
    writeln!(file, "text = 12:30").unwrap();

    let cli = Cli::try_parse_from(["gfxdemo", "--family", "mono", "--res", "64x32"]).unwrap();
    let base = config::load_config(Some(file.path())).unwrap();
    let opts = cli.merge_into_options(base).unwrap();

    assert_eq!(opts.family, Family::Mono);
    assert_eq!((opts.resolution.width, opts.resolution.height), (64, 32));
    assert_eq!(opts.text(), "12:30");
}

#[test]
fn test_mono_png_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mono.png");
    let cli = Cli::try_parse_from(["gfxdemo", "--res", "64x32", "--font", "pico"]).unwrap();
    let opts = cli.merge_into_options(config::Options::default()).unwrap();

    let frame = demo::render(&opts).unwrap();
    assert!(matches!(frame, Frame::Mono(_)));
    frame.save_png(&path).unwrap();

    let img = image::open(&path).unwrap().to_luma8();
    assert_eq!(img.dimensions(), (64, 32));
    assert_eq!(img.get_pixel(0, 0).0, [255]);
    assert_eq!(img.get_pixel(32, 1).0, [0]);
}

#[test]
fn test_color_png_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("color.png");
    let cli = Cli::try_parse_from([
        "gfxdemo",
        "--family",
        "color",
        "--res",
        "160x128",
        "--rotation",
        "90",
    ])
    .unwrap();
    let opts = cli.merge_into_options(config::Options::default()).unwrap();

    let Frame::Color(fb) = demo::render(&opts).unwrap() else {
        panic!("expected a colour frame");
    };
    assert_eq!(fb.logical_size(), (128, 160));
    demo::save_color_png(&fb, &path).unwrap();

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (128, 160));
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
}

#[test]
fn test_save_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent").join("frame.png");
    let fb = demo::render_mono(&config::Options::default()).unwrap();
    assert!(demo::save_mono_png(&fb, &path).is_err());
}
