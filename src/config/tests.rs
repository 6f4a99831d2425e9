//! Configuration unit tests.

use std::time::Duration;

use super::*;

#[test]
fn default_config_roundtrip() {
    let cfg = Config::default();
    let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
    let parsed = Config::from_toml_str(&toml_str).expect("deserialize");
    assert_eq!(parsed, cfg);
    assert_eq!(parsed.atlas.size, 2048);
    assert_eq!(parsed.field.mode, DistanceFieldMode::Sdf);
    assert_eq!(parsed.field.initial_size, 64);
    assert_eq!(parsed.field.curve_segments, 32);
    assert!(parsed.field.smooth);
    assert!((parsed.field.padding - 6.0).abs() < f32::EPSILON);
    assert_eq!(parsed.schedule.frame_budget_ms, 5);
}

#[test]
fn empty_toml_gives_defaults() {
    let parsed = Config::from_toml_str("").expect("deserialize");
    assert_eq!(parsed, Config::default());
}

#[test]
fn partial_toml_uses_defaults() {
    let toml_str = r#"
[field]
mode = "msdf"
winding = "negative"
"#;
    let parsed = Config::from_toml_str(toml_str).expect("deserialize");
    assert_eq!(parsed.field.mode, DistanceFieldMode::Msdf);
    assert_eq!(parsed.field.winding, Winding::Negative);
    // Other fields should be defaults
    assert_eq!(parsed.field.initial_size, 64);
    assert_eq!(parsed.atlas.size, 2048);
}

#[test]
fn unknown_mode_is_a_parse_error() {
    let err = Config::from_toml_str("[field]\nmode = \"bitmap\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Config::load(Path::new("/nonexistent/glyphfield.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn effective_values_are_clamped() {
    let mut cfg = Config::default();
    cfg.atlas.size = 16;
    cfg.field.pixel_density = 100.0;
    cfg.field.curve_segments = 0;
    cfg.field.padding = -3.0;
    assert_eq!(cfg.atlas.effective_size(), 64);
    assert!((cfg.field.effective_pixel_density() - 8.0).abs() < f32::EPSILON);
    assert_eq!(cfg.field.effective_curve_segments(), 1);
    assert!(cfg.field.effective_padding().abs() < f32::EPSILON);

    cfg.field.pixel_density = f32::NAN;
    assert!((cfg.field.effective_pixel_density() - 1.0).abs() < f32::EPSILON);
}

#[test]
fn smooth_selects_filter() {
    let mut cfg = FieldConfig::default();
    assert_eq!(cfg.filter(), TextureFilter::Linear);
    cfg.smooth = false;
    assert_eq!(cfg.filter(), TextureFilter::Nearest);
}

#[test]
fn cache_settings_follow_config() {
    let toml_str = r#"
[atlas]
size = 1024

[field]
mode = "msdf"
pixel_density = 2.0
smooth = false

[schedule]
frame_budget_ms = 12
"#;
    let settings = Config::from_toml_str(toml_str).unwrap().cache_settings();
    assert_eq!(settings.atlas_size, 1024);
    assert_eq!(settings.mode, DistanceFieldMode::Msdf);
    assert!((settings.pixel_density - 2.0).abs() < f32::EPSILON);
    assert_eq!(settings.filter, TextureFilter::Nearest);
    assert_eq!(settings.frame_budget, Duration::from_millis(12));
}
