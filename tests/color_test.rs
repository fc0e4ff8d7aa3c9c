use dag_board::color::{Color, ColorDepth};
use dag_board::config::types::AppConfig;
use dag_board::theme::{Background, ResolvedTheme};

#[test]
fn parse_hex_and_palette() {
    assert_eq!(
        Color::parse("#c0caf5", "test_field").unwrap(),
        Color::Rgb {
            r: 0xc0,
            g: 0xca,
            b: 0xf5
        }
    );
    assert_eq!(Color::parse("245", "test_field").unwrap(), Color::Ansi(245));
}

#[test]
fn parse_error_names_the_slot() {
    let err = Color::parse("#12", "text.primary").unwrap_err();
    assert!(err.to_string().contains("text.primary"));
}

#[test]
fn rgb_downgrades_on_palette_terminals() {
    let c = Color::Rgb { r: 255, g: 0, b: 0 };
    assert!(matches!(
        c.to_crossterm_color(ColorDepth::TrueColor),
        crossterm::style::Color::Rgb { r: 255, g: 0, b: 0 }
    ));
    assert!(matches!(
        c.to_crossterm_color(ColorDepth::Palette256),
        crossterm::style::Color::AnsiValue(_)
    ));
}

#[test]
fn theme_from_config_overrides_one_slot() {
    let config: AppConfig = toml::from_str(
        r#"
[theme.colors.text]
error = "1"
"#,
    )
    .unwrap();
    let dark = ResolvedTheme::resolve(&config.theme, Background::Dark);
    let light = ResolvedTheme::resolve(&config.theme, Background::Light);
    assert_eq!(dark.text_error, Color::Ansi(1));
    assert_eq!(light.text_error, Color::Ansi(1));
    assert_ne!(dark.text_primary, light.text_primary);
}
