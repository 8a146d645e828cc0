use super::*;

#[test]
fn tool_names_round_trip() {
    for tool in [
        Tool::Select,
        Tool::Rect,
        Tool::Circle,
        Tool::Line,
        Tool::Arrow,
        Tool::Diamond,
        Tool::Pencil,
        Tool::Text,
        Tool::Eraser,
    ] {
        assert_eq!(tool.as_str().parse::<Tool>(), Ok(tool));
    }
}

#[test]
fn unknown_tool_name_is_rejected() {
    assert_eq!("lasso".parse::<Tool>(), Err(UnknownTool("lasso".into())));
}

#[test]
fn only_geometry_tools_draw_on_drag() {
    assert!(Tool::Pencil.draws_on_drag());
    assert!(Tool::Diamond.draws_on_drag());
    assert!(!Tool::Select.draws_on_drag());
    assert!(!Tool::Eraser.draws_on_drag());
    assert!(!Tool::Text.draws_on_drag());
}

#[test]
fn default_ui_uses_dark_theme_stroke() {
    let ui = UiState::default();
    assert_eq!(ui.tool, Tool::Select);
    assert_eq!(ui.theme, Theme::Dark);
    assert_eq!(ui.stroke_color, "#ffffff");
    assert!(ui.selected.is_none());
}

#[test]
fn themes_pair_background_with_contrasting_stroke() {
    assert_eq!(Theme::Dark.background(), "rgb(0, 0, 0)");
    assert_eq!(Theme::Light.background(), "rgb(243, 244, 246)");
    assert_eq!(Theme::Light.default_stroke(), "#1e1e1e");
}

#[test]
fn input_starts_idle() {
    assert!(matches!(InputState::default(), InputState::Idle));
}
