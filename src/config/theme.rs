use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
    pub focus: FocusStyle,
    pub borders: BorderStyle,
    pub grid: GridStyle,
    pub top_bar: TopBarStyle,
    pub modal: ModalStyle,
    pub notifications: NotificationStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
            focus: FocusStyle::default(),
            borders: BorderStyle::default(),
            grid: GridStyle::default(),
            top_bar: TopBarStyle::default(),
            modal: ModalStyle::default(),
            notifications: NotificationStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub background: HexColor,
    pub foreground: HexColor,
    pub primary: HexColor,
    pub secondary: HexColor,
    pub accent: HexColor,
    pub success: HexColor,
    pub warning: HexColor,
    pub error: HexColor,
    pub muted: HexColor,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            background: HexColor::new("#1a1b26"),
            foreground: HexColor::new("#c0caf5"),
            primary: HexColor::new("#7aa2f7"),
            secondary: HexColor::new("#9ece6a"),
            accent: HexColor::new("#bb9af7"),
            success: HexColor::new("#9ece6a"),
            warning: HexColor::new("#e0af68"),
            error: HexColor::new("#f7768e"),
            muted: HexColor::new("#565f89"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusStyle {
    pub focused_border: HexColor,
    pub unfocused_border: HexColor,
    pub focused_title: HexColor,
    pub unfocused_title: HexColor,
    pub use_bold_focused: bool,
    pub focus_indicator: String,
}

impl Default for FocusStyle {
    fn default() -> Self {
        Self {
            focused_border: HexColor::new("#7aa2f7"),
            unfocused_border: HexColor::new("#3b4261"),
            focused_title: HexColor::new("#bb9af7"),
            unfocused_title: HexColor::new("#565f89"),
            use_bold_focused: true,
            focus_indicator: "●".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderStyle {
    pub border_type: String,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            border_type: "rounded".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridStyle {
    pub cell_fg: HexColor,
    pub cell_bg: HexColor,
    pub selected_fg: HexColor,
    pub selected_bg: HexColor,
    pub year_fg: HexColor,
    pub loading_fg: HexColor,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            cell_fg: HexColor::new("#c0caf5"),
            cell_bg: HexColor::new("#1a1b26"),
            selected_fg: HexColor::new("#1a1b26"),
            selected_bg: HexColor::new("#7aa2f7"),
            year_fg: HexColor::new("#565f89"),
            loading_fg: HexColor::new("#e0af68"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopBarStyle {
    pub item_fg: HexColor,
    pub item_bg: HexColor,
    pub focused_fg: HexColor,
    pub focused_bg: HexColor,
    pub active_fg: HexColor,
}

impl Default for TopBarStyle {
    fn default() -> Self {
        Self {
            item_fg: HexColor::new("#c0caf5"),
            item_bg: HexColor::new("#1a1b26"),
            focused_fg: HexColor::new("#1a1b26"),
            focused_bg: HexColor::new("#7aa2f7"),
            active_fg: HexColor::new("#bb9af7"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalStyle {
    pub background: HexColor,
    pub border: HexColor,
    pub item_fg: HexColor,
    pub selected_fg: HexColor,
    pub selected_bg: HexColor,
    pub button_fg: HexColor,
    pub button_focused_fg: HexColor,
    pub button_focused_bg: HexColor,
    pub danger_fg: HexColor,
    pub validation_fg: HexColor,
}

impl Default for ModalStyle {
    fn default() -> Self {
        Self {
            background: HexColor::new("#24283b"),
            border: HexColor::new("#7aa2f7"),
            item_fg: HexColor::new("#c0caf5"),
            selected_fg: HexColor::new("#1a1b26"),
            selected_bg: HexColor::new("#7aa2f7"),
            button_fg: HexColor::new("#c0caf5"),
            button_focused_fg: HexColor::new("#1a1b26"),
            button_focused_bg: HexColor::new("#bb9af7"),
            danger_fg: HexColor::new("#f7768e"),
            validation_fg: HexColor::new("#e0af68"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationStyle {
    pub info_fg: HexColor,
    pub info_bg: HexColor,
    pub success_fg: HexColor,
    pub success_bg: HexColor,
    pub warning_fg: HexColor,
    pub warning_bg: HexColor,
    pub error_fg: HexColor,
    pub error_bg: HexColor,
}

impl Default for NotificationStyle {
    fn default() -> Self {
        Self {
            info_fg: HexColor::new("#c0caf5"),
            info_bg: HexColor::new("#24283b"),
            success_fg: HexColor::new("#1a1b26"),
            success_bg: HexColor::new("#9ece6a"),
            warning_fg: HexColor::new("#1a1b26"),
            warning_bg: HexColor::new("#e0af68"),
            error_fg: HexColor::new("#c0caf5"),
            error_bg: HexColor::new("#f7768e"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    pub fn new(hex: &str) -> Self {
        Self(hex.to_string())
    }

    pub fn to_color(&self) -> Color {
        self.parse_hex().unwrap_or(Color::Reset)
    }

    fn parse_hex(&self) -> Option<Color> {
        let hex = self.0.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Color::Rgb(r, g, b))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self("#ffffff".to_string())
    }
}

impl Theme {
    pub fn border_style(&self, focused: bool) -> Style {
        let color = if focused {
            self.focus.focused_border.to_color()
        } else {
            self.focus.unfocused_border.to_color()
        };

        let mut style = Style::default().fg(color);
        if focused && self.focus.use_bold_focused {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }

    pub fn title_style(&self, focused: bool) -> Style {
        let color = if focused {
            self.focus.focused_title.to_color()
        } else {
            self.focus.unfocused_title.to_color()
        };

        let mut style = Style::default().fg(color);
        if focused && self.focus.use_bold_focused {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }

    pub fn grid_cell_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.grid.selected_fg.to_color())
                .bg(self.grid.selected_bg.to_color())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.grid.cell_fg.to_color())
                .bg(self.grid.cell_bg.to_color())
        }
    }

    pub fn top_bar_style(&self, focused: bool, active: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.top_bar.focused_fg.to_color())
                .bg(self.top_bar.focused_bg.to_color())
                .add_modifier(Modifier::BOLD)
        } else if active {
            Style::default().fg(self.top_bar.active_fg.to_color())
        } else {
            Style::default()
                .fg(self.top_bar.item_fg.to_color())
                .bg(self.top_bar.item_bg.to_color())
        }
    }

    pub fn modal_item_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.modal.selected_fg.to_color())
                .bg(self.modal.selected_bg.to_color())
        } else {
            Style::default().fg(self.modal.item_fg.to_color())
        }
    }

    pub fn modal_button_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.modal.button_focused_fg.to_color())
                .bg(self.modal.button_focused_bg.to_color())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.modal.button_fg.to_color())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_parsing() {
        let color = HexColor::new("#ff0000");
        assert_eq!(color.to_color(), Color::Rgb(255, 0, 0));

        let color = HexColor::new("#00ff00");
        assert_eq!(color.to_color(), Color::Rgb(0, 255, 0));

        let color = HexColor::new("bad");
        assert_eq!(color.to_color(), Color::Reset);
    }

    #[test]
    fn test_theme_default() {
        let theme = Theme::default();
        assert_eq!(theme.name, "default");
        assert!(theme.focus.use_bold_focused);
    }

    #[test]
    fn test_theme_serialization() {
        let theme = Theme::default();
        let toml_str = toml::to_string_pretty(&theme).unwrap();
        let parsed: Theme = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.name, theme.name);
    }
}
