use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    /// Cumulative curve and its markers.
    pub fn curve_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(110, 170, 255),
            Theme::Light => Color32::from_rgb(75, 108, 183),
        }
    }

    /// Percentile guide lines.
    pub fn guide_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgba_unmultiplied(255, 190, 90, 140),
            Theme::Light => Color32::from_rgba_unmultiplied(200, 110, 20, 140),
        }
    }

    pub fn error_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(255, 80, 80),
            Theme::Light => Color32::from_rgb(200, 40, 40),
        }
    }

    /// Label for the button that switches away from this theme.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Dark => "Light Mode",
            Theme::Light => "Dark Mode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_round_trips() {
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!(Theme::Light.toggle().toggle(), Theme::Light);
        assert_eq!(Theme::default().toggle_label(), "Dark Mode");
    }
}
