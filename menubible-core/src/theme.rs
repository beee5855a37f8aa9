use serde::Deserialize;

use crate::route::Route;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    Seasonal,
}

impl std::str::FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(ThemeName::Dark),
            "light" => Ok(ThemeName::Light),
            "seasonal" | "valentine" => Ok(ThemeName::Seasonal),
            _ => Err(format!("unknown theme: {}", s)),
        }
    }
}

impl std::fmt::Display for ThemeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeName::Dark => write!(f, "dark"),
            ThemeName::Light => write!(f, "light"),
            ThemeName::Seasonal => write!(f, "seasonal"),
        }
    }
}

/// Color tokens shared by every view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub name: ThemeName,
    pub background: Rgb,
    pub text_main: Rgb,
    pub text_muted: Rgb,
    pub card: Rgb,
    pub border: Rgb,
    pub accent: Rgb,
    pub input: Rgb,
    pub success: Rgb,
    pub error: Rgb,
}

pub const DARK: Palette = Palette {
    name: ThemeName::Dark,
    background: Rgb(0x0a, 0x19, 0x2f),
    text_main: Rgb(0xe6, 0xf1, 0xff),
    text_muted: Rgb(0x88, 0x92, 0xb0),
    card: Rgb(0x11, 0x22, 0x40),
    border: Rgb(0x23, 0x35, 0x54),
    accent: Rgb(0x64, 0xff, 0xda),
    input: Rgb(0x0a, 0x19, 0x2f),
    success: Rgb(0x05, 0x96, 0x69),
    error: Rgb(0xdc, 0x26, 0x26),
};

pub const LIGHT: Palette = Palette {
    name: ThemeName::Light,
    background: Rgb(0xff, 0xff, 0xff),
    text_main: Rgb(0x00, 0x00, 0x00),
    text_muted: Rgb(0x4b, 0x55, 0x63),
    card: Rgb(0xff, 0xff, 0xff),
    border: Rgb(0xe5, 0xe7, 0xeb),
    accent: Rgb(0x2b, 0x6c, 0xb0),
    input: Rgb(0xf9, 0xfa, 0xfb),
    success: Rgb(0x05, 0x96, 0x69),
    error: Rgb(0xdc, 0x26, 0x26),
};

pub const SEASONAL: Palette = Palette {
    name: ThemeName::Seasonal,
    background: Rgb(0xff, 0xf0, 0xf5),
    text_main: Rgb(0x88, 0x0e, 0x4f),
    text_muted: Rgb(0xad, 0x14, 0x57),
    card: Rgb(0xff, 0xff, 0xff),
    border: Rgb(0xfb, 0xcf, 0xe8),
    accent: Rgb(0xd8, 0x1b, 0x60),
    input: Rgb(0xff, 0xff, 0xff),
    success: Rgb(0x05, 0x96, 0x69),
    error: Rgb(0xdc, 0x26, 0x26),
};

pub fn palette(name: ThemeName) -> &'static Palette {
    match name {
        ThemeName::Dark => &DARK,
        ThemeName::Light => &LIGHT,
        ThemeName::Seasonal => &SEASONAL,
    }
}

/// Holds the user's dark/light choice and resolves the active palette.
///
/// Seasonal categories override the choice while they are on screen.
#[derive(Debug, Clone)]
pub struct ThemeProvider {
    dark: bool,
    forced: Option<ThemeName>,
}

impl Default for ThemeProvider {
    fn default() -> Self {
        Self::new(ThemeName::Dark)
    }
}

impl ThemeProvider {
    /// `Seasonal` as a preference pins the seasonal palette everywhere.
    pub fn new(preferred: ThemeName) -> Self {
        match preferred {
            ThemeName::Dark => Self { dark: true, forced: None },
            ThemeName::Light => Self { dark: false, forced: None },
            ThemeName::Seasonal => Self {
                dark: true,
                forced: Some(ThemeName::Seasonal),
            },
        }
    }

    pub fn toggle(&mut self) {
        self.forced = None;
        self.dark = !self.dark;
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn active_name(&self, route: &Route) -> ThemeName {
        if let Some(forced) = self.forced {
            return forced;
        }
        if route.is_seasonal() {
            ThemeName::Seasonal
        } else if self.dark {
            ThemeName::Dark
        } else {
            ThemeName::Light
        }
    }

    pub fn active(&self, route: &Route) -> &'static Palette {
        palette(self.active_name(route))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasonal_route_overrides_toggle() {
        let mut provider = ThemeProvider::default();
        let valentine = Route::Category("Valentine".to_string());
        let wines = Route::Category("Wines".to_string());

        assert_eq!(provider.active(&valentine).name, ThemeName::Seasonal);
        assert_eq!(provider.active(&wines).name, ThemeName::Dark);

        provider.toggle();
        assert_eq!(provider.active(&wines).name, ThemeName::Light);
        assert_eq!(provider.active(&valentine).name, ThemeName::Seasonal);
    }

    #[test]
    fn preference_seeds_provider() {
        let provider = ThemeProvider::new(ThemeName::Light);
        assert!(!provider.is_dark());
        assert_eq!(provider.active(&Route::Home).name, ThemeName::Light);

        let mut pinned = ThemeProvider::new(ThemeName::Seasonal);
        assert_eq!(pinned.active(&Route::Home).name, ThemeName::Seasonal);
        pinned.toggle();
        assert_eq!(pinned.active(&Route::Home).name, ThemeName::Light);
    }

    #[test]
    fn theme_name_parsing() {
        assert_eq!("Valentine".parse::<ThemeName>(), Ok(ThemeName::Seasonal));
        assert!("neon".parse::<ThemeName>().is_err());
    }
}
