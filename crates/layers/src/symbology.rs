/// Sequential color schemes understood by the flow layer.
pub const COLOR_SCHEMES: &[&str] = &[
    "Blues", "BluGrn", "BluYl", "BrwnYl", "BuGn", "BuPu", "Burg", "BurgYl", "Cool", "DarkMint",
    "Emrld", "GnBu", "Grayish", "Greens", "Greys", "Inferno", "Magenta", "Magma", "Mint",
    "Oranges", "OrRd", "OrYel", "Peach", "PinkYl", "Plasma", "PuBu", "PuBuGn", "PuRd", "Purp",
    "Purples", "PurpOr", "RdPu", "RedOr", "Reds", "Sunset", "SunsetDark", "Teal", "TealGrn",
    "Viridis", "Warm", "YlGn", "YlGnBu", "YlOrBr", "YlOrRd",
];

pub const DEFAULT_COLOR_SCHEME: &str = "Teal";

pub fn is_known_color_scheme(name: &str) -> bool {
    COLOR_SCHEMES.contains(&name)
}

/// CSS `mix-blend-mode` of the flow canvas over the base map.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendMode {
    Screen,
    Multiply,
}

impl BlendMode {
    pub fn as_css(self) -> &'static str {
        match self {
            BlendMode::Screen => "screen",
            BlendMode::Multiply => "multiply",
        }
    }
}

/// Page-wide visual theme.
///
/// Switching theme touches three surfaces at once: the base map style, the
/// canvas blend mode and the page background.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn map_style(self) -> &'static str {
        match self {
            Theme::Dark => "grayscale_dark",
            Theme::Light => "grayscale_light",
        }
    }

    pub fn blend_mode(self) -> BlendMode {
        match self {
            Theme::Dark => BlendMode::Screen,
            Theme::Light => BlendMode::Multiply,
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Theme::Dark => "#000",
            Theme::Light => "#fff",
        }
    }
}
