//! Control panel to flow layer bridge.

use std::fmt;
use std::rc::Rc;

use layers::{ControlSettings, Theme, is_known_color_scheme};
use tracing::{debug, warn};

use crate::surface::{DemoData, DemoLayer, RenderSurface};
use crate::sync::BaseMap;

/// The fixed set of controls the layer is configured from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ControlId {
    ColorScheme,
    DarkMode,
    Clustering,
}

impl ControlId {
    pub const ALL: [ControlId; 3] = [
        ControlId::ColorScheme,
        ControlId::DarkMode,
        ControlId::Clustering,
    ];
}

/// Misconfigured page: a control is missing or has the wrong element type.
///
/// Not recoverable; the set of controls is fixed when the page is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    Missing { element_id: String },
    WrongKind {
        element_id: String,
        expected: &'static str,
    },
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::Missing { element_id } => {
                write!(f, "control element #{element_id} not found")
            }
            ControlError::WrongKind {
                element_id,
                expected,
            } => write!(f, "control element #{element_id} is not a {expected}"),
        }
    }
}

impl std::error::Error for ControlError {}

/// Synchronous read access to the current control values.
pub trait ControlPanel {
    /// Value of the selected option of a `<select>`.
    fn select_value(&self, control: ControlId) -> Result<String, ControlError>;

    /// State of a checkbox.
    fn is_checked(&self, control: ControlId) -> Result<bool, ControlError>;
}

/// Reads every control, fresh, into one consistent snapshot.
pub fn read_settings<C>(panel: &C) -> Result<ControlSettings, ControlError>
where
    C: ControlPanel + ?Sized,
{
    let color_scheme = panel.select_value(ControlId::ColorScheme)?;
    if !is_known_color_scheme(&color_scheme) {
        warn!(%color_scheme, "unknown color scheme; passing through to the layer");
    }
    Ok(ControlSettings {
        color_scheme,
        dark_mode: panel.is_checked(ControlId::DarkMode)?,
        clustering_enabled: panel.is_checked(ControlId::Clustering)?,
    })
}

/// Turns control state into layer rebuilds.
///
/// Every rebuild replaces the layer wholesale. A theme change restyles the
/// base map, canvas blend mode and page background before the new layer is
/// set, so no frame mixes two themes.
#[derive(Debug, Default)]
pub struct ControlPanelBridge {
    applied_theme: Option<Theme>,
    map_theme: Option<Theme>,
    rebuilds: u64,
}

impl ControlPanelBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// For a base map created already styled with `theme`. The first rebuild
    /// still themes the surface but leaves the map style alone.
    pub fn with_map_theme(theme: Theme) -> Self {
        Self {
            map_theme: Some(theme),
            ..Self::default()
        }
    }

    pub fn rebuild<C, M, S>(
        &mut self,
        data: &Rc<DemoData>,
        panel: &C,
        map: &mut M,
        surface: &mut S,
    ) -> Result<(), ControlError>
    where
        C: ControlPanel + ?Sized,
        M: BaseMap + ?Sized,
        S: RenderSurface + ?Sized,
    {
        let settings = read_settings(panel)?;

        let theme = settings.theme();
        if self.applied_theme != Some(theme) {
            if self.map_theme != Some(theme) {
                map.set_style(theme.map_style());
                self.map_theme = Some(theme);
            }
            surface.set_blend_mode(theme.blend_mode());
            surface.set_page_background(theme.background());
            self.applied_theme = Some(theme);
        }

        self.rebuilds += 1;
        debug!(
            rebuilds = self.rebuilds,
            color_scheme = %settings.color_scheme,
            dark_mode = settings.dark_mode,
            clustering = settings.clustering_enabled,
            "rebuilding flow layer"
        );
        surface.set_layer(DemoLayer::new(Rc::clone(data), settings));
        Ok(())
    }

    pub fn applied_theme(&self) -> Option<Theme> {
        self.applied_theme
    }

    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}
