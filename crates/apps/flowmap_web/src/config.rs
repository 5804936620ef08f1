use serde::{Deserialize, Serialize};

use formats::DEFAULT_DATA_BASE_URL;

use crate::controls::ControlId;

/// Viewer configuration, read from JSON handed in by the host page.
///
/// Every field is optional in the JSON; missing ones take the demo values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebConfig {
    pub data_base_url: String,
    /// Azure Maps subscription key.
    pub map_subscription_key: String,
    pub map_container_id: String,
    pub canvas_id: String,
    pub tooltip_id: String,
    /// Selector matching every element whose change triggers a rebuild.
    pub control_selector: String,
    pub controls: ControlIds,
    /// Fraction of the location extent added around the initial view.
    pub fit_padding: f64,
    pub id_trim: IdTrim,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            data_base_url: DEFAULT_DATA_BASE_URL.to_string(),
            map_subscription_key: String::new(),
            map_container_id: "myMap".to_string(),
            canvas_id: "deck-canvas".to_string(),
            tooltip_id: "tooltip".to_string(),
            control_selector: ".control".to_string(),
            controls: ControlIds::default(),
            fit_padding: 0.3,
            id_trim: IdTrim::default(),
        }
    }
}

impl WebConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text)
    }
}

/// DOM element ids of the fixed control set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlIds {
    pub color_scheme: String,
    pub dark_mode: String,
    pub clustering: String,
}

impl Default for ControlIds {
    fn default() -> Self {
        Self {
            color_scheme: "colorScheme".to_string(),
            dark_mode: "darkMode".to_string(),
            clustering: "clusteringEnabled".to_string(),
        }
    }
}

impl ControlIds {
    pub fn element_id(&self, control: ControlId) -> &str {
        match control {
            ControlId::ColorScheme => &self.color_scheme,
            ControlId::DarkMode => &self.dark_mode,
            ControlId::Clustering => &self.clustering,
        }
    }

    pub fn control_for(&self, element_id: &str) -> Option<ControlId> {
        ControlId::ALL
            .into_iter()
            .find(|c| self.element_id(*c) == element_id)
    }
}

/// Characters cut from each end of a flow endpoint id before display.
///
/// The demo dataset wraps ids in a two-character prefix and suffix; other
/// datasets will want `0`/`0`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdTrim {
    pub leading: usize,
    pub trailing: usize,
}

impl Default for IdTrim {
    fn default() -> Self {
        Self {
            leading: 2,
            trailing: 2,
        }
    }
}

impl IdTrim {
    pub const NONE: IdTrim = IdTrim {
        leading: 0,
        trailing: 0,
    };

    /// Trims by characters, not bytes. Ids too short to trim become empty.
    pub fn apply<'a>(&self, id: &'a str) -> &'a str {
        let len = id.chars().count();
        if self.leading + self.trailing >= len {
            return if self.leading == 0 && self.trailing == 0 { id } else { "" };
        }
        let byte_at = |n: usize| id.char_indices().nth(n).map_or(id.len(), |(i, _)| i);
        &id[byte_at(self.leading)..byte_at(len - self.trailing)]
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlIds, IdTrim, WebConfig};
    use crate::controls::ControlId;
    use pretty_assertions::assert_eq;

    #[test]
    fn trims_two_characters_each_end() {
        let trim = IdTrim::default();
        assert_eq!(trim.apply("__A__"), "A");
        assert_eq!(trim.apply("\"'1234'\""), "1234");
        assert_eq!(trim.apply("abcd"), "");
        assert_eq!(trim.apply("ab"), "");
    }

    #[test]
    fn trim_counts_characters() {
        assert_eq!(IdTrim::default().apply("ééXéé"), "X");
        assert_eq!(
            IdTrim {
                leading: 1,
                trailing: 0
            }
            .apply("#12"),
            "12"
        );
        assert_eq!(IdTrim::NONE.apply(""), "");
        assert_eq!(IdTrim::NONE.apply("id"), "id");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = WebConfig::from_json(
            r#"{"mapSubscriptionKey":"k","idTrim":{"leading":0,"trailing":0},"controls":{"darkMode":"dm"}}"#,
        )
        .expect("config");
        assert_eq!(cfg.map_subscription_key, "k");
        assert_eq!(cfg.id_trim, IdTrim::NONE);
        assert_eq!(cfg.controls.dark_mode, "dm");
        assert_eq!(cfg.controls.color_scheme, "colorScheme");
        assert_eq!(cfg.canvas_id, "deck-canvas");
    }

    #[test]
    fn blank_json_is_default() {
        assert_eq!(WebConfig::from_json("  ").expect("config"), WebConfig::default());
        assert!(WebConfig::from_json("{").is_err());
    }

    #[test]
    fn control_lookup_by_element_id() {
        let ids = ControlIds::default();
        assert_eq!(ids.control_for("darkMode"), Some(ControlId::DarkMode));
        assert_eq!(ids.control_for("nope"), None);
        assert_eq!(ids.element_id(ControlId::Clustering), "clusteringEnabled");
    }
}
