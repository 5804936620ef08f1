//! Hover tooltip: pick events in, positioned HTML out.
//!
//! ```text
//! Hidden ──pick(location|flow)──▶ Visible ──pick(location|flow)──▶ Visible
//!   ▲                                │
//!   └──────────pick(nothing)─────────┘
//! ```

use layers::{FlowPick, LocationPick, PickInfo, PickedObject};

use crate::config::IdTrim;

pub const FLOW_TITLE: &str = "Flow";

/// Offset of the tooltip from its positioning context, in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TooltipPosition {
    pub left: f64,
    pub top: f64,
}

/// Plain-text lines; markup is only produced by [`TooltipContent::to_html`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TooltipContent {
    lines: Vec<String>,
}

impl TooltipContent {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// One escaped `<div>` per line.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str("<div>");
            out.push_str(&escape_html(line));
            out.push_str("</div>");
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TooltipState {
    #[default]
    Hidden,
    Visible {
        position: TooltipPosition,
        content: TooltipContent,
    },
}

impl TooltipState {
    pub fn is_visible(&self) -> bool {
        matches!(self, TooltipState::Visible { .. })
    }
}

/// The tooltip element.
pub trait TooltipView {
    fn show(&mut self, position: TooltipPosition, html: &str);
    fn hide(&mut self);
}

/// Derives the tooltip for a pick; anything unrecognized hides it.
pub fn tooltip_state(pick: Option<&PickInfo>, trim: IdTrim) -> TooltipState {
    let Some(info) = pick else {
        return TooltipState::Hidden;
    };
    let Some(object) = &info.object else {
        return TooltipState::Hidden;
    };
    let content = match object {
        PickedObject::Location(loc) => location_content(loc),
        PickedObject::Flow(flow) => flow_content(flow, trim),
    };
    TooltipState::Visible {
        position: TooltipPosition {
            left: info.x,
            top: info.y,
        },
        content,
    }
}

fn location_content(loc: &LocationPick) -> TooltipContent {
    TooltipContent::new(vec![
        display_name(&loc.name),
        format!("Incoming trips: {}", format_count(loc.totals.incoming_count)),
        format!("Outgoing trips: {}", format_count(loc.totals.outgoing_count)),
        format!(
            "Internal or round trips: {}",
            format_count(loc.totals.internal_count)
        ),
    ])
}

fn flow_content(flow: &FlowPick, trim: IdTrim) -> TooltipContent {
    TooltipContent::new(vec![
        FLOW_TITLE.to_string(),
        format!("{} → {}", trim.apply(&flow.origin), trim.apply(&flow.dest)),
        format!("Count: {}", format_count(flow.count)),
    ])
}

/// Location names arrive with CSV quoting artifacts; drop every `"`.
pub fn display_name(name: &str) -> String {
    name.replace('"', "")
}

/// Formats a counter the way the browser prints a JS number.
pub fn format_count(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "Infinity".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if v == 0.0 {
        "0".to_string()
    } else if v.abs() >= 1e21 || v.abs() < 1e-6 {
        // Shortest digits either way; only the exponent sign differs.
        let exp = format!("{v:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    } else {
        format!("{v}")
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Current tooltip plus the rule for deriving the next one.
#[derive(Debug, Default)]
pub struct TooltipMachine {
    state: TooltipState,
    trim: IdTrim,
}

impl TooltipMachine {
    pub fn new(trim: IdTrim) -> Self {
        Self {
            state: TooltipState::Hidden,
            trim,
        }
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    /// Applies one hover pick to `view`. No debouncing.
    pub fn on_hover<V>(&mut self, pick: Option<&PickInfo>, view: &mut V) -> &TooltipState
    where
        V: TooltipView + ?Sized,
    {
        self.state = tooltip_state(pick, self.trim);
        match &self.state {
            TooltipState::Hidden => view.hide(),
            TooltipState::Visible { position, content } => view.show(*position, &content.to_html()),
        }
        &self.state
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{
        FLOW_TITLE, TooltipContent, TooltipMachine, TooltipPosition, TooltipState, TooltipView,
        escape_html, format_count, tooltip_state,
    };
    use crate::config::IdTrim;
    use layers::{FlowPick, LocationPick, LocationTotals, PickInfo, PickedObject};
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default)]
    pub(crate) struct FakeTooltip {
        pub visible: bool,
        pub position: Option<TooltipPosition>,
        pub html: String,
        pub hides: usize,
    }

    impl TooltipView for FakeTooltip {
        fn show(&mut self, position: TooltipPosition, html: &str) {
            self.visible = true;
            self.position = Some(position);
            self.html = html.to_string();
        }

        fn hide(&mut self) {
            self.visible = false;
            self.hides += 1;
        }
    }

    fn location_pick(name: &str) -> PickInfo {
        PickInfo {
            x: 12.0,
            y: 34.5,
            object: Some(PickedObject::Location(LocationPick {
                id: "A".to_string(),
                name: name.to_string(),
                totals: LocationTotals {
                    incoming_count: 3.0,
                    outgoing_count: 4.0,
                    internal_count: 5.0,
                },
            })),
        }
    }

    fn flow_pick(origin: &str, dest: &str, count: f64) -> PickInfo {
        PickInfo {
            x: 1.0,
            y: 2.0,
            object: Some(PickedObject::Flow(FlowPick {
                origin: origin.to_string(),
                dest: dest.to_string(),
                count,
            })),
        }
    }

    fn lines(state: &TooltipState) -> Vec<String> {
        match state {
            TooltipState::Visible { content, .. } => content.lines().to_vec(),
            TooltipState::Hidden => panic!("tooltip hidden"),
        }
    }

    #[test]
    fn location_shows_name_and_three_counters() {
        let state = tooltip_state(Some(&location_pick("\"Gare \"Centrale\"\"")), IdTrim::default());
        assert_eq!(
            lines(&state),
            vec![
                "Gare Centrale".to_string(),
                "Incoming trips: 3".to_string(),
                "Outgoing trips: 4".to_string(),
                "Internal or round trips: 5".to_string(),
            ]
        );
        let TooltipState::Visible { position, .. } = state else {
            panic!("tooltip hidden");
        };
        assert_eq!(position, TooltipPosition { left: 12.0, top: 34.5 });
    }

    #[test]
    fn flow_trims_identifiers() {
        let state = tooltip_state(Some(&flow_pick("__A__", "xxB12yy", 5.0)), IdTrim::default());
        assert_eq!(
            lines(&state),
            vec![
                FLOW_TITLE.to_string(),
                "A → B12".to_string(),
                "Count: 5".to_string(),
            ]
        );
    }

    #[test]
    fn trim_is_configurable() {
        let state = tooltip_state(Some(&flow_pick("__A__", "B", 2.5)), IdTrim::NONE);
        assert_eq!(lines(&state)[1], "__A__ → B");
        assert_eq!(lines(&state)[2], "Count: 2.5");
    }

    #[test]
    fn nothing_picked_is_hidden() {
        assert_eq!(tooltip_state(None, IdTrim::default()), TooltipState::Hidden);
        assert_eq!(
            tooltip_state(Some(&PickInfo::empty(3.0, 4.0)), IdTrim::default()),
            TooltipState::Hidden
        );
    }

    #[test]
    fn html_escapes_every_line() {
        let content = TooltipContent::new(vec!["<b>Tom & 'Jerry'</b>".to_string()]);
        assert_eq!(
            content.to_html(),
            "<div>&lt;b&gt;Tom &amp; &#39;Jerry&#39;&lt;/b&gt;</div>"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn counts_format_like_the_browser() {
        assert_eq!(format_count(5.0), "5");
        assert_eq!(format_count(-0.0), "0");
        assert_eq!(format_count(0.25), "0.25");
        assert_eq!(format_count(f64::NAN), "NaN");
        assert_eq!(format_count(f64::INFINITY), "Infinity");
        assert_eq!(format_count(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn counts_switch_to_exponent_form_at_browser_thresholds() {
        assert_eq!(format_count(1e20), "100000000000000000000");
        assert_eq!(format_count(1e21), "1e+21");
        assert_eq!(format_count(-2.5e22), "-2.5e+22");
        assert_eq!(format_count(0.000001), "0.000001");
        assert_eq!(format_count(1e-7), "1e-7");
        assert_eq!(format_count(1.5e-7), "1.5e-7");
    }

    #[test]
    fn machine_walks_hidden_visible_hidden() {
        let mut machine = TooltipMachine::new(IdTrim::default());
        let mut view = FakeTooltip::default();
        assert_eq!(machine.state(), &TooltipState::Hidden);

        machine.on_hover(Some(&location_pick("Alpha")), &mut view);
        assert!(view.visible);
        assert!(view.html.starts_with("<div>Alpha</div>"));

        // Visible -> Visible on a different shape, no debounce.
        machine.on_hover(Some(&flow_pick("__A__", "__A__", 5.0)), &mut view);
        assert!(machine.state().is_visible());
        assert!(view.html.contains("A → A"));
        assert_eq!(view.position, Some(TooltipPosition { left: 1.0, top: 2.0 }));

        machine.on_hover(Some(&PickInfo::empty(9.0, 9.0)), &mut view);
        assert!(!view.visible);
        assert_eq!(machine.state(), &TooltipState::Hidden);
        assert_eq!(view.hides, 1);
    }
}
