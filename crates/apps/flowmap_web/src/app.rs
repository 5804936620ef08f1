use std::cell::RefCell;
use std::rc::Rc;

use foundation::CameraState;
use layers::{PickInfo, Theme};
use runtime::{BusEvent, EventBus, HandlerId};
use tracing::debug;

use crate::config::IdTrim;
use crate::controls::{ControlError, ControlId, ControlPanel, ControlPanelBridge};
use crate::surface::{DemoData, RenderSurface};
use crate::sync::{BaseMap, SyncOutcome, ViewSynchronizer};
use crate::tooltip::{TooltipMachine, TooltipState, TooltipView};

/// Everything the viewer reacts to after startup.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The flow canvas moved its camera.
    ViewStateChanged(CameraState),
    ControlChanged(ControlId),
    /// Hover pick; `None` when the layer reported no pick info at all.
    Hover(Option<PickInfo>),
}

impl BusEvent for AppEvent {
    type Error = ControlError;

    fn kind(&self) -> &'static str {
        match self {
            AppEvent::ViewStateChanged(_) => "view_state_changed",
            AppEvent::ControlChanged(_) => "control_changed",
            AppEvent::Hover(_) => "hover",
        }
    }
}

/// Application state, created once the dataset is loaded and the base map
/// is ready.
///
/// Owns the collaborators and the three components that connect them.
/// Handlers reach it through [`wire`] rather than globals.
pub struct App<M, S, C, T> {
    data: Rc<DemoData>,
    map: M,
    surface: S,
    controls: C,
    tooltip_view: T,
    sync: ViewSynchronizer,
    bridge: ControlPanelBridge,
    tooltip: TooltipMachine,
}

impl<M, S, C, T> App<M, S, C, T>
where
    M: BaseMap,
    S: RenderSurface,
    C: ControlPanel,
    T: TooltipView,
{
    pub fn new(
        data: Rc<DemoData>,
        map: M,
        surface: S,
        controls: C,
        tooltip_view: T,
        trim: IdTrim,
    ) -> Self {
        Self {
            data,
            map,
            surface,
            controls,
            tooltip_view,
            sync: ViewSynchronizer::new(),
            bridge: ControlPanelBridge::new(),
            tooltip: TooltipMachine::new(trim),
        }
    }

    /// Marks the base map as already styled for `theme`, so the first
    /// rebuild does not reload the same style.
    pub fn with_map_theme(mut self, theme: Theme) -> Self {
        self.bridge = ControlPanelBridge::with_map_theme(theme);
        self
    }

    /// Builds the first layer from the controls' initial values.
    pub fn start(&mut self) -> Result<(), ControlError> {
        self.rebuild_layer()
    }

    pub fn handle(&mut self, event: &AppEvent) -> Result<(), ControlError> {
        match event {
            AppEvent::ViewStateChanged(camera) => {
                self.on_view_state_change(*camera);
                Ok(())
            }
            AppEvent::ControlChanged(control) => {
                debug!(?control, "control changed");
                self.rebuild_layer()
            }
            AppEvent::Hover(pick) => {
                self.tooltip.on_hover(pick.as_ref(), &mut self.tooltip_view);
                Ok(())
            }
        }
    }

    pub fn on_view_state_change(&mut self, camera: CameraState) -> SyncOutcome {
        self.sync.on_view_state_change(&mut self.map, camera)
    }

    pub fn rebuild_layer(&mut self) -> Result<(), ControlError> {
        self.bridge
            .rebuild(&self.data, &self.controls, &mut self.map, &mut self.surface)
    }

    pub fn data(&self) -> &Rc<DemoData> {
        &self.data
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn controls_mut(&mut self) -> &mut C {
        &mut self.controls
    }

    pub fn tooltip_view(&self) -> &T {
        &self.tooltip_view
    }

    pub fn tooltip_state(&self) -> &TooltipState {
        self.tooltip.state()
    }

    pub fn rebuilds(&self) -> u64 {
        self.bridge.rebuilds()
    }
}

/// Subscribes `app` to every event on `bus`.
///
/// An event that arrives while the app is already handling another one
/// (a collaborator calling back synchronously) is dropped.
pub fn wire<M, S, C, T>(app: Rc<RefCell<App<M, S, C, T>>>, bus: &mut EventBus<AppEvent>) -> HandlerId
where
    M: BaseMap + 'static,
    S: RenderSurface + 'static,
    C: ControlPanel + 'static,
    T: TooltipView + 'static,
{
    bus.subscribe(move |event| {
        let Ok(mut app) = app.try_borrow_mut() else {
            debug!(kind = event.kind(), "dropping re-entrant event");
            return Ok(());
        };
        app.handle(event)
    })
}

#[cfg(test)]
mod tests {
    use super::{App, AppEvent, wire};
    use crate::config::IdTrim;
    use crate::controls::tests::FakePanel;
    use crate::controls::{ControlError, ControlId};
    use crate::surface::DemoData;
    use crate::surface::tests::FakeSurface;
    use crate::sync::tests::FakeMap;
    use crate::tooltip::TooltipState;
    use crate::tooltip::tests::FakeTooltip;
    use formats::{Flow, Location};
    use foundation::CameraState;
    use layers::{BlendMode, PickInfo, Theme};
    use runtime::EventBus;
    use std::cell::RefCell;
    use std::rc::Rc;

    type TestApp = App<FakeMap, FakeSurface, FakePanel, FakeTooltip>;

    fn app_with(locations: Vec<Location>, flows: Vec<Flow>) -> TestApp {
        App::new(
            Rc::new(DemoData::new(locations, flows)),
            FakeMap::ready(),
            FakeSurface::default(),
            FakePanel::default(),
            FakeTooltip::default(),
            IdTrim::default(),
        )
    }

    fn alpha_app() -> TestApp {
        app_with(
            vec![Location {
                id: "A".to_string(),
                name: "Alpha".to_string(),
                lat: 10.0,
                lon: 20.0,
            }],
            vec![Flow {
                origin: "A".to_string(),
                dest: "A".to_string(),
                count: 5.0,
            }],
        )
    }

    #[test]
    fn hovering_a_location_then_elsewhere() {
        let mut app = alpha_app();
        app.start().expect("start");

        let pick = app.surface().current().pick_location(100.0, 50.0, "A");
        app.handle(&AppEvent::Hover(Some(pick))).expect("hover");

        let view = app.tooltip_view();
        assert!(view.visible);
        assert!(view.html.contains("Alpha"));
        assert!(view.html.contains("Incoming trips: 0"));
        assert!(view.html.contains("Outgoing trips: 0"));
        assert!(view.html.contains("Internal or round trips: 5"));
        assert_eq!(view.html.matches("<div>").count(), 4);

        app.handle(&AppEvent::Hover(Some(PickInfo::empty(0.0, 0.0))))
            .expect("hover");
        assert!(!app.tooltip_view().visible);
        assert_eq!(app.tooltip_state(), &TooltipState::Hidden);

        app.handle(&AppEvent::Hover(None)).expect("hover");
        assert!(!app.tooltip_view().visible);
    }

    #[test]
    fn hovering_a_connection_trims_ids() {
        let mut app = app_with(
            Vec::new(),
            vec![Flow {
                origin: "__A__".to_string(),
                dest: "__A__".to_string(),
                count: 5.0,
            }],
        );
        app.start().expect("start");

        let pick = app.surface().current().pick_flow(3.0, 4.0, "__A__", "__A__");
        app.handle(&AppEvent::Hover(Some(pick))).expect("hover");
        assert!(app.tooltip_view().html.contains("<div>A → A</div>"));
        assert!(app.tooltip_view().html.contains("<div>Count: 5</div>"));
    }

    #[test]
    fn dark_mode_toggle_rebuilds_once_per_toggle() {
        let mut app = alpha_app();
        app.start().expect("start");
        assert_eq!(app.rebuilds(), 1);
        assert_eq!(app.surface().blend_mode, Some(BlendMode::Screen));

        app.controls_mut().dark_mode = false;
        app.handle(&AppEvent::ControlChanged(ControlId::DarkMode))
            .expect("toggle");
        assert_eq!(app.rebuilds(), 2);
        assert_eq!(app.map().styles.last().map(String::as_str), Some("grayscale_light"));

        app.controls_mut().dark_mode = true;
        app.handle(&AppEvent::ControlChanged(ControlId::DarkMode))
            .expect("toggle");
        assert_eq!(app.rebuilds(), 3);
        assert_eq!(app.map().styles.last().map(String::as_str), Some("grayscale_dark"));
        assert_eq!(app.surface().blend_mode, Some(BlendMode::Screen));
        assert_eq!(app.surface().background.as_deref(), Some("#000"));
    }

    #[test]
    fn start_keeps_the_creation_style_of_the_map() {
        let mut app = alpha_app().with_map_theme(Theme::Dark);
        app.start().expect("start");
        assert_eq!(app.rebuilds(), 1);
        assert!(app.map().styles.is_empty());
        assert_eq!(app.surface().blend_mode, Some(BlendMode::Screen));
    }

    #[test]
    fn events_flow_through_the_bus() {
        let app = Rc::new(RefCell::new(alpha_app()));
        let mut bus = EventBus::new();
        wire(app.clone(), &mut bus);
        app.borrow_mut().start().expect("start");

        let cam = CameraState::new(20.0, 10.0, 9.0, 15.0, 30.0);
        bus.emit(AppEvent::ViewStateChanged(cam)).expect("emit");
        assert_eq!(app.borrow().map().camera, Some(cam));

        app.borrow_mut().controls_mut().color_scheme = "Reds".to_string();
        bus.emit(AppEvent::ControlChanged(ControlId::ColorScheme))
            .expect("emit");
        assert_eq!(
            app.borrow().surface().current().settings().color_scheme,
            "Reds"
        );

        let kinds: Vec<&str> = bus.trace().map(|t| t.kind).collect();
        assert_eq!(kinds, vec!["view_state_changed", "control_changed"]);
    }

    #[test]
    fn missing_control_surfaces_through_emit() {
        let app = Rc::new(RefCell::new(alpha_app()));
        let mut bus = EventBus::new();
        wire(app.clone(), &mut bus);
        app.borrow_mut().controls_mut().missing = Some(ControlId::ColorScheme);

        let err = bus
            .emit(AppEvent::ControlChanged(ControlId::ColorScheme))
            .expect_err("missing control");
        assert!(matches!(err, ControlError::Missing { .. }));
    }

    #[test]
    fn reentrant_events_are_dropped() {
        let app = Rc::new(RefCell::new(alpha_app()));
        let mut bus = EventBus::new();
        wire(app.clone(), &mut bus);

        let _held = app.borrow_mut();
        let cam = CameraState::new(1.0, 1.0, 1.0, 0.0, 0.0);
        bus.emit(AppEvent::ViewStateChanged(cam)).expect("emit");
        drop(_held);
        assert_eq!(app.borrow().map().camera, None);
    }
}
