use std::cell::{Cell, RefCell};
use std::rc::Rc;

use console_error_panic_hook::set_once;
use formats::{Dataset, DatasetSource, parse_flows_str, parse_locations_str};
use foundation::{CameraState, FitOptions, ViewportSize, fit_points};
use futures_util::future::try_join;
use gloo_net::http::Request;
use js_sys::{Function, Object, Reflect};
use layers::{BlendMode, Layer, Theme};
use runtime::{EventBus, ReadinessGate};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement, HtmlInputElement, HtmlSelectElement};

use crate::app::{App, AppEvent, wire};
use crate::config::{ControlIds, WebConfig};
use crate::controls::{ControlError, ControlId, ControlPanel};
use crate::pick::{PickFields, pick_from_fields};
use crate::surface::{DemoData, DemoLayer, RenderSurface};
use crate::sync::BaseMap;
use crate::tooltip::{TooltipPosition, TooltipView};

// Vendor constructors only; everything else happens in Rust.
#[wasm_bindgen(inline_js = "
import {Deck} from '@deck.gl/core';
import {FlowmapLayer} from '@flowmap.gl/layers';
import atlas from 'azure-maps-control';

export function flowmap_create_map(containerId, subscriptionKey, style, camera) {
    return new atlas.Map(containerId, {
        authOptions: {
            authType: atlas.AuthenticationType.subscriptionKey,
            subscriptionKey,
        },
        style,
        interactive: false,
        center: [camera.longitude, camera.latitude],
        zoom: camera.zoom,
        bearing: camera.bearing,
        pitch: camera.pitch,
    });
}

export function flowmap_on_map_ready(map, callback) {
    map.events.add('ready', callback);
}

export function flowmap_set_camera(map, camera) {
    map.setCamera({
        center: [camera.longitude, camera.latitude],
        zoom: camera.zoom,
        bearing: camera.bearing,
        pitch: camera.pitch,
    });
}

export function flowmap_set_style(map, style) {
    map.setStyle({style});
}

export function flowmap_create_deck(canvasId, camera, onViewStateChange) {
    return new Deck({
        canvas: canvasId,
        width: '100%',
        height: '100%',
        initialViewState: camera,
        controller: true,
        map: true,
        onViewStateChange: ({viewState}) => onViewStateChange(viewState),
        layers: [],
    });
}

export function flowmap_parse_data(json) {
    return JSON.parse(json);
}

export function flowmap_set_layer(deck, id, data, settings, onHover) {
    deck.setProps({
        layers: [
            new FlowmapLayer({
                id,
                data,
                pickable: true,
                colorScheme: settings.colorScheme,
                darkMode: settings.darkMode,
                clusteringEnabled: settings.clusteringEnabled,
                getLocationId: (loc) => loc.id,
                getLocationLat: (loc) => loc.lat ?? NaN,
                getLocationLon: (loc) => loc.lon ?? NaN,
                getFlowOriginId: (flow) => flow.origin,
                getFlowDestId: (flow) => flow.dest,
                getFlowMagnitude: (flow) => flow.count ?? NaN,
                getLocationName: (loc) => loc.name,
                onHover,
            }),
        ],
    });
}
")]
extern "C" {
    type AtlasMap;
    type Deck;

    fn flowmap_create_map(
        container_id: &str,
        subscription_key: &str,
        style: &str,
        camera: &JsValue,
    ) -> AtlasMap;
    fn flowmap_on_map_ready(map: &AtlasMap, callback: &Function);
    fn flowmap_set_camera(map: &AtlasMap, camera: &JsValue);
    fn flowmap_set_style(map: &AtlasMap, style: &str);
    fn flowmap_create_deck(
        canvas_id: &str,
        camera: &JsValue,
        on_view_state_change: &Function,
    ) -> Deck;
    #[wasm_bindgen(catch)]
    fn flowmap_parse_data(json: &str) -> Result<JsValue, JsValue>;
    fn flowmap_set_layer(
        deck: &Deck,
        id: &str,
        data: &JsValue,
        settings: &JsValue,
        on_hover: &Function,
    );
}

type Bus = Rc<RefCell<EventBus<AppEvent>>>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Loads the dataset and brings the viewer up.
///
/// `config_json` is a (possibly partial) [`WebConfig`]. A failed fetch
/// leaves the page unrendered and logs to the console.
#[wasm_bindgen]
pub fn run(config_json: &str) -> Result<(), JsValue> {
    let config = WebConfig::from_json(config_json).map_err(|e| js_err(&e.to_string()))?;
    spawn_local(async move {
        if let Err(err) = run_inner(config).await {
            web_sys::console::error_1(&JsValue::from_str(&format!(
                "flowmap startup error: {:?}",
                err
            )));
        }
    });
    Ok(())
}

/// Everything `attach` needs once the base map reports ready.
struct Startup {
    document: Document,
    config: WebConfig,
    data: Rc<DemoData>,
    js_data: JsValue,
    camera: CameraState,
    theme: Theme,
    base_map: AzureBaseMap,
    controls: DomControls,
}

async fn run_inner(config: WebConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
    let document = window.document().ok_or_else(|| js_err("no document"))?;

    let mut gate = ReadinessGate::new(&["data", "map"]);
    let dataset = fetch_dataset(&DatasetSource::new(config.data_base_url.clone())).await?;
    gate.signal("data");

    let json = serde_json::to_string(&dataset).map_err(|e| js_err(&e.to_string()))?;
    let js_data = flowmap_parse_data(&json)?;
    let data = Rc::new(DemoData::from(dataset));

    let viewport = ViewportSize::new(
        window.inner_width()?.as_f64().unwrap_or(1280.0),
        window.inner_height()?.as_f64().unwrap_or(720.0),
    );
    let opts = FitOptions {
        pad: config.fit_padding,
        ..FitOptions::default()
    };
    let camera = fit_points(data.location_coords(), viewport, opts)
        .unwrap_or_else(|| CameraState::new(0.0, 0.0, 1.0, 0.0, 0.0));

    let controls = DomControls {
        document: document.clone(),
        ids: config.controls.clone(),
    };
    let dark_mode = controls.is_checked(ControlId::DarkMode).map_err(to_js)?;
    let theme = Theme::from_dark_mode(dark_mode);

    let map = flowmap_create_map(
        &config.map_container_id,
        &config.map_subscription_key,
        theme.map_style(),
        &camera_to_js(camera)?,
    );

    let ready = Rc::new(Cell::new(false));
    let gate = Rc::new(RefCell::new(gate));
    let pending: Rc<RefCell<Option<Startup>>> = Rc::new(RefCell::new(None));
    let on_ready = {
        let ready = ready.clone();
        let pending = pending.clone();
        Closure::once_into_js(move || {
            ready.set(true);
            if !gate.borrow_mut().signal("map") {
                return;
            }
            let Some(startup) = pending.borrow_mut().take() else {
                return;
            };
            if let Err(err) = attach(startup) {
                web_sys::console::error_1(&JsValue::from_str(&format!(
                    "flowmap attach error: {:?}",
                    err
                )));
            }
        })
    };
    flowmap_on_map_ready(&map, on_ready.unchecked_ref());

    // The ready event fires asynchronously, after this assignment.
    *pending.borrow_mut() = Some(Startup {
        document,
        config,
        data,
        js_data,
        camera,
        theme,
        base_map: AzureBaseMap {
            map,
            ready,
            camera: Some(camera),
        },
        controls,
    });
    Ok(())
}

fn attach(startup: Startup) -> Result<(), JsValue> {
    let Startup {
        document,
        config,
        data,
        js_data,
        camera,
        theme,
        base_map,
        controls,
    } = startup;
    let bus: Bus = Rc::new(RefCell::new(EventBus::new()));

    let on_view_state = {
        let bus = bus.clone();
        Closure::<dyn FnMut(JsValue) -> Result<(), JsValue>>::new(move |view_state: JsValue| {
            emit(&bus, AppEvent::ViewStateChanged(camera_from_js(&view_state)))
        })
    };
    let deck = flowmap_create_deck(
        &config.canvas_id,
        &camera_to_js(camera)?,
        on_view_state.as_ref().unchecked_ref(),
    );
    on_view_state.forget();

    let on_hover = {
        let bus = bus.clone();
        Closure::<dyn FnMut(JsValue) -> Result<(), JsValue>>::new(move |info: JsValue| {
            emit(&bus, AppEvent::Hover(pick_from_fields(&info)))
        })
    };
    let canvas = html_element(&document, &config.canvas_id)?;
    let surface = DeckSurface {
        deck,
        data: js_data,
        on_hover: on_hover.into_js_value().unchecked_into::<Function>(),
        canvas: canvas.clone(),
        body: document.body().ok_or_else(|| js_err("no body"))?,
    };
    let tooltip = DomTooltip {
        element: html_element(&document, &config.tooltip_id)?,
    };

    let app: Rc<RefCell<WebApp>> = Rc::new(RefCell::new(
        App::new(data, base_map, surface, controls, tooltip, config.id_trim)
            .with_map_theme(theme),
    ));
    wire(app.clone(), &mut bus.borrow_mut());
    app.borrow_mut().start().map_err(to_js)?;

    let nodes = document.query_selector_all(&config.control_selector)?;
    for i in 0..nodes.length() {
        let Some(element) = nodes.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) else {
            continue;
        };
        let Some(control) = config.controls.control_for(&element.id()) else {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "ignoring unknown control #{}",
                element.id()
            )));
            continue;
        };
        let bus = bus.clone();
        let on_change = Closure::<dyn FnMut() -> Result<(), JsValue>>::new(move || {
            emit(&bus, AppEvent::ControlChanged(control))
        });
        element.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
        on_change.forget();
    }

    // Flow canvas sits between the map tiles and the map's own controls.
    let container = html_element(&document, &config.map_container_id)?;
    let map_controls = container.query_selector(".atlas-control-container")?;
    container.insert_before(&canvas, map_controls.as_deref())?;
    Ok(())
}

type WebApp = App<AzureBaseMap, DeckSurface, DomControls, DomTooltip>;

fn emit(bus: &Bus, event: AppEvent) -> Result<(), JsValue> {
    let Ok(mut bus) = bus.try_borrow_mut() else {
        // Re-entrant callback from inside a handler.
        return Ok(());
    };
    bus.emit(event).map_err(to_js)
}

async fn fetch_dataset(source: &DatasetSource) -> Result<Dataset, JsValue> {
    let (locations, flows) =
        try_join(fetch_text(&source.locations_url()), fetch_text(&source.flows_url())).await?;
    let locations = parse_locations_str(&locations).map_err(|e| js_err(&e.to_string()))?;
    let flows = parse_flows_str(&flows).map_err(|e| js_err(&e.to_string()))?;
    Ok(Dataset::new(locations, flows))
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    if !resp.ok() {
        return Err(js_err(&format!("HTTP {} for {url}", resp.status())));
    }
    resp.text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

struct AzureBaseMap {
    map: AtlasMap,
    ready: Rc<Cell<bool>>,
    camera: Option<CameraState>,
}

impl BaseMap for AzureBaseMap {
    fn is_ready(&self) -> bool {
        self.ready.get()
    }

    fn camera(&self) -> Option<CameraState> {
        self.camera
    }

    fn set_camera(&mut self, camera: CameraState) {
        let Ok(js) = camera_to_js(camera) else {
            return;
        };
        flowmap_set_camera(&self.map, &js);
        self.camera = Some(camera);
    }

    fn set_style(&mut self, style: &str) {
        flowmap_set_style(&self.map, style);
    }
}

struct DeckSurface {
    deck: Deck,
    data: JsValue,
    on_hover: Function,
    canvas: HtmlElement,
    body: HtmlElement,
}

impl RenderSurface for DeckSurface {
    fn set_layer(&mut self, layer: DemoLayer) {
        let settings = layer.settings();
        let props = Object::new();
        let set = |k: &str, v: JsValue| Reflect::set(&props, &JsValue::from_str(k), &v);
        let res = set("colorScheme", JsValue::from_str(&settings.color_scheme))
            .and_then(|_| set("darkMode", JsValue::from_bool(settings.dark_mode)))
            .and_then(|_| {
                set(
                    "clusteringEnabled",
                    JsValue::from_bool(settings.clustering_enabled),
                )
            });
        if let Err(err) = res {
            web_sys::console::error_1(&err);
            return;
        }
        flowmap_set_layer(&self.deck, layer.id().0, &self.data, &props, &self.on_hover);
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        let _ = self.canvas.style().set_property("mix-blend-mode", mode.as_css());
    }

    fn set_page_background(&mut self, color: &str) {
        let _ = self.body.style().set_property("background-color", color);
    }
}

struct DomControls {
    document: Document,
    ids: ControlIds,
}

impl DomControls {
    fn element(&self, control: ControlId) -> Result<web_sys::Element, ControlError> {
        let element_id = self.ids.element_id(control);
        self.document
            .get_element_by_id(element_id)
            .ok_or_else(|| ControlError::Missing {
                element_id: element_id.to_string(),
            })
    }
}

impl ControlPanel for DomControls {
    fn select_value(&self, control: ControlId) -> Result<String, ControlError> {
        let select = self
            .element(control)?
            .dyn_into::<HtmlSelectElement>()
            .map_err(|_| ControlError::WrongKind {
                element_id: self.ids.element_id(control).to_string(),
                expected: "select",
            })?;
        Ok(select.value())
    }

    fn is_checked(&self, control: ControlId) -> Result<bool, ControlError> {
        let input = self
            .element(control)?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| ControlError::WrongKind {
                element_id: self.ids.element_id(control).to_string(),
                expected: "checkbox",
            })?;
        Ok(input.checked())
    }
}

struct DomTooltip {
    element: HtmlElement,
}

impl TooltipView for DomTooltip {
    fn show(&mut self, position: TooltipPosition, html: &str) {
        let style = self.element.style();
        let _ = style.set_property("left", &format!("{}px", position.left));
        let _ = style.set_property("top", &format!("{}px", position.top));
        self.element.set_inner_html(html);
        let _ = style.set_property("display", "block");
    }

    fn hide(&mut self) {
        let _ = self.element.style().set_property("display", "none");
    }
}

fn camera_to_js(camera: CameraState) -> Result<JsValue, JsValue> {
    let out = Object::new();
    for (key, value) in [
        ("longitude", camera.longitude),
        ("latitude", camera.latitude),
        ("zoom", camera.zoom),
        ("bearing", camera.bearing),
        ("pitch", camera.pitch),
    ] {
        Reflect::set(&out, &JsValue::from_str(key), &JsValue::from_f64(value))?;
    }
    Ok(out.into())
}

fn camera_from_js(view_state: &JsValue) -> CameraState {
    CameraState::new(
        get_f64(view_state, "longitude"),
        get_f64(view_state, "latitude"),
        get_f64(view_state, "zoom"),
        get_f64(view_state, "bearing"),
        get_f64(view_state, "pitch"),
    )
}

impl PickFields for JsValue {
    fn is_absent(&self) -> bool {
        self.is_null() || self.is_undefined()
    }

    fn number(&self, path: &[&str]) -> f64 {
        walk(self, path).as_f64().unwrap_or(f64::NAN)
    }

    fn text(&self, path: &[&str]) -> String {
        walk(self, path).as_string().unwrap_or_default()
    }
}

fn walk(obj: &JsValue, path: &[&str]) -> JsValue {
    path.iter().fold(obj.clone(), |v, key| get(&v, key))
}

fn get(obj: &JsValue, key: &str) -> JsValue {
    if !obj.is_object() {
        return JsValue::UNDEFINED;
    }
    Reflect::get(obj, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn get_f64(obj: &JsValue, key: &str) -> f64 {
    get(obj, key).as_f64().unwrap_or(f64::NAN)
}

fn html_element(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| js_err(&format!("missing #{id}")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| js_err(&format!("#{id} is not an HTML element")))
}

fn js_err(msg: &str) -> JsValue {
    JsValue::from_str(msg)
}

fn to_js(err: ControlError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
