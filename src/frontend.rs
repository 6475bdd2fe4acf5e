use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::callback::Timeout;
use js_sys::{Array, Date, Math};
use serde_json::json;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    window, Document, DomRect, Element, FormData, HtmlAnchorElement, HtmlButtonElement,
    HtmlElement, HtmlFormElement, HtmlHeadElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, MouseEvent, Node,
    NodeList, ScrollBehavior, ScrollIntoViewOptions,
};

use crate::config::PageConfig;
use crate::contact::{deliver, ContactPayload, SubmitLabel};
use crate::decor::{
    bubble_count, container_class, BubbleStyle, BUBBLE_TARGETS, RESIZE_DEBOUNCE_MS,
};
use crate::logging::{log_event, LogLevel};
use crate::motion::{
    parallax_offset, translate3d, MotionPreference, ParallaxLayer, PointerOffset, Rect, TiltFrame,
    PARALLAX_RESIZE_DEBOUNCE_MS, PARALLAX_SELECTOR,
};
use crate::page::{
    anchor_target, is_prefetch_candidate, should_reveal, year_text, ImageUpgrade, MenuKey,
    MenuState, PlayState, MENU_ANIMATION_MS, PAUSABLE_SELECTORS, PREFETCH_DELAY_MS, REVEALED,
    REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD,
};
use crate::relay::{describe_js_error, LocationMailClient, Relay};
use crate::schedule::PendingSlot;

struct Page {
    document: Document,
    config: Rc<PageConfig>,
    motion: MotionPreference,
}

type Initializer = fn(&Page) -> Result<(), JsValue>;

const INITIALIZERS: [(&str, Initializer); 10] = [
    ("mobile_menu", init_mobile_menu),
    ("scroll_reveal", init_scroll_reveal),
    ("year", init_year),
    ("contact_form", init_contact_form),
    ("lazy_images", init_lazy_images),
    ("bubbles", init_bubbles),
    ("prefetch", init_prefetch),
    ("visibility_pause", init_visibility_pause),
    ("hero_tilt", init_hero_tilt),
    ("parallax", init_parallax),
];

pub fn run() {
    let Some(document) = window().and_then(|w| w.document()) else {
        return;
    };

    if document.ready_state() != "loading" {
        boot(document);
        return;
    }

    let ready = document.clone();
    EventListener::once(&document, "DOMContentLoaded", move |_| boot(ready)).forget();
}

fn boot(document: Document) {
    let page = Page {
        document,
        config: Rc::new(PageConfig::from_document()),
        motion: MotionPreference::detect(),
    };

    log_event(
        &page.config,
        LogLevel::Debug,
        "boot",
        json!({ "reduced_motion": !page.motion.allows_motion() }),
    );

    for (feature, init) in INITIALIZERS {
        if let Err(error) = init(&page) {
            log_event(
                &page.config,
                LogLevel::Warn,
                "init_failed",
                json!({ "feature": feature, "error": describe_js_error(&error) }),
            );
        }
    }
}

fn missing_window() -> JsValue {
    JsValue::from_str("window unavailable")
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn html_elements(list: NodeList) -> Vec<HtmlElement> {
    elements(list)
        .into_iter()
        .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn rect_of(rect: &DomRect) -> Rect {
    Rect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

fn viewport_height() -> f64 {
    window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0)
}

fn set_transform(element: &HtmlElement, value: &str) {
    let _ = element.style().set_property("transform", value);
}

/// Runs only the last callback handed to it within a quiet period.
struct Debouncer {
    wait_ms: u32,
    pending: PendingSlot<Timeout>,
}

impl Debouncer {
    fn new(wait_ms: u32) -> Self {
        Self {
            wait_ms,
            pending: PendingSlot::new(),
        }
    }

    fn call(&self, callback: impl FnOnce() + 'static) {
        self.pending.replace(Timeout::new(self.wait_ms, callback));
    }
}

struct MobileMenu {
    toggle: Element,
    panel: Element,
    body: Option<HtmlElement>,
    state: Cell<MenuState>,
    settle: PendingSlot<Timeout>,
}

impl MobileMenu {
    fn is_open(&self) -> bool {
        self.state.get().open
    }

    fn set(&self, force: Option<bool>) {
        let next = self.state.get().toggled(force);
        self.state.set(next);

        let _ = self.toggle.set_attribute("aria-expanded", next.aria_expanded());
        let _ = self.panel.class_list().toggle_with_force("active", next.open);
        let _ = self.toggle.class_list().toggle_with_force("active", next.open);

        if let Some(body) = &self.body {
            let _ = body.style().set_property("overflow", next.body_overflow());
        }

        let _ = self.panel.class_list().add_1("animating");
        let panel = self.panel.clone();
        self.settle.replace(Timeout::new(MENU_ANIMATION_MS, move || {
            let _ = panel.class_list().remove_1("animating");
        }));
    }

    fn contains(&self, target: Option<&Node>) -> bool {
        self.panel.contains(target) || self.toggle.contains(target)
    }
}

fn init_mobile_menu(page: &Page) -> Result<(), JsValue> {
    let document = &page.document;
    let (Some(toggle), Some(panel)) = (
        document.get_element_by_id("hamburger"),
        document.get_element_by_id("navLinks"),
    ) else {
        return Ok(());
    };

    toggle.set_attribute("aria-label", "Menu")?;
    toggle.set_attribute("aria-expanded", "false")?;
    toggle.set_attribute("role", "button")?;
    toggle.set_attribute("tabindex", "0")?;

    let menu = Rc::new(MobileMenu {
        toggle: toggle.clone(),
        panel: panel.clone(),
        body: document.body(),
        state: Cell::new(MenuState::default()),
        settle: PendingSlot::new(),
    });

    {
        let menu = Rc::clone(&menu);
        EventListener::new(&toggle, "click", move |_| menu.set(None)).forget();
    }

    {
        let menu = Rc::clone(&menu);
        EventListener::new_with_options(
            &toggle,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                    return;
                };
                if MenuKey::classify(&key, menu.state.get()) == MenuKey::Toggle {
                    event.prevent_default();
                    menu.set(None);
                }
            },
        )
        .forget();
    }

    {
        let menu = Rc::clone(&menu);
        EventListener::new(document, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                return;
            };
            if MenuKey::classify(&key, menu.state.get()) == MenuKey::Close {
                menu.set(Some(false));
            }
        })
        .forget();
    }

    {
        let menu = Rc::clone(&menu);
        EventListener::new(document, "click", move |event| {
            if !menu.is_open() {
                return;
            }
            let target = event.target().and_then(|target| target.dyn_into::<Node>().ok());
            if !menu.contains(target.as_ref()) {
                menu.set(Some(false));
            }
        })
        .forget();
    }

    let sections = document.clone();
    EventListener::new_with_options(
        &panel,
        "click",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(target) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
            else {
                return;
            };
            let Ok(Some(link)) = target.closest("a") else {
                return;
            };

            menu.set(Some(false));

            let Some(id) = link
                .get_attribute("href")
                .as_deref()
                .and_then(anchor_target)
                .map(str::to_string)
            else {
                return;
            };

            event.prevent_default();
            if let Some(section) = sections.get_element_by_id(&id) {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                section.scroll_into_view_with_scroll_into_view_options(&options);
            }
        },
    )
    .forget();

    Ok(())
}

fn init_scroll_reveal(page: &Page) -> Result<(), JsValue> {
    let nodes = elements(page.document.query_selector_all("[data-animate]")?);
    if nodes.is_empty() {
        return Ok(());
    }

    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }

                let target = entry.target();
                if should_reveal(true, target.get_attribute("data-animate").as_deref()) {
                    let _ = target.set_attribute("data-animate", REVEALED);
                }
                observer.unobserve(&target);
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
    options.set_root_margin(REVEAL_ROOT_MARGIN);

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options);
    let Ok(observer) = observer else {
        for node in &nodes {
            node.set_attribute("data-animate", REVEALED)?;
        }
        return Ok(());
    };

    for node in &nodes {
        observer.observe(node);
    }
    callback.forget();

    Ok(())
}

fn init_year(page: &Page) -> Result<(), JsValue> {
    if let Some(element) = page.document.get_element_by_id("year") {
        element.set_text_content(Some(&year_text(Date::new_0().get_full_year())));
    }

    Ok(())
}

fn init_lazy_images(page: &Page) -> Result<(), JsValue> {
    for image in elements(page.document.query_selector_all("img")?) {
        let src = image.get_attribute("src");
        let data_src = image.get_attribute("data-src");
        let plan = ImageUpgrade::plan(
            image.has_attribute("loading"),
            image.has_attribute("decoding"),
            src.as_deref(),
            data_src.as_deref(),
        );

        if plan.set_loading {
            image.set_attribute("loading", "lazy")?;
        }
        if plan.set_decoding {
            image.set_attribute("decoding", "async")?;
        }
        if let Some(src) = plan.src {
            image.set_attribute("src", &src)?;
        }
    }

    Ok(())
}

fn init_contact_form(page: &Page) -> Result<(), JsValue> {
    let Some(form) = page
        .document
        .get_element_by_id("contactForm")
        .and_then(|element| element.dyn_into::<HtmlFormElement>().ok())
    else {
        return Ok(());
    };
    let Some(button) = form
        .query_selector("button")?
        .and_then(|element| element.dyn_into::<HtmlButtonElement>().ok())
    else {
        return Ok(());
    };

    let config = Rc::clone(&page.config);
    let target = form.clone();
    EventListener::new_with_options(
        &target,
        "submit",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();
            if button.disabled() {
                return;
            }
            submit_contact(Rc::clone(&config), form.clone(), button.clone());
        },
    )
    .forget();

    Ok(())
}

fn set_label(button: &HtmlButtonElement, label: SubmitLabel) {
    button.set_text_content(Some(label.text()));
}

fn read_payload(form: &HtmlFormElement) -> ContactPayload {
    let data = FormData::new_with_form(form).ok();
    let field = |name: &str| data.as_ref().and_then(|data| data.get(name).as_string());

    ContactPayload::from_fields(field("name"), field("email"), field("subject"), field("message"))
}

fn submit_contact(config: Rc<PageConfig>, form: HtmlFormElement, button: HtmlButtonElement) {
    button.set_disabled(true);
    set_label(&button, SubmitLabel::Sending);
    let payload = read_payload(&form);

    spawn_local(async move {
        let relay = Relay::detect();
        log_event(
            &config,
            LogLevel::Info,
            "contact_submit",
            json!({ "relay": relay.is_some() }),
        );

        let delivery = deliver(
            relay.as_ref(),
            &LocationMailClient,
            &config.contact_recipient,
            &payload,
        )
        .await;

        if let Some(error) = delivery.relay_error() {
            log_event(
                &config,
                LogLevel::Warn,
                "relay_failed",
                json!({ "reason": error.as_str(), "error": error.to_string() }),
            );
        }
        log_event(
            &config,
            LogLevel::Info,
            "contact_delivered",
            json!({ "outcome": delivery.as_str() }),
        );

        set_label(&button, delivery.label());
        let reset = delivery.resets_form();
        Timeout::new(delivery.settle_delay_ms(), move || {
            set_label(&button, SubmitLabel::Idle);
            button.set_disabled(false);
            if reset {
                form.reset();
            }
        })
        .forget();
    });
}

fn init_bubbles(page: &Page) -> Result<(), JsValue> {
    if !page.motion.allows_motion() {
        return Ok(());
    }

    let targets = Rc::new(elements(page.document.query_selector_all(BUBBLE_TARGETS)?));
    decorate_all(&page.document, &targets);

    let window = window().ok_or_else(missing_window)?;
    let document = page.document.clone();
    let debouncer = Debouncer::new(RESIZE_DEBOUNCE_MS);
    EventListener::new(&window, "resize", move |_| {
        let document = document.clone();
        let targets = Rc::clone(&targets);
        debouncer.call(move || decorate_all(&document, &targets));
    })
    .forget();

    Ok(())
}

fn decorate_all(document: &Document, targets: &[Element]) {
    for (index, target) in targets.iter().enumerate() {
        // A landmark that cannot be decorated keeps its previous bubbles.
        let _ = decorate(document, target, index);
    }
}

fn decorate(document: &Document, target: &Element, index: usize) -> Result<(), JsValue> {
    if let Some(previous) = target.query_selector(":scope > .bubbles")? {
        previous.remove();
    }

    let container = document.create_element("div")?;
    container.set_class_name(&container_class(index));
    container.set_attribute("aria-hidden", "true")?;

    let fragment = document.create_document_fragment();
    let mut random = Math::random;
    for _ in 0..bubble_count(target.get_bounding_client_rect().height()) {
        let bubble = document.create_element("div")?.dyn_into::<HtmlElement>()?;
        bubble.set_class_name("bubble");

        let style = bubble.style();
        for (property, value) in BubbleStyle::generate(&mut random).properties() {
            style.set_property(property, value)?;
        }
        fragment.append_child(&bubble)?;
    }

    container.append_child(&fragment)?;
    target.class_list().add_1("has-bubbles")?;
    target.insert_before(&container, target.first_child().as_ref())?;

    Ok(())
}

struct Prefetcher {
    document: Document,
    head: HtmlHeadElement,
    config: Rc<PageConfig>,
    hinted: RefCell<HashSet<String>>,
}

impl Prefetcher {
    fn schedule(self: &Rc<Self>, href: String) -> Option<Timeout> {
        if self.hinted.borrow().contains(&href) {
            return None;
        }

        let prefetcher = Rc::clone(self);
        Some(Timeout::new(PREFETCH_DELAY_MS, move || prefetcher.hint(href)))
    }

    fn hint(&self, href: String) {
        if !self.hinted.borrow_mut().insert(href.clone()) {
            return;
        }

        if let Err(error) = self.append_link(&href) {
            self.hinted.borrow_mut().remove(&href);
            log_event(
                &self.config,
                LogLevel::Warn,
                "prefetch",
                json!({ "ok": false, "error": describe_js_error(&error) }),
            );
            return;
        }

        log_event(&self.config, LogLevel::Debug, "prefetch", json!({ "ok": true, "href": href }));
    }

    fn append_link(&self, href: &str) -> Result<(), JsValue> {
        let link = self.document.create_element("link")?;
        link.set_attribute("rel", "prefetch")?;
        link.set_attribute("href", href)?;
        self.head.append_child(&link)?;
        Ok(())
    }
}

fn init_prefetch(page: &Page) -> Result<(), JsValue> {
    let Some(head) = page.document.head() else {
        return Ok(());
    };

    let prefetcher = Rc::new(Prefetcher {
        document: page.document.clone(),
        head,
        config: Rc::clone(&page.config),
        hinted: RefCell::new(HashSet::new()),
    });

    for link in elements(page.document.query_selector_all("a[href]")?) {
        let Ok(anchor) = link.dyn_into::<HtmlAnchorElement>() else {
            continue;
        };
        let href = anchor.href();
        if !is_prefetch_candidate(&href) {
            continue;
        }

        let pending = Rc::new(PendingSlot::<Timeout>::new());

        {
            let pending = Rc::clone(&pending);
            let prefetcher = Rc::clone(&prefetcher);
            EventListener::new(&anchor, "mouseenter", move |_| {
                match prefetcher.schedule(href.clone()) {
                    Some(timeout) => pending.replace(timeout),
                    None => drop(pending.take()),
                }
            })
            .forget();
        }

        EventListener::new(&anchor, "mouseleave", move |_| drop(pending.take())).forget();
    }

    Ok(())
}

fn init_visibility_pause(page: &Page) -> Result<(), JsValue> {
    let document = page.document.clone();
    EventListener::new(&page.document, "visibilitychange", move |_| {
        let state = PlayState::for_visibility(document.hidden());

        for selector in PAUSABLE_SELECTORS {
            let Ok(list) = document.query_selector_all(selector) else {
                continue;
            };
            for element in html_elements(list) {
                let _ = element.style().set_property("animation-play-state", state.as_str());
            }
        }
    })
    .forget();

    Ok(())
}

struct HeroTilt {
    wrapper: Element,
    image: HtmlElement,
    shapes: Vec<HtmlElement>,
    frame: PendingSlot<AnimationFrame>,
}

impl HeroTilt {
    fn track(self: &Rc<Self>, client_x: i32, client_y: i32) {
        let rect = rect_of(&self.wrapper.get_bounding_client_rect());
        let offset = PointerOffset::from_pointer(f64::from(client_x), f64::from(client_y), rect);
        self.schedule(TiltFrame::at(offset, self.shapes.len()));
    }

    fn reset(self: &Rc<Self>) {
        self.schedule(TiltFrame::neutral(self.shapes.len()));
    }

    /// Keeps at most one frame pending; a newer frame replaces an older one.
    fn schedule(self: &Rc<Self>, frame: TiltFrame) {
        let tilt = Rc::clone(self);
        self.frame.replace(request_animation_frame(move |_| {
            drop(tilt.frame.take());
            tilt.apply(&frame);
        }));
    }

    fn apply(&self, frame: &TiltFrame) {
        set_transform(&self.image, &frame.image);
        for (shape, transform) in self.shapes.iter().zip(&frame.shapes) {
            set_transform(shape, transform);
        }
    }
}

fn init_hero_tilt(page: &Page) -> Result<(), JsValue> {
    if !page.motion.allows_motion() {
        return Ok(());
    }

    let Some(wrapper) = page.document.query_selector(".hero-image-wrapper")? else {
        return Ok(());
    };
    let Some(image) = wrapper
        .query_selector(".hero-image")?
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return Ok(());
    };
    let shapes = html_elements(wrapper.query_selector_all(".geometric-shapes .shape")?);

    let tilt = Rc::new(HeroTilt {
        wrapper: wrapper.clone(),
        image,
        shapes,
        frame: PendingSlot::new(),
    });

    {
        let tilt = Rc::clone(&tilt);
        EventListener::new(&wrapper, "pointermove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                tilt.track(event.client_x(), event.client_y());
            }
        })
        .forget();
    }

    for kind in ["pointerleave", "pointercancel"] {
        let tilt = Rc::clone(&tilt);
        EventListener::new(&wrapper, kind, move |_| tilt.reset()).forget();
    }

    Ok(())
}

struct ScrollParallax {
    elements: Vec<(HtmlElement, ParallaxLayer)>,
    frame: PendingSlot<AnimationFrame>,
}

impl ScrollParallax {
    /// Coalesces scroll and resize bursts into one update per frame.
    fn request(self: &Rc<Self>) {
        self.frame.fill_if_empty(|| {
            let parallax = Rc::clone(self);
            request_animation_frame(move |_| {
                drop(parallax.frame.take());
                parallax.update();
            })
        });
    }

    fn update(&self) {
        let viewport_height = viewport_height();
        let now = Date::now();

        for (index, (element, layer)) in self.elements.iter().enumerate() {
            let rect = rect_of(&element.get_bounding_client_rect());
            let (tx, ty) = parallax_offset(*layer, index, rect, viewport_height, now);
            set_transform(element, &translate3d(tx, ty));
        }
    }
}

fn init_parallax(page: &Page) -> Result<(), JsValue> {
    if !page.motion.allows_motion() {
        return Ok(());
    }

    let elements: Vec<_> = html_elements(page.document.query_selector_all(PARALLAX_SELECTOR)?)
        .into_iter()
        .map(|element| {
            let layer = if element.class_list().contains("orb") {
                ParallaxLayer::Orb
            } else {
                ParallaxLayer::Shape
            };
            (element, layer)
        })
        .collect();
    if elements.is_empty() {
        return Ok(());
    }

    let parallax = Rc::new(ScrollParallax {
        elements,
        frame: PendingSlot::new(),
    });
    let window = window().ok_or_else(missing_window)?;

    {
        let parallax = Rc::clone(&parallax);
        EventListener::new(&window, "scroll", move |_| parallax.request()).forget();
    }

    {
        let parallax = Rc::clone(&parallax);
        let debouncer = Debouncer::new(PARALLAX_RESIZE_DEBOUNCE_MS);
        EventListener::new(&window, "resize", move |_| {
            let parallax = Rc::clone(&parallax);
            debouncer.call(move || parallax.request());
        })
        .forget();
    }

    parallax.request();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
    use web_sys::{Event, MouseEventInit};

    wasm_bindgen_test_configure!(run_in_browser);

    /// Long enough for a requested animation frame to have run.
    const FRAME_WAIT_MS: u32 = 100;

    fn page(motion: MotionPreference) -> Page {
        Page {
            document: window().and_then(|w| w.document()).expect("browser document"),
            config: Rc::new(PageConfig::default()),
            motion,
        }
    }

    /// Mounts `html` in a fresh host under `<body>`; remove the host when done.
    fn mount(document: &Document, html: &str) -> Element {
        let host = document.create_element("div").expect("host element");
        host.set_inner_html(html);
        document
            .body()
            .expect("document body")
            .append_child(&host)
            .expect("mounted host");
        host
    }

    fn transform(element: &HtmlElement) -> String {
        element
            .style()
            .get_property_value("transform")
            .expect("readable style")
    }

    fn hero(host: &Element) -> (Element, HtmlElement, Vec<HtmlElement>) {
        let wrapper = host
            .query_selector(".hero-image-wrapper")
            .expect("valid selector")
            .expect("wrapper");
        let image = wrapper
            .query_selector(".hero-image")
            .expect("valid selector")
            .expect("image")
            .dyn_into::<HtmlElement>()
            .expect("html image");
        let shapes = html_elements(wrapper.query_selector_all(".shape").expect("valid selector"));
        (wrapper, image, shapes)
    }

    const HERO: &str = r#"
        <div class="hero-image-wrapper" style="width: 200px; height: 200px">
            <img class="hero-image" alt="" />
            <div class="geometric-shapes">
                <span class="shape"></span>
                <span class="shape"></span>
            </div>
        </div>
        <div class="orb-tray"><span class="orb"></span></div>
    "#;

    fn pointer(kind: &str, client_x: i32, client_y: i32) -> Event {
        let init = MouseEventInit::new();
        init.set_client_x(client_x);
        init.set_client_y(client_y);
        MouseEvent::new_with_mouse_event_init_dict(kind, &init)
            .expect("pointer event")
            .into()
    }

    #[wasm_bindgen_test]
    fn year_is_optional() {
        let page = page(MotionPreference::Full);
        if let Some(existing) = page.document.get_element_by_id("year") {
            existing.remove();
        }

        assert!(init_year(&page).is_ok());
    }

    #[wasm_bindgen_test]
    fn year_is_written_when_present() {
        let page = page(MotionPreference::Full);
        let host = mount(&page.document, r#"<span id="year"></span>"#);

        init_year(&page).expect("year stamp");

        let year = page.document.get_element_by_id("year").expect("year element");
        assert_eq!(year.text_content(), Some(Date::new_0().get_full_year().to_string()));
        host.remove();
    }

    #[wasm_bindgen_test]
    fn regenerating_bubbles_keeps_one_container() {
        let page = page(MotionPreference::Full);
        let host = mount(&page.document, "<section><p>Body</p></section>");
        let section = host.first_element_child().expect("section");

        decorate(&page.document, &section, 0).expect("first pass");
        decorate(&page.document, &section, 1).expect("second pass");

        let containers = section
            .query_selector_all(":scope > .bubbles")
            .expect("valid selector");
        assert_eq!(containers.length(), 1);
        let first = section.first_element_child().expect("container first");
        assert_eq!(first.class_name(), container_class(1));
        assert!(section.class_list().contains("has-bubbles"));
        host.remove();
    }

    #[wasm_bindgen_test]
    async fn reduced_motion_writes_no_transforms() {
        let page = page(MotionPreference::Reduced);
        let host = mount(&page.document, HERO);
        let (wrapper, image, shapes) = hero(&host);

        init_hero_tilt(&page).expect("tilt setup");
        init_parallax(&page).expect("parallax setup");
        wrapper
            .dispatch_event(&pointer("pointermove", 10, 10))
            .expect("dispatched move");
        window()
            .expect("window")
            .dispatch_event(&Event::new("scroll").expect("scroll event"))
            .expect("dispatched scroll");
        TimeoutFuture::new(FRAME_WAIT_MS).await;

        assert_eq!(transform(&image), "");
        for shape in &shapes {
            assert_eq!(transform(shape), "");
        }
        let orbs = html_elements(host.query_selector_all(".orb").expect("valid selector"));
        assert!(orbs.iter().all(|orb| transform(orb).is_empty()));
        host.remove();
    }

    #[wasm_bindgen_test]
    async fn pointer_leave_ends_neutral() {
        let page = page(MotionPreference::Full);
        let host = mount(&page.document, HERO);
        let (wrapper, image, shapes) = hero(&host);
        let rect = wrapper.get_bounding_client_rect();
        let (corner_x, corner_y) = (rect.left() as i32 + 5, rect.top() as i32 + 5);

        init_hero_tilt(&page).expect("tilt setup");

        wrapper
            .dispatch_event(&pointer("pointermove", corner_x, corner_y))
            .expect("dispatched move");
        TimeoutFuture::new(FRAME_WAIT_MS).await;
        assert!(!transform(&image).is_empty());

        // A tilt still waiting for its frame is superseded by the leave.
        wrapper
            .dispatch_event(&pointer("pointermove", corner_x, corner_y))
            .expect("dispatched move");
        wrapper
            .dispatch_event(&pointer("pointerleave", corner_x, corner_y))
            .expect("dispatched leave");
        TimeoutFuture::new(FRAME_WAIT_MS).await;

        assert_eq!(transform(&image), "");
        for shape in &shapes {
            assert_eq!(transform(shape), "");
        }
        host.remove();
    }
}
