#![cfg(target_arch = "wasm32")]

use backdrop_wasm::error::BackdropError;
use backdrop_wasm::planner::{AdventureResult, PlannerView, FAILURE_MESSAGE};
use backdrop_wasm::wasm::{render, ui, DomPlannerView};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlElement, KeyboardEvent, KeyboardEventInit};

wasm_bindgen_test_configure!(run_in_browser);

const PANEL: &str = r#"
<form id="planner-form">
  <textarea id="planner-prompt"></textarea>
  <button id="planner-submit" type="submit">Plan</button>
</form>
<p id="planner-message" class="hidden"></p>
<div id="planner-result" class="hidden">
  <h3 id="planner-title"></h3>
  <p id="planner-description"></p>
  <ul id="planner-locations"><li>stale</li><li>stale</li></ul>
  <ul id="planner-activities"></ul>
</div>
"#;

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn mount() -> web_sys::Element {
    let doc = document();
    if let Some(old) = doc.get_element_by_id("planner-fixture") {
        old.remove();
    }
    let root = doc.create_element("div").unwrap();
    root.set_id("planner-fixture");
    root.set_inner_html(PANEL);
    doc.body().unwrap().append_child(&root).unwrap();
    root
}

#[wasm_bindgen_test]
fn canvas_without_webgl2_is_a_capability_miss() {
    let doc = document();
    let canvas: web_sys::HtmlCanvasElement = doc.create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_id("bg-canvas");
    doc.body().unwrap().append_child(&canvas).unwrap();

    // a canvas bound to a 2d context can never hand out webgl2
    assert!(canvas.get_context("2d").unwrap().is_some());
    let out = render::start(&doc, canvas.clone());
    assert!(matches!(out, Err(BackdropError::Capability(_))), "{:?}", out);
    canvas.remove();
}

#[wasm_bindgen_test]
fn one_item_per_location_and_activity() {
    let root = mount();
    let view = DomPlannerView::from_document(&document()).unwrap();

    view.show_result(&AdventureResult {
        title: "Coastal Escape".into(),
        description: "Sea air.".into(),
        locations: vec!["Sintra".into()],
        activities: vec!["Surfing".into()],
    });

    let doc = document();
    assert_eq!(doc.query_selector_all("#planner-locations li").unwrap().length(), 1);
    assert_eq!(doc.query_selector_all("#planner-activities li").unwrap().length(), 1);
    assert_eq!(doc.get_element_by_id("planner-title").unwrap().text_content().unwrap(), "Coastal Escape");
    assert!(!doc.get_element_by_id("planner-result").unwrap().class_list().contains("hidden"));
    root.remove();
}

#[wasm_bindgen_test]
fn busy_state_and_failure_message() {
    let root = mount();
    let view = DomPlannerView::from_document(&document()).unwrap();
    let button: web_sys::HtmlButtonElement =
        document().get_element_by_id("planner-submit").unwrap().dyn_into().unwrap();

    view.set_busy(true);
    assert!(button.disabled());
    view.show_message(FAILURE_MESSAGE);
    view.set_busy(false);
    assert!(!button.disabled());

    let message = document().get_element_by_id("planner-message").unwrap();
    assert_eq!(message.text_content().unwrap(), FAILURE_MESSAGE);
    assert!(!message.class_list().contains("hidden"));
    root.remove();
}

fn mount_html(id: &str, html: &str) -> Element {
    let doc = document();
    if let Some(old) = doc.get_element_by_id(id) {
        old.remove();
    }
    let root = doc.create_element("div").unwrap();
    root.set_id(id);
    root.set_inner_html(html);
    doc.body().unwrap().append_child(&root).unwrap();
    root
}

fn click(id: &str) {
    document().get_element_by_id(id).unwrap().dyn_into::<HtmlElement>().unwrap().click();
}

fn has_class(id: &str, class: &str) -> bool {
    document().get_element_by_id(id).unwrap().class_list().contains(class)
}

fn press(key: &str) {
    let init = KeyboardEventInit::new();
    init.set_key(key);
    init.set_bubbles(true);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    document().dispatch_event(&event).unwrap();
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
fn mobile_menu_toggles_and_closes_on_link() {
    let root = mount_html(
        "menu-fixture",
        r##"<button id="mobile-menu-button">menu</button>
            <div id="mobile-menu" class="hidden">
              <a id="menu-link" href="#menu-fixture">Research</a>
              <span id="menu-text">not a link</span>
            </div>"##,
    );
    ui::mobile_menu(&document()).unwrap();

    click("mobile-menu-button");
    assert!(!has_class("mobile-menu", "hidden"));
    click("menu-text");
    assert!(!has_class("mobile-menu", "hidden"));
    click("menu-link");
    assert!(has_class("mobile-menu", "hidden"));
    click("mobile-menu-button");
    assert!(!has_class("mobile-menu", "hidden"));
    root.remove();
}

#[wasm_bindgen_test]
fn modals_open_and_close_every_way() {
    let root = mount_html(
        "modal-fixture",
        r##"<button id="open-a" data-modal-target="modal-a">open</button>
            <div id="modal-a" class="modal hidden">
              <div id="dialog-a" class="dialog">
                <button id="close-a" data-modal-close>x</button>
              </div>
            </div>"##,
    );
    ui::modals(&document()).unwrap();

    click("open-a");
    assert!(!has_class("modal-a", "hidden"));
    click("close-a");
    assert!(has_class("modal-a", "hidden"));

    click("open-a");
    click("dialog-a");
    assert!(!has_class("modal-a", "hidden"), "clicks inside the dialog keep it open");
    click("modal-a");
    assert!(has_class("modal-a", "hidden"));

    click("open-a");
    press("Enter");
    assert!(!has_class("modal-a", "hidden"));
    press("Escape");
    assert!(has_class("modal-a", "hidden"));
    root.remove();
}

#[wasm_bindgen_test]
fn collapsible_swaps_label() {
    let root = mount_html(
        "collapse-fixture",
        r##"<p id="summary" class="collapsible">long text</p>
            <button id="summary-toggle" data-collapsible-toggle="summary">Read more</button>"##,
    );
    ui::collapsibles(&document()).unwrap();
    let label = || document().get_element_by_id("summary-toggle").unwrap().text_content().unwrap();

    click("summary-toggle");
    assert!(has_class("summary", "expanded"));
    assert_eq!(label(), "Read less");
    click("summary-toggle");
    assert!(!has_class("summary", "expanded"));
    assert_eq!(label(), "Read more");
    root.remove();
}

#[wasm_bindgen_test]
async fn sections_fade_in_when_visible() {
    let root = mount_html(
        "fade-fixture",
        r##"<section id="fade-a" class="section-hidden" style="height: 200px">visible</section>"##,
    );
    // pinned to the top of the viewport whatever else the runner renders
    root.set_attribute("style", "position: fixed; top: 0; left: 0; width: 100%").unwrap();
    ui::fade_in(&document()).unwrap();

    for _ in 0..20 {
        if has_class("fade-a", "section-visible") {
            break;
        }
        sleep(50).await;
    }
    assert!(has_class("fade-a", "section-visible"));
    assert!(!has_class("fade-a", "section-hidden"));
    root.remove();
}
