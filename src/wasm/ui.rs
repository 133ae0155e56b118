use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlAnchorElement, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, NodeList, Window,
};

use crate::nav;

const READ_MORE: &str = "Read more";
const READ_LESS: &str = "Read less";

/// Wire every independent piece of page behaviour. Each piece is skipped
/// when the markup it needs is absent.
pub fn install(window: &Window, document: &Document) -> Result<(), JsValue> {
    mobile_menu(document)?;
    scroll_effects(window, document)?;
    fade_in(document)?;
    modals(document)?;
    collapsibles(document)?;
    Ok(())
}

fn elements(list: NodeList) -> impl Iterator<Item = Element> {
    (0..list.length())
        .filter_map(move |i| list.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
}

fn on<F>(target: &web_sys::EventTarget, kind: &str, f: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// `#mobile-menu-button` toggles `#mobile-menu`; following a link inside
/// the menu closes it.
pub fn mobile_menu(document: &Document) -> Result<(), JsValue> {
    let (Some(button), Some(menu)) = (
        document.get_element_by_id("mobile-menu-button"),
        document.get_element_by_id("mobile-menu"),
    ) else {
        return Ok(());
    };

    let toggled = menu.clone();
    on(&button, "click", move |_| {
        let _ = toggled.class_list().toggle("hidden");
    })?;

    let closed = menu.clone();
    on(&menu, "click", move |e| {
        let is_link = e
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .is_some_and(|el| el.tag_name() == "A");
        if is_link {
            let _ = closed.class_list().add_1("hidden");
        }
    })
}

pub fn scroll_effects(window: &Window, document: &Document) -> Result<(), JsValue> {
    if let Some(header) = document.get_element_by_id("header") {
        let w = window.clone();
        on(window, "scroll", move |_| {
            let compact = nav::header_compact(w.scroll_y().unwrap_or(0.0));
            let list = header.class_list();
            let _ = list.toggle_with_force("py-2", compact);
            let _ = list.toggle_with_force("py-4", !compact);
        })?;
    }

    let sections: Vec<HtmlElement> = elements(document.query_selector_all("section")?)
        .filter_map(|el| el.dyn_into().ok())
        .collect();
    let links: Vec<HtmlAnchorElement> = elements(document.query_selector_all("header nav a")?)
        .filter_map(|el| el.dyn_into().ok())
        .collect();
    let mobile_links: Vec<Element> = elements(document.query_selector_all("#mobile-menu a")?).collect();

    let w = window.clone();
    on(window, "scroll", move |_| {
        let y = w.scroll_y().unwrap_or(0.0);
        let ids: Vec<(String, f64)> = sections.iter().map(|s| (s.id(), s.offset_top() as f64)).collect();
        let current = nav::active_hash(ids.iter().map(|(id, top)| (id.as_str(), *top)), y);

        for link in &links {
            let _ = link.class_list().toggle_with_force("active", link.hash() == current);
        }
        for link in &mobile_links {
            let list = link.class_list();
            let _ = list.toggle_with_force("bg-slate-700", list.contains("active"));
        }
    })
}

/// Sections marked `section-hidden` switch to `section-visible` once a
/// tenth of them is on screen.
pub fn fade_in(document: &Document) -> Result<(), JsValue> {
    let hidden: Vec<Element> = elements(document.query_selector_all(".section-hidden")?).collect();
    if hidden.is_empty() {
        return Ok(());
    }

    let callback = Closure::wrap(Box::new(|entries: js_sys::Array, _: IntersectionObserver| {
        for entry in entries.iter().filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok()) {
            if entry.is_intersecting() {
                let list = entry.target().class_list();
                let _ = list.add_1("section-visible");
                let _ = list.remove_1("section-hidden");
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(0.1));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();

    for el in &hidden {
        observer.observe(el);
    }
    Ok(())
}

fn open(modal: &Element) {
    let _ = modal.class_list().remove_1("hidden");
}

fn close(modal: &Element) {
    let _ = modal.class_list().add_1("hidden");
}

pub fn modals(document: &Document) -> Result<(), JsValue> {
    for trigger in elements(document.query_selector_all("[data-modal-target]")?) {
        let Some(id) = trigger.get_attribute("data-modal-target") else { continue };
        let Some(modal) = document.get_element_by_id(id.trim_start_matches('#')) else {
            log::warn!("modal trigger points at missing #{}", id);
            continue;
        };
        on(&trigger, "click", move |e| {
            e.prevent_default();
            open(&modal);
        })?;
    }

    for button in elements(document.query_selector_all("[data-modal-close]")?) {
        let target = button.clone();
        on(&button, "click", move |_| {
            if let Ok(Some(modal)) = target.closest(".modal") {
                close(&modal);
            }
        })?;
    }

    // clicks on the backdrop itself, not on the dialog inside it
    for modal in elements(document.query_selector_all(".modal")?) {
        let backdrop = modal.clone();
        on(&modal, "click", move |e| {
            let on_backdrop = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .is_some_and(|el| el == backdrop);
            if on_backdrop {
                close(&backdrop);
            }
        })?;
    }

    let doc = document.clone();
    on(document, "keydown", move |e| {
        let escape = e.dyn_ref::<KeyboardEvent>().is_some_and(|k| k.key() == "Escape");
        if !escape {
            return;
        }
        if let Ok(shown) = doc.query_selector_all(".modal:not(.hidden)") {
            elements(shown).for_each(|m| close(&m));
        }
    })
}

/// `[data-collapsible-toggle=id]` toggles `expanded` on `#id` and swaps
/// its own label.
pub fn collapsibles(document: &Document) -> Result<(), JsValue> {
    for toggle in elements(document.query_selector_all("[data-collapsible-toggle]")?) {
        let Some(id) = toggle.get_attribute("data-collapsible-toggle") else { continue };
        let Some(content) = document.get_element_by_id(id.trim_start_matches('#')) else {
            log::warn!("collapsible toggle points at missing #{}", id);
            continue;
        };
        let label = toggle.clone();
        on(&toggle, "click", move |_| {
            let expanded = content.class_list().toggle("expanded").unwrap_or(false);
            label.set_text_content(Some(if expanded { READ_LESS } else { READ_MORE }));
        })?;
    }
    Ok(())
}
