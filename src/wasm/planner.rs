use std::future::Future;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, Headers, HtmlButtonElement, HtmlTextAreaElement, Request, RequestInit,
    Response,
};

use crate::config::PlannerConfig;
use crate::error::{BackdropError, PlannerError};
use crate::planner::{AdventureResult, HttpReply, Planner, PlannerView, Transport};

/// `window.fetch` as a planner transport.
pub struct FetchTransport;

impl Transport for FetchTransport {
    fn post(&self, url: &str, body: String) -> impl Future<Output = Result<HttpReply, PlannerError>> {
        let url = url.to_string();
        async move {
            fetch_json(&url, &body)
                .await
                .map_err(|e| PlannerError::Transport(format!("{:?}", e)))
        }
    }
}

async fn fetch_json(url: &str, body: &str) -> Result<HttpReply, JsValue> {
    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(body));
    let request = Request::new_with_str_and_init(url, &init)?;

    let window = web_sys::window().ok_or("no window")?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request)).await?.dyn_into()?;
    let text = JsFuture::from(response.text()?).await?.as_string().unwrap_or_default();
    Ok(HttpReply { status: response.status(), body: text })
}

/// The planner panel as it exists in the page markup.
pub struct DomPlannerView {
    document: Document,
    submit: HtmlButtonElement,
    message: Element,
    result: Element,
    title: Element,
    description: Element,
    locations: Element,
    activities: Element,
}

fn by_id(document: &Document, id: &str) -> Result<Element, BackdropError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| BackdropError::MissingElement(format!("#{}", id)))
}

impl DomPlannerView {
    pub fn from_document(document: &Document) -> Result<Self, BackdropError> {
        Ok(Self {
            document: document.clone(),
            submit: by_id(document, "planner-submit")?
                .dyn_into()
                .map_err(|_| BackdropError::Dom("#planner-submit is not a button".into()))?,
            message: by_id(document, "planner-message")?,
            result: by_id(document, "planner-result")?,
            title: by_id(document, "planner-title")?,
            description: by_id(document, "planner-description")?,
            locations: by_id(document, "planner-locations")?,
            activities: by_id(document, "planner-activities")?,
        })
    }

    /// Replace the list's children with one `<li>` per item.
    fn fill(&self, list: &Element, items: &[String]) -> Result<(), JsValue> {
        list.set_inner_html("");
        for item in items {
            let li = self.document.create_element("li")?;
            li.set_text_content(Some(item));
            list.append_child(&li)?;
        }
        Ok(())
    }
}

impl PlannerView for DomPlannerView {
    fn set_busy(&self, busy: bool) {
        self.submit.set_disabled(busy);
    }

    fn show_message(&self, message: &str) {
        self.message.set_text_content(Some(message));
        let _ = self.message.class_list().remove_1("hidden");
        let _ = self.result.class_list().add_1("hidden");
    }

    fn show_result(&self, result: &AdventureResult) {
        self.title.set_text_content(Some(&result.title));
        self.description.set_text_content(Some(&result.description));
        if let Err(e) = self
            .fill(&self.locations, &result.locations)
            .and_then(|_| self.fill(&self.activities, &result.activities))
        {
            log::error!("could not render itinerary: {:?}", e);
        }
        let _ = self.message.class_list().add_1("hidden");
        let _ = self.result.class_list().remove_1("hidden");
    }
}

/// Hook the planner form. A form without a `data-endpoint` stays disabled.
pub fn install(document: &Document) -> Result<(), JsValue> {
    let Some(form) = document.get_element_by_id("planner-form") else {
        return Ok(());
    };
    let view = DomPlannerView::from_document(document)?;

    let Some(config) = PlannerConfig::from_attrs(form.get_attribute("data-endpoint")) else {
        log::warn!("planner form has no data-endpoint; leaving it disabled");
        view.set_busy(true);
        return Ok(());
    };

    let prompt: HtmlTextAreaElement = by_id(document, "planner-prompt")?
        .dyn_into()
        .map_err(|_| BackdropError::Dom("#planner-prompt is not a textarea".into()))?;

    let view = Rc::new(view);
    let planner = Rc::new(Planner::new(config, FetchTransport));

    let closure = Closure::wrap(Box::new(move |e: Event| {
        e.prevent_default();
        let raw = prompt.value();
        let (planner, view) = (planner.clone(), view.clone());
        spawn_local(async move {
            // outcome already reflected on the view and logged
            let _ = planner.submit(&raw, view.as_ref()).await;
        });
    }) as Box<dyn FnMut(Event)>);
    form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
    closure.forget();

    log::info!("planner ready");
    Ok(())
}
