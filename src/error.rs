use thiserror::Error;

/// Failures while standing up the background scene or wiring the page.
#[derive(Error, Debug)]
pub enum BackdropError {
    /// The page offers no usable rendering context.
    #[error("capability missing: {0}")]
    Capability(String),

    /// An element the page is expected to provide is absent.
    #[error("missing element: {0}")]
    MissingElement(String),

    /// Shader compile / link or GPU resource allocation failed.
    #[error("gpu error: {0}")]
    Gpu(String),

    /// A layout override block could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// A browser API call threw.
    #[error("dom error: {0}")]
    Dom(String),
}

/// Failures of a single adventure-planner round trip.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The prompt was empty after trimming; no request is made.
    #[error("empty prompt")]
    EmptyPrompt,

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned status {0}")]
    Status(u16),

    /// The envelope or the embedded result did not match the expected shape.
    #[error("malformed reply: {0}")]
    Payload(String),
}

impl From<serde_json::Error> for PlannerError {
    fn from(e: serde_json::Error) -> Self {
        PlannerError::Payload(e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<BackdropError> for wasm_bindgen::JsValue {
    fn from(e: BackdropError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for BackdropError {
    fn from(v: wasm_bindgen::JsValue) -> Self {
        BackdropError::Dom(format!("{:?}", v))
    }
}
