use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::error::BackdropError;
use crate::label::LabelStyle;

/// Paint `text` onto an off-screen canvas ready for texture upload.
pub fn paint(document: &Document, text: &str, style: &LabelStyle) -> Result<HtmlCanvasElement, BackdropError> {
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| BackdropError::Dom("created element is not a canvas".into()))?;
    canvas.set_width(style.width);
    canvas.set_height(style.height);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| BackdropError::Capability("2d canvas not supported".into()))?
        .dyn_into()
        .map_err(|_| BackdropError::Capability("2d context has unexpected type".into()))?;

    ctx.set_fill_style_str(style.background);
    ctx.fill_rect(0.0, 0.0, style.width as f64, style.height as f64);

    let (x, y, w, h) = style.border_rect();
    ctx.set_stroke_style_str(&style.border.css());
    ctx.set_line_width(style.border_width);
    ctx.stroke_rect(x, y, w, h);

    let (cx, cy) = style.center();
    ctx.set_font(style.font);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_shadow_color(&style.glow.css());
    ctx.set_shadow_blur(style.glow_blur);
    ctx.set_fill_style_str(style.text);
    ctx.fill_text(text, cx, cy)?;

    Ok(canvas)
}
