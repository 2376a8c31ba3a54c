use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;

fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}

/// `{ code, message }` error object thrown to JS.
pub fn err(code: &'static str, message: impl Into<String>) -> JsValue {
    let e = Object::new();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    e.into()
}

pub fn invalid_json(what: &str, e: impl std::fmt::Display) -> JsValue {
    err("invalid_json", format!("{what}: {e}"))
}

pub fn already_configured() -> JsValue {
    err("already_configured", "configure() may only be called once")
}

pub fn serialize(e: serde_wasm_bindgen::Error) -> JsValue {
    err("serialize", e.to_string())
}
