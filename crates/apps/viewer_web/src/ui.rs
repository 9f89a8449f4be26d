use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Page-side collaborator passed to `set_ui_hooks`. Every method is
    /// optional in practice: a throwing or missing hook is logged and skipped.
    #[derive(Debug, Clone)]
    pub type UiHooks;

    #[wasm_bindgen(method, catch, js_name = initUI)]
    pub fn init_ui(this: &UiHooks) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = initControls)]
    pub fn init_controls(this: &UiHooks) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = renderUI)]
    pub fn render_ui(
        this: &UiHooks,
        view_proj: &js_sys::Float32Array,
        land_count: u32,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = resizeUI)]
    pub fn resize_ui(this: &UiHooks) -> Result<(), JsValue>;
}

pub fn log_hook_error(hook: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        web_sys::console::warn_1(&JsValue::from_str(&format!("{hook} failed: {err:?}")));
    }
}
