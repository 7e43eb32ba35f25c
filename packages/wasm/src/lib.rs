use reformulator_compiler_html::{compile_str, CompileOptions};
use reformulator_evaluator::{evaluate, ScopeChain, Value};
use reformulator_parser::validate_expression;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Render a JSON template against optional JSON data. The re-hydration
/// script is appended when the page binds state.
#[wasm_bindgen(js_name = renderToString)]
pub fn render_to_string_js(template_json: &str, data_json: Option<String>) -> Result<String, JsValue> {
    render_to_string(template_json, data_json.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Resolve an expression and return the value as JSON (`null` for Empty)
#[wasm_bindgen(js_name = evaluateExpression)]
pub fn evaluate_expression_js(expression: &str, data_json: Option<String>) -> Result<String, JsValue> {
    evaluate_expression(expression, data_json.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Grammar error for an expression, if any
#[wasm_bindgen(js_name = validateExpression)]
pub fn validate_expression_js(expression: &str) -> Option<String> {
    validate_expression(expression).err().map(|e| e.to_string())
}

fn render_to_string(template_json: &str, data_json: Option<&str>) -> Result<String, String> {
    compile_str(template_json, data_json, &CompileOptions::default())
        .map_err(|e| format!("Render error: {}", e))
}

fn evaluate_expression(expression: &str, data_json: Option<&str>) -> Result<String, String> {
    let data = data_json
        .map(Value::from_json)
        .transpose()
        .map_err(|e| format!("Data error: {}", e))?
        .unwrap_or_default();

    let value = ScopeChain::new()
        .push(&data, |chain| evaluate(expression, chain))
        .map_err(|e| format!("Expression error: {}", e))?;

    serde_json::to_string(&value.normalized())
        .map_err(|e| format!("Serialization error: {}", e))
}
