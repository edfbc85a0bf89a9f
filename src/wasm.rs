use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use crate::ramp::{self, CapMaterials, ChainConfig, ConnectedRamps, RampParams, Triangle};

thread_local! {
    static PROGRESS_CALLBACK: RefCell<Option<js_sys::Function>> = const { RefCell::new(None) };
}

fn set_progress_callback(callback: Option<js_sys::Function>) {
    PROGRESS_CALLBACK.with(|cb| {
        *cb.borrow_mut() = callback;
    });
}

fn emit_progress(message: &str) {
    PROGRESS_CALLBACK.with(|cb| {
        if let Some(callback) = cb.borrow().as_ref() {
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(message));
        }
    });
}

fn fail(message: String) -> JsError {
    set_progress_callback(None);
    JsError::new(&message)
}

fn flatten<I: Iterator<Item = Triangle>>(triangles: I) -> js_sys::Float64Array {
    let coords: Vec<f64> = triangles
        .flat_map(|triangle| triangle.into_iter().flat_map(|p| [p.x, p.y, p.z]))
        .collect();
    js_sys::Float64Array::from(coords.as_slice())
}

#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Map text of a single ramp. `caps_json` optionally holds
/// `{"start": material, "end": material}`.
#[wasm_bindgen(js_name = generateVmf)]
pub fn generate_vmf(
    params_json: &str,
    caps_json: Option<String>,
    callback: Option<js_sys::Function>,
) -> Result<String, JsError> {
    set_progress_callback(callback);

    emit_progress("Reading parameters...");
    let params = RampParams::from_reader(params_json.as_bytes())
        .map_err(|e| fail(format!("Invalid ramp parameters: {e}")))?;
    let caps: Option<CapMaterials> = caps_json
        .map(|json| serde_json::from_str(&json))
        .transpose()
        .map_err(|e| fail(format!("Invalid cap materials: {e}")))?;

    emit_progress(&format!("Generating ramp {}...", params.name));
    let document = ramp::generate_vmf(&params, caps.as_ref());

    emit_progress(&format!("Writing {} solids...", document.solids().count()));
    let text = document.to_vmf_string();

    emit_progress("Generation complete");
    set_progress_callback(None);
    Ok(text)
}

/// Map text of a chain of ramps, `undefined` when the chain has no ramps
#[wasm_bindgen(js_name = generateConnectedVmf)]
pub fn generate_connected_vmf(
    chain_json: &str,
    callback: Option<js_sys::Function>,
) -> Result<Option<String>, JsError> {
    set_progress_callback(callback);

    emit_progress("Reading chain...");
    let config = ChainConfig::from_reader(chain_json.as_bytes())
        .map_err(|e| fail(format!("Invalid chain configuration: {e}")))?;

    emit_progress(&format!("Connecting {} ramps...", config.ramps.len()));
    let chain = ConnectedRamps::from_config(&config);

    emit_progress("Generating brushes...");
    let text = ramp::generate_connected_vmf(&chain).map(|document| document.to_vmf_string());

    emit_progress("Generation complete");
    set_progress_callback(None);
    Ok(text)
}

/// Preview triangles of a single ramp, 9 coordinates per triangle
#[wasm_bindgen]
pub fn visualization(params_json: &str) -> Result<js_sys::Float64Array, JsError> {
    let params = RampParams::from_reader(params_json.as_bytes())
        .map_err(|e| JsError::new(&format!("Invalid ramp parameters: {e}")))?;
    let geometry = ramp::generate_geometry(&params);
    Ok(flatten(ramp::triangles(&geometry)))
}

/// Preview triangles of a chain of ramps, 9 coordinates per triangle
#[wasm_bindgen(js_name = connectedVisualization)]
pub fn connected_visualization(chain_json: &str) -> Result<js_sys::Float64Array, JsError> {
    let config = ChainConfig::from_reader(chain_json.as_bytes())
        .map_err(|e| JsError::new(&format!("Invalid chain configuration: {e}")))?;
    let chain = ConnectedRamps::from_config(&config);
    Ok(flatten(chain.triangles()))
}
