//! 精密化プロット
//!
//! 図定義はバックエンドが返したものをほぼそのまま Plotly に渡す。
//! 描画は `/js/plot-bridge.js` 経由。

use leptos::html::Div;
use leptos::prelude::*;
use serde_json::{json, Map, Value};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/plot-bridge.js")]
extern "C" {
    /// Plotly.newPlot を呼ぶ。Plotly未読込なら false
    #[wasm_bindgen(js_name = "renderPlot")]
    fn render_plot_js(element_id: &str, spec_json: &str) -> bool;

    #[wasm_bindgen(js_name = "purgePlot")]
    fn purge_plot_js(element_id: &str);
}

const PLOT_HEIGHT: u32 = 320;

/// Plotly.newPlot に渡す `{data, layout, frames, config}` を作る
///
/// - `data` が配列でなければ空配列
/// - `layout` は既定の高さ・余白に図側の指定を上書きする
pub fn plot_spec(figure: &Value) -> Value {
    let data = figure
        .get("data")
        .filter(|d| d.is_array())
        .cloned()
        .unwrap_or_else(|| json!([]));

    let mut layout = Map::new();
    layout.insert("height".into(), json!(PLOT_HEIGHT));
    layout.insert("margin".into(), json!({ "t": 32, "r": 12, "b": 60, "l": 48 }));
    if let Some(custom) = figure.get("layout").and_then(Value::as_object) {
        for (key, value) in custom {
            layout.insert(key.clone(), value.clone());
        }
    }

    let mut spec = json!({
        "data": data,
        "layout": Value::Object(layout),
        "config": { "displaylogo": false, "responsive": true },
    });
    if let Some(frames) = figure.get("frames").filter(|f| f.is_array()) {
        spec["frames"] = frames.clone();
    }
    spec
}

#[component]
pub fn RefinementPlot(element_id: String, figure: Value) -> impl IntoView {
    let node_ref = NodeRef::<Div>::new();
    let spec = plot_spec(&figure).to_string();

    let id = element_id.clone();
    Effect::new(move |_| {
        if node_ref.get().is_some() && !render_plot_js(&id, &spec) {
            gloo::console::warn!("Plotly is not loaded; skipping plot");
        }
    });

    let id = element_id.clone();
    on_cleanup(move || purge_plot_js(&id));

    view! { <div class="plot-wrapper" id=element_id node_ref=node_ref /> }
}
