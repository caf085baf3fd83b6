use std::rc::Rc;

use js_sys::{Object, Reflect};
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

use crate::analytics::{category_total, monthly_series, share_percent, MonthPoint};
use crate::format::{format_currency, format_currency_whole, format_month_label};
use crate::model::{AnalyticsSnapshot, CategoryTotal};

const CATEGORY_COLORS: [&str; 6] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40",
];

#[wasm_bindgen]
extern "C" {
    /// Chart.js, loaded globally by the host page.
    type Chart;

    #[wasm_bindgen(constructor, catch)]
    fn new(canvas: &HtmlCanvasElement, config: &JsValue) -> Result<Chart, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &Chart);
}

type Formatter = Closure<dyn Fn(JsValue) -> JsValue>;

/// A live Chart.js instance plus the Rust callbacks its options point at.
/// Dropping the handle destroys the chart before the callbacks go away.
pub struct ChartHandle {
    chart: Chart,
    _formatters: Vec<Formatter>,
}

impl Drop for ChartHandle {
    fn drop(&mut self) {
        self.chart.destroy();
    }
}

pub fn category_tooltip(label: &str, value: f64, total: f64, symbol: &str) -> String {
    format!(
        "{}: {} ({:.1}%)",
        label,
        format_currency(value, symbol),
        share_percent(value, total)
    )
}

pub fn monthly_tooltip(value: f64, symbol: &str) -> String {
    format!("Total: {}", format_currency(value, symbol))
}

fn category_config(rows: &[CategoryTotal]) -> serde_json::Value {
    let labels: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    let data: Vec<f64> = rows.iter().map(|r| r.total_amount).collect();
    json!({
        "type": "doughnut",
        "data": {
            "labels": labels,
            "datasets": [{
                "data": data,
                "backgroundColor": CATEGORY_COLORS,
                "borderWidth": 2,
                "borderColor": "#fff"
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": {
                    "position": "bottom",
                    "labels": {"padding": 20, "usePointStyle": true}
                }
            }
        }
    })
}

fn monthly_config(points: &[MonthPoint]) -> serde_json::Value {
    let labels: Vec<String> = points.iter().map(|p| format_month_label(&p.month)).collect();
    let data: Vec<f64> = points.iter().map(|p| p.total).collect();
    json!({
        "type": "line",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": "Monthly Spending",
                "data": data,
                "backgroundColor": "rgba(102, 126, 234, 0.1)",
                "borderColor": "#667eea",
                "borderWidth": 3,
                "fill": true,
                "tension": 0.4,
                "pointBackgroundColor": "#667eea",
                "pointBorderColor": "#fff",
                "pointBorderWidth": 2,
                "pointRadius": 6
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {"legend": {"display": false}},
            "scales": {"y": {"beginAtZero": true}}
        }
    })
}

fn to_js(config: &serde_json::Value) -> Result<JsValue, JsValue> {
    Ok(config.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

/// Sets `root.a.b...last = value`, creating missing intermediate objects.
fn set_path(root: &JsValue, path: &[&str], value: &JsValue) -> Result<(), JsValue> {
    let (last, parents) = path
        .split_last()
        .ok_or_else(|| JsValue::from_str("empty option path"))?;
    let mut target = root.clone();
    for key in parents {
        let key = JsValue::from_str(key);
        let mut next = Reflect::get(&target, &key)?;
        if next.is_undefined() {
            next = Object::new().into();
            Reflect::set(&target, &key, &next)?;
        }
        target = next;
    }
    Reflect::set(&target, &JsValue::from_str(last), value)?;
    Ok(())
}

fn read_f64(value: &JsValue, key: &str) -> f64 {
    Reflect::get(value, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

fn clear_canvas(canvas: &HtmlCanvasElement) {
    let context = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
    if let Some(context) = context {
        context.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    }
}

/// Doughnut of spending per category. Empty input clears the canvas.
pub fn draw_category_chart(
    canvas: &HtmlCanvasElement,
    rows: &[CategoryTotal],
    symbol: &str,
) -> Result<Option<ChartHandle>, JsValue> {
    if rows.is_empty() {
        clear_canvas(canvas);
        return Ok(None);
    }

    let config = to_js(&category_config(rows))?;
    let total = category_total(rows);
    let symbol = symbol.to_string();
    let label = Formatter::new(move |ctx: JsValue| {
        let name = Reflect::get(&ctx, &JsValue::from_str("label"))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        let value = read_f64(&ctx, "parsed");
        JsValue::from_str(&category_tooltip(&name, value, total, &symbol))
    });
    set_path(
        &config,
        &["options", "plugins", "tooltip", "callbacks", "label"],
        label.as_ref(),
    )?;

    let chart = Chart::new(canvas, &config)?;
    Ok(Some(ChartHandle {
        chart,
        _formatters: vec![label],
    }))
}

/// Line chart of the most recent `window` months. Empty input clears the
/// canvas.
pub fn draw_monthly_chart(
    canvas: &HtmlCanvasElement,
    points: &[MonthPoint],
    symbol: &str,
) -> Result<Option<ChartHandle>, JsValue> {
    if points.is_empty() {
        clear_canvas(canvas);
        return Ok(None);
    }

    let config = to_js(&monthly_config(points))?;

    let tooltip_symbol = symbol.to_string();
    let tooltip = Formatter::new(move |ctx: JsValue| {
        let parsed = Reflect::get(&ctx, &JsValue::from_str("parsed")).unwrap_or(JsValue::UNDEFINED);
        JsValue::from_str(&monthly_tooltip(read_f64(&parsed, "y"), &tooltip_symbol))
    });
    set_path(
        &config,
        &["options", "plugins", "tooltip", "callbacks", "label"],
        tooltip.as_ref(),
    )?;

    let tick_symbol = symbol.to_string();
    let tick = Formatter::new(move |value: JsValue| {
        JsValue::from_str(&format_currency_whole(
            value.as_f64().unwrap_or(0.0),
            &tick_symbol,
        ))
    });
    set_path(
        &config,
        &["options", "scales", "y", "ticks", "callback"],
        tick.as_ref(),
    )?;

    let chart = Chart::new(canvas, &config)?;
    Ok(Some(ChartHandle {
        chart,
        _formatters: vec![tooltip, tick],
    }))
}

#[derive(Properties, PartialEq)]
pub struct ChartProps {
    pub snapshot: Rc<AnalyticsSnapshot>,
    pub currency_symbol: AttrValue,
    #[prop_or(6)]
    pub monthly_window: usize,
}

#[function_component(CategoryChart)]
pub fn category_chart(props: &ChartProps) -> Html {
    let canvas_ref = use_node_ref();
    let handle = use_mut_ref(|| None::<ChartHandle>);

    {
        let canvas_ref = canvas_ref.clone();
        let symbol = props.currency_symbol.clone();
        use_effect_with_deps(
            move |snapshot: &Rc<AnalyticsSnapshot>| {
                handle.borrow_mut().take();
                if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                    match draw_category_chart(&canvas, &snapshot.categories, &symbol) {
                        Ok(chart) => *handle.borrow_mut() = chart,
                        Err(err) => log::error!("Failed to draw category chart: {:?}", err),
                    }
                }
                move || {
                    handle.borrow_mut().take();
                }
            },
            props.snapshot.clone(),
        );
    }

    html! {
        <div class="chart-container">
            <canvas id="categoryChart" ref={canvas_ref}></canvas>
        </div>
    }
}

#[function_component(MonthlyChart)]
pub fn monthly_chart(props: &ChartProps) -> Html {
    let canvas_ref = use_node_ref();
    let handle = use_mut_ref(|| None::<ChartHandle>);

    {
        let canvas_ref = canvas_ref.clone();
        let symbol = props.currency_symbol.clone();
        let window = props.monthly_window;
        use_effect_with_deps(
            move |snapshot: &Rc<AnalyticsSnapshot>| {
                handle.borrow_mut().take();
                if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                    let points = monthly_series(&snapshot.monthly, window);
                    match draw_monthly_chart(&canvas, &points, &symbol) {
                        Ok(chart) => *handle.borrow_mut() = chart,
                        Err(err) => log::error!("Failed to draw monthly chart: {:?}", err),
                    }
                }
                move || {
                    handle.borrow_mut().take();
                }
            },
            props.snapshot.clone(),
        );
    }

    html! {
        <div class="chart-container">
            <canvas id="monthlyChart" ref={canvas_ref}></canvas>
        </div>
    }
}
