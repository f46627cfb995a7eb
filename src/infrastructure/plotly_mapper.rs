// Mapper to convert chart specifications to Plotly figure JSON
use crate::domain::chart::{ChartKind, ChartSpec, Layout, Trace};
use serde_json::{json, Value};

pub fn figure(spec: &ChartSpec) -> Value {
    json!({
        "data": spec.traces.iter().map(trace_to_plotly).collect::<Vec<_>>(),
        "layout": layout_to_plotly(&spec.layout),
    })
}

fn trace_to_plotly(trace: &Trace) -> Value {
    let mut value = json!({
        "x": trace.categories,
        "y": trace.values,
        "name": trace.label,
    });

    let (kind, mode) = match trace.kind {
        ChartKind::Bar => ("bar", None),
        ChartKind::Line => ("scatter", Some("lines+markers")),
        ChartKind::Scatter => ("scatter", Some("markers")),
    };
    value["type"] = json!(kind);
    if let Some(mode) = mode {
        value["mode"] = json!(mode);
    }

    value
}

fn layout_to_plotly(layout: &Layout) -> Value {
    json!({
        "title": { "text": layout.title },
        "xaxis": { "title": { "text": layout.x_axis_label } },
        "yaxis": { "title": { "text": layout.y_axis_label } },
    })
}
