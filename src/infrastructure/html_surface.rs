// HTML render surface - Plotly panels in a single scrollable column
use crate::application::dashboard_renderer::DashboardSurface;
use crate::domain::chart::ChartSpec;
use crate::infrastructure::plotly_mapper;
use serde_json::Value;

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const EVENTS_PATH: &str = "/api/dashboard/events";

#[derive(Debug, Clone)]
pub struct HtmlSurface {
    title: String,
    figures: Vec<Value>,
    error: Option<String>,
}

impl HtmlSurface {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            figures: Vec::new(),
            error: None,
        }
    }

    /// Plotly figures in display order
    pub fn figures(&self) -> &[Value] {
        &self.figures
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Full dashboard page for `revision`. Reloads itself as soon as the
    /// session reports any other revision.
    pub fn page(&self, revision: u64) -> String {
        let mut panels = String::new();
        let mut scripts = String::new();

        for (position, figure) in self.figures.iter().enumerate() {
            panels.push_str(&format!(
                "    <section class=\"panel\"><div id=\"panel-{}\" class=\"plot\"></div></section>\n",
                position
            ));
            scripts.push_str(&format!(
                "  draw(\"panel-{}\", {});\n",
                position,
                script_safe(&figure.to_string())
            ));
        }

        if self.figures.is_empty() {
            panels.push_str("    <p class=\"empty\">No charts to display.</p>\n");
        }

        let banner = match &self.error {
            Some(message) => format!(
                "    <div class=\"error\" role=\"alert\">{}</div>\n",
                escape_html(message)
            ),
            None => String::new(),
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <script src="{plotly}"></script>
  <style>
    body {{ margin: 0; font-family: sans-serif; }}
    header {{ padding: 12px 24px; background: #282c34; color: #fff; }}
    .dashboard-content {{ height: calc(100vh - 80px); overflow-y: auto; padding: 16px 24px; }}
    .panel {{ margin-bottom: 24px; }}
    .error {{ margin-bottom: 16px; padding: 12px; background: #fde2e1; color: #a40e26; border-radius: 4px; }}
  </style>
</head>
<body>
  <header><h1>{title}</h1></header>
  <main class="dashboard-content">
{banner}{panels}  </main>
<script>
  function draw(id, figure) {{
    Plotly.newPlot(id, figure.data, figure.layout, {{ responsive: true }});
  }}
{scripts}  const revision = "{revision}";
  const events = new EventSource("{events}");
  events.addEventListener("revision", (event) => {{
    if (event.data !== revision) {{
      events.close();
      window.location.reload();
    }}
  }});
</script>
</body>
</html>
"#,
            title = escape_html(&self.title),
            plotly = PLOTLY_SRC,
            banner = banner,
            panels = panels,
            scripts = scripts,
            revision = revision,
            events = EVENTS_PATH,
        )
    }
}

impl DashboardSurface for HtmlSurface {
    fn clear(&mut self) {
        self.figures.clear();
        self.error = None;
    }

    fn draw_panel(&mut self, position: usize, spec: &ChartSpec) {
        debug_assert_eq!(position, self.figures.len());
        self.figures.push(plotly_mapper::figure(spec));
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// JSON embedded in a <script> block must not close it early
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
