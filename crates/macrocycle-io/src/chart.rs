//! Explicit chart descriptions and a stateless HTML renderer.
//!
//! A [`ChartSpec`] carries everything a figure needs; [`render_html`]
//! turns it into a self-contained page drawn by plotly.js. No state is
//! shared between charts.

use macrocycle_series::{PartialSeries, Year};
use serde_json::{Value, json};

/// plotly.js bundle loaded by every rendered page.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Which y axis a trace is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Left-hand axis.
    #[default]
    Primary,
    /// Right-hand axis overlaying the primary one.
    Secondary,
}

/// How a trace is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceStyle {
    /// Solid line.
    #[default]
    Line,
    /// Dashed line.
    Dashed,
    /// Unconnected markers.
    Markers,
    /// Line with the area down to zero filled.
    AreaToZero,
    /// Line with the area down to the previous trace filled (stacked area).
    AreaToPrevious,
}

/// One data series on a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    name: String,
    x: Vec<f64>,
    y: Vec<Option<f64>>,
    color: Option<String>,
    style: TraceStyle,
    axis: Axis,
}

impl Trace {
    /// Create a trace from paired points; `None` leaves a gap.
    pub fn new(name: impl Into<String>, x: Vec<f64>, y: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(x.len(), y.len());
        Self {
            name: name.into(),
            x,
            y,
            color: None,
            style: TraceStyle::default(),
            axis: Axis::default(),
        }
    }

    /// Create a trace with years on the x axis.
    pub fn from_series(name: impl Into<String>, series: &PartialSeries) -> Self {
        let x = series.years().iter().map(|&y| f64::from(y)).collect();
        Self::new(name, x, series.values().to_vec())
    }

    /// Set the line or marker colour (any CSS colour).
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the drawing style.
    #[must_use]
    pub fn with_style(mut self, style: TraceStyle) -> Self {
        self.style = style;
        self
    }

    /// Draw against the given y axis.
    #[must_use]
    pub fn on_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    fn to_plotly(&self) -> Value {
        let mut line = serde_json::Map::new();
        if let Some(c) = &self.color {
            line.insert("color".into(), json!(c));
        }
        if self.style == TraceStyle::Dashed {
            line.insert("dash".into(), json!("dash"));
        }
        let mode = if self.style == TraceStyle::Markers {
            "markers"
        } else {
            "lines"
        };
        let mut trace = json!({
            "type": "scatter",
            "name": self.name,
            "x": self.x,
            "y": self.y,
            "mode": mode,
        });
        if self.style == TraceStyle::Markers {
            trace["marker"] = Value::Object(line);
        } else {
            trace["line"] = Value::Object(line);
        }
        match self.style {
            TraceStyle::AreaToZero => trace["fill"] = json!("tozeroy"),
            TraceStyle::AreaToPrevious => trace["fill"] = json!("tonexty"),
            _ => {}
        }
        if self.axis == Axis::Secondary {
            trace["yaxis"] = json!("y2");
        }
        trace
    }
}

/// A labelled vertical line at a year, e.g. a crisis.
#[derive(Debug, Clone, PartialEq)]
pub struct EventMarker {
    /// Year of the event.
    pub year: Year,
    /// Label drawn next to the line.
    pub label: String,
    /// Line colour.
    pub color: String,
}

impl EventMarker {
    /// Create a grey marker.
    pub fn new(year: Year, label: impl Into<String>) -> Self {
        Self {
            year,
            label: label.into(),
            color: "grey".into(),
        }
    }

    /// Set the line colour.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// A shaded, labelled year range.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    /// First year.
    pub start: Year,
    /// Last year.
    pub end: Year,
    /// Label drawn inside the band.
    pub label: String,
    /// Fill colour.
    pub color: String,
}

/// An explicit, self-contained chart description.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSpec {
    title: String,
    x_label: String,
    y_label: String,
    y2_label: Option<String>,
    y_range: Option<(f64, f64)>,
    y2_range: Option<(f64, f64)>,
    traces: Vec<Trace>,
    markers: Vec<EventMarker>,
    bands: Vec<Band>,
    hlines: Vec<f64>,
    footnote: Option<String>,
}

impl ChartSpec {
    /// Start a chart with a title and axis labels.
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            ..Self::default()
        }
    }

    /// Add a trace.
    #[must_use]
    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    /// Fix the primary y axis range.
    #[must_use]
    pub fn with_y_range(mut self, lo: f64, hi: f64) -> Self {
        self.y_range = Some((lo, hi));
        self
    }

    /// Label the secondary y axis, optionally with a fixed range.
    #[must_use]
    pub fn with_secondary_axis(mut self, label: impl Into<String>, range: Option<(f64, f64)>) -> Self {
        self.y2_label = Some(label.into());
        self.y2_range = range;
        self
    }

    /// Add a vertical event marker.
    #[must_use]
    pub fn with_marker(mut self, marker: EventMarker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Add a shaded year band.
    #[must_use]
    pub fn with_band(mut self, band: Band) -> Self {
        self.bands.push(band);
        self
    }

    /// Add a horizontal reference line on the primary axis.
    #[must_use]
    pub fn with_hline(mut self, y: f64) -> Self {
        self.hlines.push(y);
        self
    }

    /// Add a note under the plot area, e.g. the data source.
    #[must_use]
    pub fn with_footnote(mut self, text: impl Into<String>) -> Self {
        self.footnote = Some(text.into());
        self
    }

    /// Return the chart title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Return the traces in drawing order.
    #[must_use]
    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    fn layout(&self) -> Value {
        let mut yaxis = json!({ "title": { "text": self.y_label } });
        if let Some((lo, hi)) = self.y_range {
            yaxis["range"] = json!([lo, hi]);
        }
        let mut layout = json!({
            "title": { "text": self.title },
            "xaxis": { "title": { "text": self.x_label } },
            "yaxis": yaxis,
            "hovermode": "x unified",
            "legend": { "x": 0.02, "y": 0.98 },
        });
        if let Some(label) = &self.y2_label {
            let mut y2 = json!({
                "title": { "text": label },
                "overlaying": "y",
                "side": "right",
            });
            if let Some((lo, hi)) = self.y2_range {
                y2["range"] = json!([lo, hi]);
            }
            layout["yaxis2"] = y2;
        }

        let mut shapes = Vec::new();
        let mut annotations = Vec::new();
        for m in &self.markers {
            shapes.push(json!({
                "type": "line", "xref": "x", "yref": "paper",
                "x0": m.year, "x1": m.year, "y0": 0, "y1": 1,
                "line": { "color": m.color, "dash": "dash", "width": 1 },
                "opacity": 0.6,
            }));
            annotations.push(json!({
                "x": m.year, "y": 1, "xref": "x", "yref": "paper",
                "text": m.label, "showarrow": false, "textangle": -90,
                "xanchor": "right", "yanchor": "top", "font": { "size": 10 },
            }));
        }
        for b in &self.bands {
            shapes.push(json!({
                "type": "rect", "xref": "x", "yref": "paper",
                "x0": b.start, "x1": b.end, "y0": 0, "y1": 1,
                "fillcolor": b.color, "opacity": 0.1, "line": { "width": 0 },
                "layer": "below",
            }));
            annotations.push(json!({
                "x": f64::from(b.start + b.end) / 2.0, "y": 0.1,
                "xref": "x", "yref": "paper", "text": b.label,
                "showarrow": false, "font": { "size": 12, "color": "red" },
            }));
        }
        for &y in &self.hlines {
            shapes.push(json!({
                "type": "line", "xref": "paper", "yref": "y",
                "x0": 0, "x1": 1, "y0": y, "y1": y,
                "line": { "color": "black", "dash": "dot", "width": 1 },
            }));
        }
        if let Some(note) = &self.footnote {
            annotations.push(json!({
                "x": 1, "y": -0.12, "xref": "paper", "yref": "paper",
                "text": note, "showarrow": false, "xanchor": "right",
            }));
        }
        layout["shapes"] = Value::Array(shapes);
        layout["annotations"] = Value::Array(annotations);
        layout
    }
}

/// Render a chart as a standalone HTML page.
///
/// Data and layout are embedded as JSON; undefined points become `null`
/// and show as gaps.
#[must_use]
pub fn render_html(spec: &ChartSpec) -> String {
    let data: Vec<Value> = spec.traces.iter().map(Trace::to_plotly).collect();
    let data = script_safe(&Value::Array(data));
    let layout = script_safe(&spec.layout());
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:90vh;"></div>
<script>
Plotly.newPlot("chart", {data}, {layout}, {{"responsive": true}});
</script>
</body>
</html>
"#,
        title = escape_html(&spec.title),
        cdn = PLOTLY_CDN,
    )
}

/// JSON that cannot close the surrounding `<script>` element.
fn script_safe(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
