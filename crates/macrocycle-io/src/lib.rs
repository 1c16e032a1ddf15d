//! Panel loading, table export and chart rendering for the macrocycle pipeline.

mod chart;
mod domain;
mod error;
mod reader;
mod table;
mod writer;

pub use chart::{Axis, Band, ChartSpec, EventMarker, PLOTLY_CDN, Trace, TraceStyle, render_html};
pub use domain::{NamedSeries, Panel, ReportName, Selection};
pub use error::IoError;
pub use reader::{PanelReader, YEAR_COLUMN, load};
pub use table::{Cell, MISSING, Table};
pub use writer::ReportWriter;
