// =============================================================================
// Presentation Adapter
// =============================================================================
//
// Builds renderer-neutral chart specifications and page views.  The browser
// page turns `ChartSpec`s into figures; nothing here draws.

pub mod builders;
pub mod chart;
pub mod views;

pub use chart::{Axis, ChartSpec, Trace};
pub use views::{AnalysisView, ComparisonView};
