use handlebars::Handlebars;
use thiserror::Error;

use crate::aggregate::DashboardSummary;

const DASHBOARD_TEMPLATE: &str = "\
Thyroid MWA Survey Dashboard
Total Responses: {{total_responses}}
MWA Aware: {{mwa_aware}}
Not Aware: {{not_aware}}
Awareness Rate: {{awareness_rate}}%
{{#each charts}}

{{title}}{{#if placeholder}} (sample data){{/if}}
{{#each slices}}
  {{label}}: {{percent}}% ({{count}})
{{/each}}
{{/each}}";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("dashboard template: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),
    #[error("dashboard render: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Plain-text rendering of the dashboard summary.
pub fn render_dashboard_text(summary: &DashboardSummary) -> Result<String, ReportError> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string("dashboard", DASHBOARD_TEMPLATE)
        .map_err(Box::new)?;
    Ok(registry.render("dashboard", summary)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Chart, ChartKind, Slice};

    #[test]
    fn renders_headline_and_slices() {
        let summary = DashboardSummary {
            total_responses: 2,
            mwa_aware: 1,
            not_aware: 1,
            awareness_rate: 50,
            charts: vec![Chart {
                id: "mwa_interest".into(),
                title: "Interest in Learning More About MWA".into(),
                kind: ChartKind::Pie,
                placeholder: true,
                slices: vec![Slice {
                    option: "yes".into(),
                    label: "Yes & more".into(),
                    count: 0,
                    percent: 53,
                    color: "#4160ec".into(),
                }],
            }],
        };
        let text = render_dashboard_text(&summary).expect("render");
        assert!(text.contains("Awareness Rate: 50%"));
        assert!(text.contains("Interest in Learning More About MWA (sample data)"));
        assert!(text.contains("  Yes & more: 53% (0)"));
    }
}
