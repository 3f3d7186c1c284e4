use crate::{ChartSpec, VizResult};
use ridership_core::LoadFailure;
use ridership_series::{DashboardData, View};
use std::fmt::Write as _;

/// Escape HTML special characters to prevent XSS.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render the dashboard page for one load outcome.
///
/// A successful load shows a tab for each of `views`, in the order given,
/// with one chart card each. A failed load suppresses every view and shows a
/// single alert instead.
///
/// # Errors
///
/// Returns error if a chart specification cannot be serialized.
pub fn render_dashboard(
    title: &str,
    views: &[View],
    outcome: &Result<DashboardData, LoadFailure>,
) -> VizResult<String> {
    let title = escape_html(title);
    let body = match outcome {
        Ok(data) => render_views(data, views)?,
        Err(failure) => format!(
            "    <div class=\"alert\" role=\"alert\">{}</div>\n",
            escape_html(&failure.to_string())
        ),
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
        body {{ font-family: sans-serif; margin: 2rem; }}
        .tabs button {{ padding: 0.5rem 1rem; border: 0; cursor: pointer; }}
        .tabs button.active {{ background: #e2e8f0; }}
        .panel {{ display: none; }}
        .panel.active {{ display: block; }}
        .card {{ border: 1px solid #e2e8f0; border-radius: 8px; padding: 1rem; }}
        .alert {{ border: 1px solid #dc2626; color: #991b1b; padding: 1rem; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
{body}</body>
</html>"#
    ))
}

fn render_views(data: &DashboardData, views: &[View]) -> VizResult<String> {
    let mut html = String::from("    <div class=\"tabs\">\n");
    for (i, view) in views.iter().enumerate() {
        let active = if i == 0 { " class=\"active\"" } else { "" };
        let _ = writeln!(
            html,
            "        <button{active} data-tab=\"{}\">{}</button>",
            view.output_name(),
            escape_html(view.label())
        );
    }
    html.push_str("    </div>\n");

    let mut specs = Vec::with_capacity(views.len());
    for (i, view) in views.iter().enumerate() {
        let active = if i == 0 { " active" } else { "" };
        let name = view.output_name();
        let _ = writeln!(
            html,
            "    <section class=\"panel{active}\" id=\"panel-{name}\">\n        \
             <div class=\"card\">\n            <h2>{}</h2>\n            \
             <canvas id=\"chart-{name}\"></canvas>\n        </div>\n    </section>",
            escape_html(view.title())
        );
        let spec = ChartSpec::from_view(*view, data.records(*view)).to_json()?;
        specs.push(format!("\"{name}\":{spec}"));
    }

    // Prevent script tag breakout
    let json = format!("{{{}}}", specs.join(",")).replace("</", "<\\/");

    let _ = write!(
        html,
        r#"    <script>
        const specs = {json};
        const format = (v) => v == null ? '' : Number(v).toLocaleString();
        for (const [name, spec] of Object.entries(specs)) {{
            const ctx = document.getElementById('chart-' + name).getContext('2d');
            new Chart(ctx, {{
                type: spec.chart_type,
                data: {{
                    labels: spec.data.labels,
                    datasets: spec.data.datasets.map((d) => ({{
                        label: d.label,
                        data: d.data,
                        backgroundColor: d.background_color,
                        borderColor: d.border_color,
                    }})),
                }},
                options: {{
                    responsive: true,
                    plugins: {{
                        legend: {{ display: spec.options.show_legend }},
                        tooltip: {{ callbacks: {{ label: (c) => c.dataset.label + ': ' + format(c.raw) }} }},
                    }},
                    scales: {{ y: {{ ticks: {{ callback: format }} }} }},
                }},
            }});
        }}
        document.querySelectorAll('.tabs button').forEach((button) => {{
            button.addEventListener('click', () => {{
                document.querySelectorAll('.tabs button').forEach((b) => b.classList.remove('active'));
                document.querySelectorAll('.panel').forEach((p) => p.classList.remove('active'));
                button.classList.add('active');
                document.getElementById('panel-' + button.dataset.tab).classList.add('active');
            }});
        }});
    </script>
"#
    );

    Ok(html)
}
