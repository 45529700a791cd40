use crate::domain::model::{OutputFormat, PlotPoint, ScatterPlot};

pub const CONTAINER_CLASS: &str = "js-d3";
const AXIS_COLOR: &str = "#333";
const LEGEND_SWATCH: f64 = 18.0;
const LEGEND_SPACING: f64 = 22.0;

pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// 屬性值內的換行要保留成字元參照
fn escape_attr(input: &str) -> String {
    escape_xml(input).replace('\n', "&#10;")
}

pub fn render(plot: &ScatterPlot, format: OutputFormat) -> String {
    match format {
        OutputFormat::Svg => render_svg(plot),
        OutputFormat::Html => render_html(plot),
    }
}

pub fn render_svg(plot: &ScatterPlot) -> String {
    let options = &plot.options;
    let (width, height) = (options.width, options.height);
    let (inner_width, inner_height) = (options.inner_width(), options.inner_height());
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"scatter-plot\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" font-family=\"sans-serif\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"{width}\" height=\"{height}\" fill=\"#fff\"/>"
    ));
    svg.push_str(&format!(
        "<text id=\"title\" x=\"{:.1}\" y=\"40\" text-anchor=\"middle\" font-size=\"26\">{}</text>",
        width as f64 / 2.0,
        escape_xml(&options.title)
    ));
    svg.push_str(&format!(
        "<text id=\"subtitle\" x=\"{:.1}\" y=\"68\" text-anchor=\"middle\" font-size=\"18\">{}</text>",
        width as f64 / 2.0,
        escape_xml(&options.subtitle)
    ));

    svg.push_str(&format!(
        "<g transform=\"translate({:.1},{:.1})\">",
        options.margins.left, options.margins.top
    ));
    svg.push_str(&x_axis_svg(plot, inner_width, inner_height));
    svg.push_str(&y_axis_svg(plot, inner_height));

    svg.push_str("<g class=\"dots\">");
    for point in &plot.points {
        svg.push_str(&point_svg(point));
    }
    svg.push_str("</g>");

    svg.push_str(&legend_svg(plot, inner_width, inner_height));
    svg.push_str("</g>");
    svg.push_str("</svg>");
    svg
}

fn x_axis_svg(plot: &ScatterPlot, inner_width: f64, inner_height: f64) -> String {
    let mut axis = format!(
        "<g id=\"x-axis\" class=\"x-axis\" transform=\"translate(0,{inner_height:.2})\">\
<line x1=\"0\" x2=\"{inner_width:.2}\" stroke=\"{AXIS_COLOR}\"/>"
    );
    for tick in &plot.x_ticks {
        axis.push_str(&format!(
            "<g class=\"tick\" transform=\"translate({:.2},0)\"><line y2=\"6\" stroke=\"{AXIS_COLOR}\"/>\
<text y=\"20\" text-anchor=\"middle\" font-size=\"12\">{}</text></g>",
            tick.position,
            escape_xml(&tick.label)
        ));
    }
    axis.push_str("</g>");
    axis
}

fn y_axis_svg(plot: &ScatterPlot, inner_height: f64) -> String {
    let mut axis = format!(
        "<g id=\"y-axis\" class=\"y-axis\"><line y1=\"0\" y2=\"{inner_height:.2}\" stroke=\"{AXIS_COLOR}\"/>"
    );
    for tick in &plot.y_ticks {
        axis.push_str(&format!(
            "<g class=\"tick\" transform=\"translate(0,{:.2})\"><line x2=\"-6\" stroke=\"{AXIS_COLOR}\"/>\
<text x=\"-9\" dy=\"0.32em\" text-anchor=\"end\" font-size=\"12\">{}</text></g>",
            tick.position,
            escape_xml(&tick.label)
        ));
    }
    axis.push_str(&format!(
        "<text class=\"axis-label\" transform=\"rotate(-90)\" x=\"{:.2}\" y=\"-52\" text-anchor=\"middle\" font-size=\"16\">Time in Minutes</text>",
        -inner_height / 2.0
    ));
    axis.push_str("</g>");
    axis
}

fn point_svg(point: &PlotPoint) -> String {
    format!(
        "<circle class=\"dot\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.1}\" fill=\"{}\" stroke=\"#000\" fill-opacity=\"0.8\" \
data-xvalue=\"{}\" data-yvalue=\"{}\" data-doping=\"{}\" data-tooltip=\"{}\"><title>{}</title></circle>",
        point.cx,
        point.cy,
        point.radius,
        escape_attr(&point.fill),
        point.year,
        escape_attr(&point.time_value),
        point.doping,
        escape_attr(&point.tooltip),
        escape_xml(&point.tooltip)
    )
}

fn legend_svg(plot: &ScatterPlot, inner_width: f64, inner_height: f64) -> String {
    let mut legend = format!(
        "<g id=\"legend\" class=\"legend\" transform=\"translate({inner_width:.2},{:.2})\">",
        inner_height / 2.0
    );
    for (i, entry) in plot.legend.iter().enumerate() {
        legend.push_str(&format!(
            "<g class=\"legend-item\" transform=\"translate(0,{:.1})\">\
<rect x=\"{:.1}\" width=\"{LEGEND_SWATCH}\" height=\"{LEGEND_SWATCH}\" fill=\"{}\"/>\
<text x=\"{:.1}\" y=\"{:.1}\" dy=\"0.35em\" text-anchor=\"end\" font-size=\"13\">{}</text></g>",
            i as f64 * LEGEND_SPACING,
            -LEGEND_SWATCH,
            escape_attr(&entry.color),
            -LEGEND_SWATCH - 6.0,
            LEGEND_SWATCH / 2.0,
            escape_xml(&entry.label)
        ));
    }
    legend.push_str("</g>");
    legend
}

const PAGE_STYLE: &str = r#"body { margin: 0; background: #f2f2f2; font-family: sans-serif; }
.js-d3 { display: flex; justify-content: center; padding: 24px; }
.dot:hover { stroke-width: 2; }
#tooltip { position: absolute; pointer-events: none; padding: 8px 10px; border-radius: 4px;
  background: rgba(30, 60, 110, 0.85); color: #fff; font-size: 12px; white-space: pre-line;
  opacity: 0; transition: opacity 0.1s; }"#;

const HOVER_SCRIPT: &str = r#"(function () {
  var tooltip = document.getElementById("tooltip");
  document.querySelectorAll(".js-d3 .dot").forEach(function (dot) {
    dot.addEventListener("mouseover", function (event) {
      tooltip.textContent = dot.getAttribute("data-tooltip");
      tooltip.setAttribute("data-year", dot.getAttribute("data-xvalue"));
      tooltip.style.left = event.pageX + 12 + "px";
      tooltip.style.top = event.pageY - 28 + "px";
      tooltip.style.opacity = 0.9;
    });
    dot.addEventListener("mouseout", function () {
      tooltip.style.opacity = 0;
    });
  });
})();"#;

pub fn render_html(plot: &ScatterPlot) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
{style}
</style>
</head>
<body>
<main class="{container}" data-origin="{origin}">
{svg}
</main>
<div id="tooltip" class="tooltip"></div>
<script>
{script}
</script>
</body>
</html>
"#,
        title = escape_xml(&plot.options.title),
        style = PAGE_STYLE,
        container = CONTAINER_CLASS,
        origin = escape_attr(&plot.origin.to_string()),
        svg = render_svg(plot),
        script = HOVER_SCRIPT,
    )
}
