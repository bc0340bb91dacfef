use std::fmt::Write as _;

use crate::config::{
  CalendarConfig,
  MarkerStyle
};
use crate::gantt::{
  GanttLayout,
  MarkerKind
};

const FONT_FAMILY: &str =
  "Inter, Segoe UI, sans-serif";
const LANE_STRIPE: [&str; 2] =
  ["#ffffff", "#f6f7f9"];

pub fn escape_xml(text: &str) -> String {
  let mut out =
    String::with_capacity(text.len());
  for ch in text.chars() {
    match ch {
      | '&' => out.push_str("&amp;"),
      | '<' => out.push_str("&lt;"),
      | '>' => out.push_str("&gt;"),
      | '"' => out.push_str("&quot;"),
      | '\'' => out.push_str("&apos;"),
      | other => out.push(other)
    }
  }
  out
}

pub fn marker_style<'a>(
  config: &'a CalendarConfig,
  kind: MarkerKind
) -> &'a MarkerStyle {
  match kind {
    | MarkerKind::Month => {
      &config.markers.month
    }
    | MarkerKind::FiscalYear => {
      &config.markers.fiscal_year
    }
    | MarkerKind::CalendarYear => {
      &config.markers.calendar_year
    }
    | MarkerKind::AseanYear => {
      &config.markers.asean_year
    }
  }
}

fn stroke_attrs(
  style: &MarkerStyle
) -> String {
  let mut attrs = format!(
    r#"stroke="{}" stroke-width="{}" stroke-opacity="{}""#,
    escape_xml(&style.color),
    style.width,
    style.opacity
  );
  if let Some(dash) = &style.dash {
    let _ = write!(
      attrs,
      r#" stroke-dasharray="{}""#,
      escape_xml(dash)
    );
  }
  attrs
}

/// Vertical offset of a marker label so
/// labels sharing a date do not collide.
pub fn label_row(kind: MarkerKind) -> f64 {
  match kind {
    | MarkerKind::Month => 34.0,
    | MarkerKind::FiscalYear => 22.0,
    | MarkerKind::CalendarYear => 11.0,
    | MarkerKind::AseanYear => 22.0
  }
}

/// Standalone SVG document for a laid
/// out chart.
#[tracing::instrument(skip_all)]
pub fn render_svg(
  layout: &GanttLayout,
  config: &CalendarConfig
) -> String {
  let total_width =
    layout.label_width + layout.width;
  let total_height =
    layout.header_height + layout.height;
  let body_top = layout.header_height;
  let mut svg = String::new();

  let _ = writeln!(
    svg,
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT_FAMILY}" font-size="11">"#,
    w = total_width,
    h = total_height
  );
  let _ = writeln!(
    svg,
    r##"  <rect width="100%" height="100%" fill="#ffffff"/>"##
  );

  for (idx, band) in
    layout.lanes.iter().enumerate()
  {
    let y = body_top + band.y;
    let _ = writeln!(
      svg,
      r#"  <rect class="lane-band" x="0" y="{y}" width="{total_width}" height="{}" fill="{}"/>"#,
      band.height,
      LANE_STRIPE[idx % 2]
    );
    let _ = writeln!(
      svg,
      r#"  <text class="lane-label" x="8" y="{}" font-weight="600">{}</text>"#,
      y + band.height / 2.0 + 4.0,
      escape_xml(&band.label)
    );
  }

  let _ = writeln!(
    svg,
    r#"  <g class="timeline" transform="translate({},0)">"#,
    layout.label_width
  );

  for band in &layout.lanes {
    for school in &band.school_bands {
      let title = school
        .description
        .as_deref()
        .unwrap_or("School in session");
      let _ = writeln!(
        svg,
        r#"    <rect class="school-year" x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="{}" pointer-events="none"><title>{}</title></rect>"#,
        school.x,
        body_top + band.y,
        school.width,
        band.height,
        escape_xml(&config.school_year.fill),
        config.school_year.opacity,
        escape_xml(title)
      );
    }
  }

  for marker in &layout.markers {
    let style =
      marker_style(config, marker.kind);
    let _ = writeln!(
      svg,
      r#"    <line class="{}" x1="{x}" y1="{}" x2="{x}" y2="{total_height}" {}/>"#,
      marker.kind.as_class(),
      if marker.kind == MarkerKind::Month
      {
        body_top
      } else {
        0.0
      },
      stroke_attrs(style),
      x = marker.x
    );
    let _ = writeln!(
      svg,
      r#"    <text class="{}-label" x="{}" y="{}" fill="{}">{}</text>"#,
      marker.kind.as_class(),
      marker.x + 3.0,
      label_row(marker.kind),
      escape_xml(&style.color),
      escape_xml(&marker.label)
    );
  }

  for bar in &layout.bars {
    let y = body_top + bar.y;
    let opacity = if bar.estimated {
      0.55
    } else {
      1.0
    };
    let _ = write!(
      svg,
      r#"    <g class="event-bar" data-event-id="{}"><rect x="{}" y="{y}" width="{}" height="{}" rx="3" fill="{}" fill-opacity="{opacity}""#,
      escape_xml(&bar.event_id),
      bar.x,
      bar.width,
      bar.height,
      escape_xml(&bar.color)
    );
    if bar.urgent {
      let _ = write!(
        svg,
        r##" stroke="#e81123" stroke-width="2""##
      );
    } else if bar.estimated {
      let _ = write!(
        svg,
        r#" stroke="{}" stroke-dasharray="3 2""#,
        escape_xml(&bar.color)
      );
    }
    let _ = writeln!(
      svg,
      r#"><title>{}</title></rect></g>"#,
      escape_xml(&bar.tooltip)
    );
  }

  if let Some(x) = layout.reference_x {
    let style = &config.markers.reference;
    let _ = writeln!(
      svg,
      r#"    <line class="marker-reference" x1="{x}" y1="0" x2="{x}" y2="{total_height}" {}/>"#,
      stroke_attrs(style)
    );
    let label = style
      .label
      .as_deref()
      .unwrap_or("Today");
    let _ = writeln!(
      svg,
      r#"    <text class="marker-reference-label" x="{}" y="{}" fill="{}">{} {}</text>"#,
      x + 3.0,
      body_top - 2.0,
      escape_xml(&style.color),
      escape_xml(label),
      layout.reference_date.format("%d %b")
    );
  }

  svg.push_str("  </g>\n");
  svg.push_str("</svg>\n");
  svg
}
