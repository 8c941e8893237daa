//! Stroke sinks: where fitted segments finally get drawn.

use std::fmt::Write as _;

use crate::geom::{Segment, Vec2};

/// Something that can stroke a line. Implemented by drawing back ends.
pub trait Stroke {
    fn stroke(&mut self, from: Vec2, to: Vec2, width: f64, color: &str);
}

/// Stroke every visible segment; zero-width segments are skipped.
pub fn draw_segments<S: Stroke + ?Sized>(sink: &mut S, segments: &[Segment]) -> usize {
    let mut drawn = 0;
    for segment in segments.iter().filter(|s| s.is_visible()) {
        sink.stroke(segment.from, segment.to, segment.width, &segment.color);
        drawn += 1;
    }
    drawn
}

/// An SVG document built line by line.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: f64,
    height: f64,
    background: Option<String>,
    body: String,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: None,
            body: String::new(),
        }
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn finish(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );
        if let Some(bg) = &self.background {
            let _ = writeln!(
                out,
                r#"  <rect width="100%" height="100%" fill="{}"/>"#,
                escape_attr(bg)
            );
        }
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

impl Stroke for SvgDocument {
    fn stroke(&mut self, from: Vec2, to: Vec2, width: f64, color: &str) {
        let _ = writeln!(
            self.body,
            r#"  <line x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}" stroke="{}" stroke-width="{}" stroke-linecap="round"/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            escape_attr(color),
            width,
        );
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<(Vec2, Vec2, f64, String)>,
    }

    impl Stroke for Recorder {
        fn stroke(&mut self, from: Vec2, to: Vec2, width: f64, color: &str) {
            self.lines.push((from, to, width, color.to_string()));
        }
    }

    fn seg(width: f64, color: &str) -> Segment {
        Segment {
            from: Vec2::new(0.0, 0.0),
            to: Vec2::new(1.0, 2.0),
            width,
            color: Arc::from(color),
        }
    }

    #[test]
    fn zero_width_segments_are_not_stroked() {
        let mut rec = Recorder::default();
        let drawn = draw_segments(&mut rec, &[seg(1.0, "red"), seg(0.0, "blue"), seg(2.5, "green")]);
        assert_eq!(drawn, 2);
        assert_eq!(rec.lines[0].3, "red");
        assert_eq!(rec.lines[1].2, 2.5);
    }

    #[test]
    fn svg_contains_one_line_per_stroke() {
        let mut doc = SvgDocument::new(100.0, 50.0).with_background("#fff");
        draw_segments(&mut doc, &[seg(1.0, "#942192"), seg(1.0, "#FF40FF")]);
        let svg = doc.finish();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 100 50""#));
        assert!(svg.contains(r##"fill="#fff""##));
        assert_eq!(svg.matches("<line ").count(), 2);
        assert!(svg.contains(r#"x2="1.000" y2="2.000""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut doc = SvgDocument::new(10.0, 10.0);
        doc.stroke(Vec2::ZERO, Vec2::ZERO, 1.0, r#"a"b<c>&"#);
        assert!(doc.finish().contains("a&quot;b&lt;c&gt;&amp;"));
    }
}
