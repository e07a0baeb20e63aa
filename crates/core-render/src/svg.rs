use core_diagram::{EndClass, Line, NodeStyle, Render};
use core_geom::Vec2;

/// Minimal XML element: a tag, attributes, and either children or text
/// content. Serialized depth-first, attributes in insertion order.
#[derive(Debug, Clone)]
pub struct SvgElement {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<SvgElement>,
    pub text: Option<String>,
}

impl SvgElement {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((key, value.into()));
        self
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    fn write_xml(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (k, v) in &self.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&escape_attr(v));
            out.push('"');
        }
        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape_text(text));
        }
        for child in &self.children {
            child.write_xml(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Builds an SVG document as an in-memory element tree, one `<path>`/`<rect>`/
/// `<text>` per diagram primitive. Coordinates are in abstract length units;
/// the caller scales them to pixels via the `viewBox`.
#[derive(Debug, Default)]
pub struct SvgRender {
    children: Vec<SvgElement>,
}

impl SvgRender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_document(self, width: i64, height: i64) -> SvgElement {
        let mut root = SvgElement::new("svg")
            .attr("xmlns", "http://www.w3.org/2000/svg")
            .attr("viewBox", format!("0 0 {} {}", width, height));
        root.children = self.children;
        root
    }
}

impl Render for SvgRender {
    type Line<'a> = SvgLine<'a>;

    fn line(&mut self, from: Vec2) -> SvgLine<'_> {
        SvgLine {
            render: self,
            start: from,
            pos: from,
            commands: String::new(),
        }
    }

    fn node(
        &mut self,
        pos: Vec2,
        width: i64,
        text: &str,
        style: NodeStyle,
        href: Option<&str>,
        title: Option<&str>,
    ) {
        let class = match style {
            NodeStyle::Terminal => "terminal",
            NodeStyle::NonTerminal => "non-terminal",
            NodeStyle::Comment => "comment",
        };
        let mut rect = SvgElement::new("rect")
            .attr("x", pos.x.to_string())
            .attr("y", (pos.y - 1).to_string())
            .attr("width", width.to_string())
            .attr("height", "2")
            .attr("class", class);
        let mut label = SvgElement::new("text")
            .attr("x", (pos.x + width / 2).to_string())
            .attr("y", pos.y.to_string());
        label.text = Some(text.to_string());

        if let Some(title) = title {
            let mut title_el = SvgElement::new("title");
            title_el.text = Some(title.to_string());
            rect.children.push(title_el);
        }

        if let Some(href) = href {
            let mut link = SvgElement::new("a").attr("href", href.to_string());
            link.children.push(rect);
            link.children.push(label);
            self.children.push(link);
        } else {
            self.children.push(rect);
            self.children.push(label);
        }
    }

    fn group_box(&mut self, pos: Vec2, width: i64, height: i64) {
        let rect = SvgElement::new("rect")
            .attr("x", pos.x.to_string())
            .attr("y", pos.y.to_string())
            .attr("width", width.to_string())
            .attr("height", height.to_string())
            .attr("class", "group-box")
            .attr("fill", "none");
        self.children.push(rect);
    }

    fn end(&mut self, pos: Vec2, class: EndClass, is_start: bool) {
        let marker_class = match (class, is_start) {
            (EndClass::Simple, _) => "end-simple",
            (EndClass::Complex, true) => "end-complex-start",
            (EndClass::Complex, false) => "end-complex-end",
        };
        let circle = SvgElement::new("circle")
            .attr("cx", pos.x.to_string())
            .attr("cy", pos.y.to_string())
            .attr("r", "1")
            .attr("class", marker_class);
        self.children.push(circle);
    }
}

pub struct SvgLine<'a> {
    render: &'a mut SvgRender,
    start: Vec2,
    pos: Vec2,
    commands: String,
}

impl Line for SvgLine<'_> {
    fn horizontal(&mut self, to_x: i64) {
        self.commands.push_str(&format!("L{} {} ", to_x, self.pos.y));
        self.pos.x = to_x;
    }

    fn vertical(&mut self, to_y: i64) {
        self.commands.push_str(&format!("L{} {} ", self.pos.x, to_y));
        self.pos.y = to_y;
    }

    fn arc(&mut self, dx: i64, dy: i64) {
        let to = Vec2::new(self.pos.x + dx, self.pos.y + dy);
        let sweep = if dx.signum() == dy.signum() { 1 } else { 0 };
        let radius = dx.abs().max(dy.abs());
        self.commands
            .push_str(&format!("A{r} {r} 0 0 {s} {x} {y} ", r = radius, s = sweep, x = to.x, y = to.y));
        self.pos = to;
    }

    fn finish(self) {
        if self.commands.is_empty() {
            return;
        }
        let d = format!("M{} {} {}", self.start.x, self.start.y, self.commands.trim_end());
        let path = SvgElement::new("path")
            .attr("d", d)
            .attr("class", "line")
            .attr("fill", "none");
        self.render.children.push(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_line_emits_path() {
        let mut render = SvgRender::new();
        {
            let mut line = render.line(Vec2::new(0, 0));
            line.horizontal(5);
            line.finish();
        }
        let doc = render.into_document(10, 2);
        let xml = doc.to_xml();
        assert!(xml.contains("<path"));
        assert!(xml.contains("M0 0 L5 0"));
    }

    #[test]
    fn node_emits_rect_and_text() {
        let mut render = SvgRender::new();
        render.node(Vec2::new(0, 0), 6, "id", NodeStyle::NonTerminal, None, None);
        let xml = render.into_document(10, 2).to_xml();
        assert!(xml.contains("non-terminal"));
        assert!(xml.contains(">id<"));
    }

    #[test]
    fn node_with_href_wraps_in_anchor() {
        let mut render = SvgRender::new();
        render.node(
            Vec2::new(0, 0),
            6,
            "id",
            NodeStyle::NonTerminal,
            Some("#rule-id"),
            Some("jump to id"),
        );
        let xml = render.into_document(10, 2).to_xml();
        assert!(xml.contains("<a href=\"#rule-id\">"));
        assert!(xml.contains("<title>jump to id</title>"));
    }
}
