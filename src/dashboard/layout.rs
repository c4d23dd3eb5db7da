//! Layout component tree
//!
//! Static description of a dashboard page. The tree is rendered to HTML
//! once per page load and is also served as JSON.

use serde::Serialize;

use super::callbacks::PropValue;
use crate::filters::DateRange;

/// Kind of value a control reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Range,
    Selection,
}

/// A node of the layout tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum Component {
    Div {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<String>,
        children: Vec<Component>,
    },
    Heading {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },
    /// Two-handle slider over indices `0..marks.len()`
    RangeSlider {
        id: String,
        marks: Vec<String>,
        value: DateRange,
    },
    Dropdown {
        id: String,
        options: Vec<String>,
        value: Vec<String>,
        multi: bool,
    },
    Graph {
        id: String,
    },
    Text {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },
    /// Hidden value passed between callbacks; never rendered
    Store {
        id: String,
    },
}

impl Component {
    pub fn div(children: Vec<Component>) -> Self {
        Component::Div {
            id: None,
            style: None,
            children,
        }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Component::Heading {
            text: text.into(),
            style: None,
        }
    }

    /// Slider over the given marks, full range selected
    pub fn range_slider(id: impl Into<String>, marks: Vec<String>) -> Self {
        let value = DateRange::full(marks.len());
        Component::RangeSlider {
            id: id.into(),
            marks,
            value,
        }
    }

    /// Multi-select dropdown
    pub fn dropdown(id: impl Into<String>, options: Vec<String>, value: Vec<String>) -> Self {
        Component::Dropdown {
            id: id.into(),
            options,
            value,
            multi: true,
        }
    }

    pub fn graph(id: impl Into<String>) -> Self {
        Component::Graph { id: id.into() }
    }

    pub fn text(id: impl Into<String>) -> Self {
        Component::Text {
            id: id.into(),
            style: None,
        }
    }

    pub fn store(id: impl Into<String>) -> Self {
        Component::Store { id: id.into() }
    }

    /// Builder method: set inline CSS (ignored by components without style)
    pub fn style(mut self, css: impl Into<String>) -> Self {
        match &mut self {
            Component::Div { style, .. }
            | Component::Heading { style, .. }
            | Component::Text { style, .. } => *style = Some(css.into()),
            _ => {}
        }
        self
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Component::Div { id, .. } => id.as_deref(),
            Component::Heading { .. } => None,
            Component::RangeSlider { id, .. }
            | Component::Dropdown { id, .. }
            | Component::Graph { id }
            | Component::Text { id, .. }
            | Component::Store { id } => Some(id.as_str()),
        }
    }

    /// This node and all its descendants, depth first
    pub fn descendants(&self) -> Vec<&Component> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Component>) {
        out.push(self);
        if let Component::Div { children, .. } = self {
            for child in children {
                child.collect(out);
            }
        }
    }

    /// Find a component by id
    pub fn find(&self, id: &str) -> Option<&Component> {
        self.descendants().into_iter().find(|c| c.id() == Some(id))
    }

    /// Value kind reported by a control; `None` for display components
    pub fn control_kind(&self) -> Option<ControlKind> {
        match self {
            Component::RangeSlider { .. } => Some(ControlKind::Range),
            Component::Dropdown { .. } => Some(ControlKind::Selection),
            _ => None,
        }
    }

    /// Whether a callback may write this component
    pub fn accepts_output(&self) -> bool {
        matches!(
            self,
            Component::Graph { .. } | Component::Text { .. } | Component::Store { .. }
        )
    }

    /// Value a control starts with
    pub fn initial_value(&self) -> Option<PropValue> {
        match self {
            Component::RangeSlider { value, .. } => Some(PropValue::Range(*value)),
            Component::Dropdown { value, .. } => Some(PropValue::Selection(value.clone())),
            _ => None,
        }
    }

    /// Render this subtree as HTML
    pub fn render_html(&self, out: &mut String) {
        match self {
            Component::Div {
                id,
                style,
                children,
            } => {
                out.push_str("<div");
                push_attr(out, "id", id.as_deref());
                push_attr(out, "style", style.as_deref());
                out.push('>');
                for child in children {
                    child.render_html(out);
                }
                out.push_str("</div>");
            }
            Component::Heading { text, style } => {
                out.push_str("<h1");
                push_attr(out, "style", style.as_deref());
                out.push('>');
                out.push_str(&escape(text));
                out.push_str("</h1>");
            }
            Component::RangeSlider { id, marks, value } => {
                let max = marks.len().saturating_sub(1);
                let value = value.clamped(marks.len());
                let marks_json = serde_json::to_string(marks).unwrap_or_else(|_| "[]".to_string());

                out.push_str("<div class=\"range-slider\" data-control=\"range\"");
                push_attr(out, "id", Some(id.as_str()));
                push_attr(out, "data-marks", Some(marks_json.as_str()));
                out.push('>');
                for (class, position) in [("range-start", value.start), ("range-end", value.end)] {
                    out.push_str(&format!(
                        "<input type=\"range\" class=\"{}\" min=\"0\" max=\"{}\" \
                         step=\"1\" value=\"{}\">",
                        class, max, position
                    ));
                }
                let label = match (marks.get(value.start), marks.get(value.end)) {
                    (Some(start), Some(end)) => format!("{} to {}", start, end),
                    _ => String::new(),
                };
                out.push_str("<output class=\"range-label\">");
                out.push_str(&escape(&label));
                out.push_str("</output></div>");
            }
            Component::Dropdown {
                id,
                options,
                value,
                multi,
            } => {
                out.push_str("<select data-control=\"selection\"");
                push_attr(out, "id", Some(id.as_str()));
                if *multi {
                    out.push_str(" multiple");
                }
                out.push('>');
                for option in options {
                    out.push_str("<option");
                    push_attr(out, "value", Some(option.as_str()));
                    if value.contains(option) {
                        out.push_str(" selected");
                    }
                    out.push('>');
                    out.push_str(&escape(option));
                    out.push_str("</option>");
                }
                out.push_str("</select>");
            }
            Component::Graph { id } => {
                out.push_str("<div class=\"graph\"");
                push_attr(out, "id", Some(id.as_str()));
                out.push_str("></div>");
            }
            Component::Text { id, style } => {
                out.push_str("<div");
                push_attr(out, "id", Some(id.as_str()));
                push_attr(out, "style", style.as_deref());
                out.push_str("></div>");
            }
            Component::Store { .. } => {}
        }
    }
}

fn push_attr(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
    }
}

/// Escape text for HTML content and attribute values
pub fn escape(text: &str) -> String {
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
