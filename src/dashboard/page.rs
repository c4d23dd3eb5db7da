//! Page shell
//!
//! The rendered layout is dropped into a static HTML document carrying the
//! browser side of the update loop: read control values, post them to
//! `/api/v1/update`, draw the returned figures with Plotly.

use super::layout::{escape, Component};

/// Plotly.js bundle loaded by every page
pub const PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>@@TITLE@@</title>
<script src="@@PLOTLY@@"></script>
<style>
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;margin:16px;color:#222}
.range-slider{display:grid;grid-template-columns:1fr 1fr;gap:4px 12px;margin:12px 0}
.range-slider input{width:100%}
.range-label{grid-column:1 / span 2;text-align:center;font-size:13px;color:#555}
select[multiple]{width:100%;min-height:120px}
.graph{min-height:300px}
</style>
</head>
<body>
@@BODY@@
<script>
(function () {
  function controlValues() {
    var inputs = {};
    document.querySelectorAll('[data-control="range"]').forEach(function (el) {
      var a = +el.querySelector('.range-start').value;
      var b = +el.querySelector('.range-end').value;
      inputs[el.id] = [Math.min(a, b), Math.max(a, b)];
    });
    document.querySelectorAll('[data-control="selection"]').forEach(function (el) {
      inputs[el.id] = Array.from(el.selectedOptions).map(function (o) { return o.value; });
    });
    return inputs;
  }

  function refreshLabel(el) {
    var marks = JSON.parse(el.dataset.marks || '[]');
    var v = controlValues()[el.id];
    el.querySelector('.range-label').textContent =
      marks.length ? marks[v[0]] + ' to ' + marks[v[1]] : '';
  }

  function update(changed) {
    return fetch('api/v1/update', {
      method: 'POST',
      headers: {'Content-Type': 'application/json'},
      body: JSON.stringify({inputs: controlValues(), changed: changed})
    }).then(function (res) {
      if (!res.ok) {
        return res.text().then(function (t) { console.error('update failed', t); });
      }
      return res.json().then(function (body) {
        body.outputs.forEach(function (out) {
          var el = document.getElementById(out.id);
          if (!el) { return; }
          if (out.value.kind === 'figure') {
            Plotly.react(el, out.value.value.data, out.value.value.layout);
          } else if (out.value.kind === 'text') {
            el.textContent = out.value.value;
          }
        });
      });
    });
  }

  document.querySelectorAll('[data-control="range"]').forEach(function (el) {
    el.querySelectorAll('input').forEach(function (input) {
      input.addEventListener('input', function () { refreshLabel(el); });
      input.addEventListener('change', function () { update([el.id]); });
    });
  });
  document.querySelectorAll('[data-control="selection"]').forEach(function (el) {
    el.addEventListener('change', function () { update([el.id]); });
  });

  update([]);
})();
</script>
</body>
</html>
"##;

/// Render a complete page around a layout
pub fn render_page(title: &str, layout: &Component) -> String {
    let mut body = String::new();
    layout.render_html(&mut body);

    PAGE_TEMPLATE
        .replace("@@TITLE@@", &escape(title))
        .replace("@@PLOTLY@@", PLOTLY_JS_URL)
        .replace("@@BODY@@", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_page() {
        let layout = Component::div(vec![Component::graph("hospital-admissions-graph")]);
        let html = render_page("Weekly <Hospital> Admissions", &layout);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Weekly &lt;Hospital&gt; Admissions</title>"));
        assert!(html.contains(PLOTLY_JS_URL));
        assert!(html.contains("id=\"hospital-admissions-graph\""));
        assert!(!html.contains("@@"));
    }
}
