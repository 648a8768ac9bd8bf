/* src/server/core/rust/src/mount.rs */

// Client-side mount code for bundled components.

/// DOM id of the element a bundled component is mounted into.
pub fn container_id(var: &str) -> String {
  format!("reactComponent-{var}")
}

/// Script that mounts `var` into `#container_id` with `props_json` (`None` renders `null`).
pub fn mount_script(var: &str, container_id: &str, props_json: Option<&str>) -> String {
  let props = props_json.unwrap_or("null");
  let container_id = escape_js(container_id);
  format!(
    "
if (typeof React === 'undefined') throw new Error('Cannot find `React` global variable. Have you added a script element to this page which points to React?');
if (typeof {var} === 'undefined') throw new Error('Cannot find component variable `{var}`');
(function(React, component, containerId) {{
  var props = {props};
  var element = React.createElement(component, props);
  var container = document.getElementById(containerId);
  if (!container) throw new Error('Cannot find the container element `#{container_id}` for component `{var}`');
  React.render(element, container);
}})(React, {var}, '{container_id}');
"
  )
}

/// `<script src>` tags for every asset followed by the inline mount script.
pub fn script_tags<'a>(urls: impl IntoIterator<Item = &'a str>, mount_script: &str) -> String {
  let mut out = String::from("\n");
  for url in urls {
    out.push_str(&format!("<script src=\"{}\"></script>\n", escape_attr(url)));
  }
  out.push_str("<script>\n");
  out.push_str(mount_script);
  out.push_str("\n</script>\n");
  out
}

/// Minimal escaping for double-quoted HTML attribute values.
pub(crate) fn escape_attr(value: &str) -> String {
  value.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape text for a single-quoted JS string inside a `<script>` element.
fn escape_js(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for c in value.chars() {
    match c {
      '\\' => out.push_str("\\\\"),
      '\'' => out.push_str("\\'"),
      '"' => out.push_str("\\\""),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '<' | '>' | '&' | '\u{2028}' | '\u{2029}' => out.push_str(&format!("\\u{:04x}", u32::from(c))),
      c => out.push(c),
    }
  }
  out
}
