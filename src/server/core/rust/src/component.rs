/* src/server/core/rust/src/component.rs */

use std::fmt;

use crate::bundle::Bundle;
use crate::errors::{Error, Result};
use crate::mount::{container_id, escape_attr, mount_script, script_tags};
use crate::props::Props;

/// Result of a render call. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedComponent {
  markup: String,
  props: Props,
  serialized_props: String,
  bundle: Option<Bundle>,
  container_id: Option<String>,
}

impl RenderedComponent {
  pub fn new(
    markup: String,
    props: Props,
    serialized_props: String,
    bundle: Option<Bundle>,
    container_id: Option<String>,
  ) -> Self {
    Self { markup, props, serialized_props, bundle, container_id }
  }

  /// Markup exactly as the renderer produced it.
  pub fn markup(&self) -> &str {
    &self.markup
  }

  pub fn props(&self) -> &Props {
    &self.props
  }

  pub fn serialized_props(&self) -> &str {
    &self.serialized_props
  }

  /// Serialized props, ready to be inlined into a page.
  pub fn render_props(&self) -> &str {
    &self.serialized_props
  }

  pub fn is_bundled(&self) -> bool {
    self.bundle.is_some()
  }

  pub fn bundle(&self) -> Result<&Bundle> {
    self.bundle.as_ref().ok_or(Error::ComponentWasNotBundled)
  }

  /// Global variable of the bundled component.
  pub fn var(&self) -> Result<&str> {
    self.bundle().map(Bundle::var)
  }

  /// Caller-supplied id if any, else `reactComponent-<var>`.
  pub fn container_id(&self) -> Result<String> {
    match &self.container_id {
      Some(id) => Ok(id.clone()),
      None => self.var().map(container_id),
    }
  }

  pub fn render_mount_js(&self) -> Result<String> {
    let var = self.var()?;
    let props = (!self.props.is_empty()).then_some(self.serialized_props.as_str());
    Ok(mount_script(var, &self.container_id()?, props))
  }

  /// Asset script tags plus the mount script.
  pub fn render_js(&self) -> Result<String> {
    let bundle = self.bundle()?;
    let mount = self.render_mount_js()?;
    Ok(script_tags(bundle.urls(), &mount))
  }
}

impl fmt::Display for RenderedComponent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.container_id() {
      Ok(id) if self.bundle.is_some() => {
        write!(f, "<span id=\"{}\">{}</span>", escape_attr(&id), self.markup)
      }
      _ => f.write_str(&self.markup),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bundle::Asset;

  fn bundle() -> Bundle {
    Bundle::new(
      "components__HelloWorld",
      vec![Asset {
        path: "/s/react-components/components__HelloWorld-abc.js".into(),
        url: "/static/react-components/components__HelloWorld-abc.js".into(),
      }],
    )
  }

  fn rendered(props: Props, bundle: Option<Bundle>) -> RenderedComponent {
    let serialized = crate::props::serialize_props(&props).unwrap();
    RenderedComponent::new("<span>Hello </span>".into(), props, serialized, bundle, None)
  }

  #[test]
  fn unbundled_displays_bare_markup() {
    let c = rendered(Props::new(), None);
    assert_eq!(c.to_string(), "<span>Hello </span>");
    assert_eq!(c.to_string(), c.markup());
  }

  #[test]
  fn unbundled_has_no_bundle() {
    let c = rendered(Props::new(), None);
    assert!(matches!(c.bundle(), Err(Error::ComponentWasNotBundled)));
    assert!(matches!(c.var(), Err(Error::ComponentWasNotBundled)));
    assert!(matches!(c.render_mount_js(), Err(Error::ComponentWasNotBundled)));
    assert!(matches!(c.render_js(), Err(Error::ComponentWasNotBundled)));
  }

  #[test]
  fn bundled_wraps_markup_in_container() {
    let c = rendered(Props::new(), Some(bundle()));
    assert_eq!(c.var().unwrap(), "components__HelloWorld");
    assert_eq!(
      c.to_string(),
      format!("<span id=\"reactComponent-components__HelloWorld\">{}</span>", c.markup())
    );
  }

  #[test]
  fn caller_supplied_container_id() {
    let props = Props::new();
    let c = RenderedComponent::new(
      "<i/>".into(),
      props,
      "{}".into(),
      Some(bundle()),
      Some("sidebar-1".into()),
    );
    assert_eq!(c.to_string(), "<span id=\"sidebar-1\"><i/></span>");
    assert!(c.render_mount_js().unwrap().ends_with("})(React, components__HelloWorld, 'sidebar-1');\n"));
  }

  #[test]
  fn caller_supplied_container_id_is_escaped() {
    let id = r#"x"><img src=y onerror='alert(1)'>"#;
    let c = RenderedComponent::new("<i/>".into(), Props::new(), "{}".into(), Some(bundle()), Some(id.into()));
    assert_eq!(
      c.to_string(),
      "<span id=\"x&quot;&gt;&lt;img src=y onerror='alert(1)'&gt;\"><i/></span>"
    );
    let js = c.render_mount_js().unwrap();
    assert!(js.contains(r#"'x\"\u003e\u003cimg src=y onerror=\'alert(1)\'\u003e'"#));
  }

  #[test]
  fn mount_js_uses_null_without_props() {
    let c = rendered(Props::new(), Some(bundle()));
    assert!(c.render_mount_js().unwrap().contains("\n  var props = null;\n"));
  }

  #[test]
  fn mount_js_inlines_serialized_props() {
    let c = rendered(Props::new().with("name", "world!"), Some(bundle()));
    assert_eq!(c.render_props(), r#"{"name": "world!"}"#);
    assert!(c.render_mount_js().unwrap().contains("\n  var props = {\"name\": \"world!\"};\n"));
  }

  #[test]
  fn render_js_combines_assets_and_mount() {
    let c = rendered(Props::new(), Some(bundle()));
    let expected = format!(
      "\n<script src=\"{}\"></script>\n<script>\n{}\n</script>\n",
      c.bundle().unwrap().urls()[0],
      c.render_mount_js().unwrap()
    );
    assert_eq!(c.render_js().unwrap(), expected);
  }
}
