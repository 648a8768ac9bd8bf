/* src/server/core/rust/src/props.rs */

// Component props and their JSON serialization.

use std::io;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::errors::{Error, Result};

/// A single prop value as handed over by the host application.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
  Null,
  Bool(bool),
  Number(Number),
  Float(f64),
  String(String),
  Array(Vec<PropValue>),
  Object(Props),
  DateTime(DateTime<Utc>),
  Date(NaiveDate),
  Time(NaiveTime),
  /// A host value with no JSON form (a callback, a handle, ...).
  Opaque { type_name: String, repr: String },
}

impl PropValue {
  /// Wrap a value that cannot cross into JS; serializing it fails.
  pub fn opaque<T: ?Sized>(repr: impl Into<String>) -> Self {
    Self::Opaque { type_name: std::any::type_name::<T>().to_string(), repr: repr.into() }
  }

  fn to_json(&self) -> Result<Value> {
    Ok(match self {
      Self::Null => Value::Null,
      Self::Bool(b) => Value::Bool(*b),
      Self::Number(n) => Value::Number(n.clone()),
      Self::Float(f) => match Number::from_f64(*f) {
        Some(n) => Value::Number(n),
        None => {
          return Err(Error::PropSerialization {
            type_name: "f64".to_string(),
            args: vec![format!("Out of range float values are not JSON compliant: {f}")],
          });
        }
      },
      Self::String(s) => Value::String(s.clone()),
      Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect::<Result<_>>()?),
      Self::Object(props) => props.to_json()?,
      Self::DateTime(dt) => Value::String(format_datetime(dt)),
      Self::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
      Self::Time(t) => Value::String(format_time(t)),
      Self::Opaque { type_name, repr } => {
        return Err(Error::PropSerialization {
          type_name: type_name.clone(),
          args: vec![format!("{repr} is not JSON serializable")],
        });
      }
    })
  }
}

/// ISO-8601 with a `Z` suffix; sub-second part truncated to milliseconds.
fn format_datetime(dt: &DateTime<Utc>) -> String {
  if dt.timestamp_subsec_micros() == 0 {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
  } else {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
  }
}

fn format_time(t: &NaiveTime) -> String {
  if t.nanosecond() / 1_000 == 0 {
    t.format("%H:%M:%S").to_string()
  } else {
    t.format("%H:%M:%S%.3f").to_string()
  }
}

impl From<Value> for PropValue {
  fn from(value: Value) -> Self {
    match value {
      Value::Null => Self::Null,
      Value::Bool(b) => Self::Bool(b),
      Value::Number(n) => Self::Number(n),
      Value::String(s) => Self::String(s),
      Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
      Value::Object(map) => Self::Object(Props::from(map)),
    }
  }
}

macro_rules! impl_from_integer {
  ($($ty:ty),*) => {
    $(impl From<$ty> for PropValue {
      fn from(v: $ty) -> Self {
        Self::Number(Number::from(v))
      }
    })*
  };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl From<f64> for PropValue {
  fn from(v: f64) -> Self {
    Self::Float(v)
  }
}

impl From<bool> for PropValue {
  fn from(v: bool) -> Self {
    Self::Bool(v)
  }
}

impl From<&str> for PropValue {
  fn from(v: &str) -> Self {
    Self::String(v.to_string())
  }
}

impl From<String> for PropValue {
  fn from(v: String) -> Self {
    Self::String(v)
  }
}

impl From<DateTime<Utc>> for PropValue {
  fn from(v: DateTime<Utc>) -> Self {
    Self::DateTime(v)
  }
}

impl From<NaiveDate> for PropValue {
  fn from(v: NaiveDate) -> Self {
    Self::Date(v)
  }
}

impl From<NaiveTime> for PropValue {
  fn from(v: NaiveTime) -> Self {
    Self::Time(v)
  }
}

impl From<Props> for PropValue {
  fn from(v: Props) -> Self {
    Self::Object(v)
  }
}

impl<T: Into<PropValue>> From<Vec<T>> for PropValue {
  fn from(v: Vec<T>) -> Self {
    Self::Array(v.into_iter().map(Into::into).collect())
  }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
  fn from(v: Option<T>) -> Self {
    v.map_or(Self::Null, Into::into)
  }
}

/// Insertion-ordered prop map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(IndexMap<String, PropValue>);

impl Props {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style insert.
  pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
    self.insert(key, value);
    self
  }

  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
    self.0.insert(key.into(), value.into());
  }

  pub fn get(&self, key: &str) -> Option<&PropValue> {
    self.0.get(key)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v))
  }

  /// Build props from a JSON object.
  pub fn from_json(value: Value) -> Result<Self> {
    match value {
      Value::Object(map) => Ok(Self::from(map)),
      other => Err(Error::PropSerialization {
        type_name: json_type_name(&other).to_string(),
        args: vec!["props must be a JSON object".to_string()],
      }),
    }
  }

  /// Build props from any serializable struct or map.
  pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
    let json = serde_json::to_value(value).map_err(|e| Error::PropSerialization {
      type_name: std::any::type_name::<T>().to_string(),
      args: vec![e.to_string()],
    })?;
    Self::from_json(json)
  }

  fn to_json(&self) -> Result<Value> {
    let mut map = Map::with_capacity(self.0.len());
    for (key, value) in &self.0 {
      map.insert(key.clone(), value.to_json()?);
    }
    Ok(Value::Object(map))
  }
}

impl From<Map<String, Value>> for Props {
  fn from(map: Map<String, Value>) -> Self {
    Self(map.into_iter().map(|(k, v)| (k, PropValue::from(v))).collect())
  }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

fn json_type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

/// JSON text with `", "` / `": "` separators and ASCII-only, script-safe strings.
struct HostFormatter;

impl serde_json::ser::Formatter for HostFormatter {
  fn begin_array_value<W: ?Sized + io::Write>(&mut self, w: &mut W, first: bool) -> io::Result<()> {
    if first { Ok(()) } else { w.write_all(b", ") }
  }

  fn begin_object_key<W: ?Sized + io::Write>(&mut self, w: &mut W, first: bool) -> io::Result<()> {
    if first { Ok(()) } else { w.write_all(b", ") }
  }

  fn begin_object_value<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
    w.write_all(b": ")
  }

  fn write_string_fragment<W: ?Sized + io::Write>(
    &mut self,
    w: &mut W,
    fragment: &str,
  ) -> io::Result<()> {
    let mut start = 0;
    for (i, ch) in fragment.char_indices() {
      if ch.is_ascii() && !matches!(ch, '<' | '>' | '&') {
        continue;
      }
      w.write_all(fragment[start..i].as_bytes())?;
      let mut units = [0u16; 2];
      for unit in ch.encode_utf16(&mut units) {
        w.write_all(format!("\\u{unit:04x}").as_bytes())?;
      }
      start = i + ch.len_utf8();
    }
    w.write_all(fragment[start..].as_bytes())
  }
}

/// Serialize props to JSON, failing on the first value with no JSON form.
pub fn serialize_props(props: &Props) -> Result<String> {
  let value = props.to_json()?;
  let mut out = Vec::with_capacity(64);
  let mut ser = serde_json::Serializer::with_formatter(&mut out, HostFormatter);
  value.serialize(&mut ser).map_err(|e| Error::PropSerialization {
    type_name: "Props".to_string(),
    args: vec![e.to_string()],
  })?;
  Ok(String::from_utf8_lossy(&out).into_owned())
}
