//! Query parameters sent to the MediaWiki API.

use anyhow::{Result, bail};
use std::fmt;

/// Parameters added to every request unless the caller supplies the same key.
pub const DEFAULT_PARAMS: [(&str, &str); 3] =
    [("format", "json"), ("formatversion", "2"), ("origin", "*")];

/// A scalar query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::UInt(n) => write!(f, "{}", n),
            ParamValue::Float(x) => write_float(f, *x),
            ParamValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Writes a float the way ECMAScript's Number-to-String does: shortest
/// round-trip digits, exponent form below 1e-6 and from 1e21 up, `0` for
/// negative zero and `Infinity` for infinities.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("NaN");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if x == 0.0 {
        return f.write_str("0");
    }

    let abs = x.abs();
    if (1e-6..1e21).contains(&abs) {
        return write!(f, "{}", x);
    }

    // `{:e}` gives e.g. "1e21" or "-1.5e-7"; positive exponents need a sign.
    let sci = format!("{:e}", x);
    match sci.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{}e+{}", mantissa, exp),
        _ => f.write_str(&sci),
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<&String> for ParamValue {
    fn from(s: &String) -> Self {
        ParamValue::Text(s.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

macro_rules! impl_from_int {
    ($variant:ident => $wide:ty: $($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(n: $t) -> Self {
                    ParamValue::$variant(<$wide>::from(n))
                }
            }
        )*
    };
}

impl_from_int!(Int => i64: i8, i16, i32, i64, u8, u16, u32);
impl_from_int!(UInt => u64: u64);

impl From<usize> for ParamValue {
    fn from(n: usize) -> Self {
        // usize is at most 64 bits on every supported target.
        ParamValue::UInt(n as u64)
    }
}

/// An ordered mapping of query parameter names to values.
///
/// Inserting an existing key replaces its value in place, so the position of
/// the first insertion is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the defaults overlaid by these parameters. Caller values win on
    /// collision.
    pub fn merged_with_defaults(&self) -> Params {
        let mut merged: Params = DEFAULT_PARAMS.iter().copied().collect();
        merged.extend(self.entries.iter().cloned());
        merged
    }

    /// Text representation of every pair, ready for a query string.
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Parses a `key=value` argument. Only the first `=` separates, so the value
/// may contain further `=` characters.
pub fn parse_pair(s: &str) -> Result<(String, ParamValue)> {
    let Some((key, value)) = s.split_once('=') else {
        bail!("Invalid parameter '{}'. Expected 'key=value'.", s);
    };
    if key.is_empty() {
        bail!("Invalid parameter '{}'. Parameter name is empty.", s);
    }
    Ok((key.to_string(), ParamValue::Text(value.to_string())))
}
