//! Loader options carried opaquely from catalog entries to the loader.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed value type of a loader option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Str(String),
    None,
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Number(n) => write!(f, "{n}"),
            OptionValue::Str(s) => f.write_str(s),
            OptionValue::None => f.write_str("none"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self { OptionValue::Bool(b) }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self { OptionValue::Number(n) }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self { OptionValue::Str(s.to_string()) }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self { OptionValue::Str(s) }
}

impl<T: Into<OptionValue>> From<Option<T>> for OptionValue {
    fn from(v: Option<T>) -> Self { v.map_or(OptionValue::None, Into::into) }
}

/// Key-ordered options forwarded to a [`crate::Loader`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoaderOptions(BTreeMap<String, OptionValue>);

impl LoaderOptions {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Option<OptionValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> { self.0.get(key) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for LoaderOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for LoaderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_toml_table() {
        let options: LoaderOptions = toml::from_str(
            r#"
            dtype = "complex"
            scale = 2
            normalize = true
            "#,
        )
        .unwrap();

        assert_eq!(options.get("dtype"), Some(&OptionValue::Str("complex".into())));
        assert_eq!(options.get("scale"), Some(&OptionValue::Number(2.0)));
        assert_eq!(options.get("normalize"), Some(&OptionValue::Bool(true)));
        assert_eq!(options.to_string(), "dtype=complex, normalize=true, scale=2");
    }

    #[test]
    fn test_none_from_missing_value() {
        let options = LoaderOptions::new().with("image_field", None::<&str>);
        assert_eq!(options.get("image_field"), Some(&OptionValue::None));
        assert_eq!(options.len(), 1);
    }
}
