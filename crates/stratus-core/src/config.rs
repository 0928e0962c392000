//! Opaque string-keyed configuration: [`ParameterList`].
//!
//! A parameter list is handed unchanged to diagnostic constructors and
//! to grids managers. This crate never interprets its contents; each
//! consumer validates the keys it reads.

use crate::error::ParameterError;
use indexmap::IndexMap;

/// A single configuration value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating-point number.
    Real(f64),
    /// String.
    Str(String),
    /// List of strings.
    StrList(Vec<String>),
    /// Nested parameter list.
    List(ParameterList),
}

impl ParamValue {
    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Real(_) => "real",
            Self::Str(_) => "string",
            Self::StrList(_) => "string list",
            Self::List(_) => "sublist",
        }
    }
}

/// A Rust type that can be read out of a [`ParamValue`].
pub trait ParamType: Sized {
    /// Type name reported in [`ParameterError::WrongType`].
    const TYPE_NAME: &'static str;

    /// Extract `Self` from a value, or `None` if the variant differs.
    fn from_param(value: &ParamValue) -> Option<Self>;

    /// Wrap `self` into a value.
    fn into_param(self) -> ParamValue;
}

macro_rules! impl_param_type {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl ParamType for $ty {
            const TYPE_NAME: &'static str = $name;

            fn from_param(value: &ParamValue) -> Option<Self> {
                match value {
                    ParamValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }

            fn into_param(self) -> ParamValue {
                ParamValue::$variant(self)
            }
        }
    };
}

impl_param_type!(bool, Bool, "bool");
impl_param_type!(i64, Int, "int");
impl_param_type!(f64, Real, "real");
impl_param_type!(String, Str, "string");
impl_param_type!(Vec<String>, StrList, "string list");

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl<T: ParamType> From<T> for ParamValue {
    fn from(v: T) -> Self {
        v.into_param()
    }
}

/// Named, insertion-ordered bag of configuration values.
///
/// # Examples
///
/// ```
/// use stratus_core::ParameterList;
///
/// let mut params = ParameterList::new("grids");
/// params.set("grids_names", vec!["point_grid".to_string()]);
/// let pl = params.sublist_mut("point_grid");
/// pl.set("number_of_vertical_levels", 72i64);
///
/// let nlevs: i64 = params.sublist("point_grid").unwrap().get("number_of_vertical_levels").unwrap();
/// assert_eq!(nlevs, 72);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterList {
    name: String,
    entries: IndexMap<String, ParamValue>,
}

impl ParameterList {
    /// Create an empty list.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    /// Name of this list (used in error messages).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert or replace a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Whether `key` is present (as a value or a sublist).
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw value lookup.
    pub fn value(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Typed lookup.
    pub fn get<T: ParamType>(&self, key: &str) -> Result<T, ParameterError> {
        let value = self
            .entries
            .get(key)
            .ok_or_else(|| ParameterError::MissingParameter {
                list: self.name.clone(),
                key: key.to_string(),
            })?;
        T::from_param(value).ok_or_else(|| ParameterError::WrongType {
            key: key.to_string(),
            expected: T::TYPE_NAME,
            found: value.type_name(),
        })
    }

    /// Typed lookup with a fallback for a missing key.
    ///
    /// A present key with the wrong type is still an error.
    pub fn get_or<T: ParamType>(&self, key: &str, default: T) -> Result<T, ParameterError> {
        if self.entries.contains_key(key) {
            self.get(key)
        } else {
            Ok(default)
        }
    }

    /// Nested list lookup.
    pub fn sublist(&self, name: &str) -> Result<&ParameterList, ParameterError> {
        match self.entries.get(name) {
            Some(ParamValue::List(pl)) => Ok(pl),
            Some(other) => Err(ParameterError::WrongType {
                key: name.to_string(),
                expected: "sublist",
                found: other.type_name(),
            }),
            None => Err(ParameterError::MissingSublist {
                list: self.name.clone(),
                name: name.to_string(),
            }),
        }
    }

    /// Nested list, created empty if absent.
    ///
    /// A non-list value stored under `name` is replaced.
    pub fn sublist_mut(&mut self, name: &str) -> &mut ParameterList {
        let entry = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| ParamValue::List(ParameterList::new(name)));
        if !matches!(entry, ParamValue::List(_)) {
            *entry = ParamValue::List(ParameterList::new(name));
        }
        match entry {
            ParamValue::List(pl) => pl,
            _ => unreachable!("entry was just set to a sublist"),
        }
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ParameterList {
    fn default() -> Self {
        Self::new("parameters")
    }
}
