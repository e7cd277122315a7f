use std::fmt;

use indexmap::IndexMap;
use strum::{Display, EnumString};

use crate::parser;

/// Value type declared by the `Type=` attribute of an INFO or FORMAT definition.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumString, Display)]
pub enum InfoType {
    Integer,
    Float,
    Flag,
    Character,
    String,
}

/// Cardinality declared by the `Number=` attribute.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum InfoNumber {
    Count(usize),
    /// `R`: one value per allele, including REF.
    Alleles,
    /// `A`: one value per ALT allele.
    AlternateAlleles,
    /// `G`: one value per possible genotype.
    Genotypes,
    /// `.`
    Unknown,
}

/// One attribute of a structured header declaration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum AttrValue {
    /// A fragment without `=`; the key is known, the value is not.
    Missing,
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttrValue::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_owned())
    }
}

/// Key/value attributes of a structured header line, e.g. the body of
/// `##INFO=<ID=DP,Number=1,Type=Integer,Description="Total Depth">`.
pub type Attributes = IndexMap<String, AttrValue>;

/// Typed views on the attributes every INFO/FORMAT definition carries.
pub trait Definition {
    fn kind(&self) -> Option<InfoType>;

    fn number(&self) -> Option<InfoNumber>;

    fn description(&self) -> Option<&str>;
}

impl Definition for Attributes {
    fn kind(&self) -> Option<InfoType> {
        self.get("Type")
            .and_then(AttrValue::as_str)
            .and_then(|t| t.parse().ok())
    }

    fn number(&self) -> Option<InfoNumber> {
        match self.get("Number")? {
            AttrValue::Number(n) if *n >= 0.0 && n.fract() == 0.0 => {
                Some(InfoNumber::Count(*n as usize))
            }
            AttrValue::Text(s) => parser::info_number(s).ok().map(|(_, number)| number),
            _ => None,
        }
    }

    fn description(&self) -> Option<&str> {
        self.get("Description").and_then(AttrValue::as_str)
    }
}

/// Everything declared under one `##key=` in the header.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Metadata {
    /// `##fileDate=20090805`
    Scalar(String),
    /// A structured line without an `ID`, e.g. `##PEDIGREE=<Child=A,Mother=B>`.
    Block(Attributes),
    /// Structured lines keyed by their `ID`.
    Entries(IndexMap<String, Attributes>),
}

/// A borrowed position inside the metadata catalog, returned by
/// [`Header::get_metadata`](crate::header::Header::get_metadata).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetadataNode<'a> {
    Catalog(&'a IndexMap<String, Metadata>),
    Category(&'a Metadata),
    Attributes(&'a Attributes),
    Value(&'a AttrValue),
}

impl<'a> MetadataNode<'a> {
    /// Steps one key deeper; `None` when there is nothing under `key`.
    pub fn get(self, key: &str) -> Option<MetadataNode<'a>> {
        match self {
            MetadataNode::Catalog(catalog) => catalog.get(key).map(MetadataNode::Category),
            MetadataNode::Category(Metadata::Scalar(_)) => None,
            MetadataNode::Category(Metadata::Block(attributes))
            | MetadataNode::Attributes(attributes) => match attributes.get(key)? {
                AttrValue::Missing => None,
                value => Some(MetadataNode::Value(value)),
            },
            MetadataNode::Category(Metadata::Entries(entries)) => {
                entries.get(key).map(MetadataNode::Attributes)
            }
            MetadataNode::Value(_) => None,
        }
    }

    pub fn as_str(self) -> Option<&'a str> {
        match self {
            MetadataNode::Category(Metadata::Scalar(s)) => Some(s),
            MetadataNode::Value(value) => value.as_str(),
            _ => None,
        }
    }

    pub fn as_attributes(self) -> Option<&'a Attributes> {
        match self {
            MetadataNode::Attributes(attributes)
            | MetadataNode::Category(Metadata::Block(attributes)) => Some(attributes),
            _ => None,
        }
    }

    pub fn as_value(self) -> Option<&'a AttrValue> {
        match self {
            MetadataNode::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// A single decoded INFO or FORMAT element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Coerces `raw` according to the declared type. Numbers that fail to
    /// parse are kept as text.
    pub(crate) fn coerce(raw: &str, kind: Option<InfoType>) -> Self {
        match kind {
            Some(InfoType::Integer) => raw
                .parse()
                .map(Value::Integer)
                .or_else(|_| raw.parse().map(Value::Float))
                .unwrap_or_else(|_| Value::String(raw.to_owned())),
            Some(InfoType::Float) => raw
                .parse()
                .map(Value::Float)
                .unwrap_or_else(|_| Value::String(raw.to_owned())),
            _ => Value::String(raw.to_owned()),
        }
    }

    pub fn integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn float(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(_) => None,
        }
    }

    pub fn string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(s) => f.write_str(s),
        }
    }
}

/// Decoded INFO entry.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    /// Present without a value.
    Flag,
    /// Comma separated values; `None` stands for `.`.
    Values(Vec<Option<Value>>),
}

impl InfoValue {
    pub fn is_flag(&self) -> bool {
        matches!(self, InfoValue::Flag)
    }

    pub fn values(&self) -> &[Option<Value>] {
        match self {
            InfoValue::Flag => &[],
            InfoValue::Values(values) => values,
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for InfoValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InfoValue::Flag => serializer.serialize_bool(true),
            InfoValue::Values(values) => serde::Serialize::serialize(values, serializer),
        }
    }
}

/// Decoded FILTER column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Pass,
    Names(Vec<String>),
}

impl Filter {
    pub(crate) fn from_column(column: &str) -> Option<Self> {
        if column == "." {
            return None;
        }
        let names: Vec<String> = column.split(';').map(str::to_owned).collect();
        if names.len() == 1 && names[0] == "PASS" {
            Some(Filter::Pass)
        } else {
            Some(Filter::Names(names))
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Filter::Pass)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Filter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Filter::Pass => serializer.serialize_str("PASS"),
            Filter::Names(names) => serde::Serialize::serialize(names, serializer),
        }
    }
}
