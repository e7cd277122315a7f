use std::collections::HashMap;
use std::str::FromStr;

use getset::{CopyGetters, Getters};
use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, warn};
use multimap::MultiMap;

use crate::error::HeaderError;
use crate::parser::{meta_line, parse_meta_string};
use crate::reserved;
use crate::types::{AttrValue, Attributes, Definition, InfoType, Metadata, MetadataNode};

const COLUMNS: [&str; 8] = ["#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO"];

pub type Sample = String;

#[cfg(feature = "sync")]
pub(crate) type SharedHeader = std::sync::Arc<Header>;
#[cfg(not(feature = "sync"))]
pub(crate) type SharedHeader = std::rc::Rc<Header>;

/// Header of a VCF file: the metadata catalog (reserved definitions shadowed
/// by declared ones) and the ordered sample names from the `#CHROM` line.
///
/// Immutable once built; records only ever read from it.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Header {
    #[getset(get = "pub")]
    catalog: IndexMap<String, Metadata>,
    /// Every `##key=value` line as written, in header order.
    #[getset(get = "pub")]
    meta: MultiMap<String, String>,
    #[getset(get = "pub")]
    samples: Vec<Sample>,
    #[getset(get = "pub")]
    column_line: String,
    #[getset(get_copy = "pub")]
    strict: bool,
    info_kinds: HashMap<String, InfoType>,
    format_kinds: HashMap<String, InfoType>,
}

impl Header {
    /// Parses a complete header (LF or CRLF line endings) in strict mode.
    pub fn parse(text: &str) -> Result<Self, HeaderError> {
        Self::parse_with_strictness(text, true)
    }

    /// Parses a complete header. In strict mode a `#CHROM` line with a
    /// FORMAT column but no samples is rejected.
    pub fn parse_with_strictness(text: &str, strict: bool) -> Result<Self, HeaderError> {
        if text.is_empty() {
            return Err(HeaderError::Empty);
        }
        let lines = text
            .split(|c: char| c == '\r' || c == '\n')
            .filter(|line| !line.is_empty())
            .collect_vec();
        if lines.is_empty() {
            return Err(HeaderError::NoLines);
        }

        let mut header = Header {
            catalog: reserved::catalog(),
            meta: MultiMap::new(),
            samples: Vec::new(),
            column_line: String::new(),
            strict,
            info_kinds: HashMap::new(),
            format_kinds: HashMap::new(),
        };

        let mut column_line = None;
        for line in lines {
            if !line.starts_with('#') {
                return Err(HeaderError::BadLine(line.to_owned()));
            } else if line.starts_with("##") {
                header.add_meta_line(line)?;
            } else {
                column_line = Some(line);
            }
        }

        let column_line = column_line.ok_or(HeaderError::NoFormatLine)?.trim();
        let fields = column_line.split('\t').collect_vec();
        if fields.len() < COLUMNS.len() {
            return Err(HeaderError::MissingColumns(column_line.to_owned()));
        }
        if fields[..COLUMNS.len()] != COLUMNS {
            return Err(HeaderError::IncorrectColumns(column_line.to_owned()));
        }
        if strict && fields.len() == COLUMNS.len() + 1 {
            return Err(HeaderError::NoSamples(column_line.to_owned()));
        }
        header.samples = fields.iter().skip(9).map(|&s| s.to_owned()).collect();
        header.column_line = column_line.to_owned();
        header.info_kinds = header.kinds("INFO");
        header.format_kinds = header.kinds("FORMAT");

        debug!(
            "parsed VCF header: {} samples, {} metadata categories",
            header.samples.len(),
            header.catalog.len()
        );
        Ok(header)
    }

    fn add_meta_line(&mut self, line: &str) -> Result<(), HeaderError> {
        let line = line.trim();
        let (key, value) = meta_line(line)
            .map(|(_, kv)| kv)
            .map_err(|_| HeaderError::InvalidMetadataLine(line.to_owned()))?;
        self.meta.insert(key.to_owned(), value.to_owned());

        if !value.starts_with('<') {
            return self.replace_category(key, Metadata::Scalar(value.to_owned()));
        }

        let mut attributes = parse_meta_string(value);
        match attributes.shift_remove("ID") {
            Some(AttrValue::Text(id)) => {
                match self.catalog.get_mut(key) {
                    Some(Metadata::Entries(entries)) => {
                        entries.insert(id, attributes);
                    }
                    _ => {
                        let mut entries = IndexMap::new();
                        entries.insert(id, attributes);
                        self.catalog.insert(key.to_owned(), Metadata::Entries(entries));
                    }
                }
                Ok(())
            }
            Some(other) => {
                warn!("ignoring {} header line with unusable ID {:?}: {}", key, other, line);
                Ok(())
            }
            None => self.replace_category(key, Metadata::Block(attributes)),
        }
    }

    /// Stores a scalar or ID-less block, never dropping declared entries.
    fn replace_category(&mut self, key: &str, metadata: Metadata) -> Result<(), HeaderError> {
        if let Some(Metadata::Entries(_)) = self.catalog.get(key) {
            warn!(
                "ignoring ##{} line without ID, it would replace the {} definitions",
                key, key
            );
        } else {
            self.catalog.insert(key.to_owned(), metadata);
        }
        Ok(())
    }

    fn kinds(&self, category: &str) -> HashMap<String, InfoType> {
        match self.catalog.get(category) {
            Some(Metadata::Entries(entries)) => entries
                .iter()
                .filter_map(|(id, attributes)| attributes.kind().map(|kind| (id.clone(), kind)))
                .collect(),
            _ => HashMap::new(),
        }
    }

    /// Walks the catalog along `path`, e.g. `&["INFO", "DP", "Type"]`.
    ///
    /// An empty path yields the whole catalog. Returns `None` as soon as a
    /// step does not exist, so lookups of undeclared fields never fail.
    pub fn get_metadata(&self, path: &[&str]) -> Option<MetadataNode<'_>> {
        path.iter()
            .try_fold(MetadataNode::Catalog(&self.catalog), |node, key| node.get(key))
    }

    fn definition(&self, category: &str, id: &str) -> Option<&Attributes> {
        self.get_metadata(&[category, id])
            .and_then(MetadataNode::as_attributes)
    }

    pub fn info(&self, id: &str) -> Option<&Attributes> {
        self.definition("INFO", id)
    }

    pub fn format(&self, id: &str) -> Option<&Attributes> {
        self.definition("FORMAT", id)
    }

    pub fn filter(&self, id: &str) -> Option<&Attributes> {
        self.definition("FILTER", id)
    }

    pub fn alt(&self, id: &str) -> Option<&Attributes> {
        self.definition("ALT", id)
    }

    /// All values given for `key`, e.g. every `##source=` line.
    pub fn meta_lines(&self, key: &str) -> Option<&Vec<String>> {
        self.meta.get_vec(key)
    }

    pub fn info_type(&self, id: &str) -> Option<InfoType> {
        self.info_kinds.get(id).copied()
    }

    pub fn format_type(&self, id: &str) -> Option<InfoType> {
        self.format_kinds.get(id).copied()
    }
}

impl FromStr for Header {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Header::parse(s)
    }
}
