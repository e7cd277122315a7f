mod genotypes;
mod samples;

use std::borrow::Cow;
use std::ops::Range;

use indexmap::IndexMap;
use itertools::Itertools;
use log::warn;

use crate::breakend::{parse_breakend, Allele};
use crate::error::{HeaderError, RecordError};
use crate::header::{Header, SharedHeader};
use crate::types::{Filter, InfoType, InfoValue, Value};

pub use genotypes::{parse_genotypes_only, process_genotypes};
pub use samples::SampleFields;

/// Columns up to and including FORMAT.
const FIXED_COLUMNS: usize = 9;
/// CHROM to FILTER must always be present.
const MANDATORY_COLUMNS: usize = 7;

pub trait Record {
    fn chrom(&self) -> &str;

    fn pos(&self) -> u64;

    fn id(&self) -> Option<&[String]>;

    fn ref_allele(&self) -> &str;

    fn alt_alleles(&self) -> Option<&[Allele]>;

    fn qual(&self) -> Option<f64>;

    fn filter(&self) -> Option<&Filter>;

    fn info(&self, tag: &str) -> Option<&InfoValue>;

    fn format(&self) -> Option<&str>;

    fn has_flag(&self, tag: &str) -> bool {
        matches!(self.info(tag), Some(InfoValue::Flag))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Reject data lines without an INFO column and `#CHROM` lines that
    /// declare FORMAT but no samples.
    pub strict: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// Decodes data lines against one parsed header.
///
/// Cheap to share: the header sits behind an `Rc` (or an `Arc` with the
/// `sync` feature) and each decoded record keeps a handle to it.
#[derive(Debug, Clone)]
pub struct VcfParser {
    header: SharedHeader,
    options: ParserOptions,
}

impl VcfParser {
    pub fn new(header: &str) -> Result<Self, HeaderError> {
        Self::with_options(header, ParserOptions::default())
    }

    pub fn with_options(header: &str, options: ParserOptions) -> Result<Self, HeaderError> {
        let header = Header::parse_with_strictness(header, options.strict)?;
        Ok(Self {
            header: SharedHeader::new(header),
            options,
        })
    }

    pub fn header(&self) -> &Header {
        self.header.as_ref()
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Decodes one data line. Trailing whitespace (including `\r`) is ignored.
    ///
    /// The fixed columns are decoded right away; the sample columns are kept
    /// as-is until [`VcfRecord::samples`] or [`VcfRecord::genotypes`] asks
    /// for them.
    pub fn parse_line(&self, line: &str) -> Result<VcfRecord, RecordError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(RecordError::EmptyLine);
        }

        // only the first nine columns are split, however many samples follow
        let (fixed, rest) = match line.match_indices('\t').nth(FIXED_COLUMNS - 1) {
            Some((tab, _)) => (&line[..tab], &line[tab + 1..]),
            None => (line, ""),
        };
        let fields = fixed.split('\t').collect_vec();
        if fields.len() < MANDATORY_COLUMNS {
            return Err(RecordError::MissingColumns {
                found: fields.len(),
            });
        }

        let info = match fields.get(7).filter(|raw| !raw.is_empty()) {
            Some(raw) => self.decode_info(raw),
            None if self.options.strict => return Err(RecordError::MissingInfo),
            None => IndexMap::new(),
        };

        let pos: u64 = fields[1]
            .parse()
            .map_err(|_| RecordError::InvalidPosition(fields[1].to_owned()))?;
        let qual = match fields[5] {
            "." => None,
            raw => Some(
                raw.parse::<f64>()
                    .map_err(|_| RecordError::InvalidQuality(raw.to_owned()))?,
            ),
        };
        let id = match fields[2] {
            "." => None,
            raw => Some(raw.split(';').map(str::to_owned).collect()),
        };
        let alt = match fields[4] {
            "." => None,
            raw => Some(Self::decode_alt(raw, is_breakend_record(&info))?),
        };

        Ok(VcfRecord {
            chrom: fields[0].to_owned(),
            pos,
            id,
            ref_allele: fields[3].to_owned(),
            alt,
            qual,
            filter: Filter::from_column(fields[6]),
            info,
            format: fields
                .get(8)
                .filter(|raw| !raw.is_empty())
                .map(|&raw| raw.to_owned()),
            rest: rest.to_owned(),
            header: self.header.clone(),
        })
    }

    fn decode_alt(raw: &str, breakends: bool) -> Result<Vec<Allele>, RecordError> {
        raw.split(',')
            .map(|token| -> Result<Allele, RecordError> {
                let breakend = if breakends {
                    parse_breakend(token)?
                } else {
                    None
                };
                Ok(breakend.map_or_else(|| Allele::Plain(token.to_owned()), Allele::Breakend))
            })
            .collect()
    }

    fn decode_info(&self, raw: &str) -> IndexMap<String, InfoValue> {
        if raw == "." {
            return IndexMap::new();
        }
        let percent_encoded = raw.contains('%');
        raw.split(';')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                let kind = self.header.info_type(key);
                if kind == Some(InfoType::Flag) {
                    if !value.is_empty() {
                        warn!("INFO flag {} carries a value, ignoring {:?}", key, value);
                    }
                    return (key.to_owned(), InfoValue::Flag);
                }
                if value.is_empty() {
                    return (key.to_owned(), InfoValue::Flag);
                }
                let values = value
                    .split(',')
                    .map(|item| match item {
                        "." => None,
                        item if percent_encoded => Some(Value::coerce(&percent_decode(item), kind)),
                        item => Some(Value::coerce(item, kind)),
                    })
                    .collect();
                (key.to_owned(), InfoValue::Values(values))
            })
            .collect()
    }
}

/// Best effort: an element with any malformed escape, or one that decodes
/// to invalid UTF-8, is returned untouched.
fn percent_decode(raw: &str) -> Cow<'_, str> {
    let bytes = raw.as_bytes();
    let well_formed = bytes
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b == b'%')
        .all(|(i, _)| {
            bytes
                .get(i + 1..i + 3)
                .map_or(false, |hex| hex.iter().all(u8::is_ascii_hexdigit))
        });
    if !well_formed {
        return Cow::Borrowed(raw);
    }
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

fn is_breakend_record(info: &IndexMap<String, InfoValue>) -> bool {
    info.get("SVTYPE")
        .and_then(|svtype| svtype.values().first())
        .and_then(|first| first.as_ref())
        .and_then(Value::string)
        == Some("BND")
}

/// One decoded data line.
///
/// The sample columns are stored verbatim and only decoded on request;
/// every such call works on its own copy of the result and leaves the
/// record untouched, so repeated calls agree.
#[derive(Debug, Clone)]
pub struct VcfRecord {
    chrom: String,
    pos: u64,
    id: Option<Vec<String>>,
    ref_allele: String,
    alt: Option<Vec<Allele>>,
    qual: Option<f64>,
    filter: Option<Filter>,
    info: IndexMap<String, InfoValue>,
    format: Option<String>,
    rest: String,
    header: SharedHeader,
}

impl VcfRecord {
    pub fn header(&self) -> &Header {
        self.header.as_ref()
    }

    /// All INFO entries in line order.
    pub fn info_fields(&self) -> &IndexMap<String, InfoValue> {
        &self.info
    }

    /// The raw, tab-separated sample columns.
    pub fn rest(&self) -> &str {
        &self.rest
    }

    /// Full decode of every sample, keyed by sample name then FORMAT key.
    /// Empty when the line has no FORMAT column.
    pub fn samples(&self) -> IndexMap<&str, SampleFields<'_>> {
        match &self.format {
            Some(format) => samples::decode_samples(self.header.as_ref(), format, &self.rest),
            None => IndexMap::new(),
        }
    }

    /// Raw `GT` string per sample; see [`parse_genotypes_only`].
    pub fn genotypes(&self) -> IndexMap<&str, &str> {
        parse_genotypes_only(
            self.format.as_deref().unwrap_or(""),
            &self.rest,
            self.header.samples(),
        )
    }

    /// Calls `callback(rest, start, end)` for each genotype; see [`process_genotypes`].
    pub fn process_genotypes(&self, callback: impl FnMut(&str, usize, usize)) {
        process_genotypes(
            self.format.as_deref().unwrap_or(""),
            &self.rest,
            self.header.samples().len(),
            callback,
        )
    }

    /// Byte range of the genotype of the sample at `index` within [`rest`](Self::rest).
    pub fn genotype_range(&self, index: usize) -> Option<Range<usize>> {
        let mut found = None;
        let mut current = 0;
        process_genotypes(
            self.format.as_deref().unwrap_or(""),
            &self.rest,
            index + 1,
            |_, start, end| {
                if current == index {
                    found = Some(start..end);
                }
                current += 1;
            },
        );
        found
    }
}

impl Record for VcfRecord {
    fn chrom(&self) -> &str {
        &self.chrom
    }

    fn pos(&self) -> u64 {
        self.pos
    }

    fn id(&self) -> Option<&[String]> {
        self.id.as_deref()
    }

    fn ref_allele(&self) -> &str {
        &self.ref_allele
    }

    fn alt_alleles(&self) -> Option<&[Allele]> {
        self.alt.as_deref()
    }

    fn qual(&self) -> Option<f64> {
        self.qual
    }

    fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    fn info(&self, tag: &str) -> Option<&InfoValue> {
        self.info.get(tag)
    }

    fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for VcfRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("VcfRecord", 9)?;
        state.serialize_field("CHROM", &self.chrom)?;
        state.serialize_field("POS", &self.pos)?;
        state.serialize_field("ID", &self.id)?;
        state.serialize_field("REF", &self.ref_allele)?;
        state.serialize_field("ALT", &self.alt)?;
        state.serialize_field("QUAL", &self.qual)?;
        state.serialize_field("FILTER", &self.filter)?;
        state.serialize_field("INFO", &self.info)?;
        state.serialize_field("FORMAT", &self.format)?;
        state.end()
    }
}
