//! Lazy decoding of VCF data lines.
//!
//! A [`VcfParser`] is built once from the header text. Each data line is
//! then decoded into a [`VcfRecord`] whose fixed columns are available right
//! away, while the per-sample columns are only decoded when asked for, either
//! in full ([`VcfRecord::samples`]) or just the genotypes
//! ([`VcfRecord::genotypes`]).
//!
//! ```
//! use rust_vcf::{Record, VcfParser};
//!
//! let header = "##fileformat=VCFv4.3\n\
//!               #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA00001\n";
//! let parser = VcfParser::new(header).unwrap();
//! let record = parser
//!     .parse_line("20\t14370\t.\tG\tA\t29\tPASS\tDP=14;DB\tGT:DP\t0|1:9")
//!     .unwrap();
//! assert_eq!(record.pos(), 14370);
//! assert!(record.has_flag("DB"));
//! assert_eq!(record.genotypes()["NA00001"], "0|1");
//! ```

pub mod breakend;
pub mod error;
pub mod header;
pub(crate) mod parser;
pub mod reader;
pub mod record;
pub mod reserved;
pub mod types;

pub use breakend::{parse_breakend, Allele, Breakend};
pub use error::{BreakendError, HeaderError, RecordError};
pub use header::Header;
pub use parser::parse_meta_string;
pub use reader::VcfRecords;
pub use record::{
    parse_genotypes_only, process_genotypes, ParserOptions, Record, VcfParser, VcfRecord,
};
