//! INFO, FORMAT, ALT and FILTER definitions reserved by VCF 4.3.
//! Header declarations with the same ID shadow these.

use indexmap::IndexMap;

use crate::types::{AttrValue, Attributes, Metadata};

/// `(ID, Number, Type, Description)`
type FieldDef = (&'static str, Option<&'static str>, Option<&'static str>, &'static str);

/// `(ID, Description, so_term)`
type AltDef = (&'static str, &'static str, Option<&'static str>);

#[rustfmt::skip]
const INFO_FIELDS: &[FieldDef] = &[
    ("AA", Some("1"), Some("String"), "Ancestral allele"),
    ("AC", Some("A"), Some("Integer"), "Allele count in genotypes, for each ALT allele, in the same order as listed"),
    ("AD", Some("R"), Some("Integer"), "Total read depth for each allele"),
    ("ADF", Some("R"), Some("Integer"), "Read depth for each allele on the forward strand"),
    ("ADR", Some("R"), Some("Integer"), "Read depth for each allele on the reverse strand"),
    ("AF", Some("A"), Some("Float"), "Allele frequency for each ALT allele in the same order as listed (estimated from primary data, not called genotypes)"),
    ("AN", Some("1"), Some("Integer"), "Total number of alleles in called genotypes"),
    ("BQ", Some("1"), Some("Float"), "RMS base quality"),
    ("CIGAR", Some("1"), Some("Float"), "Cigar string describing how to align an alternate allele to the reference allele"),
    ("DB", Some("0"), Some("Flag"), "dbSNP membership"),
    ("DP", Some("1"), Some("Integer"), "combined depth across samples"),
    ("END", Some("1"), Some("Integer"), "End position (for use with symbolic alleles)"),
    ("H2", Some("0"), Some("Flag"), "HapMap2 membership"),
    ("H3", Some("0"), Some("Flag"), "HapMap3 membership"),
    ("MQ", Some("1"), None, "RMS mapping quality"),
    ("MQ0", Some("1"), Some("Integer"), "Number of MAPQ == 0 reads"),
    ("NS", Some("1"), Some("Integer"), "Number of samples with data"),
    ("SB", Some("4"), Some("Integer"), "Strand bias"),
    ("SOMATIC", Some("0"), Some("Flag"), "Somatic mutation (for cancer genomics)"),
    ("VALIDATED", Some("0"), Some("Flag"), "Validated by follow-up experiment"),
    ("1000G", Some("0"), Some("Flag"), "1000 Genomes membership"),
    // structural variants
    ("IMPRECISE", Some("0"), Some("Flag"), "Imprecise structural variation"),
    ("NOVEL", Some("0"), Some("Flag"), "Indicates a novel structural variation"),
    ("SVTYPE", Some("1"), Some("String"), "Type of structural variant"),
    ("SVLEN", None, Some("Integer"), "Difference in length between REF and ALT alleles"),
    ("CIPOS", Some("2"), Some("Integer"), "Confidence interval around POS for imprecise variants"),
    ("CIEND", Some("2"), Some("Integer"), "Confidence interval around END for imprecise variants"),
    ("HOMLEN", None, Some("Integer"), "Length of base pair identical micro-homology at event breakpoints"),
    ("HOMSEQ", None, Some("String"), "Sequence of base pair identical micro-homology at event breakpoints"),
    ("BKPTID", None, Some("String"), "ID of the assembled alternate allele in the assembly file"),
    ("MEINFO", Some("4"), Some("String"), "Mobile element info of the form NAME,START,END,POLARITY"),
    ("METRANS", Some("4"), Some("String"), "Mobile element transduction info of the form CHR,START,END,POLARITY"),
    ("DGVID", Some("1"), Some("String"), "ID of this element in Database of Genomic Variation"),
    ("DBVARID", Some("1"), Some("String"), "ID of this element in DBVAR"),
    ("DBRIPID", Some("1"), Some("String"), "ID of this element in DBRIP"),
    ("MATEID", None, Some("String"), "ID of mate breakends"),
    ("PARID", Some("1"), Some("String"), "ID of partner breakend"),
    ("EVENT", Some("1"), Some("String"), "ID of event associated to breakend"),
    ("CILEN", Some("2"), Some("Integer"), "Confidence interval around the inserted material between breakend"),
    ("DPADJ", None, Some("Integer"), "Read Depth of adjacency"),
    ("CN", Some("1"), Some("Integer"), "Copy number of segment containing breakend"),
    ("CNADJ", None, Some("Integer"), "Copy number of adjacency"),
    ("CICN", Some("2"), Some("Integer"), "Confidence interval around copy number for the segment"),
    ("CICNADJ", None, Some("Integer"), "Confidence interval around copy number for the adjacency"),
];

#[rustfmt::skip]
const FORMAT_FIELDS: &[FieldDef] = &[
    ("AD", Some("R"), Some("Integer"), "Read depth for each allele"),
    ("ADF", Some("R"), Some("Integer"), "Read depth for each allele on the forward strand"),
    ("ADR", Some("R"), Some("Integer"), "Read depth for each allele on the reverse strand"),
    ("DP", Some("1"), Some("Integer"), "Read depth"),
    ("EC", Some("A"), Some("Integer"), "Expected alternate allele counts"),
    ("FT", Some("1"), Some("String"), "Filter indicating if this genotype was \"called\""),
    ("GL", Some("G"), Some("Float"), "Genotype likelihoods"),
    ("GP", Some("G"), Some("Float"), "Genotype posterior probabilities"),
    ("GQ", Some("1"), Some("Integer"), "Conditional genotype quality"),
    ("GT", Some("1"), Some("String"), "Genotype"),
    ("HQ", Some("2"), Some("Integer"), "Haplotype quality"),
    ("MQ", Some("1"), Some("Integer"), "RMS mapping quality"),
    ("PL", Some("G"), Some("Integer"), "Phred-scaled genotype likelihoods rounded to the closest integer"),
    ("PQ", Some("1"), Some("Integer"), "Phasing quality"),
    ("PS", Some("1"), Some("Integer"), "Phase set"),
];

#[rustfmt::skip]
const ALT_TYPES: &[AltDef] = &[
    ("DEL", "Deletion relative to the reference", Some("deletion")),
    ("INS", "Insertion of novel sequence relative to the reference", Some("insertion")),
    ("DUP", "Region of elevated copy number relative to the reference", Some("copy_number_gain")),
    ("INV", "Inversion of reference sequence", Some("inversion")),
    ("CNV", "Copy number variable region (may be both deletion and duplication)", Some("copy_number_variation")),
    ("DUP:TANDEM", "Tandem duplication", Some("copy_number_gain")),
    ("DEL:ME", "Deletion of mobile element relative to the reference", None),
    ("INS:ME", "Insertion of a mobile element relative to the reference", None),
    ("NON_REF", "Represents any possible alternative allele at this location", Some("sequence_variant")),
    ("*", "Represents any possible alternative allele at this location", Some("sequence_variant")),
];

const FILTER_TYPES: &[(&str, &str)] = &[("PASS", "Passed all filters")];

fn number(raw: &str) -> AttrValue {
    raw.parse()
        .map(AttrValue::Number)
        .unwrap_or_else(|_| AttrValue::from(raw))
}

fn fields(defs: &[FieldDef]) -> Metadata {
    let entries = defs
        .iter()
        .map(|&(id, num, kind, description)| {
            let mut attributes = Attributes::new();
            if let Some(num) = num {
                attributes.insert("Number".into(), number(num));
            }
            if let Some(kind) = kind {
                attributes.insert("Type".into(), kind.into());
            }
            attributes.insert("Description".into(), description.into());
            (id.to_owned(), attributes)
        })
        .collect();
    Metadata::Entries(entries)
}

fn alt_types() -> Metadata {
    let entries = ALT_TYPES
        .iter()
        .map(|&(id, description, so_term)| {
            let mut attributes = Attributes::new();
            attributes.insert("Description".into(), description.into());
            if let Some(so_term) = so_term {
                attributes.insert("so_term".into(), so_term.into());
            }
            (id.to_owned(), attributes)
        })
        .collect();
    Metadata::Entries(entries)
}

fn filter_types() -> Metadata {
    let entries = FILTER_TYPES
        .iter()
        .map(|&(id, description)| {
            let mut attributes = Attributes::new();
            attributes.insert("Description".into(), description.into());
            (id.to_owned(), attributes)
        })
        .collect();
    Metadata::Entries(entries)
}

/// A fresh catalog holding only the reserved definitions.
pub fn catalog() -> IndexMap<String, Metadata> {
    let mut catalog = IndexMap::with_capacity(4);
    catalog.insert("INFO".to_owned(), fields(INFO_FIELDS));
    catalog.insert("FORMAT".to_owned(), fields(FORMAT_FIELDS));
    catalog.insert("ALT".to_owned(), alt_types());
    catalog.insert("FILTER".to_owned(), filter_types());
    catalog
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{Definition, InfoNumber, InfoType, MetadataNode};

    #[test]
    fn test_reserved_info() {
        let catalog = catalog();
        let ac = MetadataNode::Catalog(&catalog)
            .get("INFO")
            .and_then(|n| n.get("AC"))
            .and_then(MetadataNode::as_attributes)
            .unwrap();
        assert_eq!(ac.number(), Some(InfoNumber::AlternateAlleles));
        assert_eq!(ac.kind(), Some(InfoType::Integer));
        assert_eq!(
            ac.description(),
            Some("Allele count in genotypes, for each ALT allele, in the same order as listed")
        );
    }

    #[test]
    fn test_untyped_reserved() {
        let catalog = catalog();
        let node = MetadataNode::Catalog(&catalog).get("INFO").unwrap();
        let mq = node.get("MQ").and_then(MetadataNode::as_attributes).unwrap();
        assert_eq!(mq.kind(), None);
        assert!(node.get("SVLEN").unwrap().get("Number").is_none());
        assert_eq!(
            node.get("DB").unwrap().get("Number").and_then(MetadataNode::as_value),
            Some(&AttrValue::Number(0.0))
        );
    }

    #[test]
    fn test_alt_and_filter() {
        let catalog = catalog();
        let root = MetadataNode::Catalog(&catalog);
        assert_eq!(
            root.get("ALT")
                .and_then(|n| n.get("DUP:TANDEM"))
                .and_then(|n| n.get("so_term"))
                .and_then(MetadataNode::as_str),
            Some("copy_number_gain")
        );
        assert!(root.get("ALT").unwrap().get("DEL:ME").unwrap().get("so_term").is_none());
        assert!(root.get("FILTER").unwrap().get("PASS").is_some());
    }
}
