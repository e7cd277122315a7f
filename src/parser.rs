use nom::branch::alt;
use nom::bytes::complete::{escaped, is_not, tag};
use nom::character::complete::{anychar, char, digit1};
use nom::combinator::{all_consuming, map_res, opt, recognize, rest, value};
use nom::multi::many0;
use nom::sequence::{delimited, preceded, separated_pair};
use nom::IResult;

use crate::types::{AttrValue, Attributes, InfoNumber};

/// Parses the `Number=` attribute of an INFO/FORMAT definition.
pub(crate) fn info_number(input: &str) -> IResult<&str, InfoNumber> {
    all_consuming(alt((
        map_res(digit1, |digits: &str| {
            digits.parse::<usize>().map(InfoNumber::Count)
        }),
        value(InfoNumber::AlternateAlleles, tag("A")),
        value(InfoNumber::Alleles, tag("R")),
        value(InfoNumber::Genotypes, tag("G")),
        value(InfoNumber::Unknown, tag(".")),
    )))(input)
}

/// Splits a `##key=value` line into key and value.
pub(crate) fn meta_line(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(tag("##"), separated_pair(is_not("="), char('='), rest))(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('"'),
        opt(escaped(is_not("\\\""), '\\', anychar)),
        char('"'),
    ))(input)
}

fn bracketed(input: &str) -> IResult<&str, &str> {
    recognize(delimited(char('['), opt(is_not("]")), char(']')))(input)
}

/// One `key=value` fragment, running up to the next top-level comma.
fn fragment(input: &str) -> IResult<&str, &str> {
    recognize(many0(alt((quoted, bracketed, is_not(",\"[")))))(input)
}

/// Splits on commas that are neither inside a quoted span nor inside a
/// square-bracketed span. An unbalanced quote or bracket swallows the rest of
/// the input into the current fragment.
fn split_fragments(input: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut input = input;
    while !input.is_empty() {
        let remaining = match fragment(input) {
            Ok((remaining, _)) => remaining,
            Err(_) => input,
        };
        if let Some(next) = remaining.strip_prefix(',') {
            let consumed = input.len() - remaining.len();
            fragments.push(input[..consumed].trim());
            input = next;
        } else {
            fragments.push(input.trim());
            break;
        }
    }
    fragments.retain(|f| !f.is_empty());
    fragments
}

fn unescape(quoted: &str) -> String {
    if !quoted.contains('\\') {
        return quoted.to_owned();
    }
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            c => out.push(c),
        }
    }
    out
}

fn attr_value(key: &str, raw: &str) -> AttrValue {
    if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
        return AttrValue::List(
            raw[1..raw.len() - 1]
                .split(',')
                .map(|item| item.trim().to_owned())
                .collect(),
        );
    }
    let text = if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        unescape(&raw[1..raw.len() - 1])
    } else {
        raw.trim_matches('"').to_owned()
    };
    if key == "Number" {
        if let Ok(n) = text.parse::<f64>() {
            if n.is_finite() {
                return AttrValue::Number(n);
            }
        }
    }
    AttrValue::Text(text)
}

/// Decodes the body of a structured header line, e.g.
/// `<ID=DB,Number=0,Type=Flag,Description="dbSNP membership, build 129">`.
///
/// Commas inside double quotes or square brackets do not separate fields,
/// bracketed values become lists, quoted values lose their quotes and a
/// numeric `Number` becomes [`AttrValue::Number`]. Later duplicates win.
/// Malformed input never fails; a fragment without `=` maps to
/// [`AttrValue::Missing`].
pub fn parse_meta_string(meta: &str) -> Attributes {
    let meta = meta.trim();
    let inside = meta.strip_prefix('<').unwrap_or(meta);
    let inside = inside.strip_suffix('>').unwrap_or(inside);
    let mut attributes = Attributes::new();
    for fragment in split_fragments(inside) {
        let (key, value) = match fragment.split_once('=') {
            Some((key, raw)) => (key.trim(), attr_value(key.trim(), raw.trim())),
            None => (fragment, AttrValue::Missing),
        };
        attributes.insert(key.to_owned(), value);
    }
    attributes
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_quoted_comma() {
        let meta = parse_meta_string(
            r#"<ID=DB,Number=0,Type=Flag,Description="dbSNP membership, build 129">"#,
        );
        assert_eq!(meta.len(), 4);
        assert_eq!(meta["ID"], AttrValue::Text("DB".into()));
        assert_eq!(meta["Number"], AttrValue::Number(0.0));
        assert_eq!(meta["Type"], AttrValue::Text("Flag".into()));
        assert_eq!(
            meta["Description"],
            AttrValue::Text("dbSNP membership, build 129".into())
        );
    }

    #[test]
    fn test_equals_in_description() {
        let meta = parse_meta_string(
            r#"<ID=AP,Number=2,Type=Float,Description="Allelic Probability, P(Allele=1|Haplotype)">"#,
        );
        assert_eq!(
            meta["Description"],
            AttrValue::Text("Allelic Probability, P(Allele=1|Haplotype)".into())
        );
        assert_eq!(meta["Number"], AttrValue::Number(2.0));
    }

    #[test]
    fn test_array_values() {
        let a = parse_meta_string("<ID=Assay,Type=String,Number=.,Values=[WholeGenome, Exome]>");
        let b = parse_meta_string("<Values=[WholeGenome, Exome],ID=Assay,Type=String,Number=.>");
        assert_eq!(
            a["Values"],
            AttrValue::List(vec!["WholeGenome".into(), "Exome".into()])
        );
        assert_eq!(a["Number"], AttrValue::Text(".".into()));
        assert_eq!(a["Number"].as_number(), None);
        assert_eq!(a["Values"].as_list().map(<[String]>::len), Some(2));
        for key in ["ID", "Type", "Number", "Values"] {
            assert_eq!(a[key], b[key]);
        }
    }

    #[test]
    fn test_duplicates_last_wins() {
        let meta = parse_meta_string("<ID=X,Type=String,Type=Integer>");
        assert_eq!(meta.len(), 2);
        assert_eq!(meta["Type"], AttrValue::Text("Integer".into()));
    }

    #[test]
    fn test_escaped_quote() {
        let meta = parse_meta_string(r#"<ID=X,Description="say \"hi\", then leave">"#);
        assert_eq!(
            meta["Description"],
            AttrValue::Text(r#"say "hi", then leave"#.into())
        );
    }

    #[test]
    fn test_malformed() {
        let meta = parse_meta_string("<ID=X,Flagish,Description=\"unterminated, still here>");
        assert_eq!(meta["ID"], AttrValue::Text("X".into()));
        assert_eq!(meta["Flagish"], AttrValue::Missing);
        assert_eq!(
            meta["Description"],
            AttrValue::Text("unterminated, still here".into())
        );
        assert!(parse_meta_string("<>").is_empty());
        assert!(parse_meta_string("").is_empty());
    }

    #[test]
    fn test_info_number() {
        assert_eq!(info_number("12").unwrap().1, InfoNumber::Count(12));
        assert_eq!(info_number("A").unwrap().1, InfoNumber::AlternateAlleles);
        assert_eq!(info_number("R").unwrap().1, InfoNumber::Alleles);
        assert_eq!(info_number("G").unwrap().1, InfoNumber::Genotypes);
        assert_eq!(info_number(".").unwrap().1, InfoNumber::Unknown);
        assert!(info_number("AB").is_err());
        assert!(info_number("x").is_err());
    }

    #[test]
    fn test_meta_line() {
        assert_eq!(
            meta_line("##fileformat=VCFv4.3").unwrap().1,
            ("fileformat", "VCFv4.3")
        );
        assert_eq!(
            meta_line("##INFO=<ID=DP,Description=\"a=b\">").unwrap().1,
            ("INFO", "<ID=DP,Description=\"a=b\">")
        );
        assert!(meta_line("##noequals").is_err());
        assert!(meta_line("##=value").is_err());
    }
}
