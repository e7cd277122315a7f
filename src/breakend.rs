use std::fmt;

use strum::{AsRefStr, Display, EnumString};

use crate::error::BreakendError;

/// Side of a breakend that a sequence or mate is joined to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum Direction {
    Left,
    Right,
}

/// Structural-variant breakend decoded from one ALT allele.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "PascalCase")
)]
pub struct Breakend {
    pub replacement: String,
    pub join: Direction,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub mate_position: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub mate_direction: Option<Direction>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "is_false"))]
    pub single_breakend: bool,
}

#[cfg(feature = "serde")]
fn is_false(b: &bool) -> bool {
    !*b
}

impl fmt::Display for Breakend {
    /// Renders the bracketed (or single breakend) VCF notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.mate_position, self.mate_direction) {
            (Some(mate), Some(direction)) => {
                let bracket = match direction {
                    Direction::Right => '[',
                    Direction::Left => ']',
                };
                match self.join {
                    Direction::Right => {
                        write!(f, "{}{}{}{}", self.replacement, bracket, mate, bracket)
                    }
                    Direction::Left => {
                        write!(f, "{}{}{}{}", bracket, mate, bracket, self.replacement)
                    }
                }
            }
            _ => match self.join {
                Direction::Left => write!(f, ".{}", self.replacement),
                Direction::Right => write!(f, "{}.", self.replacement),
            },
        }
    }
}

/// One entry of the ALT column.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Allele {
    /// A sequence or symbolic allele, kept verbatim.
    Plain(String),
    Breakend(Breakend),
}

impl Allele {
    pub fn breakend(&self) -> Option<&Breakend> {
        match self {
            Allele::Breakend(b) => Some(b),
            Allele::Plain(_) => None,
        }
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Allele::Plain(s) => f.write_str(s),
            Allele::Breakend(b) => fmt::Display::fmt(b, f),
        }
    }
}

fn mate_pair(token: &str) -> Result<Breakend, BreakendError> {
    let mate_direction = if token.contains('[') {
        Direction::Right
    } else {
        Direction::Left
    };
    let mut join = None;
    let mut replacement: Option<&str> = None;
    let mut mate_position = None;
    for part in token.split(|c: char| c == '[' || c == ']').filter(|p| !p.is_empty()) {
        if part.contains(':') {
            mate_position = Some(part);
            join = Some(if replacement.is_some() {
                Direction::Right
            } else {
                Direction::Left
            });
        } else {
            replacement = Some(part);
        }
    }
    match (mate_position, join, replacement) {
        (Some(mate), Some(join), Some(replacement)) => Ok(Breakend {
            replacement: replacement.to_owned(),
            join,
            mate_position: Some(mate.to_owned()),
            mate_direction: Some(mate_direction),
            single_breakend: false,
        }),
        _ => Err(BreakendError::Invalid(token.to_owned())),
    }
}

fn single(replacement: &str, join: Direction) -> Breakend {
    Breakend {
        replacement: replacement.to_owned(),
        join,
        mate_position: None,
        mate_direction: None,
        single_breakend: true,
    }
}

fn contig_insertion(replacement: &str, contig: &str, join: Direction) -> Option<Breakend> {
    if replacement.is_empty() {
        return None;
    }
    Some(Breakend {
        replacement: replacement.to_owned(),
        join,
        mate_position: Some(format!("<{}>:1", contig)),
        mate_direction: Some(Direction::Right),
        single_breakend: false,
    })
}

/// Decodes one ALT allele written in breakend notation.
///
/// Returns `Ok(None)` for alleles that are not breakends, including plain
/// symbolic alleles like `<DEL>`.
///
/// ```
/// use rust_vcf::breakend::{parse_breakend, Direction};
///
/// let bnd = parse_breakend("G]17:198982]").unwrap().unwrap();
/// assert_eq!(bnd.replacement, "G");
/// assert_eq!(bnd.join, Direction::Right);
/// assert_eq!(bnd.mate_position.as_deref(), Some("17:198982"));
/// assert_eq!(bnd.mate_direction, Some(Direction::Left));
/// ```
pub fn parse_breakend(token: &str) -> Result<Option<Breakend>, BreakendError> {
    let (first, last) = match (token.chars().next(), token.chars().last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(None),
    };

    if matches!(first, '[' | ']') || matches!(last, '[' | ']') {
        return mate_pair(token).map(Some);
    }
    if first == '.' {
        return Ok(Some(single(&token[1..], Direction::Left)));
    }
    if last == '.' {
        return Ok(Some(single(&token[..token.len() - 1], Direction::Right)));
    }
    if first == '<' {
        // <ctg>seq
        let close = token
            .rfind('>')
            .ok_or_else(|| BreakendError::Unparseable(token.to_owned()))?;
        return Ok(contig_insertion(&token[close + 1..], &token[1..close], Direction::Left));
    }
    if token.contains('<') {
        // seq<ctg>
        let close = token
            .rfind('>')
            .ok_or_else(|| BreakendError::Unparseable(token.to_owned()))?;
        let open = token[..close]
            .rfind('<')
            .ok_or_else(|| BreakendError::Unparseable(token.to_owned()))?;
        return Ok(contig_insertion(&token[..open], &token[open + 1..close], Direction::Right));
    }
    Ok(None)
}
