use indexmap::IndexMap;
use itertools::Itertools;

use crate::header::Header;
use crate::types::{InfoType, Value};

/// Decoded sub-fields of one sample, keyed by FORMAT key. `None` stands for
/// an empty or `.` sub-field; sub-fields missing at the end of a sample
/// column have no entry.
pub type SampleFields<'r> = IndexMap<&'r str, Option<Vec<Option<Value>>>>;

fn decode_field(raw: &str, kind: Option<InfoType>) -> Option<Vec<Option<Value>>> {
    if raw.is_empty() || raw == "." {
        return None;
    }
    Some(
        raw.split(',')
            .map(|item| match item {
                "." => None,
                item => Some(Value::coerce(item, kind)),
            })
            .collect(),
    )
}

/// Full decode of every sample column, coercing values by their FORMAT type.
pub(crate) fn decode_samples<'s, 'r>(
    header: &'s Header,
    format: &'r str,
    rest: &'r str,
) -> IndexMap<&'s str, SampleFields<'r>> {
    let keys = format.split(':').collect_vec();
    let kinds = keys.iter().map(|key| header.format_type(key)).collect_vec();
    let mut chunks = rest.split('\t');
    header
        .samples()
        .iter()
        .map(|sample| {
            let chunk = chunks.next().unwrap_or("");
            let fields = chunk
                .split(':')
                .zip(keys.iter().zip(&kinds))
                .map(|(raw, (&key, &kind))| (key, decode_field(raw, kind)))
                .collect();
            (sample.as_str(), fields)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::header::test::HEADER;

    #[test]
    fn test_decode_samples() {
        let header = Header::parse(HEADER).unwrap();
        let rest = "0|0:48:1:51,51\t1|0:48:8:51,51\t1/1:43:5:.,.";
        let samples = decode_samples(&header, "GT:GQ:DP:HQ", rest);
        assert_eq!(samples.len(), 3);

        let first = &samples["NA00001"];
        assert_eq!(first["GT"], Some(vec![Some(Value::String("0|0".into()))]));
        assert_eq!(first["GQ"], Some(vec![Some(Value::Integer(48))]));
        assert_eq!(
            first["HQ"],
            Some(vec![Some(Value::Integer(51)), Some(Value::Integer(51))])
        );
        assert_eq!(samples["NA00003"]["HQ"], Some(vec![None, None]));
    }

    #[test]
    fn test_missing_and_short() {
        let header = Header::parse(HEADER).unwrap();
        let samples = decode_samples(&header, "GT:GQ:DP", "./.:.:\t0/1");
        let first = &samples["NA00001"];
        assert_eq!(first["GT"], Some(vec![Some(Value::String("./.".into()))]));
        assert_eq!(first["GQ"], None);
        assert_eq!(first["DP"], None);

        let second = &samples["NA00002"];
        assert_eq!(second.len(), 1);
        assert!(!second.contains_key("GQ"));

        // no column at all for the third sample
        let third = &samples["NA00003"];
        assert_eq!(third.len(), 1);
        assert_eq!(third["GT"], None);
    }

    #[test]
    fn test_extra_sub_fields_ignored() {
        let header = Header::parse(HEADER).unwrap();
        let samples = decode_samples(&header, "GT", "0/1:99\t1/1\t0/0");
        assert_eq!(samples["NA00001"].len(), 1);
    }

    #[test]
    fn test_undeclared_key_stays_text() {
        let header = Header::parse(HEADER).unwrap();
        let samples = decode_samples(&header, "XX:GQ", "12:3.5\t.:x\t1:2");
        assert_eq!(
            samples["NA00001"]["XX"],
            Some(vec![Some(Value::String("12".into()))])
        );
        assert_eq!(samples["NA00001"]["GQ"], Some(vec![Some(Value::Float(3.5))]));
        assert_eq!(
            samples["NA00002"]["GQ"],
            Some(vec![Some(Value::String("x".into()))])
        );
    }
}
