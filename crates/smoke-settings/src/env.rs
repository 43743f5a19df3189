//! Environment variable layer.

use crate::KEY_DELIMITER;

/// Nesting delimiter accepted in environment variable names (`db__userId`).
pub const ENV_NESTING_DELIMITER: &str = "__";

/// Convert raw environment pairs into settings entries.
///
/// When a prefix is given, only variables starting with it (case-insensitive)
/// are kept and the prefix is stripped from the key.
pub(crate) fn collect<I>(vars: I, prefix: Option<&str>) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| {
            let name = match prefix {
                Some(p) => strip_prefix_ignore_case(&name, p)?,
                None => name.as_str(),
            };
            if name.is_empty() {
                return None;
            }
            Some((name.replace(ENV_NESTING_DELIMITER, KEY_DELIMITER), value))
        })
        .collect()
}

fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&name[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_nesting_delimiter_mapped() {
        let entries = collect(vars(&[("db__primaryServer", "sql-b")]), None);
        assert_eq!(
            entries,
            vec![("db:primaryServer".to_string(), "sql-b".to_string())]
        );
    }

    #[test]
    fn test_prefix_filters_and_strips() {
        let entries = collect(
            vars(&[
                ("DBTEST_iLoops", "5"),
                ("dbtest_db__userId", "sa"),
                ("PATH", "/usr/bin"),
                ("DBTEST_", "ignored"),
            ]),
            Some("DBTEST_"),
        );

        assert_eq!(
            entries,
            vec![
                ("iLoops".to_string(), "5".to_string()),
                ("db:userId".to_string(), "sa".to_string()),
            ]
        );
    }

    #[test]
    fn test_prefix_longer_than_name() {
        assert!(collect(vars(&[("DB", "x")]), Some("DBTEST_")).is_empty());
    }
}
