use anyhow::{Context, Result, bail};
use serde::Serialize;

use barkeep_core::models::RecipeMultipliers;

/// Parse repeated `--times RECIPE=N` specs into multipliers. The key is a
/// recipe id, or the literal `other` for loose lines.
pub(crate) fn parse_times(specs: &[String]) -> Result<RecipeMultipliers> {
    let mut multipliers = RecipeMultipliers::new();
    for spec in specs {
        let Some((key, times)) = spec.split_once('=') else {
            bail!("Invalid --times '{spec}'. Use RECIPE_ID=N (e.g. '7=2' or 'other=3')");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid --times '{spec}'. Use RECIPE_ID=N (e.g. '7=2' or 'other=3')");
        }
        let times: u32 = times
            .trim()
            .parse()
            .with_context(|| format!("Invalid multiplier in '{spec}'"))?;
        multipliers.set(key, times)?;
    }
    Ok(multipliers)
}

/// Format a quantity without trailing noise: whole numbers drop the
/// fraction, everything else keeps it.
pub(crate) fn format_quantity(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_times_by_id_and_other() {
        let m = parse_times(&["7=2".to_string(), "other=3".to_string()]).unwrap();
        assert_eq!(m.get("7"), 2);
        assert_eq!(m.get("other"), 3);
        assert_eq!(m.get("9"), 1);
    }

    #[test]
    fn test_parse_times_trims_whitespace() {
        let m = parse_times(&[" 7 = 2 ".to_string()]).unwrap();
        assert_eq!(m.get("7"), 2);
    }

    #[test]
    fn test_parse_times_rejects_malformed() {
        assert!(parse_times(&["7".to_string()]).is_err());
        assert!(parse_times(&["=2".to_string()]).is_err());
        assert!(parse_times(&["7=two".to_string()]).is_err());
        assert!(parse_times(&["7=0".to_string()]).is_err());
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(5.0), "5");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(format_quantity(0.0), "0");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_utf8() {
        // Should not panic on multi-byte characters
        assert_eq!(truncate("Crème de cassis", 10), "Crème d...");
        assert_eq!(truncate("Añejo", 10), "Añejo");
    }
}
