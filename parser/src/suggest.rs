//! Typo suggestions for unknown options and subcommand names.

use strsim::levenshtein;

/// Closest candidate within the acceptance threshold, if any.
///
/// The threshold scales with the input: `max(len/2, 2)` edits. Ties keep
/// the earliest candidate, so callers pass candidates in registration
/// order.
pub(crate) fn closest<'a, I>(input: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let threshold = (input.len() / 2).max(2);
    let mut best: Option<(usize, &str)> = None;

    for candidate in candidates {
        let distance = levenshtein(input, candidate);
        if distance > threshold {
            continue;
        }
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, candidate)),
        }
    }

    best.map(|(_, name)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transposed_option_is_suggested() {
        // distance 2, threshold max(6/2, 2) = 3
        let found = closest("outptu", ["verbose", "output"]);
        assert_eq!(found.as_deref(), Some("output"));
    }

    #[test]
    fn test_distance_beyond_threshold_yields_nothing() {
        assert_eq!(closest("zzz", ["verbose", "output"]), None);
    }

    #[test]
    fn test_short_inputs_keep_minimum_threshold_of_two() {
        // len 2 would give threshold 1 without the floor of 2.
        assert_eq!(closest("vv", ["v"]).as_deref(), Some("v"));
    }

    #[test]
    fn test_ties_keep_registration_order() {
        // "fila" is distance 1 from both "file" and "fill".
        assert_eq!(closest("fila", ["fill", "file"]).as_deref(), Some("fill"));
        assert_eq!(closest("fila", ["file", "fill"]).as_deref(), Some("file"));
    }

    #[test]
    fn test_exact_match_wins() {
        assert_eq!(closest("out", ["put", "out"]).as_deref(), Some("out"));
    }
}
