// Fixed-width curve mnemonics

use regex::Regex;

/// LAS curve mnemonics are conventionally at most 8 characters.
pub const MNEMONIC_SIZE: usize = 8;

/// Shorten one name: uppercase, then delete up to the excess number of
/// droppable characters, then truncate.
fn shorten(name: &str, size: usize, drop: &Regex) -> String {
    let upper = name.to_uppercase();
    let extra = upper.chars().count().saturating_sub(size);
    if extra == 0 {
        return upper;
    }
    drop.replacen(&upper, extra, "").chars().take(size).collect()
}

/// 1-based suffixes distinguishing `count` occurrences, zero-padded to a
/// uniform width. A unique name gets the empty suffix.
fn suffixes(count: usize) -> Vec<String> {
    if count == 1 {
        return vec![String::new()];
    }
    let width = count.to_string().len();
    (1..=count).map(|n| format!("{n:0width$}")).collect()
}

/// Shorten a list of column names to mnemonics, disambiguating collisions
/// with numeric suffixes in input order.
pub fn mnemonics(columns: &[String]) -> Vec<String> {
    // Vowels and whitespace go first when a name is over budget.
    let drop = Regex::new(r"[AEIOUY \r\t\n]").unwrap();
    mnemonics_with(columns, MNEMONIC_SIZE, &drop)
}

pub fn mnemonics_with(columns: &[String], size: usize, drop: &Regex) -> Vec<String> {
    let shorts: Vec<String> = columns.iter().map(|c| shorten(c, size, drop)).collect();
    shorts
        .iter()
        .enumerate()
        .map(|(idx, short)| {
            let total = shorts.iter().filter(|s| *s == short).count();
            let seen = shorts[..idx].iter().filter(|s| *s == short).count();
            format!("{short}{}", suffixes(total)[seen])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn duplicated_prefixes_get_suffixes() {
        let result = mnemonics(&strings(&[
            "Some prefixes are duplicated",
            "Some prefixes are the same",
            "Some are different",
            "Some vowels",
            "Removed",
        ]));
        assert_eq!(
            result,
            vec!["SMPRFXSR1", "SMPRFXSR2", "SMRDFFRN", "SMVOWELS", "REMOVED"]
        );
    }

    #[test]
    fn short_names_pass_through_uppercased() {
        assert_eq!(mnemonics(&strings(&["Depth", "Quartz"])), vec!["DEPTH", "QUARTZ"]);
    }

    #[test]
    fn only_the_excess_is_dropped() {
        // Nine characters, one over budget: a single vowel goes.
        assert_eq!(mnemonics(&strings(&["Anorthite"])), vec!["NORTHITE"]);
    }

    #[test]
    fn many_duplicates_are_zero_padded() {
        let names = strings(&["Quartz"; 10]);
        let result = mnemonics(&names);
        assert_eq!(result[0], "QUARTZ01");
        assert_eq!(result[9], "QUARTZ10");
    }
}
