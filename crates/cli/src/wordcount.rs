// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The built-in word-count Map/Reduce used by the `mapreduce` binary (§8
//! scenarios S1–S6). User-supplied Map/Reduce bodies are out of scope for
//! the engine itself, which takes them as plain closures; this is the one
//! concrete pair the CLI ships so the binary is runnable end to end.

pub fn map(_file: &str, content: &str) -> Vec<(String, String)> {
    content.split_whitespace().map(|word| (word.to_string(), "1".to_string())).collect()
}

pub fn reduce(_key: &str, values: &[String]) -> String {
    values.len().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_occurrence_of_a_word_as_one() {
        let pairs = map("a.txt", "the cat sat");
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|(_, v)| v == "1"));
    }

    #[test]
    fn reduce_sums_the_per_occurrence_ones() {
        let ones = vec!["1".to_string(), "1".to_string(), "1".to_string()];
        assert_eq!(reduce("the", &ones), "3");
    }
}
