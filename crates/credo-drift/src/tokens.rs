//! Tokenization, token-set overlap and edit alignment

use credo_domain::EditDistribution;
use std::collections::HashSet;

/// Lowercase a text and split it on whitespace
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|t| t.to_lowercase()).collect()
}

/// Jaccard similarity of two token sequences' sets
///
/// Two empty texts are identical (1.0).
pub fn jaccard_similarity(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 1.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}

/// Operation counts of a minimum-cost token alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditCounts {
    /// Tokens inserted
    pub insert: usize,
    /// Tokens deleted
    pub delete: usize,
    /// Tokens substituted
    pub substitute: usize,
    /// Tokens kept
    pub unchanged: usize,
}

impl EditCounts {
    /// Total number of operations
    pub fn total(&self) -> usize {
        self.insert + self.delete + self.substitute + self.unchanged
    }

    /// Levenshtein distance (operations other than unchanged)
    pub fn distance(&self) -> usize {
        self.insert + self.delete + self.substitute
    }

    /// Normalize the counts into a distribution
    pub fn distribution(&self) -> EditDistribution {
        let total = self.total();
        if total == 0 {
            return EditDistribution::default();
        }
        let n = total as f64;
        EditDistribution {
            insert: self.insert as f64 / n,
            delete: self.delete as f64 / n,
            substitute: self.substitute as f64 / n,
            unchanged: self.unchanged as f64 / n,
        }
    }
}

/// Align `from` to `to` with unit-cost Levenshtein and count operations
///
/// On equal-cost paths the backtrace prefers the diagonal (keep or
/// substitute), then deletion, then insertion, so the counts are
/// deterministic.
pub fn edit_counts(from: &[String], to: &[String]) -> EditCounts {
    let (n, m) = (from.len(), to.len());
    let width = m + 1;
    let mut dist = vec![0usize; (n + 1) * width];
    for i in 0..=n {
        dist[i * width] = i;
    }
    for j in 0..=m {
        dist[j] = j;
    }
    for i in 1..=n {
        for j in 1..=m {
            let diag = dist[(i - 1) * width + j - 1] + usize::from(from[i - 1] != to[j - 1]);
            let del = dist[(i - 1) * width + j] + 1;
            let ins = dist[i * width + j - 1] + 1;
            dist[i * width + j] = diag.min(del).min(ins);
        }
    }

    let mut counts = EditCounts::default();
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        let here = dist[i * width + j];
        if i > 0 && j > 0 {
            let same = from[i - 1] == to[j - 1];
            if here == dist[(i - 1) * width + j - 1] + usize::from(!same) {
                if same {
                    counts.unchanged += 1;
                } else {
                    counts.substitute += 1;
                }
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && here == dist[(i - 1) * width + j] + 1 {
            counts.delete += 1;
            i -= 1;
        } else {
            counts.insert += 1;
            j -= 1;
        }
    }
    counts
}

/// Normalized edit-operation distribution from `from` to `to`
pub fn edit_distribution(from: &[String], to: &[String]) -> EditDistribution {
    edit_counts(from, to).distribution()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        tokenize(s)
    }

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        assert_eq!(toks("  The  Bridge\tCLOSED\n"), vec!["the", "bridge", "closed"]);
        assert!(toks("   ").is_empty());
    }

    #[test]
    fn test_jaccard() {
        assert_eq!(jaccard_similarity(&toks(""), &toks("")), 1.0);
        assert_eq!(jaccard_similarity(&toks("a b"), &toks("")), 0.0);
        assert_eq!(jaccard_similarity(&toks("a b c"), &toks("C B A")), 1.0);
        assert!((jaccard_similarity(&toks("a b c"), &toks("a b d")) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_identical_texts_all_unchanged() {
        let c = edit_counts(&toks("one two three"), &toks("one two three"));
        assert_eq!(c.unchanged, 3);
        assert_eq!(c.distance(), 0);
        assert_eq!(c.distribution().entropy(), 0.0);
    }

    #[test]
    fn test_single_substitution() {
        let c = edit_counts(&toks("the mayor resigned"), &toks("the governor resigned"));
        assert_eq!(
            c,
            EditCounts {
                substitute: 1,
                unchanged: 2,
                ..Default::default()
            }
        );
        let h = c.distribution().entropy();
        let third = 1.0 / 3.0f64;
        let expected = -third * third.log2() - (2.0 * third) * (2.0 * third).log2();
        assert!((h - expected).abs() < 1e-12);
    }

    #[test]
    fn test_insert_and_delete() {
        let c = edit_counts(&toks("a b"), &toks("a b c d"));
        assert_eq!(c.insert, 2);
        assert_eq!(c.unchanged, 2);

        let c = edit_counts(&toks("a b c"), &toks("b"));
        assert_eq!(c.delete, 2);
        assert_eq!(c.unchanged, 1);

        let c = edit_counts(&toks(""), &toks("x y"));
        assert_eq!(c.insert, 2);
        assert_eq!(c.total(), 2);
    }

    #[test]
    fn test_empty_to_empty() {
        let d = edit_distribution(&[], &[]);
        assert_eq!(d, EditDistribution::default());
        assert_eq!(d.entropy(), 0.0);
    }
}
