// Ratcliff/Obershelp similarity: twice the number of characters in the
// recursively found longest common blocks, over the total length.

/// Similarity of two names in `[0.0, 1.0]`. Case-sensitive, pure.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (start_a, start_b, len) = longest_match(a, b);
    if len == 0 {
        return 0;
    }

    len + matching_chars(&a[..start_a], &b[..start_b])
        + matching_chars(&a[start_a + len..], &b[start_b + len..])
}

/// Longest common block; the earliest start in `a` wins, then the earliest in `b`.
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // run[j + 1] = length of the common block ending at a[i], b[j]
    let mut run = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        let mut next = vec![0usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let len = run[j] + 1;
                next[j + 1] = len;
                let start_a = i + 1 - len;
                let start_b = j + 1 - len;
                if len > best.2 || (len == best.2 && (start_a, start_b) < (best.0, best.1)) {
                    best = (start_a, start_b, len);
                }
            }
        }
        run = next;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identical_strings_score_one() {
        assert!(close(similarity("beta.mp3", "beta.mp3"), 1.0));
        assert!(close(similarity("", ""), 1.0));
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert!(close(similarity("abc", "xyz"), 0.0));
        assert!(close(similarity("abc", ""), 0.0));
    }

    #[test]
    fn counts_blocks_on_both_sides_of_the_longest_match() {
        // "b" + "ta" match: 2 * 3 / (8 + 3)
        assert!(close(similarity("beta.mp3", "bta"), 6.0 / 11.0));
        // a, b and c each match on their own
        assert!(close(similarity("abc", "axbxc"), 6.0 / 8.0));
    }

    #[test]
    fn is_symmetric_for_simple_inputs() {
        assert!(close(similarity("gamma", "amma"), similarity("amma", "gamma")));
    }

    #[test]
    fn case_matters() {
        assert!(similarity("Beta", "beta") < 1.0);
    }

    #[test]
    fn closer_name_scores_higher() {
        let pattern = "bta";
        let beta = similarity("beta.mp3", pattern);
        assert!(beta > similarity("alpha.mp3", pattern));
        assert!(beta > similarity("gamma.mp3", pattern));
    }
}
