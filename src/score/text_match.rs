use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static ARTICLES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(a|an|the)\b").expect("article pattern"));

/// Lower-case, strip ASCII punctuation and English articles, collapse
/// whitespace.
pub fn normalize_answer(text: &str) -> String {
    let lowered = text.to_lowercase();
    let no_punct: String = lowered.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    let no_articles = ARTICLES.replace_all(&no_punct, " ");
    no_articles.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn tokens(text: &str) -> Vec<String> {
    normalize_answer(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// 1.0 when the texts are identical up to surrounding whitespace.
pub fn exact_match(predicted: &str, gold: &str) -> f64 {
    if predicted.trim() == gold.trim() {
        1.0
    } else {
        0.0
    }
}

/// Token-level F1 between two texts (bag-of-tokens overlap).
///
/// If either side has no tokens the result is 1.0 when both are empty and
/// 0.0 otherwise.
pub fn text_f1(predicted: &str, gold: &str) -> f64 {
    let pred_tokens = tokens(predicted);
    let gold_tokens = tokens(gold);

    if pred_tokens.is_empty() || gold_tokens.is_empty() {
        return if pred_tokens == gold_tokens { 1.0 } else { 0.0 };
    }

    let mut gold_counts: HashMap<&str, usize> = HashMap::new();
    for token in &gold_tokens {
        *gold_counts.entry(token.as_str()).or_default() += 1;
    }

    let mut common = 0usize;
    for token in &pred_tokens {
        if let Some(count) = gold_counts.get_mut(token.as_str()) {
            if *count > 0 {
                *count -= 1;
                common += 1;
            }
        }
    }

    if common == 0 {
        return 0.0;
    }

    let precision = common as f64 / pred_tokens.len() as f64;
    let recall = common as f64 / gold_tokens.len() as f64;
    2.0 * precision * recall / (precision + recall)
}
