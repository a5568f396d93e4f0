//! Human-readable rendering of classifier state and results

use std::fmt::Write;

use colored::Colorize;

use wordbayes_core::{DocumentClassification, NaiveBayesClassifier};

/// Render ranked categories. `top == 0` shows all of them.
pub fn format_classification(result: &DocumentClassification, top: usize, explain: bool) -> String {
    let mut out = String::new();
    let limit = if top == 0 {
        result.categories.len()
    } else {
        top.min(result.categories.len())
    };

    let width = result.categories[..limit]
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0);

    for (rank, category) in result.categories[..limit].iter().enumerate() {
        let name = format!("{:width$}", category.name, width = width);
        let name = if rank == 0 {
            name.green().bold()
        } else {
            name.normal()
        };
        let _ = writeln!(
            out,
            "{:>3}. {}  {:>14}  ({} docs)",
            rank + 1,
            name,
            format_score(category.probability),
            category.documents_count
        );

        if explain {
            for (token, log_p) in &category.tokens_probability {
                let count = result.tokens_frequency.get(token).copied().unwrap_or(0);
                let _ = writeln!(
                    out,
                    "       {} x{}  {}",
                    token.cyan(),
                    count,
                    format_score(*log_p).dimmed()
                );
            }
        }
    }

    if limit < result.categories.len() {
        let _ = writeln!(
            out,
            "     {}",
            format!("... {} more", result.categories.len() - limit).dimmed()
        );
    }

    out
}

/// Render per-category counts and model totals.
pub fn format_stats(classifier: &NaiveBayesClassifier) -> String {
    let mut out = String::new();

    let width = classifier
        .categories()
        .iter()
        .map(|c| c.name().len())
        .max()
        .unwrap_or(0)
        .max("category".len());

    let _ = writeln!(
        out,
        "{:width$}  {:>9}  {:>11}  {:>8}",
        "category".bold(),
        "documents".bold(),
        "total words".bold(),
        "distinct".bold(),
        width = width
    );

    for category in classifier.categories() {
        let _ = writeln!(
            out,
            "{:width$}  {:>9}  {:>11}  {:>8}",
            category.name().cyan(),
            category.documents_count(),
            category.total_words_frequency(),
            category.words_frequency().len(),
            width = width
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} {}   {} {}",
        "Documents:".bold(),
        classifier.total_documents(),
        "Vocabulary:".bold(),
        classifier.vocabulary().len()
    );

    out
}

fn format_score(score: f64) -> String {
    if score.is_nan() {
        "NaN".to_string()
    } else if score == f64::INFINITY {
        "+inf".to_string()
    } else if score == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:.4}", score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn trained() -> NaiveBayesClassifier {
        let mut classifier = NaiveBayesClassifier::new();
        classifier.learn("buy cheap pills", "spam").await.unwrap();
        classifier.learn("let's have lunch", "ham").await.unwrap();
        classifier
    }

    #[tokio::test]
    async fn test_format_classification_ranks() {
        colored::control::set_override(false);
        let classifier = trained().await;
        let result = classifier.classify("buy pills").await.unwrap();

        let text = format_classification(&result, 0, false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("1. spam"));
        assert!(lines[1].contains("2. ham"));
    }

    #[tokio::test]
    async fn test_format_classification_top_and_explain() {
        colored::control::set_override(false);
        let classifier = trained().await;
        let result = classifier.classify("buy pills").await.unwrap();

        let text = format_classification(&result, 1, true);

        assert!(text.contains("spam"));
        assert!(text.contains("buy x1"));
        assert!(text.contains("... 1 more"));
        assert!(!text.contains("2. ham"));
    }

    #[tokio::test]
    async fn test_format_stats() {
        colored::control::set_override(false);
        let classifier = trained().await;

        let text = format_stats(&classifier);

        assert!(text.contains("spam"));
        assert!(text.contains("Documents: 2"));
        assert!(text.contains("Vocabulary: 7"));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(-1.23456), "-1.2346");
        assert_eq!(format_score(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_score(f64::INFINITY), "+inf");
        assert_eq!(format_score(f64::NAN), "NaN");
    }
}
