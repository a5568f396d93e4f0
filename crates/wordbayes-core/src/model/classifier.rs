//! Naive Bayes Classifier
//!
//! カテゴリ集合・共有語彙・トークナイザを所有し、学習と分類を行う。

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Result, WordBayesError};
use crate::tokenizer::{DefaultTokenizer, Tokenizer};

use super::category::Category;
use super::snapshot::ClassifierData;
use super::vocabulary::Vocabulary;

/// 分類器と全カテゴリで共有する状態
pub(crate) struct ClassifierState {
    pub(crate) vocabulary: Vocabulary,
    pub(crate) tokenizer: Arc<dyn Tokenizer>,
}

impl ClassifierState {
    pub(crate) fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            vocabulary: Vocabulary::new(),
            tokenizer,
        }
    }
}

/// `learn`に渡すラベル（1つ以上）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels(Vec<String>);

impl Labels {
    /// 重複を除いたラベル列（最初の出現順）
    fn into_unique(self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.0
            .into_iter()
            .filter(|label| seen.insert(label.clone()))
            .collect()
    }
}

impl From<&str> for Labels {
    fn from(label: &str) -> Self {
        Labels(vec![label.to_string()])
    }
}

impl From<String> for Labels {
    fn from(label: String) -> Self {
        Labels(vec![label])
    }
}

impl From<&String> for Labels {
    fn from(label: &String) -> Self {
        Labels(vec![label.clone()])
    }
}

impl From<Vec<String>> for Labels {
    fn from(labels: Vec<String>) -> Self {
        Labels(labels)
    }
}

impl From<&[String]> for Labels {
    fn from(labels: &[String]) -> Self {
        Labels(labels.to_vec())
    }
}

impl From<Vec<&str>> for Labels {
    fn from(labels: Vec<&str>) -> Self {
        Labels(labels.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Labels {
    fn from(labels: &[&str]) -> Self {
        Labels(labels.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Labels {
    fn from(labels: [&str; N]) -> Self {
        Labels(labels.iter().map(|s| s.to_string()).collect())
    }
}

/// カテゴリ1件分の分類結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryClassification {
    /// カテゴリ名
    pub name: String,
    /// 分類時点の学習文書数
    pub documents_count: u64,
    /// 対数事前確率 + 対数尤度（大きいほど有力）
    pub probability: f64,
    /// トークンごとの対数確率（説明用）
    pub tokens_probability: BTreeMap<String, f64>,
}

/// 文書全体の分類結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentClassification {
    /// スコア降順のカテゴリ
    pub categories: Vec<CategoryClassification>,
    /// 文書内のトークン出現回数
    pub tokens_frequency: BTreeMap<String, u64>,
}

impl DocumentClassification {
    /// 最有力カテゴリ
    pub fn top(&self) -> Option<&CategoryClassification> {
        self.categories.first()
    }

    /// 名前でカテゴリの結果を取得
    pub fn get(&self, name: &str) -> Option<&CategoryClassification> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// 順位順のカテゴリ名
    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}

/// 多項ナイーブベイズ分類器
pub struct NaiveBayesClassifier {
    /// 挿入順のカテゴリ
    categories: Vec<Category>,
    index: HashMap<String, usize>,
    state: Arc<ClassifierState>,
}

impl fmt::Debug for NaiveBayesClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NaiveBayesClassifier")
            .field("categories", &self.categories)
            .field("vocabulary", &self.state.vocabulary.len())
            .finish()
    }
}

impl Default for NaiveBayesClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NaiveBayesClassifier {
    /// デフォルトトークナイザで空の分類器を作成
    pub fn new() -> Self {
        Self::with_tokenizer(DefaultTokenizer::new())
    }

    pub fn with_tokenizer<T: Tokenizer + 'static>(tokenizer: T) -> Self {
        Self::with_shared_tokenizer(Arc::new(tokenizer))
    }

    pub fn with_shared_tokenizer(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            categories: Vec::new(),
            index: HashMap::new(),
            state: Arc::new(ClassifierState::new(tokenizer)),
        }
    }

    /// スナップショットから復元（トークナイザは呼び出し側が再指定）
    pub fn from_data(data: ClassifierData, tokenizer: Arc<dyn Tokenizer>) -> Self {
        let mut classifier = Self::with_shared_tokenizer(tokenizer);

        for word in data.vocabulary {
            classifier.state.vocabulary.insert(word);
        }

        for category_data in data.categories {
            let name = category_data.name.clone();
            let category = Category::from_data(category_data, Arc::clone(&classifier.state));
            match classifier.index.get(&name) {
                // duplicate names in a snapshot: last one wins, position of the first kept
                Some(&idx) => classifier.categories[idx] = category,
                None => {
                    classifier.index.insert(name, classifier.categories.len());
                    classifier.categories.push(category);
                }
            }
        }

        debug!(
            categories = classifier.categories.len(),
            vocabulary = classifier.state.vocabulary.len(),
            "classifier restored from snapshot"
        );

        classifier
    }

    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.state.tokenizer
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.state.vocabulary
    }

    /// 挿入順の全カテゴリ
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.index.get(name).map(|&idx| &self.categories[idx])
    }

    /// 全カテゴリの文書数合計
    pub fn total_documents(&self) -> u64 {
        self.categories.iter().map(|c| c.documents_count()).sum()
    }

    /// 語彙に追加（既存なら何もしない）
    pub fn add_word_to_vocabulary(&mut self, word: &str) -> &mut Self {
        self.state.vocabulary.insert(word);
        self
    }

    /// 名前でカテゴリを取得し、無ければ空のカテゴリを作成・登録して返す
    ///
    /// 未知のラベルはエラーにならず新規カテゴリになる。
    /// ラベル集合を固定したい場合は呼び出し側で検証すること。
    pub fn resolve_category(&mut self, name: &str) -> &mut Category {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.categories.len();
                self.categories
                    .push(Category::new(name, Arc::clone(&self.state)));
                self.index.insert(name.to_string(), idx);
                debug!(category = name, "category created");
                idx
            }
        };
        &mut self.categories[idx]
    }

    /// 文書を1件学習
    ///
    /// トークナイズは1回だけ行い、同じトークン列を指定された全カテゴリに渡す。
    /// 複数ラベルの文書は各カテゴリで文書数1として数える。
    /// 同じラベルの重複は1つにまとめる（`["x", "x"]`でも`x`の文書数は1だけ増える）。
    /// トークナイザが失敗した場合、分類器は変更されない。
    pub async fn learn(&mut self, document: &str, labels: impl Into<Labels>) -> Result<&mut Self> {
        let labels = labels.into().into_unique();
        let tokens = self
            .state
            .tokenizer
            .tokenize(document)
            .await
            .map_err(WordBayesError::Tokenizer)?;

        if labels.is_empty() {
            warn!("learn called without labels; document ignored");
            return Ok(self);
        }

        for label in &labels {
            self.resolve_category(label).add_tokens(&tokens);
        }

        debug!(
            labels = ?labels,
            tokens = tokens.len(),
            vocabulary = self.state.vocabulary.len(),
            "document learned"
        );

        Ok(self)
    }

    /// 複数文書を順に学習
    pub async fn learn_all<I, D, L>(&mut self, documents: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (D, L)>,
        D: AsRef<str>,
        L: Into<Labels>,
    {
        for (document, labels) in documents {
            self.learn(document.as_ref(), labels).await?;
        }
        Ok(self)
    }

    /// 文書を分類
    ///
    /// 各カテゴリについて
    /// `ln(documents_count / total_documents) + Σ freq * ln(token_probability)`
    /// を計算し、スコア降順に並べる（同点は挿入順）。
    ///
    /// 学習文書が0件、または語彙が空（トークンのない文書のみ学習）の場合は
    /// `UntrainedClassifier`エラー。
    pub async fn classify(&self, document: &str) -> Result<DocumentClassification> {
        let tokens = self
            .state
            .tokenizer
            .tokenize(document)
            .await
            .map_err(WordBayesError::Tokenizer)?;

        let frequency_table = Self::tokens_frequency(&tokens);
        let total_documents = self.total_documents();
        // token-less documents only: every smoothing denominator would be 0
        if total_documents == 0 || self.state.vocabulary.is_empty() {
            return Err(WordBayesError::UntrainedClassifier);
        }

        let mut categories: Vec<CategoryClassification> = self
            .categories
            .iter()
            .map(|category| {
                let mut probability =
                    (category.documents_count() as f64 / total_documents as f64).ln();
                let mut tokens_probability = BTreeMap::new();

                for (token, &token_frequency) in &frequency_table {
                    let token_probability = category.token_probability(token).ln();
                    tokens_probability.insert(token.clone(), token_probability);
                    probability += token_frequency as f64 * token_probability;
                }

                CategoryClassification {
                    name: category.name().to_string(),
                    documents_count: category.documents_count(),
                    probability,
                    tokens_probability,
                }
            })
            .collect();

        categories.sort_by(|a, b| b.probability.total_cmp(&a.probability));

        debug!(
            tokens = tokens.len(),
            top = categories.first().map(|c| c.name.as_str()).unwrap_or(""),
            "document classified"
        );

        Ok(DocumentClassification {
            categories,
            tokens_frequency: frequency_table,
        })
    }

    /// トークン列の出現回数テーブル
    pub fn tokens_frequency<S: AsRef<str>>(tokens: &[S]) -> BTreeMap<String, u64> {
        let mut table = BTreeMap::new();
        for token in tokens {
            *table.entry(token.as_ref().to_string()).or_insert(0) += 1;
        }
        table
    }

    pub fn to_data(&self) -> ClassifierData {
        ClassifierData {
            vocabulary: self.state.vocabulary.words(),
            categories: self.categories.iter().map(Category::to_data).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::snapshot::CategoryData;
    use crate::tokenizer;

    async fn spam_ham() -> NaiveBayesClassifier {
        let mut classifier = NaiveBayesClassifier::new();
        classifier.learn("buy cheap pills", "spam").await.unwrap();
        classifier.learn("let's have lunch", "ham").await.unwrap();
        classifier
    }

    #[tokio::test]
    async fn test_spam_ranked_first() {
        let classifier = spam_ham().await;

        let result = classifier.classify("buy pills").await.unwrap();

        assert_eq!(result.names(), vec!["spam", "ham"]);
        let spam = result.get("spam").unwrap();
        let ham = result.get("ham").unwrap();
        assert!(spam.probability > ham.probability);
        assert_eq!(result.tokens_frequency.get("buy"), Some(&1));
    }

    #[tokio::test]
    async fn test_classify_score_formula() {
        let classifier = spam_ham().await;

        let result = classifier.classify("buy buy lunch").await.unwrap();
        let spam = result.get("spam").unwrap();

        // spam: 3 words, vocabulary 7 (buy cheap pills let s have lunch)
        let p_buy = (2.0_f64 / 10.0).ln();
        let p_lunch = (1.0_f64 / 10.0).ln();
        let expected = (0.5_f64).ln() + 2.0 * p_buy + p_lunch;

        assert!((spam.probability - expected).abs() < 1e-9);
        assert!((spam.tokens_probability["buy"] - p_buy).abs() < 1e-12);
        assert!((spam.tokens_probability["lunch"] - p_lunch).abs() < 1e-12);
        assert_eq!(result.tokens_frequency["buy"], 2);
    }

    #[tokio::test]
    async fn test_multi_label_counts_whole_document() {
        let mut classifier = NaiveBayesClassifier::new();

        classifier.learn("a b", ["x", "y"]).await.unwrap();

        assert_eq!(classifier.category("x").unwrap().documents_count(), 1);
        assert_eq!(classifier.category("y").unwrap().documents_count(), 1);
        assert_eq!(classifier.category("x").unwrap().frequency("a"), 1);
        assert_eq!(classifier.category("y").unwrap().frequency("b"), 1);
        assert_eq!(classifier.total_documents(), 2);
        assert_eq!(classifier.vocabulary().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_labels_count_once() {
        let mut classifier = NaiveBayesClassifier::new();

        classifier
            .learn("a", vec!["x".to_string(), "x".to_string()])
            .await
            .unwrap();

        assert_eq!(classifier.category("x").unwrap().documents_count(), 1);
        assert_eq!(classifier.categories().len(), 1);
    }

    #[tokio::test]
    async fn test_learn_without_labels_is_noop() {
        let mut classifier = NaiveBayesClassifier::new();
        let labels: Vec<String> = Vec::new();

        classifier.learn("a b", labels).await.unwrap();

        assert!(classifier.categories().is_empty());
        assert!(classifier.vocabulary().is_empty());
    }

    #[test]
    fn test_resolve_category_creates_empty() {
        let mut classifier = NaiveBayesClassifier::new();

        let category = classifier.resolve_category("new");
        assert_eq!(category.name(), "new");
        assert_eq!(category.documents_count(), 0);

        assert!(classifier.category("new").is_some());
        assert!(classifier.vocabulary().is_empty());
    }

    #[test]
    fn test_resolve_category_returns_existing() {
        let mut classifier = NaiveBayesClassifier::new();
        classifier.resolve_category("spam").add_word("buy");

        let category = classifier.resolve_category("spam");
        assert_eq!(category.frequency("buy"), 1);
        assert_eq!(classifier.categories().len(), 1);
    }

    #[test]
    fn test_add_word_to_vocabulary() {
        let mut classifier = NaiveBayesClassifier::new();
        classifier
            .add_word_to_vocabulary("a")
            .add_word_to_vocabulary("a")
            .add_word_to_vocabulary("b");
        assert_eq!(classifier.vocabulary().words(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_vocabulary_superset_of_category_words() {
        let classifier = spam_ham().await;
        for category in classifier.categories() {
            for word in category.words_frequency().keys() {
                assert!(classifier.vocabulary().contains(word));
            }
        }
    }

    #[tokio::test]
    async fn test_vocabulary_non_decreasing() {
        let mut classifier = NaiveBayesClassifier::new();
        let mut last = 0;
        for (doc, label) in [("a b", "x"), ("b c", "y"), ("a a", "x"), ("", "y")] {
            classifier.learn(doc, label).await.unwrap();
            let len = classifier.vocabulary().len();
            assert!(len >= last);
            last = len;
        }
        assert_eq!(last, 3);
        assert_eq!(classifier.category("y").unwrap().documents_count(), 2);
    }

    #[tokio::test]
    async fn test_classify_untrained_fails() {
        let mut classifier = NaiveBayesClassifier::new();
        classifier.resolve_category("empty");

        let err = classifier.classify("anything").await.unwrap_err();
        assert!(matches!(err, WordBayesError::UntrainedClassifier));
    }

    #[tokio::test]
    async fn test_classify_only_tokenless_documents_fails() {
        let mut classifier = NaiveBayesClassifier::new();
        classifier.learn("?!", "x").await.unwrap();

        assert_eq!(classifier.total_documents(), 1);
        assert!(classifier.vocabulary().is_empty());

        let err = classifier.classify("foo").await.unwrap_err();
        assert!(matches!(err, WordBayesError::UntrainedClassifier));

        classifier.learn("foo bar", "y").await.unwrap();
        let result = classifier.classify("foo").await.unwrap();
        for category in &result.categories {
            assert!(category.probability < 0.0, "{:?}", category);
        }
        let p = classifier.category("x").unwrap().token_probability("foo");
        assert!(p > 0.0 && p < 1.0, "{}", p);
    }

    #[tokio::test]
    async fn test_category_without_documents_ranks_last() {
        let mut classifier = spam_ham().await;
        classifier.resolve_category("empty");

        let result = classifier.classify("buy").await.unwrap();

        let last = result.categories.last().unwrap();
        assert_eq!(last.name, "empty");
        assert_eq!(last.probability, f64::NEG_INFINITY);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let mut classifier = NaiveBayesClassifier::new();
        classifier.learn("same", "first").await.unwrap();
        classifier.learn("same", "second").await.unwrap();

        let result = classifier.classify("same").await.unwrap();
        assert_eq!(result.names(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_tokenizer_failure_leaves_model_untouched() {
        let failing = tokenizer::try_from_fn(|doc: &str| {
            if doc.contains("fail") {
                Err("cannot tokenize".into())
            } else {
                Ok(doc.split_whitespace().map(String::from).collect())
            }
        });
        let mut classifier = NaiveBayesClassifier::with_tokenizer(failing);
        classifier.learn("ok doc", "x").await.unwrap();

        let err = classifier.learn("please fail", "y").await.unwrap_err();
        assert!(matches!(err, WordBayesError::Tokenizer(_)));
        assert!(classifier.category("y").is_none());
        assert_eq!(classifier.total_documents(), 1);

        let err = classifier.classify("fail again").await.unwrap_err();
        assert!(matches!(err, WordBayesError::Tokenizer(_)));
    }

    #[tokio::test]
    async fn test_custom_tokenizer_is_used() {
        let chars = tokenizer::from_fn(|doc: &str| doc.chars().map(String::from).collect());
        let mut classifier = NaiveBayesClassifier::with_tokenizer(chars);

        classifier.learn("aab", "x").await.unwrap();

        let x = classifier.category("x").unwrap();
        assert_eq!(x.frequency("a"), 2);
        assert_eq!(x.frequency("b"), 1);
    }

    #[tokio::test]
    async fn test_learn_all() {
        let mut classifier = NaiveBayesClassifier::new();
        classifier
            .learn_all(vec![
                ("buy cheap pills", vec!["spam"]),
                ("lunch today", vec!["ham"]),
                ("cheap lunch", vec!["ham", "deals"]),
            ])
            .await
            .unwrap();

        assert_eq!(classifier.total_documents(), 4);
        assert_eq!(
            classifier
                .categories()
                .iter()
                .map(|c| c.name())
                .collect::<Vec<_>>(),
            vec!["spam", "ham", "deals"]
        );
    }

    #[test]
    fn test_tokens_frequency() {
        let table = NaiveBayesClassifier::tokens_frequency(&["a", "b", "a"]);
        assert_eq!(table.get("a"), Some(&2));
        assert_eq!(table.get("b"), Some(&1));
        assert_eq!(table.len(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let mut classifier = spam_ham().await;
        classifier.learn("cheap lunch deals", ["spam", "ham"]).await.unwrap();

        let data = classifier.to_data();
        let json = serde_json::to_string(&data).unwrap();
        let restored = NaiveBayesClassifier::from_data(
            serde_json::from_str(&json).unwrap(),
            Arc::clone(classifier.tokenizer()),
        );

        assert_eq!(restored.to_data(), data);
        assert_eq!(restored.vocabulary().words(), classifier.vocabulary().words());
        assert_eq!(restored.total_documents(), classifier.total_documents());

        let before = classifier.classify("cheap pills").await.unwrap();
        let after = restored.classify("cheap pills").await.unwrap();
        assert_eq!(before.names(), after.names());
    }

    #[test]
    fn test_from_data_duplicate_category_names() {
        let data = ClassifierData {
            vocabulary: vec![],
            categories: vec![
                CategoryData {
                    documents_count: 1,
                    ..CategoryData::new("x")
                },
                CategoryData::new("y"),
                CategoryData {
                    documents_count: 5,
                    ..CategoryData::new("x")
                },
            ],
        };

        let classifier =
            NaiveBayesClassifier::from_data(data, Arc::new(tokenizer::DefaultTokenizer::new()));

        assert_eq!(classifier.categories().len(), 2);
        assert_eq!(classifier.categories()[0].name(), "x");
        assert_eq!(classifier.category("x").unwrap().documents_count(), 5);
    }
}
