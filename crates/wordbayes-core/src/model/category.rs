//! Category
//!
//! 1ラベル分の語頻度テーブルと文書数を保持し、
//! 分類器の共有語彙サイズを使ってトークン確率を計算する。

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, WordBayesError};

use super::classifier::ClassifierState;
use super::snapshot::CategoryData;

/// `add_document`の入力
#[derive(Debug, Clone, Copy)]
pub enum Document<'a> {
    /// 分類器のトークナイザで分割される生テキスト
    Text(&'a str),
    /// 分割済みトークン列
    Tokens(&'a [String]),
}

impl<'a> From<&'a str> for Document<'a> {
    fn from(text: &'a str) -> Self {
        Document::Text(text)
    }
}

impl<'a> From<&'a String> for Document<'a> {
    fn from(text: &'a String) -> Self {
        Document::Text(text.as_str())
    }
}

impl<'a> From<&'a [String]> for Document<'a> {
    fn from(tokens: &'a [String]) -> Self {
        Document::Tokens(tokens)
    }
}

impl<'a> From<&'a Vec<String>> for Document<'a> {
    fn from(tokens: &'a Vec<String>) -> Self {
        Document::Tokens(tokens.as_slice())
    }
}

/// カテゴリ
///
/// 所有する分類器の共有状態（語彙・トークナイザ）へのハンドルを持つ。
/// 分類器経由でのみ生成される。
pub struct Category {
    name: String,
    words_frequency: HashMap<String, u64>,
    documents_count: u64,
    state: Arc<ClassifierState>,
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Category")
            .field("name", &self.name)
            .field("documents_count", &self.documents_count)
            .field("words", &self.words_frequency.len())
            .finish()
    }
}

impl Category {
    /// 空のカテゴリ（語彙には触れない）
    pub(crate) fn new(name: impl Into<String>, state: Arc<ClassifierState>) -> Self {
        Self {
            name: name.into(),
            words_frequency: HashMap::new(),
            documents_count: 0,
            state,
        }
    }

    /// スナップショットから復元
    ///
    /// 頻度テーブルにあって語彙にない語は語彙に補完する。
    pub(crate) fn from_data(data: CategoryData, state: Arc<ClassifierState>) -> Self {
        for word in data.words_frequency.keys() {
            if state.vocabulary.insert(word.as_str()) {
                tracing::debug!(category = %data.name, word = %word, "word missing from snapshot vocabulary");
            }
        }

        Self {
            name: data.name,
            words_frequency: data.words_frequency.into_iter().collect(),
            documents_count: data.documents_count,
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn documents_count(&self) -> u64 {
        self.documents_count
    }

    pub fn words_frequency(&self) -> &HashMap<String, u64> {
        &self.words_frequency
    }

    /// 語の出現回数（未出現は0）
    pub fn frequency(&self, word: &str) -> u64 {
        self.words_frequency.get(word).copied().unwrap_or(0)
    }

    /// 全語の出現回数の合計
    pub fn total_words_frequency(&self) -> u64 {
        self.words_frequency.values().sum()
    }

    /// 文書を1件追加
    ///
    /// テキストの場合は分類器のトークナイザで分割する（唯一のawait箇所）。
    /// トークン数に関わらず文書数は1だけ増える。
    pub async fn add_document<'a>(&mut self, document: impl Into<Document<'a>>) -> Result<&mut Self> {
        match document.into() {
            Document::Tokens(tokens) => Ok(self.add_tokens(tokens)),
            Document::Text(text) => {
                let tokens = self
                    .state
                    .tokenizer
                    .tokenize(text)
                    .await
                    .map_err(WordBayesError::Tokenizer)?;
                Ok(self.add_tokens(&tokens))
            }
        }
    }

    /// 分割済みトークン列を文書1件として追加
    pub fn add_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) -> &mut Self {
        for token in tokens {
            self.add_word(token.as_ref());
        }
        self.documents_count += 1;
        self
    }

    /// 語の頻度を1増やし、共有語彙に登録
    pub fn add_word(&mut self, word: &str) -> &mut Self {
        match self.words_frequency.get_mut(word) {
            Some(count) => *count += 1,
            None => {
                self.words_frequency.insert(word.to_string(), 1);
            }
        }
        self.state.vocabulary.insert(word);
        self
    }

    /// ラプラス平滑化したトークン確率
    ///
    /// `(frequency + 1) / (total_words_frequency + |vocabulary|)`
    ///
    /// 語彙サイズは呼び出し時点の値を読む（カテゴリ生成後も語彙は増える）。
    /// 語彙が空の間は分母が0になるため未定義。`classify`はその状態を
    /// `UntrainedClassifier`として扱い、この値を使わない。
    pub fn token_probability(&self, token: &str) -> f64 {
        let frequency = self.frequency(token) as f64;
        let denominator = (self.total_words_frequency() + self.state.vocabulary.len() as u64) as f64;
        (frequency + 1.0) / denominator
    }

    pub fn to_data(&self) -> CategoryData {
        CategoryData {
            name: self.name.clone(),
            words_frequency: self
                .words_frequency
                .iter()
                .map(|(word, count)| (word.clone(), *count))
                .collect(),
            documents_count: self.documents_count,
        }
    }
}
