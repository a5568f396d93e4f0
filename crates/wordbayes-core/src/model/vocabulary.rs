//! Vocabulary
//!
//! 全カテゴリで共有される語彙集合。追加のみ（削除なし）。

use std::collections::HashSet;

use parking_lot::RwLock;

/// 共有語彙
///
/// 内部はロックで保護され、確認と挿入は同一の書き込みロック内で行う。
/// そのため同じ語を並行に追加しても重複しない。
#[derive(Debug, Default)]
pub struct Vocabulary {
    inner: RwLock<VocabularyInner>,
}

#[derive(Debug, Default)]
struct VocabularyInner {
    /// 挿入順（シリアライズ順）
    words: Vec<String>,
    index: HashSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存の語リストから構築（重複は最初の1つのみ残す）
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vocabulary = Self::new();
        for word in words {
            vocabulary.insert(word.into());
        }
        vocabulary
    }

    /// 未登録の場合のみ追加。追加した場合は`true`
    pub fn insert(&self, word: impl Into<String>) -> bool {
        let word = word.into();
        let mut inner = self.inner.write();
        if inner.index.contains(&word) {
            return false;
        }
        inner.index.insert(word.clone());
        inner.words.push(word);
        true
    }

    pub fn contains(&self, word: &str) -> bool {
        self.inner.read().index.contains(word)
    }

    pub fn len(&self) -> usize {
        self.inner.read().words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 挿入順の語リスト（スナップショット）
    pub fn words(&self) -> Vec<String> {
        self.inner.read().words.clone()
    }
}
