//! # Model Module
//!
//! 多項ナイーブベイズによるテキスト分類モデルを提供する。
//!
//! ## 構成
//!
//! - **NaiveBayesClassifier**: カテゴリ集合・共有語彙・トークナイザを所有し、
//!   学習（`learn`）と分類（`classify`）を行う
//! - **Category**: 1ラベル分の語頻度と文書数を持ち、ラプラス平滑化した
//!   トークン確率を計算する
//! - **Vocabulary**: 全カテゴリで共有される語彙集合（追加のみ）
//!
//! ## モジュール構成
//!
//! - `vocabulary`: 共有語彙
//! - `category`: カテゴリ
//! - `classifier`: 分類器と分類結果
//! - `snapshot`: シリアライズ用スナップショット
//! - `store`: スナップショットのファイル保存
//!
//! ## 使用例
//!
//! ```rust
//! use wordbayes_core::model::NaiveBayesClassifier;
//!
//! # tokio_test_block(async {
//! let mut classifier = NaiveBayesClassifier::new();
//! classifier.learn("buy cheap pills", "spam").await.unwrap();
//! classifier.learn("let's have lunch", "ham").await.unwrap();
//!
//! let result = classifier.classify("buy pills").await.unwrap();
//! assert_eq!(result.top().unwrap().name, "spam");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod category;
mod classifier;
mod snapshot;
mod store;
mod vocabulary;

// Re-exports
pub use category::{Category, Document};
pub use classifier::{CategoryClassification, DocumentClassification, Labels, NaiveBayesClassifier};
pub use snapshot::{CategoryData, ClassifierData};
pub use store::ModelStore;
pub use vocabulary::Vocabulary;
