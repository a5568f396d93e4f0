pub mod config;
pub mod error;
pub mod model;
pub mod tokenizer;
pub mod training;

pub use config::Config;
pub use error::{Result, TokenizerError, WordBayesError};
pub use tokenizer::{DefaultTokenizer, Tokenizer};
pub use training::{parse_training_data, TrainingExample};

// Classification model
pub use model::{
    Category, CategoryClassification, CategoryData, ClassifierData, Document,
    DocumentClassification, Labels, ModelStore, NaiveBayesClassifier, Vocabulary,
};
