use rust_stemmers::Algorithm;

use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::lowercase::LowercaseFilter;
use crate::analysis::filters::stemmer::StemmerFilter;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{AsciiWordTokenizer, Tokenizer};

/// Text analysis pipeline: tokenizer + an ordered chain of filters.
///
/// The *same* `Analyzer` instance is used to tokenize documents at index
/// time and queries at query time — there is exactly one analyzer, so
/// there is no per-field or per-language selection to thread through.
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
}

impl Analyzer {
    pub fn new(tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer { tokenizer, filters: Vec::new() }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);
        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }
        tokens
    }

    /// Tokenize text to a flat list of stemmed term strings, in source order.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.analyze(text).into_iter().map(|t| t.text).collect()
    }

    /// The stemmed ASCII-alphanumeric analyzer: lowercase, split on
    /// non-alphanumeric boundaries, Porter-stem.
    pub fn stemmed_english() -> Self {
        Analyzer::new(Box::new(AsciiWordTokenizer))
            .add_filter(Box::new(LowercaseFilter))
            .add_filter(Box::new(StemmerFilter::new(Algorithm::English)))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::stemmed_english()
    }
}
