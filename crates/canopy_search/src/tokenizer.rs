//! Search input tokenization.
//!
//! Splits raw search text into tokens and normalizes them into the list
//! a name filter matches against.

use canopy_foundation::truncate_to_capacity;

/// Prefixes that mark a component filter token.
pub const COMPONENT_PREFIXES: [&str; 2] = ["c=", "C="];

/// Returns true if `token` is a component filter (`c=Type` or `C=Type`).
#[must_use]
pub fn is_component_token(token: &str) -> bool {
    COMPONENT_PREFIXES
        .iter()
        .any(|prefix| token.starts_with(prefix))
}

/// How near-duplicate tokens are collapsed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TokenDedup {
    /// Only identical tokens are collapsed.
    Exact,
    /// A token contained in a longer kept token is dropped.
    #[default]
    Substring,
}

/// Order of the normalized token list.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TokenOrder {
    /// Longest tokens first; the most selective check runs first.
    #[default]
    LongestFirst,
    /// Shortest tokens first.
    ShortestFirst,
}

/// Options controlling token normalization.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TokenizerOptions {
    /// Dedup rule.
    pub dedup: TokenDedup,
    /// Output order.
    pub order: TokenOrder,
}

impl TokenizerOptions {
    /// Sets the dedup rule.
    #[must_use]
    pub fn with_dedup(mut self, dedup: TokenDedup) -> Self {
        self.dedup = dedup;
        self
    }

    /// Sets the output order.
    #[must_use]
    pub fn with_order(mut self, order: TokenOrder) -> Self {
        self.order = order;
        self
    }
}

/// Tokenizes search input.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchTokenizer {
    options: TokenizerOptions,
}

impl SearchTokenizer {
    /// Creates a tokenizer with the given options.
    #[must_use]
    pub fn new(options: TokenizerOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> TokenizerOptions {
        self.options
    }

    /// Splits raw text into tokens.
    ///
    /// - Splits on whitespace
    /// - Keeps `"quoted phrases"` as one token without the quotes
    /// - Drops empty quote pairs and unmatched quotes
    #[must_use]
    pub fn split(text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut rest = text;

        while let Some(ch) = rest.chars().next() {
            rest = &rest[ch.len_utf8()..];
            match ch {
                '"' => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                    // An unmatched quote is dropped and the rest read as words.
                    if let Some(end) = rest.find('"') {
                        if end > 0 {
                            tokens.push(rest[..end].to_string());
                        }
                        rest = &rest[end + 1..];
                    }
                }
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                c => current.push(c),
            }
        }

        if !current.is_empty() {
            tokens.push(current);
        }
        tokens
    }

    /// Normalizes split tokens into the list a name filter matches against.
    ///
    /// Tokens are lowercased, component filters are dropped, over-long
    /// tokens are truncated, and duplicates are collapsed and ordered
    /// according to the options. Ties keep their first appearance.
    #[must_use]
    pub fn normalize<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_ref();
            if token.is_empty() || is_component_token(token) {
                continue;
            }
            let lowered = token.to_lowercase();
            let token = truncate_to_capacity(&lowered).to_string();
            if !out.contains(&token) {
                out.push(token);
            }
        }

        // Stable: equal lengths keep their first appearance.
        out.sort_by(|a, b| b.len().cmp(&a.len()));
        if self.options.dedup == TokenDedup::Substring {
            let mut kept: Vec<String> = Vec::with_capacity(out.len());
            for token in out {
                if !kept.iter().any(|longer| longer.contains(token.as_str())) {
                    kept.push(token);
                }
            }
            out = kept;
        }
        if self.options.order == TokenOrder::ShortestFirst {
            out.sort_by_key(String::len);
        }
        out
    }

    /// Splits and normalizes raw text.
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.normalize(&Self::split(text))
    }
}
