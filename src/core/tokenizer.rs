//! Token counting module
//!
//! Counts tokens with tiktoken BPE encodings (cl100k_base by default, the
//! GPT-4 encoding). The traversal engine only sees the `TokenCounter` trait,
//! so any `text -> count` function can stand in for the BPE.
//!
//! Usage:
//! ```text
//! let tokens = TokenEncoding::default().count("Hello world");
//! ```

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

/// Anything that turns text into a non-negative token count
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// Supported encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenEncoding {
    /// cl100k_base (GPT-4, GPT-3.5-turbo)
    #[default]
    Cl100k,
    /// o200k_base (GPT-4o, o-series)
    O200k,
    /// Whitespace-separated words, no BPE
    Words,
}

impl TokenEncoding {
    fn bpe(&self) -> Option<&'static CoreBPE> {
        let loaded = match self {
            TokenEncoding::Cl100k => &*CL100K_BPE,
            TokenEncoding::O200k => &*O200K_BPE,
            TokenEncoding::Words => return None,
        };
        match loaded {
            Ok(bpe) => Some(bpe),
            Err(e) => {
                if !FALLBACK_WARNED.swap(true, Ordering::Relaxed) {
                    tracing::warn!("{}; falling back to whitespace word count", e);
                }
                None
            }
        }
    }

    pub fn available() -> &'static [&'static str] {
        &["cl100k", "o200k", "words"]
    }
}

impl fmt::Display for TokenEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenEncoding::Cl100k => "cl100k",
            TokenEncoding::O200k => "o200k",
            TokenEncoding::Words => "words",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TokenEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k" | "cl100k_base" | "gpt-4" | "default" => Ok(TokenEncoding::Cl100k),
            "o200k" | "o200k_base" | "gpt-4o" => Ok(TokenEncoding::O200k),
            "words" | "whitespace" => Ok(TokenEncoding::Words),
            _ => Err(format!(
                "Unknown encoding: {}. Available: {}",
                s,
                TokenEncoding::available().join(", ")
            )),
        }
    }
}

impl TokenCounter for TokenEncoding {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        match self.bpe() {
            Some(bpe) => bpe.encode_with_special_tokens(text).len(),
            None => count_words(text),
        }
    }
}

// Loaded once on first use
static CL100K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| cl100k_base().map_err(|e| format!("Failed to load cl100k_base: {}", e)));

static O200K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| o200k_base().map_err(|e| format!("Failed to load o200k_base: {}", e)));

static FALLBACK_WARNED: AtomicBool = AtomicBool::new(false);

/// Whitespace-separated word count
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_empty() {
        assert_eq!(TokenEncoding::Cl100k.count(""), 0);
        assert_eq!(TokenEncoding::Words.count(""), 0);
    }

    #[test]
    fn test_count_ascii() {
        let tokens = TokenEncoding::Cl100k.count("Hello, world!");
        assert!(tokens > 0 && tokens < 10);
    }

    #[test]
    fn test_count_code() {
        let tokens = TokenEncoding::O200k.count(r#"fn main() { println!("Hello"); }"#);
        assert!(tokens > 0);
    }

    #[test]
    fn test_words() {
        assert_eq!(TokenEncoding::Words.count("one two\tthree\n\nfour "), 4);
        assert_eq!(count_words("   \n\t "), 0);
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("cl100k".parse::<TokenEncoding>().unwrap(), TokenEncoding::Cl100k);
        assert_eq!("O200K".parse::<TokenEncoding>().unwrap(), TokenEncoding::O200k);
        assert_eq!("words".parse::<TokenEncoding>().unwrap(), TokenEncoding::Words);
        let err = "bogus".parse::<TokenEncoding>().unwrap_err();
        assert!(err.contains("Available: cl100k, o200k, words"));
    }

    #[test]
    fn test_encoding_display() {
        assert_eq!(TokenEncoding::Cl100k.to_string(), "cl100k");
        assert_eq!(TokenEncoding::Words.to_string(), "words");
    }
}
