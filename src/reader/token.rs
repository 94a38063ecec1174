//! Module for extracting Lisp tokens from an input string.

/// A Lisp token along with its starting position in the input.
///
/// Whitespace is ignored. Lines and columns are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

mod regex {
    use regex::Regex;
    use std::sync::OnceLock;

    pub(super) fn token() -> &'static Regex {
        static TOKEN: OnceLock<Regex> = OnceLock::new();
        TOKEN.get_or_init(|| {
            // Parens and quote stand alone;
            // anything else runs until whitespace, a paren, or a quote.
            //
            // This means a string literal with a space inside is split in two.
            // That's a known limitation of the dialect, not something to fix here.
            Regex::new(r#"\(|\)|'|[^\s()']+"#).expect("could not compile regex for tokens")
        })
    }
}

/// Split the input into its constituent tokens.
///
/// No balance checking happens here; ")))(" tokenizes fine.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut line = 1;
    let mut line_start = 0;
    let mut last_end = 0;

    let tokens: Vec<Token> = regex::token()
        .find_iter(input)
        .map(|m| {
            // Tokens never span lines, so only the gaps between them can move the cursor.
            for (i, b) in input[last_end..m.start()].bytes().enumerate() {
                if b == b'\n' {
                    line += 1;
                    line_start = last_end + i + 1;
                }
            }
            last_end = m.end();
            Token {
                text: m.as_str().to_owned(),
                line,
                column: input[line_start..m.start()].chars().count() + 1,
            }
        })
        .collect();

    tracing::trace!(count = tokens.len(), "tokenized input");
    tokens
}
