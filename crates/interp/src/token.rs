//! Tokenizer for Stax source
//!
//! Source text is a flat sequence of whitespace-separated tokens. The
//! tokenizer classifies each one and keeps the original text payload; it
//! never interprets anything beyond string escapes and number syntax.

use std::fmt;

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Numeric literal; the payload keeps the source lexeme
    Num,
    /// String literal; the payload is the unescaped contents
    Str,
    /// Identifier: `[A-Za-z_][A-Za-z0-9_]*`
    Word,
    /// Preprocessor command: `@` followed by a word (payload excludes the `@`)
    Ppc,
    /// Any other single printable character
    Symbol,
}

/// A classified token with its owned text payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    /// Shorthand for a `Word` token
    pub fn word(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Word, text)
    }

    /// Shorthand for a `Symbol` token
    pub fn symbol(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Symbol, text)
    }

    pub(crate) fn is_symbol(&self, text: &str) -> bool {
        self.kind == TokenKind::Symbol && self.text == text
    }
}

/// An owned, ordered token sequence - the body of a block or a word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    tokens: Vec<Token>,
}

impl Code {
    pub fn new() -> Self {
        Code { tokens: Vec::new() }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<Vec<Token>> for Code {
    fn from(tokens: Vec<Token>) -> Self {
        Code { tokens }
    }
}

impl fmt::Display for Code {
    /// Pretty form: `{ tok tok ... }` with string tokens re-quoted
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for token in &self.tokens {
            if token.kind == TokenKind::Str {
                write!(f, "{} ", crate::value::quote_str(&token.text))?;
            } else {
                write!(f, "{} ", token.text)?;
            }
        }
        write!(f, "}}")
    }
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_word_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Split source text into tokens.
///
/// This is a pure function of its input. Errors cite the byte offset of the
/// offending character. Brace balance is checked here so the evaluator can
/// rely on every `{` having a matching `}`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, String> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut brace_depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b'\r' | b'\n' => i += 1,
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'"' => {
                let (text, next) = scan_string(bytes, i)?;
                tokens.push(Token::new(TokenKind::Str, text));
                i = next;
            }
            b'0'..=b'9' => {
                let (lexeme, next) = scan_number(source, i)?;
                tokens.push(Token::new(TokenKind::Num, lexeme));
                i = next;
            }
            b'-' if i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit() => {
                let (lexeme, next) = scan_number(source, i)?;
                tokens.push(Token::new(TokenKind::Num, lexeme));
                i = next;
            }
            b if is_word_start(b) => {
                let start = i;
                i += 1;
                while i < bytes.len() && is_word_char(bytes[i]) {
                    i += 1;
                }
                tokens.push(Token::word(&source[start..i]));
            }
            b'@' => {
                if i + 1 >= bytes.len() || !is_word_start(bytes[i + 1]) {
                    return Err(format!("isolated '@' at offset {i}"));
                }
                let start = i + 1;
                i = start + 1;
                while i < bytes.len() && is_word_char(bytes[i]) {
                    i += 1;
                }
                tokens.push(Token::new(TokenKind::Ppc, &source[start..i]));
            }
            b'{' => {
                brace_depth += 1;
                tokens.push(Token::symbol("{"));
                i += 1;
            }
            b'}' => {
                if brace_depth == 0 {
                    return Err(format!("unmatched '}}' at offset {i}"));
                }
                brace_depth -= 1;
                tokens.push(Token::symbol("}"));
                i += 1;
            }
            b @ 0x21..=0x7e => {
                tokens.push(Token::symbol((b as char).to_string()));
                i += 1;
            }
            _ => return Err(format!("unexpected character at offset {i}")),
        }
    }

    if brace_depth > 0 {
        return Err("unclosed '{' at end of source".to_string());
    }

    Ok(tokens)
}

/// Scan a number lexeme starting at `start` (a digit, or `-` then a digit).
///
/// Accepts digits, an optional fraction, and an optional exponent; the
/// exponent is only consumed when at least one digit follows it, matching
/// the usual float-scan backtracking.
fn scan_number(source: &str, start: usize) -> Result<(String, usize), String> {
    let bytes = source.as_bytes();
    let mut i = start;
    if bytes[i] == b'-' {
        i += 1;
    }
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }

    let lexeme = &source[start..i];
    let value: f64 = lexeme
        .parse()
        .map_err(|_| format!("invalid number '{lexeme}' at offset {start}"))?;
    if value.is_nan() || value.is_infinite() {
        return Err(format!("invalid number '{lexeme}' at offset {start}"));
    }
    Ok((lexeme.to_string(), i))
}

/// Scan a string literal whose opening quote is at `open`.
///
/// Recognized escapes: `\a \b \n \r \t`; any other `\x` stands for the
/// literal `x`. Returns the unescaped contents and the index just past the
/// closing quote.
fn scan_string(bytes: &[u8], open: usize) -> Result<(String, usize), String> {
    let mut out: Vec<u8> = Vec::new();
    let mut i = open + 1;
    loop {
        if i >= bytes.len() {
            return Err(format!("unterminated string starting at offset {open}"));
        }
        match bytes[i] {
            b'"' => return Ok((String::from_utf8_lossy(&out).into_owned(), i + 1)),
            b'\\' => {
                i += 1;
                if i >= bytes.len() {
                    return Err(format!("unterminated string starting at offset {open}"));
                }
                out.push(match bytes[i] {
                    b'a' => 0x07,
                    b'b' => 0x08,
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    other => other,
                });
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_numbers_and_words() {
        let tokens = tokenize("1 2.5 add -3 x_1").unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0], Token::new(TokenKind::Num, "1"));
        assert_eq!(tokens[1], Token::new(TokenKind::Num, "2.5"));
        assert_eq!(tokens[2], Token::word("add"));
        assert_eq!(tokens[3], Token::new(TokenKind::Num, "-3"));
        assert_eq!(tokens[4], Token::word("x_1"));
    }

    #[test]
    fn test_minus_starts_number_only_before_digit() {
        // "-3" is one number token, "- 3" is a symbol and a number
        let tokens = tokenize("- 3").unwrap();
        assert_eq!(tokens[0], Token::symbol("-"));
        assert_eq!(tokens[1], Token::new(TokenKind::Num, "3"));

        let tokens = tokenize("1 -2 +").unwrap();
        assert_eq!(tokens[1], Token::new(TokenKind::Num, "-2"));
        assert_eq!(tokens[2], Token::symbol("+"));
    }

    #[test]
    fn test_exponent_backtracking() {
        let tokens = tokenize("1e3 2e").unwrap();
        assert_eq!(tokens[0], Token::new(TokenKind::Num, "1e3"));
        // "2e" scans the number "2", then the word "e"
        assert_eq!(tokens[1], Token::new(TokenKind::Num, "2"));
        assert_eq!(tokens[2], Token::word("e"));
    }

    #[test]
    fn test_overflowing_number_rejected() {
        let err = tokenize("1e999").unwrap_err();
        assert!(err.contains("invalid number"), "{err}");
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokenize(r#""a\tb\n" "q\"q" "\z""#).unwrap();
        assert_eq!(tokens[0], Token::new(TokenKind::Str, "a\tb\n"));
        assert_eq!(tokens[1], Token::new(TokenKind::Str, "q\"q"));
        assert_eq!(tokens[2], Token::new(TokenKind::Str, "z"));
    }

    #[test]
    fn test_unterminated_string_cites_offset() {
        let err = tokenize(r#"12 "oops"#).unwrap_err();
        assert!(err.contains("unterminated string"), "{err}");
        assert!(err.contains("offset 3"), "{err}");
    }

    #[test]
    fn test_comments_discarded() {
        assert_eq!(kinds("1 # everything here goes\n2"), vec![
            TokenKind::Num,
            TokenKind::Num
        ]);
        assert_eq!(kinds("# only a comment"), vec![]);
    }

    #[test]
    fn test_ppc_and_isolated_at() {
        let tokens = tokenize("@include").unwrap();
        assert_eq!(tokens[0], Token::new(TokenKind::Ppc, "include"));

        assert!(tokenize("@").unwrap_err().contains("isolated '@'"));
        assert!(tokenize("@ x").unwrap_err().contains("isolated '@'"));
    }

    #[test]
    fn test_symbols_single_char() {
        let tokens = tokenize("+*%!<>=").unwrap();
        assert_eq!(tokens.len(), 7);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Symbol));
        assert_eq!(tokens[0].text, "+");
        assert_eq!(tokens[6].text, "=");
    }

    #[test]
    fn test_brace_balance() {
        assert!(tokenize("{ 1 { 2 } }").is_ok());
        assert!(tokenize("{ 1").unwrap_err().contains("unclosed '{'"));
        assert!(tokenize("1 }").unwrap_err().contains("unmatched '}'"));
    }

    #[test]
    fn test_non_ascii_rejected_outside_strings() {
        assert!(tokenize("caf\u{e9}").is_err());
        // but allowed inside string literals, byte for byte
        let tokens = tokenize("\"caf\u{e9}\"").unwrap();
        assert_eq!(tokens[0].text, "caf\u{e9}");
    }

    #[test]
    fn test_code_display() {
        let code = Code::from(vec![
            Token::new(TokenKind::Num, "1"),
            Token::new(TokenKind::Str, "a b"),
            Token::word("print"),
        ]);
        assert_eq!(code.to_string(), "{ 1 \"a b\" print }");
        assert_eq!(Code::new().to_string(), "{ }");
    }
}
