//! Tokens for the SVG attribute micro-grammars, using logos.
//!
//! Two small token sets share a number syntax: the `transform` attribute
//! (function-call segments like `translate(4, 2)`) and path data (`d`
//! attributes, single-letter commands followed by coordinates). Whitespace
//! and commas are interchangeable separators in both grammars, so the lexer
//! skips them.

use logos::Logos;

/// Byte range in attribute text.
pub type Span = std::ops::Range<usize>;

/// Tokens of the `transform` attribute grammar.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r,]+")]
pub enum TransformToken {
    #[regex(r"[a-zA-Z]+", |lex| lex.slice().to_string())]
    Ident(String),

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[regex(r"[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
}

/// Tokens of the path data (`d` attribute) grammar.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r,]+")]
pub enum PathToken {
    #[regex(r"[a-zA-Z]", |lex| lex.slice().as_bytes()[0] as char)]
    Command(char),

    #[regex(r"[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform_tokens(input: &str) -> Vec<TransformToken> {
        TransformToken::lexer(input).filter_map(|t| t.ok()).collect()
    }

    fn path_tokens(input: &str) -> Vec<PathToken> {
        PathToken::lexer(input).filter_map(|t| t.ok()).collect()
    }

    #[test]
    fn test_transform_call() {
        let tokens = transform_tokens("translate(4, 2)");
        assert_eq!(
            tokens,
            vec![
                TransformToken::Ident("translate".to_string()),
                TransformToken::ParenOpen,
                TransformToken::Number(4.0),
                TransformToken::Number(2.0),
                TransformToken::ParenClose,
            ]
        );
    }

    #[test]
    fn test_commas_and_whitespace_interchangeable() {
        assert_eq!(transform_tokens("scale(2,3)"), transform_tokens("scale( 2  3 )"));
    }

    #[test]
    fn test_negative_and_fractional_numbers() {
        let tokens = path_tokens("-1.5 .5 2. 1e3 -2.5e-2");
        assert_eq!(
            tokens,
            vec![
                PathToken::Number(-1.5),
                PathToken::Number(0.5),
                PathToken::Number(2.0),
                PathToken::Number(1000.0),
                PathToken::Number(-0.025),
            ]
        );
    }

    #[test]
    fn test_path_commands_split_from_numbers() {
        let tokens = path_tokens("M10,20L30-40Z");
        assert_eq!(
            tokens,
            vec![
                PathToken::Command('M'),
                PathToken::Number(10.0),
                PathToken::Number(20.0),
                PathToken::Command('L'),
                PathToken::Number(30.0),
                PathToken::Number(-40.0),
                PathToken::Command('Z'),
            ]
        );
    }

    #[test]
    fn test_adjacent_command_letters() {
        let tokens = path_tokens("zM");
        assert_eq!(
            tokens,
            vec![PathToken::Command('z'), PathToken::Command('M')]
        );
    }
}
