//! Parser for the SVG `transform` attribute.
//!
//! A transform list folds left to right into a single [`Matrix`], giving the
//! list its standard SVG meaning (the leftmost segment is applied to points
//! last). Parsing never fails: empty input yields the identity, and segments
//! that cannot be understood are skipped with a warning so one stray segment
//! cannot take down a whole document.

use logos::Logos;

use super::lexer::TransformToken;
use crate::geom::Matrix;

/// Parse a transform list such as `translate(4 2) rotate(45, 1, 1) scale(2)`.
pub fn parse_transform(input: &str) -> Matrix {
    let mut tokens = TransformToken::lexer(input).peekable();
    let mut matrix = Matrix::IDENTITY;

    while let Some(token) = tokens.next() {
        let name = match token {
            Ok(TransformToken::Ident(name)) => name,
            Ok(other) => {
                log::warn!("ignoring stray token {other:?} in transform list");
                continue;
            }
            Err(_) => {
                log::warn!("ignoring unrecognized text in transform list");
                continue;
            }
        };

        let args = match collect_args(&mut tokens) {
            Some(args) => args,
            None => {
                log::warn!("ignoring malformed transform segment '{name}'");
                continue;
            }
        };

        match build_segment(&name, &args) {
            Some(op) => matrix = matrix.multiply(&op),
            None => log::warn!(
                "ignoring unsupported transform segment '{}' with {} argument(s)",
                name,
                args.len()
            ),
        }
    }

    matrix
}

/// Consume `( n n ... )` after a segment name. Returns `None` when the
/// parenthesized group is absent or contains non-numeric tokens; in that case
/// everything up to the closing paren has been consumed.
fn collect_args(
    tokens: &mut std::iter::Peekable<impl Iterator<Item = Result<TransformToken, ()>>>,
) -> Option<Vec<f64>> {
    match tokens.peek() {
        Some(Ok(TransformToken::ParenOpen)) => {
            tokens.next();
        }
        _ => return None,
    }

    let mut args = Vec::new();
    let mut well_formed = true;
    for token in tokens.by_ref() {
        match token {
            Ok(TransformToken::Number(n)) => args.push(n),
            Ok(TransformToken::ParenClose) => {
                return if well_formed { Some(args) } else { None };
            }
            _ => well_formed = false,
        }
    }
    // Ran out of input before the closing paren
    None
}

fn build_segment(name: &str, args: &[f64]) -> Option<Matrix> {
    match (name, args) {
        ("translate", [tx]) => Some(Matrix::translation(*tx, 0.0)),
        ("translate", [tx, ty]) => Some(Matrix::translation(*tx, *ty)),
        ("scale", [s]) => Some(Matrix::scaling(*s, *s)),
        ("scale", [sx, sy]) => Some(Matrix::scaling(*sx, *sy)),
        ("rotate", [angle]) => Some(Matrix::rotation(*angle)),
        ("rotate", [angle, cx, cy]) => Some(Matrix::rotation_about(*angle, *cx, *cy)),
        ("matrix", [a, b, c, d, e, f]) => Some(Matrix::new(*a, *b, *c, *d, *e, *f)),
        _ => None,
    }
}
