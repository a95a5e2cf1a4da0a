//! Parser for SVG path data (`d` attributes).
//!
//! Produces the absolute-coordinate segment stream defined in
//! [`crate::geom`]. Parsing is lenient: empty input yields an empty stream,
//! truncated or unknown commands are dropped with a warning, and arcs are
//! resolved to their center parameterization on the spot so later geometry
//! queries never re-derive it.

use logos::Logos;

use super::lexer::PathToken;
use crate::geom::{arc_to_center, PathSegment, Point};

/// Parse path data such as `M 10 10 L 90 10 A 40 40 0 0 1 90 90 Z`.
///
/// Commands supported: `M/m`, `L/l`, `H/h`, `V/v`, `C/c`, `A/a`, `Z/z`, with
/// the standard implicit repetition (extra coordinate pairs after a moveto
/// continue as linetos). The smooth and quadratic forms (`S/s`, `Q/q`, `T/t`)
/// degrade to straight lines to their endpoints so that pen tracking stays
/// correct for whatever follows.
pub fn parse_path(input: &str) -> Vec<PathSegment> {
    let mut tokens = PathToken::lexer(input).peekable();
    let mut segments = Vec::new();
    let mut cursor = Point::new(0.0, 0.0);
    let mut subpath_start = cursor;

    while let Some(token) = tokens.next() {
        let command = match token {
            Ok(PathToken::Command(c)) => c,
            Ok(PathToken::Number(n)) => {
                log::warn!("ignoring stray number {n} in path data");
                continue;
            }
            Err(_) => {
                log::warn!("ignoring unrecognized text in path data");
                continue;
            }
        };

        let mut first_group = true;
        loop {
            // The command consumes one argument group per iteration; a
            // following number means the command repeats implicitly.
            let effective = match (command, first_group) {
                ('M', false) => 'L',
                ('m', false) => 'l',
                (c, _) => c,
            };
            match run_command(
                effective,
                &mut tokens,
                &mut cursor,
                &mut subpath_start,
                &mut segments,
            ) {
                CommandOutcome::Applied => {}
                CommandOutcome::Truncated => {
                    log::warn!("dropping truncated path command '{command}'");
                    break;
                }
                CommandOutcome::Unknown => {
                    log::warn!("ignoring unknown path command '{command}'");
                    // Swallow its arguments so they are not misread as
                    // repetitions of the previous command
                    while matches!(tokens.peek(), Some(Ok(PathToken::Number(_)))) {
                        tokens.next();
                    }
                    break;
                }
            }
            first_group = false;
            if matches!(command, 'Z' | 'z') {
                break;
            }
            if !matches!(tokens.peek(), Some(Ok(PathToken::Number(_)))) {
                break;
            }
        }
    }

    segments
}

enum CommandOutcome {
    Applied,
    Truncated,
    Unknown,
}

fn run_command(
    command: char,
    tokens: &mut std::iter::Peekable<impl Iterator<Item = Result<PathToken, ()>>>,
    cursor: &mut Point,
    subpath_start: &mut Point,
    segments: &mut Vec<PathSegment>,
) -> CommandOutcome {
    let relative = command.is_ascii_lowercase();
    let mut take = |into: &mut [f64]| -> bool {
        for slot in into.iter_mut() {
            match tokens.peek() {
                Some(Ok(PathToken::Number(n))) => {
                    *slot = *n;
                    tokens.next();
                }
                _ => return false,
            }
        }
        true
    };

    match command.to_ascii_uppercase() {
        'M' => {
            let mut args = [0.0; 2];
            if !take(&mut args) {
                return CommandOutcome::Truncated;
            }
            let to = resolve(args[0], args[1], *cursor, relative);
            segments.push(PathSegment::Move { to });
            *cursor = to;
            *subpath_start = to;
        }
        'L' => {
            let mut args = [0.0; 2];
            if !take(&mut args) {
                return CommandOutcome::Truncated;
            }
            let to = resolve(args[0], args[1], *cursor, relative);
            segments.push(PathSegment::Line { from: *cursor, to });
            *cursor = to;
        }
        'H' => {
            let mut args = [0.0; 1];
            if !take(&mut args) {
                return CommandOutcome::Truncated;
            }
            let x = if relative { cursor.x + args[0] } else { args[0] };
            let to = Point::new(x, cursor.y);
            segments.push(PathSegment::Line { from: *cursor, to });
            *cursor = to;
        }
        'V' => {
            let mut args = [0.0; 1];
            if !take(&mut args) {
                return CommandOutcome::Truncated;
            }
            let y = if relative { cursor.y + args[0] } else { args[0] };
            let to = Point::new(cursor.x, y);
            segments.push(PathSegment::Line { from: *cursor, to });
            *cursor = to;
        }
        'C' => {
            let mut args = [0.0; 6];
            if !take(&mut args) {
                return CommandOutcome::Truncated;
            }
            let c1 = resolve(args[0], args[1], *cursor, relative);
            let c2 = resolve(args[2], args[3], *cursor, relative);
            let to = resolve(args[4], args[5], *cursor, relative);
            segments.push(PathSegment::Cubic {
                from: *cursor,
                c1,
                c2,
                to,
            });
            *cursor = to;
        }
        'A' => {
            let mut args = [0.0; 7];
            if !take(&mut args) {
                return CommandOutcome::Truncated;
            }
            let to = resolve(args[5], args[6], *cursor, relative);
            match arc_to_center(
                *cursor,
                to,
                args[0],
                args[1],
                args[2],
                args[3] != 0.0,
                args[4] != 0.0,
            ) {
                Some(arc) => segments.push(PathSegment::Arc(arc)),
                // Zero radius draws as a straight line; coincident
                // endpoints draw nothing
                None if to != *cursor => {
                    segments.push(PathSegment::Line { from: *cursor, to })
                }
                None => {}
            }
            *cursor = to;
        }
        'Z' => {
            segments.push(PathSegment::Close {
                from: *cursor,
                to: *subpath_start,
            });
            *cursor = *subpath_start;
        }
        // Smooth/quadratic forms: keep the endpoint, lose the curvature
        'S' | 'Q' => {
            let mut args = [0.0; 4];
            if !take(&mut args) {
                return CommandOutcome::Truncated;
            }
            log::warn!("approximating path command '{command}' as a straight line");
            let to = resolve(args[2], args[3], *cursor, relative);
            segments.push(PathSegment::Line { from: *cursor, to });
            *cursor = to;
        }
        'T' => {
            let mut args = [0.0; 2];
            if !take(&mut args) {
                return CommandOutcome::Truncated;
            }
            log::warn!("approximating path command '{command}' as a straight line");
            let to = resolve(args[0], args[1], *cursor, relative);
            segments.push(PathSegment::Line { from: *cursor, to });
            *cursor = to;
        }
        _ => return CommandOutcome::Unknown,
    }

    CommandOutcome::Applied
}

fn resolve(x: f64, y: f64, cursor: Point, relative: bool) -> Point {
    if relative {
        Point::new(cursor.x + x, cursor.y + y)
    } else {
        Point::new(x, y)
    }
}
