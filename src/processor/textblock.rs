//! Title and subtitle construction: wrapping a heading into display lines
//! and stacking the lines into a centered group.
//!
//! Wrapping prefers the external [`LineBreaker`] collaborator when one is
//! wired in, because a semantic breaker picks better break points than width
//! math alone. Any collaborator failure falls back to the local greedy wrap,
//! so composition never depends on the collaborator being up.

use crate::element::Element;
use crate::layout::{Alignment, LayoutError, LinearDirection, LinearStrategy, LinearVariant};
use crate::metrics::{LineBreaker, TextMeasure};

use super::{ProcessorConfig, TextSpec};

/// Split heading text into display lines under the configured width budget,
/// then tidy the result: clamp to `max_lines`, pad out short lines by
/// borrowing a word from the next line, and fold single-word remainders into
/// their predecessor.
pub fn break_text(
    text: &str,
    font_size: f64,
    config: &ProcessorConfig,
    measure: &dyn TextMeasure,
    breaker: Option<&dyn LineBreaker>,
) -> Vec<String> {
    let mut lines = match breaker {
        Some(b) => match b.break_lines(text, config.max_text_width, font_size, config.max_lines)
        {
            Ok(lines) if !lines.is_empty() => lines,
            Ok(_) => {
                log::warn!("line breaker returned no lines, using greedy wrap");
                greedy_wrap(text, config.max_text_width, font_size, measure)
            }
            Err(err) => {
                log::warn!("line breaker failed ({err}), using greedy wrap");
                greedy_wrap(text, config.max_text_width, font_size, measure)
            }
        },
        None => greedy_wrap(text, config.max_text_width, font_size, measure),
    };

    if lines.len() > config.max_lines && config.max_lines > 0 {
        let overflow = lines.split_off(config.max_lines);
        if let Some(last) = lines.last_mut() {
            for extra in overflow {
                last.push(' ');
                last.push_str(&extra);
            }
        }
    }

    borrow_short_lines(&mut lines, config.min_line_chars);
    merge_single_word_lines(&mut lines);
    lines
}

/// Width-driven wrap: words accumulate onto a line until the next word would
/// exceed the budget. A word wider than the whole budget still gets a line
/// of its own.
pub fn greedy_wrap(
    text: &str,
    max_width: f64,
    font_size: f64,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure.measure(&candidate, font_size).width <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lines shorter than `min_chars` borrow the first word of the following
/// line, so a wrap does not strand a visually tiny line mid-block.
pub fn borrow_short_lines(lines: &mut Vec<String>, min_chars: usize) {
    let mut i = 0;
    while i + 1 < lines.len() {
        if lines[i].chars().count() < min_chars {
            let next = &mut lines[i + 1];
            let word: String = match next.split_whitespace().next() {
                Some(w) => w.to_string(),
                None => {
                    lines.remove(i + 1);
                    continue;
                }
            };
            let rest = next[word.len()..].trim_start().to_string();
            lines[i].push(' ');
            lines[i].push_str(&word);
            if rest.is_empty() {
                lines.remove(i + 1);
            } else {
                lines[i + 1] = rest;
            }
        }
        i += 1;
    }
}

/// A line holding a single word reads as an accident; fold it into the line
/// above.
pub fn merge_single_word_lines(lines: &mut Vec<String>) {
    let mut i = 1;
    while i < lines.len() {
        if lines[i].split_whitespace().count() <= 1 {
            let orphan = lines.remove(i);
            let prev = &mut lines[i - 1];
            if !orphan.is_empty() {
                prev.push(' ');
                prev.push_str(&orphan);
            }
        } else {
            i += 1;
        }
    }
}

/// Build a title/subtitle group: one Text atom per display line, stacked
/// top to bottom with the lines centered on each other.
pub fn build_text_block(
    id: &str,
    spec: &TextSpec,
    config: &ProcessorConfig,
    measure: &dyn TextMeasure,
    breaker: Option<&dyn LineBreaker>,
) -> Result<Element, LayoutError> {
    let lines = break_text(&spec.text, spec.font_size, config, measure, breaker);
    let mut children: Vec<Element> = lines
        .iter()
        .map(|line| Element::text(0.0, 0.0, line.clone(), spec.font_size))
        .collect();
    for child in &mut children {
        child.resolve(measure);
    }

    let stack = LinearStrategy {
        direction: LinearDirection::Down,
        variant: LinearVariant::Edge,
        padding: config.line_spacing,
        offset: 0.0,
        alignment: Alignment::Middle,
        overlap: false,
    };
    for i in 1..children.len() {
        let (head, tail) = children.split_at_mut(i);
        let reference = &head[i - 1];
        let target = &mut tail[0];
        let old = target
            .resolved_box()
            .ok_or_else(|| LayoutError::unresolved(target.id.as_deref()))?;
        stack.apply(reference, target, measure)?;
        target.update_pos(old.minx, old.miny);
    }

    let mut group = Element::group(children).with_id(id);
    group.resolve(measure);
    Ok(group)
}
