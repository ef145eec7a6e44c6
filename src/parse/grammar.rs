use winnow::combinator::{alt, delimited, repeat};
use winnow::error::{ContextError, ErrMode, ModalResult};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

/// One top-level piece of directive text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'i> {
    Text(&'i str),
    /// Contents of a `[...]` group; nested brackets are kept verbatim.
    Param(&'i str),
    /// Contents of a `<...>` group; nested angle brackets are kept verbatim.
    Conditional(&'i str),
}

/// A lexical token of a countable expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawToken<'i> {
    Operator(char),
    Open,
    Close,
    /// Contents of a bracketed sub-countable.
    Group(&'i str),
    /// A maximal run of non-symbol characters, trimmed.
    Word(&'i str),
}

// -- Balanced groups --------------------------------------------------------

/// Body of a group whose opener was just consumed, up to its matching
/// closer. Scans with a depth counter so nesting costs no stack.
fn balanced_body<'i>(input: &mut &'i str, open: char, close: char) -> ModalResult<&'i str> {
    let text: &'i str = *input;
    let mut depth = 0_usize;
    for (at, c) in text.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            if depth == 0 {
                *input = &text[at..];
                return Ok(&text[..at]);
            }
            depth -= 1;
        }
    }
    Err(ErrMode::Backtrack(ContextError::new()))
}

fn param<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited('[', |i: &mut &'i str| balanced_body(i, '[', ']'), ']').parse_next(input)
}

fn conditional<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited('<', |i: &mut &'i str| balanced_body(i, '<', '>'), '>').parse_next(input)
}

/// Deepest `open`/`close` nesting in `text`, counting unmatched openers.
pub(crate) fn nesting_depth(text: &str, open: char, close: char) -> usize {
    let (mut depth, mut deepest) = (0_usize, 0_usize);
    for c in text.chars() {
        if c == open {
            depth += 1;
            deepest = deepest.max(depth);
        } else if c == close {
            depth = depth.saturating_sub(1);
        }
    }
    deepest
}

// -- Directive segments -----------------------------------------------------

fn text_run<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c != '[' && c != '<').parse_next(input)
}

/// An opener with no matching closer is plain text.
fn stray_opener<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    any.take().parse_next(input)
}

fn segment<'i>(input: &mut &'i str) -> ModalResult<Segment<'i>> {
    alt((
        param.map(Segment::Param),
        conditional.map(Segment::Conditional),
        text_run.map(Segment::Text),
        stray_opener.map(Segment::Text),
    ))
    .parse_next(input)
}

/// Split directive text into top-level segments.
///
/// Every character is consumed by some alternative, so this never fails;
/// the fallback only guards against a grammar regression.
pub(crate) fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut input = text;
    let parsed: ModalResult<Vec<Segment<'_>>> = repeat(0.., segment).parse_next(&mut input);
    match parsed {
        Ok(segments) if input.is_empty() => segments,
        _ => vec![Segment::Text(text)],
    }
}

// -- Expression tokens ------------------------------------------------------

pub(crate) fn is_expression_symbol(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%' | '^' | '(' | ')' | '[' | ']')
}

fn word<'i>(input: &mut &'i str) -> ModalResult<Option<RawToken<'i>>> {
    take_while(1.., |c: char| !is_expression_symbol(c))
        .map(|w: &str| {
            let w = w.trim();
            (!w.is_empty()).then_some(RawToken::Word(w))
        })
        .parse_next(input)
}

fn raw_token<'i>(input: &mut &'i str) -> ModalResult<Option<RawToken<'i>>> {
    alt((
        one_of(['+', '-', '*', '/', '%', '^']).map(|c| Some(RawToken::Operator(c))),
        '('.value(Some(RawToken::Open)),
        ')'.value(Some(RawToken::Close)),
        param.map(|g| Some(RawToken::Group(g))),
        word,
    ))
    .parse_next(input)
}

/// Tokenize an expression. Returns `None` on a stray `]` or an unclosed `[`.
pub(crate) fn expression_tokens(text: &str) -> Option<Vec<RawToken<'_>>> {
    let mut input = text;
    let tokens: Vec<Option<RawToken<'_>>> = repeat(0.., raw_token).parse_next(&mut input).ok()?;
    if !input.is_empty() {
        return None;
    }
    Some(tokens.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_plain_text() {
        assert_eq!(segments("Never ends"), vec![Segment::Text("Never ends")]);
    }

    #[test]
    fn segments_params_and_conditionals() {
        assert_eq!(
            segments("[+1 Gold] from [Farm] tiles <when at war>"),
            vec![
                Segment::Param("+1 Gold"),
                Segment::Text(" from "),
                Segment::Param("Farm"),
                Segment::Text(" tiles "),
                Segment::Conditional("when at war"),
            ]
        );
    }

    #[test]
    fn segments_keep_nested_brackets() {
        assert_eq!(
            segments("is equal to [3 * [Iron] + [bob]]"),
            vec![
                Segment::Text("is equal to "),
                Segment::Param("3 * [Iron] + [bob]"),
            ]
        );
    }

    #[test]
    fn segments_keep_nested_conditionals() {
        assert_eq!(
            segments("x <for every [Cities] <after turn [5]>>"),
            vec![
                Segment::Text("x "),
                Segment::Conditional("for every [Cities] <after turn [5]>"),
            ]
        );
    }

    #[test]
    fn unclosed_bracket_is_text() {
        let segs = segments("abc [def");
        let joined: String = segs
            .iter()
            .map(|s| match s {
                Segment::Text(t) => *t,
                _ => panic!("unexpected group {s:?}"),
            })
            .collect();
        assert_eq!(joined, "abc [def");
    }

    #[test]
    fn deep_nesting_is_scanned_without_recursion() {
        let n = 100_000;
        let text = format!("{}x{} <{}y{}>", "[".repeat(n), "]".repeat(n), "<".repeat(n), ">".repeat(n));
        let segs = segments(&text);
        assert_eq!(segs.len(), 3);
        assert!(matches!(segs[0], Segment::Param(p) if p.len() == 2 * n - 1));
        assert!(matches!(segs[2], Segment::Conditional(c) if c.len() == 2 * n + 1));
        assert_eq!(nesting_depth(&text, '[', ']'), n);
        assert_eq!(nesting_depth("a ] [b", '[', ']'), 1);
    }

    #[test]
    fn tokens_simple_arithmetic() {
        assert_eq!(
            expression_tokens("2+3*4").unwrap(),
            vec![
                RawToken::Word("2"),
                RawToken::Operator('+'),
                RawToken::Word("3"),
                RawToken::Operator('*'),
                RawToken::Word("4"),
            ]
        );
    }

    #[test]
    fn tokens_multiword_and_groups() {
        assert_eq!(
            expression_tokens("(Completed Policy branches + [[Melee] Units]) ^ 2").unwrap(),
            vec![
                RawToken::Open,
                RawToken::Word("Completed Policy branches"),
                RawToken::Operator('+'),
                RawToken::Group("[Melee] Units"),
                RawToken::Close,
                RawToken::Operator('^'),
                RawToken::Word("2"),
            ]
        );
    }

    #[test]
    fn tokens_reject_stray_closer() {
        assert!(expression_tokens("2 ] 3").is_none());
        assert!(expression_tokens("[Iron + 2").is_none());
    }
}
