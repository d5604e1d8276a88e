//! Documentation-comment directives.
//!
//! A directive is a `@tag argument` line inside a `/** … */` block. Known
//! tags map to refinement calls through the static [`REFINEMENTS`] table;
//! unknown tags and malformed arguments produce no call, while the comment
//! itself is still re-emitted by the caller.

use crate::expr::{Arg, Call};
use crate::template::Pattern;
use serde::{Deserialize, Serialize};

/// A `@tag argument` pair, argument kept raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub tag: String,
    #[serde(default)]
    pub argument: String,
}

/// Builds the refinement for a directive from its trimmed argument.
type Refine = fn(&str) -> Option<Call>;

/// Tag → refinement builder.
static REFINEMENTS: &[(&str, Refine)] = &[
    ("format", format),
    ("pattern", pattern),
    ("minimum", minimum),
    ("maximum", maximum),
    ("minLength", min_length),
    ("maxLength", max_length),
    // Spellings found in existing codebases.
    ("minLenght", min_length),
    ("maxLenght", max_length),
];

/// Parse the directives of a documentation comment, in order of appearance.
pub fn extract_directives(comment: &str) -> Vec<Directive> {
    let body = comment.trim();
    let body = body.strip_prefix("/**").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    body.lines()
        .filter_map(|line| {
            let line = line.trim().trim_start_matches('*').trim();
            let rest = line.strip_prefix('@')?;
            let (tag, argument) = match rest.split_once(char::is_whitespace) {
                Some((tag, argument)) => (tag, argument.trim()),
                None => (rest, ""),
            };
            if tag.is_empty() {
                return None;
            }
            Some(Directive {
                tag: tag.to_string(),
                argument: argument.to_string(),
            })
        })
        .collect()
}

impl Directive {
    pub fn new(tag: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            argument: argument.into(),
        }
    }

    /// The refinement call for this directive, if the tag is known and its
    /// argument is well formed.
    pub fn refinement(&self) -> Option<Call> {
        let Some((_, refine)) = REFINEMENTS.iter().find(|(tag, _)| *tag == self.tag) else {
            tracing::debug!(tag = %self.tag, "no refinement for directive");
            return None;
        };
        let call = refine(self.argument.trim());
        if call.is_none() {
            tracing::debug!(
                tag = %self.tag,
                argument = %self.argument,
                "ignoring malformed directive"
            );
        }
        call
    }
}

/// Refinement calls for a directive list, in directive order.
pub fn refinements(directives: &[Directive]) -> Vec<Call> {
    directives.iter().filter_map(Directive::refinement).collect()
}

fn format(argument: &str) -> Option<Call> {
    let method = match argument {
        "email" => "email",
        "uri" | "url" => "url",
        "uuid" => "uuid",
        "cuid" => "cuid",
        "date-time" => "datetime",
        _ => return None,
    };
    Some(Call::bare(method))
}

fn pattern(argument: &str) -> Option<Call> {
    // A dangling backslash would escape the closing `/` of the regex literal.
    let trailing_backslashes = argument.chars().rev().take_while(|&c| c == '\\').count();
    if argument.is_empty() || trailing_backslashes % 2 == 1 {
        return None;
    }
    Some(Call::new(
        "regex",
        vec![Arg::Pattern(Pattern::raw(argument))],
    ))
}

fn minimum(argument: &str) -> Option<Call> {
    number_bound("min", argument)
}

fn maximum(argument: &str) -> Option<Call> {
    number_bound("max", argument)
}

fn min_length(argument: &str) -> Option<Call> {
    length_bound("min", argument)
}

fn max_length(argument: &str) -> Option<Call> {
    length_bound("max", argument)
}

fn number_bound(method: &'static str, argument: &str) -> Option<Call> {
    // f64 parsing accepts "inf" and "NaN"; neither is a usable bound.
    let value: f64 = argument.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(Call::new(method, vec![Arg::Number(argument.to_string())]))
}

fn length_bound(method: &'static str, argument: &str) -> Option<Call> {
    let value: u64 = argument.parse().ok()?;
    Some(Call::new(method, vec![Arg::Number(value.to_string())]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn methods(comment: &str) -> Vec<&'static str> {
        refinements(&extract_directives(comment))
            .iter()
            .map(|call| call.name)
            .collect()
    }

    #[test]
    fn extracts_tags_in_order() {
        let directives = extract_directives(
            "/**\n * The name of the hero.\n *\n * @minLength 2\n * @maxLength 50\n */",
        );
        assert_eq!(
            directives,
            vec![
                Directive::new("minLength", "2"),
                Directive::new("maxLength", "50"),
            ]
        );
    }

    #[test]
    fn single_line_comment() {
        assert_eq!(
            extract_directives("/** @format email */"),
            vec![Directive::new("format", "email")]
        );
    }

    #[test]
    fn keeps_argument_raw() {
        let directives = extract_directives("/**\n * @pattern ^([+]?d{1,2}[-s]?|)d{3}$\n */");
        assert_eq!(directives[0].argument, "^([+]?d{1,2}[-s]?|)d{3}$");
    }

    #[test]
    fn format_variants() {
        assert_eq!(methods("/** @format email */"), vec!["email"]);
        assert_eq!(methods("/** @format uri */"), vec!["url"]);
        assert_eq!(methods("/** @format url */"), vec!["url"]);
        assert_eq!(methods("/** @format uuid */"), vec!["uuid"]);
        assert_eq!(methods("/** @format date-time */"), vec!["datetime"]);
        assert!(methods("/** @format phone */").is_empty());
    }

    #[test]
    fn numeric_bounds() {
        let calls = refinements(&extract_directives("/**\n * @minimum 0\n * @maximum 1.5\n */"));
        assert_eq!(
            calls,
            vec![
                Call::new("min", vec![Arg::Number("0".into())]),
                Call::new("max", vec![Arg::Number("1.5".into())]),
            ]
        );
    }

    #[test]
    fn malformed_and_unknown_tags_are_dropped() {
        let comment = "/**\n * @secret\n * @format\n * @pattern\n * @maximum infinity\n * @minimum NaN\n * @minLength -1\n * @default true\n */";
        assert_eq!(extract_directives(comment).len(), 7);
        assert!(methods(comment).is_empty());
    }

    #[test]
    fn pattern_with_dangling_backslash() {
        assert!(methods(r"/** @pattern abc\ */").is_empty());
        assert!(methods(r"/** @pattern abc\\\ */").is_empty());
        assert_eq!(methods(r"/** @pattern abc\\ */"), vec!["regex"]);
        assert_eq!(methods(r"/** @pattern ^\d+$ */"), vec!["regex"]);
    }

    #[test]
    fn misspelled_length_tags() {
        assert_eq!(
            methods("/**\n * @minLenght 2\n * @maxLenght 50\n */"),
            vec!["min", "max"]
        );
    }

    #[test]
    fn prose_without_tags() {
        assert!(extract_directives("/** My super power */").is_empty());
    }
}
