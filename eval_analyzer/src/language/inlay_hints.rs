//! Parameter-name inlay hints for built-in calls

use crate::utils::patterns::cached;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterHint {
    pub name: &'static str,
    pub ty: &'static str,
}

const fn param(name: &'static str, ty: &'static str) -> ParameterHint {
    ParameterHint { name, ty }
}

static PARAMETER_HINTS: [(&str, &[ParameterHint]); 7] = [
    ("cast", &[param("value", "int | float"), param("target", "type")]),
    ("pow", &[param("base", "float"), param("exp", "float")]),
    ("sqrt", &[param("value", "float")]),
    ("min", &[param("a", "int | float"), param("b", "int | float")]),
    ("max", &[param("a", "int | float"), param("b", "int | float")]),
    ("round", &[param("value", "float")]),
    ("print", &[param("...values", "any")]),
];

pub fn parameters_of(function: &str) -> Option<&'static [ParameterHint]> {
    PARAMETER_HINTS
        .iter()
        .find(|(name, _)| *name == function)
        .map(|(_, params)| *params)
}

/// Hint rendered before an argument as `name: type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlayHint {
    pub line: u32,
    pub column: u32,
    pub label: String,
}

fn line_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"//.*$")
}

fn simple_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\b(\w+)\s*\(([^)]*)\)")
}

/// Split on depth-0 commas without trimming
///
/// An all-blank argument list yields no arguments.
fn split_raw_args(raw: &[char]) -> Vec<&[char]> {
    let mut args = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;

    for (i, ch) in raw.iter().enumerate() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                args.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    let last = &raw[start..];
    if !args.is_empty() || last.iter().any(|c| !c.is_whitespace()) {
        args.push(last);
    }
    args
}

/// Char offset where argument `index` begins within `raw`
fn argument_offset(raw: &[char], index: usize) -> usize {
    let mut depth = 0i32;
    let mut current = 0usize;

    for (i, ch) in raw.iter().enumerate() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            _ => {}
        }
        if current == index {
            return i;
        }
        if *ch == ',' && depth == 0 {
            current += 1;
        }
    }
    0
}

/// Hints for one line; columns count characters
pub fn hints_for_line(line: u32, line_text: &str) -> Vec<InlayHint> {
    let stripped = line_comment().replace(line_text, "");
    let mut hints = Vec::new();

    for caps in simple_call().captures_iter(&stripped) {
        let (Some(whole), Some(name), Some(args)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(params) = parameters_of(name.as_str()) else {
            continue;
        };
        let Some(paren_byte) = whole.as_str().find('(') else {
            continue;
        };
        let paren_index = stripped[..whole.start() + paren_byte].chars().count();

        let raw: Vec<char> = args.as_str().chars().collect();
        for index in 0..split_raw_args(&raw).len() {
            let param = params[index.min(params.len() - 1)];
            let offset = argument_offset(&raw, index);
            hints.push(InlayHint {
                line,
                column: (paren_index + 1 + offset + 2) as u32,
                label: format!("{}: {}", param.name, param.ty),
            });
        }
    }

    hints
}

/// Hints for every line of `text`
pub fn inlay_hints(text: &str) -> Vec<InlayHint> {
    text.split('\n')
        .enumerate()
        .flat_map(|(i, line)| hints_for_line(i as u32 + 1, line.trim_end_matches('\r')))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_split_raw_args() {
        let raw = chars("pow(x, 2), y");
        let args: Vec<String> = split_raw_args(&raw)
            .into_iter()
            .map(|a| a.iter().collect())
            .collect();
        assert_eq!(args, vec!["pow(x, 2)", " y"]);
        assert!(split_raw_args(&chars("  ")).is_empty());
        assert_eq!(split_raw_args(&chars("a,")).len(), 2);
    }

    #[test]
    fn test_argument_offset() {
        let raw = chars("x, 2");
        assert_eq!(argument_offset(&raw, 0), 0);
        assert_eq!(argument_offset(&raw, 1), 2);
        assert_eq!(argument_offset(&raw, 5), 0);
    }

    #[test]
    fn test_pow_hints() {
        let hints = hints_for_line(2, "float r = pow(x, 2)");
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0].label, "base: float");
        assert_eq!(hints[0].column, 16);
        assert_eq!(hints[0].line, 2);
        assert_eq!(hints[1].label, "exp: float");
        assert_eq!(hints[1].column, 18);
    }

    #[test]
    fn test_variadic_print_reuses_last_parameter() {
        let hints = hints_for_line(1, "print(a, b, c)");
        assert_eq!(hints.len(), 3);
        assert!(hints.iter().all(|h| h.label == "...values: any"));
    }

    #[test]
    fn test_unknown_and_commented_calls_get_no_hints() {
        assert!(hints_for_line(1, "floor(2.5)").is_empty());
        assert!(hints_for_line(1, "int x = 1 // sqrt(x)").is_empty());
        assert!(hints_for_line(1, "print()").is_empty());
    }

    #[test]
    fn test_hints_across_lines() {
        let hints = inlay_hints("int a = 1\r\nfloat b = sqrt(a)\n");
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].line, 2);
        assert_eq!(hints[0].label, "value: float");
    }
}
