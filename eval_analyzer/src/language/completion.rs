//! Static completion items

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Keyword,
    Function,
    Constant,
    Operator,
}

/// One completion entry
///
/// When `is_snippet` is set, `insert_text` uses `${n:placeholder}` tab stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    pub label: &'static str,
    pub kind: CompletionKind,
    pub insert_text: &'static str,
    pub is_snippet: bool,
    pub documentation: &'static str,
}

const fn snippet(
    label: &'static str,
    kind: CompletionKind,
    insert_text: &'static str,
    documentation: &'static str,
) -> CompletionItem {
    CompletionItem {
        label,
        kind,
        insert_text,
        is_snippet: true,
        documentation,
    }
}

const fn plain(
    label: &'static str,
    kind: CompletionKind,
    documentation: &'static str,
) -> CompletionItem {
    CompletionItem {
        label,
        kind,
        insert_text: label,
        is_snippet: false,
        documentation,
    }
}

use CompletionKind::*;

static COMPLETION_ITEMS: [CompletionItem; 22] = [
    // Declarations
    snippet("int", Keyword, "int ${1:name} = ${2:value}", "Declare an integer variable"),
    snippet("float", Keyword, "float ${1:name} = ${2:value}", "Declare a floating-point variable"),
    snippet("const", Keyword, "const ${1:type} ${2:name} = ${3:value}", "Declare a constant value"),
    // Functions
    snippet("print", Function, "print(${1:value})", "Print values to standard output"),
    snippet("cast", Function, "cast(${1:value}, ${2:type})", "Explicitly cast a value to a type"),
    snippet("pow", Function, "pow(${1:base}, ${2:exponent})", "Raise a number to a power"),
    snippet("sqrt", Function, "sqrt(${1:value})", "Calculate square root"),
    snippet("min", Function, "min(${1:a}, ${2:b})", "Return the smaller value"),
    snippet("max", Function, "max(${1:a}, ${2:b})", "Return the larger value"),
    snippet("round", Function, "round(${1:value})", "Round a floating-point value"),
    // Constants
    plain("PI", Constant, "Mathematical constant π"),
    plain("DAYS_IN_WEEK", Constant, "Number of days in a week"),
    plain("HOURS_IN_DAY", Constant, "Number of hours in a day"),
    plain("YEAR", Constant, "Current year constant"),
    // Control flow
    snippet("try", Keyword, "try {\n\t${1:// code}\n}", "Begin a try block"),
    snippet("catch", Keyword, "catch {\n\t${1:// error handling}\n}", "Handle errors from a try block"),
    // Operators
    plain("+", Operator, "Operator +"),
    plain("-", Operator, "Operator -"),
    plain("*", Operator, "Operator *"),
    plain("/", Operator, "Operator /"),
    plain("%", Operator, "Operator %"),
    plain("=", Operator, "Operator ="),
];

pub fn completion_items() -> &'static [CompletionItem] {
    &COMPLETION_ITEMS
}

/// Items whose label starts with `prefix`; an empty prefix yields everything
pub fn completions_for_prefix(prefix: &str) -> impl Iterator<Item = &'static CompletionItem> + '_ {
    COMPLETION_ITEMS
        .iter()
        .filter(move |item| item.label.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_groups() {
        let items = completion_items();
        let count = |kind| items.iter().filter(|i| i.kind == kind).count();
        assert_eq!(count(Keyword), 5);
        assert_eq!(count(Function), 7);
        assert_eq!(count(Constant), 4);
        assert_eq!(count(Operator), 6);
    }

    #[test]
    fn test_snippets_and_plain_items() {
        let pow = completion_items().iter().find(|i| i.label == "pow").unwrap();
        assert!(pow.is_snippet);
        assert_eq!(pow.insert_text, "pow(${1:base}, ${2:exponent})");

        let year = completion_items().iter().find(|i| i.label == "YEAR").unwrap();
        assert!(!year.is_snippet);
        assert_eq!(year.insert_text, "YEAR");
    }

    #[test]
    fn test_prefix_filter() {
        let labels: Vec<_> = completions_for_prefix("c").map(|i| i.label).collect();
        assert_eq!(labels, vec!["const", "cast", "catch"]);
        assert_eq!(completions_for_prefix("").count(), 22);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&completion_items()[0]).unwrap();
        assert!(json.contains("\"kind\":\"keyword\""));
        assert!(json.contains("\"is_snippet\":true"));
    }
}
