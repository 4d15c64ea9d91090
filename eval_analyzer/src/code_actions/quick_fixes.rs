//! Quick fixes derived from validator diagnostic messages
//!
//! Each rule keys on a substring of the message, pulls names and types back
//! out of the message text and rewrites the diagnostic's line.

use super::types::{CodeAction, Range};
use crate::config::constants::{PLACEHOLDER_VARIABLE, WRAP_INDENT};
use crate::diagnostics::Diagnostic;
use crate::utils::patterns::{cached, with_escaped};
use regex::{NoExpand, Regex};
use std::sync::OnceLock;

// === MESSAGE EXTRACTORS ===

fn variable_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"[Vv]ariable '(\w+)'")
}

fn identifier_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"identifier '(\w+)'")
}

fn function_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"[Ff]unction '(\w+)'")
}

fn invalid_cast_type() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"cast target type '(\w+)'")
}

fn cast_type_mismatch() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"Cast type '(\w+)' does not match declared variable type '(\w+)'",
    )
}

fn float_literal_fix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"use (\d+\.\d+) instead of (\d+)")
}

fn return_type_mismatch() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"returns '(\w+)'.*declared as '(\w+)'")
}

fn capture<'m>(re: &Regex, message: &'m str) -> Option<&'m str> {
    re.captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// === LINE REWRITE PATTERNS ===

fn assigned_value() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"=\s*(.+)$")
}

fn assignment_tail() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"=\s*.+$")
}

fn existing_cast() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^cast\s*\((.+),\s*\w+\s*\)$")
}

fn numeric_declaration_type() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(\s*(?:const\s+)?)(int|float)(\s+)")
}

fn starts_with_cast() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^cast\s*\(")
}

fn nameless_declaration() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(\s*(?:const\s+)?(?:int|float|string|bool))\s*=")
}

fn cast_argument_pattern(bad_type: &str) -> Option<Regex> {
    with_escaped(r"(cast\s*\([^,]+,\s*){}(\s*\))", &[bad_type])
}

fn default_value(ty: &str) -> &'static str {
    if ty == "float" {
        "0.0"
    } else {
        "0"
    }
}

// === RULES ===

/// Collects the fixes for one diagnostic on one line
pub struct FixBuilder<'a> {
    diagnostic: &'a Diagnostic,
    line: &'a str,
    version: u64,
    actions: Vec<CodeAction>,
}

impl<'a> FixBuilder<'a> {
    pub fn new(diagnostic: &'a Diagnostic, line: &'a str, version: u64) -> Self {
        Self {
            diagnostic,
            line,
            version,
            actions: Vec::new(),
        }
    }

    /// Run every rule whose trigger appears in the message
    pub fn build(mut self) -> Vec<CodeAction> {
        let diagnostic = self.diagnostic;
        let message = diagnostic.message.as_str();

        if message.contains("declared but never assigned") {
            self.assign_default_value(message);
        }
        if message.contains("must be initialised with a float literal") {
            self.use_float_literal(message);
        }
        if message.contains("already declared") {
            self.remove_duplicate(message);
        }
        if message.contains("implicit conversion") && !message.contains("Cast type") {
            self.cast_to_int();
        }
        if message.contains("Cast type") && message.contains("does not match declared variable type")
        {
            self.fix_cast_mismatch(message);
        }
        if (message.contains("always returns") || message.contains("arguments returns"))
            && message.contains("but variable is declared as")
        {
            self.fix_return_mismatch(message);
        }
        if message.contains("requires all arguments to be the same type") {
            self.cast_all_arguments(message);
        }
        if message.contains("Division by zero") {
            self.wrap_in_try_catch();
        }
        if message.contains("undeclared identifier") {
            self.declare_identifier(message);
        }
        if message.contains("Invalid cast target type") {
            self.replace_invalid_cast_type(message);
        }
        if message.contains("expects") && message.contains("argument(s)") {
            self.show_signature(message);
        }
        if message.contains("missing a name") {
            self.add_placeholder_name();
        }

        self.actions
    }

    fn replace_line(&mut self, title: String, text: String, preferred: bool) {
        let action = CodeAction::quick_fix(title, self.diagnostic)
            .with_edit(
                Range::whole_line(self.diagnostic.line, self.line),
                text,
                self.version,
            )
            .preferred(preferred);
        self.actions.push(action);
    }

    fn assign_default_value(&mut self, message: &str) {
        let Some(name) = capture(variable_name(), message) else {
            return;
        };
        let value = if self.line.trim_start().starts_with("float") {
            "0.0"
        } else {
            "0"
        };
        self.replace_line(
            format!("Assign default value to '{}' ({})", name, value),
            format!("{} = {}", self.line.trim_end(), value),
            true,
        );
    }

    fn use_float_literal(&mut self, message: &str) {
        let Some(caps) = float_literal_fix().captures(message) else {
            return;
        };
        let (float_value, int_value) = (&caps[1], &caps[2]);
        let Some(trailing_int) = with_escaped(r"\b{}\b\s*$", &[int_value]) else {
            return;
        };
        let fixed = trailing_int.replace(self.line, NoExpand(float_value)).into_owned();
        self.replace_line(
            format!("Change {} to {}", int_value, float_value),
            fixed,
            true,
        );
    }

    fn remove_duplicate(&mut self, message: &str) {
        let title = match capture(variable_name(), message) {
            Some(name) => format!("Remove duplicate declaration of '{}'", name),
            None => "Remove duplicate declaration".to_string(),
        };
        let action = CodeAction::quick_fix(title, self.diagnostic)
            .with_edit(
                Range::line_with_break(self.diagnostic.line),
                "",
                self.version,
            )
            .preferred(true);
        self.actions.push(action);
    }

    fn cast_to_int(&mut self) {
        let Some(caps) = assigned_value().captures(self.line) else {
            return;
        };
        let rhs = caps[1].trim();

        let (title, replacement) = match existing_cast().captures(rhs) {
            Some(cast) => ("Fix cast type to 'int'", format!("= cast({}, int)", &cast[1])),
            None => ("Add explicit cast to int", format!("= cast({}, int)", rhs)),
        };
        let fixed = assignment_tail()
            .replace(self.line, NoExpand(&replacement))
            .into_owned();
        self.replace_line(title.to_string(), fixed, true);
    }

    fn fix_cast_mismatch(&mut self, message: &str) {
        let Some(caps) = cast_type_mismatch().captures(message) else {
            return;
        };
        let (bad_type, correct_type) = (&caps[1], &caps[2]);

        if let Some(pattern) = cast_argument_pattern(bad_type) {
            let fixed = pattern
                .replace(self.line, format!("${{1}}{}${{2}}", correct_type).as_str())
                .into_owned();
            if fixed != self.line {
                self.replace_line(
                    format!(
                        "Fix cast type to match variable type ('{}')",
                        correct_type
                    ),
                    fixed,
                    true,
                );
            }
        }

        let fixed = numeric_declaration_type()
            .replace(self.line, format!("${{1}}{}${{3}}", bad_type).as_str())
            .into_owned();
        if fixed != self.line {
            self.replace_line(
                format!("Change variable type to '{}' to match cast", bad_type),
                fixed,
                false,
            );
        }
    }

    fn fix_return_mismatch(&mut self, message: &str) {
        let Some(caps) = return_type_mismatch().captures(message) else {
            return;
        };
        let (return_type, declared_type) = (&caps[1], &caps[2]);

        let fixed = numeric_declaration_type()
            .replace(self.line, format!("${{1}}{}${{3}}", return_type).as_str())
            .into_owned();
        if fixed != self.line {
            self.replace_line(
                format!(
                    "Change variable type to '{}' to match function return",
                    return_type
                ),
                fixed,
                true,
            );
        }

        if let Some(value) = assigned_value().captures(self.line) {
            let replacement = format!("= cast({}, {})", value[1].trim(), declared_type);
            let fixed = assignment_tail()
                .replace(self.line, NoExpand(&replacement))
                .into_owned();
            self.replace_line(format!("Cast result to '{}'", declared_type), fixed, false);
        }
    }

    fn cast_all_arguments(&mut self, message: &str) {
        let Some(name) = capture(function_name(), message) else {
            return;
        };
        let Some(call) = with_escaped(r"{}\s*\(([^)]+)\)", &[name]) else {
            return;
        };
        let Some(args) = call.captures(self.line).map(|caps| caps[1].to_string()) else {
            return;
        };

        for target in ["int", "float"] {
            let wrapped = args
                .split(',')
                .map(|arg| {
                    let arg = arg.trim();
                    if starts_with_cast().is_match(arg) {
                        arg.to_string()
                    } else {
                        format!("cast({}, {})", arg, target)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            let replacement = format!("{}({})", name, wrapped);
            let fixed = call.replace(self.line, NoExpand(&replacement)).into_owned();
            self.replace_line(
                format!("Cast all arguments to '{}'", target),
                fixed,
                target == "float",
            );
        }
    }

    fn wrap_in_try_catch(&mut self) {
        let wrapped = format!(
            "try {{\n{indent}{}\n}} catch (e) {{\n{indent}print(\"Error: Division by zero!\")\n}}",
            self.line.trim(),
            indent = WRAP_INDENT
        );
        self.replace_line("Wrap in try/catch block".to_string(), wrapped, true);
    }

    fn declare_identifier(&mut self, message: &str) {
        let Some(name) = capture(identifier_name(), message) else {
            return;
        };
        for ty in ["int", "float"] {
            let value = default_value(ty);
            let action = CodeAction::quick_fix(
                format!("Declare '{} {} = {}' above this line", ty, name, value),
                self.diagnostic,
            )
            .with_edit(
                Range::line_start(self.diagnostic.line),
                format!("{} {} = {}\n", ty, name, value),
                self.version,
            )
            .preferred(ty == "int");
            self.actions.push(action);
        }
    }

    fn replace_invalid_cast_type(&mut self, message: &str) {
        let Some(bad_type) = capture(invalid_cast_type(), message) else {
            return;
        };
        let Some(pattern) = cast_argument_pattern(bad_type) else {
            return;
        };
        for target in ["int", "float"] {
            let fixed = pattern
                .replace(self.line, format!("${{1}}{}${{2}}", target).as_str())
                .into_owned();
            self.replace_line(
                format!("Replace invalid cast type with '{}'", target),
                fixed,
                target == "int",
            );
        }
    }

    fn show_signature(&mut self, message: &str) {
        if let Some(name) = capture(function_name(), message) {
            self.actions.push(CodeAction::quick_fix(
                format!("View correct signature for '{}' in documentation", name),
                self.diagnostic,
            ));
        }
    }

    fn add_placeholder_name(&mut self) {
        let replacement = format!("${{1}} {} =", PLACEHOLDER_VARIABLE);
        let fixed = nameless_declaration()
            .replace(self.line, replacement.as_str())
            .into_owned();
        self.replace_line(
            format!("Add placeholder variable name \"{}\"", PLACEHOLDER_VARIABLE),
            fixed,
            true,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_actions::types::ActionKind;

    fn fixes(message: &str, line: &str) -> Vec<CodeAction> {
        let diagnostic = Diagnostic::error(2, message);
        FixBuilder::new(&diagnostic, line, 7).build()
    }

    fn single_edit(action: &CodeAction) -> &str {
        assert_eq!(action.edits.len(), 1);
        &action.edits[0].text
    }

    #[test]
    fn test_assign_default_value() {
        let actions = fixes("Variable 'x' declared but never assigned", "int x  ");
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].title, "Assign default value to 'x' (0)");
        assert_eq!(single_edit(&actions[0]), "int x = 0");
        assert!(actions[0].is_preferred);
        assert_eq!(actions[0].kind, ActionKind::QuickFix);
        assert_eq!(actions[0].edits[0].range, Range::new(2, 1, 2, 8));
        assert_eq!(actions[0].edits[0].version, 7);

        let actions = fixes("Variable 'f' declared but never assigned", "  float f");
        assert_eq!(single_edit(&actions[0]), "  float f = 0.0");
    }

    #[test]
    fn test_float_literal() {
        let actions = fixes(
            "Float variable 'y' must be initialised with a float literal — use 20.0 instead of 20",
            "float y = 20",
        );
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].title, "Change 20 to 20.0");
        assert_eq!(single_edit(&actions[0]), "float y = 20.0");
    }

    #[test]
    fn test_remove_duplicate() {
        let actions = fixes("Variable 'x' is already declared", "int x = 2");
        assert_eq!(actions[0].title, "Remove duplicate declaration of 'x'");
        assert_eq!(actions[0].edits[0].range, Range::new(2, 1, 3, 1));
        assert_eq!(single_edit(&actions[0]), "");
    }

    #[test]
    fn test_implicit_conversion_wraps_rhs() {
        let actions = fixes(
            "Assigning float variable to 'int' variable 'x' — implicit conversion",
            "int x = y",
        );
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].title, "Add explicit cast to int");
        assert_eq!(single_edit(&actions[0]), "int x = cast(y, int)");
    }

    #[test]
    fn test_implicit_conversion_fixes_existing_cast() {
        let actions = fixes(
            "Expression evaluates to 'float' but variable 'x' is declared as 'int' — implicit conversion",
            "int x = cast(a + b, float)",
        );
        assert_eq!(actions[0].title, "Fix cast type to 'int'");
        assert_eq!(single_edit(&actions[0]), "int x = cast(a + b, int)");
    }

    #[test]
    fn test_cast_mismatch_offers_two_fixes() {
        let actions = fixes(
            "Cast type 'float' does not match declared variable type 'int' for 'g' — use cast(expr, int)",
            "int g = cast(y, float)",
        );
        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[0].title,
            "Fix cast type to match variable type ('int')"
        );
        assert_eq!(single_edit(&actions[0]), "int g = cast(y, int)");
        assert!(actions[0].is_preferred);
        assert_eq!(actions[1].title, "Change variable type to 'float' to match cast");
        assert_eq!(single_edit(&actions[1]), "float g = cast(y, float)");
        assert!(!actions[1].is_preferred);
    }

    #[test]
    fn test_return_mismatch_offers_two_fixes() {
        let actions = fixes(
            "Function 'sqrt' always returns 'float', but variable is declared as 'int' — change the variable type to 'float' or wrap with cast(sqrt(...), int)",
            "const int r = sqrt(16)",
        );
        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[0].title,
            "Change variable type to 'float' to match function return"
        );
        assert_eq!(single_edit(&actions[0]), "const float r = sqrt(16)");
        assert_eq!(actions[1].title, "Cast result to 'int'");
        assert_eq!(single_edit(&actions[1]), "const int r = cast(sqrt(16), int)");
        assert!(actions[0].is_preferred && !actions[1].is_preferred);
    }

    #[test]
    fn test_cast_all_arguments() {
        let actions = fixes(
            "Function 'min' requires all arguments to be the same type, but received mixed types: 'a' (int), 'b' (float). Use cast() to convert arguments to a common type.",
            "int c = min(a, b)",
        );
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].title, "Cast all arguments to 'int'");
        assert_eq!(single_edit(&actions[0]), "int c = min(cast(a, int), cast(b, int))");
        assert!(!actions[0].is_preferred);
        assert_eq!(actions[1].title, "Cast all arguments to 'float'");
        assert_eq!(
            single_edit(&actions[1]),
            "int c = min(cast(a, float), cast(b, float))"
        );
        assert!(actions[1].is_preferred);
    }

    #[test]
    fn test_wrap_in_try_catch() {
        let actions = fixes("Division by zero detected", "  int r = 100 / 0;");
        assert_eq!(actions[0].title, "Wrap in try/catch block");
        assert_eq!(
            single_edit(&actions[0]),
            "try {\n    int r = 100 / 0;\n} catch (e) {\n    print(\"Error: Division by zero!\")\n}"
        );
    }

    #[test]
    fn test_declare_identifier() {
        let actions = fixes("Reference to undeclared identifier 'count'", "int t = count");
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].title, "Declare 'int count = 0' above this line");
        assert_eq!(actions[0].edits[0].range, Range::line_start(2));
        assert_eq!(single_edit(&actions[0]), "int count = 0\n");
        assert!(actions[0].is_preferred);
        assert_eq!(single_edit(&actions[1]), "float count = 0.0\n");
        assert!(!actions[1].is_preferred);
    }

    #[test]
    fn test_replace_invalid_cast_type() {
        let actions = fixes(
            "Invalid cast target type 'number' — expected 'int' or 'float'",
            "int g = cast(y, number)",
        );
        assert_eq!(actions.len(), 2);
        assert_eq!(single_edit(&actions[0]), "int g = cast(y, int)");
        assert!(actions[0].is_preferred);
        assert_eq!(single_edit(&actions[1]), "int g = cast(y, float)");
    }

    #[test]
    fn test_signature_hint_has_no_edit() {
        let actions = fixes("Function 'pow' expects at least 2 argument(s), got 1", "pow(2.0)");
        assert_eq!(actions.len(), 1);
        assert_eq!(
            actions[0].title,
            "View correct signature for 'pow' in documentation"
        );
        assert!(!actions[0].has_edits());
    }

    #[test]
    fn test_placeholder_name() {
        let actions = fixes(
            "Variable declaration is missing a name (e.g. `int x = ...`)",
            "const float = 2.5",
        );
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].title, "Add placeholder variable name \"myVar\"");
        assert_eq!(single_edit(&actions[0]), "const float myVar = 2.5");
    }

    #[test]
    fn test_unrelated_message_yields_nothing() {
        assert!(fixes("Unrecognized statement: 'x'", "x").is_empty());
    }

    #[test]
    fn test_dollar_signs_in_line_are_literal() {
        let actions = fixes(
            "Assigning float variable to 'int' variable 'x' — implicit conversion",
            "int x = a$1",
        );
        assert_eq!(single_edit(&actions[0]), "int x = cast(a$1, int)");
    }
}
