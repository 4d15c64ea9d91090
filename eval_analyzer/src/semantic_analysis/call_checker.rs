//! Validation of built-in calls: arity, cast targets, argument homogeneity
//! and return type against the declared variable type

use super::calls::extract_all_calls;
use super::inference::infer_expr_type;
use super::types::{
    lookup_function, requires_homogeneous_arguments, DiagnosticSink, EvalType, ReturnKind,
    SymbolTable,
};
use crate::grammar::ast::Type;
use crate::log_debug;

/// Check every call in `expr`, nested calls included
///
/// `declared` is the type of the variable receiving the value, if any. Return
/// type checks only apply to calls named like the outermost call.
pub fn validate_function_calls(
    expr: &str,
    line: u32,
    declared: Option<EvalType>,
    symbols: &SymbolTable,
    sink: &mut DiagnosticSink,
) {
    let calls = extract_all_calls(expr);
    let Some(outermost) = calls.first().map(|call| call.name.clone()) else {
        return;
    };

    log_debug!("Validating function calls",
        "line" => line,
        "calls" => calls.len(),
        "outermost" => outermost);

    for call in &calls {
        let name = call.name.as_str();
        if Type::parse(name).is_some() {
            continue;
        }

        let Some(signature) = lookup_function(name) else {
            sink.warning(
                line,
                format!("Unknown function '{}' — is this a built-in or typo?", name),
            );
            continue;
        };

        let arg_count = call.args.len();
        if arg_count < signature.min_args {
            sink.error(
                line,
                format!(
                    "Function '{}' expects at least {} argument(s), got {}",
                    name, signature.min_args, arg_count
                ),
            );
            continue;
        }
        if let Some(max_args) = signature.max_args {
            if arg_count > max_args {
                sink.error(
                    line,
                    format!(
                        "Function '{}' expects at most {} argument(s), got {}",
                        name, max_args, arg_count
                    ),
                );
                continue;
            }
        }

        let is_outermost = name == outermost;

        if name == "cast" && arg_count == 2 {
            check_cast_target(&call.args[1], line, declared, is_outermost, sink);
            continue;
        }

        if requires_homogeneous_arguments(name) && arg_count >= 1 {
            check_homogeneous_arguments(
                name,
                &call.args,
                signature.return_kind,
                line,
                declared.filter(|_| is_outermost),
                symbols,
                sink,
            );
        }

        if is_outermost
            && signature.return_kind == ReturnKind::FixedFloat
            && declared == Some(Type::Int)
        {
            sink.error(
                line,
                format!(
                    "Function '{0}' always returns 'float', but variable is declared as 'int' — change the variable type to 'float' or wrap with cast({0}(...), int)",
                    name
                ),
            );
        }
    }
}

fn check_cast_target(
    target: &str,
    line: u32,
    declared: Option<EvalType>,
    is_outermost: bool,
    sink: &mut DiagnosticSink,
) {
    let target = target.trim();
    match Type::parse(target) {
        None => sink.error(
            line,
            format!(
                "Invalid cast target type '{}' — expected 'int' or 'float'",
                target
            ),
        ),
        Some(target_type) => {
            if let Some(declared) = declared {
                if is_outermost && target_type.is_numeric() && target_type != declared {
                    sink.error(
                        line,
                        format!(
                            "Cast type '{}' does not match declared variable type '{}' — use cast(expr, {})",
                            target, declared, declared
                        ),
                    );
                }
            }
        }
    }
}

/// `declared` is only set when the call is the outermost one
fn check_homogeneous_arguments(
    name: &str,
    args: &[String],
    return_kind: ReturnKind,
    line: u32,
    declared: Option<EvalType>,
    symbols: &SymbolTable,
    sink: &mut DiagnosticSink,
) {
    let arg_types: Vec<Option<EvalType>> =
        args.iter().map(|arg| infer_expr_type(arg, symbols)).collect();
    let mut known = arg_types.iter().flatten();
    let Some(&first_type) = known.next() else {
        return;
    };

    if known.any(|ty| *ty != first_type) {
        let summary = args
            .iter()
            .zip(&arg_types)
            .map(|(arg, ty)| {
                format!(
                    "'{}' ({})",
                    arg.trim(),
                    ty.map(|t| t.as_str()).unwrap_or("unknown")
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        sink.error(
            line,
            format!(
                "Function '{}' requires all arguments to be the same type, but received mixed types: {}. Use cast() to convert arguments to a common type.",
                name, summary
            ),
        );
        return;
    }

    let Some(declared) = declared else {
        return;
    };
    let return_type = match return_kind {
        ReturnKind::FixedFloat => Some(Type::Float),
        ReturnKind::FixedInt => Some(Type::Int),
        ReturnKind::FirstArgument => Some(first_type),
        ReturnKind::CastTarget | ReturnKind::Void => None,
    };

    if return_type == Some(Type::Float) && declared == Type::Int {
        sink.error(
            line,
            format!(
                "Function '{}' with '{}' arguments returns 'float', but variable is declared as 'int' — change the variable type to 'float' or cast the result",
                name, first_type
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;

    fn check(expr: &str, declared: Option<EvalType>) -> Vec<Diagnostic> {
        let mut symbols = SymbolTable::new();
        symbols.declare("i", Type::Int);
        symbols.declare("f", Type::Float);
        let mut sink = DiagnosticSink::new();
        validate_function_calls(expr, 1, declared, &symbols, &mut sink);
        sink.into_diagnostics()
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_unknown_function_warns() {
        let diagnostics = check("floor(f)", None);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_warning());
        assert_eq!(
            diagnostics[0].message,
            "Unknown function 'floor' — is this a built-in or typo?"
        );
    }

    #[test]
    fn test_arity_errors() {
        let diagnostics = check("pow(2.0)", None);
        assert_eq!(
            messages(&diagnostics),
            vec!["Function 'pow' expects at least 2 argument(s), got 1"]
        );

        let diagnostics = check("sqrt(1.0, 2.0)", None);
        assert_eq!(
            messages(&diagnostics),
            vec!["Function 'sqrt' expects at most 1 argument(s), got 2"]
        );

        assert!(check("print(1, 2, 3, 4)", None).is_empty());
    }

    #[test]
    fn test_type_keyword_calls_are_skipped() {
        assert!(check("int(f)", None).is_empty());
    }

    #[test]
    fn test_invalid_cast_target() {
        let diagnostics = check("print(cast(f, number))", None);
        assert_eq!(
            messages(&diagnostics),
            vec!["Invalid cast target type 'number' — expected 'int' or 'float'"]
        );
    }

    #[test]
    fn test_cast_mismatch_only_for_outermost() {
        let diagnostics = check("cast(f, float)", Some(Type::Int));
        assert_eq!(
            messages(&diagnostics),
            vec!["Cast type 'float' does not match declared variable type 'int' — use cast(expr, int)"]
        );

        assert!(check("abs(cast(i, float))", Some(Type::Float)).is_empty());
    }

    #[test]
    fn test_mixed_argument_types() {
        let diagnostics = check("min(i, f)", None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Function 'min' requires all arguments to be the same type, but received mixed types: 'i' (int), 'f' (float). Use cast() to convert arguments to a common type."
        );
    }

    #[test]
    fn test_unknown_argument_types_are_not_mixed() {
        assert!(check("max(i, z)", None).is_empty());
    }

    #[test]
    fn test_first_argument_return_against_int() {
        let diagnostics = check("max(f, 2.5)", Some(Type::Int));
        assert_eq!(
            messages(&diagnostics),
            vec!["Function 'max' with 'float' arguments returns 'float', but variable is declared as 'int' — change the variable type to 'float' or cast the result"]
        );
        assert!(check("max(i, 2)", Some(Type::Float)).is_empty());
    }

    #[test]
    fn test_fixed_float_into_int_reports_both_rules() {
        let diagnostics = check("sqrt(16)", Some(Type::Int));
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains("with 'int' arguments returns 'float'"));
        assert_eq!(
            diagnostics[1].message,
            "Function 'sqrt' always returns 'float', but variable is declared as 'int' — change the variable type to 'float' or wrap with cast(sqrt(...), int)"
        );
    }

    #[test]
    fn test_round_into_float_is_fine() {
        assert!(check("round(f)", Some(Type::Float)).is_empty());
    }
}
