use eval_analyzer::code_actions::CodeAction;
use eval_analyzer::diagnostics::EditorMarker;
use eval_analyzer::grammar::ast::TreePrinter;
use eval_analyzer::pipeline::{self, AnalysisReport, PipelineError};
use eval_analyzer::{code_actions_for, logging};
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize global logging system
    logging::init_global_logging()?;

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <input.evl> [--json] [--actions] [--tree]", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return Ok(());
    }

    let options = parse_options(&args[2..]);
    let source = match load_source(&args[1]) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error[{}]: {}", error.error_code(), error);
            std::process::exit(1);
        }
    };

    let report = pipeline::analyze_source(&source);
    let actions = if options.actions {
        code_actions_for(&report.semantic_diagnostics, &source, None, 1)
    } else {
        Vec::new()
    };

    if options.json {
        let output = JsonOutput {
            file: &args[1],
            markers: report.markers(),
            actions: options.actions.then_some(&actions),
            tree: options.tree.then_some(&report.tree),
            token_count: report.token_count,
            node_count: report.node_count,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&args[1], &report, &actions, options.tree);
    }

    if report.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliOptions {
    json: bool,
    actions: bool,
    tree: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    file: &'a str,
    markers: Vec<EditorMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    actions: Option<&'a Vec<CodeAction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<&'a eval_analyzer::grammar::ast::Program>,
    token_count: usize,
    node_count: usize,
}

fn print_help(program_name: &str) {
    println!("EVAL Analyzer v{}", env!("CARGO_PKG_VERSION"));
    println!("Static analysis for EVAL programs: syntax, semantics and quick fixes");
    println!();
    println!("USAGE:");
    println!("    {} <input.evl> [options]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help       Show this help message");
    println!("    --json       Print markers (and requested extras) as JSON");
    println!("    --actions    List quick fixes for each finding");
    println!("    --tree       Print the parse tree");
    println!();
    println!("EXIT STATUS:");
    println!("    0 when no error-severity diagnostics were found, 1 otherwise");
    println!();

    let pipeline_info = pipeline::get_pipeline_info();
    println!("PIPELINE:");
    for line in pipeline_info.report().lines() {
        println!("    {}", line);
    }
}

fn parse_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions::default();
    for arg in args {
        match arg.as_str() {
            "--json" => options.json = true,
            "--actions" => options.actions = true,
            "--tree" => options.tree = true,
            other => eprintln!("Warning: Unknown option '{}'", other),
        }
    }
    options
}

fn load_source(path: &str) -> Result<String, PipelineError> {
    pipeline::check_source_path(Path::new(path))?;
    std::fs::read_to_string(path).map_err(|source| PipelineError::file_read(path, source))
}

/// One cargo-style block per marker
fn render_marker(file: &str, marker: &EditorMarker) -> String {
    format!(
        "{}: {}\n  --> {}:{}:{}\n  = source: {}",
        marker.severity, marker.message, file, marker.start_line, marker.start_column, marker.source
    )
}

fn render_action(action: &CodeAction) -> String {
    let marker = if action.is_preferred { "*" } else { "-" };
    match action.edits.first() {
        Some(edit) => format!("  {} {} [{}] at {}", marker, action.title, action.kind.as_str(), edit.range),
        None => format!("  {} {} [{}]", marker, action.title, action.kind.as_str()),
    }
}

fn print_report(file: &str, report: &AnalysisReport, actions: &[CodeAction], show_tree: bool) {
    for marker in report.markers() {
        println!("{}", render_marker(file, &marker));
        println!();
    }

    if !actions.is_empty() {
        println!("Available fixes:");
        for action in actions {
            println!("{}", render_action(action));
        }
        println!();
    }

    if show_tree {
        println!("{}", TreePrinter::render(&report.tree));
    }

    let status = if report.has_errors() { "FAILED" } else { "OK" };
    println!(
        "{}: {} error(s), {} warning(s); {} tokens, {} nodes in {:.2}ms",
        status,
        report.error_count(),
        report.warning_count(),
        report.token_count,
        report.node_count,
        report.processing_duration.as_secs_f64() * 1000.0
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use eval_analyzer::Diagnostic;
    use std::io::Write;

    #[test]
    fn test_parse_options() {
        let args = vec![
            "--json".to_string(),
            "--tree".to_string(),
            "--unknown-option".to_string(),
        ];
        let options = parse_options(&args);
        assert!(options.json);
        assert!(options.tree);
        assert!(!options.actions);
    }

    #[test]
    fn test_load_source_from_file() {
        let mut file = tempfile::Builder::new().suffix(".evl").tempfile().unwrap();
        writeln!(file, "int x = 1").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let source = load_source(&path).unwrap();
        assert_eq!(source, "int x = 1\n");
        assert!(pipeline::analyze_source(&source).is_clean());
    }

    #[test]
    fn test_load_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.evl");
        assert_matches!(
            load_source(missing.to_str().unwrap()),
            Err(PipelineError::FileRead { .. })
        );

        let other = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert_matches!(
            load_source(other.path().to_str().unwrap()),
            Err(PipelineError::UnsupportedExtension { .. })
        );
    }

    #[test]
    fn test_render_marker() {
        let marker = EditorMarker::from(&Diagnostic::error(3, "Division by zero detected"));
        assert_eq!(
            render_marker("prog.evl", &marker),
            "error: Division by zero detected\n  --> prog.evl:3:1\n  = source: EVAL Analyzer"
        );
    }

    #[test]
    fn test_render_action() {
        let diagnostic = Diagnostic::warning(1, "Variable 'x' declared but never assigned");
        let actions = code_actions_for(&[diagnostic], "int x", None, 1);
        assert_eq!(
            render_action(&actions[0]),
            "  * Assign default value to 'x' (0) [quickfix] at 1:1-1:6"
        );
    }
}
