//! Signature help for calls being typed

use crate::utils::patterns::cached;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Characters that should (re)open signature help
pub const TRIGGER_CHARACTERS: [char; 2] = ['(', ','];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterInformation {
    pub label: &'static str,
    pub documentation: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignatureInformation {
    pub label: &'static str,
    pub documentation: &'static str,
    pub parameters: &'static [ParameterInformation],
}

static SIGNATURES: [(&str, SignatureInformation); 3] = [
    (
        "pow",
        SignatureInformation {
            label: "pow(base: number, exponent: number) → float",
            documentation: "Raises base to the power of exponent.",
            parameters: &[
                ParameterInformation {
                    label: "base",
                    documentation: "Base value",
                },
                ParameterInformation {
                    label: "exponent",
                    documentation: "Exponent value",
                },
            ],
        },
    ),
    (
        "cast",
        SignatureInformation {
            label: "cast(value: any, type: type) → any",
            documentation: "Explicitly converts a value to a type.",
            parameters: &[
                ParameterInformation {
                    label: "value",
                    documentation: "Value to convert",
                },
                ParameterInformation {
                    label: "type",
                    documentation: "Target type",
                },
            ],
        },
    ),
    (
        "sqrt",
        SignatureInformation {
            label: "sqrt(value: number) → float",
            documentation: "Returns the square root of a number.",
            parameters: &[ParameterInformation {
                label: "value",
                documentation: "Input number",
            }],
        },
    ),
];

pub fn signature_of(function: &str) -> Option<&'static SignatureInformation> {
    SIGNATURES
        .iter()
        .find(|(name, _)| *name == function)
        .map(|(_, signature)| signature)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignatureHelp {
    pub signature: &'static SignatureInformation,
    pub active_parameter: usize,
}

fn open_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"(\w+)\s*\(([^)]*)$")
}

/// Help for the leftmost call left open at the end of `text_before_cursor`
///
/// The active parameter is the number of commas typed so far, nested or not.
pub fn signature_help(text_before_cursor: &str) -> Option<SignatureHelp> {
    let caps = open_call().captures(text_before_cursor)?;
    let signature = signature_of(&caps[1])?;
    Some(SignatureHelp {
        signature,
        active_parameter: caps[2].matches(',').count(),
    })
}
