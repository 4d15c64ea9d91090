//! Static editor-facing data: hover docs, completions, inlay and signature hints
//!
//! Nothing here depends on analysis results; every table is fixed at compile
//! time and every lookup is a pure function of its text arguments.

pub mod completion;
pub mod configuration;
pub mod hover;
pub mod inlay_hints;
pub mod signature_help;

pub use completion::{completion_items, completions_for_prefix, CompletionItem, CompletionKind};
pub use configuration::{language_configuration, LanguageConfiguration};
pub use hover::{hover_at, hover_doc, Hover};
pub use inlay_hints::{hints_for_line, inlay_hints, parameters_of, InlayHint, ParameterHint};
pub use signature_help::{
    signature_help, signature_of, SignatureHelp, SignatureInformation, TRIGGER_CHARACTERS,
};
