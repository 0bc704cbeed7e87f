//! Error types and diagnostic reporting
//!
//! Every failure in this crate is fatal to the lowering pass that raised it.
//! The variants split into two families (see the crate docs): mismatches
//! between the CST shape and the lowering engine, and misuse of the
//! scope/namespace engine. Symbol-lookup misses are not errors and are
//! reported as `None` by the scope session instead.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;

use super::Span;

/// Fatal error raised by the lowering engine or the scope session.
#[derive(Error, Debug)]
pub enum LowerError {
    #[error("slot {slot} is out of range for {node}, which has {limit} slots")]
    SlotOutOfRange {
        node: String,
        slot: usize,
        limit: usize,
    },

    #[error("cannot attach a child to leaf node {node}")]
    AttachToLeaf { node: String },

    #[error("no target slot is defined for attaching {node} at this position")]
    NoTargetSlot { node: String },

    #[error("unmapped {category} operator '{token}'")]
    UnmappedOperator {
        category: &'static str,
        token: String,
        span: Span,
    },

    #[error("malformed CST in rule {rule}: {message}")]
    MalformedCst { rule: &'static str, message: String },

    #[error("namespace {namespace} is not defined for a {scope} scope")]
    UndefinedNamespace {
        namespace: &'static str,
        scope: &'static str,
    },

    #[error("redeclaration of '{name}' in the {namespace} namespace of {scope}")]
    Redeclaration {
        name: String,
        namespace: &'static str,
        scope: String,
    },

    #[error("no scope is active")]
    NoActiveScope,

    #[error("a File scope already exists in this session")]
    DuplicateFileScope,

    #[error("scope guard does not match the active scope")]
    ScopeGuardMismatch,
}

impl LowerError {
    pub fn malformed(rule: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedCst {
            rule,
            message: message.into(),
        }
    }

    pub fn unmapped(category: &'static str, token: impl Into<String>, span: Span) -> Self {
        Self::UnmappedOperator {
            category,
            token: token.into(),
            span,
        }
    }

    /// Span of the offending token, when the error carries one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnmappedOperator { span, .. } if !span.is_empty() => Some(*span),
            _ => None,
        }
    }
}

pub type LowerResult<T> = Result<T, LowerError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    pub fn report_error(&self, file_id: usize, error: &LowerError) {
        let diagnostic = match error.span() {
            Some(span) => Diagnostic::error()
                .with_message("Lowering error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(error.to_string()),
                ]),
            None => Diagnostic::error().with_message(error.to_string()),
        };

        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
