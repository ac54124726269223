//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.
//!
//! Errors produced by the algebra engine do not usually point into source text, since the engine
//! works on already-built expression trees. An embedding application that parsed the expression
//! itself can attach spans to an [`Error`] so that the report highlights the offending regions.

use ariadne::{Color, Label, Report, ReportKind, Source};
use std::{any::Any, fmt::{self, Debug, Display}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns `self` as [`Any`], so that the concrete kind can be recovered.
    fn as_any(&self) -> &dyn Any;

    /// The message displayed at the top of the error.
    fn message(&self) -> String;

    /// The labels pointing to each span of the error, in order.
    fn labels(&self) -> Vec<String> {
        Vec::new()
    }

    /// Optional help text describing what the user can do about the error.
    fn help(&self) -> Option<String> {
        None
    }

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        let offset = spans.first().map(|span| span.start).unwrap_or(0);
        let mut builder = Report::build(ReportKind::Error, src_id, offset)
            .with_message(self.message())
            .with_labels(
                self.labels()
                    .into_iter()
                    .zip(spans.iter())
                    .map(|(label_str, span)| {
                        let mut label = Label::new((src_id, span.clone()))
                            .with_color(EXPR);

                        if !label_str.is_empty() {
                            label = label.with_message(label_str);
                        }

                        label
                    })
                    .collect::<Vec<_>>()
            );

        if let Some(help) = self.help() {
            builder.set_help(help);
        }
        builder.finish()
    }
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from. Empty if the error did not
    /// originate from source code.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Returns `true` if the kind of this error is `K`.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.kind.as_any().is::<K>()
    }

    /// Returns the kind of this error as a `K`, if it is one.
    pub fn downcast_ref<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Writes the report for this error to stderr, using `input` as the source text.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> std::io::Result<()> {
        self.build_report(src_id).eprint((src_id, Source::from(input)))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for Error {}

impl<K: ErrorKind + 'static> From<K> for Error {
    fn from(kind: K) -> Self {
        Self::new(Vec::new(), kind)
    }
}
