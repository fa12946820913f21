//! UI state types and event definitions.

use crate::export::ExportOutcome;
use crate::quotes::Quote;
use crate::spec::RenderSpec;

/// Which screen the window is showing.
///
/// The screens form a forward-only pipeline:
/// `Editor` -> `Share` (with the render spec carried as navigation state)
/// or `Editor` -> `QuoteMissing` when the spec's quote id does not resolve.
pub enum Screen {
    /// The overlay configuration stage with its live preview.
    Editor,
    /// The capture & export stage, re-rendering from the received spec.
    Share {
        spec: RenderSpec,
        quote: &'static Quote,
    },
    /// Terminal state: the spec referenced an unknown quote.
    QuoteMissing,
}

/// State of the "Save & Share" action.
#[derive(Clone, PartialEq)]
pub enum ShareStatus {
    /// No export attempted yet, or the previous one was acknowledged.
    Idle,
    /// An export is in flight; the button is inert until it finishes.
    Pending,
    /// The export completed; holds the user-facing confirmation.
    Done(String),
    /// The export failed; holds the user-facing message.
    Error(String),
}

/// Events received from the background export thread.
pub(crate) enum ExportEvent {
    Finished(ExportOutcome),
    Failed(String),
}
