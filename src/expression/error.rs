//! Compile errors of the expression language, located by byte offset in the source.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (byte {offset})")]
pub(crate) struct ExprError {
    pub(crate) offset: usize,
    pub(crate) message: String,
}

impl ExprError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }

    /// Move the offset into an enclosing text, e.g. a template placeholder.
    pub(crate) fn shifted(self, by: usize) -> Self {
        Self {
            offset: self.offset + by,
            ..self
        }
    }

    /// Message followed by `src` with a caret under the offending byte.
    pub(crate) fn pointed(&self, src: &str) -> String {
        let at = self.offset.min(src.len());
        let column = src
            .get(..at)
            .map_or(at, |head| head.chars().count());
        format!(
            "{}\n    {src}\n    {}^",
            self.message,
            " ".repeat(column)
        )
    }
}
