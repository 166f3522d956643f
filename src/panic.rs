//! Describing panic payloads raised by steps.

use std::{any::Any, fmt};

/// Borrowed view of a panic payload that formats its message.
///
/// The payload is downcast to `String` or `&'static str` if possible and falls
/// back to a placeholder otherwise. Borrowing lets the engine log the message
/// and still resume unwinding with the original payload.
pub(crate) struct PanicMessage<'a>(&'a (dyn Any + Send));

impl fmt::Display for PanicMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.0.downcast_ref::<String>() {
            f.write_str(s)
        } else if let Some(s) = self.0.downcast_ref::<&'static str>() {
            f.write_str(s)
        } else {
            f.write_str("<non-string panic payload>")
        }
    }
}

/// Create a [`PanicMessage`] for the given payload.
pub(crate) fn describe(payload: &(dyn Any + Send)) -> PanicMessage<'_> { PanicMessage(payload) }

#[cfg(test)]
mod tests {
    use super::describe;

    #[test]
    fn formats_string_payloads() {
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("boom"));
        assert_eq!(describe(owned.as_ref()).to_string(), "boom");

        let borrowed: Box<dyn std::any::Any + Send> = Box::new("bang");
        assert_eq!(describe(borrowed.as_ref()).to_string(), "bang");
    }

    #[test]
    fn formats_other_payloads_as_placeholder() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(5_u32);
        assert_eq!(
            describe(payload.as_ref()).to_string(),
            "<non-string panic payload>"
        );
    }
}
