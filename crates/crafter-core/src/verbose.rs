//! Full diagnostic rendering of a fault for private logging

use std::fmt::Write as _;

use crate::Fault;

/// Render message, stack trace and every inner cause of a fault
///
/// Never fails. Causes carry no stack trace of their own, so their trace
/// section is left empty.
///
/// The outer stack trace is only captured when `RUST_BACKTRACE=1` or
/// `RUST_LIB_BACKTRACE=1` is set in the process environment; otherwise the
/// "Stack Trace:" section is empty.
pub fn render(fault: &Fault) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Exception Message:");
    let _ = writeln!(out, "{}", fault.message());
    let _ = writeln!(out, "Stack Trace:");
    let _ = writeln!(out, "{}", fault.stack_trace());

    for cause in fault.causes() {
        let _ = writeln!(out, "Inner Exception:");
        let _ = writeln!(out, "{cause}");
        let _ = writeln!(out, "Inner Exception Stack Trace:");
        let _ = writeln!(out);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConcurrencyConflict;

    #[derive(Debug, thiserror::Error)]
    #[error("query failed")]
    struct QueryFailed(#[source] std::io::Error);

    #[test]
    fn renders_message_without_causes() {
        let fault = Fault::from(std::io::Error::other("disk on fire"));
        let rendered = render(&fault);

        assert!(rendered.starts_with("Exception Message:\ndisk on fire\nStack Trace:\n"));
        assert!(!rendered.contains("Inner Exception:"));
    }

    #[test]
    fn stack_trace_section_holds_the_captured_trace() {
        let fault = Fault::from(std::io::Error::other("disk on fire"));
        let rendered = render(&fault);

        let expected = format!("Stack Trace:\n{}\n", fault.stack_trace());
        assert!(rendered.contains(&expected), "{rendered}");
    }

    #[test]
    fn renders_each_cause_in_order() {
        let inner = QueryFailed(std::io::Error::other("socket closed"));
        let conflict = ConcurrencyConflict::new("invoice").with_source(inner);
        let rendered = render(&Fault::from(conflict));

        let first = rendered.find("Inner Exception:\nquery failed").unwrap();
        let second = rendered.find("Inner Exception:\nsocket closed").unwrap();
        assert!(first < second);
        assert_eq!(rendered.matches("Inner Exception Stack Trace:").count(), 2);
    }
}
