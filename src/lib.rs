//! Tessel syntax front end
//!
//! Lexer and recursive-descent recognizer for the Tessel language. A source
//! text either parses, or the first lexical or syntax error is returned with
//! its line and column.

pub mod feedback;
pub mod frontend;
pub mod utils;

use std::time::Instant;

pub use feedback::{CheckFeedback, CheckStats, ErrorReport};
pub use frontend::grammar::{Derivation, Rule, Step};
pub use frontend::lexer::Lexer;
pub use frontend::parser::Parser;
pub use frontend::token::{Token, TokenKind};
pub use utils::{Error, ErrorKind, Result, Span};

/// Lex and parse `source`, stopping at the first error
pub fn check_source(source: &str) -> Result<()> {
    Parser::new(Lexer::new(source)).parse()
}

/// Check `source` and summarise the outcome under `file_name`
pub fn check_with_feedback(source: &str, file_name: &str) -> CheckFeedback {
    let started = Instant::now();
    let outcome = check_source(source);
    let stats = CheckStats {
        parse_time_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        loc: source.lines().count(),
    };

    match outcome {
        Ok(()) => CheckFeedback::success(file_name.to_string(), stats),
        Err(err) => {
            CheckFeedback::failure(file_name.to_string(), ErrorReport::from_error(&err, file_name), stats)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_with_feedback() {
        let ok = check_with_feedback("fun void main() {\n}\n", "ok.tsl");
        assert!(ok.success);
        assert_eq!(ok.stats.loc, 2);
        assert!(ok.stats.parse_time_us < u64::MAX);

        let bad = check_with_feedback("fun void main() {\n", "bad.tsl");
        assert!(!bad.success);
        assert_eq!(bad.diagnostics.len(), 1);
        assert_eq!(bad.diagnostics[0].location.line, 2);
    }

    #[test]
    fn test_independent_parses_in_parallel() {
        let sources = [
            "fun void a() { var x = 1 }",
            "fun void b() { for i from 0 upto 9 { x = x + i } }",
            "fun void c() { var = 1 }",
            "var top = 0",
        ];
        let outcomes: Vec<bool> = std::thread::scope(|scope| {
            let handles: Vec<_> = sources
                .iter()
                .map(|src| scope.spawn(move || check_source(src).is_ok()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(outcomes, vec![true, true, false, false]);
    }
}
