//! Grammar vocabulary and derivation tracing
//!
//! The parser builds no syntax tree. When tracing is enabled it instead
//! records the rules it enters and, for expressions, the order in which
//! operands and operators are reduced (postfix order). [`Derivation`] can
//! turn that record back into fully parenthesized expressions, which makes
//! the grouping chosen by the precedence levels directly observable.

use std::fmt;

/// A structural nonterminal. Expression levels are recorded as
/// operand/operator steps instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Program,
    TypeDef,
    FunctionDef,
    Params,
    Type,
    Block,
    VarDecl,
    Assign,
    If,
    Elif,
    Else,
    While,
    For,
    Return,
    Delete,
    CallStmt,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::Program => "program",
            Rule::TypeDef => "type definition",
            Rule::FunctionDef => "function definition",
            Rule::Params => "parameter list",
            Rule::Type => "type",
            Rule::Block => "block",
            Rule::VarDecl => "variable declaration",
            Rule::Assign => "assignment",
            Rule::If => "if statement",
            Rule::Elif => "elif clause",
            Rule::Else => "else clause",
            Rule::While => "while loop",
            Rule::For => "for loop",
            Rule::Return => "return statement",
            Rule::Delete => "delete statement",
            Rule::CallStmt => "call statement",
        };
        write!(f, "{}", name)
    }
}

/// One recorded parsing event
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A structural rule (definition, block, statement) was entered
    Enter(Rule),
    /// A complete primary operand: literal, path, or `new T`
    Operand(String),
    /// A binary operator applied to the two most recent operands
    Binary(String),
    /// A prefix operator applied to the most recent operand
    Unary(String),
    /// A call applied to the most recent `args` operands
    Call { name: String, args: usize },
}

/// Ordered record of a traced parse
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derivation {
    steps: Vec<Step>,
}

impl Derivation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Rules entered, in order
    pub fn rules(&self) -> Vec<Rule> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Enter(rule) => Some(*rule),
                _ => None,
            })
            .collect()
    }

    /// Rebuild every recorded expression with explicit grouping.
    ///
    /// Expressions are delimited by the structural steps around them, so
    /// `for i from 1 upto n` yields `["1", "n"]`.
    pub fn expressions(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack: Vec<String> = Vec::new();

        for step in &self.steps {
            match step {
                Step::Enter(_) => out.append(&mut stack),
                Step::Operand(text) => stack.push(text.clone()),
                Step::Binary(op) => {
                    let rhs = stack.pop().unwrap_or_default();
                    let lhs = stack.pop().unwrap_or_default();
                    stack.push(format!("({} {} {})", lhs, op, rhs));
                }
                Step::Unary(op) => {
                    let operand = stack.pop().unwrap_or_default();
                    let sep = if op.chars().all(char::is_alphabetic) { " " } else { "" };
                    stack.push(format!("({}{}{})", op, sep, operand));
                }
                Step::Call { name, args } => {
                    let args = stack.split_off(stack.len().saturating_sub(*args));
                    stack.push(format!("{}({})", name, args.join(", ")));
                }
            }
        }

        out.append(&mut stack);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn operand(s: &str) -> Step {
        Step::Operand(s.to_string())
    }

    #[test]
    fn test_rebuild_postfix() {
        let mut d = Derivation::new();
        d.push(Step::Enter(Rule::Assign));
        for step in [
            operand("a"),
            operand("b"),
            operand("c"),
            Step::Binary("*".into()),
            Step::Binary("+".into()),
        ] {
            d.push(step);
        }
        assert_eq!(d.expressions(), vec!["(a + (b * c))".to_string()]);
    }

    #[test]
    fn test_rebuild_unary_and_call() {
        let mut d = Derivation::new();
        d.push(Step::Enter(Rule::Return));
        d.push(operand("x"));
        d.push(Step::Unary("-".into()));
        d.push(operand("y"));
        d.push(Step::Unary("not".into()));
        d.push(Step::Call { name: "f".into(), args: 2 });
        d.push(Step::Enter(Rule::Block));
        d.push(operand("1"));
        d.push(operand("2"));
        assert_eq!(
            d.expressions(),
            vec!["f((-x), (not y))".to_string(), "1".to_string(), "2".to_string()]
        );
        assert_eq!(d.rules(), vec![Rule::Return, Rule::Block]);
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(Rule::VarDecl.to_string(), "variable declaration");
        assert!(Derivation::new().is_empty());
    }
}
