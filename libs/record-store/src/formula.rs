//! Typed formula expressions for `filterByFormula`.
//!
//! Values enter a formula only as [`Formula::Text`] or [`Formula::Number`]
//! nodes. Text is quoted and escaped when rendered, so user input cannot close
//! the literal and inject formula syntax. Function names are `&'static str`.

use std::fmt::{self, Display, Write as _};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

/// Expression tree of the store's formula language.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Formula {
    /// Field reference, rendered as `{name}`.
    Field(String),
    /// String literal, rendered single-quoted and escaped.
    Text(String),
    Number(i64),
    Call {
        name: &'static str,
        args: Vec<Formula>,
    },
    Compare {
        op: CompareOp,
        lhs: Box<Formula>,
        rhs: Box<Formula>,
    },
    /// String concatenation with `&`.
    Concat(Vec<Formula>),
}

impl Formula {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn number(value: i64) -> Self {
        Self::Number(value)
    }

    pub fn call(name: &'static str, args: impl IntoIterator<Item = Formula>) -> Self {
        Self::Call {
            name,
            args: args.into_iter().collect(),
        }
    }

    pub fn concat(parts: impl IntoIterator<Item = Formula>) -> Self {
        Self::Concat(parts.into_iter().collect())
    }

    /// `AND(a, b, ...)`. A single operand is returned unwrapped.
    pub fn and(parts: impl IntoIterator<Item = Formula>) -> Self {
        let mut parts: Vec<Formula> = parts.into_iter().collect();
        if parts.len() == 1
            && let Some(only) = parts.pop()
        {
            return only;
        }
        Self::call("AND", parts)
    }

    pub fn compare(self, op: CompareOp, rhs: Formula) -> Self {
        Self::Compare {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    pub fn equals(self, rhs: Formula) -> Self {
        self.compare(CompareOp::Eq, rhs)
    }

    pub fn greater_than(self, rhs: Formula) -> Self {
        self.compare(CompareOp::Gt, rhs)
    }

    fn needs_parens(&self) -> bool {
        matches!(self, Self::Compare { .. } | Self::Concat(_))
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_parens() {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in value.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\n' => f.write_str("\\n")?,
            other => f.write_char(other)?,
        }
    }
    f.write_char('\'')
}

impl Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "{{{name}}}"),
            Self::Text(value) => write_quoted(f, value),
            Self::Number(n) => write!(f, "{n}"),
            Self::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_char(')')
            }
            Self::Compare { op, lhs, rhs } => {
                lhs.fmt_operand(f)?;
                write!(f, " {} ", op.symbol())?;
                rhs.fmt_operand(f)
            }
            Self::Concat(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" & ")?;
                    }
                    part.fmt_operand(f)?;
                }
                Ok(())
            }
        }
    }
}
