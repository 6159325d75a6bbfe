//! Pointcut expressions
//!
//! A pointcut names the operation an interception rule applies to. The
//! accepted grammar is the `execution` designator:
//!
//! ```text
//! execution(<ret> <declaring.Type>.<method>(<args>))
//!
//! <ret>  := "*" | type-name
//! <args> := ".." | "" | type-name ("," type-name)*
//! ```
//!
//! `..` accepts any argument list, an empty list accepts only zero-argument
//! calls, and an explicit list accepts calls with exactly that many arguments.
//! Exactly one operation is matched: wildcards inside the qualified name are
//! rejected.

use crate::types::{AspectError, JoinPoint, Result};
use std::fmt;
use std::str::FromStr;

const DESIGNATOR: &str = "execution";

/// Return type part of a pointcut
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypePattern {
    /// `*` - any return type
    Any,
    /// A concrete type name
    Named(String),
}

/// Argument list part of a pointcut
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgsPattern {
    /// `..` - any number of arguments
    Any,
    /// Explicit list of argument types
    Exact(Vec<String>),
}

impl ArgsPattern {
    /// Check whether a call with `arity` arguments is accepted
    pub fn accepts(&self, arity: usize) -> bool {
        match self {
            ArgsPattern::Any => true,
            ArgsPattern::Exact(types) => types.len() == arity,
        }
    }
}

/// Parsed `execution(...)` match expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pointcut {
    pub return_type: TypePattern,
    pub declaring_type: String,
    pub method: String,
    pub args: ArgsPattern,
}

impl Pointcut {
    /// Parse a match expression
    ///
    /// # Example
    /// ```
    /// use aspect_weaver::{JoinPoint, Pointcut};
    ///
    /// let pc = Pointcut::parse("execution(* com.example.Main.run(..))").unwrap();
    /// assert!(pc.matches(&JoinPoint::new("com.example.Main.run", 3)));
    /// ```
    pub fn parse(expression: &str) -> Result<Self> {
        let invalid = |reason: &str| AspectError::invalid_pointcut(expression, reason);

        let body = expression
            .trim()
            .strip_prefix(DESIGNATOR)
            .ok_or_else(|| invalid("only the `execution` designator is supported"))?
            .trim_start()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| invalid("expected `execution(...)`"))?
            .trim();

        let open = body
            .find('(')
            .ok_or_else(|| invalid("missing argument list"))?;
        let (head, params) = body.split_at(open);
        let params = params
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| invalid("argument list must close the signature"))?;
        if params.contains('(') || params.contains(')') {
            return Err(invalid("unbalanced parentheses in argument list"));
        }

        let mut tokens = head.split_whitespace();
        let (ret, qualified) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(ret), Some(qualified), None) => (ret, qualified),
            _ => return Err(invalid("expected `<return-type> <qualified.method>`")),
        };

        let return_type = if ret == "*" {
            TypePattern::Any
        } else if is_type_name(ret) {
            TypePattern::Named(ret.to_string())
        } else {
            return Err(invalid("malformed return type"));
        };

        let (declaring_type, method) = qualified
            .rsplit_once('.')
            .ok_or_else(|| invalid("method name must be qualified by its declaring type"))?;
        if !declaring_type.split('.').all(is_identifier) || !is_identifier(method) {
            return Err(invalid("qualified name must be a dotted path of identifiers"));
        }

        let args = parse_args(params).map_err(|reason| invalid(reason.as_str()))?;

        Ok(Self {
            return_type,
            declaring_type: declaring_type.to_string(),
            method: method.to_string(),
            args,
        })
    }

    /// Fully-qualified operation name this pointcut selects
    pub fn signature(&self) -> String {
        format!("{}.{}", self.declaring_type, self.method)
    }

    /// Check whether a join point is selected by this pointcut
    pub fn matches(&self, join_point: &JoinPoint) -> bool {
        if join_point.method() != self.method
            || join_point.declaring_type() != Some(self.declaring_type.as_str())
        {
            return false;
        }
        if !self.args.accepts(join_point.arity) {
            return false;
        }
        match (&self.return_type, &join_point.return_type) {
            (TypePattern::Any, _) | (TypePattern::Named(_), None) => true,
            (TypePattern::Named(expected), Some(actual)) => expected == actual,
        }
    }
}

impl FromStr for Pointcut {
    type Err = AspectError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Pointcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ret = match &self.return_type {
            TypePattern::Any => "*",
            TypePattern::Named(name) => name.as_str(),
        };
        let args = match &self.args {
            ArgsPattern::Any => "..".to_string(),
            ArgsPattern::Exact(types) => types.join(", "),
        };
        write!(
            f,
            "{}({} {}.{}({}))",
            DESIGNATOR, ret, self.declaring_type, self.method, args
        )
    }
}

fn parse_args(params: &str) -> std::result::Result<ArgsPattern, String> {
    let params = params.trim();
    if params == ".." {
        return Ok(ArgsPattern::Any);
    }
    if params.is_empty() {
        return Ok(ArgsPattern::Exact(Vec::new()));
    }

    let mut types = Vec::new();
    for param in params.split(',').map(str::trim) {
        if param == ".." {
            return Err("`..` cannot be combined with explicit argument types".to_string());
        }
        if !is_type_name(param) {
            return Err(format!("malformed argument type {:?}", param));
        }
        types.push(param.to_string());
    }
    Ok(ArgsPattern::Exact(types))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Type names are dotted identifiers with optional array suffixes (`int[]`)
fn is_type_name(s: &str) -> bool {
    let mut base = s;
    while let Some(stripped) = base.strip_suffix("[]") {
        base = stripped;
    }
    !base.is_empty() && base.split('.').all(is_identifier)
}
