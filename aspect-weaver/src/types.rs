//! Core types for the aspect weaver library
//!
//! This module defines the fundamental types shared by pointcuts, rules and the
//! weaver: the runtime join point description, the advice callback type, and
//! the library error enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Result type for weaver operations
pub type Result<T> = std::result::Result<T, AspectError>;

/// Advice callback attached to a pointcut
///
/// Advice takes nothing from the call site and returns nothing. It is shared
/// between threads, so it must be `Send + Sync`.
pub type Advice = Arc<dyn Fn() + Send + Sync>;

/// Runtime description of a single invocation that a pointcut may match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinPoint {
    /// Fully-qualified operation name (`com.example.Type.method`)
    pub signature: String,
    /// Number of arguments passed to the operation
    pub arity: usize,
    /// Return type name, if the caller reports one
    #[serde(default)]
    pub return_type: Option<String>,
}

impl JoinPoint {
    /// Create a join point for an operation with the given arity
    pub fn new(signature: impl Into<String>, arity: usize) -> Self {
        Self {
            signature: signature.into(),
            arity,
            return_type: None,
        }
    }

    /// Builder method: report the operation's return type
    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    /// Name of the method (last path segment of the signature)
    pub fn method(&self) -> &str {
        self.signature
            .rsplit_once('.')
            .map(|(_, method)| method)
            .unwrap_or(&self.signature)
    }

    /// Declaring type of the method (everything before the last `.`)
    pub fn declaring_type(&self) -> Option<&str> {
        self.signature.rsplit_once('.').map(|(ty, _)| ty)
    }
}

impl fmt::Display for JoinPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.signature, self.arity)
    }
}

/// Errors that can occur while building or registering interception rules
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AspectError {
    #[error("Invalid pointcut expression {expression:?}: {reason}")]
    InvalidPointcut { expression: String, reason: String },

    #[error("Rule '{name}' is already registered with pointcut {existing}, refusing {requested}")]
    ConflictingRule {
        name: String,
        existing: String,
        requested: String,
    },

    #[error("Rule '{0}' has no advice attached")]
    MissingAdvice(String),
}

impl AspectError {
    pub(crate) fn invalid_pointcut(expression: &str, reason: impl Into<String>) -> Self {
        AspectError::InvalidPointcut {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_point_parts() {
        let jp = JoinPoint::new("com.limpoxe.aoptest.MainActivity.doSomething", 0);
        assert_eq!(jp.method(), "doSomething");
        assert_eq!(jp.declaring_type(), Some("com.limpoxe.aoptest.MainActivity"));
        assert_eq!(jp.to_string(), "com.limpoxe.aoptest.MainActivity.doSomething/0");
    }

    #[test]
    fn test_join_point_without_declaring_type() {
        let jp = JoinPoint::new("main", 2).with_return_type("void");
        assert_eq!(jp.method(), "main");
        assert_eq!(jp.declaring_type(), None);
        assert_eq!(jp.return_type.as_deref(), Some("void"));
    }

    #[test]
    fn test_error_messages() {
        let err = AspectError::MissingAdvice("point".to_string());
        assert_eq!(err.to_string(), "Rule 'point' has no advice attached");
    }
}
