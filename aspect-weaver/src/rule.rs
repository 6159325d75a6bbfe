//! Interception rules
//!
//! A rule binds a named pointcut to its advice: an optional callback that runs
//! before the matched operation and an optional callback that runs after the
//! operation returns successfully. There is no advice for the
//! error path.

use crate::pointcut::Pointcut;
use crate::types::{Advice, AspectError, JoinPoint, Result};
use std::fmt;
use std::sync::Arc;

/// A named pointcut with its before / after-returning advice
#[derive(Clone)]
pub struct InterceptionRule {
    name: String,
    pointcut: Pointcut,
    before: Option<Advice>,
    after_returning: Option<Advice>,
}

impl InterceptionRule {
    /// Start building a rule for a named pointcut expression
    ///
    /// # Example
    /// ```
    /// use aspect_weaver::InterceptionRule;
    ///
    /// let rule = InterceptionRule::builder("point", "execution(* a.B.c(..))")
    ///     .before(|| println!("[pointBefore]..."))
    ///     .after_returning(|| println!("[pointAfter]..."))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(rule.name(), "point");
    /// ```
    pub fn builder(name: impl Into<String>, expression: impl Into<String>) -> RuleBuilder {
        RuleBuilder {
            name: name.into(),
            expression: expression.into(),
            before: None,
            after_returning: None,
        }
    }

    /// Name of the pointcut this rule was declared with
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pointcut(&self) -> &Pointcut {
        &self.pointcut
    }

    pub fn has_before(&self) -> bool {
        self.before.is_some()
    }

    pub fn has_after_returning(&self) -> bool {
        self.after_returning.is_some()
    }

    /// Check whether this rule applies to a join point
    pub fn matches(&self, join_point: &JoinPoint) -> bool {
        self.pointcut.matches(join_point)
    }

    pub(crate) fn run_before(&self) {
        if let Some(advice) = &self.before {
            advice();
        }
    }

    pub(crate) fn run_after_returning(&self) {
        if let Some(advice) = &self.after_returning {
            advice();
        }
    }
}

impl fmt::Debug for InterceptionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptionRule")
            .field("name", &self.name)
            .field("pointcut", &self.pointcut.to_string())
            .field("before", &self.has_before())
            .field("after_returning", &self.has_after_returning())
            .finish()
    }
}

/// Builder for [`InterceptionRule`]
pub struct RuleBuilder {
    name: String,
    expression: String,
    before: Option<Advice>,
    after_returning: Option<Advice>,
}

impl RuleBuilder {
    /// Builder method: attach advice that runs before the matched operation
    pub fn before<F>(mut self, advice: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.before = Some(Arc::new(advice));
        self
    }

    /// Builder method: attach advice that runs after a successful return
    pub fn after_returning<F>(mut self, advice: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.after_returning = Some(Arc::new(advice));
        self
    }

    /// Parse the pointcut and produce the rule
    ///
    /// Fails when the expression does not parse or when no advice is attached.
    pub fn build(self) -> Result<InterceptionRule> {
        let pointcut = Pointcut::parse(&self.expression)?;
        if self.before.is_none() && self.after_returning.is_none() {
            return Err(AspectError::MissingAdvice(self.name));
        }
        Ok(InterceptionRule {
            name: self.name,
            pointcut,
            before: self.before,
            after_returning: self.after_returning,
        })
    }
}
