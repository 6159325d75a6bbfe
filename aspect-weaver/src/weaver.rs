//! Main weaver API
//!
//! The `Weaver` is the registry of interception rules and the dispatch shim
//! callers route their operations through. Rules are registered once at
//! start-up (`&mut self`), after which the weaver is shared read-only and can
//! be used from any number of threads.

use crate::config::WeaverConfig;
use crate::rule::InterceptionRule;
use crate::types::{AspectError, JoinPoint, Result};
use std::convert::Infallible;

/// Rule registry and dispatch shim
#[derive(Debug, Default)]
pub struct Weaver {
    /// Registered rules, in registration order
    rules: Vec<InterceptionRule>,
    config: WeaverConfig,
}

impl Weaver {
    /// Create a weaver with default configuration and no rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a weaver with the given configuration
    pub fn with_config(config: WeaverConfig) -> Self {
        Self {
            rules: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &WeaverConfig {
        &self.config
    }

    /// Register an interception rule
    ///
    /// # Returns
    /// * `Ok(true)` - the rule was added
    /// * `Ok(false)` - a rule with the same name and pointcut is already
    ///   registered; the new one is ignored so advice never runs twice
    /// * `Err(ConflictingRule)` - the name is taken by a different pointcut
    ///
    /// # Example
    /// ```
    /// use aspect_weaver::{InterceptionRule, Weaver};
    ///
    /// let mut weaver = Weaver::new();
    /// let rule = InterceptionRule::builder("point", "execution(* a.B.c(..))")
    ///     .before(|| {})
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(weaver.register(rule.clone()).unwrap());
    /// assert!(!weaver.register(rule).unwrap());
    /// assert_eq!(weaver.rule_count(), 1);
    /// ```
    pub fn register(&mut self, rule: InterceptionRule) -> Result<bool> {
        if let Some(existing) = self.rule(rule.name()) {
            if existing.pointcut() == rule.pointcut() {
                log::warn!(
                    "Rule '{}' already registered for {}, ignoring duplicate",
                    rule.name(),
                    rule.pointcut()
                );
                return Ok(false);
            }
            return Err(AspectError::ConflictingRule {
                name: rule.name().to_string(),
                existing: existing.pointcut().to_string(),
                requested: rule.pointcut().to_string(),
            });
        }

        log::info!("Registered rule '{}': {}", rule.name(), rule.pointcut());
        self.rules.push(rule);
        Ok(true)
    }

    /// Look up a registered rule by name
    pub fn rule(&self, name: &str) -> Option<&InterceptionRule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.rule(name).is_some()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Registered rules in registration order
    pub fn rules(&self) -> impl Iterator<Item = &InterceptionRule> {
        self.rules.iter()
    }

    /// Rules whose pointcut selects the join point, in registration order
    pub fn matching_rules<'a>(
        &'a self,
        join_point: &'a JoinPoint,
    ) -> impl DoubleEndedIterator<Item = &'a InterceptionRule> + 'a {
        self.rules.iter().filter(move |rule| rule.matches(join_point))
    }

    /// Run a fallible operation through the matching rules
    ///
    /// Before-advice runs in registration order, then the operation. On `Ok`
    /// the after-returning advice runs in reverse registration order. On `Err`
    /// no after advice runs and the error is returned untouched.
    ///
    /// # Example
    /// ```
    /// use aspect_weaver::{InterceptionRule, JoinPoint, Weaver};
    ///
    /// let mut weaver = Weaver::new();
    /// weaver.register(
    ///     InterceptionRule::builder("point", "execution(* a.B.c(..))")
    ///         .before(|| println!("[pointBefore]..."))
    ///         .after_returning(|| println!("[pointAfter]..."))
    ///         .build()
    ///         .unwrap(),
    /// ).unwrap();
    ///
    /// let jp = JoinPoint::new("a.B.c", 0);
    /// let value: Result<u32, String> = weaver.invoke(&jp, || Ok(7));
    /// assert_eq!(value, Ok(7));
    /// ```
    pub fn invoke<T, E, F>(&self, join_point: &JoinPoint, op: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
    {
        if !self.config.enabled {
            return op();
        }

        if self.config.trace_join_points {
            log::trace!(
                "Join point {} matched {} rule(s)",
                join_point,
                self.matching_rules(join_point).count()
            );
        }

        for rule in self.matching_rules(join_point) {
            rule.run_before();
        }

        let outcome = op();

        match &outcome {
            Ok(_) => {
                for rule in self.matching_rules(join_point).rev() {
                    rule.run_after_returning();
                }
            }
            Err(_) => {
                log::debug!(
                    "Join point {} returned an error, skipping after-returning advice",
                    join_point
                );
            }
        }

        outcome
    }

    /// Run an infallible operation through the matching rules
    ///
    /// The operation always counts as a successful return.
    pub fn run<T, F>(&self, join_point: &JoinPoint, op: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self.invoke(join_point, || Ok::<T, Infallible>(op())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Bind an operation to a join point so every call goes through the weaver
    pub fn weave<F>(&self, join_point: JoinPoint, op: F) -> Woven<'_, F> {
        Woven {
            weaver: self,
            join_point,
            op,
        }
    }
}

/// An operation bound to its join point, see [`Weaver::weave`]
pub struct Woven<'w, F> {
    weaver: &'w Weaver,
    join_point: JoinPoint,
    op: F,
}

impl<'w, F> Woven<'w, F> {
    pub fn join_point(&self) -> &JoinPoint {
        &self.join_point
    }

    /// Call the wrapped operation with its argument
    pub fn call<A, T, E>(&self, arg: A) -> std::result::Result<T, E>
    where
        F: Fn(A) -> std::result::Result<T, E>,
    {
        self.weaver.invoke(&self.join_point, || (self.op)(arg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Trace = Arc<Mutex<Vec<String>>>;

    fn recording_rule(name: &str, expression: &str, trace: &Trace) -> InterceptionRule {
        let before_trace = Arc::clone(trace);
        let after_trace = Arc::clone(trace);
        let before_tag = format!("{}:before", name);
        let after_tag = format!("{}:after", name);
        InterceptionRule::builder(name, expression)
            .before(move || before_trace.lock().unwrap().push(before_tag.clone()))
            .after_returning(move || after_trace.lock().unwrap().push(after_tag.clone()))
            .build()
            .unwrap()
    }

    fn entries(trace: &Trace) -> Vec<String> {
        trace.lock().unwrap().clone()
    }

    #[test]
    fn test_weaver_creation() {
        let weaver = Weaver::new();
        assert_eq!(weaver.rule_count(), 0);
        assert!(weaver.config().enabled);
    }

    #[test]
    fn test_conflicting_rule_is_rejected() {
        let trace = Trace::default();
        let mut weaver = Weaver::new();
        weaver
            .register(recording_rule("point", "execution(* a.B.c(..))", &trace))
            .unwrap();

        let err = weaver
            .register(recording_rule("point", "execution(* a.B.d(..))", &trace))
            .unwrap_err();
        assert!(matches!(err, AspectError::ConflictingRule { ref name, .. } if name == "point"));
        assert_eq!(weaver.rule("point").unwrap().pointcut().method, "c");
    }

    #[test]
    fn test_nested_order_for_multiple_rules() {
        let trace = Trace::default();
        let mut weaver = Weaver::new();
        weaver
            .register(recording_rule("outer", "execution(* a.B.c(..))", &trace))
            .unwrap();
        weaver
            .register(recording_rule("inner", "execution(* a.B.c())", &trace))
            .unwrap();

        let jp = JoinPoint::new("a.B.c", 0);
        weaver.run(&jp, || trace.lock().unwrap().push("call".to_string()));

        assert_eq!(
            entries(&trace),
            vec!["outer:before", "inner:before", "call", "inner:after", "outer:after"]
        );
    }

    #[test]
    fn test_disabled_weaver_runs_no_advice() {
        let trace = Trace::default();
        let mut weaver = Weaver::with_config(WeaverConfig::new().with_enabled(false));
        weaver
            .register(recording_rule("point", "execution(* a.B.c(..))", &trace))
            .unwrap();

        let value = weaver.run(&JoinPoint::new("a.B.c", 0), || 42);
        assert_eq!(value, 42);
        assert!(entries(&trace).is_empty());
    }

    #[test]
    fn test_woven_operation() {
        let trace = Trace::default();
        let mut weaver = Weaver::new();
        weaver
            .register(recording_rule("point", "execution(* a.B.c(int))", &trace))
            .unwrap();

        let woven = weaver.weave(JoinPoint::new("a.B.c", 1), |x: i32| {
            if x >= 0 {
                Ok(x * 2)
            } else {
                Err(format!("negative: {}", x))
            }
        });

        assert_eq!(woven.call(4), Ok(8));
        assert_eq!(woven.call(-1), Err("negative: -1".to_string()));
        assert_eq!(entries(&trace), vec!["point:before", "point:after", "point:before"]);
    }

    #[test]
    fn test_weaver_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Weaver>();
    }
}
