//! Aspects applied by the CLI
//!
//! The built-in aspect prints a marker before `MainActivity.doSomething` and
//! another once it returns. Rules from a config file follow the same shape,
//! with their own pointcuts and messages.

use crate::config::RuleConfig;
use aspect_weaver::{InterceptionRule, Result, RuleBuilder};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

pub const POINT_NAME: &str = "point";
pub const POINT_EXPRESSION: &str =
    "execution(* com.limpoxe.aoptest.MainActivity.doSomething(..))";
pub const BEFORE_MESSAGE: &str = "[pointBefore]...";
pub const AFTER_MESSAGE: &str = "[pointAfter]...";

/// Where advice messages are written
pub type Output = Arc<Mutex<dyn Write + Send>>;

pub fn stdout() -> Output {
    Arc::new(Mutex::new(io::stdout()))
}

/// The sample aspect: one pointcut with before / after-returning markers
pub struct AspectRule1;

impl AspectRule1 {
    pub fn rule(output: &Output) -> Result<InterceptionRule> {
        InterceptionRule::builder(POINT_NAME, POINT_EXPRESSION)
            .before(print_advice(output, BEFORE_MESSAGE))
            .after_returning(print_advice(output, AFTER_MESSAGE))
            .build()
    }
}

/// Build rules declared in a config file
pub fn rules_from_config(rules: &[RuleConfig], output: &Output) -> Result<Vec<InterceptionRule>> {
    rules
        .iter()
        .map(|rule| {
            let mut builder: RuleBuilder = InterceptionRule::builder(&rule.name, &rule.pointcut);
            if let Some(message) = &rule.before {
                builder = builder.before(print_advice(output, message));
            }
            if let Some(message) = &rule.after_returning {
                builder = builder.after_returning(print_advice(output, message));
            }
            builder.build()
        })
        .collect()
}

fn print_advice(output: &Output, message: &str) -> impl Fn() + Send + Sync + 'static {
    let output = Arc::clone(output);
    let message = message.to_string();
    move || {
        let mut out = match output.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(out, "{}", message).and_then(|_| out.flush()) {
            log::warn!("Failed to write advice message: {}", e);
        }
    }
}

/// JSON view of a registered rule (for --list-rules)
#[derive(Debug, Serialize)]
pub struct RuleSummary {
    pub name: String,
    pub pointcut: String,
    pub before: bool,
    pub after_returning: bool,
}

impl From<&InterceptionRule> for RuleSummary {
    fn from(rule: &InterceptionRule) -> Self {
        Self {
            name: rule.name().to_string(),
            pointcut: rule.pointcut().to_string(),
            before: rule.has_before(),
            after_returning: rule.has_after_returning(),
        }
    }
}
