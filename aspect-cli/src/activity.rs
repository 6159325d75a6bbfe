//! Sample target of the built-in aspect
//!
//! `MainActivity` routes its public operations through the weaver, so any
//! rule whose pointcut names one of them runs around the call.

use aspect_weaver::{JoinPoint, Weaver};
use std::sync::Arc;

pub const DO_SOMETHING: &str = "com.limpoxe.aoptest.MainActivity.doSomething";
pub const DO_SOMETHING_ELSE: &str = "com.limpoxe.aoptest.MainActivity.doSomethingElse";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActivityError {
    #[error("doSomething failed: {0}")]
    Failed(String),
}

pub struct MainActivity {
    weaver: Arc<Weaver>,
    fail: bool,
}

impl MainActivity {
    /// Create the activity; with `fail` set, `do_something` returns an error
    pub fn new(weaver: Arc<Weaver>, fail: bool) -> Self {
        Self { weaver, fail }
    }

    pub fn do_something(&self) -> Result<(), ActivityError> {
        self.weaver
            .invoke(&JoinPoint::new(DO_SOMETHING, 0), || self.do_something_inner())
    }

    pub fn do_something_else(&self) {
        self.weaver.run(&JoinPoint::new(DO_SOMETHING_ELSE, 0), || {
            log::info!("MainActivity.doSomethingElse running");
        })
    }

    fn do_something_inner(&self) -> Result<(), ActivityError> {
        log::info!("MainActivity.doSomething running");
        if self.fail {
            return Err(ActivityError::Failed("requested by --fail".to_string()));
        }
        Ok(())
    }
}
