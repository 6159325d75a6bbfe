//! Aspect Weaver Library
//!
//! Explicit before / after-returning interception around named operations.
//!
//! # Architecture
//!
//! There is no compile-time weaving: callers opt in by routing an operation
//! through a [`Weaver`] together with a [`JoinPoint`] describing the call.
//! - [`Pointcut`] parses `execution(* pkg.Type.method(..))` match expressions
//! - [`InterceptionRule`] binds a named pointcut to its advice
//! - [`Weaver`] holds the rules and runs matching advice around each call
//!
//! Advice never sees or alters arguments, return values or errors. If the
//! operation fails, the error reaches the caller unchanged and the
//! after-returning advice is skipped.
//!
//! # Example Usage
//!
//! ```
//! use aspect_weaver::{InterceptionRule, JoinPoint, Weaver};
//!
//! let mut weaver = Weaver::new();
//! weaver
//!     .register(
//!         InterceptionRule::builder(
//!             "point",
//!             "execution(* com.limpoxe.aoptest.MainActivity.doSomething(..))",
//!         )
//!         .before(|| println!("[pointBefore]..."))
//!         .after_returning(|| println!("[pointAfter]..."))
//!         .build()
//!         .unwrap(),
//!     )
//!     .unwrap();
//!
//! let jp = JoinPoint::new("com.limpoxe.aoptest.MainActivity.doSomething", 0);
//! let result: Result<(), String> = weaver.invoke(&jp, || Err("boom".to_string()));
//! assert_eq!(result, Err("boom".to_string()));
//! ```

// Public modules
pub mod config;
pub mod pointcut;
pub mod rule;
pub mod types;
pub mod weaver;

// Re-export main types for convenience
pub use config::WeaverConfig;
pub use pointcut::{ArgsPattern, Pointcut, TypePattern};
pub use rule::{InterceptionRule, RuleBuilder};
pub use types::{Advice, AspectError, JoinPoint, Result};
pub use weaver::{Weaver, Woven};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
