//! Aspect Weaver CLI Application
//!
//! Runs the sample `MainActivity` through a weaver. By default the built-in
//! aspect prints `[pointBefore]...` before `doSomething` and
//! `[pointAfter]...` once it returns; a TOML file can declare other rules.

use anyhow::{Context, Result};
use aspect_weaver::{Weaver, WeaverConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

mod activity;
mod aspect;
mod config;

use activity::MainActivity;
use aspect::{AspectRule1, RuleSummary};

/// Aspect Weaver - before / after-returning interception demo
#[derive(Parser, Debug)]
#[command(name = "aspect-cli")]
#[command(about = "Run MainActivity.doSomething through before/after advice", long_about = None)]
#[command(version)]
struct Args {
    /// Path to a rules file (rules.toml); defaults to the built-in aspect
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of times to invoke doSomething
    #[arg(short = 'n', long, value_name = "COUNT", default_value_t = 1)]
    times: usize,

    /// Make doSomething return an error
    #[arg(long)]
    fail: bool,

    /// Also invoke doSomethingElse, which no built-in rule matches
    #[arg(long)]
    also_unmatched: bool,

    /// Print the registered rules as JSON and exit
    #[arg(long)]
    list_rules: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Aspect Weaver CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using weaver library v{}", aspect_weaver::VERSION);

    let weaver = build_weaver(&args)?;

    if args.list_rules {
        let rules: Vec<RuleSummary> = weaver.rules().map(RuleSummary::from).collect();
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    let activity = MainActivity::new(Arc::new(weaver), args.fail);
    for i in 0..args.times {
        log::debug!("Invocation {}/{}", i + 1, args.times);
        activity.do_something()?;
        if args.also_unmatched {
            activity.do_something_else();
        }
    }

    Ok(())
}

/// Build the weaver from the rules file, or from the built-in aspect
fn build_weaver(args: &Args) -> Result<Weaver> {
    let output = aspect::stdout();

    let (weaver_config, rules) = match &args.config {
        Some(path) => {
            log::info!("Loading rules from: {:?}", path);
            let config = config::load_config(path)?;
            let rules = aspect::rules_from_config(&config.rules, &output)
                .with_context(|| format!("Invalid rule in {:?}", path))?;
            (config.weaver, rules)
        }
        None => (WeaverConfig::default(), vec![AspectRule1::rule(&output)?]),
    };

    let mut weaver = Weaver::with_config(weaver_config);
    for rule in rules {
        let name = rule.name().to_string();
        weaver
            .register(rule)
            .with_context(|| format!("Failed to register rule '{}'", name))?;
    }
    log::debug!("{} rule(s) registered", weaver.rule_count());

    Ok(weaver)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["aspect-cli"]).unwrap();
        assert_eq!(args.times, 1);
        assert!(!args.fail);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_default_weaver_has_sample_rule() {
        let args = Args::try_parse_from(["aspect-cli", "-n", "3", "--fail"]).unwrap();
        assert_eq!(args.times, 3);
        assert!(args.fail);

        let weaver = build_weaver(&args).unwrap();
        assert_eq!(weaver.rule_count(), 1);
        assert!(weaver.is_registered(aspect::POINT_NAME));
    }

    #[test]
    fn test_conflicting_rules_in_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [[rules]]
            name = "point"
            pointcut = "execution(* a.B.c(..))"
            before = "one"

            [[rules]]
            name = "point"
            pointcut = "execution(* a.B.d(..))"
            before = "two"
            "#
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let args = Args::try_parse_from(["aspect-cli", "--config", path.as_str()]).unwrap();
        let err = build_weaver(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to register rule 'point'"));
    }
}
