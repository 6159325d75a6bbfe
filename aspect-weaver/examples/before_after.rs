//! Run one operation through a weaver with before / after-returning advice
//!
//! Usage: cargo run --example before_after [fail]

use aspect_weaver::{InterceptionRule, JoinPoint, Weaver, WeaverConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .init();

    let fail = std::env::args().nth(1).as_deref() == Some("fail");

    let mut weaver = Weaver::with_config(WeaverConfig::new().with_join_point_tracing(true));
    weaver.register(
        InterceptionRule::builder("point", "execution(* demo.Worker.process(..))")
            .before(|| println!("[pointBefore]..."))
            .after_returning(|| println!("[pointAfter]..."))
            .build()?,
    )?;

    let jp = JoinPoint::new("demo.Worker.process", 1);
    let result = weaver.invoke(&jp, || {
        println!("processing...");
        if fail {
            Err("processing failed")
        } else {
            Ok(())
        }
    });

    match result {
        Ok(()) => println!("done"),
        Err(e) => println!("error: {}", e),
    }

    Ok(())
}
