// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::time::Instant;

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use the_cookbook::engine::{Stage, TracingObserver};
use the_cookbook::traits::Observer;
use the_cookbook::{Cookbook, Value};

const BUILTINS_FLAG: &str = "--builtins";

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--trace] <cookbook.yaml|{BUILTINS_FLAG}> <pipeline> <input>\n\
         \x20      {program} --list [cookbook.yaml]\n\
         Example: {program} {BUILTINS_FLAG} sha256_hex \"hello\"\n\
         Example: {program} --trace configs/cookbook.yaml fingerprint \"hello\""
    )
}

fn open_cookbook(source: &str) -> anyhow::Result<Cookbook> {
    if source == BUILTINS_FLAG {
        return Ok(Cookbook::with_builtins());
    }
    Cookbook::load(source).with_context(|| format!("failed to load cookbook {}", source))
}

/// Prints every intermediate value to stderr and forwards it to tracing.
struct PrintingObserver {
    tracing: TracingObserver,
}

impl Observer for PrintingObserver {
    fn observe(&mut self, index: usize, stage: &Stage, value: &Value) {
        self.tracing.observe(index, stage, value);
        eprintln!("  [{}] {} -> {} ({})", index, stage, value, value.kind());
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "the-cookbook".to_string());

    if args.get(1).map(String::as_str) == Some("--list") {
        let cookbook = open_cookbook(args.get(2).map_or(BUILTINS_FLAG, String::as_str))?;
        println!("Steps:");
        for name in cookbook.steps().list() {
            println!("  {}", name);
        }
        println!("Pipelines:");
        for name in cookbook.pipelines().list() {
            println!("  {}", name);
        }
        return Ok(());
    }

    let trace = args.get(1).map(String::as_str) == Some("--trace");
    if trace {
        args.remove(1);
    }
    if args.len() != 4 {
        bail!(usage(&program));
    }

    let cookbook = open_cookbook(&args[1])?;
    let pipeline = cookbook
        .pipeline(&args[2])
        .with_context(|| format!("available pipelines: {}", cookbook.pipelines().list().join(", ")))?;
    let input = Value::from(args[3].as_str());

    let start_time = Instant::now();
    let output = if trace {
        eprintln!("Tracing '{}' ({} stages):", args[2], pipeline.len());
        let mut observer = PrintingObserver {
            tracing: TracingObserver,
        };
        pipeline.run_observed(input, &mut observer)?
    } else {
        pipeline.run(input)?
    };

    if trace {
        eprintln!("Completed in {:?}", start_time.elapsed());
    }
    println!("{}", output);
    Ok(())
}
