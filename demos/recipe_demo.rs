// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use the_cookbook::engine::RecordingObserver;
use the_cookbook::value::{NamedArgs, Value};
use the_cookbook::{Cookbook, Specifier};

/// Demo: hash some text, then seal and reopen a message with a derived key.
fn main() -> anyhow::Result<()> {
    println!("=== Cookbook Recipe Demo ===\n");

    let cookbook = Cookbook::with_builtins();

    let input = "Hello, World! This is a test.";
    println!("Input: '{}'", input);

    // Step 1: the built-in sha256_hex recipe, traced stage by stage
    let fingerprint = cookbook.pipeline("sha256_hex")?;
    let mut recorder = RecordingObserver::default();
    let digest = fingerprint.run_observed(Value::from(input), &mut recorder)?;
    for snapshot in &recorder.entries {
        println!(
            "  stage {} {}: {} ({} units)",
            snapshot.index,
            snapshot.label,
            snapshot.value.kind(),
            snapshot.value.size()
        );
    }
    println!("SHA-256: {}\n", digest);

    // Step 2: derive a key from a passphrase
    let mut kdf = NamedArgs::new();
    kdf.insert("salt".into(), Value::from("demo salt"));
    kdf.insert("iterations".into(), Value::Int(10_000));
    let key = cookbook
        .build([Specifier::with_kwargs("derive_key", kdf)])?
        .run(Value::from("correct horse battery staple"))?;
    println!("Derived key: {}", key);

    // Step 3: seal to JSON and open again with the same key
    let mut key_args = NamedArgs::new();
    key_args.insert("key".into(), key);

    let seal = cookbook.build([
        Specifier::with_kwargs("aead_encrypt", key_args.clone()),
        Specifier::named("json_to_str"),
    ])?;
    let open = cookbook.build([
        Specifier::named("str_to_json"),
        Specifier::with_kwargs("aead_decrypt", key_args),
        Specifier::named("bytes_to_str"),
    ])?;

    let wire = seal.run(Value::from(input))?;
    println!("Sealed: {}", wire);
    let opened = open.run(wire)?;
    println!("Opened: '{}'", opened);

    println!("\n=== Demo Complete ===");
    Ok(())
}
