use js_find_last::{Realm, Value, find_last_index, parse_json, to_boolean, to_number};
use std::process;

#[derive(clap::Parser)]
#[command(name = "find-last-index", version, about = "Run Array.prototype.findLastIndex over a JSON receiver")]
struct Cli {
    /// Receiver as inline JSON (an array or an array-like object)
    #[arg(short, long)]
    json: Option<String>,

    /// File holding the JSON receiver
    file: Option<std::path::PathBuf>,

    /// Match elements strictly equal to this JSON value
    #[arg(long, conflicts_with_all = ["greater_than", "truthy"])]
    equals: Option<String>,

    /// Match elements whose numeric value is greater than this
    #[arg(long, conflicts_with = "truthy")]
    greater_than: Option<f64>,

    /// Match truthy elements
    #[arg(long)]
    truthy: bool,
}

fn build_predicate(realm: &Realm, cli: &Cli) -> Result<Value, js_find_last::JSError> {
    if let Some(expected) = &cli.equals {
        let expected = parse_json(realm, expected)?;
        return Ok(realm.new_function("equals", 1, move |_, _, args| {
            let v = args.first().cloned().unwrap_or(Value::Undefined);
            Ok(Value::Boolean(v == expected))
        }));
    }
    if let Some(bound) = cli.greater_than {
        return Ok(realm.new_function("greaterThan", 1, move |realm, _, args| {
            let n = to_number(realm, args.first().unwrap_or(&Value::Undefined))?;
            Ok(Value::Boolean(n > bound))
        }));
    }
    if !cli.truthy {
        log::warn!("no predicate flag given, defaulting to --truthy");
    }
    Ok(realm.new_function("truthy", 1, |_, _, args| {
        Ok(Value::Boolean(args.first().is_some_and(to_boolean)))
    }))
}

fn main() {
    let cli = <Cli as clap::Parser>::parse();

    // Initialize logger (controlled by RUST_LOG)
    env_logger::init();

    let text = if let Some(s) = &cli.json {
        s.clone()
    } else if let Some(file) = &cli.file {
        match std::fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file {}: {}", file.display(), e);
                process::exit(1);
            }
        }
    } else {
        eprintln!("Error: Must provide either --json or a file");
        process::exit(1);
    };

    let realm = Realm::new();
    let result = parse_json(&realm, &text)
        .and_then(|receiver| build_predicate(&realm, &cli).map(|predicate| (receiver, predicate)))
        .and_then(|(receiver, predicate)| find_last_index(&realm, &receiver, &predicate, None));

    match result {
        Ok(index) => println!("{index}"),
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
