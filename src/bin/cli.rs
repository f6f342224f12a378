use clap::{App, Arg, ArgMatches, SubCommand};
use std::{
    collections::HashSet,
    sync::{Arc, Barrier},
    thread,
    time::Instant,
};
use twine::{error::TwineError, Registry, RegistryConfig, Result, StringHandle};

fn main() -> Result<()> {
    env_logger::init();

    let matches = App::new("twine-cli")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Twine byte string and registry tool")
        .arg(
            Arg::with_name("reserve")
                .short("r")
                .long("reserve")
                .value_name("BYTES")
                .help("Slack reserved by each string")
                .default_value("15")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("initial_slots")
                .short("s")
                .long("initial-slots")
                .value_name("SLOTS")
                .help("Slot count of a fresh registry table")
                .default_value("15")
                .takes_value(true),
        )
        .subcommand(
            SubCommand::with_name("demo")
                .about("Build \"hello world\", edit it and take a substring"),
        )
        .subcommand(
            SubCommand::with_name("edit")
                .about("Apply operations to a string and print each result")
                .arg(
                    Arg::with_name("initial")
                        .value_name("INITIAL")
                        .help("Initial content")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("ops")
                        .value_name("OP")
                        .help(
                            "append=TEXT, prepend=TEXT, insert=AT:TEXT, remove=AT, set=AT:C, \
                             get=AT, find=TEXT, substr=I[:J], clear",
                        )
                        .multiple(true)
                        .index(2),
                ),
        )
        .subcommand(
            SubCommand::with_name("stress")
                .about("Construct strings from many threads and check the registry")
                .arg(
                    Arg::with_name("threads")
                        .short("t")
                        .long("threads")
                        .value_name("THREADS")
                        .help("Number of threads")
                        .default_value("4")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("count")
                        .short("c")
                        .long("count")
                        .value_name("COUNT")
                        .help("Strings constructed per thread")
                        .default_value("1000")
                        .takes_value(true),
                ),
        )
        .subcommand(SubCommand::with_name("info").about("Show version information"))
        .get_matches();

    let config = registry_config(&matches)?;

    match matches.subcommand() {
        ("demo", Some(_)) => run_demo(config),
        ("edit", Some(edit_matches)) => run_edit(config, edit_matches),
        ("stress", Some(stress_matches)) => run_stress(config, stress_matches),
        ("info", Some(_)) => show_info(),
        _ => {
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

fn parse_number(matches: &ArgMatches, name: &str) -> Result<usize> {
    matches
        .value_of(name)
        .ok_or_else(|| TwineError::invalid_parameter(name, "Missing value"))?
        .parse()
        .map_err(|_| TwineError::invalid_parameter(name, "Invalid number"))
}

fn registry_config(matches: &ArgMatches) -> Result<RegistryConfig> {
    let mut config = RegistryConfig::new().with_initial_slots(parse_number(matches, "initial_slots")?);
    config.growth.base_reserve = parse_number(matches, "reserve")?;
    config.validate()?;
    Ok(config)
}

fn show(registry: &Registry, handle: StringHandle) -> Result<String> {
    registry.with(handle, |string| string.as_bytes().escape_ascii().to_string())
}

fn run_demo(config: RegistryConfig) -> Result<()> {
    let registry = Registry::with_config(config)?;

    let string = registry.construct(None)?;
    registry.append(string, b"world")?;
    registry.prepend(string, b"hello ")?;
    registry.remove(string, 0)?;

    let sub = registry
        .substring(string, 1, 4)?
        .ok_or_else(|| TwineError::range("substring", 4, registry.len(string).unwrap_or(0)))?;

    match registry.find(sub, b"lo")? {
        Some(offset) => println!("{}", offset),
        None => println!("-1"),
    }
    println!("{}", show(&registry, string)?);
    println!("{}", show(&registry, sub)?);

    registry.teardown_all()?;
    Ok(())
}

/// Split `AT:REST` into an index and the remainder
fn split_index<'a>(op: &str, arg: &'a str) -> Result<(usize, &'a str)> {
    let (at, rest) = arg.split_once(':').unwrap_or((arg, ""));
    let at = at
        .parse()
        .map_err(|_| TwineError::invalid_parameter(op.to_string(), format!("Invalid index '{}'", at)))?;
    Ok((at, rest))
}

fn apply_op(registry: &Registry, handle: StringHandle, op: &str) -> Result<String> {
    let (name, arg) = op.split_once('=').unwrap_or((op, ""));

    match name {
        "append" => registry.append(handle, arg.as_bytes()).map(|_| show(registry, handle))?,
        "prepend" => registry.prepend(handle, arg.as_bytes()).map(|_| show(registry, handle))?,
        "insert" => {
            let (at, text) = split_index(name, arg)?;
            registry.insert(handle, text.as_bytes(), at)?;
            show(registry, handle)
        }
        "remove" => {
            let (at, _) = split_index(name, arg)?;
            let removed = registry.remove(handle, at)?;
            Ok(format!("removed '{}' -> {}", removed.escape_ascii(), show(registry, handle)?))
        }
        "set" => {
            let (at, byte) = split_index(name, arg)?;
            let byte = *byte
                .as_bytes()
                .first()
                .ok_or_else(|| TwineError::invalid_parameter("set", "Missing byte"))?;
            let previous = registry.set(handle, at, byte)?;
            Ok(format!("replaced '{}' -> {}", previous.escape_ascii(), show(registry, handle)?))
        }
        "get" => {
            let (at, _) = split_index(name, arg)?;
            Ok(format!("'{}'", registry.get(handle, at)?.escape_ascii()))
        }
        "find" => Ok(match registry.find(handle, arg.as_bytes())? {
            Some(offset) => offset.to_string(),
            None => "-1".to_string(),
        }),
        "substr" => {
            let (i, j) = split_index(name, arg)?;
            let sub = if j.is_empty() {
                registry.substring_from(handle, i)?
            } else {
                let j = j
                    .parse()
                    .map_err(|_| TwineError::invalid_parameter("substr", format!("Invalid index '{}'", j)))?;
                registry.substring(handle, i, j)?
            };
            match sub {
                Some(sub) => {
                    let text = show(registry, sub)?;
                    registry.destroy(sub)?;
                    Ok(text)
                }
                None => Ok("(none)".to_string()),
            }
        }
        "clear" => {
            registry.clear(handle)?;
            show(registry, handle)
        }
        _ => Err(TwineError::invalid_parameter("op", format!("Unknown operation '{}'", name))),
    }
}

fn run_edit(config: RegistryConfig, matches: &ArgMatches) -> Result<()> {
    let registry = Registry::with_config(config)?;
    let initial = matches.value_of("initial").unwrap_or_default();
    let handle = registry.construct(Some(initial.as_bytes()))?;

    for op in matches.values_of("ops").into_iter().flatten() {
        match apply_op(&registry, handle, op) {
            Ok(output) => println!("{:<16} {}", op, output),
            Err(TwineError::Range { .. }) => println!("{:<16} out of range", op),
            Err(e) => return Err(e),
        }
    }

    println!(
        "len {} capacity {}",
        registry.len(handle)?,
        registry.capacity(handle)?
    );
    Ok(())
}

fn run_stress(config: RegistryConfig, matches: &ArgMatches) -> Result<()> {
    let thread_count = parse_number(matches, "threads")?;
    let per_thread = parse_number(matches, "count")?;

    let registry = Arc::new(Registry::with_config(config)?);
    let barrier = Arc::new(Barrier::new(thread_count));

    println!("Constructing {} strings on {} threads...", thread_count * per_thread, thread_count);
    let start = Instant::now();

    let workers: Vec<_> = (0..thread_count)
        .map(|thread_id| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || -> Result<Vec<StringHandle>> {
                barrier.wait();
                (0..per_thread)
                    .map(|i| {
                        let text = format!("t{}-{}", thread_id, i);
                        registry.construct(Some(text.as_bytes()))
                    })
                    .collect()
            })
        })
        .collect();

    let mut slots = HashSet::new();
    for worker in workers {
        let handles = worker
            .join()
            .map_err(|_| TwineError::concurrency("stress worker panicked"))??;
        for handle in handles {
            if !slots.insert(handle.slot()) {
                return Err(TwineError::concurrency(format!("slot {} handed out twice", handle.slot())));
            }
        }
    }

    let elapsed = start.elapsed();
    let stats = registry.stats()?;

    println!("\nResults:");
    println!("  Total time: {:.2}ms", elapsed.as_secs_f64() * 1000.0);
    println!("  Live strings: {}", stats.live);
    println!("  Unique slots: {}", slots.len());
    println!("  {}", stats.summary());

    if stats.live != thread_count * per_thread {
        return Err(TwineError::concurrency(format!(
            "expected {} live strings, found {}",
            thread_count * per_thread,
            stats.live
        )));
    }

    println!("  Released by teardown: {}", registry.teardown_all()?);
    Ok(())
}

fn show_info() -> Result<()> {
    let defaults = RegistryConfig::default();
    println!("Twine v{}", twine::VERSION);
    println!("  Default base reserve: {} bytes", defaults.growth.base_reserve);
    println!("  Default initial slots: {}", defaults.initial_slots);
    println!("  Table growth factor: {}", defaults.growth_factor);
    println!("  C API: {}", cfg!(feature = "c-api"));
    Ok(())
}
