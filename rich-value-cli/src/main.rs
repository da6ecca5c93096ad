// Command-line interface for rich-value
//
// Builds flat rich text values out of markup fragments, writes them back out as markup and
// checks that the two directions agree.
//
// Usage:
//  rich-value create <input> [--line-tag <tag>] [--start PATH:OFFSET] [--end PATH:OFFSET] [-o <file>]
//  rich-value serialize <value.json> [--line-tag <tag>] [-o <file>]
//  rich-value roundtrip <input> [--line-tag <tag>] [-o <file>]
//
// Extra Parameters:
//
// Configuration keys can be overridden with --extra-<name> <value>, the same way a
// rich-value.toml would set them. Boolean keys can omit the value.
// Example:
//  rich-value create doc.html --extra-coalesce --extra-pretty false

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use rich_value_cli::{BoundarySpec, CommandError};
use rich_value_config::{Loader, RichValueConfig, PROJECT_CONFIG_FILE};
use std::collections::HashMap;
use std::fs;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn line_tag_arg() -> Arg {
    Arg::new("line-tag")
        .long("line-tag")
        .value_name("TAG")
        .help("Tag of the line container (e.g. 'p' or 'li'); single-line when omitted")
        .value_hint(ValueHint::Other)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output file path (defaults to stdout)")
        .value_hint(ValueHint::FilePath)
}

fn input_arg(help: &'static str) -> Arg {
    Arg::new("input")
        .help(help)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("rich-value")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build, serialize and round-trip rich text values")
        .long_about(
            "rich-value converts between markup fragments and flat rich text values.\n\n\
            Commands:\n  \
            - create:    Build a value from a markup fragment and print it as JSON\n  \
            - serialize: Turn a JSON value back into markup\n  \
            - roundtrip: Build and serialize in one go\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override configuration keys.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            rich-value create caption.html                   # JSON value on stdout\n  \
            rich-value create list.html --line-tag li        # One line per list item\n  \
            rich-value create doc.html --start 0:2 --end 1.0:1\n  \
            rich-value serialize value.json -o out.html      # Markup to a file"
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a rich-value.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (repeat for more detail)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("create")
                .about("Build a value from markup and print its JSON form")
                .long_about(
                    "Build a value from a markup fragment.\n\n\
                    A selection can be given with --start and --end as PATH:OFFSET, where PATH\n\
                    is a dot-separated list of child indices from the fragment root (empty for\n\
                    the root itself). Offsets count UTF-16 units inside text nodes and child\n\
                    positions inside elements. Giving only one end collapses the selection.\n\n\
                    Examples:\n  \
                    rich-value create doc.html --start :0            # Caret at the very start\n  \
                    rich-value create doc.html --start 0:1 --end 2.0:3"
                )
                .arg(input_arg("Markup file"))
                .arg(line_tag_arg())
                .arg(
                    Arg::new("start")
                        .long("start")
                        .value_name("PATH:OFFSET")
                        .help("Selection start"),
                )
                .arg(
                    Arg::new("end")
                        .long("end")
                        .value_name("PATH:OFFSET")
                        .help("Selection end"),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("serialize")
                .about("Serialize a JSON value to markup")
                .arg(input_arg("Value JSON file"))
                .arg(line_tag_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("roundtrip")
                .about("Build a value from markup and serialize it back")
                .arg(input_arg("Markup file"))
                .arg(line_tag_arg())
                .arg(output_arg()),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let matches = build_cli().get_matches_from(&cleaned_args);

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    for key in extra_params.keys() {
        eprintln!("Warning: ignoring unknown parameter --extra-{key}");
    }

    init_logging(&config, matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("create", sub_matches)) => {
            apply_line_tag(&mut config, sub_matches);
            let start = boundary_arg(sub_matches, "start");
            let end = boundary_arg(sub_matches, "end");
            let input = read_input(sub_matches);
            let result =
                rich_value_cli::create(&input, &config, start.as_ref(), end.as_ref());
            write_output(sub_matches, result);
        }
        Some(("serialize", sub_matches)) => {
            if let Some(tag) = sub_matches.get_one::<String>("line-tag") {
                config.serialize.line_tag = tag.clone();
            }
            let input = read_input(sub_matches);
            write_output(sub_matches, rich_value_cli::serialize(&input, &config));
        }
        Some(("roundtrip", sub_matches)) => {
            apply_line_tag(&mut config, sub_matches);
            let input = read_input(sub_matches);
            write_output(sub_matches, rich_value_cli::roundtrip(&input, &config));
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// `--line-tag` applies to both the build and the serialize side.
fn apply_line_tag(config: &mut RichValueConfig, matches: &ArgMatches) {
    if let Some(tag) = matches.get_one::<String>("line-tag") {
        config.build.line_tag = tag.clone();
        config.serialize.line_tag = tag.clone();
    }
}

fn boundary_arg(matches: &ArgMatches, name: &str) -> Option<BoundarySpec> {
    matches.get_one::<String>(name).map(|raw| {
        raw.parse().unwrap_or_else(|e: CommandError| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        })
    })
}

fn read_input(matches: &ArgMatches) -> String {
    let Some(path) = matches.get_one::<String>("input") else {
        eprintln!("Error: an input file is required");
        std::process::exit(1);
    };
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn write_output(matches: &ArgMatches, result: Result<String, CommandError>) {
    let text = result.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    match matches.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => println!("{text}"),
    }
}

fn init_logging(config: &RichValueConfig, verbosity: u8) {
    let level = match verbosity {
        0 => config.logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let level: log::LevelFilter = level.parse().unwrap_or_else(|_| {
        eprintln!("Invalid log level '{level}'");
        std::process::exit(1);
    });

    let mut builder = env_logger::Builder::from_default_env();
    // RUST_LOG wins when it is set.
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(level);
    }
    builder.init();
}

fn load_cli_config(explicit_path: Option<&str>) -> RichValueConfig {
    let loader = Loader::new().with_optional_file(PROJECT_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(config: &mut RichValueConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["line-tag", "line_tag"]) {
        config.build.line_tag = raw;
    }
    if let Some(raw) = take_override(extra_params, &["serialize-line-tag"]) {
        config.serialize.line_tag = raw;
    }
    if let Some(raw) = take_override(extra_params, &["coalesce", "coalesce-adjacent"]) {
        config.build.coalesce_adjacent = parse_bool_arg("coalesce", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["object-tags"]) {
        config.build.object_tags = parse_list_arg(&raw);
    }
    if let Some(raw) = take_override(extra_params, &["preserve-whitespace-tags", "pre-tags"]) {
        config.build.preserve_whitespace_tags = parse_list_arg(&raw);
    }

    if let Some(raw) = take_override(extra_params, &["strip-padding"]) {
        config.filters.strip_padding = parse_bool_arg("strip-padding", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["attribute-prefix", "private-attribute-prefix"]) {
        config.filters.private_attribute_prefix = raw;
    }
    if let Some(raw) = take_override(extra_params, &["remove-tags", "remove"]) {
        config.filters.remove_tags = parse_list_arg(&raw);
    }
    if let Some(raw) = take_override(extra_params, &["unwrap-tags", "unwrap"]) {
        config.filters.unwrap_tags = parse_list_arg(&raw);
    }

    if let Some(raw) = take_override(extra_params, &["pretty"]) {
        config.output.pretty = parse_bool_arg("pretty", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["log-level"]) {
        config.logging.level = raw;
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}

/// Comma separated, blanks dropped: `"img, audio,"` is `["img", "audio"]`.
fn parse_list_arg(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
