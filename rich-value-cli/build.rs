use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree in src/main.rs
// Build scripts can't reach src/ modules, so the shape is repeated here
fn line_tag() -> Arg {
    Arg::new("line-tag")
        .long("line-tag")
        .value_name("TAG")
        .value_hint(ValueHint::Other)
}

fn output() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .value_hint(ValueHint::FilePath)
}

fn input(help: &'static str) -> Arg {
    Arg::new("input")
        .help(help)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("rich-value")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build, serialize and round-trip rich text values")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("create")
                .arg(input("Markup file"))
                .arg(line_tag())
                .arg(Arg::new("start").long("start").value_name("PATH:OFFSET"))
                .arg(Arg::new("end").long("end").value_name("PATH:OFFSET"))
                .arg(output()),
        )
        .subcommand(
            Command::new("serialize")
                .arg(input("Value JSON file"))
                .arg(line_tag())
                .arg(output()),
        )
        .subcommand(
            Command::new("roundtrip")
                .arg(input("Markup file"))
                .arg(line_tag())
                .arg(output()),
        );

    generate_to(Bash, &mut cmd, "rich-value", &outdir)?;
    generate_to(Zsh, &mut cmd, "rich-value", &outdir)?;
    generate_to(Fish, &mut cmd, "rich-value", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
