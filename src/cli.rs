use clap::{command, value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

use crate::config::{ManifestConfig, SampleConfig};

const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "import", "in", "instanceof", "let", "new", "null", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Accept only names usable as `const <name> = ...` in a browser script.
fn js_identifier(value: &str) -> Result<String, String> {
    let mut chars = value.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_alphabetic() || c == '_' || c == '$')
        .unwrap_or(false);
    if !valid_start || !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return Err(format!("`{value}` is not a valid JavaScript identifier"));
    }
    if RESERVED_WORDS.contains(&value) {
        return Err(format!("`{value}` is a reserved JavaScript word"));
    }
    Ok(value.to_string())
}

fn shared_args() -> [Arg; 6] {
    [
        Arg::new("root")
            .long("root")
            .value_parser(value_parser!(PathBuf))
            .help("Project root; outputs and image paths are relative to it [default: .]"),
        Arg::new("stimuli")
            .long("stimuli")
            .value_parser(value_parser!(PathBuf))
            .help("Stimuli folder under the root [default: stimuli]"),
        Arg::new("out-json")
            .long("out-json")
            .value_parser(value_parser!(PathBuf))
            .help("JSON manifest output path"),
        Arg::new("out-js")
            .long("out-js")
            .value_parser(value_parser!(PathBuf))
            .help("JS manifest output path"),
        Arg::new("ext")
            .long("ext")
            .action(ArgAction::Append)
            .value_delimiter(',')
            .help("Image extensions to include (repeatable) [default: jpg,jpeg,png,gif,webp,bmp]"),
        Arg::new("js-var")
            .long("js-var")
            .value_parser(js_identifier)
            .help("Variable name declared in the JS output [default: manifest]"),
    ]
}

/// Flags of the full manifest tool.
pub fn full_command() -> Command {
    command!()
        .about("Write a manifest of every image in the stimuli folder")
        .next_help_heading("MANIFEST OPTIONS")
        .args(shared_args())
}

/// Flags of the sampled manifest tool.
pub fn sample_command() -> Command {
    command!()
        .name("manifest_sample")
        .about("Write a manifest of images sampled evenly across stimulus folders")
        .next_help_heading("MANIFEST OPTIONS")
        .args(shared_args())
        .next_help_heading("SAMPLING OPTIONS")
        .args([
            Arg::new("per-folder")
                .long("per-folder")
                .value_parser(value_parser!(usize))
                .help("Images taken from each chosen folder [default: 2]"),
            Arg::new("total")
                .long("total")
                .value_parser(value_parser!(usize))
                .help("Total number of images in the manifest [default: 10]"),
            Arg::new("sorted")
                .long("sorted")
                .action(ArgAction::SetTrue)
                .help("Take the first images in sorted order instead of sampling randomly"),
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .conflicts_with("sorted")
                .help("Seed for a reproducible random sample"),
        ])
}

/// Apply any flags present in `matches` on top of `base`.
pub fn manifest_config(matches: &ArgMatches, base: ManifestConfig) -> ManifestConfig {
    let mut config = base;
    if let Some(root) = matches.get_one::<PathBuf>("root") {
        config = config.with_root(root);
    }
    if let Some(stimuli) = matches.get_one::<PathBuf>("stimuli") {
        config = config.with_stimuli_dir(stimuli);
    }
    if let Some(out_json) = matches.get_one::<PathBuf>("out-json") {
        config.out_json = out_json.clone();
    }
    if let Some(out_js) = matches.get_one::<PathBuf>("out-js") {
        config.out_js = out_js.clone();
    }
    if let Some(exts) = matches.get_many::<String>("ext") {
        config = config.with_extensions(exts);
    }
    if let Some(name) = matches.get_one::<String>("js-var") {
        config = config.with_js_variable(name.clone());
    }
    config
}

pub fn sample_config(matches: &ArgMatches) -> SampleConfig {
    let defaults = SampleConfig::default();
    SampleConfig {
        per_folder: matches
            .get_one::<usize>("per-folder")
            .copied()
            .unwrap_or(defaults.per_folder),
        total: matches.get_one::<usize>("total").copied().unwrap_or(defaults.total),
        random_sample: !matches.get_flag("sorted"),
        seed: matches.get_one::<u64>("seed").copied(),
    }
}
