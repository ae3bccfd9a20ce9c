//! Command-line interface for wikitrans
//! Reads a wiki page from a file or stdin and prints its translation.
//!
//! Usage:
//!   wikitrans [--format <format>] [--dialect <dialect>] [PATH]  - Translate PATH (or stdin)
//!   wikitrans --list-formats                                  - List format/dialect pairs

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Read;
use tracing_subscriber::EnvFilter;
use wikitrans::wiki::formats::RendererRegistry;
use wikitrans::{derive_html_base, Dialect, OutputFormat, TranslateConfig, Translator};

fn main() {
    let matches = Command::new("wikitrans")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate MediaWiki markup to HTML, plain text, Texinfo or a tree dump")
        .arg(
            Arg::new("path")
                .help("Wiki source file; stdin when absent or '-'")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: html, text, texi, dump, treeviz"),
        )
        .arg(
            Arg::new("dialect")
                .long("dialect")
                .short('d')
                .help("Markup dialect: default or dictionary"),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .short('l')
                .help("Language tag, substituted for {lang} in the link base"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .help("Prefix for internal link hrefs"),
        )
        .arg(
            Arg::new("source-url")
                .long("source-url")
                .help("URL the page came from; the link base is derived from its host")
                .conflicts_with("base-url"),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .value_parser(value_parser!(usize))
                .help("Dump indent width (0 for compact JSON)"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_parser(value_parser!(usize))
                .help("Plain-text fill width"),
        )
        .arg(
            Arg::new("debug-level")
                .long("debug-level")
                .short('D')
                .value_parser(value_parser!(u8))
                .help("Debug verbosity, 0-100"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("YAML configuration file; command-line options override it"),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .action(ArgAction::SetTrue)
                .help("List available format/dialect pairs and exit"),
        )
        .get_matches();

    if matches.get_flag("list-formats") {
        handle_list_formats();
        return;
    }

    let config = build_config(&matches).unwrap_or_else(|e| fail(e));
    init_tracing(config.debug_level);
    handle_translate(matches.get_one::<String>("path").map(String::as_str), &config);
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

/// Config file (or defaults) with command-line options layered on top.
fn build_config(matches: &ArgMatches) -> wikitrans::Result<TranslateConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => TranslateConfig::from_yaml_file(path)?,
        None => TranslateConfig::default(),
    };

    if let Some(format) = matches.get_one::<String>("format") {
        config.output_format = format.parse::<OutputFormat>()?;
    }
    if let Some(dialect) = matches.get_one::<String>("dialect") {
        config.dialect = dialect.parse::<Dialect>()?;
    }
    if let Some(lang) = matches.get_one::<String>("lang") {
        config.language_tag = lang.clone();
    }
    if let Some(base) = matches.get_one::<String>("base-url") {
        config.html_base = Some(base.clone());
    }
    if let Some(source) = matches.get_one::<String>("source-url") {
        config.html_base = Some(derive_html_base(
            Some(source.as_str()),
            config.dialect,
            &config.language_tag,
        )?);
    }
    if let Some(indent) = matches.get_one::<usize>("indent") {
        config.indent = *indent;
    }
    if let Some(width) = matches.get_one::<usize>("width") {
        config.width = *width;
    }
    if let Some(level) = matches.get_one::<u8>("debug-level") {
        config.debug_level = *level;
    }

    config.validate()?;
    Ok(config)
}

/// Debug output goes to stderr; `RUST_LOG` overrides the level picked from `debug_level`.
fn init_tracing(debug_level: u8) {
    let level = match debug_level {
        0 => "warn",
        1..=79 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_translate(path: Option<&str>, config: &TranslateConfig) {
    // Resolve the renderer before touching the input.
    let translator = Translator::new(config).unwrap_or_else(|e| fail(e));

    let mut bytes = Vec::new();
    let read = match path {
        None | Some("-") => std::io::stdin().read_to_end(&mut bytes),
        Some(path) => std::fs::File::open(path).and_then(|mut f| f.read_to_end(&mut bytes)),
    };
    if let Err(e) = read {
        fail(format!("cannot read {}: {}", path.unwrap_or("stdin"), e));
    }

    let translation = translator.translate_bytes(&bytes).unwrap_or_else(|e| fail(e));
    print!("{}", translation.output);
}

fn handle_list_formats() {
    let registry = RendererRegistry::with_defaults();
    let config = TranslateConfig::default();
    println!("Available formats:\n");
    for (format, dialect) in registry.list_formats() {
        let description = registry
            .resolve(format, dialect, &config)
            .map(|r| format!("{} ({})", r.description(), r.name()))
            .unwrap_or_default();
        println!("  {:<8} {:<11} {}", format.as_str(), dialect.as_str(), description);
    }
}
