//! Lapis CLI
//!
//! Parses an SCSS stylesheet, resolves its `@extend` directives and prints the
//! result.
//!
//! Run with: cargo run --bin lapis -- styles.scss

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use lapis_common::warning::clear_warnings;
use lapis_scss::{
    Stylesheet, collect_extensions, extend_stylesheet, parse_stylesheet, print_stylesheet,
};
use owo_colors::OwoColorize;

/// Lapis: resolve Sass `@extend` in an SCSS stylesheet
#[derive(Parser, Debug)]
#[command(name = "lapis")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Resolve a file and print nested SCSS
    lapis styles.scss

    # Resolve inline SCSS
    lapis --scss '.error { color: red; } .serious { @extend .error; }'

    # Dump the resolved tree as JSON
    lapis --json styles.scss

    # Show the extension table without resolving
    lapis --table --no-extend styles.scss

    # Trace resolution steps
    RUST_LOG=lapis::extend=trace lapis styles.scss
"#)]
struct Cli {
    /// Path to an SCSS file
    #[arg(value_name = "FILE", conflicts_with = "scss")]
    path: Option<PathBuf>,

    /// Parse SCSS text directly instead of a file
    #[arg(long, value_name = "TEXT")]
    scss: Option<String>,

    /// Print the stylesheet tree as JSON instead of SCSS
    #[arg(long)]
    json: bool,

    /// Print the collected extension table as JSON before the stylesheet
    #[arg(long)]
    table: bool,

    /// Print the parsed tree without resolving @extend
    #[arg(long)]
    no_extend: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Load, parse and (unless disabled) resolve the input, returning the text to print.
fn run(cli: &Cli) -> anyhow::Result<String> {
    let (source, name) = load_source(cli)?;

    clear_warnings();
    let mut stylesheet =
        parse_stylesheet(&source).with_context(|| format!("failed to parse {name}"))?;

    let mut output = String::new();
    if cli.table {
        let table = collect_extensions(&stylesheet);
        let entries: Vec<_> = table.iter().collect();
        let json = serde_json::to_string_pretty(&entries)
            .context("failed to serialize extension table")?;
        output.push_str(&json);
        output.push('\n');
    }

    if cli.no_extend {
        tracing::debug!(target: "lapis", "skipping @extend resolution");
    } else {
        extend_stylesheet(&mut stylesheet)
            .with_context(|| format!("failed to resolve @extend in {name}"))?;
    }

    output.push_str(&render(&stylesheet, cli.json)?);
    Ok(output)
}

/// Read the stylesheet text, along with a name for error messages.
fn load_source(cli: &Cli) -> anyhow::Result<(String, String)> {
    if let Some(ref scss) = cli.scss {
        Ok((scss.clone(), "--scss input".to_string()))
    } else if let Some(ref path) = cli.path {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok((source, path.display().to_string()))
    } else {
        anyhow::bail!("no input: pass a FILE or --scss <TEXT>")
    }
}

fn render(stylesheet: &Stylesheet, json: bool) -> anyhow::Result<String> {
    if json {
        let mut text =
            serde_json::to_string_pretty(stylesheet).context("failed to serialize stylesheet")?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(print_stylesheet(stylesheet))
    }
}
