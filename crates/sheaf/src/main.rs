use std::process::ExitCode;

use anyhow::Context as _;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use mimalloc::MiMalloc;
use sheaf_ast::{Node, dump};
use sheaf_errors::Renderer;
use sheaf_parse::{Context, ParseOptions, parse};
use sheaf_translate::translate_with_source_map;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
enum Options {
    /// Print the syntax tree of a file.
    Parse {
        path: Utf8PathBuf,
        /// Production to start from, e.g. `block` or `value`.
        #[arg(long, default_value_t = Context::Stylesheet)]
        context: Context,
        /// Append `@line:column` to positioned nodes.
        #[arg(long)]
        positions: bool,
    },
    /// Parse a file and print it back in compact form.
    Translate {
        path: Utf8PathBuf,
        /// Also write a source map to this file.
        #[arg(long)]
        map: Option<Utf8PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match Options::parse() {
        Options::Parse { path, context, positions } => {
            let options = ParseOptions::default().context(context).positions(positions);
            let Some(ast) = parse_file(&path, options)? else {
                return Ok(ExitCode::FAILURE);
            };

            print!("{}", dump(&ast));
            Ok(ExitCode::SUCCESS)
        }
        Options::Translate { path, map } => {
            let options = ParseOptions::default().positions(map.is_some());
            let Some(ast) = parse_file(&path, options)? else {
                return Ok(ExitCode::FAILURE);
            };

            let translation = translate_with_source_map(&ast);
            println!("{}", translation.text);

            if let Some(map_path) = map {
                let json = translation.map.to_json()?;
                std::fs::write(&map_path, json)
                    .with_context(|| format!("failed to write `{map_path}`"))?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Reads and parses `path`, rendering a syntax error to stderr as `None`.
fn parse_file(path: &Utf8Path, options: ParseOptions) -> anyhow::Result<Option<Node>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))?;

    match parse(&text, &options.filename(path.as_str())) {
        Ok(ast) => Ok(Some(ast)),
        Err(error) => {
            let renderer = Renderer::styled();
            eprintln!("{}", error.render(&renderer, path.as_str(), &text));
            Ok(None)
        }
    }
}
