#![doc = include_str!("../README.md")]

use std::{
    io::{Read, Write},
    path::PathBuf,
    process::exit,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use cmark_fmt::tree::ParseOptions;
use cmark_fmt::{Config, HeadingStyle, IndentStyle, ThematicBreakStyle, format_with};

/// Reformat Markdown with a consistent style.
#[derive(Debug, Clone, Parser, Default)]
#[clap(name = "cmark-fmt", version, about)]
pub struct FmtArgs {
    /// Path to the input file. Reads stdin when absent or `-`
    #[clap(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Path to output file. Writes stdout when absent or `-`
    #[clap(long, short, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// TOML file with renderer options. Flags override its values
    #[clap(long, value_name = "CONFIG", env = "CMARK_FMT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Indentation of indented code blocks: spaces, tabs
    #[clap(long, value_name = "STYLE")]
    pub indent_style: Option<IndentStyle>,

    /// Heading style: atx, atx-surround, setext, full-width-setext
    #[clap(long, value_name = "STYLE")]
    pub heading_style: Option<HeadingStyle>,

    /// Thematic break character: dashed, starred, underlined
    #[clap(long, value_name = "STYLE")]
    pub thematic_break_style: Option<ThematicBreakStyle>,

    /// Thematic break length, at least 3
    #[clap(long, value_name = "LENGTH")]
    pub thematic_break_length: Option<usize>,

    /// Multiplier of the list item continuation indent, at least 1
    #[clap(long, value_name = "LENGTH")]
    pub nested_list_length: Option<usize>,

    /// Parse and keep `~~strikethrough~~` spans
    #[clap(long)]
    pub strikethrough: bool,

    /// Do not write anything; exit with status 1 if the input would change
    #[clap(long)]
    pub check: bool,
}

impl FmtArgs {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {path:?}"))?;
                Config::from_toml(&text).with_context(|| format!("in config {path:?}"))?
            }
            None => Config::default(),
        };

        if let Some(style) = self.indent_style {
            config.indent_style = style;
        }
        if let Some(style) = self.heading_style {
            config.heading_style = style;
        }
        if let Some(style) = self.thematic_break_style {
            config.thematic_break_style = style;
        }
        if let Some(len) = self.thematic_break_length {
            config.thematic_break_length = len;
        }
        if let Some(len) = self.nested_list_length {
            config.nested_list_length = len;
        }
        Ok(config)
    }
}

fn is_std(path: Option<&PathBuf>) -> bool {
    path.is_none_or(|path| path.as_os_str() == "-")
}

fn main() -> Result<()> {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .try_init();

    let args = FmtArgs::parse();
    if !run(&args)? {
        exit(1);
    }
    Ok(())
}

/// Returns `false` when `--check` found a difference.
fn run(args: &FmtArgs) -> Result<bool> {
    let config = args.resolve_config()?;
    log::debug!("formatting with {config:?}");

    let input = if is_std(args.input.as_ref()) {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        text
    } else {
        let path = args.input.as_ref().context("Missing required argument: INPUT")?;
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path:?}"))?
    };

    let options = ParseOptions {
        strikethrough: args.strikethrough,
    };
    let output = format_with(&input, &config, options).context("failed to render markdown")?;

    if args.check {
        let unchanged = output == input;
        if !unchanged {
            let name = args
                .input
                .as_ref()
                .map_or_else(|| "<stdin>".to_owned(), |path| path.display().to_string());
            eprintln!("{name} is not formatted");
        }
        return Ok(unchanged);
    }

    if is_std(args.output.as_ref()) {
        std::io::stdout()
            .write_all(output.as_bytes())
            .context("failed to write to stdout")?;
    } else if let Some(path) = &args.output {
        if let Err(err) = std::fs::write(path, output.as_bytes()) {
            bail!("failed to write file {path:?}: {err}");
        }
    }

    Ok(true)
}
