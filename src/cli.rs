use crate::config::load_config;
use crate::editor::Editor;
use crate::layout::StackedEngine;
use anyhow::Result;
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "archboard", version, about = "Architecture diagram document tool")]
pub struct Args {
    /// Input document (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Run the built-in layout engine before exporting
    #[arg(short = 'l', long = "layout")]
    pub layout: bool,

    /// Re-theme the diagram for dark mode
    #[arg(short = 'd', long = "dark")]
    pub dark: bool,

    /// Print element counts to stderr
    #[arg(short = 's', long = "stats")]
    pub stats: bool,

    /// Config JSON file (text fit, badge and spacing settings)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let mut editor = Editor::with_config(config);
    editor.import_json(&input)?;

    if args.layout {
        futures::executor::block_on(editor.autolayout(&StackedEngine))?;
    }
    if args.dark {
        editor.set_dark_mode(true);
    }
    if args.stats {
        let document = editor.export_document();
        eprintln!(
            "components: {}, connections: {}, canvas elements: {}",
            document.shapes.len(),
            document.connections.len(),
            editor.canvas.len()
        );
    }

    let json = editor.export_json()?;
    write_output(&json, args.output.as_deref())?;
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_output(json: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
