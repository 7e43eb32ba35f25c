use super::{data_file_name, find_templates};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use reformulator_compiler_html::{compile_str, CompileOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Template file or directory to render (defaults to the config's srcDir)
    pub path: Option<String>,

    /// Data file used for every template
    #[arg(short, long)]
    pub data: Option<String>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Do not append the re-hydration script
    #[arg(long)]
    pub no_rehydrate: bool,
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let src_dir = match &args.path {
        Some(path) => PathBuf::from(cwd).join(path),
        None => config.get_src_dir(cwd),
    };

    if !src_dir.exists() {
        return Err(anyhow!("Source path does not exist: {:?}", src_dir));
    }

    println!("{}", "🔨 Rendering templates...".bright_blue().bold());

    let templates = find_templates(&src_dir)?;

    if templates.is_empty() {
        println!("{}", "⚠️  No templates found".yellow());
        return Ok(());
    }

    println!("Found {} templates", templates.len());

    let mut options = config.compile_options();
    if args.no_rehydrate {
        options.rehydrate = false;
    }

    let mut success_count = 0;
    let mut error_count = 0;

    for template in &templates {
        let relative_path = relative_to(template, &src_dir);
        match render_file(template, &args, &config, &options, cwd) {
            Ok(output_path) => {
                success_count += 1;
                println!(
                    "  {} {} → {}",
                    "✓".green(),
                    relative_path.display(),
                    output_path
                );
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    e.to_string().red()
                );
            }
        }
    }

    println!();
    if error_count == 0 {
        println!(
            "{} Rendered {} templates successfully",
            "✅".green(),
            success_count
        );
    } else {
        println!(
            "{} Rendered {} templates, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
    }

    Ok(())
}

/// Path of a template relative to what was asked for; a single file is
/// relative to its own directory
fn relative_to<'p>(template: &'p Path, src: &Path) -> &'p Path {
    let base = if src.is_file() { src.parent() } else { Some(src) };
    base.and_then(|base| template.strip_prefix(base).ok())
        .unwrap_or(template)
}

fn render_file(
    template_path: &Path,
    args: &RenderArgs,
    config: &Config,
    options: &CompileOptions,
    cwd: &str,
) -> Result<String> {
    let source = fs::read_to_string(template_path)?;
    let data = load_data(template_path, args, config, cwd)?;

    let output = compile_str(&source, data.as_deref(), options)?;

    if args.stdout {
        println!("{}", output);
        return Ok("stdout".to_string());
    }

    let src_dir = match &args.path {
        Some(path) => PathBuf::from(cwd).join(path),
        None => config.get_src_dir(cwd),
    };
    let out_dir = match &args.out_dir {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config.get_out_dir(cwd),
    };
    let output_file = out_dir
        .join(relative_to(template_path, &src_dir))
        .with_extension("html");

    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, output)?;

    Ok(output_file.display().to_string())
}

/// Data from `--data`, else the template's file in the data directory,
/// else none
fn load_data(
    template_path: &Path,
    args: &RenderArgs,
    config: &Config,
    cwd: &str,
) -> Result<Option<String>> {
    if let Some(data) = &args.data {
        return Ok(Some(fs::read_to_string(PathBuf::from(cwd).join(data))?));
    }

    let candidate = config
        .get_data_dir(cwd)
        .zip(data_file_name(template_path))
        .map(|(dir, name)| dir.join(name));

    match candidate {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "using data file");
            Ok(Some(fs::read_to_string(path)?))
        }
        _ => Ok(None),
    }
}
