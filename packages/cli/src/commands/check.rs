use super::find_templates;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use reformulator_evaluator::Template;
use reformulator_parser::{format_errors, validate_expression, ParseErrors};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Template file or directory to check (defaults to the config's srcDir)
    pub path: Option<String>,

    /// Also list templates without problems
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let input = match &args.path {
        Some(path) => PathBuf::from(cwd).join(path),
        None => Config::load(cwd)?.get_src_dir(cwd),
    };

    if !input.exists() {
        return Err(anyhow::anyhow!("Input path does not exist: {}", input.display()));
    }

    println!("🔍 {} Reformulator check", "Starting".green().bold());
    println!("   Input: {}", input.display());
    println!();

    let templates = find_templates(&input)?;
    let mut total_errors = 0;

    for template in &templates {
        let errors = check_file(template)?;
        if errors.is_empty() {
            if args.verbose {
                println!("{} {}", "✓".green(), template.display());
            }
            continue;
        }

        println!("{} {}", "✗".red(), template.display());
        for error in &errors {
            eprintln!("{}", error);
        }
        total_errors += errors.len();
    }

    println!();
    println!(
        "✨ {} Check complete!",
        if total_errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    println!("   Templates checked: {}", templates.len());

    if total_errors > 0 {
        println!("   {} {}", "Errors:".red(), total_errors);
        std::process::exit(1);
    }

    println!("   {} No issues found!", "✓".green());
    Ok(())
}

/// Rendered diagnostics for one template file, one per failing expression
pub fn check_file(path: &Path) -> Result<Vec<String>> {
    let source = fs::read_to_string(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let template = match Template::from_json(&source) {
        Ok(template) => template,
        Err(err) => return Ok(vec![format!("{}: {}", file_name, err)]),
    };

    let diagnostics = template
        .expressions()
        .into_iter()
        .enumerate()
        .filter_map(|(index, expression)| {
            let error = validate_expression(expression).err()?;
            let label = format!("{}#{}", file_name, index);
            Some(format_errors(expression, &label, &ParseErrors::from(error)))
        })
        .collect();

    Ok(diagnostics)
}
