use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

const EXAMPLE_TEMPLATE: &str = r#"[
  "<!doctype [] html: true>",
  "<html [] lang: 'en'>", [
    "<body>", [
      "<h1 [title]>",
      "<ul>", [
        "<li [links]>", [
          "<a [url & text] href: url>"
        ]
      ],
      "<button [\"Details: \" + (open & \"hide\" | \"show\")] onclick: open>",
      "<p [open & description]>"
    ]
  ]
]
"#;

const EXAMPLE_DATA: &str = r#"{
  "title": "Reformulator",
  "description": "Templates are data, data is JSON.",
  "links": [
    { "url": "/docs", "text": "Documentation" },
    { "url": "/examples", "text": "Examples" }
  ]
}
"#;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Source directory
    #[arg(short, long, default_value = "src")]
    pub src_dir: String,

    /// Data directory
    #[arg(short, long, default_value = "data")]
    pub data_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Reformulator project...".bright_blue().bold()
    );

    for dir in [&args.src_dir, &args.data_dir] {
        let path = PathBuf::from(cwd).join(dir);
        if !path.exists() {
            fs::create_dir_all(&path)?;
            println!("  {} Created {}/", "✓".green(), dir);
        }
    }

    let example_file = PathBuf::from(cwd).join(&args.src_dir).join("index.json");
    if !example_file.exists() {
        fs::write(&example_file, EXAMPLE_TEMPLATE)?;
        println!("  {} Created {}/index.json", "✓".green(), args.src_dir);
    }

    let data_file = PathBuf::from(cwd).join(&args.data_dir).join("index.data.json");
    if !data_file.exists() {
        fs::write(&data_file, EXAMPLE_DATA)?;
        println!("  {} Created {}/index.data.json", "✓".green(), args.data_dir);
    }

    let config = Config {
        src_dir: args.src_dir.clone(),
        data_dir: Some(args.data_dir.clone()),
        ..Config::default()
    };

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/index.json", args.src_dir);
    println!("  2. Run: reformulator render");
    println!("  3. Check output in {}/", config.out_dir);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reformulator_compiler_html::compile_str;
    use tempfile::TempDir;

    fn args(force: bool) -> InitArgs {
        InitArgs {
            src_dir: "src".to_string(),
            data_dir: "data".to_string(),
            force,
        }
    }

    #[test]
    fn test_init_writes_project() {
        let temp_dir = TempDir::new().unwrap();
        let cwd = temp_dir.path().display().to_string();

        init(args(false), &cwd).unwrap();

        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.data_dir, Some("data".to_string()));
        assert!(temp_dir.path().join("src/index.json").exists());
        assert!(temp_dir.path().join("data/index.data.json").exists());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let temp_dir = TempDir::new().unwrap();
        let cwd = temp_dir.path().display().to_string();
        let config_path = temp_dir.path().join(DEFAULT_CONFIG_NAME);
        fs::write(&config_path, r#"{ "srcDir": "pages" }"#).unwrap();

        init(args(false), &cwd).unwrap();
        assert_eq!(Config::load(&cwd).unwrap().src_dir, "pages");

        init(args(true), &cwd).unwrap();
        assert_eq!(Config::load(&cwd).unwrap().src_dir, "src");
    }

    #[test]
    fn test_example_template_renders() {
        let html = compile_str(EXAMPLE_TEMPLATE, Some(EXAMPLE_DATA), &Config::default().compile_options())
            .unwrap();
        assert!(html.starts_with("<!doctype html><html lang=\"en\"><body><h1>Reformulator</h1>"));
        assert!(html.contains(r#"<li><a href="/docs">Documentation</a></li>"#));
        assert!(html.contains("<button>Details: show</button>"));
        assert!(!html.contains("Templates are data"));
        assert!(html.ends_with("true);</script>"));
    }
}
