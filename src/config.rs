// src/config.rs
use crate::constants::{DEFAULT_PARAMS_CUTOFF, DEFAULT_SLOW_CALLBACK_MS};
use crate::error::DebugBarError;
use crate::formatting::TemplateSearchPath;
use crate::types::{RecipeName, ValidationError};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parsed and validated command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// JSON file describing the render context (params, session, cookies, exception, ...)
    pub context_file: String,

    /// Additional recipe to add after the defaults (repeatable)
    #[arg(short, long = "recipe")]
    pub recipes: Vec<String>,

    /// Start from an empty bar instead of the standard recipes
    #[arg(long, default_value_t = false)]
    pub no_defaults: bool,

    /// Directory searched for layout/callback_box templates before the built-in ones (repeatable)
    #[arg(short, long = "template-dir")]
    pub template_dirs: Vec<String>,

    /// Params longer than this many characters start collapsed
    #[arg(long, default_value_t = DEFAULT_PARAMS_CUTOFF)]
    pub cutoff: usize,

    /// HTML page to inject the bar into, just before </body>
    #[arg(long)]
    pub page: Option<String>,

    /// Output file for the rendered HTML (repeatable; prints to stdout when omitted)
    #[arg(short, long = "output-file")]
    pub output_files: Vec<String>,

    /// Also print the rendered HTML to stdout when writing files
    #[arg(long, default_value_t = false)]
    pub stdout: bool,

    /// Log callbacks slower than this many milliseconds
    #[arg(long, default_value_t = DEFAULT_SLOW_CALLBACK_MS)]
    pub slow_callback_ms: u64,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved render configuration, validated and ready to drive the pipeline.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub context_file: PathBuf,
    pub recipes: Vec<RecipeName>,
    pub use_defaults: bool,
    pub templates: TemplateSearchPath,
    pub params_cutoff: usize,
    pub page: Option<PathBuf>,
    pub output_files: Vec<PathBuf>,
    pub echo_stdout: bool,
    pub slow_callback: Duration,
    pub verbose: bool,
}

impl RenderConfig {
    /// Resolves a complete configuration from CLI input.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, DebugBarError> {
        let context_file = PathBuf::from(&cli.context_file);
        if !context_file.is_file() {
            return Err(ValidationError::InvalidFilePath {
                path: cli.context_file,
                reason: "context file does not exist".to_string(),
            }
            .into());
        }

        let recipes = cli
            .recipes
            .into_iter()
            .map(RecipeName::new)
            .collect::<Result<Vec<_>, _>>()?;

        // Later --template-dir flags are searched first.
        let mut templates = TemplateSearchPath::builtin();
        for dir in cli.template_dirs {
            let dir = PathBuf::from(dir);
            if !dir.is_dir() {
                return Err(ValidationError::InvalidFilePath {
                    path: dir.display().to_string(),
                    reason: "template directory does not exist".to_string(),
                }
                .into());
            }
            templates.prepend(dir);
        }

        Ok(RenderConfig {
            context_file,
            recipes,
            use_defaults: !cli.no_defaults,
            templates,
            params_cutoff: cli.cutoff,
            page: cli.page.map(PathBuf::from),
            output_files: cli.output_files.into_iter().map(PathBuf::from).collect(),
            echo_stdout: cli.stdout,
            slow_callback: Duration::from_millis(cli.slow_callback_ms),
            verbose: cli.verbose,
        })
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            context_file: PathBuf::from("context.json"),
            recipes: Vec::new(),
            use_defaults: true,
            templates: TemplateSearchPath::builtin(),
            params_cutoff: DEFAULT_PARAMS_CUTOFF,
            page: None,
            output_files: Vec::new(),
            echo_stdout: false,
            slow_callback: Duration::from_millis(DEFAULT_SLOW_CALLBACK_MS),
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::TemplateSource;

    fn context_file() -> String {
        let path = std::env::temp_dir().join(format!("debug_bar_config_{}.json", std::process::id()));
        std::fs::write(&path, "{}").unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_resolve_defaults() {
        let file = context_file();
        let cli = CommandLineInput::parse_from(["debug-bar", file.as_str()]);
        let config = RenderConfig::resolve(cli).unwrap();
        assert!(config.use_defaults);
        assert!(config.recipes.is_empty());
        assert_eq!(config.params_cutoff, 160);
        assert_eq!(config.templates, TemplateSearchPath::builtin());
        assert!(config.output_files.is_empty());
        assert!(!config.echo_stdout);
    }

    #[test]
    fn test_resolve_multiple_outputs() {
        let file = context_file();
        let cli = CommandLineInput::parse_from([
            "debug-bar", file.as_str(), "-o", "a.html", "--output-file", "b.html", "--stdout",
        ]);
        let config = RenderConfig::resolve(cli).unwrap();
        assert_eq!(config.output_files, vec![PathBuf::from("a.html"), PathBuf::from("b.html")]);
        assert!(config.echo_stdout);
    }

    #[test]
    fn test_resolve_recipes_and_flags() {
        let file = context_file();
        let cli = CommandLineInput::parse_from([
            "debug-bar", file.as_str(), "-r", "cookies", "--recipe", "host", "--no-defaults", "--cutoff", "12",
        ]);
        let config = RenderConfig::resolve(cli).unwrap();
        let names: Vec<&str> = config.recipes.iter().map(RecipeName::as_str).collect();
        assert_eq!(names, vec!["cookies", "host"]);
        assert!(!config.use_defaults);
        assert_eq!(config.params_cutoff, 12);
    }

    #[test]
    fn test_resolve_rejects_bad_recipe_name() {
        let file = context_file();
        let cli = CommandLineInput::parse_from(["debug-bar", file.as_str(), "-r", "not valid"]);
        assert!(matches!(
            RenderConfig::resolve(cli),
            Err(DebugBarError::Validation(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_missing_context() {
        let cli = CommandLineInput::parse_from(["debug-bar", "/definitely/not/here.json"]);
        assert!(RenderConfig::resolve(cli).is_err());
    }

    #[test]
    fn test_template_dirs_are_prepended() {
        let file = context_file();
        let dir = std::env::temp_dir();
        let dir_arg = dir.display().to_string();
        let cli = CommandLineInput::parse_from([
            "debug-bar",
            file.as_str(),
            "--template-dir",
            dir_arg.as_str(),
        ]);
        let config = RenderConfig::resolve(cli).unwrap();
        assert_eq!(config.templates.paths(), &[dir]);
        assert!(config
            .templates
            .read_template(&crate::types::TemplateName::new("callback_box").unwrap())
            .is_ok());
    }
}
