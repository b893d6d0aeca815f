// src/main.rs

use anyhow::Context;
use clap::Parser;
use debug_bar::{
    deliver, inject_into_page, BarComposer, BarDelivery, BarProfile, BookSource, CommandLineInput,
    ContextSource, DebugBar, DebugBarError, DeliveryTarget, OutputPlan, OutputReport,
    RecipeOptions, RenderConfig, RenderContext, RenderedBar, RequestContext, StandardProfile,
    TemplateSource,
};
use indexmap::IndexSet;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use serde_json::json;
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
///
/// Console output goes to stderr so a bar printed to stdout stays clean.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("debug_bar.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Executes the three-stage pipeline: load context → render → deliver.
fn execute_pipeline(config: &RenderConfig) -> anyhow::Result<()> {
    let pipeline = DebugBarCli::new(config)?;

    let ctx = pipeline.load()?;
    let bar = pipeline.compose(&ctx)?;
    let box_count = bar.box_count();
    let report = BarDelivery::deliver(&pipeline, bar)?;
    report_completion(&report, box_count);

    Ok(())
}

/// The standard books with templates from the configured search path.
///
/// Carries no default recipes: `build_bar` adds them itself so `params`
/// gets its cutoff option.
struct CliProfile<'a> {
    config: &'a RenderConfig,
}

impl BarProfile for CliProfile<'_> {
    fn default_recipe_books(&self) -> Vec<BookSource> {
        StandardProfile.default_recipe_books()
    }

    fn template_source(&self) -> Arc<dyn TemplateSource> {
        Arc::new(self.config.templates.clone())
    }
}

/// Builds the bar from the CLI configuration and drives it through the pipeline.
struct DebugBarCli<'a> {
    config: &'a RenderConfig,
    bar: DebugBar,
}

impl<'a> DebugBarCli<'a> {
    fn new(config: &'a RenderConfig) -> Result<Self, DebugBarError> {
        let bar = Self::build_bar(config)?;
        log::info!("Configured {:?}", bar);
        Ok(Self { config, bar })
    }

    fn build_bar(config: &RenderConfig) -> Result<DebugBar, DebugBarError> {
        let defaults = if config.use_defaults {
            StandardProfile.default_recipes()
        } else {
            Vec::new()
        };
        let names: IndexSet<&str> = defaults
            .iter()
            .map(String::as_str)
            .chain(config.recipes.iter().map(|name| name.as_str()))
            .collect();

        let mut bar = DebugBar::from_profile(&CliProfile { config }, std::iter::empty::<&str>())?;
        for name in names {
            let mut options = RecipeOptions::new();
            if name == "params" {
                options.insert("cutoff".to_string(), json!(config.params_cutoff));
            }
            bar.add_recipe_with(name, options)?;
        }
        bar.set_slow_callback_threshold(config.slow_callback);
        Ok(bar)
    }

    /// Delivers the bar (or the page it was injected into) to every configured destination.
    fn deliver_bar(&self, bar: RenderedBar) -> Result<OutputReport, DebugBarError> {
        let content = match &self.config.page {
            Some(page_path) => {
                let page = fs::read_to_string(page_path)?;
                log::info!("Injecting bar into {}", page_path.display());
                inject_into_page(&page, bar.as_str())
            }
            None => bar.into_string(),
        };

        let plan =
            OutputPlan::for_destinations(content, &self.config.output_files, self.config.echo_stdout);
        deliver(&plan).into_result()
    }
}

/// Reports completion to the user with delivery confirmations.
fn report_completion(report: &OutputReport, box_count: usize) {
    for delivered in report.delivered() {
        if let DeliveryTarget::File(path) = &delivered.target {
            eprintln!(
                "✓ Debug bar with {} boxes saved to {} ({} bytes)",
                box_count,
                path.display(),
                delivered.bytes_written
            );
        }
    }
}

impl ContextSource for DebugBarCli<'_> {
    fn load(&self) -> Result<RequestContext, DebugBarError> {
        log::info!("Loading context from {}", self.config.context_file.display());
        let ctx = RequestContext::from_file(&self.config.context_file)?;
        log::debug!(
            "Context defines {} variables, preference list {:?}",
            ctx.variables().len(),
            ctx.preference_list()
        );
        Ok(ctx)
    }
}

impl BarComposer for DebugBarCli<'_> {
    fn compose(&self, ctx: &dyn RenderContext) -> Result<RenderedBar, DebugBarError> {
        self.bar.render(ctx)
    }
}

impl BarDelivery for DebugBarCli<'_> {
    fn deliver(&self, bar: RenderedBar) -> Result<OutputReport, DebugBarError> {
        self.deliver_bar(bar)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).map_err(|e| anyhow::anyhow!("failed to set up logging: {e}"))?;

    let context_file = cli.context_file.clone();
    let config = RenderConfig::resolve(cli)
        .with_context(|| format!("invalid configuration for {context_file}"))?;

    execute_pipeline(&config)?;

    Ok(())
}
