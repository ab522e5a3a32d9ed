//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;
use siteship_common::{DeployResult, DomainResult, ProjectAnalysis};

use crate::domain::{AppName, DeployConfig};
use crate::output::OutputContext;

/// Renders results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("siteship {version}");
    }

    /// Render a project analysis with its recommendation.
    pub fn render_analysis(&self, name: &AppName, analysis: &ProjectAnalysis) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.header(&format!("Project Analysis: {name}"));
        println!();
        self.ctx.kv("Type:", analysis.project_type.as_str());
        self.ctx.kv("Recommended strategy:", analysis.strategy.as_str());
        self.ctx.kv(
            "Files:",
            &format!("{} ({}KB)", analysis.total_files, analysis.total_size_kb),
        );
        if let Some(port) = analysis.port {
            self.ctx.kv("Detected port:", &port.to_string());
        }
        if let Some(cmd) = &analysis.start_command {
            self.ctx.kv("Start command:", cmd);
        }

        if analysis.build_required {
            println!();
            self.ctx.warn(&format!(
                "BUILD REQUIRED: {}",
                analysis.build_hint.as_deref().unwrap_or_default()
            ));
        }

        if !analysis.files.is_empty() {
            println!();
            self.ctx.kv("Key files:", &analysis.files.join(", "));
        }

        if !analysis.warnings.is_empty() {
            println!();
            self.ctx.header("Warnings:");
            for w in &analysis.warnings {
                self.ctx.warn(w);
            }
        }

        println!();
        println!("  {}", analysis.summary);
    }

    /// Render the plan shown before asking for confirmation.
    pub fn render_plan(&self, config: &DeployConfig) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header("Deployment plan:");
        self.ctx.kv("Name:", config.name.as_str());
        self.ctx.kv("Host:", config.host.as_str());
        self.ctx.kv("Strategy:", config.strategy.as_str());
        self.ctx.kv("Domain mode:", config.domain_mode.as_str());
        if let Some(domain) = &config.domain {
            self.ctx.kv("Domain:", domain);
        }
        if let Some(port) = config.port {
            self.ctx.kv("Port:", &port.to_string());
        }
        if !config.env_vars.is_empty() {
            let keys: Vec<&str> = config.env_vars.keys().map(String::as_str).collect();
            self.ctx.kv("Env vars:", &keys.join(", "));
        }
        println!();
    }

    /// Render the deployment log followed by the outcome.
    pub fn render_deploy(&self, result: &DeployResult) {
        if !self.ctx.quiet {
            println!();
            for line in &result.lines {
                println!("  {line}");
            }
            println!();
        }
        if result.ok {
            match &result.url {
                Some(url) => self.ctx.success(&format!(
                    "Live at {}",
                    url.style(self.ctx.styles.url)
                )),
                None => self.ctx.success("Deployment finished."),
            }
        } else {
            self.ctx
                .error(&format!("Error: {}", result.error.as_deref().unwrap_or("unknown")));
        }
    }

    /// Render a standalone domain binding outcome.
    pub fn render_domain(&self, result: &DomainResult) {
        if result.ok() {
            match result.url() {
                Some(url) => self.ctx.success(&format!(
                    "Domain configured: {}",
                    url.style(self.ctx.styles.url)
                )),
                None => self.ctx.info("No public domain requested."),
            }
        } else {
            self.ctx
                .error(&format!("Domain setup failed: {}", result.error().unwrap_or("unknown")));
        }
    }
}
