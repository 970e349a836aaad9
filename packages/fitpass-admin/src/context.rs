//! Application context with shared state and output helpers

use anyhow::Result;
use colored::Colorize;
use table_store::RestStore;

use crate::config::Config;

const RULE_WIDTH: usize = 60;

/// Context passed to every admin task
pub struct AppContext<S> {
    pub config: Config,
    pub store: S,
}

impl AppContext<RestStore> {
    /// Load configuration from the environment and open the REST store.
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;
        let store = config.connect()?;
        Ok(Self { config, store })
    }
}

impl<S> AppContext<S> {
    pub fn new(config: Config, store: S) -> Self {
        Self { config, store }
    }

    pub fn print_banner(&self, title: &str) {
        println!("{}", title.bright_cyan().bold());
        println!("{}", rule('='));
    }

    pub fn print_header(&self, msg: &str) {
        println!();
        println!("{}", msg.bold());
        println!("{}", rule('='));
    }

    pub fn print_subheader(&self, msg: &str) {
        println!("{}", msg.bold());
        println!("{}", "-".repeat(40));
    }

    pub fn print_step(&self, msg: &str) {
        println!("{}", msg.bright_blue());
    }

    pub fn print_success(&self, msg: &str) {
        println!("{} {}", "✓".bright_green(), msg);
    }

    pub fn print_warning(&self, msg: &str) {
        println!("{} {}", "⚠".yellow(), msg.yellow());
    }

    pub fn print_error(&self, msg: &str) {
        println!("{} {}", "✗".bright_red(), msg.red());
    }

    pub fn print_info(&self, msg: &str) {
        println!("{}", msg.cyan());
    }

    pub fn print_detail(&self, msg: &str) {
        println!("   {}", msg.dimmed());
    }

    pub fn print_footer(&self, msg: &str) {
        println!();
        println!("{}", rule('='));
        println!("{}", msg.bright_green().bold());
    }

    /// Numbered follow-up list.
    pub fn print_next_steps(&self, steps: &[String]) {
        println!();
        println!("{}", "Next steps:".bold());
        for (i, step) in steps.iter().enumerate() {
            println!("{}. {}", i + 1, step);
        }
    }
}

fn rule(c: char) -> String {
    c.to_string().repeat(RULE_WIDTH)
}
