//! `weave render` command implementation.

use std::fmt::Write;
use std::path::PathBuf;

use clap::Args;
use weave_config::Config;
use weave_hydrate::{
    LiveNode, LiveProps, Registry, deserialize, escape_html, kebab_case, render_to_string,
};
use weave_site::PagePayload;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Page payload produced by `weave build`.
    payload: PathBuf,

    /// Path to configuration file (default: auto-discover weave.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prepend the table of contents as a `<nav>` element.
    #[arg(long)]
    toc: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// Unknown components are reported as warnings and rendered as their
    /// children.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the payload cannot be read
    /// or decoded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let registry = component_registry(&config.components.names);

        let payload: PagePayload = serde_json::from_slice(&std::fs::read(&self.payload)?)?;
        let content = deserialize(&payload.content, &registry)?;
        for warning in &content.warnings {
            output.warning(&format!("Warning: {warning}"));
        }

        let mut html = String::new();
        if self.toc {
            let toc = deserialize(&payload.toc, &registry)?;
            html.push_str(&render_toc(&toc.node));
        }
        html.push_str(&render_to_string(&content.node));

        output.data(&html)?;
        Ok(())
    }
}

/// Registry wrapping each declared component in a classed `<div>`.
fn component_registry(names: &[String]) -> Registry {
    let mut registry = Registry::new();
    for name in names {
        let class = format!("component-{}", kebab_case(name));
        let data_name = escape_html(name);
        registry.register(name.clone(), move |_: &LiveProps, children: &str| {
            format!("<div class=\"{class}\" data-component=\"{data_name}\">{children}</div>")
        });
    }
    registry
}

/// Render a decoded toc (a list of `{url, depth, text}` maps).
fn render_toc(toc: &LiveNode) -> String {
    let LiveNode::List(entries) = toc else {
        return String::new();
    };
    if entries.is_empty() {
        return String::new();
    }
    let mut html = String::from("<nav class=\"toc\">");
    for entry in entries {
        let LiveNode::Map(entry) = entry else {
            continue;
        };
        let field = |name: &str| entry.get(name).and_then(LiveNode::as_str).unwrap_or_default();
        let depth = match entry.get("depth") {
            Some(LiveNode::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        let _ = write!(
            html,
            "<a href=\"{}\" data-depth=\"{}\">{}</a>",
            escape_html(field("url")),
            depth,
            escape_html(field("text"))
        );
    }
    html.push_str("</nav>");
    html
}
