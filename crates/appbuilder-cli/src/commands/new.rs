//! Implementation of the `appbuilder new` command.
//!
//! Responsibility: turn CLI arguments and config defaults into
//! [`AppParams`], call the core scaffold service, and display results.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument};

use appbuilder_core::{domain::AppParams, error::AppBuilderError};

use super::{scaffold_service, templates_dir};
use crate::{
    cli::NewArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppSummary<'a> {
    app_root: &'a Path,
    parent_artifact_id: String,
    system_artifact_id: String,
    templates: String,
}

/// Execute the `appbuilder new` command.
#[instrument(skip_all, fields(app = %args.name))]
pub fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let mut params = build_params(&args, &config);
    if args.interactive {
        prompt_missing(&mut params, args.messaging.is_none())?;
    }
    params.validate().map_err(AppBuilderError::from)?;

    debug!(
        root = %params.app_root().display(),
        package = %params.package_name,
        messaging = %params.messaging_provider,
        "Parameters resolved"
    );

    if args.dry_run {
        return show_dry_run(&params, &output);
    }

    let (service, source) = scaffold_service(templates_dir(&args.templates, &config).as_deref());

    output.header(&format!("Creating '{}'...", params.app_name))?;
    output.info(&format!("Templates: {source}"))?;

    let app_root = service.create_application(&params)?;
    info!(root = %app_root.display(), "Application created");

    if output.is_json() {
        output.json(&AppSummary {
            app_root: &app_root,
            parent_artifact_id: params.parent_artifact_id(),
            system_artifact_id: params.system_artifact_id(),
            templates: source.to_string(),
        })?;
        return Ok(());
    }

    output.success(&format!(
        "Application '{}' created at {}",
        params.app_name,
        app_root.display()
    ))?;
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", app_root.display()))?;
    output.print("  appbuilder add-service \"Order Processor\" --type processor --ha sr")?;

    Ok(())
}

// ── Parameter resolution ──────────────────────────────────────────────────────

/// Flags first, then config defaults. Missing required values stay empty
/// and are caught by validation.
fn build_params(args: &NewArgs, config: &AppConfig) -> AppParams {
    let d = &config.defaults;
    let pick = |flag: &Option<String>, default: &Option<String>| {
        flag.as_ref()
            .or(default.as_ref())
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let mut params = AppParams {
        app_name: args.name.trim().to_string(),
        app_dir: args.dir.clone(),
        package_name: pick(&args.package, &None),
        group_id: pick(&args.group_id, &d.group_id),
        artifact_prefix: pick(&args.artifact_prefix, &d.artifact_prefix),
        rumi_version: pick(&args.rumi_version, &d.rumi_version),
        rumi_bindings_version: pick(&args.bindings_version, &d.rumi_bindings_version),
        rumi_mgmt_version: pick(&args.mgmt_version, &d.rumi_mgmt_version),
        encoding_type: args.encoding.map(Into::into).unwrap_or(d.encoding_type),
        messaging_provider: args.messaging.map(Into::into).unwrap_or(d.messaging_provider),
        build_tool: args.build_tool.map(Into::into).unwrap_or(d.build_tool),
    };

    if params.package_name.is_empty() {
        params.package_name = default_package(&params);
    }
    params
}

/// `<group id>.<app token name>`, or empty without a group id.
fn default_package(params: &AppParams) -> String {
    if params.group_id.is_empty() {
        return String::new();
    }
    format!("{}.{}", params.group_id, params.app_token_name())
}

// ── Prompts ───────────────────────────────────────────────────────────────────

#[cfg(feature = "interactive")]
fn prompt_missing(params: &mut AppParams, ask_messaging: bool) -> CliResult<()> {
    use appbuilder_core::domain::MessagingProvider;
    use dialoguer::{Confirm, FuzzySelect, Input, theme::ColorfulTheme};

    let theme = ColorfulTheme::default();
    let ask = |prompt: &str, value: &mut String| -> CliResult<()> {
        if value.is_empty() {
            *value = Input::<String>::with_theme(&theme)
                .with_prompt(prompt)
                .interact_text()
                .map_err(prompt_error)?
                .trim()
                .to_string();
        }
        Ok(())
    };

    ask("Group id", &mut params.group_id)?;
    if params.package_name.is_empty() {
        let suggested = default_package(params);
        params.package_name = Input::<String>::with_theme(&theme)
            .with_prompt("Package name")
            .default(suggested)
            .interact_text()
            .map_err(prompt_error)?;
    }
    ask("Artifact prefix", &mut params.artifact_prefix)?;
    ask("Runtime version", &mut params.rumi_version)?;
    ask("Bindings version", &mut params.rumi_bindings_version)?;
    ask("Management version", &mut params.rumi_mgmt_version)?;

    if ask_messaging {
        let providers = MessagingProvider::ALL;
        let current = providers
            .iter()
            .position(|p| *p == params.messaging_provider)
            .unwrap_or(0);
        let choice = FuzzySelect::with_theme(&theme)
            .with_prompt("Messaging provider")
            .items(providers)
            .default(current)
            .interact()
            .map_err(prompt_error)?;
        if let Some(provider) = providers.get(choice) {
            params.messaging_provider = *provider;
        }
    }

    let confirmed = Confirm::with_theme(&theme)
        .with_prompt(format!(
            "Create {} in {}?",
            params.parent_artifact_id(),
            params.app_dir.display()
        ))
        .default(true)
        .interact()
        .map_err(prompt_error)?;

    if confirmed {
        Ok(())
    } else {
        Err(CliError::Cancelled)
    }
}

#[cfg(feature = "interactive")]
fn prompt_error(err: dialoguer::Error) -> CliError {
    CliError::Prompt {
        source: Box::new(err),
    }
}

#[cfg(not(feature = "interactive"))]
fn prompt_missing(_params: &mut AppParams, _ask_messaging: bool) -> CliResult<()> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

// ── Dry run ───────────────────────────────────────────────────────────────────

fn show_dry_run(params: &AppParams, out: &OutputManager) -> CliResult<()> {
    if out.is_json() {
        out.json(params)?;
        return Ok(());
    }

    out.info(&format!(
        "Dry run: would create '{}' at {}",
        params.app_name,
        params.app_root().display()
    ))?;
    out.print(&format!("  Package:     {}", params.package_name))?;
    out.print(&format!("  Group id:    {}", params.group_id))?;
    out.print(&format!(
        "  Modules:     {}, {}",
        params.roe_artifact_id(),
        params.system_artifact_id()
    ))?;
    out.print(&format!("  Messaging:   {}", params.messaging_provider))?;
    out.print(&format!("  Encoding:    {}", params.encoding_type))?;
    out.print(&format!("  Build tool:  {}", params.build_tool))?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands, Messaging};
    use appbuilder_core::domain::{BuildTool, DomainError, MessagingProvider};
    use clap::Parser;
    use std::path::PathBuf;

    fn new_args(extra: &[&str]) -> NewArgs {
        let mut argv = vec!["appbuilder", "new", "Order Book"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::New(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    fn config_with_group(group: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.defaults.group_id = Some(group.into());
        config.defaults.artifact_prefix = Some("cfg".into());
        config.defaults.messaging_provider = MessagingProvider::Solace;
        config
    }

    #[test]
    fn flags_override_config_defaults() {
        let args = new_args(&["-g", "com.flag", "--messaging", "kafka", "-d", "/work"]);
        let params = build_params(&args, &config_with_group("com.cfg"));

        assert_eq!(params.group_id, "com.flag");
        assert_eq!(params.artifact_prefix, "cfg");
        assert_eq!(params.messaging_provider, MessagingProvider::from(Messaging::Kafka));
        assert_eq!(params.build_tool, BuildTool::Maven);
        assert_eq!(params.app_dir, PathBuf::from("/work"));
    }

    #[test]
    fn package_defaults_to_group_and_app_token() {
        let params = build_params(&new_args(&[]), &config_with_group("com.acme"));
        assert_eq!(params.package_name, "com.acme.orderbook");
        assert_eq!(params.messaging_provider, MessagingProvider::Solace);
    }

    #[test]
    fn explicit_package_is_kept() {
        let params = build_params(&new_args(&["-p", "org.books"]), &config_with_group("com.acme"));
        assert_eq!(params.package_name, "org.books");
    }

    #[test]
    fn missing_versions_fail_validation() {
        let params = build_params(&new_args(&[]), &config_with_group("com.acme"));
        assert!(matches!(
            params.validate(),
            Err(DomainError::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn no_group_means_no_package() {
        let params = build_params(&new_args(&[]), &AppConfig::default());
        assert_eq!(params.package_name, "");
    }
}
