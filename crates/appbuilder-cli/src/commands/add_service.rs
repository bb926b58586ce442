//! `appbuilder add-service`: add a service module to an application.

use serde::Serialize;
use tracing::instrument;

use appbuilder_core::{
    application::ServiceReport,
    domain::{MergeMode, ServiceParams},
    error::AppBuilderError,
};

use super::{scaffold_service, templates_dir};
use crate::{cli::AddServiceArgs, config::AppConfig, error::CliResult, output::OutputManager};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceSummary<'a> {
    artifact_id: &'a str,
    state_model_id: u16,
    message_model_id: u16,
    files_written: usize,
    fragments_injected: usize,
    duplicate_fragments: usize,
    pom_updated: bool,
}

impl<'a> From<&'a ServiceReport> for ServiceSummary<'a> {
    fn from(report: &'a ServiceReport) -> Self {
        Self {
            artifact_id: &report.artifact_id,
            state_model_id: report.state_model_id,
            message_model_id: report.message_model_id,
            files_written: report.files_written,
            fragments_injected: report.config.injected(),
            duplicate_fragments: report.config.duplicates(),
            pom_updated: report.pom_updated,
        }
    }
}

#[instrument(skip_all, fields(service = %args.name, app = %args.app.display()))]
pub fn execute(args: AddServiceArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service_params = ServiceParams::new(
        args.name.trim(),
        args.kind.into(),
        args.ha.map(Into::into),
        args.clustered,
        args.partitions,
    )
    .map_err(AppBuilderError::from)?;

    let mode = if args.always_append {
        MergeMode::AlwaysAppend
    } else {
        MergeMode::Deduplicate
    };
    let (service, _) = scaffold_service(templates_dir(&args.templates, &config).as_deref());
    let service = service.with_merge_mode(mode);

    output.header(&format!(
        "Adding {} service '{}'...",
        service_params.service_type(),
        service_params.service_name()
    ))?;

    let report = service.add_service(&args.app, &service_params)?;

    if output.is_json() {
        output.json(&ServiceSummary::from(&report))?;
        return Ok(());
    }

    output.success(&format!("Service module '{}' created", report.artifact_id))?;
    output.print(&format!(
        "  Factory ids:    state={}, messages={}",
        report.state_model_id, report.message_model_id
    ))?;
    output.print(&format!("  Files written:  {}", report.files_written))?;
    output.print(&format!(
        "  Configuration:  {} injected, {} already present",
        report.config.injected(),
        report.config.duplicates()
    ))?;
    if report.pom_updated {
        output.print("  Parent POM:     module registered")?;
    } else {
        output.warning("Module was already listed in the parent POM")?;
    }

    Ok(())
}
