//! `appbuilder templates`: list what the active template source provides,
//! or export the built-in templates for customisation.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use appbuilder_adapters::{
    EmbeddedTemplateLoader, LocalFilesystem, TEMPLATES_DIR_ENV, resolve_template_loader,
};
use appbuilder_core::{
    application::{Filesystem, TemplateLoader},
    domain::{BuildTool, ServiceHaModel, ServiceParams, ServiceType},
};

use super::templates_dir;
use crate::{
    cli::{TemplateArgs, TemplatesCommands},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct TemplateStatus {
    path: String,
    entries: Option<usize>,
}

pub fn execute(cmd: TemplatesCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        TemplatesCommands::List(args) => list(&args, &config, &output),
        TemplatesCommands::Export { dir, force } => {
            let written = export_to(&dir, force)?;
            output.success(&format!(
                "Exported {written} template entries to {}",
                dir.display()
            ))?;
            output.info(&format!(
                "Use them with --templates-dir {} or ${TEMPLATES_DIR_ENV}",
                dir.display()
            ))?;
            Ok(())
        }
    }
}

fn list(args: &TemplateArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let (loader, source) = resolve_template_loader(templates_dir(args, config).as_deref());

    let statuses: Vec<TemplateStatus> = BuildTool::ALL
        .iter()
        .flat_map(|tool| template_paths(*tool))
        .map(|path| {
            let entries = loader.load(&path).ok().map(|tree| tree.len());
            TemplateStatus { path, entries }
        })
        .collect();

    if output.is_json() {
        output.json(&statuses)?;
        return Ok(());
    }

    output.header(&format!("Templates ({source})"))?;
    for status in &statuses {
        match status.entries {
            Some(n) => output.print(&format!("  \u{2713} {:<36} {n} entries", status.path))?,
            None => output.print(&format!("  \u{2717} {:<36} missing", status.path))?,
        }
    }
    Ok(())
}

/// Every template path the scaffolder can ask for with `build_tool`.
fn template_paths(build_tool: BuildTool) -> Vec<String> {
    let mut paths = vec![format!("{build_tool}/app")];

    for service_type in ServiceType::ALL {
        let ha_models: Vec<Option<ServiceHaModel>> = if service_type.is_clusterable() {
            ServiceHaModel::ALL.iter().copied().map(Some).collect()
        } else {
            vec![None]
        };

        for ha in ha_models {
            let Ok(params) = ServiceParams::new(service_type.as_str(), *service_type, ha, false, 1)
            else {
                continue;
            };
            paths.push(params.template_path(build_tool));
            paths.push(params.config_template_path(build_tool));
        }
    }
    paths
}

/// Write the built-in table under `dir`. Returns the number of entries.
#[instrument(fields(dir = %dir.display()))]
fn export_to(dir: &Path, force: bool) -> CliResult<usize> {
    if !force && has_entries(dir)? {
        return Err(CliError::DirectoryNotEmpty {
            path: dir.to_path_buf(),
        });
    }

    let filesystem = LocalFilesystem::new();
    let entries = EmbeddedTemplateLoader::new().entries();

    for entry in entries {
        let target = dir.join(entry.path);
        match entry.content {
            Some(content) => {
                if let Some(parent) = target.parent() {
                    filesystem.create_dir_all(parent)?;
                }
                filesystem.write_file(&target, content)?;
            }
            None => filesystem.create_dir_all(&target)?,
        }
    }

    debug!(entries = entries.len(), "Templates exported");
    Ok(entries.len())
}

fn has_entries(dir: &Path) -> CliResult<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    let mut listing =
        std::fs::read_dir(dir).with_cli_context(|| format!("Cannot read '{}'", dir.display()))?;
    Ok(listing.next().is_some())
}
