//! `appbuilder inject`: merge a directory of configuration fragments into
//! one configuration document.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{instrument, warn};

use appbuilder_adapters::{DirectoryTemplateLoader, LocalFilesystem, XotParser};
use appbuilder_core::{
    application::{ConfigInjector, Filesystem, TemplateLoader},
    domain::{MergeMode, MergeReport, TemplateTree, TokenMap},
};

use crate::{
    cli::InjectArgs,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct InjectSummary {
    injected: usize,
    duplicates: usize,
    outcomes: Vec<String>,
}

impl From<&MergeReport> for InjectSummary {
    fn from(report: &MergeReport) -> Self {
        Self {
            injected: report.injected(),
            duplicates: report.duplicates(),
            outcomes: report.outcomes().iter().map(ToString::to_string).collect(),
        }
    }
}

#[instrument(skip_all, fields(config = %args.config.display(), fragments = %args.fragments.display()))]
pub fn execute(args: InjectArgs, output: OutputManager) -> CliResult<()> {
    let filesystem = Arc::new(LocalFilesystem::new());
    let mode = if args.always_append {
        MergeMode::AlwaysAppend
    } else {
        MergeMode::Deduplicate
    };
    let injector =
        ConfigInjector::new(filesystem.clone(), Arc::new(XotParser::new())).with_mode(mode);

    let tree = load_fragment_tree(&args.fragments)?;
    let tokens: TokenMap = args.tokens.into_iter().collect();
    let fragments = injector.collect_fragments(&tree, &tokens)?;
    if fragments.is_empty() {
        warn!(dir = %args.fragments.display(), "No config.xml fragments found");
    }

    if args.dry_run {
        let document = filesystem.read_to_string(&args.config)?;
        let source = args.config.display().to_string();
        let (merged, _) = injector.merge_text(&document, &source, fragments)?;
        output.data(merged.trim_end_matches('\n'))?;
        return Ok(());
    }

    let report = injector.inject_file(&args.config, fragments)?;

    if output.is_json() {
        output.json(&InjectSummary::from(&report))?;
        return Ok(());
    }

    for outcome in report.outcomes() {
        output.print(&format!("  {outcome}"))?;
    }
    output.success(&format!(
        "{} fragment(s) injected, {} already present",
        report.injected(),
        report.duplicates()
    ))?;
    Ok(())
}

/// Load `dir` as a template tree rooted at `dir` itself.
fn load_fragment_tree(dir: &Path) -> CliResult<TemplateTree> {
    let dir = dir
        .canonicalize()
        .with_cli_context(|| format!("Fragment directory '{}' is not accessible", dir.display()))?;

    let (Some(parent), Some(name)) = (dir.parent(), dir.file_name().and_then(|n| n.to_str()))
    else {
        return Err(CliError::InvalidInput {
            message: format!("'{}' cannot be used as a fragment directory", dir.display()),
            source: None,
        });
    };

    Ok(DirectoryTemplateLoader::new(parent).load(name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn fragment_tree_is_relative_to_the_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("fragments/profiles/dev/apps");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.xml"), "<app name=\"a\"/>").unwrap();

        let tree = load_fragment_tree(&temp.path().join("fragments")).unwrap();
        let paths: Vec<&str> = tree.files().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, ["profiles/dev/apps/config.xml"]);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let temp = TempDir::new().unwrap();
        let err = load_fragment_tree(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, CliError::IoError { .. }));
    }
}
