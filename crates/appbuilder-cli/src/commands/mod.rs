//! Command handlers. Each one turns parsed arguments into core calls and
//! prints the outcome; no scaffolding rules live here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use appbuilder_adapters::{
    JsonProjectRecordStore, LocalFilesystem, TemplateSource, TokenRenderer, XotParser,
    resolve_template_loader,
};
use appbuilder_core::application::ScaffoldService;

use crate::cli::TemplateArgs;
use crate::config::AppConfig;

pub mod add_service;
pub mod completions;
pub mod config;
pub mod ids;
pub mod init;
pub mod inject;
pub mod new;
pub mod templates;

/// Templates directory from the command line, falling back to config.
fn templates_dir(args: &TemplateArgs, config: &AppConfig) -> Option<PathBuf> {
    args.templates_dir
        .clone()
        .or_else(|| config.templates.dir.clone())
}

/// Wire the local adapters into a [`ScaffoldService`].
fn scaffold_service(templates_dir: Option<&Path>) -> (ScaffoldService, TemplateSource) {
    let (loader, source) = resolve_template_loader(templates_dir);
    debug!(templates = %source, "Building scaffold service");

    let filesystem = Arc::new(LocalFilesystem::new());
    let service = ScaffoldService::new(
        loader,
        Arc::new(TokenRenderer::new()),
        filesystem.clone(),
        Arc::new(XotParser::new()),
        Arc::new(JsonProjectRecordStore::new(filesystem)),
    );
    (service, source)
}
