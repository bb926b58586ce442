//! `appbuilder ids`: report factory ids not used by any model document.

use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use appbuilder_adapters::{LocalFilesystem, XotParser};
use appbuilder_core::application::FactoryIdAllocator;

use crate::{cli::IdsArgs, error::CliResult, output::OutputManager};

#[derive(Debug, Serialize)]
struct IdsReport<'a> {
    ids: &'a [u16],
}

#[instrument(skip_all, fields(path = %args.path.display(), count = args.count))]
pub fn execute(args: IdsArgs, output: OutputManager) -> CliResult<()> {
    let allocator =
        FactoryIdAllocator::new(Arc::new(LocalFilesystem::new()), Arc::new(XotParser::new()));

    let ids = if args.application {
        allocator.allocate_for_application(&args.path, args.count)?
    } else {
        allocator.allocate(&args.path, args.count)?
    };

    if output.is_json() {
        output.json(&IdsReport { ids: &ids })?;
        return Ok(());
    }

    let line = ids
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    output.data(&line)?;
    Ok(())
}
