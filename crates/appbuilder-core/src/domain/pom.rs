//! Registering a new service module in the parent `pom.xml`.
//!
//! This is a line edit, not an XML merge: the parent POM is hand-maintained
//! and must keep its formatting and comments.

use super::DomainError;

const MODULE_INDENT: &str = "        ";

fn module_line(artifact_id: &str) -> String {
    format!("<module>{artifact_id}</module>")
}

/// Insert `<module>{service}</module>` right before the `<module>{system}</module>` line.
///
/// Returns `Ok(None)` when the service module is already listed, the edited
/// text otherwise. Line endings of the input are kept.
pub fn insert_module(
    pom: &str,
    service_artifact_id: &str,
    system_artifact_id: &str,
) -> Result<Option<String>, DomainError> {
    let service_line = module_line(service_artifact_id);
    let system_line = module_line(system_artifact_id);

    if pom.lines().any(|line| line.trim() == service_line) {
        return Ok(None);
    }

    let newline = if pom.contains("\r\n") { "\r\n" } else { "\n" };

    let mut out = String::with_capacity(pom.len() + service_line.len() + 16);
    let mut inserted = false;
    for line in pom.split_inclusive('\n') {
        if !inserted && line.trim() == system_line {
            out.push_str(MODULE_INDENT);
            out.push_str(&service_line);
            out.push_str(newline);
            inserted = true;
        }
        out.push_str(line);
    }

    if inserted {
        Ok(Some(out))
    } else {
        Err(DomainError::PomAnchorNotFound {
            module: system_artifact_id.to_string(),
        })
    }
}
