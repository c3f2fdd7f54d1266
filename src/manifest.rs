use serde_json::{ser::PrettyFormatter, Serializer, Value};
use std::path::Path;

use crate::error::CreateError;

/// Rewrites `name` and `version` of the manifest in `dir`, keeping every
/// other field and the original key order. Output is tab indented with a
/// trailing newline.
///
/// # Errors
///
/// [`CreateError::Manifest`] if the file is missing, unreadable, not a JSON
/// object, or cannot be written back.
pub fn update_manifest(
    dir: &Path,
    file_name: &str,
    name: &str,
    version: &str,
) -> Result<(), CreateError> {
    let path = dir.join(file_name);
    let fail = |reason: String| CreateError::Manifest {
        path: path.clone(),
        reason,
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| fail(e.to_string()))?;
    let mut document: Value =
        serde_json::from_str(&contents).map_err(|e| fail(format!("invalid JSON: {e}")))?;

    let Some(fields) = document.as_object_mut() else {
        return Err(fail("expected a JSON object at the top level".into()));
    };

    fields.insert("name".into(), Value::from(name));
    fields.insert("version".into(), Value::from(version));

    let mut out = Vec::with_capacity(contents.len() + 16);
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"\t"));
    serde::Serialize::serialize(&document, &mut serializer)
        .map_err(|e| fail(e.to_string()))?;
    out.push(b'\n');

    std::fs::write(&path, out).map_err(|e| fail(e.to_string()))
}
