// tenet-core/src/application/output.rs

//! Output treatment: format one result and write it to every configured
//! target. A `treat_as: error` output demotes an otherwise successful write
//! to a business failure.

use crate::domain::error::ErrorBag;
use crate::domain::model::{Data, DocFormat, OutputSpec, Severity, StepOutcome, Target};
use crate::error::TenetError;
use crate::infrastructure::plugins::Plugins;
use std::path::Path;

pub fn treat(
    plugins: &Plugins,
    data: &Data,
    output: Option<&OutputSpec>,
) -> Result<StepOutcome, TenetError> {
    let Some(output) = output else {
        return Ok(StepOutcome::Pass);
    };

    let errors = ErrorBag::new();
    for target in &output.targets {
        if let Err(err) = write_target(plugins, data, output.treat_as, target) {
            errors.add(target.name.clone(), err);
        }
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }
    if output.treat_as == Severity::Error && !output.targets.is_empty() {
        return Ok(StepOutcome::BusinessFailure);
    }
    Ok(StepOutcome::Pass)
}

fn write_target(
    plugins: &Plugins,
    data: &Data,
    severity: Severity,
    target: &Target,
) -> Result<(), TenetError> {
    let formatter = plugins
        .formatters
        .get(DocFormat::Json.as_str(), target.format.as_str())?;
    let writer_factory = plugins.writers.get(target.kind.as_str())?;
    let formatted = formatter(&data.content)?;
    let writer = writer_factory(severity);
    writer.write(&Data {
        kind: data.kind.clone(),
        path: join_sink_path(&target.path, &data.path),
        content: formatted,
    })
}

/// Join a target directory with a document path. Absolute or `./`-relative
/// document paths land under the target instead of escaping it.
pub(crate) fn join_sink_path(target: &str, doc: &str) -> String {
    if target.is_empty() {
        return doc.to_string();
    }
    let mut relative = doc;
    loop {
        if let Some(rest) = relative.strip_prefix("./") {
            relative = rest;
        } else if let Some(rest) = relative.strip_prefix('/') {
            relative = rest;
        } else {
            break;
        }
    }
    Path::new(target)
        .join(relative)
        .to_string_lossy()
        .into_owned()
}
