use crate::commands::Out;
use crate::consolidate::{self, ConsolidationReport};
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::anyhow;
use std::path::Path;

/// Validates a monthly V2 export and writes it to the V2 master file.
///
/// # Arguments
/// - `input` - The raw monthly export.
/// - `output` - The master file to write. Defaults to the configured V2 history, which must then
///   be a local file.
/// - `append` - Add to the existing master instead of recreating it. Rows of the same month are
///   replaced.
pub async fn consolidate(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    append: bool,
) -> Result<Out<ConsolidationReport>> {
    let source = config.insights_source().pub_result(ErrorType::Config)?;
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => source
            .path()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow!("The V2 history is a URL ({source}), pass --output"))
            .pub_result(ErrorType::Config)?,
    };

    let report = consolidate::consolidate(input, &output, append).await?;
    let mut message = format!(
        "{} {} rows for {} in {}",
        if append { "Appended" } else { "Wrote" },
        report.written,
        report.month,
        report.output.display()
    );
    if report.replaced > 0 {
        message.push_str(&format!(", replacing {} existing rows", report.replaced));
    }
    if !report.dropped.is_empty() {
        message.push_str(&format!(", dropped {} invalid rows", report.dropped.len()));
    }
    Ok(Out::new(message, report))
}
