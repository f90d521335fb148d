use std::path::Path;

use chrono::SecondsFormat;

use crate::error::Result;
use crate::model::TaskGroup;

const HEADER: [&str; 11] = [
    "Group Id",
    "Group",
    "Group Description",
    "Group Icon",
    "Task Id",
    "Task Name",
    "Start",
    "End",
    "Percent",
    "Color",
    "Dependencies",
];

/// Export every task to a semicolon-delimited CSV file matching the import format.
///
/// Instants are written as RFC 3339 in UTC and dependencies joined with `|`.
/// Returns the number of tasks written.
pub fn export_csv(groups: &[TaskGroup], path: &Path) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;
    wtr.write_record(HEADER)?;

    let mut written = 0;
    for group in groups {
        for task in &group.tasks {
            let start = task.start_date.to_rfc3339_opts(SecondsFormat::Secs, true);
            let end = task.end_date.to_rfc3339_opts(SecondsFormat::Secs, true);
            let percent = task.percent.to_string();
            let dependencies = task.dependencies.join("|");
            wtr.write_record([
                group.id.as_str(),
                group.name.as_str(),
                group.description.as_deref().unwrap_or(""),
                group.icon.as_deref().unwrap_or(""),
                task.id.as_str(),
                task.name.as_str(),
                start.as_str(),
                end.as_str(),
                percent.as_str(),
                task.color.as_deref().unwrap_or(""),
                dependencies.as_str(),
            ])?;
            written += 1;
        }
    }

    wtr.flush()?;
    tracing::debug!(written, path = %path.display(), "CSV exported");
    Ok(written)
}
