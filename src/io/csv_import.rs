use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{Diagnostic, Error, Result};
use crate::model::{Task, TaskGroup};

/// Group used for rows without a group column.
const DEFAULT_GROUP: &str = "Tasks";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvImport {
    pub groups: Vec<TaskGroup>,
    pub skipped: usize,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    GroupId,
    Group,
    GroupDescription,
    GroupIcon,
    Id,
    Name,
    Start,
    End,
    Percent,
    Color,
    Dependencies,
}

/// Try parsing a timestamp or a bare date (taken as midnight UTC).
fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t.and_utc());
        }
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
        }
    }
    None
}

/// Accepts `40`, `40%` and `0.4` style values.
fn parse_percent(s: &str) -> Option<f32> {
    let s = s.trim().trim_end_matches('%').trim();
    if s.is_empty() {
        return Some(0.0);
    }
    let value: f32 = s.parse().ok()?;
    let value = if value > 0.0 && value <= 1.0 && s.contains('.') {
        value * 100.0
    } else {
        value
    };
    Some(value)
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "groupid" | "resourceid" | "teamid" => Some(Column::GroupId),
        "group" | "groupname" | "resource" | "resourcename" | "team" | "crew" => Some(Column::Group),
        "groupdescription" | "resourcedescription" => Some(Column::GroupDescription),
        "groupicon" | "resourceicon" => Some(Column::GroupIcon),

        "id" | "taskid" | "key" => Some(Column::Id),

        "name" | "task" | "tasklabel" | "taskname" | "label" | "title" | "activity" => {
            Some(Column::Name)
        }

        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),

        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => Some(Column::End),

        "percent" | "progress" | "complete" | "percentcomplete" | "done" => Some(Column::Percent),

        "color" | "colour" => Some(Column::Color),

        "dependencies" | "dependson" | "depends" | "predecessors" => Some(Column::Dependencies),

        _ => None,
    }
}

/// Import groups from a delimited file.
///
/// Rows are grouped by group id in first-seen order. Without a group id column
/// the group name doubles as the id. Rows without a task id get a generated
/// one; rows that cannot be read are counted in `skipped`.
pub fn import_csv(path: &Path) -> Result<CsvImport> {
    let content = std::fs::read_to_string(path)?;
    parse_csv(&content)
}

pub fn parse_csv(content: &str) -> Result<CsvImport> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    let has = |c: Column| col_map.contains(&Some(c));
    if !has(Column::Name) || !has(Column::Start) || !has(Column::End) {
        let found: Vec<&str> = headers.iter().collect();
        return Err(Error::Import(format!(
            "missing required columns, found {found:?}; need task name, start, end"
        )));
    }

    let mut import = CsvImport::default();

    for (i, result) in reader.records().enumerate() {
        // Header is line 1
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(line, %e, "skipping unreadable CSV row");
                import.skipped += 1;
                continue;
            }
        };

        let field = |c: Column| {
            col_map
                .iter()
                .position(|m| *m == Some(c))
                .and_then(|idx| record.get(idx))
                .filter(|v| !v.is_empty())
        };

        let Some(name) = field(Column::Name) else {
            import.skipped += 1;
            continue;
        };
        let (Some(start), Some(end)) = (
            field(Column::Start).and_then(parse_instant),
            field(Column::End).and_then(parse_instant),
        ) else {
            import.diagnostics.push(Diagnostic::warning(format!(
                "line {line}: invalid start or end for '{name}'"
            )));
            import.skipped += 1;
            continue;
        };
        let Some(percent) = field(Column::Percent).map_or(Some(0.0), parse_percent) else {
            import.diagnostics.push(Diagnostic::warning(format!(
                "line {line}: invalid percent for '{name}'"
            )));
            import.skipped += 1;
            continue;
        };

        let id = field(Column::Id)
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let mut task = Task::new(id, name, start, end).with_percent(percent);
        if let Some(color) = field(Column::Color) {
            task = task.with_color(color);
        }
        if let Some(deps) = field(Column::Dependencies) {
            task = task.with_dependencies(
                deps.split(['|', ' '])
                    .map(str::trim)
                    .filter(|d| !d.is_empty()),
            );
        }
        if !task.is_well_formed() {
            import.diagnostics.push(
                Diagnostic::warning(format!("line {line}: task ends before it starts"))
                    .for_task(&task.id),
            );
        }

        let group_name = field(Column::Group);
        let group_id = field(Column::GroupId).or(group_name).unwrap_or(DEFAULT_GROUP);
        let idx = match import.groups.iter().position(|g| g.id == group_id) {
            Some(idx) => idx,
            None => {
                import
                    .groups
                    .push(TaskGroup::new(group_id, group_name.unwrap_or(group_id)));
                import.groups.len() - 1
            }
        };
        let group = &mut import.groups[idx];
        // First non-empty value wins
        if group.description.is_none() {
            group.description = field(Column::GroupDescription).map(str::to_string);
        }
        if group.icon.is_none() {
            group.icon = field(Column::GroupIcon).map(str::to_string);
        }
        group.tasks.push(task);
    }

    if import.groups.is_empty() {
        return Err(Error::Import(if import.skipped > 0 {
            format!("no valid tasks found ({} rows skipped)", import.skipped)
        } else {
            "file is empty or has no data rows".to_string()
        }));
    }

    tracing::debug!(
        groups = import.groups.len(),
        skipped = import.skipped,
        "CSV imported"
    );
    Ok(import)
}
