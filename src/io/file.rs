use std::path::Path;

use serde_json::Value;

use crate::error::{Diagnostic, Result};
use crate::model::{Task, TaskGroup};

/// Groups read from disk plus whatever had to be left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedGroups {
    pub groups: Vec<TaskGroup>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Save groups to a JSON file.
pub fn save_groups(groups: &[TaskGroup], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(groups)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load groups from a JSON file, keeping every well-formed entry.
pub fn load_groups(path: &Path) -> Result<LoadedGroups> {
    let json = std::fs::read_to_string(path)?;
    parse_groups(&json)
}

/// Parse a JSON array of groups.
///
/// Only unparseable text is an error. A non-array document gives zero groups;
/// groups and tasks that cannot be read are dropped with a diagnostic.
pub fn parse_groups(json: &str) -> Result<LoadedGroups> {
    let value: Value = serde_json::from_str(json)?;
    let mut loaded = LoadedGroups::default();

    let Value::Array(items) = value else {
        loaded
            .diagnostics
            .push(Diagnostic::error("expected an array of groups"));
        return Ok(loaded);
    };

    for (index, item) in items.into_iter().enumerate() {
        match read_group(item, &mut loaded.diagnostics) {
            Some(group) => loaded.groups.push(group),
            None => tracing::debug!(index, "group skipped"),
        }
    }
    tracing::debug!(
        groups = loaded.groups.len(),
        diagnostics = loaded.diagnostics.len(),
        "groups loaded"
    );
    Ok(loaded)
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn read_group(item: Value, diagnostics: &mut Vec<Diagnostic>) -> Option<TaskGroup> {
    let Value::Object(mut obj) = item else {
        diagnostics.push(Diagnostic::error("group entry is not an object"));
        return None;
    };
    let Some(id) = string_field(&obj, "id") else {
        diagnostics.push(Diagnostic::error("group has no id"));
        return None;
    };

    let mut group = TaskGroup::new(id.clone(), string_field(&obj, "name").unwrap_or_default());
    group.description = string_field(&obj, "description");
    group.icon = string_field(&obj, "icon");

    match obj.remove("tasks") {
        Some(Value::Array(tasks)) => {
            for task in tasks {
                if let Some(task) = read_task(task, &id, diagnostics) {
                    group.tasks.push(task);
                }
            }
        }
        Some(Value::Null) | None => {}
        Some(_) => diagnostics.push(Diagnostic::warning("tasks is not an array").in_group(&id)),
    }
    Some(group)
}

fn read_task(item: Value, group_id: &str, diagnostics: &mut Vec<Diagnostic>) -> Option<Task> {
    let Some(task_id) = item.get("id").and_then(Value::as_str).map(str::to_string) else {
        diagnostics.push(Diagnostic::error("task has no id").in_group(group_id));
        return None;
    };
    match serde_json::from_value::<Task>(item) {
        Ok(mut task) => {
            if !(0.0..=100.0).contains(&task.percent) {
                diagnostics.push(
                    Diagnostic::warning(format!("percent {} out of range, clamped", task.percent))
                        .in_group(group_id)
                        .for_task(task_id),
                );
                task.percent = task.percent.clamp(0.0, 100.0);
            }
            Some(task)
        }
        Err(err) => {
            diagnostics.push(
                Diagnostic::error(format!("unreadable task: {err}"))
                    .in_group(group_id)
                    .for_task(task_id),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn keeps_good_entries_and_reports_bad_ones() {
        let json = r#"[
            {"id": "g1", "name": "Crew", "tasks": [
                {"id": "a", "name": "A", "startDate": "2024-03-04T08:00:00Z", "endDate": "2024-03-04T10:00:00Z"},
                {"id": "b", "name": "B", "startDate": "not a date", "endDate": "2024-03-04T10:00:00Z"},
                {"name": "no id"},
                {"id": "c", "start": "2024-03-05T00:00:00Z", "end": "2024-03-06T00:00:00Z", "percent": 40}
            ]},
            {"name": "missing id"},
            42
        ]"#;
        let loaded = parse_groups(json).unwrap();
        assert_eq!(loaded.groups.len(), 1);
        let ids: Vec<&str> = loaded.groups[0].tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(loaded.groups[0].tasks[1].percent, 40.0);
        assert_eq!(loaded.diagnostics.len(), 4);
        assert_eq!(loaded.diagnostics[0].task_id.as_deref(), Some("b"));
    }

    #[test]
    fn out_of_range_percent_is_clamped_with_a_warning() {
        let json = r#"[{"id": "g1", "name": "Crew", "tasks": [
            {"id": "a", "name": "A", "startDate": "2024-03-04T08:00:00Z", "endDate": "2024-03-04T10:00:00Z", "percent": 250},
            {"id": "b", "name": "B", "startDate": "2024-03-04T08:00:00Z", "endDate": "2024-03-04T10:00:00Z", "percent": -5}
        ]}]"#;
        let loaded = parse_groups(json).unwrap();
        let tasks = &loaded.groups[0].tasks;
        assert_eq!(tasks[0].percent, 100.0);
        assert!(tasks[0].is_complete());
        assert_eq!(tasks[1].percent, 0.0);
        assert_eq!(loaded.diagnostics.len(), 2);
        assert_eq!(loaded.diagnostics[0].task_id.as_deref(), Some("a"));
        assert_eq!(loaded.diagnostics[0].severity, crate::error::Severity::Warning);
    }

    #[test]
    fn non_array_document_gives_no_groups() {
        let loaded = parse_groups(r#"{"id": "g1"}"#).unwrap();
        assert!(loaded.groups.is_empty());
        assert_eq!(loaded.diagnostics.len(), 1);
    }

    #[test]
    fn broken_json_is_an_error() {
        assert!(parse_groups("[{").is_err());
    }

    #[test]
    fn saved_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let groups = vec![TaskGroup::new("g", "Crew").with_tasks(vec![Task::new(
            "t",
            "Task",
            start,
            start + chrono::Duration::days(2),
        )
        .with_dependencies(["s"])])];
        save_groups(&groups, &path).unwrap();
        let loaded = load_groups(&path).unwrap();
        assert_eq!(loaded.groups, groups);
        assert!(loaded.diagnostics.is_empty());
    }
}
