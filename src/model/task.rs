use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single bar on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique within the owning group.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(alias = "start")]
    pub start_date: DateTime<Utc>,
    #[serde(alias = "end")]
    pub end_date: DateTime<Utc>,
    /// Completion from 0 to 100.
    #[serde(default)]
    pub percent: f32,
    /// Color token, e.g. `#3a86ff`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Ids of tasks this one depends on. May point into other groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl Task {
    /// Create a new task with sensible defaults.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_date: start,
            end_date: end,
            percent: 0.0,
            color: None,
            dependencies: Vec::new(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_date - self.start_date
    }

    /// True when the task can be placed on the timeline.
    pub fn is_well_formed(&self) -> bool {
        self.end_date >= self.start_date
    }

    pub fn is_complete(&self) -> bool {
        self.percent >= 100.0
    }

    pub fn with_percent(mut self, percent: f32) -> Self {
        self.percent = percent.clamp(0.0, 100.0);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// A resource row in the task list, owning an ordered list of tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskGroup {
    /// Unique within the task set.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon payload rendered next to the group name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            icon: None,
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Name shown in the task list, with a placeholder for blank names.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Unnamed"
        } else {
            &self.name
        }
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }
}

/// Find a group by id.
pub fn find_group<'a>(groups: &'a [TaskGroup], group_id: &str) -> Option<&'a TaskGroup> {
    groups.iter().find(|g| g.id == group_id)
}

/// Find a task by group and task id.
pub fn find_task<'a>(groups: &'a [TaskGroup], group_id: &str, task_id: &str) -> Option<&'a Task> {
    find_group(groups, group_id).and_then(|g| g.task(task_id))
}

/// Earliest start and latest end over every well-formed task.
pub fn time_bounds(groups: &[TaskGroup]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let tasks = groups
        .iter()
        .flat_map(|g| g.tasks.iter())
        .filter(|t| t.is_well_formed());
    tasks.fold(None, |acc, t| match acc {
        None => Some((t.start_date, t.end_date)),
        Some((lo, hi)) => Some((lo.min(t.start_date), hi.max(t.end_date))),
    })
}
