pub mod dependency;
pub mod task;
pub mod timeline;

pub use dependency::{check_dependencies, DependencyReport};
pub use task::{Task, TaskGroup};
pub use timeline::{CollisionBucket, TimeScale, ViewMode, Viewport};
