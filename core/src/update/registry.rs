use tracing::debug;

use crate::platform::Platform;

use super::types::UpdateTask;

/// Append-only list of update tasks, filled once at startup.
///
/// Registering the same task twice makes it run twice. Once the registry is
/// handed to an [`UpdateProcessor`](super::UpdateProcessor) it can no longer
/// be mutated.
pub struct TaskRegistry<C> {
    tasks: Vec<Box<dyn UpdateTask<C>>>,
}

impl<C> Default for TaskRegistry<C> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<C> TaskRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, task: impl UpdateTask<C> + 'static) -> &mut Self {
        self.tasks.push(Box::new(task));
        self
    }

    pub fn register_boxed(&mut self, task: Box<dyn UpdateTask<C>>) -> &mut Self {
        self.tasks.push(task);
        self
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn UpdateTask<C>> {
        self.tasks.iter().map(|t| t.as_ref())
    }

    /// Tasks relevant to `platform` whose change is still pending on a site
    /// at `site_version`. Registration order is preserved.
    pub fn candidates(&self, platform: Platform, site_version: &str) -> Vec<&dyn UpdateTask<C>> {
        self.iter()
            .filter(|task| {
                let selected = task.supports(platform) && task.applies_to(site_version);
                debug!(
                    task = task.info(),
                    version = %task.version(),
                    %platform,
                    site_version,
                    selected,
                    "update task filtered"
                );
                selected
            })
            .collect()
    }
}
