#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use siteup_core::api::{
    ComponentRestarter, ExecutionContext, Platform, Priority, ReportRendererPlugin, TaskOutcome,
    TaskVersion, UpdateEvent, UpdateTask,
};
use siteup_core::update::text_lines;
use siteup_core::util::version;

/// What happened on the fake platform during a run.
#[derive(Debug, Default)]
pub struct Journal {
    pub ran: Vec<String>,
    pub router_restarts: usize,
    pub controller_restarts: usize,
}

#[derive(Clone, Default)]
pub struct MockClient {
    pub journal: Arc<Mutex<Journal>>,
}

impl MockClient {
    pub fn ran(&self) -> Vec<String> {
        self.journal.lock().unwrap().ran.clone()
    }

    pub fn router_restarts(&self) -> usize {
        self.journal.lock().unwrap().router_restarts
    }

    pub fn controller_restarts(&self) -> usize {
        self.journal.lock().unwrap().controller_restarts
    }

    pub fn context(&self) -> ExecutionContext<MockClient> {
        ExecutionContext::new(self.clone())
    }
}

impl ComponentRestarter for MockClient {
    fn restart_router(&mut self) -> anyhow::Result<()> {
        self.journal.lock().unwrap().router_restarts += 1;
        Ok(())
    }

    fn restart_controller(&mut self) -> anyhow::Result<()> {
        self.journal.lock().unwrap().controller_restarts += 1;
        Ok(())
    }
}

type RunFn = Box<dyn Fn(&mut ExecutionContext<MockClient>) -> TaskOutcome + Send + Sync>;
type AppliesFn = Box<dyn Fn(&str) -> bool + Send + Sync>;

pub struct MockTask {
    info: String,
    version: String,
    priority: Priority,
    platforms: Vec<Platform>,
    applies_to: AppliesFn,
    run: RunFn,
}

impl MockTask {
    /// Version-gated task: applies while the site is older than `version`.
    /// A wildcard task always applies.
    pub fn new(info: &str, version: &str, priority: Priority) -> Self {
        let gate = version.to_string();
        Self {
            info: info.to_string(),
            version: version.to_string(),
            priority,
            platforms: vec![Platform::Kubernetes],
            applies_to: Box::new(move |site| gate == "*" || version::less_recent_than(site, &gate)),
            run: Box::new(|_| TaskOutcome::ok()),
        }
    }

    pub fn on(mut self, platforms: &[Platform]) -> Self {
        self.platforms = platforms.to_vec();
        self
    }

    pub fn when(mut self, f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.applies_to = Box::new(f);
        self
    }

    pub fn runs(
        mut self,
        f: impl Fn(&mut ExecutionContext<MockClient>) -> TaskOutcome + Send + Sync + 'static,
    ) -> Self {
        self.run = Box::new(f);
        self
    }

    pub fn failing(self, message: &'static str) -> Self {
        self.runs(move |_| TaskOutcome::failed(anyhow::anyhow!(message)))
    }

    pub fn stopping(self, message: Option<&'static str>) -> Self {
        self.runs(move |_| match message {
            Some(m) => TaskOutcome::fatal(anyhow::anyhow!(m)),
            None => TaskOutcome::halt(),
        })
    }
}

impl UpdateTask<MockClient> for MockTask {
    fn version(&self) -> TaskVersion {
        self.version.parse().expect("mock task version")
    }

    fn info(&self) -> &str {
        &self.info
    }

    fn applies_to(&self, site_version: &str) -> bool {
        (self.applies_to)(site_version)
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    fn run(&self, ctx: &mut ExecutionContext<MockClient>) -> TaskOutcome {
        ctx.client()
            .journal
            .lock()
            .unwrap()
            .ran
            .push(self.info.clone());
        (self.run)(ctx)
    }
}

/// Renderer keeping the console lines a run would print.
#[derive(Default)]
pub struct CapturingRenderer {
    pub verbose: bool,
    pub lines: Mutex<Vec<String>>,
}

impl CapturingRenderer {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl ReportRendererPlugin for CapturingRenderer {
    fn name(&self) -> &str {
        "capture"
    }

    fn format(&self) -> &str {
        "text"
    }

    fn render(&self, event: &UpdateEvent) {
        self.lines
            .lock()
            .unwrap()
            .extend(text_lines(event, self.verbose));
    }
}

/// Renderer keeping the raw events of a run.
#[derive(Default)]
pub struct EventRecorder {
    pub events: Mutex<Vec<UpdateEvent>>,
}

impl EventRecorder {
    pub fn events(&self) -> Vec<UpdateEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ReportRendererPlugin for EventRecorder {
    fn name(&self) -> &str {
        "record"
    }

    fn format(&self) -> &str {
        "events"
    }

    fn render(&self, event: &UpdateEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
