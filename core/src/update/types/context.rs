/// Components a site restart can target.
pub trait ComponentRestarter {
    fn restart_router(&mut self) -> anyhow::Result<()>;
    fn restart_controller(&mut self) -> anyhow::Result<()>;
}

impl<T: ComponentRestarter + ?Sized> ComponentRestarter for Box<T> {
    fn restart_router(&mut self) -> anyhow::Result<()> {
        (**self).restart_router()
    }

    fn restart_controller(&mut self) -> anyhow::Result<()> {
        (**self).restart_controller()
    }
}

/// Per-run state shared by every task of a single `process` call.
///
/// Tasks never restart components themselves: they record the intent here and
/// the restart sweep, ordered last, consumes it once. The processor takes the
/// context by value, so one context can only ever serve one run.
#[derive(Debug)]
pub struct ExecutionContext<C> {
    client: C,
    restart_router: bool,
    restart_controller: bool,
    failed_tasks: usize,
}

impl<C> ExecutionContext<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            restart_router: false,
            restart_controller: false,
            failed_tasks: 0,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn into_client(self) -> C {
        self.client
    }

    pub fn request_router_restart(&mut self) {
        self.restart_router = true;
    }

    pub fn request_controller_restart(&mut self) {
        self.restart_controller = true;
    }

    pub fn router_restart_requested(&self) -> bool {
        self.restart_router
    }

    pub fn controller_restart_requested(&self) -> bool {
        self.restart_controller
    }

    /// Read-once: returns the flag and clears it.
    pub fn take_router_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart_router)
    }

    /// Read-once: returns the flag and clears it.
    pub fn take_controller_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart_controller)
    }

    /// Called by the processor for every task that reported an error.
    pub fn record_failure(&mut self) {
        self.failed_tasks += 1;
    }

    /// Tasks of this run that reported an error so far.
    pub fn failed_tasks(&self) -> usize {
        self.failed_tasks
    }
}
