use siteup_core::api::{text_lines, ReportRendererPlugin, UpdateEvent};

/// Console report with the fixed progress lines. Verbose mode adds the
/// changes and warnings every task reported.
pub struct TextRendererPlugin {
    verbose: bool,
}

impl TextRendererPlugin {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn format_event(&self, event: &UpdateEvent) -> Vec<String> {
        text_lines(event, self.verbose)
    }
}

impl ReportRendererPlugin for TextRendererPlugin {
    fn name(&self) -> &str {
        "text-renderer"
    }

    fn format(&self) -> &str {
        "text"
    }

    fn render(&self, event: &UpdateEvent) {
        for line in self.format_event(event) {
            println!("{line}");
        }
    }
}
