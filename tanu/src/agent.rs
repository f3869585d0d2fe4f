//! The process-lifetime dispatch agent.
//!
//! An [`Agent`] runs the loader exactly once when it is built and keeps the
//! resulting routing table, unchanged, until it is dropped. It holds no
//! mutable state, so one agent can be shared between input sources.

use crate::error::SkillResult;
use crate::factory::FactoryRegistry;
use crate::loader::{LoadReport, LoaderConfig, SkillLoader, SkillUnit};
use crate::observer::SharedObserver;
use crate::router::IntentRouter;
use crate::routing::RoutingTable;
use crate::skill::{BoxedSkill, HandlerResult};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// Skill dispatcher owning a loaded routing table.
///
/// # Example
///
/// ```rust,ignore
/// let agent = Agent::builder()
///     .plugin_dir("skills")
///     .factories(builtin_factories())
///     .build();
///
/// match agent.dispatch("please open notepad") {
///     HandlerResult::Handled(value) => println!("{value:?}"),
///     HandlerResult::NotHandled => {}
///     HandlerResult::Failed(reason) => eprintln!("{reason}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Agent {
    router: IntentRouter,
    report: LoadReport,
}

impl Agent {
    /// Start building an agent.
    #[must_use]
    pub fn builder() -> AgentBuilder {
        AgentBuilder::default()
    }

    /// Wrap an already-built routing table.
    #[must_use]
    pub fn from_table(table: RoutingTable) -> Self {
        Self {
            router: IntentRouter::new(table),
            report: LoadReport::default(),
        }
    }

    /// Dispatch one utterance to the first matching skill.
    pub fn dispatch(&self, text: &str) -> HandlerResult {
        self.router.dispatch(text)
    }

    /// The routing table built at startup.
    #[must_use]
    pub const fn table(&self) -> &RoutingTable {
        self.router.table()
    }

    /// The router, for route inspection.
    #[must_use]
    pub const fn router(&self) -> &IntentRouter {
        &self.router
    }

    /// What happened while loading skills.
    #[must_use]
    pub const fn report(&self) -> &LoadReport {
        &self.report
    }
}

/// Builder for [`Agent`].
#[derive(Debug, Default)]
pub struct AgentBuilder {
    config: LoaderConfig,
    factories: FactoryRegistry,
    units: Vec<SkillUnit>,
    observers: Vec<SharedObserver>,
}

impl AgentBuilder {
    /// Set the loader configuration.
    #[must_use]
    pub fn config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the plugin directory.
    #[must_use]
    pub fn plugin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.plugin_dir = Some(dir.into());
        self
    }

    /// Replace the factory registry.
    #[must_use]
    pub fn factories(mut self, factories: FactoryRegistry) -> Self {
        self.factories = factories;
        self
    }

    /// Register one more factory.
    #[must_use]
    pub fn factory<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Value) -> SkillResult<BoxedSkill> + Send + Sync + 'static,
    {
        self.factories.register(name, factory);
        self
    }

    /// Add an inline unit, loaded after the directory units.
    #[must_use]
    pub fn unit(mut self, unit: SkillUnit) -> Self {
        self.units.push(unit);
        self
    }

    /// Attach a dispatch observer.
    #[must_use]
    pub fn observer(mut self, observer: SharedObserver) -> Self {
        self.observers.push(observer);
        self
    }

    /// Load skills and build the agent. Never fails; see
    /// [`Agent::report`] for units that were skipped.
    #[must_use]
    pub fn build(self) -> Agent {
        let loader = self
            .units
            .into_iter()
            .fold(SkillLoader::new(self.config, self.factories), SkillLoader::with_unit);
        let (table, report) = loader.load();

        let router = self
            .observers
            .into_iter()
            .fold(IntentRouter::new(table), IntentRouter::with_observer);

        info!(
            phrases = router.table().len(),
            skills = report.loaded.len(),
            "agent ready"
        );
        Agent { router, report }
    }
}
