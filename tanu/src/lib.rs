//! Tanu is a skill registry and intent dispatcher for voice and text assistants.
//!
//! Skills are plugins that declare trigger phrases and a handler. At startup
//! the [`loader`] discovers plugin units, builds each skill through a
//! compiled-in [`factory`], and folds its phrases into a [`routing`] table.
//! The [`router`] then maps each utterance to the first skill whose phrase
//! occurs in it, containing any failure inside the skill.
//!
//! # Architecture
//!
//! - **Skill** ([`skill`]) - the capability contract every plugin implements
//! - **Loader** ([`loader`]) - plugin discovery with per-unit fault containment
//! - **Routing table** ([`routing`]) - normalized phrase to skill bindings
//! - **Router** ([`router`]) - substring matching and isolated invocation
//! - **Agent** ([`agent`]) - loader and router bundled for the process lifetime
//! - **Observers** ([`observer`]) - optional echo and diagnostic sinks
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tanu::prelude::*;
//!
//! let agent = Agent::builder()
//!     .plugin_dir("skills")
//!     .factory("greeter", |_| Ok(Box::new(Greeter::default())))
//!     .build();
//!
//! let result = agent.dispatch("Hello there");
//! ```

pub mod agent;
pub mod error;
pub mod factory;
pub mod loader;
pub mod observer;
pub mod router;
pub mod routing;
pub mod skill;

pub use agent::{Agent, AgentBuilder};
pub use error::{Diagnostic, LoadError, SkillError, SkillResult};
pub use skill::{BoxedSkill, HandlerResult, Skill};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::agent::{Agent, AgentBuilder};
    pub use crate::error::{Diagnostic, LoadError, SkillError, SkillResult};
    pub use crate::factory::{FactoryRegistry, SkillFactory};
    pub use crate::loader::{
        BuiltSkill, LoadReport, LoadedUnit, LoaderConfig, SkillLoader, SkillManifest, SkillUnit,
        UnitSource,
    };
    pub use crate::observer::{DispatchObserver, RecordingObserver, SharedObserver};
    pub use crate::router::IntentRouter;
    pub use crate::routing::{Route, RoutingTable};
    pub use crate::skill::{BoxedSkill, HandlerResult, Skill};
}
