//! Tanu Bot - text front end and bundled skills for the tanu dispatcher.
//!
//! The core crate ([`tanu`]) knows nothing about what skills do. This crate
//! supplies the pieces around it:
//!
//! - **Skills** ([`skills`]) - compiled-in factories and their manifests
//! - **Input** ([`input`]) - the interactive line loop
//! - **Echo** ([`echo`]) - prints skill results to the console
//! - **Config** ([`config`]) - `~/.tanu/config.json`
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tanu_bot::prelude::*;
//!
//! let agent = Agent::builder()
//!     .plugin_dir(skills_dir())
//!     .factories(builtin_factories(Arc::new(SystemLauncher)))
//!     .observer(Arc::new(ConsoleEcho))
//!     .build();
//! run_interactive(&agent, &TextInputConfig::new()).await?;
//! ```

pub mod config;
pub mod echo;
pub mod error;
pub mod input;
pub mod skills;

/// Prelude module for convenient imports.
pub mod prelude {
    // Core
    pub use tanu::prelude::*;

    // Error types
    pub use crate::error::{
        BotError, ConfigError, ConfigResult, ErrorContext, InputError, InputResult, Result,
    };

    // Config
    pub use crate::config::{
        BotConfig, ConfigIssue, EchoConfig, InputConfig, IssueLevel, SkillsConfig, config_path,
        init_config, load_config_from, save_config_to, skills_dir,
    };

    // Front end
    pub use crate::echo::ConsoleEcho;
    pub use crate::input::{SessionEnd, TextInputConfig, run_interactive, run_session};

    // Skills
    pub use crate::skills::{
        BUNDLED_MANIFESTS, Launcher, SystemLauncher, builtin_factories, install_bundled,
    };
}
