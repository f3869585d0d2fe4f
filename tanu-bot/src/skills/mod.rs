//! Bundled skills.
//!
//! Each skill is exposed as a factory in [`builtin_factories`]. A skill is
//! only loaded when a manifest in the plugin directory refers to it; `tanu
//! init` installs one manifest per bundled skill.

pub mod command;
pub mod launcher;
pub mod open_app;
pub mod web_search;
pub mod youtube;

pub use command::CommandSkill;
pub use launcher::{Launcher, SystemLauncher};
pub use open_app::OpenAppSkill;
pub use web_search::WebSearchSkill;
pub use youtube::YouTubeSkill;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tanu::factory::FactoryRegistry;
use tracing::{debug, info};

/// Manifests shipped with the binary, as `(file name, contents)`.
pub const BUNDLED_MANIFESTS: [(&str, &str); 4] = [
    ("open_app.json", include_str!("../../skills/open_app.json")),
    ("web_search.json", include_str!("../../skills/web_search.json")),
    ("youtube.json", include_str!("../../skills/youtube.json")),
    ("_example_command.json", include_str!("../../skills/_example_command.json")),
];

/// Factories for every bundled skill, sharing one launcher.
#[must_use]
pub fn builtin_factories(launcher: Arc<dyn Launcher>) -> FactoryRegistry {
    let mut registry = FactoryRegistry::new();

    let l = Arc::clone(&launcher);
    registry.register(open_app::FACTORY, move |settings| {
        OpenAppSkill::from_settings(settings, Arc::clone(&l))
    });
    let l = Arc::clone(&launcher);
    registry.register(web_search::FACTORY, move |settings| {
        WebSearchSkill::from_settings(settings, Arc::clone(&l))
    });
    let l = Arc::clone(&launcher);
    registry.register(youtube::FACTORY, move |settings| {
        YouTubeSkill::from_settings(settings, Arc::clone(&l))
    });
    registry.register(command::FACTORY, move |settings| {
        CommandSkill::from_settings(settings, Arc::clone(&launcher))
    });

    registry
}

/// Write the bundled manifests into `dir`. Existing files are kept unless
/// `force` is set. Returns the paths written.
///
/// # Errors
///
/// Returns an IO error if the directory or a file cannot be written.
pub async fn install_bundled(dir: &Path, force: bool) -> std::io::Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;

    let mut written = Vec::new();
    for (file, content) in BUNDLED_MANIFESTS {
        let path = dir.join(file);
        if path.exists() && !force {
            debug!(path = %path.display(), "manifest exists, keeping");
            continue;
        }
        tokio::fs::write(&path, content).await?;
        written.push(path);
    }

    info!(dir = %dir.display(), count = written.len(), "installed bundled skills");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use launcher::testing::RecordingLauncher;
    use tanu::loader::SkillManifest;
    use tanu::{Agent, HandlerResult};

    #[test]
    fn test_bundled_manifests_parse() {
        let factories = builtin_factories(Arc::new(RecordingLauncher::default()));
        for (file, content) in BUNDLED_MANIFESTS {
            let manifest: SkillManifest = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("{file} does not parse: {e}"));
            assert!(
                factories.contains(&manifest.factory),
                "{file} names unknown factory {}",
                manifest.factory
            );
        }
    }

    #[tokio::test]
    async fn test_installed_skills_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let written = install_bundled(dir.path(), false).await.unwrap();
        assert_eq!(written.len(), BUNDLED_MANIFESTS.len());
        assert!(install_bundled(dir.path(), false).await.unwrap().is_empty());

        let launcher = Arc::new(RecordingLauncher::default());
        let agent = Agent::builder()
            .plugin_dir(dir.path())
            .factories(builtin_factories(Arc::clone(&launcher) as Arc<dyn Launcher>))
            .build();

        // The example command manifest is private and never loads.
        assert_eq!(agent.report().loaded.len(), 3);
        assert!(agent.report().is_clean());

        let result = agent.dispatch("Search for weather radar");
        assert_eq!(
            result,
            HandlerResult::handled("Google search for: weather radar")
        );
        assert_eq!(launcher.urls().len(), 1);
    }
}
