//! Skill loading from a plugin directory.
//!
//! A plugin unit is a JSON manifest naming a compiled-in factory and the
//! settings to build it with. Dropping a manifest into the plugin directory
//! adds a skill without recompiling. Every per-unit failure is contained: it
//! is logged, recorded in the [`LoadReport`], and loading moves on.

use crate::error::{Diagnostic, LoadError, SkillError, SkillResult};
use crate::factory::FactoryRegistry;
use crate::routing::{RoutingTable, normalize};
use crate::skill::{BoxedSkill, Skill};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// File extension of plugin manifests.
pub const MANIFEST_EXTENSION: &str = "json";

/// Plugin unit manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillManifest {
    /// Name of the compiled-in factory that builds this skill.
    pub factory: String,
    /// Whether the unit should be loaded at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Optional description, shown in reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Settings handed to the factory.
    #[serde(default)]
    pub settings: serde_json::Value,
}

const fn default_enabled() -> bool {
    true
}

impl SkillManifest {
    /// Create an enabled manifest for `factory` with no settings.
    #[must_use]
    pub fn new(factory: impl Into<String>) -> Self {
        Self {
            factory: factory.into(),
            enabled: true,
            description: None,
            settings: serde_json::Value::Null,
        }
    }

    /// Set the factory settings.
    #[must_use]
    pub fn settings(mut self, settings: serde_json::Value) -> Self {
        self.settings = settings;
        self
    }

    /// Set whether the unit is enabled.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Where a unit's manifest comes from.
#[derive(Debug, Clone)]
pub enum UnitSource {
    /// A manifest file on disk.
    File(PathBuf),
    /// An already-parsed manifest.
    Inline(SkillManifest),
}

/// One candidate plugin unit.
#[derive(Debug, Clone)]
pub struct SkillUnit {
    /// Unit name (the manifest file stem for file units).
    pub name: String,
    /// Manifest source.
    pub source: UnitSource,
}

impl SkillUnit {
    /// Create a unit backed by a manifest file.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: UnitSource::File(path.into()),
        }
    }

    /// Create a unit from an in-memory manifest.
    #[must_use]
    pub fn inline(name: impl Into<String>, manifest: SkillManifest) -> Self {
        Self {
            name: name.into(),
            source: UnitSource::Inline(manifest),
        }
    }
}

/// Whether a unit name marks a private or hidden unit.
#[must_use]
pub fn is_private_unit(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

/// Loader configuration.
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Directory scanned for plugin manifests. `None` loads only inline units.
    pub plugin_dir: Option<PathBuf>,
}

impl LoaderConfig {
    /// Configuration scanning `dir`.
    #[must_use]
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            plugin_dir: Some(dir.into()),
        }
    }
}

/// A skill built from a unit, with what it reported while loading.
#[derive(Clone)]
pub struct BuiltSkill {
    /// Name the skill reported.
    pub name: String,
    /// The skill.
    pub skill: Arc<dyn Skill>,
    /// Normalized trigger phrases.
    pub phrases: Vec<String>,
}

impl fmt::Debug for BuiltSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltSkill")
            .field("name", &self.name)
            .field("phrases", &self.phrases)
            .finish_non_exhaustive()
    }
}

/// A unit that was registered successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedUnit {
    /// Unit name.
    pub unit: String,
    /// Skill name reported by the skill.
    pub skill: String,
    /// Number of phrases the unit registered.
    pub phrases: usize,
}

/// Summary of one loader run.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Units registered, in load order.
    pub loaded: Vec<LoadedUnit>,
    /// Diagnostics for skipped units and directory problems.
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    /// Load errors for skipped units.
    pub fn skipped(&self) -> impl Iterator<Item = &LoadError> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::Load(err) => Some(err),
            _ => None,
        })
    }

    /// Whether every discovered unit loaded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::Load(LoadError::Plugin { .. } | LoadError::Factory { .. }) => {
                error!("{diagnostic}");
            }
            _ => warn!("{diagnostic}"),
        }
        self.diagnostics.push(diagnostic);
    }
}

/// Skill loader: discovers units, builds skills, fills a routing table.
#[derive(Debug, Clone)]
pub struct SkillLoader {
    config: LoaderConfig,
    factories: FactoryRegistry,
    inline: Vec<SkillUnit>,
}

impl SkillLoader {
    /// Create a loader over the given factories.
    #[must_use]
    pub fn new(config: LoaderConfig, factories: FactoryRegistry) -> Self {
        Self {
            config,
            factories,
            inline: Vec::new(),
        }
    }

    /// Add a unit that is loaded after the directory units.
    #[must_use]
    pub fn with_unit(mut self, unit: SkillUnit) -> Self {
        self.inline.push(unit);
        self
    }

    /// The plugin directory, if any.
    #[must_use]
    pub fn plugin_dir(&self) -> Option<&Path> {
        self.config.plugin_dir.as_deref()
    }

    /// List the units to load: directory manifests in file-name order, then
    /// inline units in the order they were added.
    pub fn discover(&self, report: &mut LoadReport) -> Vec<SkillUnit> {
        let mut units = Vec::new();

        if let Some(dir) = &self.config.plugin_dir {
            units.extend(Self::scan_dir(dir, report));
        }
        units.extend(
            self.inline
                .iter()
                .filter(|unit| !is_private_unit(&unit.name))
                .cloned(),
        );

        units
    }

    fn scan_dir(dir: &Path, report: &mut LoadReport) -> Vec<SkillUnit> {
        if !dir.is_dir() {
            report.record(Diagnostic::DirectoryMissing {
                path: dir.display().to_string(),
            });
            return Vec::new();
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                report.record(LoadError::plugin(dir.display().to_string(), e).into());
                return Vec::new();
            }
        };

        let mut units: Vec<SkillUnit> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                    None
                }
            })
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case(MANIFEST_EXTENSION))
            })
            .filter_map(|path| {
                let name = path.file_stem()?.to_string_lossy().into_owned();
                if is_private_unit(&name) {
                    debug!(unit = %name, "skipping private unit");
                    return None;
                }
                Some(SkillUnit::file(name, path))
            })
            .collect();

        units.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(dir = %dir.display(), count = units.len(), "discovered plugin units");
        units
    }

    /// Load every unit into a fresh routing table. Never fails: units that
    /// cannot be loaded are skipped and reported.
    #[must_use]
    pub fn load(&self) -> (RoutingTable, LoadReport) {
        let mut report = LoadReport::default();
        let mut table = RoutingTable::new();

        for unit in self.discover(&mut report) {
            match self.load_unit(&unit) {
                Ok(Some(built)) => {
                    for phrase in &built.phrases {
                        let previous =
                            table.insert(phrase, &unit.name, &built.name, Arc::clone(&built.skill));
                        if let Some(previous) = previous {
                            warn!(
                                phrase = %phrase,
                                previous = %previous,
                                unit = %unit.name,
                                "trigger phrase overwritten"
                            );
                        }
                    }
                    debug!(
                        unit = %unit.name,
                        skill = %built.name,
                        phrases = built.phrases.len(),
                        "loaded skill"
                    );
                    report.loaded.push(LoadedUnit {
                        unit: unit.name.clone(),
                        skill: built.name,
                        phrases: built.phrases.len(),
                    });
                }
                Ok(None) => {}
                Err(err) => report.record(err.into()),
            }
        }

        info!(
            skills = report.loaded.len(),
            phrases = table.len(),
            skipped = report.skipped().count(),
            "skills loaded"
        );
        (table, report)
    }

    /// Load one unit. `Ok(None)` means the unit is disabled.
    ///
    /// The factory call and the skill's `name` and `intent_phrases` all run
    /// inside one `catch_unwind`; a panic in any of them is a factory error.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] describing why the unit was skipped.
    pub fn load_unit(&self, unit: &SkillUnit) -> Result<Option<BuiltSkill>, LoadError> {
        let manifest = Self::read_manifest(unit)?;
        if !manifest.enabled {
            debug!(unit = %unit.name, "unit disabled, skipping");
            return Ok(None);
        }

        let factory = self
            .factories
            .get(&manifest.factory)
            .ok_or_else(|| LoadError::MissingFactory {
                unit: unit.name.clone(),
                factory: manifest.factory.clone(),
            })?;

        let built = panic::catch_unwind(AssertUnwindSafe(
            || -> SkillResult<(BoxedSkill, String, Vec<String>)> {
                let skill = factory(&manifest.settings)?;
                let name = skill.name().to_string();
                let phrases = skill.intent_phrases().to_vec();
                Ok((skill, name, phrases))
            },
        ))
        .unwrap_or_else(|payload| Err(SkillError::panicked(payload.as_ref())));
        let (skill, name, phrases) = built.map_err(|source| LoadError::Factory {
            unit: unit.name.clone(),
            factory: manifest.factory.clone(),
            source,
        })?;

        let phrases = validate_phrases(&unit.name, &phrases)?;
        Ok(Some(BuiltSkill {
            name,
            skill: Arc::from(skill),
            phrases,
        }))
    }

    fn read_manifest(unit: &SkillUnit) -> Result<SkillManifest, LoadError> {
        match &unit.source {
            UnitSource::Inline(manifest) => Ok(manifest.clone()),
            UnitSource::File(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| LoadError::plugin(&unit.name, e))?;
                serde_json::from_str(&content).map_err(|e| LoadError::plugin(&unit.name, e))
            }
        }
    }
}

/// Normalize a skill's phrases, dropping empty ones.
///
/// # Errors
///
/// Returns a contract violation if no usable phrase remains.
pub fn validate_phrases(unit: &str, phrases: &[String]) -> Result<Vec<String>, LoadError> {
    let normalized: Vec<String> = phrases
        .iter()
        .filter_map(|phrase| {
            let phrase = normalize(phrase);
            if phrase.is_empty() {
                warn!(unit, "ignoring empty trigger phrase");
                None
            } else {
                Some(phrase)
            }
        })
        .collect();

    if normalized.is_empty() {
        return Err(LoadError::contract(unit, "missing intent phrases"));
    }
    Ok(normalized)
}
