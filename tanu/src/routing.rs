//! Phrase-to-skill routing table.

use crate::skill::Skill;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Normalize a trigger phrase or an utterance for matching.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// One routing entry: a normalized phrase bound to a skill.
#[derive(Clone)]
pub struct Route {
    phrase: String,
    unit: String,
    skill_name: String,
    skill: Arc<dyn Skill>,
}

impl Route {
    /// The normalized trigger phrase.
    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Name of the plugin unit that registered this route.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Name the skill reported when it was loaded.
    #[must_use]
    pub fn skill_name(&self) -> &str {
        &self.skill_name
    }

    /// The bound skill.
    #[must_use]
    pub fn skill(&self) -> &Arc<dyn Skill> {
        &self.skill
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("phrase", &self.phrase)
            .field("unit", &self.unit)
            .field("skill", &self.skill_name)
            .finish()
    }
}

/// Mapping from normalized trigger phrase to bound skill.
///
/// Phrases are unique. Re-registering a phrase replaces its skill but keeps
/// the phrase's original position, and that position is the match priority.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    routes: Vec<Route>,
    index: HashMap<String, usize>,
}

impl RoutingTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `phrase` to `skill`, normalizing the phrase first. `skill_name`
    /// is stored alongside so reporting never has to call back into the skill.
    ///
    /// Returns the unit that previously owned the phrase, if it was
    /// overwritten. Empty phrases are ignored and return `None`.
    pub fn insert(
        &mut self,
        phrase: &str,
        unit: impl Into<String>,
        skill_name: impl Into<String>,
        skill: Arc<dyn Skill>,
    ) -> Option<String> {
        let phrase = normalize(phrase);
        if phrase.is_empty() {
            return None;
        }
        let route = Route {
            phrase,
            unit: unit.into(),
            skill_name: skill_name.into(),
            skill,
        };

        if let Some(&slot) = self.index.get(&route.phrase) {
            let previous = std::mem::replace(&mut self.routes[slot], route);
            Some(previous.unit)
        } else {
            self.index.insert(route.phrase.clone(), self.routes.len());
            self.routes.push(route);
            None
        }
    }

    /// First route, in table order, whose phrase occurs in `normalized`.
    #[must_use]
    pub fn find(&self, normalized: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|route| normalized.contains(route.phrase.as_str()))
    }

    /// Exact lookup by phrase (normalized before lookup).
    #[must_use]
    pub fn get(&self, phrase: &str) -> Option<&Route> {
        self.index
            .get(&normalize(phrase))
            .map(|&slot| &self.routes[slot])
    }

    /// Iterate routes in match-priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Phrases in match-priority order.
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|route| route.phrase.as_str())
    }

    /// Number of distinct phrases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Number of routes registered by `unit`.
    #[must_use]
    pub fn count_for_unit(&self, unit: &str) -> usize {
        self.routes.iter().filter(|route| route.unit == unit).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkillResult;
    use crate::skill::HandlerResult;

    struct Named(&'static str);

    impl Skill for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn intent_phrases(&self) -> &[String] {
            &[]
        }

        fn handle_intent(&self, _text: &str) -> SkillResult<HandlerResult> {
            Ok(HandlerResult::handled(self.0))
        }
    }

    fn skill(name: &'static str) -> Arc<dyn Skill> {
        Arc::new(Named(name))
    }

    #[test]
    fn test_insert_normalizes() {
        let mut table = RoutingTable::new();
        table.insert("Open Notepad", "a", "a", skill("a"));
        assert_eq!(table.phrases().collect::<Vec<_>>(), ["open notepad"]);
        assert!(table.get("OPEN NOTEPAD").is_some());
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut table = RoutingTable::new();
        table.insert("email", "first", "first", skill("first"));
        table.insert("search", "web", "web", skill("web"));
        let previous = table.insert("EMAIL", "second", "second", skill("second"));

        assert_eq!(previous.as_deref(), Some("first"));
        assert_eq!(table.len(), 2);
        assert_eq!(table.phrases().collect::<Vec<_>>(), ["email", "search"]);
        let route = table.get("email").unwrap();
        assert_eq!(route.skill_name(), "second");
        assert_eq!(route.skill().name(), "second");
        assert_eq!(table.count_for_unit("first"), 0);
    }

    #[test]
    fn test_find_first_in_table_order() {
        let mut table = RoutingTable::new();
        table.insert("mail", "short", "short", skill("short"));
        table.insert("send email", "long", "long", skill("long"));

        // "mail" is a substring of "send email" and was registered first.
        let route = table.find("send email to bob").unwrap();
        assert_eq!(route.unit(), "short");
        assert!(table.find("nothing here").is_none());
    }

    #[test]
    fn test_empty_phrase_ignored() {
        let mut table = RoutingTable::new();
        assert!(table.insert("", "a", "a", skill("a")).is_none());
        assert!(table.is_empty());
    }
}
