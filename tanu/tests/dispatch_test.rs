//! End-to-end dispatch behaviour: loading from a plugin directory, matching,
//! overwrite semantics, and fault containment.

use serde_json::{Value, json};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tanu::prelude::*;

/// Skill that records every text it receives and answers with a fixed reply.
struct Stub {
    name: String,
    phrases: Vec<String>,
    reply: Option<String>,
    fail: bool,
    seen: Arc<Mutex<Vec<String>>>,
}

impl Skill for Stub {
    fn name(&self) -> &str {
        &self.name
    }

    fn intent_phrases(&self) -> &[String] {
        &self.phrases
    }

    fn handle_intent(&self, text: &str) -> SkillResult<HandlerResult> {
        self.seen.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(SkillError::new(format!("{} is broken", self.name)));
        }
        Ok(HandlerResult::Handled(self.reply.clone()))
    }
}

#[derive(Default, Clone)]
struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// Factory building a [`Stub`] from `{ name, phrases, reply, fail }`.
fn stub_factories(calls: &Calls) -> FactoryRegistry {
    let seen = Arc::clone(&calls.0);
    FactoryRegistry::new()
        .with("stub", move |settings: &Value| {
            Ok(Box::new(Stub {
                name: settings["name"].as_str().unwrap_or("stub").to_string(),
                phrases: serde_json::from_value(settings["phrases"].clone())?,
                reply: settings["reply"].as_str().map(str::to_string),
                fail: settings["fail"].as_bool().unwrap_or(false),
                seen: Arc::clone(&seen),
            }) as BoxedSkill)
        })
        .with("exploding", |_| panic!("factory exploded"))
        .with("refusing", |_| Err(SkillError::new("missing credentials")))
}

fn write_unit(dir: &Path, file: &str, manifest: &Value) {
    std::fs::write(dir.join(file), manifest.to_string()).unwrap();
}

fn stub_unit(name: &str, phrases: &[&str], reply: &str) -> Value {
    json!({
        "factory": "stub",
        "settings": { "name": name, "phrases": phrases, "reply": reply }
    })
}

fn notepad_calculator_agent(calls: &Calls, recorder: &Arc<RecordingObserver>) -> Agent {
    Agent::builder()
        .factories(stub_factories(calls))
        .unit(SkillUnit::inline(
            "a",
            SkillManifest::new("stub").settings(json!({
                "name": "StubA", "phrases": ["open notepad"], "reply": "ok"
            })),
        ))
        .unit(SkillUnit::inline(
            "b",
            SkillManifest::new("stub").settings(json!({
                "name": "StubB", "phrases": ["open calculator"], "reply": "calc"
            })),
        ))
        .observer(Arc::clone(recorder) as SharedObserver)
        .build()
}

#[test]
fn test_match_passes_original_text() {
    let calls = Calls::default();
    let recorder = Arc::new(RecordingObserver::new());
    let agent = notepad_calculator_agent(&calls, &recorder);

    let result = agent.dispatch("please open notepad now");

    assert_eq!(result, HandlerResult::handled("ok"));
    assert_eq!(calls.take(), ["please open notepad now"]);

    let result = agent.dispatch("Please OPEN Calculator");
    assert_eq!(result, HandlerResult::handled("calc"));
    assert_eq!(calls.take(), ["Please OPEN Calculator"]);
}

#[test]
fn test_phrase_longer_than_input_does_not_match() {
    let calls = Calls::default();
    let recorder = Arc::new(RecordingObserver::new());
    let agent = notepad_calculator_agent(&calls, &recorder);

    assert_eq!(agent.dispatch("open"), HandlerResult::NotHandled);
    assert!(calls.take().is_empty());
    assert_eq!(recorder.no_match_count(), 1);
}

#[test]
fn test_no_match_emits_exactly_one_diagnostic() {
    let calls = Calls::default();
    let recorder = Arc::new(RecordingObserver::new());
    let agent = notepad_calculator_agent(&calls, &recorder);

    for (i, input) in ["what time is it", "close notepad", "OPEN SESAME"]
        .into_iter()
        .enumerate()
    {
        assert_eq!(agent.dispatch(input), HandlerResult::NotHandled);
        assert_eq!(recorder.no_match_count(), i + 1);
    }
    assert!(calls.take().is_empty());
}

#[test]
fn test_empty_input_is_silent() {
    let calls = Calls::default();
    let recorder = Arc::new(RecordingObserver::new());
    let agent = notepad_calculator_agent(&calls, &recorder);

    assert_eq!(agent.dispatch(""), HandlerResult::NotHandled);
    assert!(recorder.diagnostics().is_empty());
    assert!(calls.take().is_empty());
}

#[test]
fn test_mixed_case_phrases_match_lowercase_input() {
    let calls = Calls::default();
    let agent = Agent::builder()
        .factories(stub_factories(&calls))
        .unit(SkillUnit::inline(
            "apps",
            SkillManifest::new("stub").settings(json!({
                "phrases": ["Open Notepad"], "reply": "opened"
            })),
        ))
        .build();

    assert_eq!(agent.table().phrases().collect::<Vec<_>>(), ["open notepad"]);
    assert_eq!(
        agent.dispatch("open notepad please"),
        HandlerResult::handled("opened")
    );
}

#[test]
fn test_failing_factories_do_not_stop_loading() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "a_apps.json", &stub_unit("apps", &["open notepad"], "ok"));
    write_unit(dir.path(), "b_exploding.json", &json!({ "factory": "exploding" }));
    write_unit(dir.path(), "c_refusing.json", &json!({ "factory": "refusing" }));
    write_unit(dir.path(), "d_search.json", &stub_unit("search", &["search", "google"], "ok"));

    let calls = Calls::default();
    let agent = Agent::builder()
        .plugin_dir(dir.path())
        .factories(stub_factories(&calls))
        .build();

    let table = agent.table();
    assert_eq!(table.len(), 3);
    assert_eq!(table.count_for_unit("b_exploding"), 0);
    assert_eq!(table.count_for_unit("c_refusing"), 0);
    assert_eq!(table.count_for_unit("d_search"), 2);

    let skipped: Vec<_> = agent.report().skipped().collect();
    assert_eq!(skipped.len(), 2);
    assert!(skipped
        .iter()
        .all(|err| matches!(err, LoadError::Factory { .. })));
    assert!(skipped[0].to_string().contains("factory exploded"));
}

#[test]
fn test_duplicate_phrase_later_unit_wins() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "first.json", &stub_unit("first", &["Send Email"], "first"));
    write_unit(dir.path(), "second.json", &stub_unit("second", &["send email"], "second"));

    let calls = Calls::default();
    let agent = Agent::builder()
        .plugin_dir(dir.path())
        .factories(stub_factories(&calls))
        .build();

    assert_eq!(agent.table().len(), 1);
    assert_eq!(
        agent.dispatch("send email to bob"),
        HandlerResult::handled("second")
    );
}

#[test]
fn test_handler_failure_is_contained() {
    let calls = Calls::default();
    let recorder = Arc::new(RecordingObserver::new());
    let agent = Agent::builder()
        .factories(stub_factories(&calls))
        .unit(SkillUnit::inline(
            "mail",
            SkillManifest::new("stub").settings(json!({
                "name": "mail", "phrases": ["email"], "fail": true
            })),
        ))
        .unit(SkillUnit::inline(
            "apps",
            SkillManifest::new("stub").settings(json!({
                "phrases": ["open notepad"], "reply": "ok"
            })),
        ))
        .observer(Arc::clone(&recorder) as SharedObserver)
        .build();

    let result = agent.dispatch("email alice");
    assert_eq!(result, HandlerResult::Failed("mail is broken".into()));
    assert!(recorder
        .diagnostics()
        .iter()
        .any(|d| matches!(d, Diagnostic::HandlerFailed { skill, .. } if skill == "mail")));

    assert_eq!(agent.dispatch("open notepad"), HandlerResult::handled("ok"));
}

#[test]
fn test_missing_directory_yields_empty_agent() {
    let calls = Calls::default();
    let agent = Agent::builder()
        .plugin_dir("/no/such/skills/directory")
        .factories(stub_factories(&calls))
        .build();

    assert!(agent.table().is_empty());
    assert!(matches!(
        agent.report().diagnostics.as_slice(),
        [Diagnostic::DirectoryMissing { .. }]
    ));
    assert_eq!(agent.dispatch("open notepad"), HandlerResult::NotHandled);
}

#[test]
fn test_short_phrase_registered_first_preempts_longer() {
    let calls = Calls::default();
    let agent = Agent::builder()
        .factories(stub_factories(&calls))
        .unit(SkillUnit::inline(
            "mail",
            SkillManifest::new("stub").settings(json!({
                "phrases": ["mail"], "reply": "short"
            })),
        ))
        .unit(SkillUnit::inline(
            "email",
            SkillManifest::new("stub").settings(json!({
                "phrases": ["send email"], "reply": "long"
            })),
        ))
        .build();

    assert_eq!(
        agent.dispatch("send email to bob"),
        HandlerResult::handled("short")
    );
}

/// Skill that builds fine but panics when asked for its phrases.
struct Unruly;

impl Skill for Unruly {
    fn name(&self) -> &str {
        "unruly"
    }

    fn intent_phrases(&self) -> &[String] {
        panic!("phrases unavailable")
    }

    fn handle_intent(&self, _text: &str) -> SkillResult<HandlerResult> {
        Ok(HandlerResult::done())
    }
}

#[test]
fn test_panicking_phrase_accessor_does_not_stop_loading() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "a_unruly.json", &json!({ "factory": "unruly" }));
    write_unit(dir.path(), "b_apps.json", &stub_unit("apps", &["open notepad"], "ok"));

    let calls = Calls::default();
    let agent = Agent::builder()
        .plugin_dir(dir.path())
        .factories(
            stub_factories(&calls).with("unruly", |_| Ok(Box::new(Unruly) as BoxedSkill)),
        )
        .build();

    assert_eq!(agent.table().count_for_unit("a_unruly"), 0);
    assert_eq!(agent.table().count_for_unit("b_apps"), 1);

    let skipped: Vec<_> = agent.report().skipped().collect();
    assert!(matches!(
        skipped.as_slice(),
        [LoadError::Factory { unit, .. }] if unit == "a_unruly"
    ));
    assert!(skipped[0].to_string().contains("phrases unavailable"));

    assert_eq!(agent.dispatch("open notepad"), HandlerResult::handled("ok"));
}
