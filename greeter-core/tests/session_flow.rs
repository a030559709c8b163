//! End-to-end session scenarios driven by a scripted console and a fake weather provider.

use std::{
    collections::{HashMap, VecDeque},
    io,
    sync::Mutex,
};

use async_trait::async_trait;
use greeter_core::{
    Console, FileProfileStore, MemoryProfileStore, ProfileKey, ProfileStore, Question,
    SessionController, SessionState, StoreError, UserProfile, WeatherError, WeatherProvider,
    WeatherReport,
};

#[derive(Debug, Default)]
struct ScriptedConsole {
    answers: VecDeque<Option<String>>,
    choices: VecDeque<Option<String>>,
    asked: Vec<Question>,
    output: Vec<String>,
}

impl ScriptedConsole {
    fn new(answers: &[&str], choices: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| Some(a.to_string())).collect(),
            choices: choices.iter().map(|c| Some(c.to_string())).collect(),
            ..Self::default()
        }
    }

    fn printed(&self) -> String {
        self.output.join("\n")
    }
}

impl Console for ScriptedConsole {
    fn ask(&mut self, question: Question) -> anyhow::Result<Option<String>> {
        self.asked.push(question);
        Ok(self.answers.pop_front().flatten())
    }

    fn menu_choice(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.choices.pop_front().flatten())
    }

    fn welcome(&mut self, profile: &UserProfile) {
        self.output.push(format!("welcome {}", profile.username()));
    }

    fn welcome_back(&mut self, profile: &UserProfile) {
        self.output.push(format!(
            "welcome back {} from {}",
            profile.username(),
            profile.preferred_city()
        ));
    }

    fn show_menu(&mut self) {
        self.output.push("menu".into());
    }

    fn show_weather(&mut self, report: &WeatherReport) {
        self.output.push(report.to_string());
    }

    fn show_weather_error(&mut self, error: &WeatherError) {
        self.output.push(format!("Weather error: {error}"));
    }

    fn show_profile(&mut self, profile: &UserProfile) {
        self.output.push(profile.to_string());
    }

    fn notice(&mut self, message: &str) {
        self.output.push(format!("notice: {message}"));
    }
}

#[derive(Debug, Default)]
struct FakeWeather {
    reports: HashMap<String, WeatherReport>,
    requested: Mutex<Vec<String>>,
}

impl FakeWeather {
    fn with_lima() -> Self {
        let mut reports = HashMap::new();
        reports.insert(
            "Lima".to_string(),
            WeatherReport {
                location_name: "Lima".into(),
                country: "Peru".into(),
                temperature_c: 24.0,
                temperature_f: 75.2,
                condition: "Sunny".into(),
                wind_kph: 13.0,
                observation_time: None,
            },
        );
        Self {
            reports,
            ..Self::default()
        }
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        self.requested
            .lock()
            .expect("lock poisoned")
            .push(city.to_string());

        self.reports
            .get(city)
            .cloned()
            .ok_or_else(|| WeatherError::Status {
                status: 400,
                message: "No matching location found.".into(),
            })
    }
}

/// Store that accepts reads but refuses every write.
#[derive(Debug)]
struct ReadOnlyStore(MemoryProfileStore);

impl ProfileStore for ReadOnlyStore {
    fn get(&self, key: ProfileKey) -> Result<Option<String>, StoreError> {
        self.0.get(key)
    }

    fn set(&mut self, _key: ProfileKey, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Write {
            path: "config/user-profile-config.toml".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        })
    }
}

fn returning(username: &str, city: &str) -> MemoryProfileStore {
    MemoryProfileStore::new()
        .with(ProfileKey::Username, username)
        .with(ProfileKey::PreferredCity, city)
}

#[tokio::test]
async fn first_run_setup_then_view_profile() {
    let console = ScriptedConsole::new(&["sam", "Lima"], &["4", "5"]);
    let mut session = SessionController::new(MemoryProfileStore::new(), FakeWeather::default(), console);

    let summary = session.run().await.unwrap();

    assert_eq!(summary.final_state, SessionState::Terminated);
    assert_eq!(summary.menu_iterations, 2);
    assert_eq!(
        session.console().asked,
        vec![Question::Username, Question::PreferredCity]
    );

    let printed = session.console().printed();
    assert!(printed.contains("welcome sam"));
    assert!(printed.contains("sam"));
    assert!(printed.contains("Lima"));

    let store = session.store();
    assert_eq!(store.get(ProfileKey::Username).unwrap().as_deref(), Some("sam"));
    assert_eq!(store.get(ProfileKey::PreferredCity).unwrap().as_deref(), Some("Lima"));
}

#[tokio::test]
async fn returning_user_is_never_prompted_for_setup() {
    let console = ScriptedConsole::new(&[], &["5"]);
    let mut session = SessionController::new(returning("bob", "Rome"), FakeWeather::default(), console);

    let summary = session.run().await.unwrap();

    assert_eq!(summary.final_state, SessionState::Terminated);
    assert!(session.console().asked.is_empty());
    assert!(session.console().printed().contains("welcome back bob from Rome"));
    assert_eq!(summary.profile.map(|p| p.username().to_string()), Some("bob".into()));
}

#[tokio::test]
async fn missing_city_triggers_full_setup() {
    let store = MemoryProfileStore::new().with(ProfileKey::Username, "bob");
    let console = ScriptedConsole::new(&["alice", "Paris"], &["5"]);
    let mut session = SessionController::new(store, FakeWeather::default(), console);

    session.run().await.unwrap();

    assert_eq!(
        session.console().asked,
        vec![Question::Username, Question::PreferredCity]
    );
    assert_eq!(
        session.store().get(ProfileKey::Username).unwrap().as_deref(),
        Some("alice")
    );
}

#[tokio::test]
async fn abandoned_setup_terminates_without_profile() {
    let console = ScriptedConsole::new(&["sam"], &["4"]);
    let mut session = SessionController::new(MemoryProfileStore::new(), FakeWeather::default(), console);

    let summary = session.run().await.unwrap();

    assert_eq!(summary.final_state, SessionState::Terminated);
    assert_eq!(summary.menu_iterations, 0);
    assert_eq!(summary.profile, None);
    assert_eq!(session.store().get(ProfileKey::Username).unwrap(), None);
    assert!(!session.console().printed().contains("menu"));
}

#[tokio::test]
async fn setup_reprompts_until_answers_are_valid() {
    let console = ScriptedConsole::new(&["   ", " sam ", "L1ma", "", "Lima"], &["5"]);
    let mut session = SessionController::new(MemoryProfileStore::new(), FakeWeather::default(), console);

    session.run().await.unwrap();

    let printed = session.console().printed();
    assert!(printed.contains("notice: username cannot be empty"));
    assert!(printed.contains("notice: city must not contain numbers"));
    assert!(printed.contains("notice: city cannot be empty"));

    let profile = session.profile().expect("profile created");
    assert_eq!(profile.username(), "sam");
    assert_eq!(profile.preferred_city(), "Lima");
}

#[tokio::test]
async fn weather_is_fetched_for_preferred_city() {
    let console = ScriptedConsole::new(&[], &["1", "5"]);
    let mut session = SessionController::new(returning("bob", "Lima"), FakeWeather::with_lima(), console);

    session.run().await.unwrap();

    assert!(session.console().printed().contains("Lima, Peru"));
}

#[tokio::test]
async fn weather_error_is_shown_and_menu_continues() {
    let console = ScriptedConsole::new(&[], &["1", "4", "5"]);
    let mut session = SessionController::new(returning("bob", "Zzzzz"), FakeWeather::default(), console);

    let summary = session.run().await.unwrap();

    let printed = session.console().printed();
    assert!(printed.contains("Weather error:"));
    assert!(printed.contains("No matching location found."));
    // The profile view after the failure proves the loop was re-entered.
    assert!(printed.contains("Preferred city: Zzzzz"));
    assert_eq!(summary.menu_iterations, 3);
}

#[tokio::test]
async fn unrecognized_option_is_a_silent_noop() {
    let console = ScriptedConsole::new(&[], &["9", "5"]);
    let mut session = SessionController::new(returning("bob", "Rome"), FakeWeather::default(), console);

    let summary = session.run().await.unwrap();

    assert_eq!(summary.menu_iterations, 2);
    assert_eq!(summary.final_state, SessionState::Terminated);
    assert!(!session.console().printed().contains("notice"));
}

#[tokio::test]
async fn change_username_and_city_write_through() {
    let console = ScriptedConsole::new(&["carol", "Paris9", " Oslo "], &["2", "3", "5"]);
    let mut session = SessionController::new(returning("bob", "Rome"), FakeWeather::default(), console);

    session.run().await.unwrap();

    assert_eq!(
        session.console().asked,
        vec![Question::NewUsername, Question::NewCity, Question::NewCity]
    );
    assert!(session.console().printed().contains("notice: city must not contain numbers"));

    let store = session.store();
    assert_eq!(store.get(ProfileKey::Username).unwrap().as_deref(), Some("carol"));
    assert_eq!(store.get(ProfileKey::PreferredCity).unwrap().as_deref(), Some("Oslo"));
    assert_eq!(UserProfile::load(store).unwrap().as_ref(), session.profile());
}

#[tokio::test]
async fn cancelled_change_leaves_profile_untouched() {
    let mut console = ScriptedConsole::new(&[], &["2", "5"]);
    console.answers.push_back(None);
    let mut session = SessionController::new(returning("bob", "Rome"), FakeWeather::default(), console);

    let summary = session.run().await.unwrap();

    assert_eq!(summary.final_state, SessionState::Terminated);
    assert_eq!(session.profile().map(UserProfile::username), Some("bob"));
}

#[tokio::test]
async fn failed_write_is_reported_and_memory_keeps_old_value() {
    let store = ReadOnlyStore(returning("bob", "Rome"));
    let console = ScriptedConsole::new(&["Oslo"], &["3", "4", "5"]);
    let mut session = SessionController::new(store, FakeWeather::default(), console);

    let summary = session.run().await.unwrap();

    let printed = session.console().printed();
    assert!(printed.contains("notice: Could not save city"));
    assert!(printed.contains("Preferred city: Rome"));
    assert_eq!(summary.final_state, SessionState::Terminated);
}

#[tokio::test]
async fn failed_save_during_setup_ends_session_without_menu() {
    let store = ReadOnlyStore(MemoryProfileStore::new());
    let console = ScriptedConsole::new(&["sam", "Lima"], &["4", "5"]);
    let mut session = SessionController::new(store, FakeWeather::default(), console);

    let summary = session.run().await.unwrap();

    assert_eq!(summary.final_state, SessionState::Terminated);
    assert_eq!(summary.menu_iterations, 0);
    assert_eq!(summary.profile, None);

    let printed = session.console().printed();
    assert!(printed.contains("notice: Could not save your profile"));
    assert!(!printed.contains("welcome sam"));
    assert!(!printed.contains("menu"));
}

#[tokio::test]
async fn padded_menu_answer_is_not_an_option() {
    let console = ScriptedConsole::new(&[], &[" 4 ", "5"]);
    let mut session = SessionController::new(returning("bob", "Rome"), FakeWeather::default(), console);

    let summary = session.run().await.unwrap();

    assert_eq!(summary.menu_iterations, 2);
    assert!(!session.console().printed().contains("Preferred city"));
}

#[tokio::test]
async fn cancelled_menu_prompt_ends_session() {
    let console = ScriptedConsole::new(&[], &[]);
    let mut session = SessionController::new(returning("bob", "Rome"), FakeWeather::default(), console);

    let summary = session.run().await.unwrap();

    assert_eq!(summary.final_state, SessionState::Terminated);
    assert_eq!(summary.menu_iterations, 1);
}

#[tokio::test]
async fn profile_survives_restart_on_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = FileProfileStore::default_path(dir.path());

    let store = FileProfileStore::initialize(&path).unwrap();
    let console = ScriptedConsole::new(&["sam", "Lima"], &["5"]);
    SessionController::new(store, FakeWeather::default(), console)
        .run()
        .await
        .unwrap();

    let store = FileProfileStore::initialize(&path).unwrap();
    let console = ScriptedConsole::new(&[], &["5"]);
    let mut session = SessionController::new(store, FakeWeather::default(), console);
    session.run().await.unwrap();

    assert!(session.console().asked.is_empty());
    assert!(session.console().printed().contains("welcome back sam from Lima"));
}
