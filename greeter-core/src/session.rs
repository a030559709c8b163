//! Interactive session: first-run setup or welcome back, then the menu loop.
//!
//! State changes go through [`transition`], a pure function, so the flow can
//! be checked without any terminal. [`SessionController`] performs the side
//! effects for each state and feeds the resulting [`SessionEvent`] back in.

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::{
    model::WeatherReport,
    profile::UserProfile,
    provider::{WeatherError, WeatherProvider},
    store::ProfileStore,
    validate::{self, ValidationError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Bootstrap,
    FirstRunSetup,
    ReturningUser,
    MenuLoop,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ViewWeather,
    ChangeUsername,
    ChangeCity,
    ViewProfile,
    Exit,
    /// Anything else; the loop carries on without feedback.
    Unrecognized,
}

impl MenuAction {
    /// Answers are compared exactly; `" 4"` is not option 4.
    pub fn parse(input: &str) -> Self {
        match input {
            "1" => MenuAction::ViewWeather,
            "2" => MenuAction::ChangeUsername,
            "3" => MenuAction::ChangeCity,
            "4" => MenuAction::ViewProfile,
            "5" => MenuAction::Exit,
            _ => MenuAction::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Both profile keys were found in the store.
    ProfileLoaded,
    /// At least one profile key is missing.
    ProfileMissing,
    SetupCompleted,
    SetupAbandoned,
    WelcomedBack,
    MenuSelected(MenuAction),
}

/// Next state for `event` in `state`. Events that don't apply leave the state as is.
pub fn transition(state: SessionState, event: SessionEvent) -> SessionState {
    use SessionEvent as E;
    use SessionState as S;

    match (state, event) {
        (S::Bootstrap, E::ProfileLoaded) => S::ReturningUser,
        (S::Bootstrap, E::ProfileMissing) => S::FirstRunSetup,
        (S::FirstRunSetup, E::SetupCompleted) => S::MenuLoop,
        (S::FirstRunSetup, E::SetupAbandoned) => S::Terminated,
        (S::ReturningUser, E::WelcomedBack) => S::MenuLoop,
        (S::MenuLoop, E::MenuSelected(MenuAction::Exit)) => S::Terminated,
        (S::MenuLoop, E::MenuSelected(_)) => S::MenuLoop,
        (state, _) => state,
    }
}

/// A value the session asks the user for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    Username,
    PreferredCity,
    NewUsername,
    NewCity,
}

impl Question {
    pub fn message(&self) -> &'static str {
        match self {
            Question::Username => "Enter your username:",
            Question::PreferredCity => "Enter your preferred city:",
            Question::NewUsername => "Enter a new username:",
            Question::NewCity => "Enter a new city:",
        }
    }

    pub fn validate(&self, input: &str) -> Result<(), ValidationError> {
        match self {
            Question::Username | Question::NewUsername => validate::validate_username(input),
            Question::PreferredCity | Question::NewCity => validate::validate_city(input),
        }
    }
}

/// Presentation seam. Implemented by the terminal UI and by scripted consoles in tests.
pub trait Console {
    /// Ask `question`. `Ok(None)` means the user cancelled the prompt.
    fn ask(&mut self, question: Question) -> Result<Option<String>>;

    /// Raw menu answer. `Ok(None)` means the user cancelled the prompt.
    fn menu_choice(&mut self) -> Result<Option<String>>;

    fn welcome(&mut self, profile: &UserProfile);
    fn welcome_back(&mut self, profile: &UserProfile);
    fn show_menu(&mut self);
    fn show_weather(&mut self, report: &WeatherReport);
    fn show_weather_error(&mut self, error: &WeatherError);
    fn show_profile(&mut self, profile: &UserProfile);
    fn notice(&mut self, message: &str);
}

/// Outcome of [`SessionController::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub final_state: SessionState,
    pub menu_iterations: usize,
    pub profile: Option<UserProfile>,
}

#[derive(Debug)]
pub struct SessionController<S, W, C> {
    store: S,
    weather: W,
    console: C,
    state: SessionState,
    profile: Option<UserProfile>,
}

impl<S, W, C> SessionController<S, W, C>
where
    S: ProfileStore,
    W: WeatherProvider,
    C: Console,
{
    pub fn new(store: S, weather: W, console: C) -> Self {
        Self {
            store,
            weather,
            console,
            state: SessionState::Bootstrap,
            profile: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Drive the session until it terminates.
    ///
    /// Only console I/O failures and store read failures escape; invalid input,
    /// fetch errors and write failures during menu actions are handled in place.
    pub async fn run(&mut self) -> Result<SessionSummary> {
        let mut menu_iterations = 0;

        while self.state != SessionState::Terminated {
            let event = match self.state {
                SessionState::Bootstrap => self.bootstrap()?,
                SessionState::FirstRunSetup => self.first_run_setup()?,
                SessionState::ReturningUser => self.returning_user(),
                SessionState::MenuLoop => {
                    menu_iterations += 1;
                    self.menu_iteration().await?
                }
                SessionState::Terminated => break,
            };

            self.apply(event);
        }

        info!(menu_iterations, "session terminated");

        Ok(SessionSummary {
            final_state: self.state,
            menu_iterations,
            profile: self.profile.clone(),
        })
    }

    fn apply(&mut self, event: SessionEvent) {
        let next = transition(self.state, event);
        debug!(from = ?self.state, to = ?next, ?event, "session transition");
        self.state = next;
    }

    fn bootstrap(&mut self) -> Result<SessionEvent> {
        let loaded = UserProfile::load(&self.store).context("Failed to read stored profile")?;

        Ok(match loaded {
            Some(profile) => {
                self.profile = Some(profile);
                SessionEvent::ProfileLoaded
            }
            None => SessionEvent::ProfileMissing,
        })
    }

    fn first_run_setup(&mut self) -> Result<SessionEvent> {
        let Some(username) = ask_valid(&mut self.console, Question::Username)? else {
            return Ok(SessionEvent::SetupAbandoned);
        };
        let Some(city) = ask_valid(&mut self.console, Question::PreferredCity)? else {
            return Ok(SessionEvent::SetupAbandoned);
        };

        match UserProfile::create(&mut self.store, username, city) {
            Ok(profile) => {
                self.console.welcome(&profile);
                self.profile = Some(profile);
                Ok(SessionEvent::SetupCompleted)
            }
            Err(err) => {
                error!(error = %err, "failed to save new profile");
                self.console.notice(&format!("Could not save your profile: {err}"));
                Ok(SessionEvent::SetupAbandoned)
            }
        }
    }

    fn returning_user(&mut self) -> SessionEvent {
        if let Some(profile) = &self.profile {
            self.console.welcome_back(profile);
        }
        SessionEvent::WelcomedBack
    }

    async fn menu_iteration(&mut self) -> Result<SessionEvent> {
        self.console.show_menu();

        let action = match self.console.menu_choice()? {
            Some(choice) => MenuAction::parse(&choice),
            None => MenuAction::Exit,
        };

        self.perform(action).await?;
        Ok(SessionEvent::MenuSelected(action))
    }

    async fn perform(&mut self, action: MenuAction) -> Result<()> {
        let profile = self
            .profile
            .as_mut()
            .context("Menu reached without a profile")?;

        match action {
            MenuAction::ViewWeather => match self.weather.current(profile.preferred_city()).await {
                Ok(report) => self.console.show_weather(&report),
                Err(err) => {
                    warn!(city = profile.preferred_city(), error = %err, "weather fetch failed");
                    self.console.show_weather_error(&err);
                }
            },
            MenuAction::ChangeUsername => {
                if let Some(username) = ask_valid(&mut self.console, Question::NewUsername)? {
                    if let Err(err) = profile.set_username(&mut self.store, username) {
                        error!(error = %err, "failed to save username");
                        self.console.notice(&format!("Could not save username: {err}"));
                    }
                }
            }
            MenuAction::ChangeCity => {
                if let Some(city) = ask_valid(&mut self.console, Question::NewCity)? {
                    if let Err(err) = profile.set_preferred_city(&mut self.store, city) {
                        error!(error = %err, "failed to save preferred city");
                        self.console.notice(&format!("Could not save city: {err}"));
                    }
                }
            }
            MenuAction::ViewProfile => self.console.show_profile(profile),
            MenuAction::Exit | MenuAction::Unrecognized => {}
        }

        Ok(())
    }
}

/// Ask until the answer passes the question's validator, then return it trimmed.
fn ask_valid<C: Console>(console: &mut C, question: Question) -> Result<Option<String>> {
    loop {
        let Some(answer) = console.ask(question)? else {
            return Ok(None);
        };

        match question.validate(&answer) {
            Ok(()) => return Ok(Some(validate::normalize(&answer))),
            Err(err) => {
                debug!(?question, %err, "rejected answer");
                console.notice(&err.to_string());
            }
        }
    }
}
