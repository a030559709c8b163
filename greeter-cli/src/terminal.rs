use colored::Colorize;
use greeter_core::{
    Console, Question, UserProfile, ValidationError, WeatherError, WeatherReport,
};
use inquire::{CustomUserError, InquireError, Text, validator::Validation};

const BANNER: &str = r"
  ____ _     ___  __        __         _   _
 / ___| |   |_ _| \ \      / /__  __ _| |_| |__   ___ _ __
| |   | |    | |   \ \ /\ / / _ \/ _` | __| '_ \ / _ \ '__|
| |___| |___ | |    \ V  V /  __/ (_| | |_| | | |  __/ |
 \____|_____|___|    \_/\_/ \___|\__,_|\__|_| |_|\___|_|
";

const MENU_ITEMS: [&str; 5] = [
    "1) View weather",
    "2) Change username",
    "3) Change preferred city",
    "4) Profile",
    "5) Exit",
];

/// Interactive console on stdin/stdout.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }
}

fn invalid_message(err: ValidationError) -> &'static str {
    match err {
        ValidationError::EmptyUsername => "The username cannot be empty!",
        ValidationError::CityHasDigits => "The city name must not contain numbers!",
        ValidationError::EmptyCity => "The city name cannot be empty!",
    }
}

/// Esc and Ctrl-C count as cancelling the prompt rather than as failures.
fn cancelled_as_none(result: Result<String, InquireError>) -> anyhow::Result<Option<String>> {
    match result {
        Ok(answer) => Ok(Some(answer)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

impl Console for TerminalConsole {
    fn ask(&mut self, question: Question) -> anyhow::Result<Option<String>> {
        let answer = Text::new(question.message())
            .with_validator(move |input: &str| -> Result<Validation, CustomUserError> {
                Ok(match question.validate(input) {
                    Ok(()) => Validation::Valid,
                    Err(err) => Validation::Invalid(invalid_message(err).into()),
                })
            })
            .prompt();

        cancelled_as_none(answer)
    }

    fn menu_choice(&mut self) -> anyhow::Result<Option<String>> {
        cancelled_as_none(Text::new("Select an option:").prompt())
    }

    fn welcome(&mut self, profile: &UserProfile) {
        println!("{}", format!("✔ Welcome, {}", profile.username()).green());
    }

    fn welcome_back(&mut self, profile: &UserProfile) {
        println!(
            "{}",
            format!(
                "Welcome back, {} from {}",
                profile.username(),
                profile.preferred_city()
            )
            .green()
        );
    }

    fn show_menu(&mut self) {
        println!("{}", BANNER.cyan());
        for item in MENU_ITEMS {
            println!("{}", item.white());
        }
    }

    fn show_weather(&mut self, report: &WeatherReport) {
        println!("\n{report}\n");
    }

    fn show_weather_error(&mut self, error: &WeatherError) {
        eprintln!("{}", format!("Weather error: {error}").red());
    }

    fn show_profile(&mut self, profile: &UserProfile) {
        println!("\n{profile}\n");
    }

    fn notice(&mut self, message: &str) {
        eprintln!("{}", message.yellow());
    }
}
