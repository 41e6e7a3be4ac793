//! Command-line surface: argument parsing and the interactive prompt.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use sw_app::{CheckOutcome, RegistrationOrchestrator};
use sw_core::registration::{FieldName, Role, UniqueField};
use sw_core::wizard::{Step, WizardSnapshot};
use sw_infra::WizardUpdate;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

#[derive(Debug, Parser)]
#[command(name = "signup-wizard", version, about = "Interactive account onboarding")]
pub struct Cli {
    /// Config file (default: <config dir>/signup-wizard/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Registration backend base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Role to start with
    #[arg(long, value_enum)]
    pub role: Option<RoleArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Buyer,
    Seller,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Buyer => Role::Buyer,
            RoleArg::Seller => Role::Seller,
        }
    }
}

const EDITABLE_FIELDS: [FieldName; 11] = [
    FieldName::FirstName,
    FieldName::LastName,
    FieldName::Email,
    FieldName::Contact,
    FieldName::CompanyName,
    FieldName::StoreName,
    FieldName::RegistrationNumber,
    FieldName::Address,
    FieldName::Password,
    FieldName::ConfirmPassword,
    FieldName::OtpCode,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckTarget {
    Email,
    Contact,
    Registration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { field: FieldName, value: String },
    Toggle(i64),
    Role(Role),
    Check(CheckTarget),
    Next,
    Back,
    Otp(String),
    Resend,
    Retry,
    Dismiss,
    Show,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  set <field> <value>     fields: firstName lastName email contact companyName storeName
                          registrationNumber address password confirmPassword otpCode
  toggle <id>             select/deselect an option
  role <buyer|seller>     switch role (personal/business info only)
  check <email|contact|reg>
  next | back
  otp <code>              enter and submit the verification code
  resend | retry | dismiss | show | help | quit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb {
        "set" => {
            let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field = EDITABLE_FIELDS
                .iter()
                .copied()
                .find(|field| field.as_str() == name)
                .ok_or_else(|| format!("unknown field `{}`", name))?;
            Ok(Command::Set {
                field,
                value: value.trim().to_string(),
            })
        }
        "toggle" => rest
            .parse()
            .map(Command::Toggle)
            .map_err(|_| format!("`{}` is not an option id", rest)),
        "role" => match rest.to_ascii_lowercase().as_str() {
            "buyer" => Ok(Command::Role(Role::Buyer)),
            "seller" => Ok(Command::Role(Role::Seller)),
            other => Err(format!("unknown role `{}`", other)),
        },
        "check" => match rest {
            "email" => Ok(Command::Check(CheckTarget::Email)),
            "contact" => Ok(Command::Check(CheckTarget::Contact)),
            "reg" => Ok(Command::Check(CheckTarget::Registration)),
            other => Err(format!("cannot check `{}`", other)),
        },
        "otp" if !rest.is_empty() => Ok(Command::Otp(rest.to_string())),
        "next" => Ok(Command::Next),
        "back" => Ok(Command::Back),
        "resend" => Ok(Command::Resend),
        "retry" => Ok(Command::Retry),
        "dismiss" => Ok(Command::Dismiss),
        "show" | "" => Ok(Command::Show),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command `{}`; try `help`", other)),
    }
}

fn step_title(step: Step) -> &'static str {
    match step {
        Step::PersonalInfo => "Personal information",
        Step::BusinessInfo => "Business information",
        Step::Credentials => "Password",
        Step::Verification => "Verify your email",
    }
}

pub fn render(snapshot: &WizardSnapshot) -> String {
    let mut out = Vec::new();
    if snapshot.completed {
        out.push("Registration complete. You can now sign in.".to_string());
        return out.join("\n");
    }

    out.push(format!(
        "[{}/4] {} ({})",
        snapshot.step.position(),
        step_title(snapshot.step),
        snapshot.draft.role()
    ));
    if let Some(banner) = &snapshot.banner {
        out.push(format!("  ! {}", banner));
    }
    for (field, message) in snapshot.field_errors.iter() {
        out.push(format!("  {}: {}", field, message));
    }
    if snapshot.step == Step::BusinessInfo {
        let selected = snapshot.draft.business.selected_options();
        for option in &snapshot.options {
            let mark = if selected.contains(&option.id) { "x" } else { " " };
            out.push(format!("  [{}] {} {}", mark, option.id, option.name));
        }
    }
    if let Some(otp) = &snapshot.otp {
        if otp.can_resend() {
            out.push("  You can request a new code (`resend`).".to_string());
        } else {
            out.push(format!("  Resend available in {}s", otp.seconds_remaining()));
        }
        if let Some(message) = otp.last_resend_message() {
            out.push(format!("  {}", message));
        }
    }
    out.join("\n")
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run_interactive(
    orchestrator: Arc<RegistrationOrchestrator>,
    updates: UnboundedReceiver<WizardUpdate>,
) -> anyhow::Result<()> {
    let countdown = tokio::spawn(announce_countdown(updates));

    println!("{}", HELP);
    println!("{}", render(&orchestrator.snapshot().await));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if command == Command::Help {
            println!("{}", HELP);
            continue;
        }

        let result = execute(&orchestrator, command).await;
        match result {
            Ok(snapshot) => {
                println!("{}", render(&snapshot));
                if snapshot.completed {
                    break;
                }
            }
            Err(message) => println!("  ! {}", message),
        }
    }

    orchestrator.shutdown().await?;
    countdown.abort();
    Ok(())
}

async fn execute(
    orchestrator: &RegistrationOrchestrator,
    command: Command,
) -> Result<WizardSnapshot, String> {
    let result = match command {
        Command::Set { field, value } => match orchestrator.edit_field(field, value).await {
            // `set` is where a field loses focus, so unique fields are checked here.
            Ok(snapshot) => match UniqueField::for_field(field, snapshot.draft.role()) {
                Some(unique) => {
                    report_check(orchestrator.check_uniqueness(unique).await);
                    Ok(orchestrator.snapshot().await)
                }
                None => Ok(snapshot),
            },
            Err(err) => Err(err),
        },
        Command::Toggle(id) => orchestrator.toggle_option(id).await,
        Command::Role(role) => orchestrator.change_role(role).await,
        Command::Check(target) => {
            let role = orchestrator.snapshot().await.draft.role();
            let field = match target {
                CheckTarget::Email => UniqueField::Email,
                CheckTarget::Contact => UniqueField::Contact,
                CheckTarget::Registration => UniqueField::registration_for(role),
            };
            report_check(orchestrator.check_uniqueness(field).await);
            Ok(orchestrator.snapshot().await)
        }
        Command::Next => orchestrator.next().await,
        Command::Back => orchestrator.back().await,
        Command::Otp(code) => match orchestrator.edit_field(FieldName::OtpCode, code).await {
            Ok(_) => orchestrator.submit_otp().await,
            Err(err) => Err(err),
        },
        Command::Resend => orchestrator.resend_otp().await,
        Command::Retry => orchestrator.retry_options().await,
        Command::Dismiss => orchestrator.dismiss_banner().await,
        Command::Show | Command::Help | Command::Quit => Ok(orchestrator.snapshot().await),
    };
    result.map_err(|err| {
        warn!(error = %err, "command rejected");
        err.to_string()
    })
}

fn report_check(outcome: CheckOutcome) {
    match outcome {
        CheckOutcome::Unknown => println!("  (availability could not be checked)"),
        outcome => debug!(?outcome, "uniqueness check finished"),
    }
}

async fn announce_countdown(mut updates: UnboundedReceiver<WizardUpdate>) {
    while let Some(update) = updates.recv().await {
        if let WizardUpdate::Countdown(otp) = update {
            if otp.can_resend() {
                println!("  You can request a new code (`resend`).");
            } else if otp.seconds_remaining() % 15 == 0 {
                println!("  Resend available in {}s", otp.seconds_remaining());
            }
        }
    }
}
