use std::sync::Arc;

use anyhow::Context;
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atlas::alert::{Alert, CommandAlert, TerminalBell};
use atlas::calendar;
use atlas::config::Config;
use atlas::models::{
    CardioPatch, ExerciseType, GroupData, ReminderData, SetLog, SetPatch, StrengthPatch,
    WaterLog, WaterProgress, WeightLog, WorkoutSession,
};
use atlas::version::GIT_VERSION;
use atlas::{ApiClient, EditorOptions, RestTimer, SessionEditor, TimerState};

#[derive(Debug, Parser)]
#[command(name = "atlas", version = GIT_VERSION, about = "Atlas workout tracker client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and print a token for ATLAS_TOKEN
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ATLAS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the logged in user
    Me,
    /// List sessions grouped by day
    Sessions,
    /// Show one session's exercise log
    Show { id: String },
    /// Log a set on an in-progress session
    AddSet {
        id: String,
        /// Position of the exercise in the session, starting at 0
        exercise: usize,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        reps: Option<u32>,
        #[arg(long)]
        minutes: Option<f64>,
        #[arg(long)]
        distance: Option<f64>,
    },
    /// Finish an in-progress session
    Complete { id: String },
    /// Delete a session
    Delete { id: String },
    /// Show a month of workouts
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Run a rest countdown
    Rest {
        #[arg(long)]
        seconds: Option<u32>,
    },
    /// Workout packages
    #[command(subcommand)]
    Packages(PackageCommand),
    /// Competition groups
    #[command(subcommand)]
    Groups(GroupCommand),
    /// Supplement reminders
    #[command(subcommand)]
    Reminders(ReminderCommand),
    /// Log water and show today's progress
    Water {
        /// Millilitres to add
        ml: Option<u32>,
    },
    /// Log body weight in kg
    Weight { kg: f64 },
    /// Workout totals for the last days
    Stats {
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
}

#[derive(Debug, Subcommand)]
enum PackageCommand {
    List {
        #[arg(long)]
        public: bool,
    },
    Copy { id: String },
    Join { code: String },
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum GroupCommand {
    List,
    Show { id: String },
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Join { invite_code: String },
    Leave { id: String },
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum ReminderCommand {
    List {
        #[arg(long)]
        today: bool,
    },
    /// Daily unless --weekdays or --month-day is given
    Add {
        title: String,
        /// HH:MM
        time: String,
        /// Comma separated, Sunday = 0
        #[arg(long, value_delimiter = ',', conflicts_with = "month_day")]
        weekdays: Vec<u8>,
        #[arg(long)]
        month_day: Option<u8>,
    },
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atlas=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env();
    tracing::debug!("Using API at {}", config.api_url);

    let client = ApiClient::from_config(&config)?;

    match cli.command {
        Command::Login { email, password } => {
            let response = client.login(&email, &password).await?;
            println!("{}", response.access_token);
        }
        Command::Me => {
            let user = client.current_user().await?;
            println!("{} <{}> ({})", user.name, user.email, user.username);
        }
        Command::Sessions => {
            let sessions = client.list_sessions().await?;
            for (day, workouts) in calendar::group_by_day(&sessions) {
                println!("{day}");
                for workout in workouts {
                    let status = if workout.is_completed { "done" } else { "open" };
                    println!(
                        "  {}  {:<24} {:>3} exercises  [{}]",
                        workout.id, workout.package_name, workout.exercise_count, status
                    );
                }
            }
        }
        Command::Show { id } => {
            let session = client.get_session(&id).await?;
            print_session(&session);
        }
        Command::AddSet {
            id,
            exercise,
            weight,
            reps,
            minutes,
            distance,
        } => {
            let store = Arc::new(client);
            let mut editor = SessionEditor::load(store, &id, EditorOptions::live())
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            let exercise_type = editor
                .exercises()
                .get(exercise)
                .map(|log| log.exercise_type())
                .with_context(|| format!("no exercise at position {exercise}"))?;
            let patch: SetPatch = match exercise_type {
                ExerciseType::Strength => StrengthPatch {
                    weight,
                    reps,
                    completed: Some(true),
                }
                .into(),
                ExerciseType::Cardio => CardioPatch {
                    duration_minutes: minutes,
                    distance: distance.map(Some),
                    completed: Some(true),
                    ..Default::default()
                }
                .into(),
            };

            let set = editor
                .add_set(exercise)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            editor
                .update_set(exercise, set, patch)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            editor
                .flush()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Logged set {} of {}", set + 1, editor.exercises()[exercise].exercise_name);
        }
        Command::Complete { id } => {
            let mut editor = SessionEditor::load(Arc::new(client), &id, EditorOptions::live())
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            editor
                .complete()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            print_session(editor.session());
        }
        Command::Delete { id } => {
            let mut editor = SessionEditor::load(Arc::new(client), &id, EditorOptions::deferred())
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            editor
                .delete()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Deleted session {id}");
        }
        Command::Calendar { year, month } => {
            let today = Local::now().date_naive();
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());
            let data = client.calendar_month(year, month).await?;
            for (day, entries) in &data.calendar_data {
                for entry in entries {
                    println!("{day}  {}  {}", entry.id, entry.package_name);
                }
            }
        }
        Command::Rest { seconds } => {
            run_rest_timer(&config, seconds).await?;
        }
        Command::Packages(command) => run_packages(&client, command).await?,
        Command::Groups(command) => run_groups(&client, command).await?,
        Command::Reminders(command) => run_reminders(&client, command).await?,
        Command::Water { ml } => {
            if let Some(ml) = ml {
                client.log_water(WaterLog::new(ml)?).await?;
            }
            let today = Local::now().date_naive().to_string();
            let stats = client.water_stats(1).await?;
            let recommendation = client.water_recommendation().await.ok();
            let progress = WaterProgress::for_day(&stats, recommendation, &today);
            println!(
                "{:.0} / {:.0} ml ({:.0}%)",
                progress.intake_ml,
                progress.goal_ml,
                progress.percent()
            );
        }
        Command::Weight { kg } => {
            client.log_weight(WeightLog::new(kg)?).await?;
            println!("Logged {kg} kg");
        }
        Command::Stats { days } => {
            let stats = client.workout_stats(days).await?;
            println!("last {days} days");
            println!("workouts  {}", stats.total_workouts);
            println!("total     {:.0} min", stats.total_duration_minutes);
            println!("average   {:.0} min", stats.average_duration_minutes);
            for (day, count) in &stats.workouts_by_day {
                println!("  {day}  {count}");
            }
        }
    }

    Ok(())
}

async fn run_packages(client: &ApiClient, command: PackageCommand) -> anyhow::Result<()> {
    match command {
        PackageCommand::List { public } => {
            let packages = if public {
                client.list_public_packages().await?
            } else {
                client.list_packages().await?
            };
            for package in packages {
                println!(
                    "{}  {:<24} {} exercises",
                    package.id,
                    package.name,
                    package.exercises.len()
                );
            }
        }
        PackageCommand::Copy { id } => {
            client.copy_package(&id).await?;
            println!("Copied package {id}");
        }
        PackageCommand::Join { code } => {
            client.join_package(&code).await?;
            println!("Package added");
        }
        PackageCommand::Delete { id } => {
            client.delete_package(&id).await?;
            println!("Deleted package {id}");
        }
    }
    Ok(())
}

async fn run_groups(client: &ApiClient, command: GroupCommand) -> anyhow::Result<()> {
    match command {
        GroupCommand::List => {
            for group in client.list_groups().await? {
                println!(
                    "{}  {:<24} {} members  invite {}",
                    group.id,
                    group.name,
                    group.members.len(),
                    group.invite_code
                );
            }
        }
        GroupCommand::Show { id } => {
            let group = client.get_group(&id).await?;
            println!("{} (invite {})", group.name, group.invite_code);
            if let Some(description) = &group.description {
                println!("{description}");
            }
            for (rank, member) in group.members.iter().enumerate() {
                println!(
                    "{:>3}. {:<20} {} workouts",
                    rank + 1,
                    member.username,
                    member.workout_count
                );
            }
        }
        GroupCommand::Create { name, description } => {
            let group = client.create_group(&GroupData { name, description }).await?;
            println!("Created {} with invite code {}", group.id, group.invite_code);
        }
        GroupCommand::Join { invite_code } => {
            client.join_group(&invite_code).await?;
            println!("Joined group");
        }
        GroupCommand::Leave { id } => {
            client.leave_group(&id).await?;
            println!("Left group {id}");
        }
        GroupCommand::Delete { id } => {
            client.delete_group(&id).await?;
            println!("Deleted group {id}");
        }
    }
    Ok(())
}

async fn run_reminders(client: &ApiClient, command: ReminderCommand) -> anyhow::Result<()> {
    match command {
        ReminderCommand::List { today } => {
            let reminders = if today {
                client.todays_reminders().await?
            } else {
                client.list_reminders().await?
            };
            for reminder in reminders {
                let mark = match reminder.completed {
                    Some(true) => "[x] ",
                    Some(false) => "[ ] ",
                    None => "",
                };
                println!(
                    "{}  {mark}{} {} ({})",
                    reminder.id,
                    reminder.time,
                    reminder.title,
                    reminder.frequency.as_str()
                );
            }
        }
        ReminderCommand::Add {
            title,
            time,
            weekdays,
            month_day,
        } => {
            let data = match month_day {
                Some(day) => ReminderData::monthly(&title, &time, day)?,
                None if !weekdays.is_empty() => ReminderData::weekly(&title, &time, &weekdays)?,
                None => ReminderData::daily(&title, &time)?,
            };
            let reminder = client.create_reminder(&data).await?;
            println!("Created reminder {}", reminder.id);
        }
        ReminderCommand::Delete { id } => {
            client.delete_reminder(&id).await?;
            println!("Deleted reminder {id}");
        }
    }
    Ok(())
}

fn print_session(session: &WorkoutSession) {
    let status = if session.is_completed { "completed" } else { "in progress" };
    println!("{} ({})", session.package_name, status);
    println!("started {}", session.start_time.with_timezone(&Local));
    if let Some(minutes) = session.duration_minutes {
        println!("duration {minutes:.0} min");
    }
    if let Some(calories) = session.total_calories {
        println!("calories {calories:.0} kcal");
    }

    for (index, exercise) in session.exercises.iter().enumerate() {
        println!(
            "[{index}] {} ({})",
            exercise.exercise_name,
            exercise.exercise_type().as_str()
        );
        match &exercise.sets {
            SetLog::Strength(sets) => {
                for set in sets {
                    let mark = if set.completed { "x" } else { " " };
                    println!(
                        "    [{mark}] #{} {} kg x {}",
                        set.set_number, set.weight, set.reps
                    );
                }
            }
            SetLog::Cardio(sets) => {
                for set in sets {
                    let mark = if set.completed { "x" } else { " " };
                    let distance = set
                        .distance
                        .map(|d| format!(" {d} km"))
                        .unwrap_or_default();
                    println!("    [{mark}] {} min{distance}", set.duration_minutes);
                }
            }
        }
    }
}

async fn run_rest_timer(config: &Config, seconds: Option<u32>) -> anyhow::Result<()> {
    let alert: Arc<dyn Alert> = match &config.alert_command {
        Some(command) => Arc::new(CommandAlert::parse(command)?),
        None => Arc::new(TerminalBell),
    };

    let timer = RestTimer::new(config.rest_seconds, alert);
    let mut updates = timer.subscribe();
    timer.start(seconds);

    loop {
        let snapshot = *updates.borrow_and_update();
        eprint!("\rrest {:>3}s ", snapshot.time_left);
        if snapshot.state == TimerState::Expired {
            eprintln!();
            println!("Rest over");
            return Ok(());
        }

        tokio::select! {
            changed = updates.changed() => changed?,
            _ = tokio::signal::ctrl_c() => {
                timer.reset(None);
                eprintln!();
                return Ok(());
            }
        }
    }
}
