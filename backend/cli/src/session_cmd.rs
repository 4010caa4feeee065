//! `petpal session`: interactive sidekick.
//!
//! The scheduler runs in the background; stdin lines become commands and
//! notifications are printed as they arrive.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::error;

use petpal_config::PetPalConfig;
use petpal_core::{Command, Notification, TaskType};
use petpal_sidekick::{Scheduler, Sidekick};
use petpal_vision::{Camera, DirectoryCamera};

use crate::terminal_output::{note_error, note_info, note_success, note_warn, render_pairs, say};

const HELP: &str = "commands: suggest | done [task] | camera on|off | status | help | quit";

#[derive(Debug, PartialEq)]
enum Input {
    Send(Command),
    Status,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

/// Map one line of input to an action. `done` without a task type completes
/// whatever is active.
fn parse_input(line: &str, active: Option<TaskType>) -> Input {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => Input::Empty,
        ["suggest"] => Input::Send(Command::SuggestNow),
        ["done"] => match active {
            Some(task_type) => Input::Send(Command::CompleteTask { task_type }),
            None => Input::Invalid("no task to complete yet, try 'suggest'".into()),
        },
        ["done", name] => match TaskType::parse(name) {
            Some(task_type) => Input::Send(Command::CompleteTask { task_type }),
            None => Input::Invalid(format!("unknown task '{name}'")),
        },
        ["camera", "on"] => Input::Send(Command::StartCamera),
        ["camera", "off"] => Input::Send(Command::StopCamera),
        ["status"] => Input::Status,
        ["help"] => Input::Help,
        ["quit"] | ["exit"] => Input::Quit,
        _ => Input::Invalid(format!("unrecognized '{}'", line.trim())),
    }
}

fn print_notification(note: &Notification) {
    match note {
        Notification::MoodUpdated(o) => {
            note_info(&format!(
                "{} mood: {} ({:.0}%)",
                o.mood.emoji(),
                o.mood,
                o.confidence * 100.0
            ));
        }
        Notification::Translation { message } => say(message),
        Notification::TaskSuggested {
            task_type, message, ..
        } => {
            println!("{} {}", task_type.icon(), task_type.title());
            say(message);
        }
        Notification::TaskCompleted { message, streak, .. } => {
            note_success(&format!("streak {streak}"));
            say(message);
        }
        Notification::CameraStarted => note_info("camera on"),
        Notification::CameraStopped => note_info("camera off"),
        Notification::Rejected { reason } => note_warn(reason),
    }
}

fn print_status(sidekick: &Sidekick) {
    let mood = sidekick
        .current_mood()
        .map(|o| format!("{} {} ({:.0}%)", o.mood.emoji(), o.mood, o.confidence * 100.0))
        .unwrap_or_else(|| "not detected yet".into());
    let active = sidekick
        .active_task()
        .map(|t| format!("{} {}", t.icon(), t.title()))
        .unwrap_or_else(|| "none".into());
    let profile = sidekick.profile();

    print!(
        "{}",
        render_pairs(&[
            ("pet", format!("{} the {} ({})", profile.name, profile.breed, profile.species)),
            ("state", sidekick.state().to_string()),
            ("mood", mood),
            ("task", active),
            ("streak", sidekick.streak().to_string()),
            ("message", sidekick.message().unwrap_or_default()),
        ])
    );
}

pub async fn run(config: &PetPalConfig, frames: Option<PathBuf>) -> Result<()> {
    let sidekick = Arc::new(Sidekick::from_config(config).await?);

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(32);
    let (note_tx, mut note_rx) = mpsc::channel::<Notification>(64);

    let mut scheduler = Scheduler::new(sidekick.clone(), note_tx).with_config(&config.sidekick());
    if let Some(dir) = frames {
        scheduler = scheduler.with_camera(Box::new(move || {
            Ok(Box::new(DirectoryCamera::new(dir.clone())) as Box<dyn Camera>)
        }));
    }

    let scheduler_task = tokio::spawn(scheduler.run(cmd_rx));
    let printer = tokio::spawn(async move {
        while let Some(note) = note_rx.recv().await {
            print_notification(&note);
        }
    });

    say(&format!("Hi! I'm here to help with {}.", sidekick.profile().name));
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_input(&line, sidekick.active_task()) {
            Input::Send(cmd) => {
                if cmd_tx.send(cmd).await.is_err() {
                    note_error("sidekick stopped");
                    break;
                }
            }
            Input::Status => print_status(&sidekick),
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
            Input::Empty => {}
            Input::Invalid(reason) => note_warn(&reason),
        }
    }

    let _ = cmd_tx.send(Command::Shutdown).await;
    match scheduler_task.await {
        Ok(Err(e)) => error!(error = %e, "Scheduler failed"),
        Err(e) => error!(error = %e, "Scheduler task panicked"),
        Ok(Ok(())) => {}
    }
    let _ = printer.await;
    say("Bye!");
    Ok(())
}
