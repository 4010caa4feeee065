//! `petpal suggest`: one task suggestion.

use anyhow::Result;

use petpal_config::PetPalConfig;
use petpal_core::{Mood, MoodObservation, TriggerSource};
use petpal_sidekick::Sidekick;

use crate::terminal_output::{note_warn, say};

pub async fn run(config: &PetPalConfig, mood: Option<&str>, confidence: Option<f32>) -> Result<()> {
    let sidekick = Sidekick::from_config(config).await?;

    if let Some(label) = mood {
        let mood = Mood::from_label(label);
        if mood == Mood::Unknown {
            note_warn(&format!("Unrecognized mood '{label}', suggesting from every task"));
        }
        sidekick.update_mood(MoodObservation::new(mood, confidence.unwrap_or(1.0)));
    }

    let suggestion = sidekick.suggest_task(TriggerSource::OnDemand).await?;
    println!(
        "{} {}: {}",
        suggestion.task_type.icon(),
        suggestion.task_type.title(),
        suggestion.prompt
    );
    say(&suggestion.message);
    Ok(())
}
