use anyhow::{bail, Result};

use petpal_config::PetPalConfig;
use petpal_core::{Mood, MoodObservation};
use petpal_sidekick::{Sidekick, TimeOfDay};

use crate::terminal_output::say;

pub async fn run(
    config: &PetPalConfig,
    mood: &str,
    time_of_day: Option<&str>,
    weather: Option<&str>,
) -> Result<()> {
    let time_of_day = match time_of_day {
        Some(s) => match TimeOfDay::parse(s) {
            Some(t) => t,
            None => bail!("Unknown time of day '{s}' (expected morning, afternoon, evening or night)"),
        },
        None => TimeOfDay::now(),
    };

    let sidekick = Sidekick::from_config(config).await?;
    sidekick.update_mood(MoodObservation::new(Mood::from_label(mood), 1.0));

    say(&sidekick.suggest_activity(time_of_day, weather).await);
    Ok(())
}
