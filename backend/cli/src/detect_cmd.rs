//! `petpal detect`: one classification from an image file.

use std::path::Path;

use anyhow::{Context, Result};

use petpal_config::PetPalConfig;
use petpal_core::{Frame, Mood, TriggerSource};
use petpal_sidekick::Sidekick;
use petpal_vision::mime::image_mime_type;
use petpal_vision::DetectorMode;

use crate::terminal_output::{note_info, note_warn, say};

pub async fn run(config: &PetPalConfig, image: &Path) -> Result<()> {
    let mime = image_mime_type(image)
        .with_context(|| format!("Not a supported image file: {}", image.display()))?;
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read image: {}", image.display()))?;

    let sidekick = Sidekick::from_config(config).await?;
    if sidekick.detector().mode() == DetectorMode::Fallback {
        note_info("Using the offline mood stub");
    }

    let detection = sidekick
        .detect_mood(&Frame::new(bytes, mime), TriggerSource::OnDemand)
        .await?;
    let observation = detection.observation;

    if observation.mood == Mood::Unknown {
        note_warn("Could not tell how your pet is feeling");
    } else {
        println!(
            "{} {} ({:.0}% sure)",
            observation.mood.emoji(),
            observation.mood,
            observation.confidence * 100.0
        );
    }
    say(&detection.translation);
    Ok(())
}
