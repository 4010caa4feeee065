use petpal_core::{Mood, TaskTemplate, TaskType};

/// The built-in task catalog. `{pet}` is filled in at suggestion time.
pub fn default_catalog() -> Vec<TaskTemplate> {
    vec![
        TaskTemplate::new(
            TaskType::Grooming,
            "Time to brush {pet}'s fur!",
            &[Mood::Happy, Mood::Calm],
        ),
        TaskTemplate::new(
            TaskType::Exercise,
            "Let's play fetch with {pet}!",
            &[Mood::Excited, Mood::Happy],
        ),
        TaskTemplate::new(
            TaskType::Feeding,
            "{pet} might be hungry - feeding time!",
            &[Mood::Hungry, Mood::Sad],
        ),
        TaskTemplate::new(
            TaskType::Rest,
            "{pet} seems tired - let's have quiet time",
            &[Mood::Tired, Mood::Calm],
        ),
        TaskTemplate::new(
            TaskType::Training,
            "Want to teach {pet} a new trick?",
            &[Mood::Excited, Mood::Happy],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_template_per_task_type() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), TaskType::ALL.len());
        for task_type in TaskType::ALL {
            assert_eq!(
                catalog.iter().filter(|t| t.task_type == task_type).count(),
                1
            );
        }
    }

    #[test]
    fn templates_render_pet_name() {
        for template in default_catalog() {
            let text = template.render("Max");
            assert!(text.contains("Max"), "{text}");
            assert!(!text.contains("{pet}"));
        }
    }
}
