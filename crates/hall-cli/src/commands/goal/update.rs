use hall_db::updates::goal::{GoalUpdate, GoalUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_date;
use crate::context::AppContext;
use crate::output::output;

/// Flag values for `hall goal update`, borrowed from the parsed command.
#[derive(Debug, Default)]
pub struct UpdateFields<'a> {
    pub title: Option<&'a str>,
    pub target: Option<i64>,
    pub deadline: Option<&'a str>,
    pub clear_deadline: bool,
    pub subject: Option<&'a str>,
    pub clear_subject: bool,
}

pub async fn run(
    id: &str,
    fields: &UpdateFields<'_>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let user_id = ctx.require_user()?;
    let update = build_update(fields)?;
    let goal = ctx.service.update_goal(user_id, id, update).await?;
    output(&goal, flags.format)
}

fn build_update(fields: &UpdateFields<'_>) -> anyhow::Result<GoalUpdate> {
    let mut builder = GoalUpdateBuilder::new();
    let mut touched = false;

    if let Some(title) = fields.title {
        builder = builder.title(title);
        touched = true;
    }
    if let Some(target) = fields.target {
        builder = builder.target(target);
        touched = true;
    }
    if let Some(deadline) = fields.deadline {
        builder = builder.deadline(Some(parse_date(deadline, "deadline")?));
        touched = true;
    } else if fields.clear_deadline {
        builder = builder.deadline(None);
        touched = true;
    }
    if let Some(subject) = fields.subject {
        builder = builder.subject_id(Some(subject.to_string()));
        touched = true;
    } else if fields.clear_subject {
        builder = builder.subject_id(None);
        touched = true;
    }

    if !touched {
        anyhow::bail!(
            "nothing to update: pass --title, --target, --deadline, --clear-deadline, \
             --subject or --clear-subject"
        );
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::{UpdateFields, build_update};

    #[test]
    fn empty_update_is_rejected() {
        let err = build_update(&UpdateFields::default()).expect_err("should fail");
        assert!(err.to_string().contains("nothing to update"));
    }

    #[test]
    fn bad_deadline_is_rejected() {
        let fields = UpdateFields {
            deadline: Some("next friday"),
            ..UpdateFields::default()
        };
        assert!(build_update(&fields).is_err());
    }

    #[test]
    fn clear_flags_count_as_changes() {
        let fields = UpdateFields {
            clear_deadline: true,
            ..UpdateFields::default()
        };
        assert!(build_update(&fields).is_ok());
    }
}
