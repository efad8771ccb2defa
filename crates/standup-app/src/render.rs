use std::fmt::Write;

use standup_common::{Notification, NotificationLevel};
use standup_room::{Participant, ParticipantId};

use crate::commands::HELP;

/// Text view of the room: one line per participant, then notifications.
pub fn render(
    participants: &[Participant],
    self_participant: Option<&Participant>,
    notifications: &[&Notification],
) -> String {
    let self_id: Option<ParticipantId> = self_participant.map(|p| p.id);
    let mut out = String::new();
    let _ = writeln!(out, "Standup ({} here)", participants.len());

    for p in participants {
        if Some(p.id) == self_id {
            let _ = writeln!(out, "> {} (You)", p.name);
            continue;
        }
        let mut line = format!("  {}", p.name);
        if p.has_talked {
            line.push_str(" (Done)");
        }
        if p.has_issue {
            line.push_str(" (Issue Raised!)");
        }
        let _ = writeln!(out, "{line}");
    }

    if let Some(me) = self_participant {
        let _ = writeln!(
            out,
            "[{}] done  [{}] issue",
            if me.has_talked { "x" } else { " " },
            if me.has_issue { "x" } else { " " }
        );
    }

    for n in notifications {
        let marker = match n.level {
            NotificationLevel::Info => "*",
            NotificationLevel::Error => "!",
        };
        let _ = writeln!(out, "{marker} {n}");
    }
    let _ = write!(out, "{HELP}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: i64, name: &str, talked: bool, issue: bool) -> Participant {
        Participant {
            id: ParticipantId(id),
            name: name.into(),
            has_talked: talked,
            has_issue: issue,
        }
    }

    #[test]
    fn marks_self_and_statuses() {
        let list = vec![
            person(1, "Ada", true, false),
            person(2, "Grace", false, true),
            person(3, "Me", true, true),
        ];
        let text = render(&list, Some(&list[2]), &[]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Standup (3 here)");
        assert_eq!(lines[1], "  Ada (Done)");
        assert_eq!(lines[2], "  Grace (Issue Raised!)");
        assert_eq!(lines[3], "> Me (You)");
        assert_eq!(lines[4], "[x] done  [x] issue");
    }

    #[test]
    fn without_self_nobody_is_you() {
        let list = vec![person(1, "Ada", false, false)];
        let text = render(&list, None, &[]);
        assert!(!text.contains("(You)"));
        assert!(!text.contains("done  ["));
    }

    #[test]
    fn notifications_follow_the_list() {
        let err = Notification::error("Error: Could not update name", "timeout");
        let info = Notification::info("Success", "You have successfully joined the meeting.");
        let text = render(&[], None, &[&info, &err]);
        assert!(text.contains("* Success: You have successfully joined the meeting."));
        assert!(text.contains("! Error: Could not update name: timeout"));
        assert!(text.ends_with(HELP));
    }
}
