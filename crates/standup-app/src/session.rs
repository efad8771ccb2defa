//! The view loop: one task owns the reconciler and serializes every
//! change event and keyboard command through it.

use std::future::Future;
use std::io::{self, Write};

use standup_common::Notification;
use standup_room::{LeaveNotifier, ParticipantStore, Reconciler, Subscription};
use tokio::io::{AsyncBufRead, Lines};
use tracing::{debug, info, warn};

use crate::commands::{parse_command, Command, HELP};
use crate::render::render;

/// Run until the user quits, stdin closes, the feed ends, or `shutdown`
/// resolves. Always sends the leave signal and closes the subscription.
pub async fn run<S, R, W, F>(
    room: &mut Reconciler<S>,
    mut subscription: Subscription,
    input: &mut Lines<R>,
    out: &mut W,
    notifier: &dyn LeaveNotifier,
    shutdown: F,
) -> io::Result<()>
where
    S: ParticipantStore,
    R: AsyncBufRead + Unpin,
    W: Write,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    draw(room, out)?;

    let result = loop {
        tokio::select! {
            change = subscription.next() => match change {
                Some(change) => room.apply_change(change),
                None => {
                    warn!("Change feed ended");
                    break Ok(());
                }
            },
            line = input.next_line() => match line {
                Ok(Some(line)) => match handle(room, parse_command(&line), out).await {
                    Ok(true) => {}
                    Ok(false) => break Ok(()),
                    Err(e) => break Err(e),
                },
                Ok(None) => {
                    debug!("stdin closed");
                    break Ok(());
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    break Ok(());
                }
            },
            _ = &mut shutdown => {
                info!("Interrupted");
                break Ok(());
            }
        }
        if let Err(e) = draw(room, out) {
            break Err(e);
        }
    };

    room.leave(notifier);
    room.teardown(subscription).await;
    result
}

/// Apply one command. Returns `false` when the user asked to leave.
async fn handle<S, W>(room: &mut Reconciler<S>, command: Command, out: &mut W) -> io::Result<bool>
where
    S: ParticipantStore,
    W: Write,
{
    match command {
        Command::ToggleTalked => room.toggle_self_talked().await,
        Command::ToggleIssue => room.toggle_self_issue().await,
        Command::Rename(name) => {
            if let Err(e) = room.rename_self(&name).await {
                writeln!(out, "Name: {e}")?;
            }
        }
        Command::Quit => return Ok(false),
        Command::Redraw => {}
        Command::Unknown(text) => writeln!(out, "Unknown command {text:?}. {HELP}")?,
    }
    Ok(true)
}

fn draw<S: ParticipantStore, W: Write>(room: &mut Reconciler<S>, out: &mut W) -> io::Result<()> {
    let notes: Vec<Notification> = room
        .notifications()
        .visible()
        .into_iter()
        .cloned()
        .collect();
    let refs: Vec<&Notification> = notes.iter().collect();
    writeln!(
        out,
        "\n{}",
        render(room.participants(), room.self_participant(), &refs)
    )?;
    out.flush()
}
