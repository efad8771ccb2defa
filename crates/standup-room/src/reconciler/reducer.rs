use crate::feed::ParticipantChange;
use crate::participant::Participant;

/// Apply one change event to the ordered participant list.
///
/// - `Created` appends unless the id is already present.
/// - `Deleted` removes the id; absent ids are ignored.
/// - `Updated` replaces in place; absent ids are ignored.
pub fn apply(mut list: Vec<Participant>, change: &ParticipantChange) -> Vec<Participant> {
    match change {
        ParticipantChange::Created(p) => {
            if !list.iter().any(|existing| existing.id == p.id) {
                list.push(p.clone());
            }
        }
        ParticipantChange::Deleted(id) => list.retain(|existing| existing.id != *id),
        ParticipantChange::Updated(p) => {
            if let Some(slot) = list.iter_mut().find(|existing| existing.id == p.id) {
                *slot = p.clone();
            }
        }
    }
    list
}
