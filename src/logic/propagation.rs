//! Winner picks: apply a choice to one slot and carry it forward through the bracket.

use crate::models::{Bracket, BracketError, SlotIndex, SlotStatus};
use log::debug;

/// Set the predicted winner of `slot` (None clears it) and update later rounds.
///
/// The winner of a slot is written into the team field of its next match. If the
/// slot already had a pick, that old team is retracted first: walking forward,
/// every next-match team field fed by the chain gets the new choice, and a
/// downstream prediction equal to the old team is replaced too. The walk stops at
/// the first downstream prediction that was something else, or after the final.
///
/// Rejected without changes when the bracket is submitted, the match started
/// without a pick (NOT_VOTED), or the choice is not one of the slot's teams.
///
/// The NOT_VOTED lock reads the statuses stored on the bracket; call
/// [`refresh_statuses`](crate::logic::refresh_statuses) first.
pub fn apply_choice(
    bracket: &mut Bracket,
    slot: SlotIndex,
    choice: Option<String>,
) -> Result<(), BracketError> {
    let current = bracket.slot(slot)?;
    if bracket.is_submitted() || current.status == SlotStatus::NotVoted {
        return Err(BracketError::LockedSlot(slot));
    }
    if !current.accepts(choice.as_deref()) {
        return Err(BracketError::InvalidChoice { slot, choice });
    }

    let old = current.prediction.clone();
    if old.is_some() {
        retract_forward(bracket, slot, old.as_deref(), &choice)?;
    }

    let target = bracket.slot_mut(slot)?;
    target.prediction = choice.clone();
    if let Some((next, side)) = target.forward_edge() {
        bracket.slot_mut(next)?.set_team(side, choice);
    }
    debug!("Match {}: prediction set", slot);
    Ok(())
}

/// Replace `old` with `choice` along the chain of next matches that inherited it.
fn retract_forward(
    bracket: &mut Bracket,
    from: SlotIndex,
    old: Option<&str>,
    choice: &Option<String>,
) -> Result<(), BracketError> {
    let mut source = from;
    // Links point strictly forward (checked by `Bracket::validate`), so this ends.
    loop {
        let Some((next, side)) = bracket.slot(source)?.forward_edge() else {
            break;
        };
        let downstream = bracket.slot_mut(next)?;
        downstream.set_team(side, choice.clone());
        if downstream.prediction.as_deref() != old {
            break;
        }
        downstream.prediction = choice.clone();
        source = next;
    }
    Ok(())
}
