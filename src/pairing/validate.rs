use crate::model::{Assignment, Participant};

/// `giver` peut-il offrir à `receiver` ?
pub fn assignment_allowed(giver: &Participant, receiver: &Participant) -> bool {
    giver.name() != receiver.name() && !giver.excludes(receiver.name())
}

/// Un tirage est valide si chacune de ses paires l'est.
pub fn pairings_valid(assignments: &[Assignment]) -> bool {
    assignments
        .iter()
        .all(|a| assignment_allowed(&a.giver, &a.receiver))
}

/// Variante sur indices : `order[i]` est le destinataire de `participants[i]`.
pub(super) fn order_valid(participants: &[Participant], order: &[usize]) -> bool {
    participants
        .iter()
        .zip(order)
        .all(|(giver, &r)| assignment_allowed(giver, &participants[r]))
}
