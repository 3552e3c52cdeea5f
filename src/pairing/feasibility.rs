use super::validate::assignment_allowed;
use crate::model::Participant;

/// Existe-t-il au moins un tirage valide ?
///
/// Cherche un couplage parfait dans le graphe biparti donneurs → destinataires
/// autorisés (chemins augmentants).
pub fn has_valid_pairing(participants: &[Participant]) -> bool {
    if participants.is_empty() {
        return false;
    }

    let allowed: Vec<Vec<usize>> = participants
        .iter()
        .map(|giver| {
            participants
                .iter()
                .enumerate()
                .filter(|(_, receiver)| assignment_allowed(giver, receiver))
                .map(|(idx, _)| idx)
                .collect()
        })
        .collect();

    // receiver -> giver
    let mut matched: Vec<Option<usize>> = vec![None; participants.len()];
    (0..participants.len()).all(|giver| {
        let mut seen = vec![false; participants.len()];
        augment(giver, &allowed, &mut seen, &mut matched)
    })
}

fn augment(
    giver: usize,
    allowed: &[Vec<usize>],
    seen: &mut [bool],
    matched: &mut [Option<usize>],
) -> bool {
    for &receiver in &allowed[giver] {
        if seen[receiver] {
            continue;
        }
        seen[receiver] = true;
        let current = matched[receiver];
        let free = match current {
            None => true,
            Some(other) => augment(other, allowed, seen, matched),
        };
        if free {
            matched[receiver] = Some(giver);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutual_exclusion_of_two_is_infeasible() {
        let people = vec![
            Participant::new("Alice", "").excluding(["Bob"]),
            Participant::new("Bob", "").excluding(["Alice"]),
        ];
        assert!(!has_valid_pairing(&people));
    }

    #[test]
    fn two_without_exclusions_swap() {
        let people = vec![Participant::new("Alice", ""), Participant::new("Bob", "")];
        assert!(has_valid_pairing(&people));
    }

    #[test]
    fn single_participant_is_infeasible() {
        assert!(!has_valid_pairing(&[Participant::new("Alice", "")]));
        assert!(!has_valid_pairing(&[]));
    }

    #[test]
    fn participant_excluding_everyone_else_is_infeasible() {
        let people = vec![
            Participant::new("Alice", "").excluding(["Bob", "Charlie"]),
            Participant::new("Bob", ""),
            Participant::new("Charlie", ""),
        ];
        assert!(!has_valid_pairing(&people));
    }

    #[test]
    fn needs_reassignment_through_augmenting_path() {
        // Alice ne peut offrir qu'à Charlie ; Bob doit céder sa première option.
        let people = vec![
            Participant::new("Bob", ""),
            Participant::new("Alice", "").excluding(["Bob", "Diana"]),
            Participant::new("Charlie", "").excluding(["Diana"]),
            Participant::new("Diana", ""),
        ];
        assert!(has_valid_pairing(&people));
    }
}
