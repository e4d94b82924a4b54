//! Pairing policy: first come, first served.
//!
//! Participants are ordered by the moment they started searching, ties
//! broken by the lower id. The two at the head of the queue play each
//! other and the earlier arrival takes side A.

/// A participant waiting in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    pub participant_id: i64,
    pub searching_since: time::PrimitiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub side_a: i64,
    pub side_b: i64,
}

/// Picks the pair at the head of the queue, or `None` with fewer than two
/// distinct participants.
pub fn select_pair(queue: &[QueueEntry]) -> Option<Pairing> {
    let mut ordered: Vec<&QueueEntry> = queue.iter().collect();
    ordered.sort_by_key(|e| (e.searching_since, e.participant_id));
    ordered.dedup_by_key(|e| e.participant_id);

    match ordered.as_slice() {
        [first, second, ..] => Some(Pairing {
            side_a: first.participant_id,
            side_b: second.participant_id,
        }),
        _ => None,
    }
}

/// Picks the venue a new match is played on: the lowest free id.
pub fn select_venue(free_venues: &[i64]) -> Option<i64> {
    free_venues.iter().copied().min()
}
