//! Explicit orderings over entrants. Every stage builder receives one of
//! these instead of sorting on its own.

use crate::config::SeedingPolicy;
use crate::domain::model::{Entrant, EntrantId, Group};
use crate::utils::error::{EngineError, Result};
use std::cmp::Ordering;
use std::collections::HashMap;

pub type RankOrder = fn(&Entrant, &Entrant) -> Ordering;

/// Weakest first, ties by id.
pub fn rank_ascending(a: &Entrant, b: &Entrant) -> Ordering {
    a.rank_key().cmp(&b.rank_key()).then(a.id.cmp(&b.id))
}

/// Strongest first, ties by id.
pub fn rank_descending(a: &Entrant, b: &Entrant) -> Ordering {
    b.rank_key().cmp(&a.rank_key()).then(a.id.cmp(&b.id))
}

pub fn group_record(a: &Entrant, b: &Entrant) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then(b.score_diff.cmp(&a.score_diff))
        .then_with(|| rank_descending(a, b))
}

/// Copy of `roster` whose counters hold group-stage results only, taken from
/// the group standings. Entrants outside every group keep a blank record.
pub fn group_records(roster: &[Entrant], groups: &[Group]) -> Vec<Entrant> {
    let table: HashMap<EntrantId, _> = groups
        .iter()
        .flat_map(|g| g.standings())
        .map(|row| (row.entrant, row))
        .collect();

    roster
        .iter()
        .cloned()
        .map(|mut entrant| {
            let row = table.get(&entrant.id);
            entrant.wins = row.map_or(0, |r| r.wins);
            entrant.losses = row.map_or(0, |r| r.losses);
            entrant.score_diff = row.map_or(0, |r| r.score_diff);
            entrant
        })
        .collect()
}

pub fn seed_order(policy: SeedingPolicy) -> RankOrder {
    match policy {
        SeedingPolicy::Rating => rank_descending,
        SeedingPolicy::GroupRecord => group_record,
    }
}

/// Orders `ids` by looking each one up in `roster`.
pub fn seed(roster: &[Entrant], ids: &[EntrantId], order: RankOrder) -> Result<Vec<EntrantId>> {
    let by_id: HashMap<EntrantId, &Entrant> = roster.iter().map(|e| (e.id, e)).collect();

    let mut entrants = ids
        .iter()
        .map(|id| {
            by_id
                .get(id)
                .copied()
                .ok_or_else(|| EngineError::not_found("entrant", id))
        })
        .collect::<Result<Vec<&Entrant>>>()?;

    entrants.sort_by(|a, b| order(a, b));
    Ok(entrants.into_iter().map(|e| e.id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_orders_break_ties_by_id() {
        let a = Entrant::new(2, "a", 1500);
        let b = Entrant::new(1, "b", 1500);
        let c = Entrant::new(3, "c", 1600);

        let mut asc = vec![&c, &a, &b];
        asc.sort_by(|x, y| rank_ascending(x, y));
        assert_eq!(asc.iter().map(|e| e.id.0).collect::<Vec<_>>(), vec![1, 2, 3]);

        let mut desc = vec![&a, &b, &c];
        desc.sort_by(|x, y| rank_descending(x, y));
        assert_eq!(desc.iter().map(|e| e.id.0).collect::<Vec<_>>(), vec![3, 1, 2]);
    }

    #[test]
    fn test_group_record_prefers_wins_over_rating() {
        let mut underdog = Entrant::new(1, "underdog", 1200);
        underdog.wins = 3;
        let favourite = Entrant::new(2, "favourite", 1900);

        assert_eq!(group_record(&underdog, &favourite), Ordering::Less);
        assert_eq!(rank_descending(&underdog, &favourite), Ordering::Greater);
    }

    #[test]
    fn test_group_records_ignore_knockout_results() {
        use crate::domain::model::{Fixture, FixtureId, StageId};

        let mut played = Fixture::new(FixtureId::new(StageId::Group(0), 1), EntrantId(1), EntrantId(2), 1);
        played.home_score = 1;
        played.away_score = 4;
        let group = Group {
            index: 0,
            members: vec![EntrantId(1), EntrantId(2)],
            fixtures: vec![played],
        };

        // running totals already include a knockout win for entrant 1
        let mut roster = vec![Entrant::new(1, "a", 1500), Entrant::new(2, "b", 1400)];
        roster[0].wins = 1;
        roster[1].wins = 1;
        roster.push(Entrant::new(3, "c", 1300));
        roster[2].wins = 5;

        let records = group_records(&roster, &[group]);
        assert_eq!((records[0].wins, records[0].losses, records[0].score_diff), (0, 1, -3));
        assert_eq!((records[1].wins, records[1].losses, records[1].score_diff), (1, 0, 3));
        assert_eq!(records[2].wins, 0);
        assert_eq!(records[0].provisional_rating, roster[0].provisional_rating);

        let seeded = seed(&records, &[EntrantId(1), EntrantId(2), EntrantId(3)], group_record).unwrap();
        assert_eq!(seeded, vec![EntrantId(2), EntrantId(3), EntrantId(1)]);
    }

    #[test]
    fn test_seed_unknown_entrant() {
        let roster = vec![Entrant::new(1, "a", 1500)];
        let err = seed(&roster, &[EntrantId(1), EntrantId(9)], rank_descending).unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }
}
