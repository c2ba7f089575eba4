use crate::domain::model::EventStages;
use crate::utils::error::{EngineError, Result};

/// Outcome of the completion check. `ready == false` is an answer, not an
/// error; only [`GateStatus::require`] turns it into one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateStatus {
    pub ready: bool,
    pub unfinished: usize,
    pub reason: Option<String>,
}

impl GateStatus {
    pub fn require(&self) -> Result<()> {
        if self.ready {
            return Ok(());
        }
        Err(EngineError::IncompleteTournament {
            unfinished: self.unfinished,
            detail: self
                .reason
                .clone()
                .unwrap_or_else(|| format!("{} unfinished matches", self.unfinished)),
        })
    }
}

/// Ready iff at least one group and one knockout round exist and every
/// fixture in all of them is finished; with `require_champion`, the bracket
/// must also have produced a champion.
pub fn evaluate(stages: &EventStages, require_champion: bool) -> GateStatus {
    let unfinished = stages.unfinished_count();

    let reason = if stages.groups.is_empty() {
        Some("the group stage has not been formed".to_string())
    } else if stages.rounds.is_empty() {
        Some("the knockout stage has not been formed".to_string())
    } else if unfinished > 0 {
        Some(format!("{} unfinished matches", unfinished))
    } else if require_champion && stages.champion.is_none() {
        Some("no champion has been decided".to_string())
    } else {
        None
    };

    GateStatus {
        ready: reason.is_none(),
        unfinished,
        reason,
    }
}

pub fn is_ready(stages: &EventStages, require_champion: bool) -> bool {
    evaluate(stages, require_champion).ready
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bracket::build_round;
    use crate::core::round_robin::round_robin;
    use crate::domain::model::{EntrantId, EventId, Group, StageId};

    fn stages_with_one_of_each() -> EventStages {
        let members: Vec<EntrantId> = (1..=4).map(EntrantId).collect();
        let mut stages = EventStages::new(EventId(7));
        stages.groups.push(Group {
            index: 0,
            fixtures: round_robin(StageId::Group(0), &members),
            members: members.clone(),
        });
        stages.rounds.push(build_round(1, members, Vec::new()).unwrap());
        stages
    }

    fn finish_everything(stages: &mut EventStages) {
        for group in &mut stages.groups {
            for f in &mut group.fixtures {
                f.home_score = 1;
            }
        }
        for round in &mut stages.rounds {
            for f in &mut round.fixtures {
                f.home_score = 1;
            }
        }
    }

    #[test]
    fn test_empty_event_is_never_ready() {
        let stages = EventStages::new(EventId(1));
        let status = evaluate(&stages, false);
        assert!(!status.ready);
        assert_eq!(status.unfinished, 0);
        assert!(matches!(
            status.require(),
            Err(EngineError::IncompleteTournament { .. })
        ));
    }

    #[test]
    fn test_groups_without_bracket_are_not_ready() {
        let mut stages = stages_with_one_of_each();
        stages.rounds.clear();
        finish_everything(&mut stages);
        assert!(!is_ready(&stages, false));
    }

    #[test]
    fn test_ready_only_after_last_fixture() {
        let mut stages = stages_with_one_of_each();
        assert_eq!(evaluate(&stages, false).unfinished, 8);

        finish_everything(&mut stages);
        stages.rounds[0].fixtures[1].home_score = 0;
        assert!(!is_ready(&stages, false));
        assert_eq!(evaluate(&stages, false).unfinished, 1);

        stages.rounds[0].fixtures[1].away_score = 2;
        assert!(is_ready(&stages, false));
        assert!(evaluate(&stages, false).require().is_ok());
    }

    #[test]
    fn test_champion_requirement() {
        let mut stages = stages_with_one_of_each();
        finish_everything(&mut stages);

        assert!(is_ready(&stages, false));
        assert!(!is_ready(&stages, true));

        stages.champion = Some(EntrantId(1));
        assert!(is_ready(&stages, true));
    }
}
