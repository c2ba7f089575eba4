use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntrantId(pub u64);

impl fmt::Display for EntrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A competitor registered in an event.
///
/// `rating` is the rank key and the permanent rating; results only move
/// `provisional_rating` until the event is finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub name: String,
    pub rating: i32,
    pub provisional_rating: i32,
    pub wins: u32,
    pub losses: u32,
    pub score_diff: i64,
    pub elite: bool,
}

impl Entrant {
    pub fn new(id: u64, name: impl Into<String>, rating: i32) -> Self {
        Self {
            id: EntrantId(id),
            name: name.into(),
            rating,
            provisional_rating: rating,
            wins: 0,
            losses: 0,
            score_diff: 0,
            elite: false,
        }
    }

    pub fn rank_key(&self) -> i32 {
        self.rating
    }

    pub fn record_win(&mut self, scored: u32, conceded: u32) {
        self.wins += 1;
        self.score_diff += scored as i64 - conceded as i64;
    }

    pub fn record_loss(&mut self, scored: u32, conceded: u32) {
        self.losses += 1;
        self.score_diff += scored as i64 - conceded as i64;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum StageId {
    /// 0-based group index
    Group(u32),
    /// 1-based knockout round number
    Knockout(u32),
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageId::Group(index) => write!(f, "G{}", index + 1),
            StageId::Knockout(round) => write!(f, "R{}", round),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixtureId {
    pub stage: StageId,
    pub number: u32,
}

impl FixtureId {
    pub fn new(stage: StageId, number: u32) -> Self {
        Self { stage, number }
    }
}

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.stage, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub home: Option<EntrantId>,
    pub away: Option<EntrantId>,
    pub home_score: u32,
    pub away_score: u32,
    pub matchday: u32,
    /// Set when the result is recorded; needed when equal scores were
    /// resolved by the tie-break policy.
    pub winner: Option<EntrantId>,
}

impl Fixture {
    pub fn new(id: FixtureId, home: EntrantId, away: EntrantId, matchday: u32) -> Self {
        Self {
            id,
            home: Some(home),
            away: Some(away),
            home_score: 0,
            away_score: 0,
            matchday,
            winner: None,
        }
    }

    pub fn stage(&self) -> StageId {
        self.id.stage
    }

    /// Both slots populated and at least one score above zero. A recorded
    /// 0-0 would read as unfinished, so the engine never accepts one.
    pub fn is_finished(&self) -> bool {
        self.home.is_some() && self.away.is_some() && (self.home_score > 0 || self.away_score > 0)
    }

    pub fn winner(&self) -> Option<EntrantId> {
        if !self.is_finished() {
            return None;
        }
        if self.winner.is_some() {
            return self.winner;
        }
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => self.home,
            std::cmp::Ordering::Less => self.away,
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn involves(&self, entrant: EntrantId) -> bool {
        self.home == Some(entrant) || self.away == Some(entrant)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub entrant: EntrantId,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub score_diff: i64,
}

/// Round-robin cohort. Membership is frozen when the group is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub index: u32,
    pub members: Vec<EntrantId>,
    pub fixtures: Vec<Fixture>,
}

impl Group {
    pub fn is_complete(&self) -> bool {
        self.fixtures.iter().all(Fixture::is_finished)
    }

    /// Table computed from this group's finished fixtures only: wins, then
    /// score differential, then lower id.
    pub fn standings(&self) -> Vec<Standing> {
        let mut table: Vec<Standing> = self
            .members
            .iter()
            .map(|&entrant| Standing {
                entrant,
                played: 0,
                wins: 0,
                losses: 0,
                score_diff: 0,
            })
            .collect();

        for fixture in self.fixtures.iter().filter(|f| f.is_finished()) {
            let winner = fixture.winner();
            for row in table.iter_mut().filter(|row| fixture.involves(row.entrant)) {
                let (scored, conceded) = if fixture.home == Some(row.entrant) {
                    (fixture.home_score, fixture.away_score)
                } else {
                    (fixture.away_score, fixture.home_score)
                };
                row.played += 1;
                row.score_diff += scored as i64 - conceded as i64;
                if winner == Some(row.entrant) {
                    row.wins += 1;
                } else {
                    row.losses += 1;
                }
            }
        }

        table.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then(b.score_diff.cmp(&a.score_diff))
                .then(a.entrant.cmp(&b.entrant))
        });
        table
    }
}

/// One elimination round. Entrants in `byes` advance without a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketRound {
    pub round: u32,
    pub entrants: Vec<EntrantId>,
    pub byes: Vec<EntrantId>,
    pub fixtures: Vec<Fixture>,
    /// Entrants removed by the pre-cut before pairing; only ever set on round 1.
    #[serde(default)]
    pub cut: Vec<EntrantId>,
}

impl BracketRound {
    pub fn is_complete(&self) -> bool {
        self.fixtures.iter().all(Fixture::is_finished)
    }
}

/// Everything the engine has produced for one event so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStages {
    pub event_id: EventId,
    pub groups: Vec<Group>,
    pub rounds: Vec<BracketRound>,
    pub champion: Option<EntrantId>,
    pub ratings_finalized: bool,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl EventStages {
    pub fn new(event_id: EventId) -> Self {
        Self {
            event_id,
            groups: Vec::new(),
            rounds: Vec::new(),
            champion: None,
            ratings_finalized: false,
            finalized_at: None,
        }
    }

    pub fn fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.groups
            .iter()
            .flat_map(|g| g.fixtures.iter())
            .chain(self.rounds.iter().flat_map(|r| r.fixtures.iter()))
    }

    pub fn fixture(&self, id: FixtureId) -> Option<&Fixture> {
        self.fixtures().find(|f| f.id == id)
    }

    pub fn fixture_mut(&mut self, id: FixtureId) -> Option<&mut Fixture> {
        let fixtures = match id.stage {
            StageId::Group(index) => &mut self.groups.iter_mut().find(|g| g.index == index)?.fixtures,
            StageId::Knockout(round) => {
                &mut self.rounds.iter_mut().find(|r| r.round == round)?.fixtures
            }
        };
        fixtures.iter_mut().find(|f| f.id == id)
    }

    pub fn current_round(&self) -> Option<&BracketRound> {
        self.rounds.last()
    }

    pub fn unfinished_count(&self) -> usize {
        self.fixtures().filter(|f| !f.is_finished()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    ReachedElite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub entrant: EntrantId,
    pub kind: MilestoneKind,
    pub rating: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingCommit {
    pub entrants: Vec<Entrant>,
    pub milestones: Vec<Milestone>,
    pub committed_at: DateTime<Utc>,
}
