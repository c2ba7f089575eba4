use crate::domain::model::{Entrant, EntrantId, EventStages};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 9] = [
    "fixture", "stage", "matchday", "home", "away", "home_score", "away_score", "winner",
    "finished",
];

/// Writes one row per fixture of the event, groups first, then knockout rounds.
pub fn write_fixtures<W: Write>(writer: W, stages: &EventStages, roster: &[Entrant]) -> Result<()> {
    let names: HashMap<EntrantId, &str> = roster.iter().map(|e| (e.id, e.name.as_str())).collect();
    let name = |id: Option<EntrantId>| -> String {
        match id {
            Some(id) => names
                .get(&id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| id.to_string()),
            None => String::new(),
        }
    };

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;
    for fixture in stages.fixtures() {
        csv.write_record([
            fixture.id.to_string(),
            fixture.stage().to_string(),
            fixture.matchday.to_string(),
            name(fixture.home),
            name(fixture.away),
            fixture.home_score.to_string(),
            fixture.away_score.to_string(),
            name(fixture.winner()),
            fixture.is_finished().to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn export_fixtures<P: AsRef<Path>>(path: P, stages: &EventStages, roster: &[Entrant]) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_fixtures(file, stages, roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::round_robin::round_robin;
    use crate::domain::model::{EventId, Group, StageId};

    #[test]
    fn test_fixture_rows() {
        let roster: Vec<Entrant> = (1..=3)
            .map(|i| Entrant::new(i, format!("P{}", i), 1500))
            .collect();
        let members: Vec<EntrantId> = roster.iter().map(|e| e.id).collect();
        let mut stages = EventStages::new(EventId(1));
        stages.groups.push(Group {
            index: 0,
            fixtures: round_robin(StageId::Group(0), &members),
            members,
        });
        stages.groups[0].fixtures[0].home_score = 2;

        let mut buffer = Vec::new();
        write_fixtures(&mut buffer, &stages, &roster).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("fixture,stage,matchday"));
        assert!(lines[1].starts_with("G1-1,G1,"));
        assert!(lines[1].ends_with(",true"));
        assert!(lines[2].ends_with(",,false"));
    }
}
