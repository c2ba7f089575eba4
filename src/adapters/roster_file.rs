use crate::domain::model::{Entrant, RatingCommit};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One line of a roster file. Counters and the provisional rating start
/// from the registration values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: u64,
    pub name: String,
    pub rating: i32,
}

impl From<RosterEntry> for Entrant {
    fn from(entry: RosterEntry) -> Self {
        Entrant::new(entry.id, entry.name, entry.rating)
    }
}

pub fn parse_roster(content: &str) -> Result<Vec<Entrant>> {
    let entries: Vec<RosterEntry> = serde_json::from_str(content)?;
    Ok(entries.into_iter().map(Entrant::from).collect())
}

/// Reads a JSON array of `{ "id", "name", "rating" }` objects.
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Vec<Entrant>> {
    let content = std::fs::read_to_string(path)?;
    parse_roster(&content)
}

pub fn save_ratings<P: AsRef<Path>>(path: P, commit: &RatingCommit) -> Result<()> {
    let json = serde_json::to_string_pretty(commit)?;
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EngineError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_roster() {
        let roster = parse_roster(
            r#"[
                {"id": 1, "name": "Ada", "rating": 1510},
                {"id": 2, "name": "Grace", "rating": 1620}
            ]"#,
        )
        .unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[1].name, "Grace");
        assert_eq!(roster[1].provisional_rating, 1620);
        assert_eq!(roster[1].wins, 0);
    }

    #[test]
    fn test_malformed_roster() {
        let err = parse_roster(r#"[{"id": 1, "name": "Ada"}]"#).unwrap_err();
        assert!(matches!(err, EngineError::SerializationError(_)));
    }

    #[test]
    fn test_load_roster_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"[{"id": 7, "name": "Linus", "rating": 1400}]"#)
            .unwrap();

        let roster = load_roster(file.path()).unwrap();
        assert_eq!(roster[0].id.0, 7);
    }
}
