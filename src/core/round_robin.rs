use crate::domain::model::{EntrantId, Fixture, FixtureId, StageId};

/// Every unordered pair of `members` exactly once, laid out in matchdays with
/// the circle method: the first slot stays put while the others rotate, and
/// odd groups get a phantom slot so one member rests each matchday.
///
/// Output depends only on `stage` and the order of `members`, so regenerating
/// a group yields the same fixtures with the same ids.
pub fn round_robin(stage: StageId, members: &[EntrantId]) -> Vec<Fixture> {
    let k = members.len();
    if k < 2 {
        return Vec::new();
    }

    let mut slots: Vec<Option<EntrantId>> = members.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();

    let mut fixtures = Vec::with_capacity(k * (k - 1) / 2);
    let mut number = 1;
    for matchday in 1..n as u32 {
        for i in 0..n / 2 {
            if let (Some(a), Some(b)) = (slots[i], slots[n - 1 - i]) {
                // swap the anchor's side every other matchday
                let (home, away) = if i == 0 && matchday % 2 == 0 {
                    (b, a)
                } else {
                    (a, b)
                };
                fixtures.push(Fixture::new(
                    FixtureId::new(stage, number),
                    home,
                    away,
                    matchday,
                ));
                number += 1;
            }
        }
        slots[1..].rotate_right(1);
    }

    fixtures
}
