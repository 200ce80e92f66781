use crate::permutation::full_permutations;
use itertools::Itertools;
use log::{debug, warn};
use serde::Serialize;

/// Interaction technique under test
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Technique {
    Tui,
    Button,
}

/// Task complexity level
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Complexity {
    Low,
    Med,
    High,
}

/// Date picker variant shown to a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DateSelect {
    Calendar,
    Dropdown,
}

pub const TECHNIQUES: [Technique; 2] = [Technique::Tui, Technique::Button];
pub const COMPLEXITIES: [Complexity; 3] = [Complexity::Low, Complexity::Med, Complexity::High];
pub const DATE_SELECTS: [DateSelect; 2] = [DateSelect::Calendar, DateSelect::Dropdown];

/// 2! technique orders times 3! complexity orders
pub const ARRANGEMENT_COUNT: usize = 12;
/// One step per technique/complexity pair
pub const STEP_COUNT: usize = TECHNIQUES.len() * COMPLEXITIES.len();

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    #[error("arrangement id {0} is out of range (expected 1..=12)")]
    ArrangementOutOfRange(usize),

    #[error("step {0} is out of range (expected 1..=6)")]
    StepOutOfRange(usize),

    #[error("date select index {0} is out of range (expected 1..=2)")]
    DateSelectOutOfRange(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arrangement {
    pub id: usize,
    pub techniques: Vec<Technique>,
    pub complexities: Vec<Complexity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    pub id: usize,
    pub technique: Technique,
    pub complexity: Complexity,
}

/// One line of the full assignment table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub arrangement: usize,
    pub step: usize,
    pub technique: Technique,
    pub complexity: Complexity,
}

pub fn resolve_arrangement(id: usize) -> Result<Arrangement, AssignError> {
    if !(1..=ARRANGEMENT_COUNT).contains(&id) {
        warn!("rejecting arrangement id {id}");
        return Err(AssignError::ArrangementOutOfRange(id));
    }

    let technique_seq = full_permutations(&TECHNIQUES);
    let complexity_seq = full_permutations(&COMPLEXITIES);

    let techniques = technique_seq[(id - 1) / complexity_seq.len()].clone();
    let complexities = complexity_seq[(id - 1) % complexity_seq.len()].clone();

    debug!("arrangement {id}: techniques {techniques:?}, complexities {complexities:?}");
    Ok(Arrangement {
        id,
        techniques,
        complexities,
    })
}

impl Arrangement {
    fn technique_at(&self, step: usize) -> Technique {
        self.techniques[(step - 1) / self.complexities.len()]
    }

    fn complexity_at(&self, step: usize) -> Complexity {
        self.complexities[(step - 1) % self.complexities.len()]
    }

    pub fn step(&self, step: usize) -> Result<Step, AssignError> {
        check_step(step)?;
        Ok(Step {
            id: step,
            technique: self.technique_at(step),
            complexity: self.complexity_at(step),
        })
    }

    /// All six steps in order
    pub fn steps(&self) -> Vec<Step> {
        (1..=STEP_COUNT)
            .map(|step| Step {
                id: step,
                technique: self.technique_at(step),
                complexity: self.complexity_at(step),
            })
            .collect()
    }
}

fn check_step(step: usize) -> Result<(), AssignError> {
    if (1..=STEP_COUNT).contains(&step) {
        Ok(())
    } else {
        Err(AssignError::StepOutOfRange(step))
    }
}

pub fn resolve_step(id: usize, step: usize) -> Result<Step, AssignError> {
    check_step(step)?;
    resolve_arrangement(id)?.step(step)
}

/// Comma separated step numbers that use `technique`, e.g. `"1,2,3"`.
///
/// Survey embedded data consumes this as a delimited string.
pub fn steps_for_technique(id: usize, technique: Technique) -> Result<String, AssignError> {
    let arrangement = resolve_arrangement(id)?;
    Ok((1..=STEP_COUNT)
        .filter(|&step| arrangement.technique_at(step) == technique)
        .join(","))
}

pub fn text_ui_steps(id: usize) -> Result<String, AssignError> {
    steps_for_technique(id, TECHNIQUES[0])
}

pub fn button_ui_steps(id: usize) -> Result<String, AssignError> {
    steps_for_technique(id, TECHNIQUES[1])
}

pub fn date_select_for(index: usize) -> Result<DateSelect, AssignError> {
    index
        .checked_sub(1)
        .and_then(|i| DATE_SELECTS.get(i))
        .copied()
        .ok_or(AssignError::DateSelectOutOfRange(index))
}

/// Every arrangement/step pairing, arrangement-major
pub fn schedule() -> Vec<ScheduleRow> {
    (1..=ARRANGEMENT_COUNT)
        .filter_map(|id| resolve_arrangement(id).ok())
        .flat_map(|arrangement| {
            let id = arrangement.id;
            arrangement
                .steps()
                .into_iter()
                .map(move |step| ScheduleRow {
                    arrangement: id,
                    step: step.id,
                    technique: step.technique,
                    complexity: step.complexity,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    #[test]
    fn test_first_arrangement() {
        let a = resolve_arrangement(1).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(a.techniques, vec![Technique::Tui, Technique::Button]);
        assert_eq!(
            a.complexities,
            vec![Complexity::Low, Complexity::Med, Complexity::High]
        );
    }

    #[test]
    fn test_seventh_arrangement_flips_techniques() {
        let a = resolve_arrangement(7).unwrap();
        assert_eq!(a.techniques, vec![Technique::Button, Technique::Tui]);
        assert_eq!(
            a.complexities,
            vec![Complexity::Low, Complexity::Med, Complexity::High]
        );
    }

    #[test]
    fn test_last_arrangement() {
        let a = resolve_arrangement(12).unwrap();
        assert_eq!(a.techniques, vec![Technique::Button, Technique::Tui]);
        assert_eq!(
            a.complexities,
            vec![Complexity::High, Complexity::Med, Complexity::Low]
        );
    }

    #[test]
    fn test_all_arrangements_distinct() {
        let seen: HashSet<(Vec<Technique>, Vec<Complexity>)> = (1..=ARRANGEMENT_COUNT)
            .map(|id| {
                let a = resolve_arrangement(id).unwrap();
                (a.techniques, a.complexities)
            })
            .collect();
        assert_eq!(seen.len(), ARRANGEMENT_COUNT);
    }

    #[test]
    fn test_arrangement_is_stable() {
        for id in 1..=ARRANGEMENT_COUNT {
            assert_eq!(resolve_arrangement(id), resolve_arrangement(id));
        }
    }

    #[test]
    fn test_arrangement_out_of_range() {
        assert_matches!(
            resolve_arrangement(0),
            Err(AssignError::ArrangementOutOfRange(0))
        );
        assert_matches!(
            resolve_arrangement(13),
            Err(AssignError::ArrangementOutOfRange(13))
        );
    }

    #[test]
    fn test_steps_split_into_technique_blocks() {
        for id in 1..=ARRANGEMENT_COUNT {
            let a = resolve_arrangement(id).unwrap();
            for step in 1..=STEP_COUNT {
                let s = resolve_step(id, step).unwrap();
                assert_eq!(s.id, step);
                let block = (step - 1) / 3;
                assert_eq!(s.technique, a.techniques[block]);
                assert_eq!(s.complexity, a.complexities[(step - 1) % 3]);
            }
        }
    }

    #[test]
    fn test_resolve_step_example() {
        let s = resolve_step(2, 5).unwrap();
        // arrangement 2: [tui, button] x [med, low, high]
        assert_eq!(s.technique, Technique::Button);
        assert_eq!(s.complexity, Complexity::Low);
    }

    #[test]
    fn test_resolve_step_out_of_range() {
        assert_matches!(resolve_step(1, 0), Err(AssignError::StepOutOfRange(0)));
        assert_matches!(resolve_step(1, 7), Err(AssignError::StepOutOfRange(7)));
        assert_matches!(
            resolve_step(99, 1),
            Err(AssignError::ArrangementOutOfRange(99))
        );
    }

    #[test]
    fn test_steps_for_technique() {
        assert_eq!(steps_for_technique(1, Technique::Tui).unwrap(), "1,2,3");
        assert_eq!(steps_for_technique(1, Technique::Button).unwrap(), "4,5,6");
        assert_eq!(steps_for_technique(12, Technique::Tui).unwrap(), "4,5,6");
        assert_eq!(text_ui_steps(8).unwrap(), "4,5,6");
        assert_eq!(button_ui_steps(8).unwrap(), "1,2,3");
    }

    #[test]
    fn test_steps_for_technique_out_of_range() {
        assert_matches!(
            steps_for_technique(13, Technique::Tui),
            Err(AssignError::ArrangementOutOfRange(13))
        );
    }

    #[test]
    fn test_date_select_for() {
        assert_eq!(date_select_for(1).unwrap(), DateSelect::Calendar);
        assert_eq!(date_select_for(2).unwrap(), DateSelect::Dropdown);
        assert_matches!(date_select_for(0), Err(AssignError::DateSelectOutOfRange(0)));
        assert_matches!(date_select_for(3), Err(AssignError::DateSelectOutOfRange(3)));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Technique::Tui.to_string(), "tui");
        assert_eq!(Complexity::High.to_string(), "high");
        assert_eq!(DateSelect::Dropdown.to_string(), "dropdown");
    }

    #[test]
    fn test_schedule_covers_every_pairing() {
        let rows = schedule();
        assert_eq!(rows.len(), ARRANGEMENT_COUNT * STEP_COUNT);
        assert_eq!(
            rows[0],
            ScheduleRow {
                arrangement: 1,
                step: 1,
                technique: Technique::Tui,
                complexity: Complexity::Low,
            }
        );
        for id in 1..=ARRANGEMENT_COUNT {
            let pairs: HashSet<(Technique, Complexity)> = rows
                .iter()
                .filter(|r| r.arrangement == id)
                .map(|r| (r.technique, r.complexity))
                .collect();
            assert_eq!(pairs.len(), STEP_COUNT);
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AssignError::ArrangementOutOfRange(40).to_string(),
            "arrangement id 40 is out of range (expected 1..=12)"
        );
    }
}
