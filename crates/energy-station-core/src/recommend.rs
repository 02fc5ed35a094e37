//! Rule-based practice recommendations from the energy self-assessment.
//!
//! The first matching rule wins:
//!
//! | rule | set |
//! |---|---|
//! | energy ≤ 2 | low energy |
//! | stress ≥ 4 | high stress |
//! | mood ≤ 2 | low mood |
//! | otherwise | balanced |

use serde::{Deserialize, Serialize};

use crate::content::ContentKind;
use crate::error::ValidationError;

/// At most this many recommendations are shown.
pub const MAX_RECOMMENDATIONS: usize = 4;

/// Self-assessment answers, each on a 1..=5 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub energy_level: Option<u8>,
    pub stress_level: Option<u8>,
    pub mood_state: Option<u8>,
}

impl Assessment {
    pub fn new(energy_level: u8, stress_level: u8, mood_state: u8) -> Self {
        Self {
            energy_level: Some(energy_level),
            stress_level: Some(stress_level),
            mood_state: Some(mood_state),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.energy_level.is_some() && self.stress_level.is_some() && self.mood_state.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Need {
    LowEnergy,
    HighStress,
    LowMood,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub content_id: String,
    pub kind: ContentKind,
    pub title: String,
    pub description: String,
    pub duration_label: String,
    pub difficulty: String,
}

impl Recommendation {
    pub fn route(&self) -> String {
        self.kind.route_for(&self.content_id)
    }
}

/// Pick the rule that applies to a complete assessment.
///
/// # Errors
///
/// Rejects incomplete assessments and answers outside 1..=5.
pub fn classify(assessment: &Assessment) -> Result<Need, ValidationError> {
    let energy = answer("energy_level", assessment.energy_level)?;
    let stress = answer("stress_level", assessment.stress_level)?;
    let mood = answer("mood_state", assessment.mood_state)?;

    Ok(if energy <= 2 {
        Need::LowEnergy
    } else if stress >= 4 {
        Need::HighStress
    } else if mood <= 2 {
        Need::LowMood
    } else {
        Need::Balanced
    })
}

/// Recommendations for a complete assessment.
pub fn recommend(assessment: &Assessment) -> Result<Vec<Recommendation>, ValidationError> {
    let need = classify(assessment)?;
    let mut picks = recommendations_for(need);
    picks.truncate(MAX_RECOMMENDATIONS);
    Ok(picks)
}

fn answer(field: &str, value: Option<u8>) -> Result<u8, ValidationError> {
    match value {
        Some(v @ 1..=5) => Ok(v),
        Some(v) => Err(ValidationError::invalid(
            field,
            format!("expected 1..=5, got {v}"),
        )),
        None => Err(ValidationError::invalid(field, "not answered")),
    }
}

fn recommendations_for(need: Need) -> Vec<Recommendation> {
    let rec = |id: &str, kind, title: &str, description: &str, duration: &str, difficulty: &str| {
        Recommendation {
            content_id: id.into(),
            kind,
            title: title.into(),
            description: description.into(),
            duration_label: duration.into(),
            difficulty: difficulty.into(),
        }
    };
    match need {
        Need::LowEnergy => vec![
            rec("meditation_001", ContentKind::Meditation, "晨间唤醒冥想", "帮助你快速提升能量，开启美好一天", "10分钟", "初学者"),
            rec("breathing_002", ContentKind::Breathing, "活力呼吸法", "提升氧气摄入，快速恢复活力", "5分钟", "所有人"),
        ],
        Need::HighStress => vec![
            rec("meditation_002", ContentKind::Meditation, "压力释放冥想", "深度放松，释放身心压力", "20分钟", "初学者"),
            rec("whitenoise_001", ContentKind::WhiteNoise, "森林白噪音", "宁静的森林声音，帮助放松心情", "60分钟", "所有人"),
        ],
        Need::LowMood => vec![
            rec("mindfulness_001", ContentKind::Mindfulness, "感恩正念练习", "培养感恩心态，提升积极情绪", "15分钟", "初学者"),
            rec("meditation_003", ContentKind::Meditation, "自我关怀冥想", "学会关爱自己，提升内在力量", "12分钟", "初学者"),
        ],
        Need::Balanced => vec![
            rec("meditation_004", ContentKind::Meditation, "专注力冥想", "提升专注力，保持内心平静", "15分钟", "进阶"),
            rec("mindfulness_002", ContentKind::Mindfulness, "正念行走指南", "在行走中体验当下的力量", "12分钟", "进阶"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_energy_wins_over_everything() {
        assert_eq!(classify(&Assessment::new(1, 5, 1)).unwrap(), Need::LowEnergy);
    }

    #[test]
    fn stress_checked_before_mood() {
        assert_eq!(classify(&Assessment::new(3, 4, 1)).unwrap(), Need::HighStress);
        assert_eq!(classify(&Assessment::new(3, 3, 2)).unwrap(), Need::LowMood);
        assert_eq!(classify(&Assessment::new(5, 1, 5)).unwrap(), Need::Balanced);
    }

    #[test]
    fn incomplete_assessment_is_rejected() {
        let partial = Assessment {
            energy_level: Some(3),
            ..Assessment::default()
        };
        assert!(!partial.is_complete());
        assert!(recommend(&partial).is_err());
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        assert!(classify(&Assessment::new(0, 3, 3)).is_err());
        assert!(classify(&Assessment::new(3, 6, 3)).is_err());
    }

    #[test]
    fn recommendations_route_by_kind() {
        let picks = recommend(&Assessment::new(3, 5, 3)).unwrap();
        assert!(picks.len() <= MAX_RECOMMENDATIONS);
        assert_eq!(picks[1].route(), "/p-white_noise_detail?content_id=whitenoise_001");
    }
}
