//! The fixed set of crowd behaviour classes the classifier was trained on.

use serde::{Deserialize, Serialize};

/// One anomaly class. Declaration order is the model's output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyLabel {
    DiffDirection,
    NonPedestrian,
    OppDirection,
    Running,
    Sitting,
    Sleeping,
    Standing,
}

impl AnomalyLabel {
    /// All labels in model output order.
    pub const ALL: [AnomalyLabel; 7] = [
        AnomalyLabel::DiffDirection,
        AnomalyLabel::NonPedestrian,
        AnomalyLabel::OppDirection,
        AnomalyLabel::Running,
        AnomalyLabel::Sitting,
        AnomalyLabel::Sleeping,
        AnomalyLabel::Standing,
    ];

    /// Number of classifier outputs.
    pub const COUNT: usize = Self::ALL.len();

    /// Class name as used in the training set.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyLabel::DiffDirection => "Diff_Direction",
            AnomalyLabel::NonPedestrian => "Non_Pedestrian",
            AnomalyLabel::OppDirection => "Opp_Direction",
            AnomalyLabel::Running => "Running",
            AnomalyLabel::Sitting => "Sitting",
            AnomalyLabel::Sleeping => "Sleeping",
            AnomalyLabel::Standing => "Standing",
        }
    }

    /// Label for result tables.
    pub fn display_name(&self) -> &'static str {
        match self {
            AnomalyLabel::DiffDirection => "Different direction",
            AnomalyLabel::NonPedestrian => "Non-pedestrian",
            AnomalyLabel::OppDirection => "Opposite direction",
            AnomalyLabel::Running => "Running",
            AnomalyLabel::Sitting => "Sitting",
            AnomalyLabel::Sleeping => "Sleeping",
            AnomalyLabel::Standing => "Standing",
        }
    }

    /// Label at a model output index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for AnomalyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_order() {
        let names: Vec<&str> = AnomalyLabel::ALL.iter().map(|l| l.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Diff_Direction",
                "Non_Pedestrian",
                "Opp_Direction",
                "Running",
                "Sitting",
                "Sleeping",
                "Standing"
            ]
        );
        assert_eq!(AnomalyLabel::COUNT, 7);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(AnomalyLabel::from_index(3), Some(AnomalyLabel::Running));
        assert_eq!(AnomalyLabel::from_index(7), None);
    }
}
