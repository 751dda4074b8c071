//! Scene classification into motion and interaction categories.
//!
//! Readers tag every scene with a list of integer codes: position 0 is the
//! motion type of the primary agent and the remaining codes are the
//! interaction types present in the scene. Both taxonomies reuse the codes
//! 1..=4 with unrelated meanings, so they are decoded into two distinct enums
//! here and never compared as raw integers elsewhere.

use serde::{Deserialize, Serialize};

/// Common behaviour of the two category taxonomies.
pub trait Category: Copy + Eq + std::fmt::Debug + 'static {
    /// Every category of the taxonomy, in code order.
    const ALL: [Self; 4];

    /// Decode a raw tag code (1..=4).
    fn from_code(code: u32) -> Option<Self>;

    /// Raw tag code (1..=4).
    fn code(self) -> u32;

    /// Short display name.
    fn name(self) -> &'static str;

    /// Zero-based position in `ALL`.
    fn index(self) -> usize {
        self.code() as usize - 1
    }
}

/// Motion type of the primary agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MainCategory {
    Static,
    Linear,
    ForcedNonLinear,
    NonLinear,
}

impl Category for MainCategory {
    const ALL: [Self; 4] = [
        MainCategory::Static,
        MainCategory::Linear,
        MainCategory::ForcedNonLinear,
        MainCategory::NonLinear,
    ];

    fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(MainCategory::Static),
            2 => Some(MainCategory::Linear),
            3 => Some(MainCategory::ForcedNonLinear),
            4 => Some(MainCategory::NonLinear),
            _ => None,
        }
    }

    fn code(self) -> u32 {
        match self {
            MainCategory::Static => 1,
            MainCategory::Linear => 2,
            MainCategory::ForcedNonLinear => 3,
            MainCategory::NonLinear => 4,
        }
    }

    fn name(self) -> &'static str {
        match self {
            MainCategory::Static => "static",
            MainCategory::Linear => "linear",
            MainCategory::ForcedNonLinear => "forced_non_linear",
            MainCategory::NonLinear => "non_linear",
        }
    }
}

/// Social interaction observed in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InteractionCategory {
    LeaderFollower,
    CollisionAvoidance,
    Group,
    Other,
}

impl Category for InteractionCategory {
    const ALL: [Self; 4] = [
        InteractionCategory::LeaderFollower,
        InteractionCategory::CollisionAvoidance,
        InteractionCategory::Group,
        InteractionCategory::Other,
    ];

    fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(InteractionCategory::LeaderFollower),
            2 => Some(InteractionCategory::CollisionAvoidance),
            3 => Some(InteractionCategory::Group),
            4 => Some(InteractionCategory::Other),
            _ => None,
        }
    }

    fn code(self) -> u32 {
        match self {
            InteractionCategory::LeaderFollower => 1,
            InteractionCategory::CollisionAvoidance => 2,
            InteractionCategory::Group => 3,
            InteractionCategory::Other => 4,
        }
    }

    fn name(self) -> &'static str {
        match self {
            InteractionCategory::LeaderFollower => "leader_follower",
            InteractionCategory::CollisionAvoidance => "collision_avoidance",
            InteractionCategory::Group => "group",
            InteractionCategory::Other => "other",
        }
    }
}

/// Raw tag codes attached to a scene by the reader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneTag {
    /// Motion code of the primary agent (0 when untagged).
    pub main: u32,
    /// Interaction codes, in any order, possibly repeated.
    #[serde(default)]
    pub interactions: Vec<u32>,
}

impl SceneTag {
    /// Create a tag from raw codes.
    pub fn new(main: u32, interactions: Vec<u32>) -> Self {
        Self { main, interactions }
    }

    /// A tag that belongs to no category.
    pub fn untagged() -> Self {
        Self::default()
    }

    /// Create a tag from decoded categories.
    pub fn from_categories(main: MainCategory, interactions: &[InteractionCategory]) -> Self {
        Self {
            main: main.code(),
            interactions: interactions.iter().map(|c| c.code()).collect(),
        }
    }
}

/// Categories a scene belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Motion category, `None` for untagged scenes.
    pub main: Option<MainCategory>,
    /// Interaction categories in code order, without duplicates.
    pub interactions: Vec<InteractionCategory>,
}

impl Classification {
    /// Whether the scene belongs to neither taxonomy.
    pub fn is_untagged(&self) -> bool {
        self.main.is_none() && self.interactions.is_empty()
    }
}

/// Resolve the categories of a scene from its tag codes.
///
/// Unknown codes are ignored, so a scene with an unrecognised main code is
/// still counted in the overall aggregates but in no motion category.
pub fn classify(tag: &SceneTag) -> Classification {
    let main = MainCategory::from_code(tag.main);
    let interactions = InteractionCategory::ALL
        .iter()
        .copied()
        .filter(|category| tag.interactions.contains(&category.code()))
        .collect();

    Classification { main, interactions }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for category in MainCategory::ALL {
            assert_eq!(MainCategory::from_code(category.code()), Some(category));
        }
        for category in InteractionCategory::ALL {
            assert_eq!(InteractionCategory::from_code(category.code()), Some(category));
        }
        assert_eq!(MainCategory::from_code(0), None);
        assert_eq!(InteractionCategory::from_code(5), None);
    }

    #[test]
    fn test_index_matches_position_in_all() {
        for (i, category) in MainCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
        for (i, category) in InteractionCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_classify_main_and_interactions() {
        let tag = SceneTag::new(3, vec![4, 1]);
        let classification = classify(&tag);

        assert_eq!(classification.main, Some(MainCategory::ForcedNonLinear));
        assert_eq!(
            classification.interactions,
            vec![InteractionCategory::LeaderFollower, InteractionCategory::Other]
        );
    }

    #[test]
    fn test_classify_same_code_means_different_things() {
        // Code 2 is "linear" as a main tag and "collision avoidance" as a sub tag
        let classification = classify(&SceneTag::new(2, vec![2]));
        assert_eq!(classification.main, Some(MainCategory::Linear));
        assert_eq!(classification.interactions, vec![InteractionCategory::CollisionAvoidance]);
    }

    #[test]
    fn test_classify_untagged() {
        let classification = classify(&SceneTag::untagged());
        assert!(classification.is_untagged());
    }

    #[test]
    fn test_classify_ignores_duplicates_and_unknown_codes() {
        let classification = classify(&SceneTag::new(9, vec![3, 3, 0, 7]));
        assert_eq!(classification.main, None);
        assert_eq!(classification.interactions, vec![InteractionCategory::Group]);
        assert!(!classification.is_untagged());
    }

    #[test]
    fn test_from_categories() {
        let tag = SceneTag::from_categories(
            MainCategory::NonLinear,
            &[InteractionCategory::Group, InteractionCategory::LeaderFollower],
        );
        assert_eq!(tag, SceneTag::new(4, vec![3, 1]));
    }
}
