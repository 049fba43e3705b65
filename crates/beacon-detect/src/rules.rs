use std::fmt;
use std::str::FromStr;

use beacon_classify::ShapeLabel;
use serde::{Deserialize, Serialize};

use crate::error::ParseModeError;

/// Constraint on the immediate child contour of a nested rule.
///
/// Unlike the parent's `color_prefix`, the child color is matched by exact
/// name. The asymmetry is observed behavior of the reference pipeline and is
/// kept as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChildConstraint {
    pub shape: ShapeLabel,
    pub color: String,
}

/// One labeled detection rule.
///
/// A rule without a child constraint is *flat*: the candidate itself must
/// match `shape` and its color name must start with `color_prefix`. A rule
/// with a child constraint is *nested* and additionally requires an unused
/// immediate child contour satisfying [`ChildConstraint`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionRule {
    pub label: String,
    pub shape: ShapeLabel,
    pub color_prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<ChildConstraint>,
}

impl DetectionRule {
    pub fn flat(label: &str, shape: ShapeLabel, color_prefix: &str) -> Self {
        Self {
            label: label.to_string(),
            shape,
            color_prefix: color_prefix.to_string(),
            child: None,
        }
    }

    pub fn nested(
        label: &str,
        shape: ShapeLabel,
        color_prefix: &str,
        child_shape: ShapeLabel,
        child_color: &str,
    ) -> Self {
        Self {
            label: label.to_string(),
            shape,
            color_prefix: color_prefix.to_string(),
            child: Some(ChildConstraint {
                shape: child_shape,
                color: child_color.to_string(),
            }),
        }
    }

    #[inline]
    pub fn is_nested(&self) -> bool {
        self.child.is_some()
    }
}

/// The closed set of detection modes, each resolving to an ordered rule list.
///
/// Rules are evaluated in list order; the first satisfied rule wins for a
/// given contour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    ObjectIndoor,
    DropIndoor,
    ExitGate,
    DropOutdoor,
    FinishStartRight,
    FinishStartLeft,
}

impl DetectionMode {
    pub const ALL: [DetectionMode; 6] = [
        Self::ObjectIndoor,
        Self::DropIndoor,
        Self::ExitGate,
        Self::DropOutdoor,
        Self::FinishStartRight,
        Self::FinishStartLeft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectIndoor => "object_indoor",
            Self::DropIndoor => "drop_indoor",
            Self::ExitGate => "exit_gate",
            Self::DropOutdoor => "drop_outdoor",
            Self::FinishStartRight => "finish_start_right",
            Self::FinishStartLeft => "finish_start_left",
        }
    }

    /// Ordered rule list for this mode.
    pub fn rules(&self) -> Vec<DetectionRule> {
        match self {
            Self::ObjectIndoor => vec![DetectionRule::flat(
                "Object indoor",
                ShapeLabel::Circle,
                "orange",
            )],
            Self::DropIndoor => vec![DetectionRule::flat(
                "Drop indoor",
                ShapeLabel::Circle,
                "red",
            )],
            Self::ExitGate => vec![DetectionRule::flat(
                "Exit Gate",
                ShapeLabel::Rectangle,
                "orange",
            )],
            Self::DropOutdoor => vec![DetectionRule::nested(
                "Drop outdoor",
                ShapeLabel::Square,
                "orange",
                ShapeLabel::Circle,
                "white",
            )],
            Self::FinishStartRight => vec![DetectionRule::flat(
                "Finish Start Right",
                ShapeLabel::Square,
                "blue",
            )],
            Self::FinishStartLeft => vec![DetectionRule::flat(
                "Finish Start Left",
                ShapeLabel::Square,
                "red",
            )],
        }
    }
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_has_rules() {
        for mode in DetectionMode::ALL {
            assert!(!mode.rules().is_empty(), "{mode} has no rules");
        }
    }

    #[test]
    fn drop_outdoor_is_the_only_nested_mode() {
        for mode in DetectionMode::ALL {
            let nested = mode.rules().iter().any(DetectionRule::is_nested);
            assert_eq!(nested, mode == DetectionMode::DropOutdoor);
        }
    }

    #[test]
    fn mode_names_round_trip() {
        for mode in DetectionMode::ALL {
            assert_eq!(mode.as_str().parse::<DetectionMode>().unwrap(), mode);
        }
        let err = "drop_o".parse::<DetectionMode>().unwrap_err();
        assert_eq!(err, ParseModeError("drop_o".to_string()));
    }

    #[test]
    fn mode_serde_uses_snake_case() {
        let json = serde_json::to_string(&DetectionMode::FinishStartLeft).unwrap();
        assert_eq!(json, "\"finish_start_left\"");
    }

    #[test]
    fn rule_serde_omits_absent_child() {
        let rule = DetectionRule::flat("Exit Gate", ShapeLabel::Rectangle, "orange");
        let json = serde_json::to_string(&rule).unwrap();
        assert!(!json.contains("child"));
        let back: DetectionRule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }
}
