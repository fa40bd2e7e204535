//! Intent labels, specialist dispatch, and the stage machine.
//!
//! This is the whole control-flow core: a total function from classified
//! intent to specialist, and a sum type over the pipeline's stages with a
//! pure transition function. There are no hidden edges — everything the
//! router can do next is readable from [`Stage::next`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RouterConfig;
use crate::knowledge::Category;
use crate::session::Session;

/// The classification labels the greeter may assign to a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Academic,
    Finance,
    StudentLife,
    ItSupport,
    General,
    Unclear,
}

impl Intent {
    /// Parses a label as produced after the `INTENT:` marker.
    ///
    /// Matching is case-insensitive and whitespace-tolerant; anything outside
    /// the fixed label set yields `None` and the caller falls back to
    /// [`Intent::General`].
    ///
    /// ```
    /// use campus_desk::routing::Intent;
    ///
    /// assert_eq!(Intent::from_label(" Student_Life "), Some(Intent::StudentLife));
    /// assert_eq!(Intent::from_label("astrology"), None);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "academic" => Some(Intent::Academic),
            "finance" => Some(Intent::Finance),
            "student_life" => Some(Intent::StudentLife),
            "it_support" => Some(Intent::ItSupport),
            "general" => Some(Intent::General),
            "unclear" => Some(Intent::Unclear),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Academic => "academic",
            Intent::Finance => "finance",
            Intent::StudentLife => "student_life",
            Intent::ItSupport => "it_support",
            Intent::General => "general",
            Intent::Unclear => "unclear",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four mutually-exclusive domain specialists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialistKind {
    AcademicAdvisor,
    Finance,
    StudentLife,
    ItSupport,
}

impl SpecialistKind {
    /// The sole routing decision point: intent label → specialist.
    ///
    /// Total by construction — `general`, `unclear`, and an unset intent all
    /// fall back to the academic advisor, so no label can ever leave a query
    /// unrouted.
    ///
    /// ```
    /// use campus_desk::routing::{Intent, SpecialistKind};
    ///
    /// assert_eq!(
    ///     SpecialistKind::for_intent(Some(Intent::Finance)),
    ///     SpecialistKind::Finance
    /// );
    /// assert_eq!(SpecialistKind::for_intent(None), SpecialistKind::AcademicAdvisor);
    /// ```
    #[must_use]
    pub fn for_intent(intent: Option<Intent>) -> Self {
        match intent {
            Some(Intent::Finance) => SpecialistKind::Finance,
            Some(Intent::StudentLife) => SpecialistKind::StudentLife,
            Some(Intent::ItSupport) => SpecialistKind::ItSupport,
            Some(Intent::Academic) | Some(Intent::General) | Some(Intent::Unclear) | None => {
                SpecialistKind::AcademicAdvisor
            }
        }
    }

    /// The agent name recorded on the session and in events.
    #[must_use]
    pub fn agent_name(&self) -> &'static str {
        match self {
            SpecialistKind::AcademicAdvisor => "academic_advisor",
            SpecialistKind::Finance => "finance",
            SpecialistKind::StudentLife => "student_life",
            SpecialistKind::ItSupport => "it_support",
        }
    }

    /// The step-completion flag this specialist sets.
    #[must_use]
    pub fn completion_flag(&self) -> &'static str {
        match self {
            SpecialistKind::AcademicAdvisor => "academic_info_provided",
            SpecialistKind::Finance => "finance_info_provided",
            SpecialistKind::StudentLife => "student_life_info_provided",
            SpecialistKind::ItSupport => "it_info_provided",
        }
    }

    /// The knowledge-base category dumped into this specialist's prompt.
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            SpecialistKind::AcademicAdvisor => Category::Academic,
            SpecialistKind::Finance => Category::Finance,
            SpecialistKind::StudentLife => Category::StudentLife,
            SpecialistKind::ItSupport => Category::ItSupport,
        }
    }
}

impl fmt::Display for SpecialistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.agent_name())
    }
}

/// The pipeline stages, in the only order they can occur.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Classify,
    Specialist(SpecialistKind),
    Review,
    Escalate,
    Done,
}

impl Stage {
    /// Pure transition function over the just-merged session.
    ///
    /// The specialist → done edge fires only when the iteration counter has
    /// exceeded the configured ceiling. The documented topology cannot reach
    /// that ceiling (two steps have run by then), so the check is a guard
    /// against future topology changes, kept as an explicit invariant.
    #[must_use]
    pub fn next(&self, session: &Session, config: &RouterConfig) -> Stage {
        match self {
            Stage::Classify => Stage::Specialist(SpecialistKind::for_intent(session.intent())),
            Stage::Specialist(_) => {
                if session.iterations() > config.max_iterations {
                    Stage::Done
                } else {
                    Stage::Review
                }
            }
            Stage::Review => {
                if session.needs_human() {
                    Stage::Escalate
                } else {
                    Stage::Done
                }
            }
            Stage::Escalate | Stage::Done => Stage::Done,
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Stage::Done)
    }
}
