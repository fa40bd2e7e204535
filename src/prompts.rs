//! Prompt assembly and marker-token parsing.
//!
//! Every instruction prompt the router sends, and every marker it scans for
//! in replies, lives here. Marker parsing is a best-effort adapter over
//! free-text model output: each parser has an explicit fallback and can
//! never fail the pipeline.

use crate::routing::{Intent, SpecialistKind};
use crate::session::Escalation;

/// Marker the greeter must emit in front of the classified label.
pub const INTENT_MARKER: &str = "INTENT:";
/// Reviewer disposition markers, one per line-leading token.
pub const APPROVED_MARKER: &str = "APPROVED:";
pub const NEEDS_REVISION_MARKER: &str = "NEEDS_REVISION:";
pub const ESCALATE_MARKER: &str = "ESCALATE:";

/// Contact block handed to the escalation coordinator.
const CONTACT_BLOCK: &str = "Phone: +254 730 116 000\n\
Email: support@usiu.ac.ke\n\
Hours: Mon-Fri 8AM-5PM";

/// Instruction prompt for the greeter/classifier step.
#[must_use]
pub fn greeter(query: &str) -> String {
    format!(
        "You are the greeter for the university's student support desk.\n\
         \n\
         Your responsibilities:\n\
         1. Warmly welcome the student\n\
         2. Classify their inquiry into exactly ONE category: academic, finance, \
         student_life, it_support, general, or unclear\n\
         3. Ask a clarifying question if the intent is unclear\n\
         \n\
         Student query: {query}\n\
         \n\
         Respond warmly, then report the classification on its own line as:\n\
         {INTENT_MARKER} <category>"
    )
}

/// Instruction prompt for one of the four specialist steps.
///
/// `knowledge` is the pretty-printed category subtree, embedded verbatim.
#[must_use]
pub fn specialist(kind: SpecialistKind, knowledge: &str, query: &str) -> String {
    let (title, topics, guidance) = match kind {
        SpecialistKind::AcademicAdvisor => (
            "academic advisor",
            "course registration, course information, academic requirements, GPA calculation, deadlines",
            "If the knowledge base does not cover something, say so and suggest contacting the registrar's office.",
        ),
        SpecialistKind::Finance => (
            "finance specialist",
            "tuition fees, payment methods, scholarships, financial aid, payment deadlines",
            "For account-specific inquiries, direct the student to the finance office.",
        ),
        SpecialistKind::StudentLife => (
            "student life specialist",
            "housing, student clubs, campus events, facilities, student activities",
            "Keep it engaging and encourage the student to get involved.",
        ),
        SpecialistKind::ItSupport => (
            "IT support specialist",
            "student portal access, email issues, WiFi connectivity, password resets",
            "Give clear step-by-step guidance; for complex faults, direct the student to the IT helpdesk.",
        ),
    };
    format!(
        "You are the {title} for the university's student support desk.\n\
         You help with: {topics}.\n\
         \n\
         Knowledge base:\n\
         {knowledge}\n\
         \n\
         Student query: {query}\n\
         \n\
         Answer accurately from the knowledge base. {guidance}"
    )
}

/// Instruction prompt for the quality review step.
#[must_use]
pub fn reviewer(query: &str, last_reply: &str) -> String {
    format!(
        "You are the quality reviewer for the university's student support desk.\n\
         \n\
         Review the response below for:\n\
         1. Accuracy against the desk's knowledge base\n\
         2. Completeness (addresses the student's query)\n\
         3. Tone (professional yet friendly)\n\
         4. Actionability (clear next steps where needed)\n\
         \n\
         Original query: {query}\n\
         Response to review: {last_reply}\n\
         \n\
         Reply with exactly one disposition line:\n\
         {APPROVED_MARKER} <reason>\n\
         {NEEDS_REVISION_MARKER} <specific feedback>\n\
         {ESCALATE_MARKER} <reason it needs human intervention>"
    )
}

/// Instruction prompt for the escalation hand-off step.
#[must_use]
pub fn escalation(reason: &str, case_ref: &str) -> String {
    format!(
        "You are the escalation coordinator for the university's student support desk.\n\
         A case requires human intervention.\n\
         \n\
         Reason: {reason}\n\
         Case reference: {case_ref}\n\
         \n\
         Provide the student with:\n\
         1. Acknowledgment of their inquiry\n\
         2. Contact information for human assistance\n\
         3. Expected response time\n\
         4. The case reference for follow-up\n\
         \n\
         Contact information:\n\
         {CONTACT_BLOCK}\n\
         Expected response time: within 2 business days"
    )
}

/// Scans a greeter reply for the first line carrying the intent marker and
/// parses the remainder as a label.
///
/// `None` on a missing marker or unrecognized label; the greeter then
/// defaults to [`Intent::General`].
#[must_use]
pub fn parse_intent(reply: &str) -> Option<Intent> {
    let line = reply.lines().find(|line| line.contains(INTENT_MARKER))?;
    let (_, label) = line.split_once(INTENT_MARKER)?;
    Intent::from_label(label)
}

/// The three dispositions a review reply can carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReviewDisposition {
    Approved,
    NeedsRevision,
    Escalate(Escalation),
}

/// Classifies a reviewer reply by its marker tokens.
///
/// The escalation marker wins outright: its presence escalates with the rest
/// of that line as the reason, and its absence means no escalation even when
/// revision feedback is present. A reply with no marker at all counts as
/// approved.
///
/// ```
/// use campus_desk::prompts::{ReviewDisposition, parse_review};
///
/// let verdict = parse_review("ESCALATE: case too complex");
/// match verdict {
///     ReviewDisposition::Escalate(escalation) => {
///         assert_eq!(escalation.reason(), "case too complex");
///     }
///     other => panic!("unexpected disposition: {other:?}"),
/// }
/// assert_eq!(parse_review("looks fine to me"), ReviewDisposition::Approved);
/// ```
#[must_use]
pub fn parse_review(reply: &str) -> ReviewDisposition {
    if let Some(line) = reply.lines().find(|line| line.contains(ESCALATE_MARKER)) {
        let reason = line
            .split_once(ESCALATE_MARKER)
            .map_or("", |(_, rest)| rest.trim());
        return ReviewDisposition::Escalate(Escalation::new(reason));
    }
    if reply.lines().any(|line| line.contains(NEEDS_REVISION_MARKER)) {
        return ReviewDisposition::NeedsRevision;
    }
    ReviewDisposition::Approved
}
