//! The static knowledge base collaborator.
//!
//! A read-only nested mapping of category → facts. The router dumps a whole
//! category subtree, pretty-printed, into the matching specialist's prompt —
//! there is no querying or indexing, and nothing here is persisted.

use std::fmt;
use std::sync::OnceLock;

use serde_json::{Value, json};

/// The knowledge categories, one per specialist domain plus general campus
/// information.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Academic,
    Finance,
    StudentLife,
    ItSupport,
    General,
}

impl Category {
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Category::Academic => "academic",
            Category::Finance => "finance",
            Category::StudentLife => "student_life",
            Category::ItSupport => "it_support",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Read-only topic → facts mapping for the support desk.
#[derive(Clone, Debug)]
pub struct KnowledgeBase {
    facts: Value,
}

impl KnowledgeBase {
    /// Wraps an arbitrary category → facts tree.
    #[must_use]
    pub fn new(facts: Value) -> Self {
        Self { facts }
    }

    /// The knowledge set bundled with the crate.
    #[must_use]
    pub fn bundled() -> Self {
        Self {
            facts: bundled_facts().clone(),
        }
    }

    /// Serializes one category's whole subtree for verbatim prompt embedding.
    ///
    /// An unknown category dumps as an empty object rather than failing —
    /// a thin knowledge base degrades the answer, not the pipeline.
    #[must_use]
    pub fn dump(&self, category: Category) -> String {
        self.facts
            .get(category.key())
            .and_then(|subtree| serde_json::to_string_pretty(subtree).ok())
            .unwrap_or_else(|| "{}".to_string())
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::bundled()
    }
}

fn bundled_facts() -> &'static Value {
    static FACTS: OnceLock<Value> = OnceLock::new();
    FACTS.get_or_init(|| {
        json!({
            "academic": {
                "registration": {
                    "deadlines": "Registration for Spring 2026 semester: Jan 6-17, 2026. Late registration with penalty: Jan 20-24, 2026.",
                    "process": "1. Log into student portal 2. Check cleared status 3. Select courses 4. Submit registration 5. Print confirmation",
                    "requirements": "Must have paid at least 60% of fees and have no library fines or academic holds"
                },
                "courses": {
                    "DSA 2020A": {
                        "name": "Artificial Intelligence",
                        "credits": 3,
                        "prerequisites": "DSA 1011 (Data Structures)",
                        "instructor": "Dr. Kimani",
                        "schedule": "Mon/Wed 2:00-3:30 PM, Lab: Fri 10:00-12:00"
                    },
                    "BUS 3010": {
                        "name": "Strategic Management",
                        "credits": 3,
                        "prerequisites": "BUS 2010",
                        "instructor": "Prof. Odhiambo"
                    }
                },
                "gpa": {
                    "calculation": "Grade points x credit hours, divided by total credit hours",
                    "grading_scale": "A=4.0, A-=3.7, B+=3.3, B=3.0, B-=2.7, C+=2.3, C=2.0, C-=1.7, D+=1.3, D=1.0, F=0.0"
                }
            },
            "finance": {
                "tuition": {
                    "undergraduate": "$850 per credit hour",
                    "graduate": "$950 per credit hour",
                    "payment_plans": "Available in 3 or 4 installments with approval"
                },
                "scholarships": {
                    "merit": "Academic excellence scholarship: 25-50% tuition waiver for GPA 3.5+",
                    "need_based": "Apply through financial aid office with required documents",
                    "sports": "Athletic scholarships available through sports department"
                },
                "payment_methods": "M-Pesa, bank transfer, credit card (Visa/Mastercard), or in-person at cashier"
            },
            "student_life": {
                "housing": {
                    "on_campus": "Limited spaces. Apply by Dec 15 for Spring semester. Cost: $1,200-1,800/semester",
                    "off_campus": "Housing office maintains list of verified landlords near campus"
                },
                "clubs": "60+ student clubs including Debate, Tech Club, Drama, Sports clubs. Join via student portal",
                "events": "Check the events calendar on the portal. Major events: Cultural Week (March), Career Fair (April)"
            },
            "it_support": {
                "portal": "https://portal.usiu.ac.ke - Use student ID as username. Reset password at IT helpdesk",
                "email": "Format: firstname.lastname@usiu.ac.ke - Access via Office 365",
                "wifi": "Network: USIU-Student, Password provided during orientation"
            },
            "general": {
                "contact": {
                    "phone": "+254 730 116 000",
                    "email": "admissions@usiu.ac.ke",
                    "location": "Nairobi, Kenya - Off Thika Road",
                    "hours": "Mon-Fri 8:00 AM - 5:00 PM, Sat 9:00 AM - 1:00 PM"
                },
                "semester_dates": {
                    "spring_2026": "Jan 20 - May 15, 2026",
                    "fall_2026": "Aug 25 - Dec 18, 2026"
                }
            }
        })
    })
}
