//! Smart recommendation rules.
//!
//! A fixed catalogue of actions keyed off the combined model output for one
//! lead. Several rules may fire for the same lead; each firing produces one
//! recommendation. The cross-lead ordering is applied by the aggregator.

use crate::models::{ChurnLabel, LeadScoreResult, PriorityTier, Recommendation, Segment};
use std::cmp::Ordering;

fn recommend(result: &LeadScoreResult, action: &str, priority: u8, rationale: String) -> Recommendation {
    Recommendation {
        lead_id: result.lead_id,
        company: result.company.clone(),
        action: action.to_string(),
        priority,
        rationale,
    }
}

/// Applies the rule catalogue to one scored lead.
pub fn recommendations_for(result: &LeadScoreResult) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    match result.segment {
        Segment::AtRisk => {
            recs.push(recommend(
                result,
                "Immediate re-engagement call",
                95,
                format!(
                    "High-value lead at risk: score {:.1} with churn probability {:.2}",
                    result.score, result.churn_probability
                ),
            ));
        }
        Segment::Champion => {
            recs.push(recommend(
                result,
                "Schedule executive meeting",
                90,
                format!(
                    "Champion lead scoring {:.1} with low churn risk; push toward close",
                    result.score
                ),
            ));
        }
        Segment::Dormant => {
            recs.push(recommend(
                result,
                "Move to long-term nurture track",
                40,
                format!(
                    "Dormant lead scoring {:.1}; no recent activity to justify active outreach",
                    result.score
                ),
            ));
        }
        Segment::Nurture => {
            recs.push(recommend(
                result,
                "Enroll in nurture campaign",
                60,
                format!(
                    "Mid-funnel lead scoring {:.1}; steady touchpoints keep it progressing",
                    result.score
                ),
            ));
        }
    }

    // Cross-cutting rules on top of the segment action.
    if result.churn_label == ChurnLabel::High && result.segment != Segment::AtRisk {
        recs.push(recommend(
            result,
            "Send win-back offer",
            85,
            format!(
                "Churn probability {:.2} crosses the high-risk threshold",
                result.churn_probability
            ),
        ));
    }

    if result.priority_tier == PriorityTier::Hot && result.churn_label == ChurnLabel::Low {
        recs.push(recommend(
            result,
            "Send proposal",
            80,
            format!(
                "Hot lead (score {:.1}) with low churn risk is ready for a proposal",
                result.score
            ),
        ));
    }

    recs
}

/// Global recommendation order: priority descending, then the owning lead's
/// score descending, then lead id ascending.
pub fn global_order(
    a: &(Recommendation, f64),
    b: &(Recommendation, f64),
) -> Ordering {
    b.0.priority
        .cmp(&a.0.priority)
        .then_with(|| b.1.total_cmp(&a.1))
        .then_with(|| a.0.lead_id.cmp(&b.0.lead_id))
}
