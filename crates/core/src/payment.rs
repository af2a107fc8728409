//! Manual payment gate in front of the registration question form.
//!
//! A visitor opens a gate for a form, picks a plan, opens the external
//! checkout link, and uploads a proof of payment. Only then is the gate
//! unlocked and a submission accepted. Nothing here verifies the payment:
//! the proof is a claim that an admin later marks verified or rejected.
//!
//! ```text
//! NoPlan --select--> PlanSelected --open link--> LinkOpened --proof--> Unlocked
//!                     ^    |                         |
//!                     +----+------ select -----------+
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sanitize::{clean_line, clean_url};
use crate::status::PaymentVerification;

/// Maximum plan code length.
pub const PLAN_CODE_MAX: usize = 40;

/// Maximum plan label length.
pub const PLAN_LABEL_MAX: usize = 120;

/// Maximum number of plans on one form.
pub const MAX_PLANS: usize = 20;

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// A payment option offered by a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub code: String,
    pub label: String,
    /// Amount in the smallest currency unit.
    pub amount: i64,
    pub pay_link: String,
}

/// Sanitize and validate a form's plan list. An empty list is allowed and
/// means the form has no payment gate.
pub fn validate_plans(plans: &[PaymentPlan]) -> Result<Vec<PaymentPlan>, CoreError> {
    if plans.len() > MAX_PLANS {
        return Err(CoreError::Validation(format!(
            "A form cannot offer more than {MAX_PLANS} payment plans"
        )));
    }

    let mut cleaned: Vec<PaymentPlan> = Vec::with_capacity(plans.len());
    for plan in plans {
        let code = clean_line(&plan.code, PLAN_CODE_MAX);
        if code.is_empty() {
            return Err(CoreError::Validation("Payment plan code is required".into()));
        }
        if cleaned.iter().any(|p| p.code == code) {
            return Err(CoreError::Validation(format!(
                "Duplicate payment plan code '{code}'"
            )));
        }
        let label = clean_line(&plan.label, PLAN_LABEL_MAX);
        if label.is_empty() {
            return Err(CoreError::Validation(format!(
                "Payment plan '{code}' needs a label"
            )));
        }
        if plan.amount < 0 {
            return Err(CoreError::Validation(format!(
                "Payment plan '{code}' has a negative amount"
            )));
        }
        let pay_link = clean_url(&plan.pay_link).ok_or_else(|| {
            CoreError::Validation(format!(
                "Payment plan '{code}' needs an http(s) payment link"
            ))
        })?;
        cleaned.push(PaymentPlan {
            code,
            label,
            amount: plan.amount,
            pay_link,
        });
    }
    Ok(cleaned)
}

/// Look up a plan by code.
pub fn find_plan<'a>(plans: &'a [PaymentPlan], code: &str) -> Result<&'a PaymentPlan, CoreError> {
    plans
        .iter()
        .find(|p| p.code == code.trim())
        .ok_or_else(|| CoreError::Validation(format!("Unknown payment plan '{code}'")))
}

// ---------------------------------------------------------------------------
// Gate state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    NoPlan,
    PlanSelected,
    LinkOpened,
    Unlocked,
}

impl GateState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoPlan => "no_plan",
            Self::PlanSelected => "plan_selected",
            Self::LinkOpened => "link_opened",
            Self::Unlocked => "unlocked",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "no_plan" => Ok(Self::NoPlan),
            "plan_selected" => Ok(Self::PlanSelected),
            "link_opened" => Ok(Self::LinkOpened),
            "unlocked" => Ok(Self::Unlocked),
            other => Err(CoreError::Internal(format!("Unknown gate state '{other}'"))),
        }
    }

    /// Selecting (or re-selecting) a plan resets the link-opened flag.
    pub fn select_plan(self) -> Result<Self, CoreError> {
        match self {
            Self::Unlocked => Err(CoreError::Conflict(
                "Payment already confirmed for this registration".into(),
            )),
            _ => Ok(Self::PlanSelected),
        }
    }

    /// Record that the checkout link was opened. Verifies nothing.
    pub fn open_link(self) -> Result<Self, CoreError> {
        match self {
            Self::NoPlan => Err(CoreError::Validation(
                "Select a payment plan first".into(),
            )),
            Self::Unlocked => Ok(Self::Unlocked),
            Self::PlanSelected | Self::LinkOpened => Ok(Self::LinkOpened),
        }
    }

    /// Check a proof upload is allowed in this state.
    pub fn accept_proof(self) -> Result<Self, CoreError> {
        match self {
            Self::NoPlan => Err(CoreError::Validation(
                "Select a payment plan first".into(),
            )),
            Self::PlanSelected => Err(CoreError::Validation(
                "Open the payment link before uploading the proof".into(),
            )),
            Self::LinkOpened => Ok(Self::Unlocked),
            Self::Unlocked => Err(CoreError::Conflict(
                "A proof of payment was already uploaded".into(),
            )),
        }
    }

    /// Whether the question form may be submitted.
    pub fn require_unlocked(self) -> Result<(), CoreError> {
        if self == Self::Unlocked {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "Upload the proof of payment to continue".into(),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Submission snapshot
// ---------------------------------------------------------------------------

/// Payment details copied onto a submission when it is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSnapshot {
    pub gate_token: String,
    pub plan_code: String,
    pub plan_label: String,
    pub amount: i64,
    pub proof_url: String,
    pub proof_path: String,
    pub verification: PaymentVerification,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn plan(code: &str) -> PaymentPlan {
        PaymentPlan {
            code: code.into(),
            label: format!("Plan {code}"),
            amount: 50_000,
            pay_link: "https://pay.example.org/checkout".into(),
        }
    }

    #[test]
    fn happy_path_unlocks() {
        let state = GateState::NoPlan
            .select_plan()
            .and_then(GateState::open_link)
            .and_then(GateState::accept_proof)
            .unwrap();
        assert_eq!(state, GateState::Unlocked);
        assert!(state.require_unlocked().is_ok());
    }

    #[test]
    fn proof_without_plan_is_rejected() {
        assert_matches!(
            GateState::NoPlan.accept_proof(),
            Err(CoreError::Validation(msg)) if msg.contains("plan")
        );
    }

    #[test]
    fn proof_before_opening_link_is_rejected() {
        assert_matches!(
            GateState::PlanSelected.accept_proof(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn reselecting_plan_resets_link_opened() {
        let state = GateState::LinkOpened.select_plan().unwrap();
        assert_eq!(state, GateState::PlanSelected);
        assert!(state.accept_proof().is_err());
    }

    #[test]
    fn open_link_requires_plan() {
        assert!(GateState::NoPlan.open_link().is_err());
        assert_eq!(GateState::Unlocked.open_link().unwrap(), GateState::Unlocked);
    }

    #[test]
    fn unlocked_gate_is_frozen() {
        assert_matches!(GateState::Unlocked.select_plan(), Err(CoreError::Conflict(_)));
        assert_matches!(GateState::Unlocked.accept_proof(), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn locked_states_block_submission() {
        for state in [GateState::NoPlan, GateState::PlanSelected, GateState::LinkOpened] {
            assert_matches!(state.require_unlocked(), Err(CoreError::Forbidden(_)));
        }
    }

    #[test]
    fn state_round_trips_through_text() {
        for state in [
            GateState::NoPlan,
            GateState::PlanSelected,
            GateState::LinkOpened,
            GateState::Unlocked,
        ] {
            assert_eq!(GateState::parse(state.as_str()).unwrap(), state);
        }
    }

    #[test]
    fn validate_plans_checks_codes_and_links() {
        assert!(validate_plans(&[]).unwrap().is_empty());
        assert!(validate_plans(&[plan("a"), plan("b")]).is_ok());
        assert!(validate_plans(&[plan("a"), plan("a")]).is_err());

        let mut bad_link = plan("c");
        bad_link.pay_link = "ftp://nope".into();
        assert!(validate_plans(&[bad_link]).is_err());

        let mut negative = plan("d");
        negative.amount = -1;
        assert!(validate_plans(&[negative]).is_err());
    }

    #[test]
    fn find_plan_by_code() {
        let plans = vec![plan("basic"), plan("full")];
        assert_eq!(find_plan(&plans, "full").unwrap().code, "full");
        assert!(find_plan(&plans, "gold").is_err());
    }
}
