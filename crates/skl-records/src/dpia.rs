//! # DPIA Assessment Logic
//!
//! Data-protection impact assessments (GDPR Art. 35) are captured through a
//! multi-step wizard. The presentation of that wizard is out of scope; this
//! module holds the two pieces of logic behind it:
//!
//! - per-step required-field validation, including the conditional
//!   requirements that depend on the assessed risk, and
//! - the static 5×5 likelihood×impact risk matrix.
//!
//! ## Step Order
//!
//! Context → Necessity → Risks → Measures → Approval
//!
//! A step validates independently of the others except where a conditional
//! requirement reads the risk assessed in the Risks step.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Risk Matrix ─────────────────────────────────────────────────────

/// Assessed risk level from the 5×5 matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Acceptable without further measures.
    Low,
    /// Acceptable with documented measures.
    Medium,
    /// Requires mitigation before processing starts.
    High,
    /// Requires mitigation and prior consultation (Art. 36).
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// The 5×5 risk matrix, indexed `[likelihood - 1][impact - 1]`.
const RISK_MATRIX: [[RiskLevel; 5]; 5] = {
    use RiskLevel::{Critical as C, High as H, Low as L, Medium as M};
    [
        [L, L, L, M, M],
        [L, L, M, M, H],
        [L, M, M, H, H],
        [M, M, H, H, C],
        [M, H, H, C, C],
    ]
};

/// Look up the risk level for a likelihood/impact pair, both on a 1–5 scale.
///
/// # Errors
///
/// Returns [`WizardError::ScaleOutOfRange`] when either value is outside
/// 1–5.
pub fn risk_level(likelihood: u8, impact: u8) -> Result<RiskLevel, WizardError> {
    if !(1..=5).contains(&likelihood) || !(1..=5).contains(&impact) {
        return Err(WizardError::ScaleOutOfRange { likelihood, impact });
    }
    Ok(RISK_MATRIX[usize::from(likelihood) - 1][usize::from(impact) - 1])
}

// ─── Wizard Steps ────────────────────────────────────────────────────

/// The steps of the DPIA wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Processing description and controller context.
    Context,
    /// Necessity and proportionality assessment.
    Necessity,
    /// Likelihood/impact scoring.
    Risks,
    /// Mitigation measures.
    Measures,
    /// Sign-off.
    Approval,
}

impl WizardStep {
    /// All steps in wizard order.
    pub fn all_steps() -> &'static [WizardStep] {
        &[
            Self::Context,
            Self::Necessity,
            Self::Risks,
            Self::Measures,
            Self::Approval,
        ]
    }
}

/// Errors raised by wizard validation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WizardError {
    /// A required field for the step is empty or absent.
    #[error("step {step:?}: required field {field:?} is missing")]
    MissingField {
        /// The step being validated.
        step: WizardStep,
        /// The missing field name.
        field: &'static str,
    },

    /// Likelihood or impact is outside the 1–5 scale.
    #[error("likelihood/impact must be on the 1-5 scale, got {likelihood}/{impact}")]
    ScaleOutOfRange {
        /// Supplied likelihood.
        likelihood: u8,
        /// Supplied impact.
        impact: u8,
    },
}

/// The accumulated state of a DPIA wizard form.
///
/// All fields are optional; [`WizardForm::validate_step`] decides which are
/// required where. Empty strings count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WizardForm {
    /// Description of the processing operation.
    pub processing_description: Option<String>,
    /// Purpose of the processing.
    pub purpose: Option<String>,
    /// Why the processing is necessary and proportionate.
    pub necessity_justification: Option<String>,
    /// Assessed likelihood on the 1–5 scale.
    pub likelihood: Option<u8>,
    /// Assessed impact on the 1–5 scale.
    pub impact: Option<u8>,
    /// Planned mitigation measures.
    pub mitigation_measures: Option<String>,
    /// Name of the approver.
    pub approver: Option<String>,
    /// Opinion of the data protection officer.
    pub dpo_opinion: Option<String>,
}

impl WizardForm {
    /// The risk level assessed so far, when both scores are present and in
    /// range.
    pub fn assessed_risk(&self) -> Option<RiskLevel> {
        match (self.likelihood, self.impact) {
            (Some(l), Some(i)) => risk_level(l, i).ok(),
            _ => None,
        }
    }

    /// Validate one wizard step against the current form state.
    ///
    /// Conditional requirements:
    /// - Measures: `mitigation_measures` is required only when the assessed
    ///   risk is High or Critical.
    /// - Approval: `dpo_opinion` is required only when the assessed risk is
    ///   Critical (prior-consultation track).
    pub fn validate_step(&self, step: WizardStep) -> Result<(), WizardError> {
        match step {
            WizardStep::Context => {
                require(step, "processing_description", &self.processing_description)?;
                require(step, "purpose", &self.purpose)
            }
            WizardStep::Necessity => {
                require(step, "necessity_justification", &self.necessity_justification)
            }
            WizardStep::Risks => {
                let likelihood = self.likelihood.ok_or(WizardError::MissingField {
                    step,
                    field: "likelihood",
                })?;
                let impact = self.impact.ok_or(WizardError::MissingField {
                    step,
                    field: "impact",
                })?;
                risk_level(likelihood, impact).map(|_| ())
            }
            WizardStep::Measures => {
                if matches!(
                    self.assessed_risk(),
                    Some(RiskLevel::High) | Some(RiskLevel::Critical)
                ) {
                    require(step, "mitigation_measures", &self.mitigation_measures)?;
                }
                Ok(())
            }
            WizardStep::Approval => {
                require(step, "approver", &self.approver)?;
                if self.assessed_risk() == Some(RiskLevel::Critical) {
                    require(step, "dpo_opinion", &self.dpo_opinion)?;
                }
                Ok(())
            }
        }
    }

    /// Validate every step in order, stopping at the first failure.
    pub fn validate_all(&self) -> Result<(), WizardError> {
        for step in WizardStep::all_steps() {
            self.validate_step(*step)?;
        }
        Ok(())
    }
}

fn require(
    step: WizardStep,
    field: &'static str,
    value: &Option<String>,
) -> Result<(), WizardError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(WizardError::MissingField { step, field }),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
