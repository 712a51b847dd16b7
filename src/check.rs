//! Weighted, partly-mandatory check suites.
//!
//! Continuous geometric measurements (thickness, straightness, ordinate
//! offset) are better served by graded ramps than hard cutoffs, while
//! outlier rejection still needs hard gates. A [`Check`] maps a measured
//! value through a linear ramp between its bounds; a [`CheckSuite`] runs
//! its checks in order, short-circuits on the first mandatory check landing
//! at zero, and otherwise reports the weighted grade with its full
//! per-check breakdown.

use serde::Serialize;

/// Symbolic failure code attached to a rejected candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Failure(pub &'static str);

/// Direction of the ramp between a check's bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Ramp {
    /// Larger values are better: `low` scores 0, `high` scores 1.
    Increasing,
    /// Smaller values are better: `high` scores 0, `low` scores 1.
    Decreasing,
}

/// A named numeric check: measurement closure, acceptable range, ramp
/// direction, mandatory flag and failure code.
pub struct Check<C> {
    name: &'static str,
    low: f64,
    high: f64,
    ramp: Ramp,
    mandatory: bool,
    failure: Failure,
    eval: Box<dyn Fn(&C) -> f64 + Send + Sync>,
}

impl<C> Check<C> {
    pub fn new(
        name: &'static str,
        low: f64,
        high: f64,
        ramp: Ramp,
        mandatory: bool,
        failure: Failure,
        eval: impl Fn(&C) -> f64 + Send + Sync + 'static,
    ) -> Self {
        debug_assert!(low <= high, "check {name}: low must not exceed high");
        Self {
            name,
            low,
            high,
            ramp,
            mandatory,
            failure,
            eval: Box::new(eval),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn failure(&self) -> Failure {
        self.failure
    }

    /// Measure the context.
    pub fn value(&self, context: &C) -> f64 {
        (self.eval)(context)
    }

    /// Map a measured value through the ramp to [0, 1].
    pub fn impact_of(&self, value: f64) -> f64 {
        let span = self.high - self.low;
        match self.ramp {
            Ramp::Increasing => {
                if value <= self.low {
                    0.0
                } else if value >= self.high {
                    1.0
                } else {
                    (value - self.low) / span
                }
            }
            Ramp::Decreasing => {
                if value >= self.high {
                    0.0
                } else if value <= self.low {
                    1.0
                } else {
                    (self.high - value) / span
                }
            }
        }
    }
}

/// One evaluated check within a suite result.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactEntry {
    pub name: &'static str,
    pub value: f64,
    pub impact: f64,
    pub weight: f64,
}

/// Full grade breakdown of a suite run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteImpacts {
    pub suite: &'static str,
    pub entries: Vec<ImpactEntry>,
    pub grade: f64,
}

/// Outcome of running a suite on one candidate.
#[derive(Clone, Debug)]
pub enum SuiteResult {
    /// A mandatory check landed at zero; the code tells which.
    Failed(Failure),
    /// All mandatory checks passed; weighted grade plus breakdown.
    Graded(SuiteImpacts),
}

impl SuiteResult {
    /// Grade when graded at all, `None` on failure.
    pub fn grade(&self) -> Option<f64> {
        match self {
            SuiteResult::Failed(_) => None,
            SuiteResult::Graded(impacts) => Some(impacts.grade),
        }
    }
}

/// Ordered list of weighted checks with an acceptance threshold.
pub struct CheckSuite<C> {
    name: &'static str,
    min_threshold: f64,
    checks: Vec<(f64, Check<C>)>,
}

impl<C> CheckSuite<C> {
    pub fn new(name: &'static str, min_threshold: f64) -> Self {
        Self {
            name,
            min_threshold,
            checks: Vec::new(),
        }
    }

    /// Append a check with its weight. A zero weight keeps the check's
    /// gate and breakdown entry without contributing to the grade.
    pub fn add(&mut self, weight: f64, check: Check<C>) -> &mut Self {
        self.checks.push((weight, check));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn min_threshold(&self) -> f64 {
        self.min_threshold
    }

    /// Run the checks in declared order.
    pub fn run(&self, context: &C) -> SuiteResult {
        let mut entries = Vec::with_capacity(self.checks.len());
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;

        for (weight, check) in &self.checks {
            let value = check.value(context);
            let impact = check.impact_of(value);
            if check.is_mandatory() && impact <= f64::EPSILON {
                return SuiteResult::Failed(check.failure());
            }
            entries.push(ImpactEntry {
                name: check.name(),
                value,
                impact,
                weight: *weight,
            });
            weighted_sum += weight * impact;
            total_weight += weight;
        }

        let grade = if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        };
        SuiteResult::Graded(SuiteImpacts {
            suite: self.name,
            entries,
            grade,
        })
    }
}
