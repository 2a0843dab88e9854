//! Classical annealing schedules.

use crate::error::{AnnealError, Result};

/// What the values of an [`AnnealSchedule`] encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScheduleKind {
    /// Values are inverse temperatures `beta` (the default).
    #[default]
    InverseTemperature,
    /// Values are temperatures `T`; annealers read `1 / T`.
    Temperature,
}

/// An ordered sequence of control values, one per annealing step.
///
/// # Examples
///
/// ```
/// use u_anneal::schedule::AnnealSchedule;
///
/// let schedule = AnnealSchedule::linear(0.1, 2.0, 40).unwrap();
/// assert_eq!(schedule.len(), 40);
/// assert_eq!(schedule.values()[0], 0.1);
/// assert_eq!(schedule.values()[39], 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealSchedule {
    values: Vec<f64>,
    kind: ScheduleKind,
}

impl AnnealSchedule {
    /// `steps` inverse temperatures evenly spaced from `start` to `end`,
    /// both inclusive. A single step yields `[end]`.
    pub fn linear(start: f64, end: f64, steps: usize) -> Result<Self> {
        Ok(Self {
            values: linear_values(start, end, steps)?,
            kind: ScheduleKind::InverseTemperature,
        })
    }

    /// `steps` inverse temperatures in geometric progression from `start`
    /// to `end`. Both endpoints must be positive.
    pub fn geometric(start: f64, end: f64, steps: usize) -> Result<Self> {
        check_steps(steps)?;
        if !(start > 0.0 && end > 0.0 && start.is_finite() && end.is_finite()) {
            return Err(AnnealError::config(format!(
                "geometric schedule endpoints must be positive and finite, got {start} and {end}"
            )));
        }
        let values = if steps == 1 {
            vec![end]
        } else {
            let ratio = (end / start).powf(1.0 / (steps - 1) as f64);
            let mut values: Vec<f64> = (0..steps).map(|k| start * ratio.powi(k as i32)).collect();
            values[steps - 1] = end;
            values
        };
        Ok(Self {
            values,
            kind: ScheduleKind::InverseTemperature,
        })
    }

    /// `steps` temperatures evenly spaced from `t_start` to `t_end`.
    ///
    /// Temperatures must be strictly positive.
    pub fn linear_temperature(t_start: f64, t_end: f64, steps: usize) -> Result<Self> {
        if !(t_start > 0.0 && t_end > 0.0) {
            return Err(AnnealError::config(format!(
                "temperatures must be positive, got {t_start} and {t_end}"
            )));
        }
        Ok(Self {
            values: linear_values(t_start, t_end, steps)?,
            kind: ScheduleKind::Temperature,
        })
    }

    /// Wraps explicit inverse temperatures. Values must be finite.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        check_steps(values.len())?;
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(AnnealError::config(format!(
                "schedule value {i} is {}, expected a finite number",
                values[i]
            )));
        }
        Ok(Self {
            values,
            kind: ScheduleKind::InverseTemperature,
        })
    }

    /// Raw control values in schedule order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn kind(&self) -> ScheduleKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Inverse temperature at `step`, inverting temperature schedules.
    pub fn beta_at(&self, step: usize) -> f64 {
        match self.kind {
            ScheduleKind::InverseTemperature => self.values[step],
            ScheduleKind::Temperature => 1.0 / self.values[step],
        }
    }

    /// Fails unless the schedule has exactly `steps` entries.
    pub fn check_len(&self, steps: usize) -> Result<()> {
        if self.values.len() != steps {
            return Err(AnnealError::config(format!(
                "schedule has {} entries but {steps} steps were requested",
                self.values.len()
            )));
        }
        Ok(())
    }
}

fn check_steps(steps: usize) -> Result<()> {
    if steps < 1 {
        return Err(AnnealError::config("schedule must have at least one step"));
    }
    Ok(())
}

pub(crate) fn linear_values(start: f64, end: f64, steps: usize) -> Result<Vec<f64>> {
    check_steps(steps)?;
    if !start.is_finite() || !end.is_finite() {
        return Err(AnnealError::config(format!(
            "schedule endpoints must be finite, got {start} and {end}"
        )));
    }
    if steps == 1 {
        return Ok(vec![end]);
    }
    let increment = (end - start) / (steps - 1) as f64;
    let mut values: Vec<f64> = (0..steps).map(|k| start + increment * k as f64).collect();
    values[steps - 1] = end;
    Ok(values)
}
