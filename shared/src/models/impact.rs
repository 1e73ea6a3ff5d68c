//! Impact metric records

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Cost and environmental savings of one or more strategy applications
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ImpactMetrics {
    pub affected_m2: f64,
    pub total_cost_usd: f64,
    pub saved_water_m3_per_year: f64,
    pub saved_energy_kwh_per_year: f64,
    pub carbon_sequestration_kgco2e_per_year: f64,
}

impl ImpactMetrics {
    pub const ZERO: ImpactMetrics = ImpactMetrics {
        affected_m2: 0.0,
        total_cost_usd: 0.0,
        saved_water_m3_per_year: 0.0,
        saved_energy_kwh_per_year: 0.0,
        carbon_sequestration_kgco2e_per_year: 0.0,
    };

    /// Fields in display order, paired with their labels
    pub fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("affected_m2", self.affected_m2),
            ("total_cost_usd", self.total_cost_usd),
            ("saved_water_m3_per_year", self.saved_water_m3_per_year),
            ("saved_energy_kwh_per_year", self.saved_energy_kwh_per_year),
            (
                "carbon_sequestration_kgco2e_per_year",
                self.carbon_sequestration_kgco2e_per_year,
            ),
        ]
    }

    pub fn is_non_negative(&self) -> bool {
        self.fields().iter().all(|(_, v)| *v >= 0.0)
    }
}

impl Add for ImpactMetrics {
    type Output = ImpactMetrics;

    fn add(mut self, rhs: ImpactMetrics) -> ImpactMetrics {
        self += rhs;
        self
    }
}

impl AddAssign for ImpactMetrics {
    fn add_assign(&mut self, rhs: ImpactMetrics) {
        self.affected_m2 += rhs.affected_m2;
        self.total_cost_usd += rhs.total_cost_usd;
        self.saved_water_m3_per_year += rhs.saved_water_m3_per_year;
        self.saved_energy_kwh_per_year += rhs.saved_energy_kwh_per_year;
        self.carbon_sequestration_kgco2e_per_year += rhs.carbon_sequestration_kgco2e_per_year;
    }
}

impl Sum for ImpactMetrics {
    fn sum<I: Iterator<Item = ImpactMetrics>>(iter: I) -> ImpactMetrics {
        iter.fold(ImpactMetrics::ZERO, Add::add)
    }
}
