//! Component-level repair estimation.

use super::REPAIR_CONTINGENCY;

/// Per-component renovation costs. Defaults reflect a mid-market single
/// family rehab; override fields for a different trade environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostMatrix {
    pub roof: f64,
    pub hvac: f64,
    pub kitchen_full: f64,
    pub bathroom_each: f64,
    pub cosmetic_per_sqft: f64,
}

impl Default for CostMatrix {
    fn default() -> Self {
        Self {
            roof: 12_000.0,
            hvac: 8_000.0,
            kitchen_full: 15_000.0,
            bathroom_each: 5_000.0,
            cosmetic_per_sqft: 10.0,
        }
    }
}

impl CostMatrix {
    /// Builds a repair budget from the property profile. Roof and HVAC are
    /// assumed end-of-life on pre-1980 builds; kitchen and cosmetics are
    /// always included. The total carries the repair contingency.
    pub fn estimate(&self, year_built: u32, sqft: f64, bathrooms: f64) -> f64 {
        let mut total = self.kitchen_full + self.bathroom_each * bathrooms
            + self.cosmetic_per_sqft * sqft;
        if year_built < 1980 {
            total += self.roof + self.hvac;
        }

        total * REPAIR_CONTINGENCY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-6
    }

    #[test]
    fn pre_1980_build_includes_roof_and_hvac() {
        let estimate = CostMatrix::default().estimate(1955, 1_500.0, 2.0);
        // (12000 + 8000 + 15000 + 2 * 5000 + 1500 * 10) * 1.15
        assert!(approx(estimate, 69_000.0));
    }

    #[test]
    fn newer_build_skips_roof_and_hvac() {
        let estimate = CostMatrix::default().estimate(1995, 1_500.0, 2.0);
        // (15000 + 10000 + 15000) * 1.15
        assert!(approx(estimate, 46_000.0));
    }

    #[test]
    fn boundary_year_counts_as_newer() {
        let with_mechanicals = CostMatrix::default().estimate(1979, 1_000.0, 1.0);
        let without = CostMatrix::default().estimate(1980, 1_000.0, 1.0);
        assert!(approx(with_mechanicals - without, 20_000.0 * REPAIR_CONTINGENCY));
    }

    #[test]
    fn custom_matrix_overrides_flow_through() {
        let matrix = CostMatrix {
            kitchen_full: 0.0,
            bathroom_each: 0.0,
            cosmetic_per_sqft: 1.0,
            ..CostMatrix::default()
        };
        assert!(approx(matrix.estimate(2000, 100.0, 0.0), 115.0));
    }
}
