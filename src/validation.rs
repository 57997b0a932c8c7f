// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Validation of the format of combined metrics.

use crate::units::get_unit;
use crate::{ColumnAxis, Dimension, Error, MetricTable};

struct MetricValidator<'a> {
    table: &'a MetricTable,
    violations: Vec<String>,
}

/// Checks that a metric satisfies the format every consumer relies on.
///
/// - all row levels are one of `year`, `location`, `carrier` and
///   `bus_carrier`.
/// - the columns are either a single metric column with a unit in
///   parentheses, or snapshots.
/// - the `name` and `unit` attributes are set.
///
/// Returns an `InvalidFormat` error that lists every violation.
pub fn verify(table: &MetricTable) -> Result<(), Error> {
    let mut validator = MetricValidator {
        table,
        violations: vec![],
    };

    validator.validate_index_names();
    validator.validate_columns();
    validator.validate_attrs();

    if validator.violations.is_empty() {
        return Ok(());
    }

    Err(Error::invalid_format(format!(
        "Metric '{}' is not formatted correctly: {}",
        table.name().unwrap_or_default(),
        validator.violations.join(" ")
    )))
}

impl MetricValidator<'_> {
    fn validate_index_names(&mut self) {
        let unknown = self
            .table
            .index_names()
            .iter()
            .filter(|n| n.parse::<Dimension>().is_err())
            .collect::<Vec<_>>();
        if !unknown.is_empty() {
            self.violations.push(format!(
                "Row levels {:?} are not in {:?}.",
                unknown,
                Dimension::ALL.map(|d| d.as_str())
            ));
        }
    }

    fn validate_columns(&mut self) {
        match self.table.columns() {
            ColumnAxis::Metric(labels) => {
                if labels.len() != 1 {
                    self.violations.push(format!(
                        "Expected a single metric column, found {}: {:?}.",
                        labels.len(),
                        labels
                    ));
                }
                for label in labels {
                    if get_unit(label, false).is_empty() {
                        self.violations
                            .push(format!("Metric column '{label}' has no unit."));
                    }
                }
            }
            ColumnAxis::Snapshots(_) => {}
            other => self.violations.push(format!(
                "Columns must be a metric or snapshots, found {:?}.",
                other.labels()
            )),
        }
    }

    fn validate_attrs(&mut self) {
        if self.table.name().map_or(true, str::is_empty) {
            self.violations.push("Attribute 'name' is not set.".into());
        }
        if self.table.unit().map_or(true, str::is_empty) {
            self.violations.push("Attribute 'unit' is not set.".into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_utils::{snapshots, TableBuilder};
    use crate::ErrorKind;

    #[test]
    fn test_verify_metric() -> Result<(), Error> {
        let table = TableBuilder::new(["year", "location", "carrier", "bus_carrier"])
            .metric("Capacity (MW)")
            .row(["2030", "AT", "solar", "AC"], 1.0)
            .name("Capacity")
            .unit("MW")
            .build()?;
        assert_eq!(verify(&table), Ok(()));

        let table = TableBuilder::new(["location"])
            .columns(ColumnAxis::Metric(vec!["a (MW)".into(), "b (MW)".into()]))
            .row_values(["AT"], vec![1.0, 2.0])
            .name("Capacity")
            .unit("MW")
            .build()?;
        assert_eq!(
            verify(&table),
            Err(Error::invalid_format(concat!(
                "Metric 'Capacity' is not formatted correctly: Expected a single ",
                "metric column, found 2: [\"a (MW)\", \"b (MW)\"]."
            )))
        );

        Ok(())
    }

    #[test]
    fn test_verify_snapshots() -> Result<(), Error> {
        let table = TableBuilder::new(["year", "location"])
            .columns(ColumnAxis::Snapshots(snapshots(3)))
            .row_values(["2030", "AT"], vec![1.0, 2.0, 3.0])
            .name("Production")
            .unit("MWh")
            .build()?;
        assert_eq!(verify(&table), Ok(()));

        Ok(())
    }

    #[test]
    fn test_verify_collects_all_violations() -> Result<(), Error> {
        let table = TableBuilder::new(["location", "technology"])
            .row(["AT", "solar"], 1.0)
            .build()?;

        let Err(err) = verify(&table) else {
            panic!("expected validation to fail");
        };
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert_eq!(
            err.message(),
            concat!(
                "Metric '' is not formatted correctly: ",
                "Row levels [\"technology\"] are not in ",
                "[\"year\", \"location\", \"carrier\", \"bus_carrier\"]. ",
                "Columns must be a metric or snapshots, found [\"\"]. ",
                "Attribute 'name' is not set. ",
                "Attribute 'unit' is not set."
            )
        );

        let table = TableBuilder::new(["location"])
            .metric("Capacity")
            .row(["AT"], 1.0)
            .name("Capacity")
            .unit("")
            .build()?;
        assert!(verify(&table).is_err_and(|e| e.message()
            == concat!(
                "Metric 'Capacity' is not formatted correctly: ",
                "Metric column 'Capacity' has no unit. ",
                "Attribute 'unit' is not set."
            )));

        Ok(())
    }
}
