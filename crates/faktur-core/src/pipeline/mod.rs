//! Cleaning pipeline: raw table → [`FakturFiller`] → [`NumericNormalizer`] → clean table.

mod filler;
mod normalizer;

pub use filler::{forward_fill, FakturFiller};
pub use normalizer::{amount_of, percent_of, quantity_of, NumericNormalizer};

use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::models::config::FakturConfig;
use crate::models::table::{Column, Table};
use crate::rules::dates::DateParser;

/// A transform applied to a table in place.
///
/// Stages never add, remove or reorder rows.
pub trait Stage {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Transform the table in place.
    fn apply(&self, table: &mut Table) -> Result<()>;
}

/// Ordered list of cleaning stages.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// The standard pipeline with default settings.
    pub fn new() -> Self {
        Self::from_config(&FakturConfig::default())
    }

    /// The standard pipeline configured from `config`.
    pub fn from_config(config: &FakturConfig) -> Self {
        let dates = DateParser::new().with_year_pivot(config.parsing.two_digit_year_pivot);
        Self {
            stages: vec![
                Box::new(FakturFiller::new().with_date_parser(dates)),
                Box::new(NumericNormalizer::new()),
            ],
        }
    }

    /// Names of the stages, in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Clean a table.
    ///
    /// Every contract column must be present; this is checked before any
    /// stage runs.
    pub fn run(&self, mut table: Table) -> Result<Table> {
        let start = Instant::now();
        table.require(&Column::ALL)?;

        let rows = table.row_count();
        for stage in &self.stages {
            stage.apply(&mut table)?;
            debug_assert_eq!(table.row_count(), rows, "stage {} changed the row count", stage.name());
            debug!("Stage {} done", stage.name());
        }

        info!("Cleaned {} rows in {:?}", rows, start.elapsed());
        Ok(table)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Clean a table with the default pipeline.
pub fn clean(table: Table) -> Result<Table> {
    Pipeline::new().run(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FakturError, SchemaError};
    use crate::models::table::Value;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn headers() -> Vec<String> {
        Column::ALL.iter().map(|c| c.header().to_string()).collect()
    }

    fn raw_table() -> Table {
        Table::from_text_rows(
            headers(),
            vec![
                vec!["03/04/2024", "F-001", "Acme", "Hutang", "03/05/2024", "2", "Rp 18.767,50", "37.535,00", "Rp 60.000", "10%", "11%"],
                vec!["", "", "", "", "", "1", "22500", "22500,00", "", "0", "11"],
                vec!["", "", "", "", "", "", "-", "", "", "2,5", "11"],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_end_to_end() {
        let table = clean(raw_table()).unwrap();

        assert_eq!(table.row_count(), 3);

        let supplier = table.index_of(Column::NamaSupplier).unwrap();
        for row in 0..3 {
            assert_eq!(table.get(row, supplier), Some(&Value::Text("Acme".into())));
        }

        let april_3 = Value::Date(NaiveDate::from_ymd_opt(2024, 4, 3).unwrap());
        assert_eq!(table.cell(2, Column::Tanggal), Some(&april_3));

        assert_eq!(table.cell(0, Column::HargaBeli), Some(&Value::Float(18767.5)));
        assert_eq!(table.cell(1, Column::NilaiTotal), Some(&Value::Float(22500.0)));
        assert_eq!(table.cell(2, Column::HargaBeli), Some(&Value::Null));
        assert_eq!(table.cell(2, Column::Jumlah), Some(&Value::Int(0)));
        assert_eq!(table.cell(2, Column::Diskon), Some(&Value::Float(2.5)));
    }

    #[test]
    fn test_rerun_is_stable() {
        let pipeline = Pipeline::new();
        let once = pipeline.run(raw_table()).unwrap();
        let twice = pipeline.run(once.clone()).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn test_rerun_keeps_unknown_dates_unknown() {
        let table = Table::from_text_rows(
            headers(),
            vec![
                vec!["03/04/2024", "F-001", "Acme", "Hutang", "03/05/2024", "1", "1000", "1000", "1000", "0", "11"],
                vec!["segera", "F-002", "Acme", "Hutang", "03/05/2024", "1", "1000", "1000", "1000", "0", "11"],
            ],
        )
        .unwrap();

        let pipeline = Pipeline::new();
        let once = pipeline.run(table).unwrap();
        assert_eq!(once.cell(1, Column::Tanggal), Some(&Value::Null));

        let twice = pipeline.run(once.clone()).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn test_each_stage_keeps_row_count() {
        let pipeline = Pipeline::new();
        let mut table = raw_table();
        let rows = table.row_count();

        for stage in &pipeline.stages {
            stage.apply(&mut table).unwrap();
            assert_eq!(table.row_count(), rows, "stage {} changed the row count", stage.name());
        }
    }

    #[test]
    fn test_missing_columns_fail_before_any_stage() {
        let mut names = headers();
        names.retain(|h| h != "Pajak" && h != "Deadline");
        let table = Table::from_text_rows::<&str>(names, vec![]).unwrap();

        match clean(table) {
            Err(FakturError::Schema(SchemaError::MissingColumn(missing))) => {
                assert_eq!(missing, vec!["Deadline".to_string(), "Pajak".to_string()]);
            }
            other => panic!("expected missing column error, got {:?}", other),
        }
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(Pipeline::new().stage_names(), vec!["faktur-filler", "numeric-normalizer"]);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::from_text_rows::<&str>(headers(), vec![]).unwrap();
        assert!(clean(table).unwrap().is_empty());
    }
}
