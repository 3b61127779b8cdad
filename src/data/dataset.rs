use std::path::{Path, PathBuf};

use super::clean::clean_with_report;
use super::error::PipelineError;
use super::loader::load_file;
use super::model::Table;

/// A loaded and cleaned table together with where it came from.
///
/// Built once and handed to consumers by reference; [`Dataset::reload`]
/// is the only way to refresh it.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: PathBuf,
    table: Table,
}

impl Dataset {
    /// Load and clean the table at `path`.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let table = read_table(path)?;
        Ok(Dataset {
            source: path.to_path_buf(),
            table,
        })
    }

    /// Rebuild from the same source. On failure the current table is kept.
    pub fn reload(&mut self) -> Result<(), PipelineError> {
        self.table = read_table(&self.source)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn from_table(source: PathBuf, table: Table) -> Self {
        Dataset { source, table }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn table(&self) -> &Table {
        &self.table
    }
}

fn read_table(path: &Path) -> Result<Table, PipelineError> {
    let raw = load_file(path)?;
    let (table, report) = clean_with_report(&raw);
    log::info!(
        "Loaded {} rows from {} ({} kept, {} states)",
        raw.len(),
        path.display(),
        report.kept,
        table.states().len()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "state,region,region_name,divis,divis_name,year,monthno,benperhh,\
benperp,pop_urban_2010,pop_rural_2010,totpop_2010,pct_pop_urban_2010,pct_pop_rural_2010\n";
    const AL_JAN: &str = "AL,3,South,6,ESC,2020,1,100,50,1,2,3,40,60\n";
    const AL_FEB: &str = "AL,3,South,6,ESC,2020,2,110,55,1,2,3,40,60\n";
    const AL_BAD: &str = "AL,3,South,6,ESC,2020,3,-5,55,1,2,3,40,60\n";

    #[test]
    fn load_cleans_and_reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.csv");
        std::fs::write(&path, format!("{HEADER}{AL_JAN}{AL_BAD}")).unwrap();

        let mut ds = Dataset::load(&path).unwrap();
        assert_eq!(ds.source(), path.as_path());
        assert_eq!(ds.table().len(), 1);

        std::fs::write(&path, format!("{HEADER}{AL_JAN}{AL_FEB}")).unwrap();
        ds.reload().unwrap();
        assert_eq!(ds.table().len(), 2);
    }

    #[test]
    fn failed_reload_keeps_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.csv");
        std::fs::write(&path, format!("{HEADER}{AL_JAN}")).unwrap();
        let mut ds = Dataset::load(&path).unwrap();

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(ds.reload(), Err(PipelineError::SourceRead { .. })));
        assert_eq!(ds.table().len(), 1);
    }
}
