use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::book::roles::RoleResolver;
use crate::utils::console::Console;
use crate::utils::sidecar;
use crate::Result;

// The library-level catalog is not a per-book sidecar.
const LIBRARY_CATALOG: &str = "audiobooks.xml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrateSummary {
    pub rewritten: usize,
    pub failed: usize,
}

/// One-shot utility: rewrites every sidecar under a root into the current
/// schema, accepting the legacy shapes on the way in.
pub struct SidecarMigrator {
    console: Arc<Console>,
    roles: Arc<dyn RoleResolver>,
    fill_missing: bool,
}

impl SidecarMigrator {
    pub fn new(console: Arc<Console>, roles: Arc<dyn RoleResolver>, fill_missing: bool) -> Self {
        Self {
            console,
            roles,
            fill_missing,
        }
    }

    pub fn migrate(&self, root: &Path) -> MigrateSummary {
        let mut summary = MigrateSummary::default();

        for path in collect_sidecars(root) {
            match self.migrate_file(&path) {
                Ok(()) => {
                    summary.rewritten += 1;
                    self.console.line(&format!("Rewrote '{}'.", path.display()));
                }
                Err(e) => {
                    summary.failed += 1;
                    self.console
                        .error(&format!("Error migrating '{}': {}", path.display(), e));
                }
            }
        }

        summary
    }

    fn migrate_file(&self, path: &Path) -> Result<()> {
        let mut record = sidecar::read_compat(path)?;

        if self.fill_missing {
            let book = record
                .title
                .clone()
                .or_else(|| {
                    path.file_stem()
                        .and_then(|n| n.to_str())
                        .map(String::from)
                })
                .unwrap_or_default();

            if record.authors.is_empty() {
                let name = self.roles.request_missing_name(&book, "author")?;
                if !name.is_empty() {
                    record.authors.push(name);
                }
            }

            if record.narrators.is_empty() {
                let name = self.roles.request_missing_name(&book, "narrator")?;
                if !name.is_empty() {
                    record.narrators.push(name);
                }
            }
        }

        sidecar::write(path, &record)
    }
}

fn collect_sidecars(root: &Path) -> Vec<PathBuf> {
    let mut sidecars: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("xml"))
                    .unwrap_or(false)
                && e.file_name() != LIBRARY_CATALOG
        })
        .map(|e| e.into_path())
        .collect();

    sidecars.sort();
    sidecars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::roles::ScriptedRoles;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn migrator(roles: Arc<ScriptedRoles>, fill_missing: bool) -> SidecarMigrator {
        SidecarMigrator::new(Arc::new(Console::new()), roles, fill_missing)
    }

    const LEGACY: &str = "<Mp3Meta>\
        <Title>Old Book</Title>\
        <Author>Jane Doe</Author>\
        <RunningTime><Hours>1</Hours><Minutes>0</Minutes><Seconds>0</Seconds><Value>1:00:00</Value></RunningTime>\
        </Mp3Meta>";

    #[test]
    fn legacy_sidecars_are_rewritten_into_the_current_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Old Book.xml");
        fs::write(&path, LEGACY).unwrap();

        let summary = migrator(Arc::new(ScriptedRoles::default()), false).migrate(dir.path());
        assert_eq!(summary, MigrateSummary { rewritten: 1, failed: 0 });

        let xml = fs::read_to_string(&path).unwrap();
        assert!(xml.contains("<AudioBookMeta>"));

        let record = sidecar::read(&path).unwrap();
        assert_eq!(record.title.as_deref(), Some("Old Book"));
        assert_eq!(record.running_time.hours, 1);
    }

    #[test]
    fn the_library_catalog_is_left_alone() {
        let dir = tempdir().unwrap();
        let catalog = dir.path().join("audiobooks.xml");
        fs::write(&catalog, b"<catalog/>").unwrap();

        let summary = migrator(Arc::new(ScriptedRoles::default()), false).migrate(dir.path());
        assert_eq!(summary, MigrateSummary::default());
        assert_eq!(fs::read(&catalog).unwrap(), b"<catalog/>");
    }

    #[test]
    fn unreadable_files_are_counted_and_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.xml"), b"definitely not xml").unwrap();
        fs::write(dir.path().join("Old Book.xml"), LEGACY).unwrap();

        let summary = migrator(Arc::new(ScriptedRoles::default()), false).migrate(dir.path());
        assert_eq!(summary, MigrateSummary { rewritten: 1, failed: 1 });
    }

    #[test]
    fn fill_missing_asks_for_absent_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Nameless.xml");
        let xml = "<Mp3Meta>\
            <Title>Nameless</Title>\
            <RunningTime><Hours>0</Hours><Minutes>5</Minutes><Seconds>0</Seconds><Value>0:05:00</Value></RunningTime>\
            </Mp3Meta>";
        fs::write(&path, xml).unwrap();

        let roles = Arc::new(ScriptedRoles::with_names([
            "Jane Doe".to_string(),
            "Rob Inglis".to_string(),
        ]));
        let summary = migrator(roles, true).migrate(dir.path());
        assert_eq!(summary.rewritten, 1);

        let record = sidecar::read(&path).unwrap();
        assert_eq!(record.authors, vec!["Jane Doe".to_string()]);
        assert_eq!(record.narrators, vec!["Rob Inglis".to_string()]);
    }

    #[test]
    fn fill_missing_with_empty_answers_changes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Nameless.xml");
        let xml = "<Mp3Meta>\
            <RunningTime><Hours>0</Hours><Minutes>5</Minutes><Seconds>0</Seconds><Value>0:05:00</Value></RunningTime>\
            </Mp3Meta>";
        fs::write(&path, xml).unwrap();

        let summary = migrator(Arc::new(ScriptedRoles::default()), true).migrate(dir.path());
        assert_eq!(summary.rewritten, 1);

        let record = sidecar::read(&path).unwrap();
        assert!(record.authors.is_empty());
        assert!(record.narrators.is_empty());
    }
}
