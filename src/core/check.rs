//! Catalog integrity checks
//!
//! Schema validation only proves each record is well-formed. These checks
//! look across lists: dangling foreign keys, duplicate ids, finishes that can
//! never be offered, and tolerance defaults outside their option list.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::core::catalog::Catalog;
use crate::core::identity::RecordKind;

/// How serious an integrity issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single integrity finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogIssue {
    pub severity: Severity,
    pub kind: RecordKind,
    pub id: u32,
    pub message: String,
}

impl CatalogIssue {
    fn error(kind: RecordKind, id: u32, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            id,
            message: message.into(),
        }
    }

    fn warning(kind: RecordKind, id: u32, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            id,
            message: message.into(),
        }
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}: {}", self.severity, self.kind, self.id, self.message)
    }
}

fn duplicates<I: IntoIterator<Item = u32>>(ids: I) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for id in ids {
        if !seen.insert(id) && !dups.contains(&id) {
            dups.push(id);
        }
    }
    dups
}

impl Catalog {
    /// First id that appears twice in the same list, processes checked first
    pub fn first_duplicate(&self) -> Option<(RecordKind, u32)> {
        let process = duplicates(self.processes.iter().map(|p| p.id.get()))
            .first()
            .map(|id| (RecordKind::Process, *id));
        let material = || {
            duplicates(self.materials.iter().map(|m| m.id.get()))
                .first()
                .map(|id| (RecordKind::Material, *id))
        };
        let finish = || {
            duplicates(self.finishes.iter().map(|f| f.id.get()))
                .first()
                .map(|id| (RecordKind::Finish, *id))
        };
        process.or_else(material).or_else(finish)
    }

    /// Run all cross-record checks, errors first
    pub fn check(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for id in duplicates(self.processes.iter().map(|p| p.id.get())) {
            issues.push(CatalogIssue::error(RecordKind::Process, id, "duplicate process id"));
        }
        for id in duplicates(self.materials.iter().map(|m| m.id.get())) {
            issues.push(CatalogIssue::error(RecordKind::Material, id, "duplicate material id"));
        }
        for id in duplicates(self.finishes.iter().map(|f| f.id.get())) {
            issues.push(CatalogIssue::error(RecordKind::Finish, id, "duplicate finish id"));
        }

        let process_active: HashMap<_, _> =
            self.processes.iter().map(|p| (p.id, p.active)).collect();

        for material in &self.materials {
            match process_active.get(&material.process_id).copied() {
                None => issues.push(CatalogIssue::error(
                    RecordKind::Material,
                    material.id.get(),
                    format!("references unknown process {}", material.process_id),
                )),
                Some(false) if material.active => issues.push(CatalogIssue::warning(
                    RecordKind::Material,
                    material.id.get(),
                    format!(
                        "is active but its process {} is inactive",
                        material.process_id
                    ),
                )),
                _ => {}
            }

            if let Some(tolerance) = &material.tolerance {
                if !tolerance.default_is_offered() {
                    issues.push(CatalogIssue::warning(
                        RecordKind::Material,
                        material.id.get(),
                        format!(
                            "default tolerance {} is not among its options",
                            tolerance.default.unwrap_or_default()
                        ),
                    ));
                }
            }
        }

        let material_process: HashMap<_, _> = self
            .materials
            .iter()
            .map(|m| (m.id, m.process_id))
            .collect();

        for finish in &self.finishes {
            if !process_active.contains_key(&finish.process_id) {
                issues.push(CatalogIssue::error(
                    RecordKind::Finish,
                    finish.id.get(),
                    format!("references unknown process {}", finish.process_id),
                ));
            }

            if finish.restricted_materials.is_empty() {
                issues.push(CatalogIssue::warning(
                    RecordKind::Finish,
                    finish.id.get(),
                    "has no restricted materials and will never be offered",
                ));
            }

            for material_id in &finish.restricted_materials {
                match material_process.get(material_id) {
                    None => issues.push(CatalogIssue::error(
                        RecordKind::Finish,
                        finish.id.get(),
                        format!("restricts to unknown material {}", material_id),
                    )),
                    Some(process) if *process != finish.process_id => {
                        issues.push(CatalogIssue::warning(
                            RecordKind::Finish,
                            finish.id.get(),
                            format!(
                                "restricts to material {} of process {}, not its own process {}",
                                material_id, process, finish.process_id
                            ),
                        ))
                    }
                    _ => {}
                }
            }
        }

        // Stable sort keeps catalog order within a severity
        issues.sort_by(|a, b| b.severity.cmp(&a.severity));
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Finish, Material, Process, ToleranceSpec};

    #[test]
    fn test_sample_catalog_is_clean() {
        let catalog = Catalog::sample().unwrap();
        let errors: Vec<_> = catalog
            .check()
            .into_iter()
            .filter(|i| i.severity == Severity::Error)
            .collect();
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_duplicate_ids() {
        let catalog = Catalog::new(
            vec![Process::new(1, "CNC"), Process::new(1, "CNC again")],
            vec![],
            vec![],
        );
        let issues = catalog.check();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, RecordKind::Process);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(catalog.first_duplicate(), Some((RecordKind::Process, 1)));
    }

    #[test]
    fn test_first_duplicate_none_for_sample() {
        assert_eq!(Catalog::sample().unwrap().first_duplicate(), None);
    }

    #[test]
    fn test_dangling_references() {
        let catalog = Catalog::new(
            vec![Process::new(1, "CNC")],
            vec![Material::new(10, 9, "Orphan")],
            vec![Finish::new(100, 1, "Anodized", [10, 77])],
        );
        let issues = catalog.check();

        assert!(issues
            .iter()
            .any(|i| i.kind == RecordKind::Material && i.message.contains("unknown process 9")));
        assert!(issues
            .iter()
            .any(|i| i.kind == RecordKind::Finish && i.message.contains("unknown material 77")));
        assert!(issues
            .iter()
            .any(|i| i.kind == RecordKind::Finish && i.message.contains("of process 9")));
    }

    #[test]
    fn test_warnings_sorted_after_errors() {
        let mut material = Material::new(10, 1, "Aluminum");
        material.tolerance = Some(ToleranceSpec {
            default: Some(0.5),
            options: vec![0.1],
        });
        let catalog = Catalog::new(
            vec![Process::new(1, "CNC")],
            vec![material, Material::new(11, 5, "Orphan")],
            vec![Finish::new(100, 1, "Nothing", [])],
        );

        let issues = catalog.check();
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[1..].iter().all(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn test_active_material_under_inactive_process() {
        let catalog = Catalog::new(
            vec![Process::new(4, "Molding").inactive()],
            vec![Material::new(40, 4, "ABS")],
            vec![],
        );
        let issues = catalog.check();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().starts_with("warning: material 40"));
    }
}
