//! Project category classifier
//!
//! Runs after the financing source is known. Besides picking a category a
//! rule may insist that the financing source is one of a few values, may
//! replace the financing source outright (some project labels are a
//! stronger signal than the financing-source column), or may deliberately
//! leave the record without a category.

use std::sync::OnceLock;

use tracing::trace;

use super::catalog::CatalogSnapshot;
use super::financing::SourceMatch;
use super::normalize::normalize;
use super::rules::{exact, first_match, pattern, prefix, Details, Matcher, Rule};
use crate::error::ImportError;
use crate::models::{FinancingSource, ProjectCategory};

/// What a project rule does to the category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryAction {
    /// Keep whatever the financing-source label implied
    Keep,
    /// No category; the label is a revenue sub-type or a misuse of the column
    Clear,
    /// The named catalog category
    Set(&'static str),
}

#[derive(Debug, Clone)]
pub struct ProjectRule {
    pub matcher: Matcher,
    pub category: CategoryAction,
    pub details: Details,
    /// The financing source must be one of these; empty means any
    pub allowed_sources: &'static [&'static str],
    /// Financing source that replaces the one from the source column
    pub source: Option<&'static str>,
}

impl ProjectRule {
    pub fn new(matcher: Matcher, category: CategoryAction) -> Self {
        Self {
            matcher,
            category,
            details: Details::Keep,
            allowed_sources: &[],
            source: None,
        }
    }

    /// Shorthand for the common "label means this category" rule
    pub fn set(matcher: Matcher, category: &'static str) -> Self {
        Self::new(matcher, CategoryAction::Set(category))
    }

    pub fn details(mut self, details: Details) -> Self {
        self.details = details;
        self
    }

    pub fn only_for(mut self, sources: &'static [&'static str]) -> Self {
        self.allowed_sources = sources;
        self
    }

    pub fn source(mut self, name: &'static str) -> Self {
        self.source = Some(name);
        self
    }
}

impl Rule for ProjectRule {
    fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

/// Result of classifying a project label
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectMatch<'c> {
    pub category: Option<&'c ProjectCategory>,
    /// New project details; None keeps the financing-source details
    pub details: Option<String>,
    pub source_override: Option<&'c FinancingSource>,
    pub rule: Option<usize>,
}

pub struct ProjectCategoryClassifier<'c> {
    catalog: &'c CatalogSnapshot,
    rules: &'static [ProjectRule],
}

impl<'c> ProjectCategoryClassifier<'c> {
    pub fn new(catalog: &'c CatalogSnapshot, rules: &'static [ProjectRule]) -> Self {
        Self { catalog, rules }
    }

    pub fn for_expenditures(catalog: &'c CatalogSnapshot) -> Self {
        Self::new(catalog, expenditure_project_rules())
    }

    pub fn classify(
        &self,
        label: &str,
        source: &SourceMatch<'c>,
        row_index: usize,
    ) -> Result<ProjectMatch<'c>, ImportError> {
        let normalized = normalize(label);
        if normalized.is_empty() {
            return Ok(ProjectMatch {
                category: source.category,
                details: None,
                source_override: None,
                rule: None,
            });
        }

        if let Some((position, rule)) = first_match(self.rules, &normalized) {
            trace!(row = row_index, rule = position, label = %normalized, "project rule hit");

            if !rule.allowed_sources.is_empty() {
                let outsider = source
                    .sources
                    .iter()
                    .find(|s| !rule.allowed_sources.iter().any(|a| *a == s.name));
                if let Some(outsider) = outsider {
                    return Err(ImportError::consistency(
                        row_index,
                        format!(
                            "project '{}' is not valid for financing source '{}'",
                            label.trim(),
                            outsider.name
                        ),
                    ));
                }
            }

            let category = match rule.category {
                CategoryAction::Keep => source.category,
                CategoryAction::Clear => None,
                CategoryAction::Set(name) => Some(
                    self.catalog
                        .project_categories
                        .require_by_name(name)
                        .map_err(|e| self.missing(label, e, row_index))?,
                ),
            };
            let source_override = match rule.source {
                Some(name) => Some(
                    self.catalog
                        .financing_sources
                        .require_by_name(name)
                        .map_err(|e| self.missing(label, e, row_index))?,
                ),
                None => None,
            };

            return Ok(ProjectMatch {
                category,
                details: rule.details.extract(label),
                source_override,
                rule: Some(position),
            });
        }

        match self.catalog.project_categories.find_by_code_scan(&normalized) {
            Some(category) => {
                trace!(row = row_index, label = %normalized, category = %category.name, "project import code hit");
                Ok(ProjectMatch {
                    category: Some(category),
                    details: None,
                    source_override: None,
                    rule: None,
                })
            }
            None => Err(ImportError::classification(
                row_index,
                format!("unrecognized project category '{}'", label.trim()),
            )),
        }
    }

    fn missing(&self, label: &str, err: crate::error::FinregError, row_index: usize) -> ImportError {
        ImportError::classification(row_index, format!("project '{}': {}", label.trim(), err))
    }
}

const FIN_CERCETARII: &str = "Finanțarea cercetării științifice";
const MEN: &str = "Proiecte Ministerul Educației Naționale";

pub fn expenditure_project_rules() -> &'static [ProjectRule] {
    static RULES: OnceLock<Vec<ProjectRule>> = OnceLock::new();
    RULES.get_or_init(build_expenditure_rules)
}

fn build_expenditure_rules() -> Vec<ProjectRule> {
    use CategoryAction::{Clear, Keep};

    vec![
        // revenue sub-types typed in the project column
        ProjectRule::new(
            exact(&[
                "buget",
                "venituri ub",
                "venit bcr",
                "venituri bcr",
                "venituri",
                "trezorerie",
                "venit trezorerie",
                "ven trez",
                "venituri trezorerie",
            ]),
            Clear,
        )
        .details(Details::Label)
        .only_for(&[
            "Cercetare",
            "Cămine",
            "Facultatea de Chimie",
            "Grădina Botanică",
            "Venituri",
        ]),
        ProjectRule::new(exact(&["venit trezorerie/erasmus"]), Keep).source("Erasmus"),
        ProjectRule::set(exact(&["finantare complementara"]), "Finanțare complementară"),
        ProjectRule::set(exact(&["proiecte ub", "pr ub", "proiect ub"]), "Proiect intern UB"),
        ProjectRule::set(prefix(&["pr ub"]), "Proiect intern UB")
            .details(Details::StripPrefix(&["pr ub"])),
        ProjectRule::set(
            exact(&["pr nationale", "pr. national", "pr national"]),
            "Național",
        ),
        ProjectRule::set(
            exact(&["pr internationale", "pr. international"]),
            "Internațional",
        ),
        ProjectRule::set(
            exact(&["pr cu tva", "pr tva", "proiecte cu tva"]),
            "Proiect cu TVA",
        ),
        ProjectRule::set(
            exact(&["pr. cu finantare in valuta", "pr valuta", "proiecte in valuta"]),
            "Proiect cu finanțare în valută",
        ),
        ProjectRule::set(exact(&["premiile senatului"]), "Premiile Senatului"),
        // research programmes followed by a project reference
        ProjectRule::set(prefix(&["pfe"]), "PFE").details(Details::StripPrefix(&["pfe"])),
        ProjectRule::set(prefix(&["fss"]), "FSS").details(Details::StripPrefix(&["fss"])),
        ProjectRule::set(prefix(&["pr fss"]), "FSS").details(Details::StripPrefix(&["pr fss"])),
        ProjectRule::set(prefix(&["proiecte fss"]), "FSS")
            .details(Details::StripPrefix(&["proiecte fss"])),
        ProjectRule::set(prefix(&["fse"]), "FSE").details(Details::StripPrefix(&["fse"])),
        ProjectRule::set(prefix(&["fdi"]), "FDI").details(Details::StripPrefix(&["fdi"])),
        ProjectRule::set(prefix(&["pnrr", "pnnr"]), "PNRR")
            .details(Details::StripPrefix(&["pnrr", "pnnr"])),
        ProjectRule::set(pattern(r"^i\d"), "PNRR").details(Details::Label),
        ProjectRule::set(exact(&["edis"]), "EDIS"),
        ProjectRule::set(exact(&["cdi"]), "CDI"),
        ProjectRule::set(prefix(&["cdi"]), "CDI").details(Details::StripPrefix(&["cdi"])),
        ProjectRule::set(prefix(&["cpi"]), "CPI").details(Details::StripPrefix(&["cpi"])),
        ProjectRule::set(prefix(&["grant cpi"]), "CPI")
            .details(Details::StripPrefix(&["grant cpi"])),
        ProjectRule::set(prefix(&["pocu"]), "POCU").details(Details::StripPrefix(&["pocu"])),
        ProjectRule::set(prefix(&["fcs"]), FIN_CERCETARII).details(Details::StripPrefix(&["fcs"])),
        ProjectRule::set(prefix(&["see"]), "SEE").details(Details::StripPrefix(&["see"])),
        ProjectRule::set(prefix(&["ctr ka"]), "Erasmus").details(Details::Label),
        ProjectRule::new(prefix(&["ctr "]), Keep)
            .details(Details::Label)
            .only_for(&["Cercetare"]),
        ProjectRule::set(prefix(&["purowax", "pr purowax"]), "PUROWAX")
            .details(Details::StripPrefix(&["pr purowax", "purowax"])),
        ProjectRule::set(
            prefix(&["pr growing", "pr employer", "pr ev potential", "pr siec"]),
            FIN_CERCETARII,
        )
        .details(Details::StripSuffix(&["fin cercetarii stiintifice"])),
        ProjectRule::set(exact(&["fond cercetare chifiriuc"]), FIN_CERCETARII)
            .details(Details::Label),
        ProjectRule::set(prefix(&["timss"]), MEN).details(Details::Label),
        ProjectRule::set(prefix(&["pt timss"]), MEN).details(Details::StripPrefix(&["pt"])),
        // units named in the project column win over the source column
        ProjectRule::new(exact(&["editura ub"]), Clear).source("Editura UB"),
        ProjectRule::new(exact(&["academica"]), Clear).source("Casa de Oaspeți „Academica”"),
        ProjectRule::new(exact(&["casa universitarilor"]), Clear).source("Casa Universitarilor"),
        ProjectRule::set(
            exact(&[
                "finantarea cercetarii",
                "fin cercetarii",
                "finantarea cercetarii stiintifice",
                "fin cercetarii stiintifice",
                "finanatarea cercetarii stiintifice",
                "fond cercetare",
                "fond cercetare stiintifica",
            ]),
            FIN_CERCETARII,
        ),
        ProjectRule::new(exact(&["icub"]), Clear).source("ICUB"),
        ProjectRule::new(exact(&["camine"]), Clear).source("Cămine"),
        ProjectRule::set(exact(&["drept universal", "dr universal"]), "Drept Universal"),
        ProjectRule::set(
            exact(&[
                "civis cofinantare",
                "cofinantare civis",
                "co-finantare civis",
                "venituri/cofinantare civis",
            ]),
            "Cofinanțare CIVIS",
        ),
        ProjectRule::set(exact(&["civis"]), "CIVIS 2").details(Details::Label),
        ProjectRule::set(prefix(&["pr civis 2"]), "CIVIS 2")
            .details(Details::StripPrefix(&["pr civis 2"])),
        // Erasmus family
        ProjectRule::new(prefix(&["erasmus"]), Keep).details(Details::StripPrefix(&["erasmus"])),
        ProjectRule::new(prefix(&["pr erasmus", "pr didafe"]), Keep).details(Details::Label),
        ProjectRule::new(pattern(r"^pr \d+"), Keep).details(Details::Label),
        ProjectRule::set(exact(&["ven erasmus"]), "Erasmus"),
        ProjectRule::set(prefix(&["proiect caipe"]), "CAIPE"),
        ProjectRule::set(prefix(&["proiect cdi"]), "CDI")
            .details(Details::StripPrefix(&["proiect cdi"])),
        ProjectRule::set(prefix(&["proiect addendum"]), "CDI")
            .details(Details::StripPrefix(&["proiect addendum"])),
        ProjectRule::new(pattern(r"^(proiect \d|pr ka|pr renewteach)"), Clear)
            .details(Details::Label)
            .only_for(&["Erasmus"]),
        ProjectRule::set(exact(&["llp/erasmus", "finantare valuta"]), "LLP/Erasmus"),
        ProjectRule::set(exact(&["progr comunitare erasmus"]), "Programe comunitare Erasmus"),
        ProjectRule::set(exact(&["fondul rectorului", "protocol rector"]), "Fondul Rectorului"),
        ProjectRule::set(exact(&["grant doctoral"]), "Grant doctoral"),
        ProjectRule::new(exact(&["catedra sport"]), Clear)
            .source("Departamentul de Educație Fizică și Sport"),
        ProjectRule::new(exact(&["csud"]), Clear)
            .source("Consiliul Studiilor Universitare de Doctorat"),
        ProjectRule::new(exact(&["st braila"]), Clear)
            .source("Stațiunea de Cercetări Ecologice Brăila"),
        ProjectRule::new(exact(&["st orsova"]), Clear).source("Stațiunea de cercetare de la Orșova"),
        ProjectRule::new(exact(&["st sinaia"]), Clear).source("Stațiunea Zoologică Sinaia"),
        // the project column used for something else entirely
        ProjectRule::new(
            prefix(&[
                "global campus",
                "proiect masks",
                "pr ebelong2",
                "grozavesti",
                "pallady",
                "st militaru",
            ]),
            Clear,
        )
        .details(Details::Label),
        ProjectRule::new(
            exact(&[
                "imobil d brandza",
                "inst botanic",
                "poligrafie",
                "cam fundeni",
                "cam magurele",
                "cam grozavesti a1",
            ]),
            Clear,
        )
        .details(Details::Label),
        ProjectRule::new(exact(&["altele", "burse"]), Clear),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportErrorKind;
    use crate::import::catalog::fixtures;
    use crate::import::financing::FinancingSourceClassifier;
    use crate::import::RegistryTable;

    fn classify<'c>(
        catalog: &'c CatalogSnapshot,
        source_label: &str,
        project_label: &str,
    ) -> Result<(SourceMatch<'c>, ProjectMatch<'c>), ImportError> {
        let sources = FinancingSourceClassifier::for_table(catalog, RegistryTable::Expenditures);
        let source = sources.classify(source_label, 5)?;
        let projects = ProjectCategoryClassifier::for_expenditures(catalog);
        let project = projects.classify(project_label, &source, 5)?;
        Ok((source, project))
    }

    fn category_name(m: &ProjectMatch<'_>) -> Option<String> {
        m.category.map(|c| c.name.clone())
    }

    #[test]
    fn test_pnrr_prefix_keeps_details() {
        let catalog = fixtures::catalog();
        let (_, project) = classify(&catalog, "pnrr", "pnrr/renovare A").unwrap();
        assert_eq!(category_name(&project), Some("PNRR".into()));
        assert_eq!(project.details.as_deref(), Some("renovare A"));
    }

    #[test]
    fn test_revenue_subtype_has_no_category() {
        let catalog = fixtures::catalog();
        let (source, project) = classify(&catalog, "venituri ub", "buget").unwrap();
        assert_eq!(source.sources[0].name, "Venituri");
        assert_eq!(project.category, None);
        assert_eq!(project.details.as_deref(), Some("buget"));
    }

    #[test]
    fn test_revenue_subtype_rejected_for_other_sources() {
        let catalog = fixtures::catalog();
        let err = classify(&catalog, "pnrr", "buget").unwrap_err();
        assert_eq!(err.kind, ImportErrorKind::Consistency);
        assert!(err.message.contains("PNRR"));
    }

    #[test]
    fn test_erasmus_projects_require_erasmus_source() {
        let catalog = fixtures::catalog();
        let (_, project) = classify(&catalog, "erasmus", "proiect 2023-1-RO01").unwrap();
        assert_eq!(project.category, None);
        assert_eq!(project.details.as_deref(), Some("proiect 2023-1-RO01"));

        let err = classify(&catalog, "venituri", "proiect 2023-1-RO01").unwrap_err();
        assert_eq!(err.kind, ImportErrorKind::Consistency);
    }

    #[test]
    fn test_project_label_overrides_source() {
        let catalog = fixtures::catalog();
        let (_, project) = classify(&catalog, "venituri", "icub").unwrap();
        assert_eq!(project.source_override.unwrap().name, "ICUB");
        assert_eq!(project.category, None);
    }

    #[test]
    fn test_keep_uses_category_from_source_label() {
        let catalog = fixtures::catalog();
        let (_, project) = classify(&catalog, "drept universal", "").unwrap();
        assert_eq!(category_name(&project), Some("Drept Universal".into()));
        assert_eq!(project.details, None);

        let (_, project) = classify(&catalog, "drept universal", "venit trezorerie/erasmus").unwrap();
        assert_eq!(category_name(&project), Some("Drept Universal".into()));
        assert_eq!(project.source_override.unwrap().name, "Erasmus");
    }

    #[test]
    fn test_suffix_rule() {
        let catalog = fixtures::catalog();
        let (_, project) =
            classify(&catalog, "cercetare", "pr growing - fin cercetarii stiintifice").unwrap();
        assert_eq!(category_name(&project), Some(FIN_CERCETARII.into()));
        assert_eq!(project.details.as_deref(), Some("pr growing"));
    }

    #[test]
    fn test_literal_rules() {
        let catalog = fixtures::catalog();
        let cases = [
            ("pr ub", "Proiect intern UB", None),
            ("pr ub/Cercetare aplicata", "Proiect intern UB", Some("Cercetare aplicata")),
            ("PR TVA", "Proiect cu TVA", None),
            ("fss/ctr 44", "FSS", Some("ctr 44")),
            ("pr fss/ctr 45", "FSS", Some("ctr 45")),
            ("i5 digitalizare", "PNRR", Some("i5 digitalizare")),
            ("CDI", "CDI", None),
            ("pt timss 2023", MEN, Some("timss 2023")),
            ("civis", "CIVIS 2", Some("civis")),
            ("ven erasmus", "Erasmus", None),
        ];
        for (label, category, details) in cases {
            let (_, project) = classify(&catalog, "cercetare", label).unwrap();
            assert_eq!(category_name(&project), Some(category.to_string()), "label {label}");
            assert_eq!(project.details.as_deref(), details, "label {label}");
        }
    }

    #[test]
    fn test_misused_column_kept_as_details() {
        let catalog = fixtures::catalog();
        let (_, project) = classify(&catalog, "camine", "Grozavesti corp B").unwrap();
        assert_eq!(project.category, None);
        assert_eq!(project.details.as_deref(), Some("Grozavesti corp B"));
    }

    #[test]
    fn test_unrecognized_project_falls_back_to_import_code() {
        let catalog = fixtures::catalog_with(
            |_| {},
            |categories| {
                categories.push(ProjectCategory::new("Horizon Europe").with_import_code("^horizon"))
            },
        );
        let (_, project) = classify(&catalog, "cercetare", "Horizon 101").unwrap();
        assert_eq!(category_name(&project), Some("Horizon Europe".into()));

        let err = classify(&catalog, "cercetare", "Proiect Necunoscut").unwrap_err();
        assert_eq!(err.kind, ImportErrorKind::Classification);
        assert!(err.message.contains("'Proiect Necunoscut'"));
    }

    #[test]
    fn test_every_rule_references_catalog_names() {
        let catalog = fixtures::catalog();
        for rule in expenditure_project_rules() {
            if let CategoryAction::Set(name) = rule.category {
                assert!(catalog.project_categories.find_by_name(name).is_some(), "{name}");
            }
            for name in rule.source.iter().chain(rule.allowed_sources) {
                assert!(catalog.financing_sources.find_by_name(name).is_some(), "{name}");
            }
        }
    }
}
