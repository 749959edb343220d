//! Reference catalog snapshot
//!
//! Taken once at the start of a batch and never mutated while rows are
//! classified. Import code patterns are compiled here, so an invalid
//! admin-entered pattern fails the snapshot instead of a random row.

use regex::{Regex, RegexBuilder};

use crate::error::{FinregError, FinregResult};
use crate::models::{ExpenditureArticle, FinancingSource, PaymentType, ProjectCategory};

/// A reference entity that can be looked up by a key and, optionally,
/// matched by its import code
pub trait CatalogEntry {
    /// Entity name used in error messages
    const KIND: &'static str;

    /// Exact lookup key: the name, or the code for expenditure articles
    fn lookup_key(&self) -> &str;

    fn import_code(&self) -> &str {
        ""
    }
}

impl CatalogEntry for FinancingSource {
    const KIND: &'static str = "Financing source";

    fn lookup_key(&self) -> &str {
        &self.name
    }

    fn import_code(&self) -> &str {
        &self.import_code
    }
}

impl CatalogEntry for ProjectCategory {
    const KIND: &'static str = "Project category";

    fn lookup_key(&self) -> &str {
        &self.name
    }

    fn import_code(&self) -> &str {
        &self.import_code
    }
}

impl CatalogEntry for ExpenditureArticle {
    const KIND: &'static str = "Expenditure article";

    fn lookup_key(&self) -> &str {
        &self.code
    }
}

impl CatalogEntry for PaymentType {
    const KIND: &'static str = "Payment type";

    fn lookup_key(&self) -> &str {
        &self.name
    }
}

/// Compile an import code the way every lookup expects it
pub fn compile_import_code(code: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(code).case_insensitive(true).build()
}

/// Entities of one kind in stable catalog order, with compiled import codes
#[derive(Debug, Clone)]
pub struct EntityIndex<T> {
    entries: Vec<T>,
    /// (position in `entries`, compiled pattern) for non-empty import codes
    patterns: Vec<(usize, Regex)>,
}

impl<T: CatalogEntry> EntityIndex<T> {
    pub fn new(entries: Vec<T>) -> FinregResult<Self> {
        let mut patterns = Vec::new();
        for (position, entry) in entries.iter().enumerate() {
            let code = entry.import_code();
            if code.is_empty() {
                continue;
            }
            let regex = compile_import_code(code).map_err(|e| {
                FinregError::Catalog(format!(
                    "{} '{}' has an invalid import code '{}': {}",
                    T::KIND,
                    entry.lookup_key(),
                    code,
                    e
                ))
            })?;
            patterns.push((position, regex));
        }
        Ok(Self { entries, patterns })
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact, case-sensitive lookup
    pub fn find_by_name(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|e| e.lookup_key() == key)
    }

    /// Lookup for entities the caller asserts must exist
    pub fn require_by_name(&self, key: &str) -> FinregResult<&T> {
        self.find_by_name(key).ok_or_else(|| FinregError::NotFound {
            entity_type: T::KIND,
            identifier: key.to_string(),
        })
    }

    /// Case-insensitive lookup, for short labels such as payment types
    pub fn find_ignoring_case(&self, key: &str) -> Option<&T> {
        let key = key.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.lookup_key().to_lowercase() == key)
    }

    /// First entity (in catalog order) whose import code matches `text`
    pub fn find_by_code_scan(&self, text: &str) -> Option<&T> {
        self.patterns
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(position, _)| &self.entries[*position])
    }

    /// Every entity whose import code matches `text`, in catalog order
    pub fn scan_all(&self, text: &str) -> Vec<&T> {
        self.patterns
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(position, _)| &self.entries[*position])
            .collect()
    }
}

/// Immutable view of the whole reference catalog for one batch
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub financing_sources: EntityIndex<FinancingSource>,
    pub project_categories: EntityIndex<ProjectCategory>,
    pub articles: EntityIndex<ExpenditureArticle>,
    pub payment_types: EntityIndex<PaymentType>,
}

impl CatalogSnapshot {
    pub fn new(
        financing_sources: Vec<FinancingSource>,
        project_categories: Vec<ProjectCategory>,
        articles: Vec<ExpenditureArticle>,
        payment_types: Vec<PaymentType>,
    ) -> FinregResult<Self> {
        Ok(Self {
            financing_sources: EntityIndex::new(financing_sources)?,
            project_categories: EntityIndex::new(project_categories)?,
            articles: EntityIndex::new(articles)?,
            payment_types: EntityIndex::new(payment_types)?,
        })
    }

    pub fn empty() -> Self {
        Self {
            financing_sources: EntityIndex {
                entries: Vec::new(),
                patterns: Vec::new(),
            },
            project_categories: EntityIndex {
                entries: Vec::new(),
                patterns: Vec::new(),
            },
            articles: EntityIndex {
                entries: Vec::new(),
                patterns: Vec::new(),
            },
            payment_types: EntityIndex {
                entries: Vec::new(),
                patterns: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! A catalog mirroring the university's production reference data

    use super::*;

    pub const SOURCES: &[&str] = &[
        "Direcția Financiar-Contabilă",
        "Venituri",
        "Finanțare complementară",
        "Sponsorizare",
        "Cercetare",
        "PNRR",
        "POCU",
        "FDI",
        "CDI",
        "Cămine",
        "Cantine",
        "Casierie",
        "Editura UB",
        "Teren de sport",
        "Casa Universitarilor",
        "PUROWAX",
        "SEE",
        "Erasmus",
        "CIVIS",
        "Grădina Botanică",
        "Stațiunea de cercetări de la Sfântu Gheorghe",
        "Stațiunea de cercetare de la Orșova",
        "Stațiunea de Cercetări Ecologice Brăila",
        "Stațiunea Zoologică Sinaia",
        "Geoparcul Țara Hațegului",
        "Casa de Oaspeți „Academica”",
        "Hotel Gaudeamus",
        "Institutul Confucius",
        "Centrul de Limbi Străine",
        "Consiliul Studiilor Universitare de Doctorat",
        "ICUB",
        "Serviciul Spații de Învățământ",
        "Facultatea de Administrație și Afaceri",
        "Facultatea de Biologie",
        "Facultatea de Chimie",
        "Facultatea de Drept",
        "Facultatea de Filosofie",
        "Facultatea de Fizică",
        "Facultatea de Istorie",
        "Facultatea de Teologie Ortodoxă",
        "Facultatea de Teologie Baptistă",
        "Facultatea de Teologie Romano-Catolică",
        "Facultatea de Geografie",
        "Facultatea de Geologie și Geofizică",
        "Facultatea de Litere",
        "Facultatea de Limbi și Literaturi Străine",
        "Limbi Moderne Aplicate",
        "Facultatea de Matematică și Informatică",
        "Facultatea de Jurnalism",
        "Facultatea de Psihologie și Științele Educației",
        "Facultatea de Științe Politice",
        "Facultatea de Sociologie și Asistență Socială",
        "Departamentul de Educație Fizică și Sport",
        "Microproducție",
        "Parc auto",
        "Direcția Cămine-Cantine și Activități Studențești",
        "Direcția Patrimoniu Imobiliar",
        "Direcția Tehnică",
        "Direcția Generală Management Academic",
        "Direcția Relații Internaționale",
        "Direcția Comunicare și Relații Publice",
        "Direcția IT&C",
        "Serviciul Social și Activități Studențești",
        "Serviciul Achiziții Publice",
        "Direcția Resurse Umane",
    ];

    pub const CATEGORIES: &[&str] = &[
        "Drept Universal",
        "Finanțare complementară",
        "Proiect intern UB",
        "Național",
        "Internațional",
        "Proiect cu TVA",
        "Proiect cu finanțare în valută",
        "Premiile Senatului",
        "PFE",
        "FSS",
        "FSE",
        "FDI",
        "PNRR",
        "EDIS",
        "CDI",
        "CPI",
        "POCU",
        "Finanțarea cercetării științifice",
        "SEE",
        "Erasmus",
        "PUROWAX",
        "Proiecte Ministerul Educației Naționale",
        "Cofinanțare CIVIS",
        "CIVIS 2",
        "CAIPE",
        "LLP/Erasmus",
        "Programe comunitare Erasmus",
        "Fondul Rectorului",
        "Grant doctoral",
    ];

    pub const ARTICLES: &[&str] = &["10.01.01", "20.01.01", "20.02", "59.01", "59.40"];

    pub const PAYMENT_TYPES: &[&str] = &["Numerar", "Virament", "Avans numerar", "Avans virament"];

    pub fn catalog() -> CatalogSnapshot {
        catalog_with(|_| {}, |_| {})
    }

    /// The production catalog with hooks to tweak sources and categories
    pub fn catalog_with(
        tweak_sources: impl FnOnce(&mut Vec<FinancingSource>),
        tweak_categories: impl FnOnce(&mut Vec<ProjectCategory>),
    ) -> CatalogSnapshot {
        let mut sources: Vec<FinancingSource> =
            SOURCES.iter().map(|n| FinancingSource::new(*n)).collect();
        let mut categories: Vec<ProjectCategory> =
            CATEGORIES.iter().map(|n| ProjectCategory::new(*n)).collect();
        tweak_sources(&mut sources);
        tweak_categories(&mut categories);

        let articles = ARTICLES
            .iter()
            .map(|c| ExpenditureArticle::new(*c, format!("Articol {}", c)))
            .collect();
        let payment_types = PAYMENT_TYPES.iter().map(|n| PaymentType::new(*n)).collect();

        CatalogSnapshot::new(sources, categories, articles, payment_types).unwrap()
    }
}
