//! Catalog service
//!
//! Maintains the reference catalog: seeding it from a YAML file, importing
//! one reference table from a spreadsheet, and listing it. Entries are
//! found by name (code for articles) and updated in place, so re-running a
//! seed is harmless.

use std::fmt;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::audit::{AuditEntry, TargetTable};
use crate::error::{FinregError, FinregResult, ImportError};
use crate::import::catalog::compile_import_code;
use crate::import::codes::{article_code_text, normalize_article_code};
use crate::import::{sheet, BatchImporter, CatalogEntry, CatalogSnapshot, RecordSink, RowParser};
use crate::models::reference::{normalize_import_code, ReferenceValidationError};
use crate::models::{ExpenditureArticle, FinancingSource, PaymentType, ProjectCategory, RawRow};
use crate::storage::{CatalogData, Storage};

/// Reference catalog contents as written by hand in a seed file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub financing_sources: Vec<SourceSeed>,
    #[serde(default)]
    pub project_categories: Vec<CategorySeed>,
    #[serde(default)]
    pub articles: Vec<ArticleSeed>,
    #[serde(default)]
    pub payment_types: Vec<PaymentTypeSeed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSeed {
    pub name: String,
    #[serde(default)]
    pub import_code: String,
    /// None keeps the stored flag
    #[serde(default)]
    pub requires_project_category: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySeed {
    pub name: String,
    #[serde(default)]
    pub import_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSeed {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub expenditure_category_code: String,
    #[serde(default)]
    pub commitment_category_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTypeSeed {
    pub name: String,
}

/// One seed entry mapped onto its catalog entity
trait SeedItem {
    type Entity: CatalogEntry + Clone + Serialize;

    const TABLE: TargetTable;

    fn key(&self) -> String;

    fn create(&self) -> Self::Entity;

    /// Copy the seed's values onto an existing entity; true if anything changed
    fn apply(&self, entity: &mut Self::Entity) -> bool;

    fn validate(entity: &Self::Entity) -> Result<(), ReferenceValidationError>;
}

impl SeedItem for SourceSeed {
    type Entity = FinancingSource;
    const TABLE: TargetTable = TargetTable::FinancingSources;

    fn key(&self) -> String {
        self.name.trim().to_string()
    }

    fn create(&self) -> FinancingSource {
        let mut source = FinancingSource::new(&self.name).with_import_code(&self.import_code);
        source.requires_project_category = self.requires_project_category.unwrap_or(false);
        source
    }

    fn apply(&self, source: &mut FinancingSource) -> bool {
        let mut changed = false;
        let code = normalize_import_code(&self.import_code);
        if source.import_code != code {
            source.import_code = code;
            changed = true;
        }
        if let Some(required) = self.requires_project_category {
            if source.requires_project_category != required {
                source.requires_project_category = required;
                changed = true;
            }
        }
        if changed {
            source.updated_at = Utc::now();
        }
        changed
    }

    fn validate(source: &FinancingSource) -> Result<(), ReferenceValidationError> {
        source.validate()
    }
}

impl SeedItem for CategorySeed {
    type Entity = ProjectCategory;
    const TABLE: TargetTable = TargetTable::ProjectCategories;

    fn key(&self) -> String {
        self.name.trim().to_string()
    }

    fn create(&self) -> ProjectCategory {
        ProjectCategory::new(&self.name).with_import_code(&self.import_code)
    }

    fn apply(&self, category: &mut ProjectCategory) -> bool {
        let code = normalize_import_code(&self.import_code);
        if category.import_code == code {
            return false;
        }
        category.set_import_code(&code);
        true
    }

    fn validate(category: &ProjectCategory) -> Result<(), ReferenceValidationError> {
        category.validate()
    }
}

impl SeedItem for ArticleSeed {
    type Entity = ExpenditureArticle;
    const TABLE: TargetTable = TargetTable::ExpenditureArticles;

    fn key(&self) -> String {
        normalize_article_code(&self.code)
    }

    fn create(&self) -> ExpenditureArticle {
        let mut article = ExpenditureArticle::new(self.key(), &self.name);
        article.expenditure_category_code = self.expenditure_category_code.trim().to_string();
        article.commitment_category_code = self.commitment_category_code.trim().to_string();
        article
    }

    fn apply(&self, article: &mut ExpenditureArticle) -> bool {
        let name = self.name.trim();
        let expenditure = self.expenditure_category_code.trim();
        let commitment = self.commitment_category_code.trim();
        if article.name == name
            && article.expenditure_category_code == expenditure
            && article.commitment_category_code == commitment
        {
            return false;
        }
        article.name = name.to_string();
        article.expenditure_category_code = expenditure.to_string();
        article.commitment_category_code = commitment.to_string();
        article.updated_at = Utc::now();
        true
    }

    fn validate(article: &ExpenditureArticle) -> Result<(), ReferenceValidationError> {
        article.validate()
    }
}

impl SeedItem for PaymentTypeSeed {
    type Entity = PaymentType;
    const TABLE: TargetTable = TargetTable::PaymentTypes;

    fn key(&self) -> String {
        self.name.trim().to_string()
    }

    fn create(&self) -> PaymentType {
        PaymentType::new(&self.name)
    }

    // Payment types carry nothing besides their name
    fn apply(&self, _: &mut PaymentType) -> bool {
        false
    }

    fn validate(payment_type: &PaymentType) -> Result<(), ReferenceValidationError> {
        payment_type.validate()
    }
}

/// Counts of a seed or catalog import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// The reference table targeted by a catalog spreadsheet import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    FinancingSources,
    ProjectCategories,
    Articles,
    PaymentTypes,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FinancingSources => write!(f, "financing sources"),
            Self::ProjectCategories => write!(f, "project categories"),
            Self::Articles => write!(f, "expenditure articles"),
            Self::PaymentTypes => write!(f, "payment types"),
        }
    }
}

/// Outcome of a catalog spreadsheet import
#[derive(Debug, Clone)]
pub struct CatalogImportSummary {
    pub kind: CatalogKind,
    pub rows_attempted: usize,
    pub errors: Vec<ImportError>,
    /// None when the sheet was rejected
    pub applied: Option<SeedSummary>,
}

/// Service for reference catalog management
pub struct CatalogService<'a> {
    storage: &'a Storage,
    user: &'a str,
}

impl<'a> CatalogService<'a> {
    pub fn new(storage: &'a Storage, user: &'a str) -> Self {
        Self { storage, user }
    }

    /// Load a YAML seed file into the catalog
    pub fn seed_from_yaml(&self, path: &Path) -> FinregResult<SeedSummary> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            FinregError::Io(format!("Failed to read seed file {}: {}", path.display(), e))
        })?;
        let seed: CatalogSeed = serde_yaml::from_str(&contents)?;
        self.seed(&seed)
    }

    /// Find-or-update every seed entry, then save the catalog in one write.
    /// Nothing is saved if any entry is invalid.
    pub fn seed(&self, seed: &CatalogSeed) -> FinregResult<SeedSummary> {
        let mut data = self.storage.catalog.data()?;
        let mut audit = Vec::new();
        let mut summary = SeedSummary::default();

        self.merge(&seed.financing_sources, &mut data.financing_sources, &mut audit, &mut summary)?;
        self.merge(&seed.project_categories, &mut data.project_categories, &mut audit, &mut summary)?;
        self.merge(&seed.articles, &mut data.articles, &mut audit, &mut summary)?;
        self.merge(&seed.payment_types, &mut data.payment_types, &mut audit, &mut summary)?;

        // compiles every import code once more, as an import batch would
        verify(&data)?;

        if !audit.is_empty() {
            self.storage.catalog.replace(data)?;
            self.storage.catalog.save()?;
            self.storage.log_audit(&audit)?;
        }

        info!(
            inserted = summary.inserted,
            updated = summary.updated,
            unchanged = summary.unchanged,
            "catalog seeded"
        );
        Ok(summary)
    }

    fn merge<S: SeedItem>(
        &self,
        items: &[S],
        rows: &mut Vec<S::Entity>,
        audit: &mut Vec<AuditEntry>,
        summary: &mut SeedSummary,
    ) -> FinregResult<()> {
        for item in items {
            let key = item.key();
            match rows.iter_mut().find(|e| e.lookup_key() == key) {
                Some(existing) => {
                    let before = existing.clone();
                    if !item.apply(existing) {
                        summary.unchanged += 1;
                        continue;
                    }
                    S::validate(existing).map_err(|e| invalid::<S::Entity>(&key, e))?;
                    audit.push(AuditEntry::update(self.user, S::TABLE, &key, &before, &*existing));
                    summary.updated += 1;
                }
                None => {
                    let entity = item.create();
                    S::validate(&entity).map_err(|e| invalid::<S::Entity>(&key, e))?;
                    let table = S::TABLE;
                    debug!(%table, key = %key, "catalog entry added");
                    audit.push(AuditEntry::insert(self.user, S::TABLE, &key, &entity));
                    rows.push(entity);
                    summary.inserted += 1;
                }
            }
        }
        Ok(())
    }

    /// Import one reference table from a spreadsheet whose first row is a
    /// header. All rows are applied or none.
    pub fn import_spreadsheet(
        &self,
        kind: CatalogKind,
        path: &Path,
        max_errors: usize,
    ) -> FinregResult<CatalogImportSummary> {
        let rows = sheet::read_rows(path, 2)?;
        self.import_rows(kind, rows, max_errors)
    }

    pub fn import_rows(
        &self,
        kind: CatalogKind,
        rows: Vec<RawRow>,
        max_errors: usize,
    ) -> FinregResult<CatalogImportSummary> {
        let parser = CatalogRowParser { kind };
        let mut sink = SeedSink::default();
        let report = BatchImporter::new(max_errors).run(&parser, rows, &mut sink)?;

        let applied = if report.is_success() {
            let mut seed = CatalogSeed::default();
            for entry in report.committed {
                seed.push(entry);
            }
            Some(self.seed(&seed)?)
        } else {
            None
        };

        Ok(CatalogImportSummary {
            kind,
            rows_attempted: report.rows_attempted,
            errors: report.errors,
            applied,
        })
    }

    pub fn list(&self) -> FinregResult<CatalogData> {
        self.storage.catalog.data()
    }

    /// Frozen, compiled view of the catalog
    pub fn snapshot(&self) -> FinregResult<CatalogSnapshot> {
        self.storage.catalog.snapshot()
    }
}

fn invalid<E: CatalogEntry>(key: &str, error: ReferenceValidationError) -> FinregError {
    match error {
        ReferenceValidationError::InvalidImportCode { .. } => {
            FinregError::Catalog(format!("{} '{}': {}", E::KIND, key, error))
        }
        _ => FinregError::Validation(format!("{} '{}': {}", E::KIND, key, error)),
    }
}

fn verify(data: &CatalogData) -> FinregResult<()> {
    CatalogSnapshot::new(
        data.financing_sources.clone(),
        data.project_categories.clone(),
        data.articles.clone(),
        data.payment_types.clone(),
    )
    .map(|_| ())
}

/// A row of a reference table spreadsheet
#[derive(Debug, Clone, PartialEq)]
enum SeedEntry {
    Source(SourceSeed),
    Category(CategorySeed),
    Article(ArticleSeed),
    PaymentType(PaymentTypeSeed),
}

impl CatalogSeed {
    fn push(&mut self, entry: SeedEntry) {
        match entry {
            SeedEntry::Source(s) => self.financing_sources.push(s),
            SeedEntry::Category(c) => self.project_categories.push(c),
            SeedEntry::Article(a) => self.articles.push(a),
            SeedEntry::PaymentType(p) => self.payment_types.push(p),
        }
    }
}

struct CatalogRowParser {
    kind: CatalogKind,
}

impl CatalogRowParser {
    fn required(row: &RawRow, column: usize, what: &str) -> Result<String, ImportError> {
        let value = row.text(column);
        if value.is_empty() {
            return Err(ImportError::row_format(row.row_index, format!("missing {}", what)));
        }
        Ok(value)
    }

    fn import_code(row: &RawRow, column: usize) -> Result<String, ImportError> {
        let code = normalize_import_code(&row.text(column));
        if !code.is_empty() {
            compile_import_code(&code).map_err(|e| {
                ImportError::row_format(
                    row.row_index,
                    format!("invalid import code '{}': {}", code, e),
                )
            })?;
        }
        Ok(code)
    }
}

impl RowParser for CatalogRowParser {
    type Record = SeedEntry;

    fn parse(&self, row: &RawRow) -> Result<Option<SeedEntry>, ImportError> {
        let entry = match self.kind {
            CatalogKind::FinancingSources => SeedEntry::Source(SourceSeed {
                name: Self::required(row, 0, "name")?,
                import_code: Self::import_code(row, 1)?,
                requires_project_category: None,
            }),
            CatalogKind::ProjectCategories => SeedEntry::Category(CategorySeed {
                name: Self::required(row, 0, "name")?,
                import_code: Self::import_code(row, 1)?,
            }),
            CatalogKind::Articles => {
                let code = normalize_article_code(&article_code_text(row.cell(0)));
                if code.is_empty() {
                    return Err(ImportError::row_format(row.row_index, "missing code"));
                }
                SeedEntry::Article(ArticleSeed {
                    code,
                    name: Self::required(row, 1, "name")?,
                    expenditure_category_code: row.text(2),
                    commitment_category_code: row.text(3),
                })
            }
            CatalogKind::PaymentTypes => SeedEntry::PaymentType(PaymentTypeSeed {
                name: Self::required(row, 0, "name")?,
            }),
        };
        Ok(Some(entry))
    }

    fn is_end_of_table(&self, row: &RawRow) -> bool {
        row.is_blank(0) && row.is_blank(1)
    }
}

/// Stages rows in memory; a duplicate key inside the sheet is rejected
#[derive(Default)]
struct SeedSink {
    staged: Vec<SeedEntry>,
}

impl SeedSink {
    fn key(entry: &SeedEntry) -> (u8, String) {
        match entry {
            SeedEntry::Source(s) => (0, s.key()),
            SeedEntry::Category(c) => (1, c.key()),
            SeedEntry::Article(a) => (2, a.key()),
            SeedEntry::PaymentType(p) => (3, p.key()),
        }
    }
}

impl RecordSink for SeedSink {
    type Record = SeedEntry;

    fn save(&mut self, entry: SeedEntry) -> Result<(), Vec<String>> {
        let key = Self::key(&entry);
        if self.staged.iter().any(|e| Self::key(e) == key) {
            return Err(vec![format!("'{}' appears more than once", key.1)]);
        }
        self.staged.push(entry);
        Ok(())
    }

    fn commit(&mut self) -> FinregResult<Vec<SeedEntry>> {
        Ok(std::mem::take(&mut self.staged))
    }

    fn rollback(&mut self) {
        self.staged.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Action;
    use crate::config::paths::FinregPaths;
    use crate::error::ImportErrorKind;
    use crate::raw_row;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinregPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    const SEED: &str = r#"
financing_sources:
  - name: Venituri
    import_code: "^venit"
  - name: PNRR
    requires_project_category: true
project_categories:
  - name: Drept Universal
    import_code: "drept univ"
articles:
  - code: "59.4"
    name: Burse
    expenditure_category_code: "59"
payment_types:
  - name: Numerar
"#;

    #[test]
    fn test_seed_from_yaml() {
        let (dir, storage) = create_test_storage();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, SEED).unwrap();

        let service = CatalogService::new(&storage, "admin");
        let summary = service.seed_from_yaml(&path).unwrap();
        assert_eq!(summary.inserted, 5);
        assert_eq!(summary.updated, 0);

        let data = service.list().unwrap();
        assert!(data.financing_sources[1].requires_project_category);
        assert_eq!(data.articles[0].code, "59.40");
        assert_eq!(data.articles[0].expenditure_category_code, "59");

        let audit = storage.audit().read_all().unwrap();
        assert_eq!(audit.len(), 5);
        assert_eq!(audit[0].user, "admin");
        assert_eq!(audit[0].target, "Venituri");

        // persisted
        let reloaded = crate::storage::CatalogRepository::new(storage.paths().catalog_file());
        reloaded.load().unwrap();
        assert_eq!(reloaded.financing_sources.count().unwrap(), 2);
    }

    #[test]
    fn test_reseed_updates_in_place() {
        let (_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage, "admin");
        let seed: CatalogSeed = serde_yaml::from_str(SEED).unwrap();
        service.seed(&seed).unwrap();
        let original = storage.catalog.financing_sources.get_by_key("PNRR").unwrap().unwrap();

        let again = service.seed(&seed).unwrap();
        assert_eq!(again, SeedSummary { inserted: 0, updated: 0, unchanged: 5 });

        let mut changed = seed.clone();
        changed.financing_sources[1].import_code = "  PNRR|PNNR ".into();
        let summary = service.seed(&changed).unwrap();
        assert_eq!(summary.updated, 1);

        let updated = storage.catalog.financing_sources.get_by_key("PNRR").unwrap().unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.import_code, "pnrr|pnnr");
        assert!(updated.requires_project_category);

        let last = storage.audit().read_recent(1).unwrap();
        assert_eq!(last[0].action, Action::Update);
        assert!(last[0].before.is_some());
    }

    #[test]
    fn test_invalid_import_code_rejects_whole_seed() {
        let (_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage, "admin");
        let seed = CatalogSeed {
            financing_sources: vec![
                SourceSeed {
                    name: "Venituri".into(),
                    import_code: String::new(),
                    requires_project_category: None,
                },
                SourceSeed {
                    name: "Cercetare".into(),
                    import_code: "([".into(),
                    requires_project_category: None,
                },
            ],
            ..CatalogSeed::default()
        };

        let err = service.seed(&seed).unwrap_err();
        assert!(matches!(err, FinregError::Catalog(_)));
        assert!(storage.catalog.is_empty().unwrap());
        assert!(storage.audit().read_all().unwrap().is_empty());
    }

    #[test]
    fn test_empty_name_is_validation_error() {
        let (_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage, "admin");
        let seed = CatalogSeed {
            payment_types: vec![PaymentTypeSeed { name: "   ".into() }],
            ..CatalogSeed::default()
        };
        assert!(service.seed(&seed).unwrap_err().is_validation());
    }

    #[test]
    fn test_import_articles_from_rows() {
        let (_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage, "admin");
        let rows = vec![
            raw_row![2; 10.0101, "Salarii de baza", "10", "10"],
            raw_row![3; "20.02.", "Reparatii curente", "20", "20"],
            raw_row![4; "", ""],
            raw_row![5; "59.01", "Ignorat dupa sfarsitul tabelului"],
        ];

        let summary = service.import_rows(CatalogKind::Articles, rows, 10).unwrap();
        assert!(summary.errors.is_empty());
        assert_eq!(summary.rows_attempted, 2);
        assert_eq!(summary.applied.unwrap().inserted, 2);

        let articles = storage.catalog.articles.get_all().unwrap();
        assert_eq!(articles[0].code, "10.01");
        assert_eq!(articles[1].code, "20.02");
    }

    #[test]
    fn test_catalog_import_is_all_or_nothing() {
        let (_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage, "admin");
        let rows = vec![
            raw_row![2; "Venituri", "^venit"],
            raw_row![3; "Cercetare", "(["],
            raw_row![4; "Venituri", ""],
        ];

        let summary = service
            .import_rows(CatalogKind::FinancingSources, rows, 10)
            .unwrap();
        assert!(summary.applied.is_none());
        assert_eq!(summary.errors.len(), 2);
        assert_eq!(summary.errors[0].row_index, 3);
        assert_eq!(summary.errors[0].kind, ImportErrorKind::RowFormat);
        assert_eq!(summary.errors[1].kind, ImportErrorKind::PersistenceValidation);
        assert!(storage.catalog.is_empty().unwrap());
    }

    #[test]
    fn test_import_payment_types_from_csv() {
        let (dir, storage) = create_test_storage();
        let path = dir.path().join("tipuri_plata.csv");
        std::fs::write(&path, "Denumire\nNumerar\nVirament\n").unwrap();

        let service = CatalogService::new(&storage, "admin");
        let summary = service
            .import_spreadsheet(CatalogKind::PaymentTypes, &path, 10)
            .unwrap();
        assert_eq!(summary.applied.unwrap().inserted, 2);
        assert_eq!(storage.catalog.payment_types.count().unwrap(), 2);
    }
}
