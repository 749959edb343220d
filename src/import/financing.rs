//! Financing source classifier
//!
//! Maps the normalized financing-source label of a row onto one or more
//! catalog financing sources. The explicit rule table is consulted first;
//! only when no rule fires are the catalog import codes scanned, and every
//! source whose code matches is taken.

use std::sync::OnceLock;

use tracing::trace;

use super::catalog::CatalogSnapshot;
use super::normalize::normalize;
use super::rules::{contains, exact, first_match, pattern, prefix, Details, Matcher, Rule};
use super::RegistryTable;
use crate::error::ImportError;
use crate::models::{FinancingSource, ProjectCategory};

/// One entry of a financing-source rule table
#[derive(Debug, Clone)]
pub struct SourceRule {
    pub matcher: Matcher,
    /// Catalog names of the sources the label stands for
    pub sources: &'static [&'static str],
    pub details: Details,
    /// Project category implied by the financing-source label alone
    pub category: Option<&'static str>,
    /// Replacement for the project label, for rows where the clerk typed
    /// the project in the financing-source column
    pub project_label: Option<&'static str>,
}

impl SourceRule {
    pub fn new(matcher: Matcher, sources: &'static [&'static str]) -> Self {
        Self {
            matcher,
            sources,
            details: Details::Keep,
            category: None,
            project_label: None,
        }
    }

    pub fn details(mut self, details: Details) -> Self {
        self.details = details;
        self
    }

    pub fn category(mut self, name: &'static str) -> Self {
        self.category = Some(name);
        self
    }

    pub fn project_label(mut self, label: &'static str) -> Self {
        self.project_label = Some(label);
        self
    }
}

impl Rule for SourceRule {
    fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

/// Result of classifying a financing-source label
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMatch<'c> {
    pub sources: Vec<&'c FinancingSource>,
    /// Residual free text for the project details field
    pub details: String,
    pub category: Option<&'c ProjectCategory>,
    pub project_label: Option<&'static str>,
    /// Position of the rule that fired; None when resolved by import code
    pub rule: Option<usize>,
}

impl<'c> SourceMatch<'c> {
    /// The only source, for records that carry exactly one
    pub fn single(&self, label: &str, row_index: usize) -> Result<&'c FinancingSource, ImportError> {
        match self.sources.as_slice() {
            [source] => Ok(*source),
            sources => Err(ImportError::consistency(
                row_index,
                format!(
                    "financing source '{}' resolves to {} sources, expected exactly one",
                    label.trim(),
                    sources.len()
                ),
            )),
        }
    }
}

pub struct FinancingSourceClassifier<'c> {
    catalog: &'c CatalogSnapshot,
    rules: &'static [SourceRule],
}

impl<'c> FinancingSourceClassifier<'c> {
    pub fn new(catalog: &'c CatalogSnapshot, rules: &'static [SourceRule]) -> Self {
        Self { catalog, rules }
    }

    pub fn for_table(catalog: &'c CatalogSnapshot, table: RegistryTable) -> Self {
        let rules = match table {
            RegistryTable::Expenditures => expenditure_source_rules(),
            RegistryTable::Commitments => commitment_source_rules(),
        };
        Self::new(catalog, rules)
    }

    pub fn classify(&self, label: &str, row_index: usize) -> Result<SourceMatch<'c>, ImportError> {
        let normalized = normalize(label);
        let unrecognized = || {
            ImportError::classification(
                row_index,
                format!("unrecognized financing source '{}'", label.trim()),
            )
        };
        if normalized.is_empty() {
            return Err(unrecognized());
        }

        if let Some((position, rule)) = first_match(self.rules, &normalized) {
            trace!(row = row_index, rule = position, label = %normalized, "financing source rule hit");

            let sources = rule
                .sources
                .iter()
                .map(|name| self.source(name, label, row_index))
                .collect::<Result<Vec<_>, _>>()?;
            let category = match rule.category {
                Some(name) => Some(self.category(name, label, row_index)?),
                None => None,
            };

            return Ok(SourceMatch {
                sources,
                details: rule.details.extract(label).unwrap_or_default(),
                category,
                project_label: rule.project_label,
                rule: Some(position),
            });
        }

        let sources = self.catalog.financing_sources.scan_all(&normalized);
        if sources.is_empty() {
            return Err(unrecognized());
        }
        trace!(row = row_index, label = %normalized, matches = sources.len(), "financing source import code hit");

        Ok(SourceMatch {
            sources,
            details: String::new(),
            category: None,
            project_label: None,
            rule: None,
        })
    }

    /// Bypass classification for an overridden row; the label becomes details
    pub fn forced(
        &self,
        name: &str,
        label: &str,
        row_index: usize,
    ) -> Result<SourceMatch<'c>, ImportError> {
        trace!(row = row_index, source = name, "financing source forced by row override");
        Ok(SourceMatch {
            sources: vec![self.source(name, label, row_index)?],
            details: label.trim().to_string(),
            category: None,
            project_label: None,
            rule: None,
        })
    }

    /// Classify an overridden row and append the named sources; an
    /// unrecognized label leaves only the added ones. The label becomes details
    pub fn with_added(
        &self,
        names: &[&str],
        label: &str,
        row_index: usize,
    ) -> Result<SourceMatch<'c>, ImportError> {
        let mut sources = if self.recognizes(label) {
            self.classify(label, row_index)?.sources
        } else {
            Vec::new()
        };
        for name in names {
            let source = self.source(name, label, row_index)?;
            if !sources.iter().any(|s| s.id == source.id) {
                sources.push(source);
            }
        }
        trace!(row = row_index, added = names.len(), total = sources.len(), "financing sources added by row override");

        Ok(SourceMatch {
            sources,
            details: label.trim().to_string(),
            category: None,
            project_label: None,
            rule: None,
        })
    }

    fn recognizes(&self, label: &str) -> bool {
        let normalized = normalize(label);
        !normalized.is_empty()
            && (first_match(self.rules, &normalized).is_some()
                || !self.catalog.financing_sources.scan_all(&normalized).is_empty())
    }

    fn source(
        &self,
        name: &str,
        label: &str,
        row_index: usize,
    ) -> Result<&'c FinancingSource, ImportError> {
        self.catalog
            .financing_sources
            .require_by_name(name)
            .map_err(|e| {
                ImportError::classification(
                    row_index,
                    format!("financing source '{}': {}", label.trim(), e),
                )
            })
    }

    fn category(
        &self,
        name: &str,
        label: &str,
        row_index: usize,
    ) -> Result<&'c ProjectCategory, ImportError> {
        self.catalog
            .project_categories
            .require_by_name(name)
            .map_err(|e| {
                ImportError::classification(
                    row_index,
                    format!("financing source '{}': {}", label.trim(), e),
                )
            })
    }
}

const VENITURI: &[&str] = &["Venituri"];
const CERCETARE: &[&str] = &["Cercetare"];
const CAMINE: &[&str] = &["Cămine"];
const CANTINE: &[&str] = &["Cantine"];
const ERASMUS: &[&str] = &["Erasmus"];
const PNRR: &[&str] = &["PNRR"];
const ICUB: &[&str] = &["ICUB"];

const FAC_ADMINISTRATIE: &[&str] = &["Facultatea de Administrație și Afaceri"];
const FAC_BIOLOGIE: &[&str] = &["Facultatea de Biologie"];
const FAC_CHIMIE: &[&str] = &["Facultatea de Chimie"];
const FAC_DREPT: &[&str] = &["Facultatea de Drept"];
const FAC_FILOSOFIE: &[&str] = &["Facultatea de Filosofie"];
const FAC_FIZICA: &[&str] = &["Facultatea de Fizică"];
const FAC_ISTORIE: &[&str] = &["Facultatea de Istorie"];
const FAC_TEOLOGIE_ORTODOXA: &[&str] = &["Facultatea de Teologie Ortodoxă"];
const FAC_TEOLOGIE_BAPTISTA: &[&str] = &["Facultatea de Teologie Baptistă"];
const FAC_TEOLOGIE_CATOLICA: &[&str] = &["Facultatea de Teologie Romano-Catolică"];
const FAC_GEOGRAFIE: &[&str] = &["Facultatea de Geografie"];
const FAC_GEOLOGIE: &[&str] = &["Facultatea de Geologie și Geofizică"];
const FAC_LITERE: &[&str] = &["Facultatea de Litere"];
const FAC_LLS: &[&str] = &["Facultatea de Limbi și Literaturi Străine"];
const LMA: &[&str] = &["Limbi Moderne Aplicate"];
const FAC_MATEMATICA: &[&str] = &["Facultatea de Matematică și Informatică"];
const FAC_JURNALISM: &[&str] = &["Facultatea de Jurnalism"];
const FAC_PSIHOLOGIE: &[&str] = &["Facultatea de Psihologie și Științele Educației"];
const FAC_STIINTE_POLITICE: &[&str] = &["Facultatea de Științe Politice"];
const FAC_SOCIOLOGIE: &[&str] = &["Facultatea de Sociologie și Asistență Socială"];
const DEP_SPORT: &[&str] = &["Departamentul de Educație Fizică și Sport"];

/// Rules shared verbatim by both registries
fn common_unit_rules() -> Vec<SourceRule> {
    vec![
        SourceRule::new(exact(&["casierie"]), &["Casierie"]),
        SourceRule::new(
            exact(&["editura ub", "editura universitatii"]),
            &["Editura UB"],
        ),
        SourceRule::new(exact(&["teren sport"]), &["Teren de sport"]),
        SourceRule::new(exact(&["casa universitarilor"]), &["Casa Universitarilor"]),
        SourceRule::new(exact(&["purowax"]), &["PUROWAX"]),
    ]
}

/// Expenditures: every label maps to exactly one source
pub fn expenditure_source_rules() -> &'static [SourceRule] {
    static RULES: OnceLock<Vec<SourceRule>> = OnceLock::new();
    RULES.get_or_init(build_expenditure_rules)
}

fn build_expenditure_rules() -> Vec<SourceRule> {
    let mut rules = vec![
        SourceRule::new(exact(&["financiar"]), &["Direcția Financiar-Contabilă"]),
        SourceRule::new(
            exact(&[
                "venituri",
                "venituri ub",
                "venituri bcr",
                "venituri trez",
                "rectorat",
                "buget",
            ]),
            VENITURI,
        ),
        SourceRule::new(
            exact(&["finantare complementara", "finantare complementare"]),
            &["Finanțare complementară"],
        ),
        SourceRule::new(exact(&["sponsorizare"]), &["Sponsorizare"]),
        SourceRule::new(exact(&["drept universal"]), VENITURI).category("Drept Universal"),
        SourceRule::new(
            exact(&[
                "cercetare",
                "cercetre",
                "finantarea cercetarii",
                "fcs",
                "fss",
                "pfe",
                "fse",
                "pr men",
                "timss",
            ]),
            CERCETARE,
        ),
        SourceRule::new(exact(&["pnrr", "pnnr"]), PNRR),
        SourceRule::new(prefix(&["pnrr", "pnnr"]), PNRR)
            .details(Details::StripPrefix(&["pnrr", "pnnr"])),
        SourceRule::new(exact(&["pocu"]), &["POCU"]),
        SourceRule::new(exact(&["fdi"]), &["FDI"]),
        SourceRule::new(exact(&["proiecte in valuta"]), CERCETARE)
            .project_label("pr. cu finantare in valuta"),
        SourceRule::new(exact(&["camine", "camin"]), CAMINE),
        SourceRule::new(
            exact(&["cam a1 grozavesti", "cam st militaru", "cam b groavesti"]),
            CAMINE,
        )
        .details(Details::Label),
        SourceRule::new(exact(&["cantina", "cantina ub", "cantina  ub"]), CANTINE),
    ];
    rules.extend(common_unit_rules());
    rules.extend(vec![
        SourceRule::new(exact(&["see"]), &["SEE"]),
        SourceRule::new(exact(&["erasmus", "valuta studii"]), ERASMUS),
        SourceRule::new(exact(&["civis"]), &["CIVIS"]),
        SourceRule::new(exact(&["gr botanica", "gradina botanica"]), &["Grădina Botanică"]),
        SourceRule::new(
            exact(&["st sf gheorghe"]),
            &["Stațiunea de cercetări de la Sfântu Gheorghe"],
        ),
        SourceRule::new(exact(&["st orsova"]), &["Stațiunea de cercetare de la Orșova"]),
        SourceRule::new(
            exact(&[
                "st braila",
                "braila",
                "statiunea braila",
                "statiune braila",
                "statiunea braile",
            ]),
            &["Stațiunea de Cercetări Ecologice Brăila"],
        ),
        SourceRule::new(
            exact(&["statiunea sinaia", "st sinaia"]),
            &["Stațiunea Zoologică Sinaia"],
        ),
        SourceRule::new(exact(&["statiunea hateg"]), &["Geoparcul Țara Hațegului"]),
        SourceRule::new(exact(&["academica"]), &["Casa de Oaspeți „Academica”"]),
        SourceRule::new(exact(&["gaudeamus", "camin gaudeamus"]), &["Hotel Gaudeamus"]),
        SourceRule::new(exact(&["confucius"]), &["Institutul Confucius"]),
        SourceRule::new(exact(&["cls"]), &["Centrul de Limbi Străine"]),
        SourceRule::new(
            exact(&["csud"]),
            &["Consiliul Studiilor Universitare de Doctorat"],
        ),
        SourceRule::new(exact(&["icub"]), ICUB),
        SourceRule::new(
            exact(&["spatii invatamant", "sp. invatamant"]),
            &["Serviciul Spații de Învățământ"],
        ),
        // faculties
        SourceRule::new(
            exact(&[
                "adm si afaceri",
                "fac ad si afaceri",
                "administratie",
                "admin si afaceri",
            ]),
            FAC_ADMINISTRATIE,
        ),
        SourceRule::new(exact(&["biologie", "fac biologie"]), FAC_BIOLOGIE),
        SourceRule::new(exact(&["fac chimie", "chimie"]), FAC_CHIMIE),
        SourceRule::new(exact(&["drept", "fac drept"]), FAC_DREPT),
        SourceRule::new(exact(&["filosofie", "fac filosofie"]), FAC_FILOSOFIE),
        SourceRule::new(exact(&["fizica"]), FAC_FIZICA),
        SourceRule::new(exact(&["istorie", "fac istorie"]), FAC_ISTORIE),
        SourceRule::new(
            exact(&[
                "teologie ortodoxa",
                "teol ortodoxa",
                "fac teol ort",
                "teol ort",
                "tel ortodoxa",
            ]),
            FAC_TEOLOGIE_ORTODOXA,
        ),
        SourceRule::new(
            exact(&["teologie baptista", "teol baptista"]),
            FAC_TEOLOGIE_BAPTISTA,
        ),
        SourceRule::new(
            exact(&[
                "teologie rom catolica",
                "teol romano catolica",
                "teologie romano catolica",
            ]),
            FAC_TEOLOGIE_CATOLICA,
        ),
        SourceRule::new(exact(&["geografie", "fac geografie"]), FAC_GEOGRAFIE),
        SourceRule::new(exact(&["geologie", "fac geologie"]), FAC_GEOLOGIE),
        SourceRule::new(exact(&["litere", "fac litere"]), FAC_LITERE),
        SourceRule::new(exact(&["lls", "fac lls"]), FAC_LLS),
        SourceRule::new(exact(&["lma"]), LMA),
        SourceRule::new(
            exact(&["matematica", "fac matematica", "fac mate"]),
            FAC_MATEMATICA,
        ),
        SourceRule::new(exact(&["jurnalism", "fac jurnalism"]), FAC_JURNALISM),
        SourceRule::new(
            exact(&["psihologie", "fac psihologie", "fa psihologie"]),
            FAC_PSIHOLOGIE,
        ),
        SourceRule::new(
            exact(&[
                "stiinte politice",
                "st politice",
                "fac st politice",
                "sttinte politice",
            ]),
            FAC_STIINTE_POLITICE,
        ),
        SourceRule::new(exact(&["sociologie", "fac sociologie"]), FAC_SOCIOLOGIE),
        SourceRule::new(
            exact(&[
                "departamentul de sport",
                "departamentul de educatie fizica",
                "catedra sport",
            ]),
            DEP_SPORT,
        ),
    ]);
    rules
}

/// Commitments: some legacy labels name several sources at once
pub fn commitment_source_rules() -> &'static [SourceRule] {
    static RULES: OnceLock<Vec<SourceRule>> = OnceLock::new();
    RULES.get_or_init(build_commitment_rules)
}

fn build_commitment_rules() -> Vec<SourceRule> {
    let mut rules = vec![
        // historical rows that named a combination of sources
        SourceRule::new(
            exact(&["gradina botanica/drept. stiinte politice"]),
            &[
                "Grădina Botanică",
                "Facultatea de Drept",
                "Facultatea de Științe Politice",
            ],
        ),
        SourceRule::new(
            exact(&["statiuni braila,orsova,sinaia"]),
            &[
                "Stațiunea de Cercetări Ecologice Brăila",
                "Stațiunea de cercetare de la Orșova",
                "Stațiunea Zoologică Sinaia",
            ],
        ),
        SourceRule::new(exact(&["cercetare si venituri"]), &["Cercetare", "Venituri"]),
        SourceRule::new(
            exact(&["achizitii/it"]),
            &["Serviciul Achiziții Publice", "Direcția IT&C"],
        ),
        // revenues
        SourceRule::new(
            exact(&[
                "venituri",
                "venituri ub",
                "rectorat",
                "ub",
                "ven trez",
                "ven trezorerie",
            ]),
            VENITURI,
        ),
        SourceRule::new(prefix(&["venit"]), VENITURI)
            .details(Details::StripPrefix(&["venituri", "venit"])),
        SourceRule::new(exact(&["buget", "trezorerie", "drept universal"]), VENITURI)
            .details(Details::Label),
        SourceRule::new(exact(&["microproductie"]), &["Microproducție"]),
        SourceRule::new(exact(&["parc auto"]), &["Parc auto"]),
        SourceRule::new(
            exact(&["finantare complementara", "finantare complemnetara"]),
            &["Finanțare complementară"],
        ),
        // research projects
        SourceRule::new(
            exact(&[
                "cercetare",
                "cercetre",
                "finantarea cercetarii",
                "finantarea cercetarii stiintifice",
                "fin cercetarii",
                "pr cu tva",
                "pr nationale",
                "pr internationale",
                "proiecte internationale",
                "proiecte in valuta",
                "pr in valuta",
                "fcs",
                "fss",
                "pfe",
                "fse",
            ]),
            CERCETARE,
        )
        .details(Details::Label),
        SourceRule::new(
            prefix(&[
                "ctr.",
                "pfe ",
                "pfe/",
                "fcs ",
                "fcs/",
                "fss/",
                "fss ",
                "proiecte fss",
                "cpi/",
                "lifewatch",
                "timss",
                "proiect caipe",
                "pr growing",
                "pr employer",
                "pr ev potential",
                "pr siec",
                "proiect addendum",
                "pr men",
                "ctr timss",
                "regie sectie",
            ]),
            CERCETARE,
        )
        .details(Details::Label),
        SourceRule::new(prefix(&["llp-uri"]), ERASMUS).details(Details::StripPrefix(&["llp-uri"])),
        SourceRule::new(exact(&["pnrr", "pnnr"]), PNRR),
        SourceRule::new(prefix(&["pocu"]), &["POCU"]).details(Details::StripPrefix(&["pocu"])),
        SourceRule::new(exact(&["fdi"]), &["FDI"]),
        SourceRule::new(
            exact(&["camine-cantine", "camine-cantina"]),
            &["Direcția Cămine-Cantine și Activități Studențești"],
        ),
        SourceRule::new(
            exact(&[
                "camine",
                "cam a1 grozavesti",
                "cam st militaru",
                "cam b groavesti",
            ]),
            CAMINE,
        )
        .details(Details::Label),
        SourceRule::new(prefix(&["camine "]), CAMINE).details(Details::StripPrefix(&["camine"])),
        SourceRule::new(pattern(r"^ap \d+"), &["Direcția Patrimoniu Imobiliar"])
            .details(Details::Label),
        SourceRule::new(exact(&["cantina", "cantina ub", "cantina  ub"]), CANTINE),
        SourceRule::new(prefix(&["cantina"]), CANTINE).details(Details::StripPrefix(&["cantina"])),
    ];
    rules.extend(common_unit_rules());
    rules.extend(vec![
        SourceRule::new(exact(&["see", "grant see"]), &["SEE"]),
        SourceRule::new(
            exact(&["erasmus", "ven erasmus", "proiect de tip erasmus"]),
            ERASMUS,
        ),
        SourceRule::new(prefix(&["trace"]), ERASMUS).details(Details::Label),
        SourceRule::new(prefix(&["erasmus/"]), ERASMUS).details(Details::StripPrefix(&["erasmus"])),
        SourceRule::new(exact(&["civis", "civis 2"]), &["CIVIS"]).details(Details::Label),
        SourceRule::new(exact(&["gr botanica", "gradina botanica"]), &["Grădina Botanică"]),
        SourceRule::new(
            exact(&["st sf gheorghe"]),
            &["Stațiunea de cercetări de la Sfântu Gheorghe"],
        ),
        SourceRule::new(
            exact(&["st orsova", "st. orsova"]),
            &["Stațiunea de cercetare de la Orșova"],
        ),
        SourceRule::new(
            exact(&["statiunea braila", "statiune braila", "st braila", "braila"]),
            &["Stațiunea de Cercetări Ecologice Brăila"],
        ),
        SourceRule::new(exact(&["statiunea sinaia"]), &["Stațiunea Zoologică Sinaia"]),
        SourceRule::new(exact(&["academica"]), &["Casa de Oaspeți „Academica”"]),
        SourceRule::new(exact(&["gaudeamus"]), &["Hotel Gaudeamus"]),
        SourceRule::new(exact(&["confucius"]), &["Institutul Confucius"]),
        SourceRule::new(exact(&["cls"]), &["Centrul de Limbi Străine"]),
        SourceRule::new(
            exact(&["csud"]),
            &["Consiliul Studiilor Universitare de Doctorat"],
        ),
        SourceRule::new(exact(&["icub", "ub icub"]), ICUB),
        SourceRule::new(prefix(&["icub"]), ICUB).details(Details::StripPrefix(&["icub"])),
        // faculties
        SourceRule::new(
            exact(&[
                "adm si afaceri",
                "fac ad si afaceri",
                "administratie si afaceri",
                "admin si afaceri",
                "administratie",
            ]),
            FAC_ADMINISTRATIE,
        ),
        SourceRule::new(exact(&["biologie", "fac biologie"]), FAC_BIOLOGIE),
        SourceRule::new(exact(&["fac chimie", "chimie", "chmie"]), FAC_CHIMIE),
        SourceRule::new(exact(&["drept", "fac drept"]), FAC_DREPT),
        SourceRule::new(prefix(&["drept "]), FAC_DREPT).details(Details::StripPrefix(&["drept"])),
        SourceRule::new(exact(&["filosofie", "fac filosofie"]), FAC_FILOSOFIE),
        SourceRule::new(contains(&["filosofie "]), FAC_FILOSOFIE)
            .details(Details::StripPrefix(&["filosofie"])),
        SourceRule::new(contains(&["catedra unesco"]), FAC_FILOSOFIE).details(Details::Label),
        SourceRule::new(exact(&["fizica", "fac fizica"]), FAC_FIZICA),
        SourceRule::new(prefix(&["fizica "]), FAC_FIZICA).details(Details::StripPrefix(&["fizica"])),
        SourceRule::new(exact(&["istorie", "fac istorie"]), FAC_ISTORIE),
        SourceRule::new(
            exact(&["teologie ortodoxa", "teol ortodoxa"]),
            FAC_TEOLOGIE_ORTODOXA,
        ),
        SourceRule::new(
            exact(&["teologie baptista", "teol baptista"]),
            FAC_TEOLOGIE_BAPTISTA,
        ),
        SourceRule::new(
            exact(&[
                "teologie rom catolica",
                "teol romano catolica",
                "teologie romano catolica",
                "teologie catolica",
            ]),
            FAC_TEOLOGIE_CATOLICA,
        ),
        SourceRule::new(
            exact(&["geografie", "geografia", "fac geografie"]),
            FAC_GEOGRAFIE,
        ),
        SourceRule::new(exact(&["geologie", "fac geologie"]), FAC_GEOLOGIE),
        SourceRule::new(prefix(&["fac. de geologie"]), FAC_GEOLOGIE)
            .details(Details::StripPrefix(&["fac. de geologie"])),
        SourceRule::new(exact(&["litere", "fac litere"]), FAC_LITERE),
        SourceRule::new(exact(&["lls", "fac lls"]), FAC_LLS),
        SourceRule::new(exact(&["lma"]), LMA),
        SourceRule::new(exact(&["matematica", "fac matematica"]), FAC_MATEMATICA),
        SourceRule::new(exact(&["jurnalism", "fac jurnalism"]), FAC_JURNALISM),
        SourceRule::new(exact(&["psihologie", "fac psihologie"]), FAC_PSIHOLOGIE),
        SourceRule::new(prefix(&["psihologie"]), FAC_PSIHOLOGIE)
            .details(Details::StripPrefix(&["psihologie"])),
        SourceRule::new(
            exact(&[
                "stiinte politice",
                "st politice",
                "fac st politice",
                "sttinte politice",
            ]),
            FAC_STIINTE_POLITICE,
        ),
        SourceRule::new(exact(&["sociologie", "fac sociologie"]), FAC_SOCIOLOGIE),
        // administrative units
        SourceRule::new(exact(&["tehnic"]), &["Direcția Tehnică"]),
        SourceRule::new(exact(&["financiar"]), &["Direcția Financiar-Contabilă"]),
        SourceRule::new(exact(&["dgma"]), &["Direcția Generală Management Academic"]),
        SourceRule::new(
            exact(&["dir relatii internationale"]),
            &["Direcția Relații Internaționale"],
        ),
        SourceRule::new(
            exact(&[
                "dir comunicare si relatii publice",
                "directia comunicare si relatii publice",
            ]),
            &["Direcția Comunicare și Relații Publice"],
        ),
        SourceRule::new(
            exact(&[
                "catedra sport",
                "departamentul de sport",
                "departamentul de educatie fizica",
                "defs",
            ]),
            DEP_SPORT,
        ),
        SourceRule::new(exact(&["it"]), &["Direcția IT&C"]),
        SourceRule::new(exact(&["social"]), &["Serviciul Social și Activități Studențești"]),
        SourceRule::new(exact(&["patrimoniu"]), &["Direcția Patrimoniu Imobiliar"]),
        SourceRule::new(exact(&["spatii invatamant"]), &["Serviciul Spații de Învățământ"]),
        SourceRule::new(exact(&["achizitii"]), &["Serviciul Achiziții Publice"]),
        SourceRule::new(prefix(&["achizitii/"]), &["Serviciul Achiziții Publice"])
            .details(Details::Label),
        SourceRule::new(exact(&["ru"]), &["Direcția Resurse Umane"]),
        // programmes written with a trailing project reference
        SourceRule::new(prefix(&["pnrr", "pnnr"]), PNRR)
            .details(Details::StripPrefix(&["pnrr", "pnnr"])),
        SourceRule::new(prefix(&["cdi"]), &["CDI"]).details(Details::StripPrefix(&["cdi"])),
        SourceRule::new(prefix(&["proiect cdi"]), &["CDI"])
            .details(Details::StripPrefix(&["proiect cdi"])),
        SourceRule::new(prefix(&["fdi"]), &["FDI"]).details(Details::StripPrefix(&["fdi"])),
        SourceRule::new(prefix(&["purowax", "pr purowax"]), &["PUROWAX"])
            .details(Details::StripPrefix(&["pr purowax", "purowax"])),
        SourceRule::new(prefix(&["see"]), &["SEE"]).details(Details::StripPrefix(&["see"])),
    ]);
    rules
}
