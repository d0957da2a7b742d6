use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::defaults::default_programs;
use crate::catalog::schema::{Category, CategoryFilter, Program};
use crate::catalog::CatalogError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgram {
    pub name: String,
    pub category: Category,
    pub value: f64,
    #[serde(default)]
    pub reference_ppm: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramCatalog {
    programs: Vec<Program>,
}

impl ProgramCatalog {
    pub fn new(programs: Vec<Program>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for program in programs {
            validate_program(&program)?;
            if catalog.by_id(&program.id).is_some() {
                return Err(CatalogError::DuplicateId(program.id));
            }
            catalog.programs.push(program);
        }
        Ok(catalog)
    }

    pub fn with_defaults() -> Self {
        Self {
            programs: default_programs(),
        }
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.id == id)
    }

    pub fn filter(&self, filter: CategoryFilter) -> Vec<&Program> {
        self.programs
            .iter()
            .filter(|program| filter.matches(program.category))
            .collect()
    }

    pub fn selected_or_first(&self, id: Option<&str>) -> Option<&Program> {
        id.and_then(|id| self.by_id(id))
            .or_else(|| self.programs.first())
    }

    pub fn append(&mut self, new: NewProgram) -> Result<&Program, CatalogError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        let program = Program {
            id: self.next_custom_id(),
            name: name.to_string(),
            category: new.category,
            value: new.value,
            reference_ppm: new.reference_ppm,
        };
        validate_program(&program)?;
        let index = self.programs.len();
        self.programs.push(program);
        Ok(&self.programs[index])
    }

    fn next_custom_id(&self) -> String {
        let base = format!("custom-{}", Utc::now().timestamp_millis());
        if self.by_id(&base).is_none() {
            return base;
        }
        let mut suffix = 2usize;
        loop {
            let candidate = format!("{base}-{suffix}");
            if self.by_id(&candidate).is_none() {
                return candidate;
            }
            suffix += 1;
        }
    }
}

fn validate_program(program: &Program) -> Result<(), CatalogError> {
    if !(program.value.is_finite() && program.value > 0.0) {
        return Err(CatalogError::InvalidValue {
            field: format!("{}.value", program.id),
            value: program.value,
        });
    }
    if let Some(ppm) = program.reference_ppm {
        if program.category != Category::Airline || !(ppm.is_finite() && ppm > 0.0) {
            return Err(CatalogError::InvalidValue {
                field: format!("{}.reference_ppm", program.id),
                value: ppm,
            });
        }
    }
    Ok(())
}
