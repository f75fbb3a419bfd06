use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(OfficialId);

/// Federative-unit codes offered by the region filter, alphabetical.
pub const REGION_CODES: [&str; 27] = [
    "AC", "AL", "AM", "AP", "BA", "CE", "DF", "ES", "GO", "MA", "MG", "MS", "MT", "PA", "PB", "PE",
    "PI", "PR", "RJ", "RN", "RO", "RR", "RS", "SC", "SE", "SP", "TO",
];

/// One directory record. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Official {
    pub id: OfficialId,
    pub display_name: String,
    pub party_code: String,
    pub region_code: String,
    pub photo_url: String,
}

impl Official {
    /// Card subtitle, e.g. `PT - SP`.
    pub fn affiliation(&self) -> String {
        format!("{} - {}", self.party_code, self.region_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Name,
    Region,
    Party,
}

/// Filter values as typed by the user. An empty field carries no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub name_pattern: String,
    pub region_code: String,
    pub party_code: String,
}

impl FilterCriteria {
    pub fn new(
        name_pattern: impl Into<String>,
        region_code: impl Into<String>,
        party_code: impl Into<String>,
    ) -> Self {
        Self {
            name_pattern: name_pattern.into(),
            region_code: region_code.into(),
            party_code: party_code.into(),
        }
    }

    pub fn field(&self, field: FilterField) -> &str {
        match field {
            FilterField::Name => &self.name_pattern,
            FilterField::Region => &self.region_code,
            FilterField::Party => &self.party_code,
        }
    }

    pub fn set_field(&mut self, field: FilterField, value: impl Into<String>) {
        let slot = match field {
            FilterField::Name => &mut self.name_pattern,
            FilterField::Region => &mut self.region_code,
            FilterField::Party => &mut self.party_code,
        };
        *slot = value.into();
    }

    /// The field value, verbatim, when it constrains the query. `None` when empty.
    pub fn constraint(&self, field: FilterField) -> Option<&str> {
        let value = self.field(field);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        [FilterField::Name, FilterField::Region, FilterField::Party]
            .into_iter()
            .all(|field| self.constraint(field).is_none())
    }
}

/// Confirmed filters plus the page they are viewed at. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedQuery {
    pub criteria: FilterCriteria,
    pub page: u32,
}

impl Default for CommittedQuery {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            page: 1,
        }
    }
}

impl CommittedQuery {
    pub fn with_criteria(criteria: FilterCriteria) -> Self {
        Self { criteria, page: 1 }
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            criteria: self.criteria.clone(),
            page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub entities: Vec<Official>,
    pub current_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionsStatus {
    Pending,
    Ready,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub region_codes: Vec<String>,
    pub party_codes: Vec<String>,
    pub party_status: OptionsStatus,
}

impl FilterOptions {
    /// Region codes are known up front; party codes arrive later.
    pub fn initial() -> Self {
        Self {
            region_codes: REGION_CODES.iter().map(|code| (*code).to_string()).collect(),
            party_codes: Vec::new(),
            party_status: OptionsStatus::Pending,
        }
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self::initial()
    }
}
