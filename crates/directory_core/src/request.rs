//! Translation of a committed query into the API's query-parameter contract.

use chrono::NaiveDate;
use shared::domain::{CommittedQuery, FilterField};
use url::Url;

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_PARTY_PAGE_SIZE: u32 = 100;

const OFFICIALS_PATH: &str = "deputados";
const PARTIES_PATH: &str = "partidos";

/// Parameters fixed for every request issued by one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDefaults {
    pub page_size: u32,
    pub party_page_size: u32,
    pub start_date: NaiveDate,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            party_page_size: DEFAULT_PARTY_PAGE_SIZE,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
        }
    }
}

/// One directory page request. Filters are `None` when they carry no constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRequest {
    pub page: u32,
    pub name: Option<String>,
    pub region: Option<String>,
    pub party: Option<String>,
}

impl DirectoryRequest {
    pub fn from_query(query: &CommittedQuery) -> Self {
        let constraint = |field| query.criteria.constraint(field).map(str::to_string);
        Self {
            page: query.page.max(1),
            name: constraint(FilterField::Name),
            region: constraint(FilterField::Region),
            party: constraint(FilterField::Party),
        }
    }

    pub fn query_pairs(&self, defaults: &QueryDefaults) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("itens", defaults.page_size.to_string()),
            ("dataInicio", defaults.start_date.format("%Y-%m-%d").to_string()),
            ("ordem", "ASC".to_string()),
            ("ordenarPor", "nome".to_string()),
            ("pagina", self.page.to_string()),
        ];
        if let Some(name) = &self.name {
            pairs.push(("nome", name.clone()));
        }
        if let Some(region) = &self.region {
            pairs.push(("siglaUf", region.clone()));
        }
        if let Some(party) = &self.party {
            pairs.push(("siglaPartido", party.clone()));
        }
        pairs
    }
}

#[derive(Debug, thiserror::Error)]
#[error("base url '{0}' cannot carry path segments")]
pub struct InvalidBaseUrl(pub String);

pub fn officials_url(
    base: &Url,
    request: &DirectoryRequest,
    defaults: &QueryDefaults,
) -> Result<Url, InvalidBaseUrl> {
    let mut url = endpoint(base, OFFICIALS_PATH)?;
    url.query_pairs_mut()
        .extend_pairs(request.query_pairs(defaults));
    Ok(url)
}

pub fn parties_url(base: &Url, defaults: &QueryDefaults) -> Result<Url, InvalidBaseUrl> {
    let mut url = endpoint(base, PARTIES_PATH)?;
    url.query_pairs_mut()
        .append_pair("itens", &defaults.party_page_size.to_string())
        .append_pair("ordem", "ASC")
        .append_pair("ordenarPor", "sigla");
    Ok(url)
}

fn endpoint(base: &Url, resource: &str) -> Result<Url, InvalidBaseUrl> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .push(resource);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use shared::domain::FilterCriteria;

    use super::*;

    fn base() -> Url {
        Url::parse("https://dadosabertos.camara.leg.br/api/v2").expect("base url")
    }

    #[test]
    fn unfiltered_first_page_carries_only_fixed_parameters() {
        let request = DirectoryRequest::from_query(&CommittedQuery::default());
        let url = officials_url(&base(), &request, &QueryDefaults::default()).expect("url");
        assert_eq!(
            url.as_str(),
            "https://dadosabertos.camara.leg.br/api/v2/deputados?itens=50&dataInicio=2023-01-01&ordem=ASC&ordenarPor=nome&pagina=1"
        );
    }

    #[test]
    fn empty_filters_are_omitted_and_others_kept_verbatim() {
        let query = CommittedQuery {
            criteria: FilterCriteria::new("ana", "SP", ""),
            page: 1,
        };
        let pairs = DirectoryRequest::from_query(&query).query_pairs(&QueryDefaults::default());
        assert!(pairs.contains(&("nome", "ana".to_string())));
        assert!(pairs.contains(&("siglaUf", "SP".to_string())));
        assert!(pairs.iter().all(|(key, _)| *key != "siglaPartido"));
    }

    #[test]
    fn whitespace_only_filter_is_sent_verbatim() {
        let query = CommittedQuery {
            criteria: FilterCriteria::new(" ", "", "PT"),
            page: 3,
        };
        let request = DirectoryRequest::from_query(&query);
        assert_eq!(request.name.as_deref(), Some(" "));
        assert_eq!(request.region, None);
        assert_eq!(request.page, 3);

        let pairs = request.query_pairs(&QueryDefaults::default());
        assert!(pairs.contains(&("nome", " ".to_string())));
        assert!(!pairs.iter().any(|(key, _)| *key == "siglaUf"));
    }

    #[test]
    fn filter_values_are_percent_encoded_in_the_url() {
        let query = CommittedQuery {
            criteria: FilterCriteria::new("joão silva", "", ""),
            page: 2,
        };
        let request = DirectoryRequest::from_query(&query);
        let url = officials_url(&base(), &request, &QueryDefaults::default()).expect("url");
        let nome = url
            .query_pairs()
            .find(|(key, _)| key == "nome")
            .map(|(_, value)| value.into_owned());
        assert_eq!(nome.as_deref(), Some("joão silva"));
        assert!(url.as_str().contains("pagina=2"));
    }

    #[test]
    fn base_with_trailing_slash_does_not_double_the_separator() {
        let base = Url::parse("http://127.0.0.1:8080/api/v2/").expect("base");
        let url = parties_url(&base, &QueryDefaults::default()).expect("url");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/api/v2/partidos?itens=100&ordem=ASC&ordenarPor=sigla"
        );
    }

    #[test]
    fn root_base_url_gets_resource_path() {
        let base = Url::parse("http://127.0.0.1:9000").expect("base");
        let request = DirectoryRequest::from_query(&CommittedQuery::default());
        let url = officials_url(&base, &request, &QueryDefaults::default()).expect("url");
        assert_eq!(url.path(), "/deputados");
    }
}
