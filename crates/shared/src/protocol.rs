//! Wire shapes of the open-data API. Anything that does not match these
//! structures is rejected as a malformed response.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Official, OfficialId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub rel: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficialRecord {
    pub id: i64,
    pub nome: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sigla_partido: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sigla_uf: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url_foto: String,
}

impl From<OfficialRecord> for Official {
    fn from(value: OfficialRecord) -> Self {
        Self {
            id: OfficialId(value.id),
            display_name: value.nome,
            party_code: value.sigla_partido,
            region_code: value.sigla_uf,
            photo_url: value.url_foto,
        }
    }
}

/// `GET /deputados` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficialListResponse {
    pub dados: Vec<OfficialRecord>,
    #[serde(default)]
    pub links: Vec<PageLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyRecord {
    pub sigla: String,
}

/// `GET /partidos` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyListResponse {
    pub dados: Vec<PartyRecord>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
